//! Zombie agent data: perception tuning, vitals, appetite, locomotion outputs

use bevy::prelude::*;

use crate::components::{AiTarget, PatrolRoute, ThreatModel};
use crate::config::ZombieConfig;

/// Perception tuning
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Senses {
    /// Угол обзора (градусы)
    pub fov: f32,
    pub sight: f32,
    pub hearing: f32,
    pub intelligence: f32,
    pub aggression: f32,
}

/// Sensor sphere (голова): offset в local space + радиус
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct SensorVolume {
    pub offset: Vec3,
    pub radius: f32,
}

impl SensorVolume {
    pub fn world_position(&self, transform: &Transform) -> Vec3 {
        transform.translation + transform.rotation * self.offset
    }
}

/// Здоровье + накопленный урон по частям тела
///
/// Инварианты: health только убывает (floor 0), damage только растёт (cap max_body_damage).
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Vitals {
    pub health: u32,
    pub upper_body_damage: u32,
    pub lower_body_damage: u32,
    pub upper_body_threshold: u32,
    pub limp_threshold: u32,
    pub crawl_threshold: u32,
    pub max_body_damage: u32,
}

impl Vitals {
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_crawling(&self) -> bool {
        self.lower_body_damage >= self.crawl_threshold
    }

    pub fn damage_head(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    pub fn damage_upper_body(&mut self, amount: u32) {
        self.upper_body_damage = self.upper_body_damage.saturating_add(amount).min(self.max_body_damage);
    }

    pub fn damage_lower_body(&mut self, amount: u32) {
        self.lower_body_damage = self.lower_body_damage.saturating_add(amount).min(self.max_body_damage);
    }
}

/// Голод: satisfaction ∈ [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Appetite {
    pub satisfaction: f32,
    pub replenish_rate: f32,
    pub depletion_rate: f32,
}

impl Appetite {
    /// Satisfaction, при превышении которой зомби не ищет еду и прекращает есть
    pub const SATED: f32 = 0.9;

    /// satisfaction -= (depletion_rate × dt / 100) × speed³
    pub fn deplete(&mut self, delta: f32, speed: f32) {
        let loss = (self.depletion_rate * delta / 100.0) * speed.powi(3);
        self.satisfaction = (self.satisfaction - loss.max(0.0)).clamp(0.0, 1.0);
    }

    /// satisfaction += dt × replenish_rate / 100
    pub fn replenish(&mut self, delta: f32) {
        let gain = delta * self.replenish_rate / 100.0;
        self.satisfaction = (self.satisfaction + gain.max(0.0)).clamp(0.0, 1.0);
    }

    pub fn is_sated(&self) -> bool {
        self.satisfaction > Self::SATED
    }
}

/// Locomotion / animator outputs, выставляются state логикой
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct Locomotion {
    pub speed: f32,
    /// -1 / 0 / 1: поворот на месте
    pub seeking: i32,
    pub feeding: bool,
    pub attack_type: i32,
}

impl Locomotion {
    /// Общий reset при входе в state
    pub fn reset(&mut self) {
        self.speed = 0.0;
        self.seeking = 0;
        self.feeding = false;
        self.attack_type = 0;
    }
}

/// Root motion reference counts (инкрементируются/декрементируются animation link событиями)
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct RootMotion {
    pub position_refs: i32,
    pub rotation_refs: i32,
}

impl RootMotion {
    pub fn add_request(&mut self, position: i32, rotation: i32) {
        self.position_refs += position;
        self.rotation_refs += rotation;
    }

    pub fn use_root_position(&self) -> bool {
        self.position_refs > 0
    }

    pub fn use_root_rotation(&self) -> bool {
        self.rotation_refs > 0
    }
}

/// Агент-зомби: всё mutable состояние, которое читают/пишут behavior states
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Zombie {
    pub senses: Senses,
    pub sensor: SensorVolume,
    pub vitals: Vitals,
    pub appetite: Appetite,
    pub locomotion: Locomotion,
    pub root_motion: RootMotion,

    /// Committed goal (переживает tick до явной замены)
    pub target: AiTarget,
    /// Tick-scoped кандидаты угроз
    pub threats: ThreatModel,
    pub patrol: PatrolRoute,

    pub target_reached: bool,
    /// Edge detection для on_destination_reached (enter/exit зоны цели)
    pub target_zone_occupied: bool,
    pub in_melee_range: bool,
    /// Выставляется animation link событиями (cinematic анимации, например еда)
    pub cinematic: bool,

    pub stopping_distance: f32,
    pub melee_range: f32,
}

impl Default for Zombie {
    fn default() -> Self {
        Self::from_config(&ZombieConfig::default())
    }
}

impl Zombie {
    pub fn from_config(config: &ZombieConfig) -> Self {
        Self {
            senses: Senses {
                fov: config.fov,
                sight: config.sight,
                hearing: config.hearing,
                intelligence: config.intelligence,
                aggression: config.aggression,
            },
            sensor: SensorVolume {
                offset: Vec3::from_array(config.sensor_offset),
                radius: config.sensor_radius,
            },
            vitals: Vitals {
                health: config.health,
                upper_body_damage: 0,
                lower_body_damage: 0,
                upper_body_threshold: config.upper_body_threshold,
                limp_threshold: config.limp_threshold,
                crawl_threshold: config.crawl_threshold,
                max_body_damage: config.max_body_damage,
            },
            appetite: Appetite {
                satisfaction: config.satisfaction,
                replenish_rate: config.replenish_rate,
                depletion_rate: config.depletion_rate,
            },
            locomotion: Locomotion::default(),
            root_motion: RootMotion::default(),
            target: AiTarget::default(),
            threats: ThreatModel::default(),
            patrol: PatrolRoute {
                random: config.random_patrol,
                ..default()
            },
            target_reached: false,
            target_zone_occupied: false,
            in_melee_range: false,
            cinematic: false,
            stopping_distance: config.stopping_distance,
            melee_range: config.melee_range,
        }
    }

    /// Commit цели (Target Descriptor)
    pub fn set_target(&mut self, target: AiTarget) {
        self.target = target;
    }

    pub fn clear_target(&mut self) {
        self.target.clear();
    }

    /// Physics tick: сброс угроз, пересчёт дистанции до цели, сброс target reached
    pub fn begin_physics_tick(&mut self, position: Vec3) {
        self.threats.clear();
        if !self.target.is_none() {
            self.target.distance = position.distance(self.target.position);
        }
        self.target_reached = false;
    }
}
