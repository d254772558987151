//! Конфигурация зомби (perception, vitals, appetite, reanimation, per-state tuning)
//!
//! Default значения = затюненные константы. Загрузка из RON:
//!
//! ```
//! use rotwalk_simulation::config::ZombieConfig;
//!
//! let config = ZombieConfig::from_ron("(fov: 90.0, sight: 0.8)").unwrap();
//! assert_eq!(config.fov, 90.0);
//! assert_eq!(config.hearing, 1.0); // остальное из Default
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::BehaviorKind;
use crate::collision_layers::COLLISION_MASK_GEOMETRY;
use crate::combat::BoneAlignment;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse zombie config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("config field `{field}` = {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}

/// Параметры одного зомби
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZombieConfig {
    /// Угол обзора (градусы), LOS отсекает за пределами fov/2
    pub fov: f32,
    pub sight: f32,
    pub hearing: f32,
    pub aggression: f32,
    pub intelligence: f32,

    pub health: u32,
    pub upper_body_threshold: u32,
    pub limp_threshold: u32,
    /// lower body damage >= crawl_threshold → ползёт
    pub crawl_threshold: u32,
    /// Потолок для upper/lower body damage
    pub max_body_damage: u32,

    pub satisfaction: f32,
    pub replenish_rate: f32,
    pub depletion_rate: f32,

    pub stopping_distance: f32,
    pub melee_range: f32,
    pub random_patrol: bool,
    pub initial_state: BehaviorKind,

    /// Sensor sphere: offset от root (local space) + радиус
    pub sensor_offset: [f32; 3],
    pub sensor_radius: f32,

    pub reanimation: ReanimationConfig,
    pub behavior: BehaviorTuning,
}

impl Default for ZombieConfig {
    fn default() -> Self {
        Self {
            fov: 120.0,
            sight: 0.5,
            hearing: 1.0,
            aggression: 0.5,
            intelligence: 1.0,
            health: 100,
            upper_body_threshold: 30,
            limp_threshold: 30,
            crawl_threshold: 90,
            max_body_damage: 100,
            satisfaction: 0.45,
            replenish_rate: 2.13,
            depletion_rate: 0.1,
            stopping_distance: 1.0,
            melee_range: 1.5,
            random_patrol: false,
            initial_state: BehaviorKind::Idle,
            sensor_offset: [0.0, 1.6, 0.0],
            sensor_radius: 10.0,
            reanimation: ReanimationConfig::default(),
            behavior: BehaviorTuning::default(),
        }
    }
}

impl ZombieConfig {
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: ZombieConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check("fov", self.fov, 10.0, 360.0)?;
        check("sight", self.sight, 0.0, 1.0)?;
        check("hearing", self.hearing, 0.0, 1.0)?;
        check("aggression", self.aggression, 0.0, 1.0)?;
        check("intelligence", self.intelligence, 0.0, 1.0)?;
        check("satisfaction", self.satisfaction, 0.0, 1.0)?;
        check("health", self.health as f32, 0.0, 100.0)?;
        check("upper_body_threshold", self.upper_body_threshold as f32, 0.0, 100.0)?;
        check("limp_threshold", self.limp_threshold as f32, 0.0, 100.0)?;
        check("crawl_threshold", self.crawl_threshold as f32, 0.0, 100.0)?;
        check("max_body_damage", self.max_body_damage as f32, 0.0, 100.0)?;
        check("replenish_rate", self.replenish_rate, 0.0, f32::MAX)?;
        check("depletion_rate", self.depletion_rate, 0.0, f32::MAX)?;
        check("stopping_distance", self.stopping_distance, 0.0, 15.0)?;
        check("sensor_radius", self.sensor_radius, f32::EPSILON, f32::MAX)?;
        check("reanimation.wait_time", self.reanimation.wait_time, 0.0, f32::MAX)?;
        check("reanimation.blend_time", self.reanimation.blend_time, f32::EPSILON, f32::MAX)?;
        check(
            "reanimation.mecanim_transition_time",
            self.reanimation.mecanim_transition_time,
            0.0,
            f32::MAX,
        )?;
        let (idle_min, idle_max) = self.behavior.idle.idle_time_range;
        check("behavior.idle.idle_time_range.0", idle_min, 0.0, idle_max)?;
        let pursuit = &self.behavior.pursuit;
        check(
            "behavior.pursuit.repath_visual_max_duration",
            pursuit.repath_visual_max_duration,
            0.0,
            f32::MAX,
        )?;
        check(
            "behavior.pursuit.repath_visual_min_duration",
            pursuit.repath_visual_min_duration,
            0.0,
            pursuit.repath_visual_max_duration,
        )?;
        check(
            "behavior.pursuit.repath_audio_max_duration",
            pursuit.repath_audio_max_duration,
            0.0,
            f32::MAX,
        )?;
        check(
            "behavior.pursuit.repath_audio_min_duration",
            pursuit.repath_audio_min_duration,
            0.0,
            pursuit.repath_audio_max_duration,
        )?;
        check("behavior.alerted.max_duration", self.behavior.alerted.max_duration, 1.0, 60.0)?;
        check("behavior.attack.look_at_weight", self.behavior.attack.look_at_weight, 0.0, 1.0)?;
        check(
            "behavior.feeding.burst_time",
            self.behavior.feeding.burst_time,
            0.01,
            1.0,
        )?;
        Ok(())
    }
}

fn check(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if value.is_nan() || value < min || value > max {
        return Err(ConfigError::OutOfRange { field, value, min, max });
    }
    Ok(())
}

/// Тайминги ragdoll → animated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReanimationConfig {
    /// Пауза в ragdoll перед capture snapshots (секунды)
    pub wait_time: f32,
    /// Blend snapshot → animated pose (секунды)
    pub blend_time: f32,
    /// Окно, в котором root выравнивается по ragdoll hip (секунды)
    pub mecanim_transition_time: f32,
    /// Ось hip bone, по знаку y которой выбираем "from back" / "from front"
    pub root_alignment: BoneAlignment,
    pub geometry_mask: u32,
    pub nav_sample_distance: f32,
}

impl Default for ReanimationConfig {
    fn default() -> Self {
        Self {
            wait_time: 3.0,
            blend_time: 0.5,
            mecanim_transition_time: 0.1,
            root_alignment: BoneAlignment::ZAxis,
            geometry_mask: COLLISION_MASK_GEOMETRY,
            nav_sample_distance: 25.0,
        }
    }
}

/// Per-state параметры
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorTuning {
    pub idle: IdleTuning,
    pub alerted: AlertedTuning,
    pub patrol: PatrolTuning,
    pub pursuit: PursuitTuning,
    pub attack: AttackTuning,
    pub feeding: FeedingTuning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleTuning {
    /// Диапазон (min, max) для случайной длительности idle
    pub idle_time_range: (f32, f32),
}

impl Default for IdleTuning {
    fn default() -> Self {
        Self { idle_time_range: (5.0, 10.0) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertedTuning {
    pub max_duration: f32,
    pub waypoint_angle_threshold: f32,
    pub threat_angle_threshold: f32,
    pub direction_change_time: f32,
    /// Скорость поворота на месте (градусы/сек)
    pub turn_speed: f32,
}

impl Default for AlertedTuning {
    fn default() -> Self {
        Self {
            max_duration: 3.0,
            waypoint_angle_threshold: 25.0,
            threat_angle_threshold: 10.0,
            direction_change_time: 1.5,
            turn_speed: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatrolTuning {
    pub speed: f32,
    pub turn_on_spot_threshold: f32,
    pub slerp_speed: f32,
}

impl Default for PatrolTuning {
    fn default() -> Self {
        Self {
            speed: 1.0,
            turn_on_spot_threshold: 80.0,
            slerp_speed: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuitTuning {
    pub speed: f32,
    pub slerp_speed: f32,
    pub repath_distance_multiplier: f32,
    pub repath_visual_min_duration: f32,
    pub repath_visual_max_duration: f32,
    pub repath_audio_min_duration: f32,
    pub repath_audio_max_duration: f32,
}

impl Default for PursuitTuning {
    fn default() -> Self {
        Self {
            speed: 1.0,
            slerp_speed: 5.0,
            repath_distance_multiplier: 0.035,
            repath_visual_min_duration: 0.05,
            repath_visual_max_duration: 5.0,
            repath_audio_min_duration: 0.25,
            repath_audio_max_duration: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackTuning {
    pub speed: f32,
    pub stopping_distance: f32,
    pub look_at_weight: f32,
    pub look_at_angle_threshold: f32,
    pub slerp_speed: f32,
}

impl Default for AttackTuning {
    fn default() -> Self {
        Self {
            speed: 2.0,
            stopping_distance: 1.2,
            look_at_weight: 0.7,
            look_at_angle_threshold: 15.0,
            slerp_speed: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedingTuning {
    pub slerp_speed: f32,
    /// Интервал между blood burst во время еды (секунды)
    pub burst_time: f32,
    pub burst_amount: u32,
}

impl Default for FeedingTuning {
    fn default() -> Self {
        Self {
            slerp_speed: 5.0,
            burst_time: 0.1,
            burst_amount: 10,
        }
    }
}
