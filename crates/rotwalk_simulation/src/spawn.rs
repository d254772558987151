//! Spawn helpers: зомби-агент + ragdoll части тела
//!
//! Placement и количество агентов: забота хоста. Здесь только сборка entity
//! и стартовый разброс (голод, повреждённые ноги).

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::Rng;

use crate::ai::BehaviorMachine;
use crate::combat::BoneControl;
use crate::components::{BodyPart, BodyRegion, PatrolRoute, Zombie};
use crate::config::ZombieConfig;
use crate::movement::OffMeshTraversal;
use crate::services::ZombieRig;

/// Lower body damage для зомби, который стартует ползком
pub const SPAWN_CRAWLER_DAMAGE: u32 = 76;

/// Стартовый разброс: половина сытые (1.0), остальные ∈ [0, 0.9); 20% с повреждёнными ногами
pub fn seed_zombie(zombie: &mut Zombie, rng: &mut impl Rng) {
    zombie.appetite.satisfaction = if rng.gen_bool(0.5) {
        1.0
    } else {
        rng.gen_range(0.0..0.9)
    };

    if rng.gen_range(0..10) > 7 {
        zombie.vitals.lower_body_damage = SPAWN_CRAWLER_DAMAGE.min(zombie.vitals.max_body_damage);
    }
}

/// Собрать агента из конфига (без spawn'а, удобно для тестов)
pub fn zombie_from_config(config: &ZombieConfig, waypoints: Vec<Vec3>, rng: &mut impl Rng) -> Zombie {
    let mut zombie = Zombie::from_config(config);
    zombie.patrol = PatrolRoute::new(waypoints, config.random_patrol);
    seed_zombie(&mut zombie, rng);
    zombie
}

/// Spawn зомби-агента со всеми компонентами AI / combat / movement
///
/// AgentRegistry заполняется системой `register_agent_colliders` на следующем tick.
pub fn spawn_zombie(
    commands: &mut Commands,
    config: &ZombieConfig,
    transform: Transform,
    rig: ZombieRig,
    waypoints: Vec<Vec3>,
    rng: &mut impl Rng,
) -> Entity {
    let zombie = zombie_from_config(config, waypoints, rng);

    let agent = commands
        .spawn((
            zombie,
            transform,
            rig,
            BehaviorMachine::standard(config.initial_state, &config.behavior),
            BoneControl::new(config.reanimation.clone()),
            OffMeshTraversal::default(),
            // Основной collider (выключается на время ragdoll)
            Collider::capsule_y(0.6, 0.3),
        ))
        .id();

    crate::log(&format!(
        "🧟 Spawned zombie {:?} at {:?} (initial {:?})",
        agent, transform.translation, config.initial_state
    ));
    agent
}

/// Spawn rigid body части скелета (kinematic пока агент Animated)
pub fn spawn_body_part(
    commands: &mut Commands,
    owner: Entity,
    region: BodyRegion,
    transform: Transform,
    radius: f32,
) -> Entity {
    commands
        .spawn((
            BodyPart { owner, region },
            transform,
            RigidBody::KinematicPositionBased,
            Collider::ball(radius),
        ))
        .id()
}
