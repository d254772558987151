//! ROTWALK Simulation Core
//!
//! ECS-симуляция зомби-агентов на Bevy 0.16 (headless).
//!
//! Слои:
//! - ai: perception + behavior FSM (Idle/Alerted/Patrol/Pursuit/Attack/Feeding)
//! - combat: урон по частям тела + bone control (ragdoll / reanimation)
//! - movement: навигация и off-mesh прыжки
//! - services: traits коллабораторов (навигация, физика, animator) + headless реализации
//!
//! Хост (движок) подключает свои коллабораторы и шлёт события
//! (SensorEvent, AnimationLinkEvent, DamageEvent); симуляция отвечает
//! BehaviorChanged / BloodBurst и rapier компонентами на частях тела.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub mod ai;
pub mod collision_layers;
pub mod combat;
pub mod components;
pub mod config;
pub mod logger;
pub mod movement;
pub mod services;
pub mod spawn;

pub use ai::{AIPlugin, AnimationLinkEvent, BehaviorChanged, BehaviorKind, BehaviorMachine, BloodBurst, SensorEvent, ZombieSet};
pub use combat::{BoneControl, BoneControlMode, CombatPlugin, DamageEvent};
pub use components::*;
pub use config::{ConfigError, ZombieConfig};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use movement::MovementPlugin;
pub use services::{SceneServices, ZombieRig};
pub use spawn::{spawn_body_part, spawn_zombie};

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .init_resource::<SceneServices>()
            .add_plugins((AIPlugin, CombatPlugin, MovementPlugin));

        // Seed по умолчанию, если хост не вставил свой
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции (все плагины, 60Hz FixedUpdate)
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .add_plugins(SimulationPlugin);

    app
}
