//! AI зомби: perception → behavior FSM → animation hooks
//!
//! Один agent tick разбит на фазы (FixedUpdate, строго по порядку):
//! 1. `PhysicsTick`: сброс угроз, sensor overlaps, target/melee триггеры
//! 2. `LogicTick`: урон, update активного state, reanimation routine
//! 3. `Animation`: animation links, sampling позы (root motion), навигация (`movement`)
//! 4. `PostAnimation`: IK hooks, выравнивание root после ragdoll

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub mod context;
pub mod events;
pub mod machine;
pub mod perception;
pub mod state;
pub mod states;
pub mod steering;
pub mod systems;

#[cfg(test)]
mod machine_tests;
#[cfg(test)]
pub(crate) mod testing;

pub use context::{EffectBuffer, StateContext};
pub use events::{AnimationLinkEvent, BehaviorChanged, BloodBurst, SensorEvent, SensorPhase};
pub use machine::{BehaviorMachine, BehaviorSetupError};
pub use state::{apply_root_motion, ZombieState};
pub use states::*;

/// Behavior state зомби
///
/// Дискриминант = значение animator параметра `State`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum BehaviorKind {
    /// Нет активного state (ragdoll / машина не запущена)
    #[default]
    None = 0,
    Idle = 1,
    Alerted = 2,
    Patrol = 3,
    Attack = 4,
    Feeding = 5,
    Pursuit = 6,
}

impl BehaviorKind {
    pub fn animator_code(self) -> i32 {
        self as i32
    }
}

/// Фазы agent tick
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZombieSet {
    PhysicsTick,
    LogicTick,
    Animation,
    PostAnimation,
}

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate (детерминизм).
/// Combat (урон, reanimation) встраивается в те же фазы из `CombatPlugin`.
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SensorEvent>()
            .add_event::<AnimationLinkEvent>()
            .add_event::<BehaviorChanged>()
            .add_event::<BloodBurst>();

        app.configure_sets(
            FixedUpdate,
            (
                ZombieSet::PhysicsTick,
                ZombieSet::LogicTick,
                ZombieSet::Animation,
                ZombieSet::PostAnimation,
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                systems::register_agent_colliders,
                systems::begin_physics_tick,
                systems::dispatch_sensor_events,
                systems::update_target_triggers,
            )
                .chain()
                .in_set(ZombieSet::PhysicsTick),
        );

        app.add_systems(FixedUpdate, systems::run_behavior.in_set(ZombieSet::LogicTick));

        app.add_systems(
            FixedUpdate,
            (systems::apply_animation_links, systems::sample_animation)
                .chain()
                .in_set(ZombieSet::Animation),
        );

        app.add_systems(FixedUpdate, systems::update_ik.in_set(ZombieSet::PostAnimation));
    }
}
