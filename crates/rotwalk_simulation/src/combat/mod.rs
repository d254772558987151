//! Combat: урон по частям тела + bone control (ragdoll / reanimation)
//!
//! Bone control: второй state machine поверх behavior FSM:
//! Animated → Ragdoll → RagdollToAnimated → Animated.
//! Ragdoll замораживает BehaviorMachine, конец reanimation форсирует Alerted.
//!
//! Фазы (FixedUpdate, те же `ZombieSet` что у AI):
//! 1. LogicTick: process_damage_events → (run_behavior) → advance_reanimation
//! 2. PostAnimation: (update_ik) → reconcile_reanimation_pose → apply_ragdoll_commands

use bevy::prelude::*;

pub mod bone_control;
pub mod damage;
pub mod reanimation;
pub mod systems;

#[cfg(test)]
mod damage_tests;

pub use bone_control::{
    BodyPartSnapshot, BoneAlignment, BoneControl, BoneControlError, BoneControlMode, RagdollCommand,
    ReanimationRoutine,
};
pub use damage::{apply_damage, hit_type, push_damage_params, DamageEvent, Hit, HIT_BLOOD_AMOUNT};
pub use reanimation::{advance_routine, reconcile_pose};

use crate::ai::systems::{run_behavior, update_ik};
use crate::ai::ZombieSet;

/// Combat Plugin
///
/// Требует `AIPlugin` (system sets + BehaviorChanged/BloodBurst events).
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DamageEvent>();

        app.add_systems(
            FixedUpdate,
            (
                systems::init_damage_params.before(damage::process_damage_events),
                damage::process_damage_events.before(run_behavior),
                reanimation::advance_reanimation.after(run_behavior),
            )
                .in_set(ZombieSet::LogicTick),
        );

        app.add_systems(
            FixedUpdate,
            (
                reanimation::reconcile_reanimation_pose,
                systems::apply_ragdoll_commands,
            )
                .chain()
                .after(update_ik)
                .in_set(ZombieSet::PostAnimation),
        );
    }
}
