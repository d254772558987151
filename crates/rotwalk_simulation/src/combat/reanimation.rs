//! Reanimation: ragdoll → animated
//!
//! Два шага:
//! - `advance_routine` (LogicTick): ждёт `wait_time`, потом capture snapshots и старт RagdollToAnimated
//! - `reconcile_pose` (PostAnimation, после того как animator выдал позу): выравнивание root
//!   по ragdoll hip в окне mecanim transition, затем blend snapshot → animated

use bevy::prelude::*;

use super::bone_control::{BodyPartSnapshot, BoneControl, BoneControlMode, RagdollCommand};
use crate::ai::context::{EffectBuffer, StateContext};
use crate::ai::events::{BehaviorChanged, BloodBurst};
use crate::ai::machine::BehaviorMachine;
use crate::ai::steering::yaw_between;
use crate::ai::BehaviorKind;
use crate::components::Zombie;
use crate::logger;
use crate::services::{params, BoneId, SceneServices, ZombieRig};
use crate::DeterministicRng;

/// Подъём origin floor probe над кандидатом root
const FLOOR_PROBE_LIFT: f32 = 0.25;

/// Шаг reanimation routine. `true`: snapshots сняты, начался RagdollToAnimated
pub fn advance_routine(
    agent: Entity,
    zombie: &Zombie,
    transform: &Transform,
    rig: &mut ZombieRig,
    bones: &mut BoneControl,
    now: f32,
) -> bool {
    let Some(routine) = bones.routine() else {
        return false;
    };

    if !zombie.vitals.is_alive() {
        logger::log(&format!("🦴 {:?}: reanimation #{} dropped, agent is dead", agent, routine.generation));
        bones.cancel_reanimation();
        return false;
    }

    if bones.mode() != BoneControlMode::Ragdoll {
        logger::log_warning(&format!(
            "🦴 {:?}: stale reanimation #{} dropped (mode {:?})",
            agent,
            routine.generation,
            bones.mode()
        ));
        bones.cancel_reanimation();
        return false;
    }

    if rig.animation().is_none() {
        logger::log_warning(&format!(
            "🦴 {:?}: reanimation #{} dropped, no animator attached",
            agent, routine.generation
        ));
        bones.cancel_reanimation();
        return false;
    }

    if now - routine.started_at < bones.config.wait_time {
        return false;
    }

    bones.cancel_reanimation();
    if let Err(error) = bones.transition(BoneControlMode::RagdollToAnimated) {
        logger::log_error(&format!("🦴 {:?}: {}", agent, error));
        return false;
    }
    bones.commands.push(RagdollCommand::SetKinematic(true));
    bones.ragdoll_end_time = now;

    let Some(animation) = rig.animation_mut() else {
        return false;
    };

    bones.snapshots = animation
        .tracked_bones()
        .into_iter()
        .filter_map(|bone| {
            animation.bone_world_transform(bone).map(|pose| BodyPartSnapshot {
                bone,
                position: pose.translation,
                rotation: pose.rotation,
            })
        })
        .collect();

    let bone_position = |bone: BoneId| animation.bone_world_transform(bone).map(|pose| pose.translation);
    let fallback = transform.translation;
    bones.ragdoll_head_position = bone_position(BoneId::HEAD).unwrap_or(fallback);
    bones.ragdoll_hip_position = bone_position(BoneId::HIPS).unwrap_or(fallback);
    bones.ragdoll_feet_position = match (bone_position(BoneId::LEFT_FOOT), bone_position(BoneId::RIGHT_FOOT)) {
        (Some(left), Some(right)) => (left + right) * 0.5,
        (Some(foot), None) | (None, Some(foot)) => foot,
        (None, None) => fallback,
    };

    let hips_rotation = animation
        .bone_world_transform(BoneId::HIPS)
        .map(|pose| pose.rotation)
        .unwrap_or(transform.rotation);
    let from_back = bones.config.root_alignment.forward_test(hips_rotation) >= 0.0;

    animation.set_enabled(true);
    animation.set_trigger(if from_back {
        params::REANIMATE_FROM_BACK
    } else {
        params::REANIMATE_FROM_FRONT
    });

    logger::log_info(&format!(
        "🦴 {:?}: reanimation #{} captured {} bones, getting up from {}",
        agent,
        routine.generation,
        bones.snapshots.len(),
        if from_back { "back" } else { "front" }
    ));
    true
}

/// Pose reconciliation во время RagdollToAnimated. `true`: blend завершён, агент снова Animated
pub fn reconcile_pose(
    agent: Entity,
    transform: &mut Transform,
    rig: &mut ZombieRig,
    bones: &mut BoneControl,
    services: &SceneServices,
    now: f32,
) -> bool {
    if bones.mode() != BoneControlMode::RagdollToAnimated {
        return false;
    }

    if bones.in_transition_window(now) {
        align_root(agent, transform, rig, bones, services);
    }

    let blend = bones.blend_factor(now);
    let Some(animation) = rig.animation_mut() else {
        return false;
    };
    for snapshot in &bones.snapshots {
        let Some(live) = animation.bone_world_transform(snapshot.bone) else {
            continue;
        };
        let position = (snapshot.bone == BoneId::HIPS).then(|| snapshot.position.lerp(live.translation, blend));
        animation.set_bone_world_pose(snapshot.bone, position, snapshot.rotation.slerp(live.rotation, blend));
    }

    if blend < 1.0 {
        return false;
    }

    if let Err(error) = bones.transition(BoneControlMode::Animated) {
        logger::log_error(&format!("🦴 {:?}: {}", agent, error));
        return false;
    }
    rig.set_navigation_enabled(true);
    bones.commands.push(RagdollCommand::SetSolid(true));
    bones.snapshots.clear();

    logger::log_info(&format!("🦴 {:?}: reanimation finished at {:.2}s", agent, now));
    true
}

/// Root агента → под ragdoll hip: floor probe, snap на NavMesh, yaw по оси head→feet
fn align_root(
    agent: Entity,
    transform: &mut Transform,
    rig: &ZombieRig,
    bones: &BoneControl,
    services: &SceneServices,
) {
    let Some(animation) = rig.animation() else {
        return;
    };
    let Some(animated_hips) = animation.bone_world_transform(BoneId::HIPS) else {
        return;
    };

    let mut root = transform.translation + (bones.ragdoll_hip_position - animated_hips.translation);

    if let Some(physics) = services.physics() {
        let floor = physics
            .raycast_all(
                root + Vec3::Y * FLOOR_PROBE_LIFT,
                Vec3::NEG_Y,
                f32::MAX,
                bones.config.geometry_mask,
            )
            .into_iter()
            .filter(|hit| hit.collider != agent && services.registry.lookup(hit.collider) != Some(agent))
            .map(|hit| hit.point.y)
            .reduce(f32::max);
        if let Some(height) = floor {
            root.y = height;
        }
    }

    if let Some(on_mesh) = services
        .nav_mesh()
        .and_then(|nav_mesh| nav_mesh.sample_position(root, bones.config.nav_sample_distance))
    {
        root = on_mesh;
    }

    let base_offset = rig.navigation().map_or(0.0, |navigation| navigation.base_offset());
    transform.translation = root + Vec3::Y * base_offset;

    let ragdolled = bones.ragdoll_head_position - bones.ragdoll_feet_position;
    let feet = [BoneId::LEFT_FOOT, BoneId::RIGHT_FOOT]
        .into_iter()
        .filter_map(|bone| animation.bone_world_transform(bone))
        .map(|pose| pose.translation)
        .collect::<Vec<_>>();
    let Some(head) = animation.bone_world_transform(BoneId::HEAD) else {
        return;
    };
    if feet.is_empty() {
        return;
    }
    let mean_feet = feet.iter().copied().sum::<Vec3>() / feet.len() as f32;

    if let Some(correction) = yaw_between(head.translation - mean_feet, ragdolled) {
        transform.rotation *= correction;
    }
}

/// Система: reanimation routines (LogicTick, после behavior update)
pub fn advance_reanimation(
    mut agents: Query<(Entity, &Zombie, &Transform, &mut ZombieRig, &mut BoneControl)>,
    time: Res<Time>,
) {
    let now = time.elapsed_secs();
    for (agent, zombie, transform, mut rig, mut bones) in agents.iter_mut() {
        if bones.is_reanimating() {
            advance_routine(agent, zombie, transform, &mut rig, &mut bones, now);
        }
    }
}

/// Система: pose reconciliation + force Alerted по завершении blend (PostAnimation)
#[allow(clippy::too_many_arguments)]
pub fn reconcile_reanimation_pose(
    mut agents: Query<(
        Entity,
        &mut Zombie,
        &mut Transform,
        &mut ZombieRig,
        &mut BehaviorMachine,
        &mut BoneControl,
    )>,
    services: Res<SceneServices>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time>,
    mut blood: EventWriter<BloodBurst>,
    mut transitions: EventWriter<BehaviorChanged>,
) {
    let now = time.elapsed_secs();
    let mut effects = EffectBuffer::default();

    for (agent, mut zombie, mut transform, mut rig, mut machine, mut bones) in agents.iter_mut() {
        if bones.mode() != BoneControlMode::RagdollToAnimated {
            continue;
        }
        if !reconcile_pose(agent, &mut transform, &mut rig, &mut bones, &services, now) {
            continue;
        }

        let mut ctx = StateContext {
            agent,
            zombie: &mut zombie,
            transform: &mut transform,
            rig: &mut rig,
            services: &services,
            rng: &mut rng.rng,
            delta: time.delta_secs(),
            now,
            effects: &mut effects,
        };
        machine.force(BehaviorKind::Alerted, &mut ctx);
    }

    effects.flush(&mut blood, &mut transitions);
}
