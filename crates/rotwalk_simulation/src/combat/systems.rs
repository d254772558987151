//! Bone control → rapier rigid bodies
//!
//! BoneControl копит `RagdollCommand`, здесь они превращаются в компоненты bevy_rapier3d:
//! - SetKinematic → `RigidBody` всех частей тела агента
//! - Impulse → `ExternalImpulse` на часть
//! - SetSolid → `ColliderDisabled` на основном collider агента

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::bone_control::{BoneControl, RagdollCommand};
use super::damage::push_damage_params;
use crate::components::{BodyPart, Zombie};
use crate::services::ZombieRig;

/// Система: применить накопленные RagdollCommand (конец tick)
pub fn apply_ragdoll_commands(
    mut commands: Commands,
    mut agents: Query<(Entity, &mut BoneControl)>,
    parts: Query<(Entity, &BodyPart)>,
) {
    for (agent, mut bones) in agents.iter_mut() {
        if bones.commands.is_empty() {
            continue;
        }

        for command in std::mem::take(&mut bones.commands) {
            match command {
                RagdollCommand::SetKinematic(kinematic) => {
                    let body = if kinematic {
                        RigidBody::KinematicPositionBased
                    } else {
                        RigidBody::Dynamic
                    };
                    for (part, _) in parts.iter().filter(|(_, part)| part.owner == agent) {
                        commands.entity(part).try_insert(body);
                    }
                }
                RagdollCommand::Impulse { part, impulse } => {
                    if parts.get(part).is_ok() {
                        commands.entity(part).try_insert(ExternalImpulse {
                            impulse,
                            torque_impulse: Vec3::ZERO,
                        });
                    }
                }
                RagdollCommand::SetSolid(solid) => {
                    if solid {
                        commands.entity(agent).try_remove::<ColliderDisabled>();
                    } else {
                        commands.entity(agent).try_insert(ColliderDisabled);
                    }
                }
            }
        }
    }
}

/// Система: стартовые damage параметры animator (crawl seeding при spawn)
pub fn init_damage_params(mut agents: Query<(&Zombie, &mut ZombieRig), Added<BoneControl>>) {
    for (zombie, mut rig) in agents.iter_mut() {
        if let Some(animation) = rig.animation_mut() {
            push_damage_params(animation, &zombie.vitals);
        }
    }
}
