//! Movement: навигация двигает transform агента
//!
//! - advance_navigation: NavMesh агент → Transform (root motion velocity приходит из animation фазы)
//! - off-mesh link: пока агент на link'е, навигация не двигает его, работает jump routine

use bevy::prelude::*;

pub mod off_mesh;

pub use off_mesh::{jump_curve, JumpStep, OffMeshJump, OffMeshTraversal, JUMP_DURATION, JUMP_HEIGHT};

use crate::ai::systems::sample_animation;
use crate::ai::ZombieSet;
use crate::logger;
use crate::services::ZombieRig;

/// Система: шаг навигации / off-mesh прыжка (Animation фаза, после sample_animation)
pub fn advance_navigation(
    mut agents: Query<(Entity, &mut Transform, &mut ZombieRig, Option<&mut OffMeshTraversal>)>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (agent, mut transform, mut rig, traversal) in agents.iter_mut() {
        let Some(navigation) = rig.navigation_mut() else {
            continue;
        };

        if let Some(mut traversal) = traversal {
            if !navigation.is_enabled() {
                if traversal.is_active() {
                    traversal.cancel();
                    logger::log(&format!("🦘 {:?}: off-mesh jump cancelled", agent));
                }
                continue;
            }

            if !traversal.is_active() {
                if let Some(link) = navigation.current_off_mesh_link() {
                    let generation = traversal.start(transform.translation, link, navigation.base_offset());
                    logger::log(&format!(
                        "🦘 {:?}: off-mesh jump #{} {:?} → {:?}",
                        agent, generation, transform.translation, link.end
                    ));
                }
            }

            match traversal.step(delta) {
                Some(JumpStep::Airborne(position)) => {
                    transform.translation = position;
                    continue;
                }
                Some(JumpStep::Landed) => {
                    navigation.complete_off_mesh_link();
                    continue;
                }
                None => {}
            }
        }

        if let Some(next) = navigation.advance(transform.translation, delta) {
            transform.translation = next;
        }
    }
}

/// Movement Plugin
///
/// Требует `AIPlugin` (system sets).
pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            advance_navigation.after(sample_animation).in_set(ZombieSet::Animation),
        );
    }
}
