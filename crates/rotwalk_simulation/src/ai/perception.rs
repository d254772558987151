//! Perception / threat arbitration
//!
//! Приоритет (асимметричный, сохраняется буквально):
//! - Player: всегда, если ближе уже записанного player (нужен LOS)
//! - Light: только пока нет player угрозы
//! - Sound: независимый AudioThreat, перезапись только более близким
//! - Food: только без player/light/audio угроз, при голоде и с LOS

use bevy::prelude::*;

use super::context::StateContext;
use super::events::SensorPhase;
use super::steering::unsigned_angle_deg;
use crate::collision_layers::{COLLISION_MASK_PLAYER_LOS, COLLISION_MASK_VISUAL_LOS};
use crate::components::{Appetite, Percept, StimulusKind, TargetType};

/// Обработать один overlap (Enter/Stay). Exit для угроз игнорируется.
pub fn evaluate(ctx: &mut StateContext<'_>, phase: SensorPhase, percept: &Percept) {
    if phase == SensorPhase::Exit {
        return;
    }

    let sensor = ctx.sensor_position();
    let distance = sensor.distance(percept.position);
    let visual = ctx.zombie.threats.visual;

    match percept.kind {
        StimulusKind::Player => {
            let stronger_recorded = visual.is(TargetType::VisualPlayer) && distance >= visual.distance;
            if !stronger_recorded && collider_is_visible(ctx, percept, COLLISION_MASK_PLAYER_LOS) {
                ctx.zombie.threats.visual.set(
                    TargetType::VisualPlayer,
                    Some(percept.source),
                    percept.position,
                    distance,
                    ctx.now,
                );
            }
        }
        StimulusKind::FlashLight { depth } => {
            if visual.is(TargetType::VisualPlayer) || depth <= 0.0 {
                return;
            }
            let aggravation = distance / depth;
            let senses = ctx.zombie.senses;
            if aggravation <= senses.sight && aggravation <= senses.intelligence {
                ctx.zombie.threats.visual.set(
                    TargetType::VisualLight,
                    Some(percept.source),
                    percept.position,
                    distance,
                    ctx.now,
                );
            }
        }
        StimulusKind::SoundEmitter { radius } => {
            if radius <= 0.0 {
                return;
            }
            let mut factor = distance / radius;
            factor += factor * (1.0 - ctx.zombie.senses.hearing);
            if factor > 1.0 {
                return;
            }
            if distance < ctx.zombie.threats.audio.distance {
                ctx.zombie.threats.audio.set(
                    TargetType::Audio,
                    Some(percept.source),
                    percept.position,
                    distance,
                    ctx.now,
                );
            }
        }
        StimulusKind::Food => {
            let gated = visual.is(TargetType::VisualPlayer)
                || visual.is(TargetType::VisualLight)
                || !ctx.zombie.threats.audio.is_none()
                || ctx.zombie.appetite.satisfaction > Appetite::SATED;
            if gated || distance >= visual.distance {
                return;
            }
            if collider_is_visible(ctx, percept, COLLISION_MASK_VISUAL_LOS) {
                ctx.zombie.threats.visual.set(
                    TargetType::VisualFood,
                    Some(percept.source),
                    percept.position,
                    distance,
                    ctx.now,
                );
            }
        }
    }
}

/// Line of sight: внутри fov/2 и ближайшее попадание луча: сам источник
///
/// Луч длиной `sensor_radius × sight`. Попадания в собственные части тела агента пропускаются.
/// Без physics коллаборатора источник считается невидимым.
pub fn collider_is_visible(ctx: &StateContext<'_>, percept: &Percept, mask: u32) -> bool {
    let head = ctx.sensor_position();
    let direction = percept.position - head;

    if unsigned_angle_deg(direction, ctx.forward()) > ctx.zombie.senses.fov * 0.5 {
        return false;
    }

    let Some(physics) = ctx.services.physics() else {
        return false;
    };

    let range = ctx.zombie.sensor.radius * ctx.zombie.senses.sight;
    let hits = physics.raycast_all(head, direction, range, mask);

    let closest = hits
        .iter()
        .filter(|hit| !is_own_collider(ctx, hit.collider))
        .min_by(|a, b| a.distance.total_cmp(&b.distance));

    closest.is_some_and(|hit| hit.collider == percept.source)
}

fn is_own_collider(ctx: &StateContext<'_>, collider: Entity) -> bool {
    collider == ctx.agent || ctx.services.registry.lookup(collider) == Some(ctx.agent)
}
