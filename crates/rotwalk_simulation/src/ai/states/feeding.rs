//! Feeding: едим, пока не насытимся или не отвлекут
//!
//! Пока cinematic слой animator'а в feeding анимации: appetite пополняется,
//! с интервалом `burst_time` летит blood burst у головы.

use bevy::prelude::*;

use crate::ai::context::StateContext;
use crate::ai::state::ZombieState;
use crate::ai::BehaviorKind;
use crate::components::TargetType;
use crate::config::FeedingTuning;
use crate::services::{params, BoneId};

#[derive(Debug, Clone)]
pub struct FeedingState {
    tuning: FeedingTuning,
    timer: f32,
}

impl FeedingState {
    pub fn new(tuning: FeedingTuning) -> Self {
        Self { tuning, timer: 0.0 }
    }

    fn is_eating(ctx: &StateContext<'_>) -> bool {
        ctx.rig
            .animation()
            .and_then(|animation| animation.current_state(params::CINEMATIC_LAYER))
            .is_some_and(|state| state == params::FEEDING_STATE || state == params::CRAWL_FEEDING_STATE)
    }

    fn head_position(ctx: &StateContext<'_>) -> Option<Vec3> {
        ctx.rig
            .animation()
            .and_then(|animation| animation.bone_world_transform(BoneId::HEAD))
            .map(|head| head.translation)
    }
}

impl ZombieState for FeedingState {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Feeding
    }

    fn on_enter(&mut self, ctx: &mut StateContext<'_>) {
        self.timer = 0.0;
        ctx.rig.nav_agent_control(true, false);
        ctx.zombie.locomotion.reset();
        ctx.zombie.locomotion.feeding = true;
    }

    fn on_update(&mut self, ctx: &mut StateContext<'_>) -> BehaviorKind {
        self.timer += ctx.delta;

        if ctx.zombie.appetite.is_sated() {
            if ctx.seek_waypoint(false).is_none() {
                ctx.zombie.clear_target();
            }
            return BehaviorKind::Alerted;
        }

        let threats = ctx.zombie.threats;
        if !threats.visual.is_none() && !threats.visual.is(TargetType::VisualFood) {
            ctx.commit(threats.visual);
            return BehaviorKind::Alerted;
        }
        if threats.audio.is(TargetType::Audio) {
            ctx.commit(threats.audio);
            return BehaviorKind::Alerted;
        }

        if Self::is_eating(ctx) {
            ctx.zombie.appetite.replenish(ctx.delta);

            if self.timer > self.tuning.burst_time {
                let position = Self::head_position(ctx).unwrap_or_else(|| ctx.sensor_position());
                ctx.emit_blood(position, self.tuning.burst_amount);
                self.timer = 0.0;
            }
        }

        ctx.face_target(self.tuning.slerp_speed);

        // Подтягиваем голову к еде
        if let Some(head) = Self::head_position(ctx) {
            let head_to_target = ctx.zombie.target.position - head;
            ctx.transform.translation += head_to_target * ctx.delta;
        }

        BehaviorKind::Feeding
    }

    fn on_exit(&mut self, ctx: &mut StateContext<'_>) {
        ctx.zombie.locomotion.feeding = false;
    }
}
