//! Attack: ближний бой с видимым игроком
//!
//! Пока игрок в melee range: поворот к цели + новый случайный attack type каждый tick.
//! Look-at IK вес плавно растёт, пока цель в узком конусе перед агентом.

use bevy::prelude::*;
use rand::Rng;

use crate::ai::context::StateContext;
use crate::ai::state::ZombieState;
use crate::ai::steering::unsigned_angle_deg;
use crate::ai::BehaviorKind;
use crate::components::TargetType;
use crate::config::AttackTuning;

#[derive(Debug, Clone)]
pub struct AttackState {
    tuning: AttackTuning,
    look_at_weight: f32,
}

impl AttackState {
    pub fn new(tuning: AttackTuning) -> Self {
        Self {
            tuning,
            look_at_weight: 0.0,
        }
    }

    pub fn look_at_weight(&self) -> f32 {
        self.look_at_weight
    }

    fn roll_attack_type(ctx: &mut StateContext<'_>) {
        ctx.zombie.locomotion.attack_type = ctx.rng.gen_range(1..100);
    }
}

impl ZombieState for AttackState {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Attack
    }

    fn on_enter(&mut self, ctx: &mut StateContext<'_>) {
        ctx.rig.nav_agent_control(true, false);
        ctx.zombie.locomotion.seeking = 0;
        ctx.zombie.locomotion.feeding = false;
        Self::roll_attack_type(ctx);
        self.look_at_weight = 0.0;
    }

    fn on_update(&mut self, ctx: &mut StateContext<'_>) -> BehaviorKind {
        let target_position = ctx.zombie.target.position;
        ctx.zombie.locomotion.speed = if ctx.position().distance(target_position) < self.tuning.stopping_distance {
            0.0
        } else {
            self.tuning.speed
        };

        let visual = ctx.zombie.threats.visual;
        if visual.is(TargetType::VisualPlayer) {
            ctx.commit(visual);
            if !ctx.zombie.in_melee_range {
                return BehaviorKind::Pursuit;
            }
            ctx.face_target(self.tuning.slerp_speed);
            Self::roll_attack_type(ctx);
            return BehaviorKind::Attack;
        }

        ctx.face_target(self.tuning.slerp_speed);
        BehaviorKind::Alerted
    }

    fn on_exit(&mut self, ctx: &mut StateContext<'_>) {
        ctx.zombie.locomotion.attack_type = 0;
    }

    fn on_animation_ik_updated(&mut self, ctx: &mut StateContext<'_>) {
        let target = ctx.zombie.target.position;
        let angle = unsigned_angle_deg(ctx.forward(), target - ctx.position());

        let goal = if angle < self.tuning.look_at_angle_threshold {
            self.tuning.look_at_weight
        } else {
            0.0
        };
        let t = ctx.delta.clamp(0.0, 1.0);
        self.look_at_weight += (goal - self.look_at_weight) * t;

        let weight = self.look_at_weight;
        if let Some(animation) = ctx.rig.animation_mut() {
            animation.set_look_at(target + Vec3::Y, weight);
        }
    }
}
