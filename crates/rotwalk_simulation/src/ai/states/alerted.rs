//! Alerted: крутимся на месте, ищем источник угрозы или направление к waypoint

use rand::Rng;

use crate::ai::context::StateContext;
use crate::ai::state::ZombieState;
use crate::ai::steering::{sign, signed_angle_deg};
use crate::ai::BehaviorKind;
use crate::components::TargetType;
use crate::config::AlertedTuning;

#[derive(Debug, Clone)]
pub struct AlertedState {
    tuning: AlertedTuning,
    /// Обратный отсчёт до принудительного поиска waypoint
    timer: f32,
    direction_change_timer: f32,
}

impl AlertedState {
    pub fn new(tuning: AlertedTuning) -> Self {
        Self {
            timer: tuning.max_duration,
            direction_change_timer: 0.0,
            tuning,
        }
    }

    fn direction_change_due(&self) -> bool {
        self.direction_change_timer > self.tuning.direction_change_time
    }

    fn random_direction(ctx: &mut StateContext<'_>) -> i32 {
        sign(ctx.rng.gen_range(-1.0..1.0))
    }
}

impl ZombieState for AlertedState {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Alerted
    }

    fn on_enter(&mut self, ctx: &mut StateContext<'_>) {
        ctx.rig.nav_agent_control(true, false);
        ctx.zombie.locomotion.reset();

        self.timer = self.tuning.max_duration;
        self.direction_change_timer = 0.0;
    }

    fn on_update(&mut self, ctx: &mut StateContext<'_>) -> BehaviorKind {
        self.timer -= ctx.delta;
        self.direction_change_timer += ctx.delta;

        if self.timer <= 0.0 {
            ctx.seek_waypoint_and_go(false);
            self.timer = self.tuning.max_duration;
        }

        let threats = ctx.zombie.threats;

        if threats.visual.is(TargetType::VisualPlayer) {
            ctx.commit(threats.visual);
            return BehaviorKind::Pursuit;
        }
        if threats.audio.is(TargetType::Audio) {
            ctx.commit(threats.audio);
            self.timer = self.tuning.max_duration;
        }
        if threats.visual.is(TargetType::VisualLight) {
            ctx.commit(threats.visual);
            self.timer = self.tuning.max_duration;
        }
        if threats.audio.is_none() && threats.visual.is(TargetType::VisualFood) && ctx.zombie.target.is_none() {
            ctx.commit(threats.visual);
            return BehaviorKind::Pursuit;
        }

        let target = ctx.zombie.target;
        let chasing_stimulus = target.is(TargetType::Audio) || target.is(TargetType::VisualLight);
        let path_pending = ctx.rig.navigation().map_or(true, |navigation| navigation.path_pending());

        if chasing_stimulus && !ctx.zombie.target_reached {
            let angle = ctx.signed_angle_to(target.position);

            if target.is(TargetType::Audio) && angle.abs() < self.tuning.threat_angle_threshold {
                return BehaviorKind::Pursuit;
            }

            if self.direction_change_due() {
                let smart = ctx.rng.gen::<f32>() < ctx.zombie.senses.intelligence;
                ctx.zombie.locomotion.seeking = if smart {
                    sign(angle)
                } else {
                    Self::random_direction(ctx)
                };
                self.direction_change_timer = 0.0;
            }
        } else if target.is(TargetType::Waypoint) && !path_pending {
            if ctx.zombie.vitals.is_crawling() {
                ctx.zombie.locomotion.speed = 0.0;
            }

            let steering = ctx
                .rig
                .navigation()
                .map(|navigation| navigation.steering_target())
                .unwrap_or(target.position);
            let angle = signed_angle_deg(ctx.forward(), steering - ctx.position());

            if angle.abs() < self.tuning.waypoint_angle_threshold {
                return BehaviorKind::Patrol;
            }

            if self.direction_change_due() {
                ctx.zombie.locomotion.seeking = sign(angle);
                self.direction_change_timer = 0.0;
            }
        } else if self.direction_change_due() {
            ctx.zombie.locomotion.seeking = Self::random_direction(ctx);
            self.direction_change_timer = 0.0;
        }

        if !ctx.zombie.root_motion.use_root_rotation() {
            let turn = self.tuning.turn_speed * ctx.zombie.locomotion.seeking as f32 * ctx.delta;
            ctx.transform.rotate_y(turn.to_radians());
        }

        BehaviorKind::Alerted
    }
}
