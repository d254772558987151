//! Pursuit: преследуем committed цель через навигацию
//!
//! Repath к движущейся угрозе по таймеру, масштабируемому дистанцией:
//! `clamp(distance × multiplier, min, max) < timer`.

use crate::ai::context::StateContext;
use crate::ai::state::ZombieState;
use crate::ai::steering::look_rotation;
use crate::ai::BehaviorKind;
use crate::components::{AiTarget, TargetType};
use crate::config::PursuitTuning;
use crate::services::PathStatus;

#[derive(Debug, Clone)]
pub struct PursuitState {
    tuning: PursuitTuning,
    repath_timer: f32,
}

impl PursuitState {
    pub fn new(tuning: PursuitTuning) -> Self {
        Self {
            tuning,
            repath_timer: 0.0,
        }
    }

    /// Repath, если угроза сместилась и таймер истёк
    fn follow(&mut self, ctx: &mut StateContext<'_>, threat: AiTarget, min: f32, max: f32) {
        if ctx.zombie.target.position != threat.position {
            let interval = (threat.distance * self.tuning.repath_distance_multiplier).clamp(min, max);
            if interval < self.repath_timer {
                ctx.set_destination(threat.position);
                self.repath_timer = 0.0;
            }
        }
        ctx.commit(threat);
    }
}

impl ZombieState for PursuitState {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Pursuit
    }

    fn on_enter(&mut self, ctx: &mut StateContext<'_>) {
        ctx.rig.nav_agent_control(true, false);
        ctx.zombie.locomotion.reset();
        ctx.zombie.locomotion.speed = self.tuning.speed;

        let destination = ctx.zombie.target.position;
        ctx.set_destination(destination);
        self.repath_timer = 0.0;
    }

    fn on_update(&mut self, ctx: &mut StateContext<'_>) -> BehaviorKind {
        self.repath_timer += ctx.delta;

        let target = ctx.zombie.target;
        let threats = ctx.zombie.threats;
        let reached = ctx.zombie.target_reached;

        if reached {
            match target.kind {
                TargetType::Audio | TargetType::VisualLight => {
                    ctx.zombie.clear_target();
                    return BehaviorKind::Alerted;
                }
                TargetType::VisualFood => return BehaviorKind::Feeding,
                _ => {}
            }
        }

        if let Some(navigation) = ctx.rig.navigation() {
            let lost_path = navigation.is_path_stale()
                || (!navigation.has_path() && !navigation.path_pending())
                || navigation.path_status() != PathStatus::Complete;
            if lost_path {
                return BehaviorKind::Alerted;
            }

            if navigation.path_pending() {
                ctx.zombie.locomotion.speed = 0.0;
            } else {
                ctx.zombie.locomotion.speed = self.tuning.speed;
                let desired = navigation.desired_velocity();

                let facing_player =
                    target.is(TargetType::VisualPlayer) && threats.visual.is(TargetType::VisualPlayer) && reached;
                if facing_player {
                    ctx.face_target(self.tuning.slerp_speed);
                } else if !reached {
                    ctx.slerp_towards(look_rotation(desired), self.tuning.slerp_speed);
                } else {
                    return BehaviorKind::Alerted;
                }
            }
        }

        if threats.visual.is(TargetType::VisualPlayer) {
            let (min, max) = (self.tuning.repath_visual_min_duration, self.tuning.repath_visual_max_duration);
            self.follow(ctx, threats.visual, min, max);
            if ctx.zombie.in_melee_range {
                return BehaviorKind::Attack;
            }
            return BehaviorKind::Pursuit;
        }

        // Игрок пропал из виду: идём к последней известной позиции
        if target.is(TargetType::VisualPlayer) {
            return BehaviorKind::Pursuit;
        }

        if threats.visual.is(TargetType::VisualLight) {
            match target.kind {
                TargetType::Audio | TargetType::VisualFood => {
                    ctx.commit(threats.visual);
                    return BehaviorKind::Alerted;
                }
                TargetType::VisualLight if target.source == threats.visual.source => {
                    let (min, max) = (self.tuning.repath_visual_min_duration, self.tuning.repath_visual_max_duration);
                    self.follow(ctx, threats.visual, min, max);
                    return BehaviorKind::Pursuit;
                }
                TargetType::VisualLight => {
                    ctx.commit(threats.visual);
                    return BehaviorKind::Alerted;
                }
                _ => {}
            }
        } else if threats.audio.is(TargetType::Audio) {
            match target.kind {
                TargetType::VisualFood => {
                    ctx.commit(threats.audio);
                    return BehaviorKind::Alerted;
                }
                TargetType::Audio if target.source == threats.audio.source => {
                    let (min, max) = (self.tuning.repath_audio_min_duration, self.tuning.repath_audio_max_duration);
                    self.follow(ctx, threats.audio, min, max);
                    return BehaviorKind::Pursuit;
                }
                TargetType::Audio => {
                    ctx.commit(threats.audio);
                    return BehaviorKind::Alerted;
                }
                _ => {}
            }
        }

        BehaviorKind::Pursuit
    }
}
