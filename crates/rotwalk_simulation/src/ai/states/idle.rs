//! Idle: стоим, ждём угрозу; по таймеру уходим искать waypoint

use rand::Rng;

use crate::ai::context::StateContext;
use crate::ai::state::ZombieState;
use crate::ai::BehaviorKind;
use crate::components::TargetType;
use crate::config::IdleTuning;

#[derive(Debug, Clone)]
pub struct IdleState {
    tuning: IdleTuning,
    /// Длительность idle, выбирается один раз на вход
    idle_time: f32,
    timer: f32,
}

impl IdleState {
    pub fn new(tuning: IdleTuning) -> Self {
        Self {
            tuning,
            idle_time: 0.0,
            timer: 0.0,
        }
    }

    pub fn idle_time(&self) -> f32 {
        self.idle_time
    }
}

impl ZombieState for IdleState {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Idle
    }

    fn on_enter(&mut self, ctx: &mut StateContext<'_>) {
        let (min, max) = self.tuning.idle_time_range;
        self.idle_time = if max > min { ctx.rng.gen_range(min..=max) } else { min };
        self.timer = 0.0;

        ctx.rig.nav_agent_control(true, false);
        ctx.zombie.locomotion.reset();
        ctx.zombie.clear_target();
    }

    fn on_update(&mut self, ctx: &mut StateContext<'_>) -> BehaviorKind {
        let threats = ctx.zombie.threats;

        if threats.visual.is(TargetType::VisualPlayer) {
            ctx.commit(threats.visual);
            return BehaviorKind::Pursuit;
        }
        if threats.visual.is(TargetType::VisualLight) {
            ctx.commit(threats.visual);
            return BehaviorKind::Alerted;
        }
        if threats.audio.is(TargetType::Audio) {
            ctx.commit(threats.audio);
            return BehaviorKind::Alerted;
        }
        if threats.visual.is(TargetType::VisualFood) {
            ctx.commit(threats.visual);
            return BehaviorKind::Pursuit;
        }

        self.timer += ctx.delta;
        if self.timer > self.idle_time {
            ctx.seek_waypoint_and_go(false);
            return BehaviorKind::Alerted;
        }

        BehaviorKind::Idle
    }
}
