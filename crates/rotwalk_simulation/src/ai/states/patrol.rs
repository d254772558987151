//! Patrol: идём по waypoint network, реагируем на угрозы

use crate::ai::context::StateContext;
use crate::ai::state::ZombieState;
use crate::ai::steering::{look_rotation, unsigned_angle_deg};
use crate::ai::BehaviorKind;
use crate::components::TargetType;
use crate::config::PatrolTuning;
use crate::services::PathStatus;

#[derive(Debug, Clone)]
pub struct PatrolState {
    tuning: PatrolTuning,
}

impl PatrolState {
    pub fn new(tuning: PatrolTuning) -> Self {
        Self { tuning }
    }
}

impl ZombieState for PatrolState {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Patrol
    }

    fn on_enter(&mut self, ctx: &mut StateContext<'_>) {
        ctx.rig.nav_agent_control(true, false);
        ctx.zombie.locomotion.reset();
        ctx.zombie.locomotion.speed = self.tuning.speed;

        ctx.seek_waypoint_and_go(false);
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
            // Голод должен перевесить расстояние до еды
            let hunger = 1.0 - ctx.zombie.appetite.satisfaction;
            let remoteness = threats.visual.distance / ctx.zombie.sensor.radius;
            if hunger > remoteness {
                ctx.commit(threats.visual);
                return BehaviorKind::Pursuit;
            }
        }

        let Some(navigation) = ctx.rig.navigation() else {
            return BehaviorKind::Patrol;
        };

        if navigation.path_pending() {
            ctx.zombie.locomotion.speed = 0.0;
            return BehaviorKind::Patrol;
        }
        ctx.zombie.locomotion.speed = self.tuning.speed;

        let desired = navigation.desired_velocity();
        let needs_repath = navigation.is_path_stale()
            || !navigation.has_path()
            || navigation.path_status() != PathStatus::Complete;

        if unsigned_angle_deg(ctx.forward(), desired) > self.tuning.turn_on_spot_threshold {
            return BehaviorKind::Alerted;
        }

        ctx.slerp_towards(look_rotation(desired), self.tuning.slerp_speed);

        if needs_repath {
            ctx.seek_waypoint_and_go(true);
        }

        BehaviorKind::Patrol
    }

    fn on_destination_reached(&mut self, ctx: &mut StateContext<'_>, reached: bool) {
        if reached && ctx.zombie.target.is(TargetType::Waypoint) {
            ctx.seek_waypoint_and_go(true);
        }
    }
}
