//! ZombieState: capability interface одного behavior state
//!
//! Каждый state реализует lifecycle hooks; BehaviorMachine: единственная точка dispatch.

use super::context::StateContext;
use super::events::SensorPhase;
use super::perception;
use super::BehaviorKind;
use crate::components::Percept;
use crate::services::PoseDelta;

pub trait ZombieState: Send + Sync {
    fn kind(&self) -> BehaviorKind;

    fn on_enter(&mut self, _ctx: &mut StateContext<'_>) {}

    /// Один logic tick. Возвращает желаемый следующий state (свой kind = остаться)
    fn on_update(&mut self, ctx: &mut StateContext<'_>) -> BehaviorKind;

    fn on_exit(&mut self, _ctx: &mut StateContext<'_>) {}

    /// Агент вошёл (`true`) / вышел (`false`) из зоны цели
    fn on_destination_reached(&mut self, _ctx: &mut StateContext<'_>, _reached: bool) {}

    /// Overlap с классифицированным источником: по умолчанию: threat arbitration
    fn on_sensor_event(&mut self, ctx: &mut StateContext<'_>, phase: SensorPhase, percept: &Percept) {
        perception::evaluate(ctx, phase, percept);
    }

    /// Animator просэмплировал позу: по умолчанию применяем root motion
    fn on_animation_pose_updated(&mut self, ctx: &mut StateContext<'_>, pose: &PoseDelta) {
        apply_root_motion(ctx, pose);
    }

    fn on_animation_ik_updated(&mut self, _ctx: &mut StateContext<'_>) {}
}

/// Root position → velocity навигации, root rotation → transform агента
pub fn apply_root_motion(ctx: &mut StateContext<'_>, pose: &PoseDelta) {
    if ctx.zombie.root_motion.use_root_position() && ctx.delta > 0.0 {
        let velocity = pose.delta_position / ctx.delta;
        if let Some(navigation) = ctx.rig.navigation_mut() {
            navigation.set_velocity(velocity);
        }
    }

    if ctx.zombie.root_motion.use_root_rotation() {
        ctx.transform.rotation = pose.root_rotation;
    }
}
