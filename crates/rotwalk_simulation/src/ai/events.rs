//! AI Events: callbacks от физики/анимации и уведомления наружу

use bevy::prelude::*;

use super::BehaviorKind;

/// Фаза overlap события sensor volume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorPhase {
    Enter,
    Stay,
    Exit,
}

/// Overlap sensor sphere агента с collider'ом источника
///
/// Физика шлёт Enter/Stay/Exit каждый physics step. Агент определяется через
/// AgentRegistry по `sensor`.
#[derive(Event, Debug, Clone, Copy)]
pub struct SensorEvent {
    pub sensor: Entity,
    pub source: Entity,
    pub phase: SensorPhase,
}

/// Animation link callbacks (enter/exit состояния animator controller)
#[derive(Event, Debug, Clone, Copy)]
pub enum AnimationLinkEvent {
    /// +1/-1 к root motion reference counts (enter: +, exit: -)
    RootMotionRequest {
        agent: Entity,
        position: i32,
        rotation: i32,
    },
    /// Cinematic анимация (например еда) началась/закончилась
    Cinematic { agent: Entity, enabled: bool },
}

/// Смена behavior state (после exit → enter)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BehaviorChanged {
    pub agent: Entity,
    pub from: BehaviorKind,
    pub to: BehaviorKind,
}

/// Всплеск крови (попадание, еда): для VFX слоя
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct BloodBurst {
    pub agent: Entity,
    pub position: Vec3,
    pub amount: u32,
}
