//! Источники раздражителей (sensor volumes) и части тела зомби

use bevy::prelude::*;

/// Классификация sensor-источника (аналог tag коллайдера)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum StimulusKind {
    /// Тело игрока
    Player,
    /// Конус фонарика; `depth`: глубина конуса в world units
    FlashLight { depth: f32 },
    /// Сфера звука; `radius`: радиус слышимости в world units
    SoundEmitter { radius: f32 },
    /// Еда (труп)
    Food,
}

/// Компонент на collider-entity, который sensor может классифицировать
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Stimulus {
    pub kind: StimulusKind,
}

/// Разрешённый sensor-источник: collider + классификация + world позиция
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percept {
    pub source: Entity,
    pub kind: StimulusKind,
    pub position: Vec3,
}

/// Регион тела (tag rigid body части скелета)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum BodyRegion {
    Head,
    UpperBody,
    LowerBody,
}

/// Rigid body часть ragdoll скелета
///
/// Entity части = её collider identity (ключ в AgentRegistry).
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct BodyPart {
    pub owner: Entity,
    pub region: BodyRegion,
}
