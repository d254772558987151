//! Physics query collaborator (raycasts)
//!
//! Overlap/trigger события приходят как `SensorEvent` (см. `ai::events`),
//! rigid body команды: через bevy_rapier3d компоненты (см. `combat::systems`).

use bevy::prelude::*;

/// Одно пересечение луча с коллайдером
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Collider identity (ключ AgentRegistry)
    pub collider: Entity,
    pub point: Vec3,
    pub distance: f32,
    /// Collision layer коллайдера (см. `collision_layers`)
    pub layer: u32,
}

pub trait PhysicsQuery: Send + Sync {
    /// Все пересечения луча, отсортированные по distance (ближайшее первым)
    ///
    /// `direction` нормализуется реализацией; `mask`: битовая маска слоёв.
    fn raycast_all(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: u32) -> Vec<RayHit>;
}
