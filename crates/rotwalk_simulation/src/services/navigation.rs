//! Navigation collaborator (NavMesh agent + NavMesh queries)

use bevy::prelude::*;

/// Статус текущего пути агента
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathStatus {
    #[default]
    Complete,
    Partial,
    Invalid,
}

/// Off-mesh link, на котором сейчас стоит агент (прыжок, спуск)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffMeshLink {
    pub start: Vec3,
    pub end: Vec3,
}

/// Per-agent навигация (pathfinding + steering)
///
/// Все методы: команды/запросы к внешнему NavMesh агенту.
/// Реализация обязана быть дешёвой на чтение: states опрашивают её каждый tick.
pub trait NavigationAgent: Send + Sync {
    /// Запросить путь до точки. `false`: точка недостижима (путь не построен)
    fn set_destination(&mut self, point: Vec3) -> bool;
    fn resume(&mut self);

    fn path_status(&self) -> PathStatus;
    fn path_pending(&self) -> bool;
    fn has_path(&self) -> bool;
    fn is_path_stale(&self) -> bool;
    /// Промежуточная точка пути (следующий corner)
    fn steering_target(&self) -> Vec3;
    fn desired_velocity(&self) -> Vec3;

    /// Кто владеет transform: навигация (position/rotation) или state логика
    fn set_update_flags(&mut self, update_position: bool, update_rotation: bool);
    fn set_enabled(&mut self, enabled: bool);
    fn is_enabled(&self) -> bool;

    /// Velocity из root motion (animator deltaPosition / dt)
    fn set_velocity(&mut self, velocity: Vec3);
    /// Сдвинуть агента за `delta` секунд. `None`: навигация не двигает transform
    fn advance(&mut self, position: Vec3, delta: f32) -> Option<Vec3>;

    fn base_offset(&self) -> f32;
    fn current_off_mesh_link(&self) -> Option<OffMeshLink>;
    fn complete_off_mesh_link(&mut self);
}

/// Глобальные NavMesh запросы (не привязаны к агенту)
pub trait NavMeshQuery: Send + Sync {
    /// Ближайшая точка NavMesh в радиусе `max_distance`
    fn sample_position(&self, point: Vec3, max_distance: f32) -> Option<Vec3>;
}
