//! Headless коллабораторы (без движка): плоский NavMesh, аналитические raycasts,
//! animator с фиксированной bind позой.
//!
//! Navigation / animation: clone handles над общим состоянием:
//! один экземпляр уходит в `ZombieRig`, второй остаётся у теста/демо для инспекции.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bevy::prelude::*;

use super::{
    AnimationRig, BoneId, NavMeshQuery, NavigationAgent, OffMeshLink, PathStatus, PhysicsQuery, PoseDelta, RayHit,
};
use crate::services::animation::params;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Navigation
// ============================================================================

#[derive(Debug, Clone)]
pub struct NavigationState {
    pub destination: Option<Vec3>,
    pub status: PathStatus,
    pub pending: bool,
    pub stale: bool,
    pub enabled: bool,
    pub update_position: bool,
    pub update_rotation: bool,
    pub velocity: Vec3,
    pub base_offset: f32,
    pub off_mesh_link: Option<OffMeshLink>,
    /// Последняя позиция агента (обновляется в `advance`)
    pub position: Vec3,
    pub destination_requests: u32,
    pub links_completed: u32,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            destination: None,
            status: PathStatus::Complete,
            pending: false,
            stale: false,
            enabled: true,
            update_position: true,
            update_rotation: false,
            velocity: Vec3::ZERO,
            base_offset: 0.0,
            off_mesh_link: None,
            position: Vec3::ZERO,
            destination_requests: 0,
            links_completed: 0,
        }
    }
}

/// NavMesh агент на бесконечной плоскости: путь = прямая до destination
#[derive(Debug, Clone, Default)]
pub struct HeadlessNavigation {
    state: Arc<Mutex<NavigationState>>,
}

impl HeadlessNavigation {
    pub fn state(&self) -> MutexGuard<'_, NavigationState> {
        lock(&self.state)
    }
}

impl NavigationAgent for HeadlessNavigation {
    fn set_destination(&mut self, point: Vec3) -> bool {
        let mut state = self.state();
        if !state.enabled {
            return false;
        }
        state.destination = Some(point);
        state.stale = false;
        state.destination_requests += 1;
        true
    }

    fn resume(&mut self) {}

    fn path_status(&self) -> PathStatus {
        self.state().status
    }

    fn path_pending(&self) -> bool {
        self.state().pending
    }

    fn has_path(&self) -> bool {
        self.state().destination.is_some()
    }

    fn is_path_stale(&self) -> bool {
        self.state().stale
    }

    fn steering_target(&self) -> Vec3 {
        let state = self.state();
        state.destination.unwrap_or(state.position)
    }

    fn desired_velocity(&self) -> Vec3 {
        let state = self.state();
        match state.destination {
            Some(destination) => (destination - state.position).normalize_or_zero(),
            None => Vec3::ZERO,
        }
    }

    fn set_update_flags(&mut self, update_position: bool, update_rotation: bool) {
        let mut state = self.state();
        state.update_position = update_position;
        state.update_rotation = update_rotation;
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.state().enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.state().enabled
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.state().velocity = velocity;
    }

    fn advance(&mut self, position: Vec3, delta: f32) -> Option<Vec3> {
        let mut state = self.state();
        state.position = position;
        if !state.enabled || !state.update_position {
            return None;
        }
        let next = position + state.velocity * delta;
        state.position = next;
        Some(next)
    }

    fn base_offset(&self) -> f32 {
        self.state().base_offset
    }

    fn current_off_mesh_link(&self) -> Option<OffMeshLink> {
        self.state().off_mesh_link
    }

    fn complete_off_mesh_link(&mut self) {
        let mut state = self.state();
        if state.off_mesh_link.take().is_some() {
            state.links_completed += 1;
        }
    }
}

/// Плоский NavMesh на высоте `height` в прямоугольнике `min..max` (XZ)
#[derive(Debug, Clone, Copy)]
pub struct HeadlessNavMesh {
    pub height: f32,
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for HeadlessNavMesh {
    fn default() -> Self {
        Self {
            height: 0.0,
            min: Vec2::splat(-500.0),
            max: Vec2::splat(500.0),
        }
    }
}

impl NavMeshQuery for HeadlessNavMesh {
    fn sample_position(&self, point: Vec3, max_distance: f32) -> Option<Vec3> {
        let flat = Vec2::new(point.x, point.z).clamp(self.min, self.max);
        let candidate = Vec3::new(flat.x, self.height, flat.y);
        (candidate.distance(point) <= max_distance).then_some(candidate)
    }
}

// ============================================================================
// Physics
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeadlessShape {
    Sphere { center: Vec3, radius: f32 },
    /// Бесконечная горизонтальная плоскость y = height
    Ground { height: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadlessCollider {
    pub entity: Entity,
    pub shape: HeadlessShape,
    pub layer: u32,
}

/// Аналитические raycasts по сферам и плоскостям
#[derive(Debug, Clone, Default)]
pub struct HeadlessPhysics {
    colliders: Arc<Mutex<Vec<HeadlessCollider>>>,
}

impl HeadlessPhysics {
    pub fn add_sphere(&self, entity: Entity, center: Vec3, radius: f32, layer: u32) {
        lock(&self.colliders).push(HeadlessCollider {
            entity,
            shape: HeadlessShape::Sphere { center, radius },
            layer,
        });
    }

    pub fn add_ground(&self, entity: Entity, height: f32, layer: u32) {
        lock(&self.colliders).push(HeadlessCollider {
            entity,
            shape: HeadlessShape::Ground { height },
            layer,
        });
    }

    /// Переместить сферу (движущийся игрок, еда)
    pub fn move_sphere(&self, entity: Entity, new_center: Vec3) {
        for collider in lock(&self.colliders).iter_mut() {
            if let HeadlessShape::Sphere { center, .. } = &mut collider.shape {
                if collider.entity == entity {
                    *center = new_center;
                }
            }
        }
    }

    pub fn remove(&self, entity: Entity) {
        lock(&self.colliders).retain(|collider| collider.entity != entity);
    }
}

fn intersect(shape: &HeadlessShape, origin: Vec3, direction: Vec3) -> Option<f32> {
    match *shape {
        HeadlessShape::Sphere { center, radius } => {
            let offset = origin - center;
            let b = offset.dot(direction);
            let c = offset.length_squared() - radius * radius;
            if c > 0.0 && b > 0.0 {
                return None;
            }
            let discriminant = b * b - c;
            if discriminant < 0.0 {
                return None;
            }
            Some((-b - discriminant.sqrt()).max(0.0))
        }
        HeadlessShape::Ground { height } => {
            if direction.y.abs() < f32::EPSILON {
                return None;
            }
            let t = (height - origin.y) / direction.y;
            (t >= 0.0).then_some(t)
        }
    }
}

impl PhysicsQuery for HeadlessPhysics {
    fn raycast_all(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: u32) -> Vec<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return Vec::new();
        }

        let mut hits: Vec<RayHit> = lock(&self.colliders)
            .iter()
            .filter(|collider| collider.layer & mask != 0)
            .filter_map(|collider| {
                let distance = intersect(&collider.shape, origin, direction)?;
                (distance <= max_distance).then(|| RayHit {
                    collider: collider.entity,
                    point: origin + direction * distance,
                    distance,
                    layer: collider.layer,
                })
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

// ============================================================================
// Animation
// ============================================================================

#[derive(Debug, Clone)]
pub struct AnimationState {
    pub enabled: bool,
    pub floats: HashMap<String, f32>,
    pub ints: HashMap<String, i32>,
    pub bools: HashMap<String, bool>,
    /// История триггеров (в порядке set_trigger)
    pub triggers: Vec<String>,
    /// Слой → текущее состояние
    pub layer_states: HashMap<String, String>,
    /// Bind поза относительно root (что "играет" animator)
    pub bind_pose: BTreeMap<BoneId, Transform>,
    /// Текущая world поза
    pub pose: BTreeMap<BoneId, Transform>,
    pub look_at: Option<(Vec3, f32)>,
}

impl Default for AnimationState {
    fn default() -> Self {
        let bind_pose: BTreeMap<BoneId, Transform> = [
            (BoneId::HIPS, Transform::from_xyz(0.0, 1.0, 0.0)),
            (BoneId::HEAD, Transform::from_xyz(0.0, 1.7, 0.0)),
            (BoneId::LEFT_FOOT, Transform::from_xyz(-0.15, 0.05, 0.0)),
            (BoneId::RIGHT_FOOT, Transform::from_xyz(0.15, 0.05, 0.0)),
        ]
        .into_iter()
        .collect();

        Self {
            enabled: true,
            floats: HashMap::new(),
            ints: HashMap::new(),
            bools: HashMap::new(),
            triggers: Vec::new(),
            layer_states: HashMap::new(),
            pose: bind_pose.clone(),
            bind_pose,
            look_at: None,
        }
    }
}

impl AnimationState {
    pub fn float(&self, name: &str) -> f32 {
        self.floats.get(name).copied().unwrap_or_default()
    }

    pub fn int(&self, name: &str) -> i32 {
        self.ints.get(name).copied().unwrap_or_default()
    }

    pub fn bool(&self, name: &str) -> bool {
        self.bools.get(name).copied().unwrap_or_default()
    }

    pub fn trigger_fired(&self, name: &str) -> bool {
        self.triggers.iter().any(|trigger| trigger == name)
    }
}

/// Animator: bind поза следует за root, root motion = forward × Speed
#[derive(Debug, Clone, Default)]
pub struct HeadlessAnimation {
    state: Arc<Mutex<AnimationState>>,
}

impl HeadlessAnimation {
    pub fn state(&self) -> MutexGuard<'_, AnimationState> {
        lock(&self.state)
    }

    /// Выставить world позу скелета (симуляция ragdoll физики)
    pub fn set_ragdoll_pose(&self, pose: impl IntoIterator<Item = (BoneId, Transform)>) {
        self.state().pose.extend(pose);
    }

    pub fn set_layer_state(&self, layer: &str, state: &str) {
        self.state().layer_states.insert(layer.to_string(), state.to_string());
    }
}

impl AnimationRig for HeadlessAnimation {
    fn set_float(&mut self, name: &str, value: f32) {
        self.state().floats.insert(name.to_string(), value);
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.state().ints.insert(name.to_string(), value);
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        self.state().bools.insert(name.to_string(), value);
    }

    fn set_trigger(&mut self, name: &str) {
        self.state().triggers.push(name.to_string());
    }

    fn current_state(&self, layer: &str) -> Option<String> {
        self.state().layer_states.get(layer).cloned()
    }

    fn bone_world_transform(&self, bone: BoneId) -> Option<Transform> {
        self.state().pose.get(&bone).copied()
    }

    fn set_bone_world_pose(&mut self, bone: BoneId, position: Option<Vec3>, rotation: Quat) {
        let mut state = self.state();
        if let Some(transform) = state.pose.get_mut(&bone) {
            if let Some(position) = position {
                transform.translation = position;
            }
            transform.rotation = rotation;
        }
    }

    fn tracked_bones(&self) -> Vec<BoneId> {
        self.state().bind_pose.keys().copied().collect()
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.state().enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.state().enabled
    }

    fn set_look_at(&mut self, position: Vec3, weight: f32) {
        self.state().look_at = Some((position, weight));
    }

    fn sample(&mut self, root: &Transform, delta: f32) -> PoseDelta {
        let mut state = self.state();
        if !state.enabled {
            return PoseDelta {
                delta_position: Vec3::ZERO,
                root_rotation: root.rotation,
            };
        }

        let posed: Vec<(BoneId, Transform)> = state
            .bind_pose
            .iter()
            .map(|(bone, local)| (*bone, root.mul_transform(*local)))
            .collect();
        state.pose.extend(posed);

        let speed = state.float(params::SPEED);
        PoseDelta {
            delta_position: root.rotation * Vec3::NEG_Z * speed * delta,
            root_rotation: root.rotation,
        }
    }
}
