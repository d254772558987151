//! Scene services: agent registry + shared query collaborators
//!
//! Один экземпляр на симуляцию (Resource). Регистрация: только при инициализации агента,
//! дальше все фазы читают через `Res<SceneServices>`.

use std::collections::HashMap;

use bevy::prelude::*;

use super::{NavMeshQuery, PhysicsQuery};

/// Collider identity → агент, которому принадлежит collider
#[derive(Debug, Default, Clone)]
pub struct AgentRegistry {
    agents: HashMap<Entity, Entity>,
}

impl AgentRegistry {
    pub fn register(&mut self, collider: Entity, agent: Entity) {
        self.agents.insert(collider, agent);
    }

    pub fn lookup(&self, collider: Entity) -> Option<Entity> {
        self.agents.get(&collider).copied()
    }

    /// Удалить все collider'ы агента (despawn)
    pub fn unregister_agent(&mut self, agent: Entity) {
        self.agents.retain(|_, owner| *owner != agent);
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[derive(Resource, Default)]
pub struct SceneServices {
    pub registry: AgentRegistry,
    physics: Option<Box<dyn PhysicsQuery>>,
    nav_mesh: Option<Box<dyn NavMeshQuery>>,
}

impl SceneServices {
    pub fn with_physics(mut self, physics: Box<dyn PhysicsQuery>) -> Self {
        self.physics = Some(physics);
        self
    }

    pub fn with_nav_mesh(mut self, nav_mesh: Box<dyn NavMeshQuery>) -> Self {
        self.nav_mesh = Some(nav_mesh);
        self
    }

    pub fn physics(&self) -> Option<&dyn PhysicsQuery> {
        self.physics.as_deref()
    }

    pub fn nav_mesh(&self) -> Option<&dyn NavMeshQuery> {
        self.nav_mesh.as_deref()
    }
}
