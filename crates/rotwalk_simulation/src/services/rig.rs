//! Per-agent collaborator handles (navigation agent + animator)

use bevy::prelude::*;

use super::{AnimationRig, NavigationAgent};

/// Коллабораторы конкретного агента
///
/// Любой из них может отсутствовать: зависящие действия тихо пропускаются.
#[derive(Component, Default)]
pub struct ZombieRig {
    navigation: Option<Box<dyn NavigationAgent>>,
    animation: Option<Box<dyn AnimationRig>>,
    /// Sensor collider (регистрируется в AgentRegistry)
    pub sensor_collider: Option<Entity>,
}

impl ZombieRig {
    pub fn with_navigation(mut self, navigation: Box<dyn NavigationAgent>) -> Self {
        self.navigation = Some(navigation);
        self
    }

    pub fn with_animation(mut self, animation: Box<dyn AnimationRig>) -> Self {
        self.animation = Some(animation);
        self
    }

    pub fn with_sensor(mut self, sensor: Entity) -> Self {
        self.sensor_collider = Some(sensor);
        self
    }

    pub fn navigation(&self) -> Option<&dyn NavigationAgent> {
        self.navigation.as_deref()
    }

    pub fn navigation_mut(&mut self) -> Option<&mut (dyn NavigationAgent + 'static)> {
        self.navigation.as_deref_mut()
    }

    pub fn animation(&self) -> Option<&dyn AnimationRig> {
        self.animation.as_deref()
    }

    pub fn animation_mut(&mut self) -> Option<&mut (dyn AnimationRig + 'static)> {
        self.animation.as_deref_mut()
    }

    /// Включить/выключить навигацию (ragdoll ↔ animated)
    pub fn set_navigation_enabled(&mut self, enabled: bool) {
        if let Some(navigation) = self.navigation_mut() {
            navigation.set_enabled(enabled);
        }
    }

    pub fn set_animation_enabled(&mut self, enabled: bool) {
        if let Some(animation) = self.animation_mut() {
            animation.set_enabled(enabled);
        }
    }

    /// NavAgentControl: кто двигает/вращает transform
    pub fn nav_agent_control(&mut self, update_position: bool, update_rotation: bool) {
        if let Some(navigation) = self.navigation_mut() {
            navigation.set_update_flags(update_position, update_rotation);
        }
    }
}

impl std::fmt::Debug for ZombieRig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZombieRig")
            .field("navigation", &self.navigation.is_some())
            .field("animation", &self.animation.is_some())
            .field("sensor_collider", &self.sensor_collider)
            .finish()
    }
}
