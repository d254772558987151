//! Test fixture: один агент с headless коллабораторами, без ECS

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::context::{EffectBuffer, StateContext};
use crate::components::Zombie;
use crate::services::headless::{HeadlessAnimation, HeadlessNavMesh, HeadlessNavigation, HeadlessPhysics};
use crate::services::{SceneServices, ZombieRig};

pub(crate) struct AgentFixture {
    pub world: World,
    pub agent: Entity,
    pub zombie: Zombie,
    pub transform: Transform,
    pub rig: ZombieRig,
    pub services: SceneServices,
    pub rng: ChaCha8Rng,
    pub effects: EffectBuffer,
    pub navigation: HeadlessNavigation,
    pub animation: HeadlessAnimation,
    pub physics: HeadlessPhysics,
    pub now: f32,
}

impl AgentFixture {
    /// Агент в начале координат, смотрит в -Z
    pub fn new() -> Self {
        let mut world = World::new();
        let agent = world.spawn_empty().id();

        let navigation = HeadlessNavigation::default();
        let animation = HeadlessAnimation::default();
        let physics = HeadlessPhysics::default();

        let rig = ZombieRig::default()
            .with_navigation(Box::new(navigation.clone()))
            .with_animation(Box::new(animation.clone()));
        let services = SceneServices::default()
            .with_physics(Box::new(physics.clone()))
            .with_nav_mesh(Box::new(HeadlessNavMesh::default()));

        Self {
            world,
            agent,
            zombie: Zombie::default(),
            transform: Transform::IDENTITY,
            rig,
            services,
            rng: ChaCha8Rng::seed_from_u64(42),
            effects: EffectBuffer::default(),
            navigation,
            animation,
            physics,
            now: 0.0,
        }
    }

    pub fn spawn(&mut self) -> Entity {
        self.world.spawn_empty().id()
    }

    pub fn ctx(&mut self, delta: f32) -> StateContext<'_> {
        self.now += delta;
        StateContext {
            agent: self.agent,
            zombie: &mut self.zombie,
            transform: &mut self.transform,
            rig: &mut self.rig,
            services: &self.services,
            rng: &mut self.rng,
            delta,
            now: self.now,
            effects: &mut self.effects,
        }
    }
}
