//! StateContext: всё, что behavior state видит за один вызов hook'а

use bevy::prelude::*;
use rand_chacha::ChaCha8Rng;

use super::events::{BehaviorChanged, BloodBurst};
use super::steering::{flat_look_rotation, signed_angle_deg};
use crate::components::{AiTarget, TargetType, Zombie};
use crate::services::{SceneServices, ZombieRig};

/// Побочные эффекты hook'ов, которые система превращает в Bevy events
#[derive(Debug, Default)]
pub struct EffectBuffer {
    pub blood: Vec<BloodBurst>,
    pub transitions: Vec<BehaviorChanged>,
}

impl EffectBuffer {
    pub fn flush(&mut self, blood: &mut EventWriter<BloodBurst>, transitions: &mut EventWriter<BehaviorChanged>) {
        for burst in self.blood.drain(..) {
            blood.write(burst);
        }
        for change in self.transitions.drain(..) {
            transitions.write(change);
        }
    }
}

/// Mutable view агента на время одного hook'а
pub struct StateContext<'a> {
    pub agent: Entity,
    pub zombie: &'a mut Zombie,
    pub transform: &'a mut Transform,
    pub rig: &'a mut ZombieRig,
    pub services: &'a SceneServices,
    pub rng: &'a mut ChaCha8Rng,
    /// Длительность текущего tick (секунды)
    pub delta: f32,
    /// Simulated time (секунды)
    pub now: f32,
    pub effects: &'a mut EffectBuffer,
}

impl StateContext<'_> {
    pub fn position(&self) -> Vec3 {
        self.transform.translation
    }

    pub fn forward(&self) -> Vec3 {
        self.transform.forward().as_vec3()
    }

    pub fn sensor_position(&self) -> Vec3 {
        self.zombie.sensor.world_position(&*self.transform)
    }

    /// Угол со знаком от forward агента до точки
    pub fn signed_angle_to(&self, point: Vec3) -> f32 {
        signed_angle_deg(self.forward(), point - self.position())
    }

    /// Commit угрозы как цели (дистанция та, что посчитал sensor)
    pub fn commit(&mut self, threat: AiTarget) {
        self.zombie.set_target(threat);
    }

    /// Текущая/следующая patrol точка → Target (Waypoint)
    ///
    /// Пустая сеть waypoints: no-op, возвращает `None`.
    pub fn seek_waypoint(&mut self, increment: bool) -> Option<Vec3> {
        let waypoint = self.zombie.patrol.waypoint(increment, &mut *self.rng)?;
        let distance = waypoint.distance(self.position());
        self.zombie
            .target
            .set(TargetType::Waypoint, None, waypoint, distance, self.now);
        Some(waypoint)
    }

    /// seek_waypoint + SetDestination + Resume
    pub fn seek_waypoint_and_go(&mut self, increment: bool) {
        if let Some(waypoint) = self.seek_waypoint(increment) {
            self.set_destination(waypoint);
        }
    }

    pub fn set_destination(&mut self, point: Vec3) {
        if let Some(navigation) = self.rig.navigation_mut() {
            navigation.set_destination(point);
            navigation.resume();
        }
    }

    /// Плавный поворот к цели (если rotation не отдан root motion)
    pub fn face_target(&mut self, slerp_speed: f32) {
        let target = self.zombie.target.position;
        self.slerp_towards(flat_look_rotation(self.position(), target), slerp_speed);
    }

    pub fn slerp_towards(&mut self, rotation: Option<Quat>, slerp_speed: f32) {
        if self.zombie.root_motion.use_root_rotation() {
            return;
        }
        if let Some(rotation) = rotation {
            let t = (self.delta * slerp_speed).clamp(0.0, 1.0);
            self.transform.rotation = self.transform.rotation.slerp(rotation, t);
        }
    }

    pub fn emit_blood(&mut self, position: Vec3, amount: u32) {
        self.effects.blood.push(BloodBurst {
            agent: self.agent,
            position,
            amount,
        });
    }
}
