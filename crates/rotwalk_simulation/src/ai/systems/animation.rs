//! Animation / PostAnimation systems: animation links, sampling позы, IK

use bevy::prelude::*;

use crate::ai::context::{EffectBuffer, StateContext};
use crate::ai::events::{AnimationLinkEvent, BehaviorChanged, BloodBurst};
use crate::ai::machine::BehaviorMachine;
use crate::components::Zombie;
use crate::services::{SceneServices, ZombieRig};
use crate::DeterministicRng;

/// Система: AnimationLinkEvent → root motion ref counts / cinematic флаг
pub fn apply_animation_links(mut link_events: EventReader<AnimationLinkEvent>, mut zombies: Query<&mut Zombie>) {
    for event in link_events.read() {
        match *event {
            AnimationLinkEvent::RootMotionRequest {
                agent,
                position,
                rotation,
            } => {
                if let Ok(mut zombie) = zombies.get_mut(agent) {
                    zombie.root_motion.add_request(position, rotation);
                }
            }
            AnimationLinkEvent::Cinematic { agent, enabled } => {
                if let Ok(mut zombie) = zombies.get_mut(agent) {
                    zombie.cinematic = enabled;
                }
            }
        }
    }
}

/// Система: animator сэмплирует позу → `on_animation_pose_updated` (root motion)
///
/// Выключенный animator (ragdoll) позу не сэмплирует.
#[allow(clippy::too_many_arguments)]
pub fn sample_animation(
    mut agents: Query<(Entity, &mut Zombie, &mut Transform, &mut ZombieRig, &mut BehaviorMachine)>,
    services: Res<SceneServices>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time>,
    mut blood: EventWriter<BloodBurst>,
    mut transitions: EventWriter<BehaviorChanged>,
) {
    let delta = time.delta_secs();
    let mut effects = EffectBuffer::default();

    for (agent, mut zombie, mut transform, mut rig, mut machine) in agents.iter_mut() {
        let Some(animation) = rig.animation_mut() else {
            continue;
        };
        if !animation.is_enabled() {
            continue;
        }
        let pose = animation.sample(&transform, delta);

        let mut ctx = StateContext {
            agent,
            zombie: &mut zombie,
            transform: &mut transform,
            rig: &mut rig,
            services: &services,
            rng: &mut rng.rng,
            delta,
            now: time.elapsed_secs(),
            effects: &mut effects,
        };
        machine.pose_updated(&mut ctx, &pose);
    }

    effects.flush(&mut blood, &mut transitions);
}

/// Система: IK pass активного state (look-at во время атаки)
#[allow(clippy::too_many_arguments)]
pub fn update_ik(
    mut agents: Query<(Entity, &mut Zombie, &mut Transform, &mut ZombieRig, &mut BehaviorMachine)>,
    services: Res<SceneServices>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time>,
    mut blood: EventWriter<BloodBurst>,
    mut transitions: EventWriter<BehaviorChanged>,
) {
    let mut effects = EffectBuffer::default();

    for (agent, mut zombie, mut transform, mut rig, mut machine) in agents.iter_mut() {
        let animating = rig.animation().is_some_and(|animation| animation.is_enabled());
        if !animating {
            continue;
        }

        let mut ctx = StateContext {
            agent,
            zombie: &mut zombie,
            transform: &mut transform,
            rig: &mut rig,
            services: &services,
            rng: &mut rng.rng,
            delta: time.delta_secs(),
            now: time.elapsed_secs(),
            effects: &mut effects,
        };
        machine.ik_updated(&mut ctx);
    }

    effects.flush(&mut blood, &mut transitions);
}
