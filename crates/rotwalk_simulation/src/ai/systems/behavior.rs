//! LogicTick systems: update активного state + animator параметры + голод

use bevy::prelude::*;

use crate::ai::context::{EffectBuffer, StateContext};
use crate::ai::events::{BehaviorChanged, BloodBurst};
use crate::ai::machine::BehaviorMachine;
use crate::ai::BehaviorKind;
use crate::components::Zombie;
use crate::services::{params, AnimationRig, SceneServices, ZombieRig};
use crate::DeterministicRng;

/// Система: behavior tick
///
/// Порядок на агента:
/// 1. `BehaviorMachine::tick` (lazy start при первом tick)
/// 2. satisfaction убывает вне Feeding (∝ speed³)
/// 3. locomotion → animator параметры
#[allow(clippy::too_many_arguments)]
pub fn run_behavior(
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
        {
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
            machine.tick(&mut ctx);
        }

        let current = machine.current();
        if current != BehaviorKind::Feeding {
            let speed = zombie.locomotion.speed;
            zombie.appetite.deplete(delta, speed);
        }

        if let Some(animation) = rig.animation_mut() {
            push_locomotion_params(animation, &zombie, current);
        }
    }

    effects.flush(&mut blood, &mut transitions);
}

/// Speed / Feeding / Seeking / Attack / State → animator
pub fn push_locomotion_params(animation: &mut dyn AnimationRig, zombie: &Zombie, current: BehaviorKind) {
    let locomotion = zombie.locomotion;
    animation.set_float(params::SPEED, locomotion.speed);
    animation.set_bool(params::FEEDING, locomotion.feeding);
    animation.set_int(params::SEEKING, locomotion.seeking);
    animation.set_int(params::ATTACK, locomotion.attack_type);
    animation.set_int(params::STATE, current.animator_code());
}
