//! PhysicsTick systems: регистрация коллайдеров, сброс угроз, sensor overlaps, target триггеры

use bevy::prelude::*;

use crate::ai::context::{EffectBuffer, StateContext};
use crate::ai::events::{BehaviorChanged, BloodBurst, SensorEvent};
use crate::ai::machine::BehaviorMachine;
use crate::components::{BodyPart, Percept, Stimulus, TargetType, Zombie};
use crate::services::{SceneServices, ZombieRig};
use crate::DeterministicRng;

/// Система: AgentRegistry ← collider'ы новых агентов (сам агент, sensor, части тела)
///
/// Despawned агенты удаляются из registry.
pub fn register_agent_colliders(
    mut services: ResMut<SceneServices>,
    agents: Query<(Entity, &ZombieRig), Added<ZombieRig>>,
    parts: Query<(Entity, &BodyPart), Added<BodyPart>>,
    mut removed: RemovedComponents<Zombie>,
) {
    for agent in removed.read() {
        services.registry.unregister_agent(agent);
        crate::log(&format!("🧟 Agent {:?} removed from registry", agent));
    }

    for (agent, rig) in agents.iter() {
        services.registry.register(agent, agent);
        if let Some(sensor) = rig.sensor_collider {
            services.registry.register(sensor, agent);
        }
        crate::log(&format!(
            "🧟 Agent {:?} registered (sensor {:?})",
            agent, rig.sensor_collider
        ));
    }

    for (collider, part) in parts.iter() {
        services.registry.register(collider, part.owner);
    }
}

/// Система: начало physics tick: угрозы очищены, дистанция до цели пересчитана
pub fn begin_physics_tick(mut agents: Query<(&mut Zombie, &Transform)>) {
    for (mut zombie, transform) in agents.iter_mut() {
        zombie.begin_physics_tick(transform.translation);
    }
}

/// Система: SensorEvent → классификация источника → hook активного state
///
/// Sensor резолвится в агента через AgentRegistry. Источник без `Stimulus` не классифицируется.
#[allow(clippy::too_many_arguments)]
pub fn dispatch_sensor_events(
    mut sensor_events: EventReader<SensorEvent>,
    mut agents: Query<(&mut Zombie, &mut Transform, &mut ZombieRig, &mut BehaviorMachine)>,
    stimuli: Query<(&Stimulus, &Transform), Without<Zombie>>,
    services: Res<SceneServices>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time>,
    mut blood: EventWriter<BloodBurst>,
    mut transitions: EventWriter<BehaviorChanged>,
) {
    let mut effects = EffectBuffer::default();

    for event in sensor_events.read() {
        let Some(agent) = services.registry.lookup(event.sensor) else {
            continue;
        };
        let Ok((stimulus, source_transform)) = stimuli.get(event.source) else {
            continue;
        };
        let Ok((mut zombie, mut transform, mut rig, mut machine)) = agents.get_mut(agent) else {
            continue;
        };

        let percept = Percept {
            source: event.source,
            kind: stimulus.kind,
            position: source_transform.translation,
        };

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
        machine.sensor_event(&mut ctx, event.phase, &percept);
    }

    effects.flush(&mut blood, &mut transitions);
}

/// Система: target trigger + melee range
///
/// "Target reached" = цель в пределах stopping distance (пересчёт каждый tick).
/// Вход/выход из зоны цели → `on_destination_reached(true/false)`.
#[allow(clippy::too_many_arguments)]
pub fn update_target_triggers(
    mut agents: Query<(Entity, &mut Zombie, &mut Transform, &mut ZombieRig, &mut BehaviorMachine)>,
    services: Res<SceneServices>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time>,
    mut blood: EventWriter<BloodBurst>,
    mut transitions: EventWriter<BehaviorChanged>,
) {
    let mut effects = EffectBuffer::default();

    for (agent, mut zombie, mut transform, mut rig, mut machine) in agents.iter_mut() {
        let running = machine.is_running();
        let target = zombie.target;
        let distance = transform.translation.distance(target.position);

        let inside = running && !target.is_none() && distance <= zombie.stopping_distance;
        zombie.target_reached = inside;
        zombie.in_melee_range = running && target.is(TargetType::VisualPlayer) && distance <= zombie.melee_range;

        if inside == zombie.target_zone_occupied {
            continue;
        }
        zombie.target_zone_occupied = inside;

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
        machine.destination_reached(&mut ctx, inside);
    }

    effects.flush(&mut blood, &mut transitions);
}
