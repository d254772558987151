//! Headless симуляция ROTWALK
//!
//! Один зомби + игрок: погоня, удар по ногам, ragdoll, reanimation.
//! Коллабораторы: headless (плоский пол, аналитические raycasts).

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use rotwalk_simulation::ai::{SensorPhase, ZombieSet};
use rotwalk_simulation::collision_layers::{COLLISION_LAYER_GEOMETRY, COLLISION_LAYER_PLAYER};
use rotwalk_simulation::services::headless::{HeadlessAnimation, HeadlessNavMesh, HeadlessNavigation, HeadlessPhysics};
use rotwalk_simulation::{
    create_headless_app, log_info, spawn_body_part, spawn_zombie, AnimationLinkEvent, BehaviorChanged, BodyRegion,
    BoneControl, DamageEvent, SceneServices, SensorEvent, Stimulus, StimulusKind, ZombieConfig, ZombieRig,
};

const TICKS: u32 = 600;
const DAMAGE_TICK: u32 = 120;

fn main() {
    let seed = 42;
    println!("Starting ROTWALK headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)));

    let physics = HeadlessPhysics::default();
    app.insert_resource(
        SceneServices::default()
            .with_physics(Box::new(physics.clone()))
            .with_nav_mesh(Box::new(HeadlessNavMesh::default())),
    );

    let world = app.world_mut();
    let floor = world.spawn_empty().id();
    physics.add_ground(floor, 0.0, COLLISION_LAYER_GEOMETRY);

    let player_position = Vec3::new(0.0, 1.6, -4.0);
    let player = world
        .spawn((
            Stimulus {
                kind: StimulusKind::Player,
            },
            Transform::from_translation(player_position),
        ))
        .id();
    physics.add_sphere(player, player_position, 0.4, COLLISION_LAYER_PLAYER);

    let sensor = world.spawn_empty().id();
    let rig = ZombieRig::default()
        .with_navigation(Box::new(HeadlessNavigation::default()))
        .with_animation(Box::new(HeadlessAnimation::default()))
        .with_sensor(sensor);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let config = ZombieConfig::default();
    let (zombie, leg) = {
        let mut commands = world.commands();
        let zombie = spawn_zombie(
            &mut commands,
            &config,
            Transform::IDENTITY,
            rig,
            vec![Vec3::new(5.0, 0.0, 0.0), Vec3::new(-5.0, 0.0, 0.0)],
            &mut rng,
        );
        let leg = spawn_body_part(&mut commands, zombie, BodyRegion::LowerBody, Transform::from_xyz(0.1, 0.5, 0.0), 0.12);
        (zombie, leg)
    };
    world.flush();

    // Animator "играет" локомоцию с root motion
    world.send_event(AnimationLinkEvent::RootMotionRequest {
        agent: zombie,
        position: 1,
        rotation: 0,
    });

    app.add_systems(FixedUpdate, report_transitions.after(ZombieSet::PostAnimation));

    for tick in 0..TICKS {
        let world = app.world_mut();
        world.send_event(SensorEvent {
            sensor,
            source: player,
            phase: SensorPhase::Stay,
        });

        if tick == DAMAGE_TICK {
            world.send_event(DamageEvent {
                collider: leg,
                position: Vec3::new(0.1, 0.5, -0.2),
                force: Vec3::new(0.0, 0.0, 6.0),
                amount: 20,
                attacker_position: player_position,
                hit_direction: 0,
            });
        }

        app.update();

        if tick % 60 == 0 {
            if let Some(bones) = app.world().get::<BoneControl>(zombie) {
                let position = app
                    .world()
                    .get::<Transform>(zombie)
                    .map(|transform| transform.translation)
                    .unwrap_or_default();
                println!("Tick {}: zombie at {:?}, bones {:?}", tick, position, bones.mode());
            }
        }
    }

    println!("Simulation complete!");
}

fn report_transitions(mut transitions: EventReader<BehaviorChanged>) {
    for change in transitions.read() {
        log_info(&format!("{:?}: {:?} → {:?}", change.agent, change.from, change.to));
    }
}
