//! Damage: урон по частям тела, hit reaction или переход в ragdoll
//!
//! Порядок обработки одного попадания:
//! 1. Blood burst в точке попадания
//! 2. Мёртвый агент → только импульс
//! 3. Ragdoll → импульс + учёт урона + перезапуск reanimation
//! 4. Иначе учёт урона и решение `should_ragdoll`: hit reaction (анимация) либо ragdoll

use bevy::prelude::*;

use super::bone_control::{BoneControl, BoneControlMode, RagdollCommand};
use crate::ai::context::{EffectBuffer, StateContext};
use crate::ai::events::{BehaviorChanged, BloodBurst};
use crate::ai::machine::BehaviorMachine;
use crate::ai::steering::signed_angle_deg;
use crate::components::{BodyPart, BodyRegion, Vitals, Zombie};
use crate::logger;
use crate::services::{params, AnimationRig, SceneServices, ZombieRig};
use crate::DeterministicRng;

/// Количество частиц крови на попадание
pub const HIT_BLOOD_AMOUNT: u32 = 60;

/// Попадание по collider'у агента (оружие игрока, пуля)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageEvent {
    /// Collider, в который попали (часть тела или сам агент)
    pub collider: Entity,
    pub position: Vec3,
    pub force: Vec3,
    pub amount: u32,
    pub attacker_position: Vec3,
    /// -1 / 1: сторона попадания задана явно, 0: вычислить по углу
    pub hit_direction: i32,
}

/// Попадание, разрешённое до части тела
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Rigid body часть + её регион (None: попали не в часть скелета)
    pub part: Option<(Entity, BodyRegion)>,
    pub position: Vec3,
    pub force: Vec3,
    pub amount: u32,
    pub attacker_position: Vec3,
    pub hit_direction: i32,
}

impl Hit {
    pub fn region(&self) -> Option<BodyRegion> {
        self.part.map(|(_, region)| region)
    }

    fn strong(&self) -> bool {
        self.force.length() > 1.0
    }
}

/// Hit reaction для animator (`HitType`)
///
/// `angle`: угол от forward агента до точки попадания, отрицательный = справа.
/// Head: 1 справа, 2 по центру, 3 слева (±10°). Upper body: 4/5/6 (±20°).
pub fn hit_type(region: Option<BodyRegion>, angle: f32, hit_direction: i32) -> i32 {
    let (base, threshold) = match region {
        Some(BodyRegion::Head) => (1, 10.0),
        Some(BodyRegion::UpperBody) => (4, 20.0),
        _ => return 0,
    };

    if angle < -threshold || hit_direction == -1 {
        base
    } else if angle > threshold || hit_direction == 1 {
        base + 2
    } else {
        base + 1
    }
}

/// Crawling + накопленный урон → animator
pub fn push_damage_params(animation: &mut dyn AnimationRig, vitals: &Vitals) {
    animation.set_bool(params::CRAWLING, vitals.is_crawling());
    animation.set_int(params::LOWER_BODY_DAMAGE, vitals.lower_body_damage as i32);
    animation.set_int(params::UPPER_BODY_DAMAGE, vitals.upper_body_damage as i32);
}

fn sync_damage_params(ctx: &mut StateContext<'_>) {
    let vitals = ctx.zombie.vitals;
    if let Some(animation) = ctx.rig.animation_mut() {
        push_damage_params(animation, &vitals);
    }
}

fn account(ctx: &mut StateContext<'_>, hit: &Hit) {
    match hit.region() {
        Some(BodyRegion::Head) => ctx.zombie.vitals.damage_head(hit.amount),
        Some(BodyRegion::UpperBody) => ctx.zombie.vitals.damage_upper_body(hit.amount),
        Some(BodyRegion::LowerBody) => ctx.zombie.vitals.damage_lower_body(hit.amount),
        None => {}
    }
}

fn push_impulse(bones: &mut BoneControl, hit: &Hit) {
    if let (true, Some((part, _))) = (hit.strong(), hit.part) {
        bones.impulse(part, hit.force);
    }
}

/// Применить одно попадание к агенту
pub fn apply_damage(ctx: &mut StateContext<'_>, machine: &mut BehaviorMachine, bones: &mut BoneControl, hit: &Hit) {
    ctx.emit_blood(hit.position, HIT_BLOOD_AMOUNT);

    if !ctx.zombie.vitals.is_alive() {
        push_impulse(bones, hit);
        return;
    }

    if bones.mode() == BoneControlMode::Ragdoll {
        push_impulse(bones, hit);
        account(ctx, hit);
        sync_damage_params(ctx);

        if ctx.zombie.vitals.is_alive() {
            bones.start_reanimation(ctx.now);
        } else {
            bones.cancel_reanimation();
            logger::log_info(&format!("💀 {:?} killed while ragdolled", ctx.agent));
        }
        return;
    }

    let mut should_ragdoll = hit.strong();
    account(ctx, hit);
    match hit.region() {
        Some(BodyRegion::Head) if !ctx.zombie.vitals.is_alive() => should_ragdoll = true,
        Some(BodyRegion::UpperBody) => sync_damage_params(ctx),
        Some(BodyRegion::LowerBody) => {
            sync_damage_params(ctx);
            should_ragdoll = true;
        }
        _ => {}
    }

    let attacker_behind = (hit.attacker_position - ctx.position()).dot(ctx.forward()) < 0.0;
    if bones.mode() != BoneControlMode::Animated
        || ctx.zombie.vitals.is_crawling()
        || ctx.zombie.cinematic
        || attacker_behind
    {
        should_ragdoll = true;
    }

    if !should_ragdoll {
        let angle = if hit.hit_direction == 0 {
            signed_angle_deg(ctx.forward(), hit.position - ctx.position())
        } else {
            0.0
        };
        let reaction = hit_type(hit.region(), angle, hit.hit_direction);
        if let Some(animation) = ctx.rig.animation_mut() {
            animation.set_int(params::HIT_TYPE, reaction);
            animation.set_trigger(params::HIT);
        }
        return;
    }

    if let Err(error) = bones.transition(BoneControlMode::Ragdoll) {
        // Blend уже идёт: урон учтён, blend не прерываем
        logger::log_warning(&format!("Damage on {:?} ignored for bone control: {}", ctx.agent, error));
        push_impulse(bones, hit);
        return;
    }

    machine.freeze(ctx);
    ctx.rig.set_navigation_enabled(false);
    ctx.rig.set_animation_enabled(false);
    ctx.zombie.in_melee_range = false;
    ctx.zombie.locomotion.reset();

    bones.commands.push(RagdollCommand::SetSolid(false));
    bones.commands.push(RagdollCommand::SetKinematic(false));
    push_impulse(bones, hit);

    logger::log_info(&format!(
        "💀 {:?} ragdolled (health {}, lower body {})",
        ctx.agent, ctx.zombie.vitals.health, ctx.zombie.vitals.lower_body_damage
    ));

    if ctx.zombie.vitals.is_alive() {
        bones.start_reanimation(ctx.now);
    }
}

/// Система: DamageEvent → агент через AgentRegistry → apply_damage
#[allow(clippy::too_many_arguments)]
pub fn process_damage_events(
    mut damage_events: EventReader<DamageEvent>,
    mut agents: Query<(
        &mut Zombie,
        &mut Transform,
        &mut ZombieRig,
        &mut BehaviorMachine,
        &mut BoneControl,
    )>,
    parts: Query<&BodyPart>,
    services: Res<SceneServices>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time>,
    mut blood: EventWriter<BloodBurst>,
    mut transitions: EventWriter<BehaviorChanged>,
) {
    let mut effects = EffectBuffer::default();

    for event in damage_events.read() {
        let Some(agent) = services.registry.lookup(event.collider) else {
            logger::log_warning(&format!("DamageEvent: collider {:?} has no registered agent", event.collider));
            continue;
        };
        let Ok((mut zombie, mut transform, mut rig, mut machine, mut bones)) = agents.get_mut(agent) else {
            continue;
        };

        let hit = Hit {
            part: parts.get(event.collider).ok().map(|part| (event.collider, part.region)),
            position: event.position,
            force: event.force,
            amount: event.amount,
            attacker_position: event.attacker_position,
            hit_direction: event.hit_direction,
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
        apply_damage(&mut ctx, &mut machine, &mut bones, &hit);
    }

    effects.flush(&mut blood, &mut transitions);
}
