//! Tests for damage handling (hit reactions, ragdoll decision, ragdoll re-hits).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::bone_control::{BoneControl, BoneControlMode, RagdollCommand};
    use super::super::damage::*;
    use crate::ai::machine::BehaviorMachine;
    use crate::ai::testing::AgentFixture;
    use crate::ai::BehaviorKind;
    use crate::components::BodyRegion;
    use crate::config::BehaviorTuning;
    use crate::services::params;

    struct Rig {
        fx: AgentFixture,
        machine: BehaviorMachine,
        bones: BoneControl,
    }

    impl Rig {
        /// Агент в Idle (машина запущена), Animated
        fn new() -> Self {
            let mut fx = AgentFixture::new();
            let mut machine = BehaviorMachine::standard(BehaviorKind::Idle, &BehaviorTuning::default());
            machine.tick(&mut fx.ctx(0.0));
            fx.effects.transitions.clear();
            Self {
                fx,
                machine,
                bones: BoneControl::default(),
            }
        }

        fn part(&mut self, region: BodyRegion) -> (Entity, BodyRegion) {
            (self.fx.spawn(), region)
        }

        fn hit(&mut self, hit: Hit) {
            let mut ctx = self.fx.ctx(0.1);
            apply_damage(&mut ctx, &mut self.machine, &mut self.bones, &hit);
        }
    }

    /// Удар спереди (атакующий перед агентом)
    fn frontal(part: Option<(Entity, BodyRegion)>, position: Vec3, force: Vec3, amount: u32) -> Hit {
        Hit {
            part,
            position,
            force,
            amount,
            attacker_position: Vec3::new(0.0, 1.5, -3.0),
            hit_direction: 0,
        }
    }

    #[test]
    fn test_hit_type_table() {
        assert_eq!(hit_type(Some(BodyRegion::Head), -15.0, 0), 1);
        assert_eq!(hit_type(Some(BodyRegion::Head), 0.0, 0), 2);
        assert_eq!(hit_type(Some(BodyRegion::Head), 15.0, 0), 3);
        assert_eq!(hit_type(Some(BodyRegion::UpperBody), -15.0, 0), 5);
        assert_eq!(hit_type(Some(BodyRegion::UpperBody), -25.0, 0), 4);
        assert_eq!(hit_type(Some(BodyRegion::UpperBody), 25.0, 0), 6);
        assert_eq!(hit_type(Some(BodyRegion::UpperBody), 0.0, -1), 4);
        assert_eq!(hit_type(Some(BodyRegion::Head), 0.0, 1), 3);
        assert_eq!(hit_type(Some(BodyRegion::LowerBody), 30.0, 0), 0);
        assert_eq!(hit_type(None, 30.0, 0), 0);
    }

    #[test]
    fn test_weak_head_hit_from_right_flinches() {
        let mut rig = Rig::new();
        let head = rig.part(BodyRegion::Head);

        rig.hit(frontal(Some(head), Vec3::new(1.0, 1.7, -0.2), Vec3::new(0.0, 0.0, 0.5), 10));

        assert_eq!(rig.bones.mode(), BoneControlMode::Animated);
        assert_eq!(rig.fx.zombie.vitals.health, 90);
        assert_eq!(rig.machine.current(), BehaviorKind::Idle);

        let animation = rig.fx.animation.state();
        assert_eq!(animation.int(params::HIT_TYPE), 1);
        assert!(animation.trigger_fired(params::HIT));

        let blood = rig.fx.effects.blood.last().copied().unwrap();
        assert_eq!(blood.amount, HIT_BLOOD_AMOUNT);
        assert_eq!(blood.position, Vec3::new(1.0, 1.7, -0.2));
    }

    #[test]
    fn test_upper_body_hint_overrides_angle_and_pushes_params() {
        let mut rig = Rig::new();
        let chest = rig.part(BodyRegion::UpperBody);
        let hit = Hit {
            hit_direction: 1,
            ..frontal(Some(chest), Vec3::new(-1.0, 1.2, -0.2), Vec3::ZERO, 25)
        };

        rig.hit(hit);

        assert_eq!(rig.bones.mode(), BoneControlMode::Animated);
        assert_eq!(rig.fx.zombie.vitals.upper_body_damage, 25);
        let animation = rig.fx.animation.state();
        assert_eq!(animation.int(params::HIT_TYPE), 6);
        assert_eq!(animation.int(params::UPPER_BODY_DAMAGE), 25);
        assert!(!animation.bool(params::CRAWLING));
    }

    #[test]
    fn test_lower_body_hit_always_ragdolls() {
        let mut rig = Rig::new();
        let leg = rig.part(BodyRegion::LowerBody);

        rig.hit(frontal(Some(leg), Vec3::new(0.2, 0.5, -0.3), Vec3::new(0.0, 0.0, 0.1), 20));

        assert_eq!(rig.bones.mode(), BoneControlMode::Ragdoll);
        assert_eq!(rig.fx.zombie.vitals.lower_body_damage, 20);
        assert!(rig.machine.is_frozen());
        assert_eq!(rig.machine.current(), BehaviorKind::None);

        // Слабый удар: без импульса
        assert_eq!(
            rig.bones.commands,
            vec![RagdollCommand::SetSolid(false), RagdollCommand::SetKinematic(false)]
        );
        assert!(!rig.fx.navigation.state().enabled);
        assert!(!rig.fx.animation.state().enabled);
        assert_eq!(rig.fx.animation.state().int(params::LOWER_BODY_DAMAGE), 20);

        let routine = rig.bones.routine().unwrap();
        assert_eq!(routine.started_at, rig.fx.now);

        let change = rig.fx.effects.transitions.last().copied().unwrap();
        assert_eq!(change.from, BehaviorKind::Idle);
        assert_eq!(change.to, BehaviorKind::None);
    }

    #[test]
    fn test_lethal_head_hit_ragdolls_without_reanimation() {
        let mut rig = Rig::new();
        rig.fx.zombie.vitals.health = 30;
        let head = rig.part(BodyRegion::Head);

        rig.hit(frontal(Some(head), Vec3::new(0.0, 1.7, -0.2), Vec3::new(0.0, 0.0, 0.5), 30));

        assert_eq!(rig.fx.zombie.vitals.health, 0);
        assert_eq!(rig.bones.mode(), BoneControlMode::Ragdoll);
        assert!(!rig.bones.is_reanimating());
    }

    #[test]
    fn test_strong_hit_ragdolls_with_impulse() {
        let mut rig = Rig::new();
        let chest = rig.part(BodyRegion::UpperBody);
        let force = Vec3::new(0.0, 0.0, 8.0);

        rig.hit(frontal(Some(chest), Vec3::new(0.0, 1.2, -0.2), force, 5));

        assert_eq!(rig.bones.mode(), BoneControlMode::Ragdoll);
        assert_eq!(
            rig.bones.commands.last().copied(),
            Some(RagdollCommand::Impulse {
                part: chest.0,
                impulse: force
            })
        );
    }

    #[test]
    fn test_attacker_behind_ragdolls() {
        let mut rig = Rig::new();
        let chest = rig.part(BodyRegion::UpperBody);
        let hit = Hit {
            attacker_position: Vec3::new(0.0, 1.5, 3.0),
            ..frontal(Some(chest), Vec3::new(0.0, 1.2, 0.2), Vec3::ZERO, 5)
        };

        rig.hit(hit);

        assert_eq!(rig.bones.mode(), BoneControlMode::Ragdoll);
        assert!(!rig.fx.animation.state().trigger_fired(params::HIT));
    }

    #[test]
    fn test_crawling_or_cinematic_agent_ragdolls() {
        let mut crawling = Rig::new();
        crawling.fx.zombie.vitals.lower_body_damage = 95;
        let chest = crawling.part(BodyRegion::UpperBody);
        crawling.hit(frontal(Some(chest), Vec3::new(0.0, 1.2, -0.2), Vec3::ZERO, 5));
        assert_eq!(crawling.bones.mode(), BoneControlMode::Ragdoll);

        let mut feeding = Rig::new();
        feeding.fx.zombie.cinematic = true;
        let chest = feeding.part(BodyRegion::UpperBody);
        feeding.hit(frontal(Some(chest), Vec3::new(0.0, 1.2, -0.2), Vec3::ZERO, 5));
        assert_eq!(feeding.bones.mode(), BoneControlMode::Ragdoll);
    }

    #[test]
    fn test_ragdoll_rehit_accounts_and_restarts_reanimation() {
        let mut rig = Rig::new();
        let leg = rig.part(BodyRegion::LowerBody);
        rig.hit(frontal(Some(leg), Vec3::new(0.2, 0.5, -0.3), Vec3::ZERO, 20));
        let first = rig.bones.routine().unwrap();
        rig.bones.commands.clear();

        let head = rig.part(BodyRegion::Head);
        let force = Vec3::new(0.0, 2.0, 0.0);
        rig.hit(frontal(Some(head), Vec3::new(0.0, 0.3, -1.0), force, 15));

        assert_eq!(rig.bones.mode(), BoneControlMode::Ragdoll);
        assert_eq!(rig.fx.zombie.vitals.health, 85);
        assert_eq!(
            rig.bones.commands,
            vec![RagdollCommand::Impulse {
                part: head.0,
                impulse: force
            }]
        );

        let second = rig.bones.routine().unwrap();
        assert!(second.generation > first.generation);
        assert!(second.started_at > first.started_at);
    }

    #[test]
    fn test_lethal_hit_while_ragdolled_cancels_reanimation() {
        let mut rig = Rig::new();
        let leg = rig.part(BodyRegion::LowerBody);
        rig.hit(frontal(Some(leg), Vec3::new(0.2, 0.5, -0.3), Vec3::ZERO, 20));
        assert!(rig.bones.is_reanimating());

        let head = rig.part(BodyRegion::Head);
        rig.hit(frontal(Some(head), Vec3::new(0.0, 0.3, -1.0), Vec3::ZERO, 100));

        assert_eq!(rig.fx.zombie.vitals.health, 0);
        assert_eq!(rig.bones.mode(), BoneControlMode::Ragdoll);
        assert!(!rig.bones.is_reanimating());
        assert!(rig.machine.is_frozen());
    }

    #[test]
    fn test_dead_agent_only_receives_impulse() {
        let mut rig = Rig::new();
        rig.fx.zombie.vitals.health = 0;
        let leg = rig.part(BodyRegion::LowerBody);
        let force = Vec3::new(3.0, 0.0, 0.0);

        rig.hit(frontal(Some(leg), Vec3::new(0.2, 0.5, -0.3), force, 40));

        assert_eq!(rig.bones.mode(), BoneControlMode::Animated);
        assert_eq!(rig.fx.zombie.vitals.lower_body_damage, 0);
        assert_eq!(rig.fx.zombie.vitals.health, 0);
        assert_eq!(
            rig.bones.commands,
            vec![RagdollCommand::Impulse {
                part: leg.0,
                impulse: force
            }]
        );
    }

    #[test]
    fn test_hit_during_blend_keeps_blending() {
        let mut rig = Rig::new();
        rig.bones.transition(BoneControlMode::Ragdoll).unwrap();
        rig.bones.transition(BoneControlMode::RagdollToAnimated).unwrap();
        let chest = rig.part(BodyRegion::UpperBody);

        rig.hit(frontal(Some(chest), Vec3::new(0.0, 1.2, -0.2), Vec3::new(0.0, 0.0, 4.0), 10));

        assert_eq!(rig.bones.mode(), BoneControlMode::RagdollToAnimated);
        assert_eq!(rig.fx.zombie.vitals.upper_body_damage, 10);
        assert!(!rig.bones.is_reanimating());
        assert_eq!(rig.machine.current(), BehaviorKind::Idle);
    }
}
