//! Tests for behavior states (каждый state в изоляции, без машины).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::*;
    use crate::ai::state::ZombieState;
    use crate::ai::testing::AgentFixture;
    use crate::ai::BehaviorKind;
    use crate::components::TargetType;
    use crate::config::*;
    use crate::services::params;

    // ------------------------------------------------------------------
    // Idle
    // ------------------------------------------------------------------

    #[test]
    fn test_idle_player_threat_starts_pursuit() {
        let mut fx = AgentFixture::new();
        let player = fx.spawn();
        let mut state = IdleState::new(IdleTuning::default());

        let next = {
            let mut ctx = fx.ctx(0.1);
            state.on_enter(&mut ctx);
            ctx.zombie
                .threats
                .visual
                .set(TargetType::VisualPlayer, Some(player), Vec3::new(0.0, 0.0, -4.0), 4.0, 0.0);
            state.on_update(&mut ctx)
        };

        assert_eq!(next, BehaviorKind::Pursuit);
        assert!(fx.zombie.target.is(TargetType::VisualPlayer));
        assert_eq!(fx.zombie.target.source, Some(player));
    }

    #[test]
    fn test_idle_timeout_seeks_waypoint() {
        let mut fx = AgentFixture::new();
        fx.zombie.patrol.waypoints = vec![Vec3::new(0.0, 0.0, -5.0)];
        let mut state = IdleState::new(IdleTuning { idle_time_range: (1.0, 1.0) });

        state.on_enter(&mut fx.ctx(0.0));
        assert_eq!(state.idle_time(), 1.0);

        assert_eq!(state.on_update(&mut fx.ctx(0.6)), BehaviorKind::Idle);
        assert_eq!(state.on_update(&mut fx.ctx(0.6)), BehaviorKind::Alerted);

        assert!(fx.zombie.target.is(TargetType::Waypoint));
        assert_eq!(fx.navigation.state().destination, Some(Vec3::new(0.0, 0.0, -5.0)));
    }

    #[test]
    fn test_idle_time_drawn_from_range() {
        let mut fx = AgentFixture::new();
        let mut state = IdleState::new(IdleTuning { idle_time_range: (2.0, 4.0) });
        for _ in 0..20 {
            state.on_enter(&mut fx.ctx(0.0));
            assert!((2.0..=4.0).contains(&state.idle_time()));
        }
    }

    // ------------------------------------------------------------------
    // Alerted
    // ------------------------------------------------------------------

    #[test]
    fn test_alerted_audio_ahead_starts_pursuit() {
        let mut fx = AgentFixture::new();
        let source = fx.spawn();
        let mut state = AlertedState::new(AlertedTuning::default());

        let next = {
            let mut ctx = fx.ctx(0.1);
            state.on_enter(&mut ctx);
            ctx.zombie
                .threats
                .audio
                .set(TargetType::Audio, Some(source), Vec3::new(0.0, 0.0, -5.0), 5.0, 0.0);
            state.on_update(&mut ctx)
        };

        assert_eq!(next, BehaviorKind::Pursuit);
        assert!(fx.zombie.target.is(TargetType::Audio));
    }

    #[test]
    fn test_alerted_turns_towards_audio_source() {
        let mut fx = AgentFixture::new();
        let source = fx.spawn();
        let mut state = AlertedState::new(AlertedTuning::default());
        fx.zombie.senses.intelligence = 1.0;

        let next = {
            let mut ctx = fx.ctx(2.0);
            state.on_enter(&mut ctx);
            ctx.zombie
                .threats
                .audio
                .set(TargetType::Audio, Some(source), Vec3::new(5.0, 0.0, 0.0), 5.0, 0.0);
            state.on_update(&mut ctx)
        };

        assert_eq!(next, BehaviorKind::Alerted);
        // Источник справа (+X): поворот по часовой
        assert_eq!(fx.zombie.locomotion.seeking, -1);
        assert!(fx.transform.forward().x > 0.0);
    }

    #[test]
    fn test_alerted_food_only_without_target() {
        let mut fx = AgentFixture::new();
        let food = fx.spawn();
        let mut state = AlertedState::new(AlertedTuning::default());

        let next = {
            let mut ctx = fx.ctx(0.1);
            state.on_enter(&mut ctx);
            ctx.zombie
                .threats
                .visual
                .set(TargetType::VisualFood, Some(food), Vec3::new(0.0, 0.0, -2.0), 2.0, 0.0);
            state.on_update(&mut ctx)
        };

        assert_eq!(next, BehaviorKind::Pursuit);
        assert!(fx.zombie.target.is(TargetType::VisualFood));
    }

    // ------------------------------------------------------------------
    // Patrol
    // ------------------------------------------------------------------

    #[test]
    fn test_patrol_hungry_zombie_goes_for_food() {
        let mut fx = AgentFixture::new();
        let food = fx.spawn();
        fx.zombie.appetite.satisfaction = 0.45;
        let mut state = PatrolState::new(PatrolTuning::default());

        let next = {
            let mut ctx = fx.ctx(0.1);
            state.on_enter(&mut ctx);
            ctx.zombie
                .threats
                .visual
                .set(TargetType::VisualFood, Some(food), Vec3::new(0.0, 0.0, -2.0), 2.0, 0.0);
            state.on_update(&mut ctx)
        };

        assert_eq!(next, BehaviorKind::Pursuit);
    }

    #[test]
    fn test_patrol_nearly_sated_zombie_ignores_distant_food() {
        let mut fx = AgentFixture::new();
        let food = fx.spawn();
        fx.zombie.appetite.satisfaction = 0.85;
        let mut state = PatrolState::new(PatrolTuning::default());

        let next = {
            let mut ctx = fx.ctx(0.1);
            state.on_enter(&mut ctx);
            // hunger 0.15 < distance / radius 0.2
            ctx.zombie
                .threats
                .visual
                .set(TargetType::VisualFood, Some(food), Vec3::new(0.0, 0.0, -2.0), 2.0, 0.0);
            state.on_update(&mut ctx)
        };

        assert_eq!(next, BehaviorKind::Patrol);
        assert!(fx.zombie.target.is_none());
    }

    #[test]
    fn test_patrol_waits_for_pending_path() {
        let mut fx = AgentFixture::new();
        fx.zombie.patrol.waypoints = vec![Vec3::new(0.0, 0.0, -5.0)];
        let mut state = PatrolState::new(PatrolTuning::default());

        state.on_enter(&mut fx.ctx(0.0));
        assert_eq!(fx.zombie.locomotion.speed, 1.0);

        fx.navigation.state().pending = true;
        assert_eq!(state.on_update(&mut fx.ctx(0.1)), BehaviorKind::Patrol);
        assert_eq!(fx.zombie.locomotion.speed, 0.0);
    }

    #[test]
    fn test_patrol_waypoint_behind_turns_on_spot() {
        let mut fx = AgentFixture::new();
        fx.zombie.patrol.waypoints = vec![Vec3::new(0.0, 0.0, 5.0)];
        let mut state = PatrolState::new(PatrolTuning::default());

        state.on_enter(&mut fx.ctx(0.0));
        assert_eq!(state.on_update(&mut fx.ctx(0.1)), BehaviorKind::Alerted);
    }

    #[test]
    fn test_patrol_arrival_advances_waypoint() {
        let mut fx = AgentFixture::new();
        fx.zombie.patrol.waypoints = vec![Vec3::new(0.0, 0.0, -5.0), Vec3::new(3.0, 0.0, -5.0)];
        let mut state = PatrolState::new(PatrolTuning::default());

        state.on_enter(&mut fx.ctx(0.0));
        assert_eq!(fx.zombie.patrol.current, Some(0));

        state.on_destination_reached(&mut fx.ctx(0.0), false);
        assert_eq!(fx.zombie.patrol.current, Some(0));

        state.on_destination_reached(&mut fx.ctx(0.0), true);
        assert_eq!(fx.zombie.patrol.current, Some(1));
        assert_eq!(fx.navigation.state().destination, Some(Vec3::new(3.0, 0.0, -5.0)));
    }

    // ------------------------------------------------------------------
    // Pursuit
    // ------------------------------------------------------------------

    #[test]
    fn test_pursuit_reaching_sound_clears_target() {
        let mut fx = AgentFixture::new();
        let source = fx.spawn();
        fx.zombie
            .target
            .set(TargetType::Audio, Some(source), Vec3::new(0.0, 0.0, -1.0), 1.0, 0.0);
        let mut state = PursuitState::new(PursuitTuning::default());

        state.on_enter(&mut fx.ctx(0.0));
        assert_eq!(fx.navigation.state().destination, Some(Vec3::new(0.0, 0.0, -1.0)));

        fx.zombie.target_reached = true;
        assert_eq!(state.on_update(&mut fx.ctx(0.1)), BehaviorKind::Alerted);
        assert!(fx.zombie.target.is_none());
    }

    #[test]
    fn test_pursuit_reaching_food_starts_feeding() {
        let mut fx = AgentFixture::new();
        let food = fx.spawn();
        fx.zombie
            .target
            .set(TargetType::VisualFood, Some(food), Vec3::new(0.0, 0.0, -1.0), 1.0, 0.0);
        let mut state = PursuitState::new(PursuitTuning::default());

        state.on_enter(&mut fx.ctx(0.0));
        fx.zombie.target_reached = true;
        assert_eq!(state.on_update(&mut fx.ctx(0.1)), BehaviorKind::Feeding);
    }

    #[test]
    fn test_pursuit_player_in_melee_range_attacks() {
        let mut fx = AgentFixture::new();
        let player = fx.spawn();
        let position = Vec3::new(0.0, 0.0, -1.0);
        fx.zombie.target.set(TargetType::VisualPlayer, Some(player), position, 1.0, 0.0);
        let mut state = PursuitState::new(PursuitTuning::default());

        state.on_enter(&mut fx.ctx(0.0));
        fx.zombie
            .threats
            .visual
            .set(TargetType::VisualPlayer, Some(player), position, 1.0, 0.0);
        fx.zombie.target_reached = true;
        fx.zombie.in_melee_range = true;

        assert_eq!(state.on_update(&mut fx.ctx(0.1)), BehaviorKind::Attack);
    }

    #[test]
    fn test_pursuit_repaths_to_moving_player() {
        let mut fx = AgentFixture::new();
        let player = fx.spawn();
        fx.zombie
            .target
            .set(TargetType::VisualPlayer, Some(player), Vec3::new(0.0, 0.0, -10.0), 10.0, 0.0);
        let mut state = PursuitState::new(PursuitTuning::default());
        state.on_enter(&mut fx.ctx(0.0));

        // interval = clamp(12 × 0.035, 0.05, 5.0) = 0.42 < 0.5
        let moved = Vec3::new(0.0, 0.0, -12.0);
        fx.zombie
            .threats
            .visual
            .set(TargetType::VisualPlayer, Some(player), moved, 12.0, 0.0);

        assert_eq!(state.on_update(&mut fx.ctx(0.5)), BehaviorKind::Pursuit);
        let nav = fx.navigation.state();
        assert_eq!(nav.destination, Some(moved));
        assert_eq!(nav.destination_requests, 2);
        drop(nav);
        assert_eq!(fx.zombie.target.position, moved);
    }

    #[test]
    fn test_pursuit_lost_path_falls_back_to_alerted() {
        let mut fx = AgentFixture::new();
        let source = fx.spawn();
        fx.zombie
            .target
            .set(TargetType::Audio, Some(source), Vec3::new(0.0, 0.0, -8.0), 8.0, 0.0);
        let mut state = PursuitState::new(PursuitTuning::default());
        state.on_enter(&mut fx.ctx(0.0));

        fx.navigation.state().status = crate::services::PathStatus::Partial;
        assert_eq!(state.on_update(&mut fx.ctx(0.1)), BehaviorKind::Alerted);
    }

    #[test]
    fn test_pursuit_different_sound_source_realerts() {
        let mut fx = AgentFixture::new();
        let first = fx.spawn();
        let second = fx.spawn();
        fx.zombie
            .target
            .set(TargetType::Audio, Some(first), Vec3::new(0.0, 0.0, -8.0), 8.0, 0.0);
        let mut state = PursuitState::new(PursuitTuning::default());
        state.on_enter(&mut fx.ctx(0.0));

        fx.zombie
            .threats
            .audio
            .set(TargetType::Audio, Some(second), Vec3::new(4.0, 0.0, 0.0), 4.0, 0.0);
        assert_eq!(state.on_update(&mut fx.ctx(0.1)), BehaviorKind::Alerted);
        assert_eq!(fx.zombie.target.source, Some(second));
    }

    // ------------------------------------------------------------------
    // Attack
    // ------------------------------------------------------------------

    fn attack_fixture() -> (AgentFixture, Entity) {
        let mut fx = AgentFixture::new();
        let player = fx.spawn();
        fx.zombie
            .target
            .set(TargetType::VisualPlayer, Some(player), Vec3::new(0.0, 0.0, -1.0), 1.0, 0.0);
        (fx, player)
    }

    #[test]
    fn test_attack_player_out_of_melee_resumes_pursuit() {
        let (mut fx, player) = attack_fixture();
        let mut state = AttackState::new(AttackTuning::default());
        state.on_enter(&mut fx.ctx(0.0));
        assert!((1..100).contains(&fx.zombie.locomotion.attack_type));

        fx.zombie
            .threats
            .visual
            .set(TargetType::VisualPlayer, Some(player), Vec3::new(0.0, 0.0, -3.0), 3.0, 0.0);
        fx.zombie.in_melee_range = false;
        assert_eq!(state.on_update(&mut fx.ctx(0.1)), BehaviorKind::Pursuit);
    }

    #[test]
    fn test_attack_keeps_attacking_in_melee_range() {
        let (mut fx, player) = attack_fixture();
        let mut state = AttackState::new(AttackTuning::default());
        state.on_enter(&mut fx.ctx(0.0));

        fx.zombie
            .threats
            .visual
            .set(TargetType::VisualPlayer, Some(player), Vec3::new(0.0, 0.0, -1.0), 1.0, 0.0);
        fx.zombie.in_melee_range = true;

        assert_eq!(state.on_update(&mut fx.ctx(0.1)), BehaviorKind::Attack);
        // Ближе stopping distance → стоим
        assert_eq!(fx.zombie.locomotion.speed, 0.0);
        assert!((1..100).contains(&fx.zombie.locomotion.attack_type));

        state.on_exit(&mut fx.ctx(0.0));
        assert_eq!(fx.zombie.locomotion.attack_type, 0);
    }

    #[test]
    fn test_attack_without_visual_threat_realerts() {
        let (mut fx, _) = attack_fixture();
        let mut state = AttackState::new(AttackTuning::default());
        state.on_enter(&mut fx.ctx(0.0));
        assert_eq!(state.on_update(&mut fx.ctx(0.1)), BehaviorKind::Alerted);
    }

    #[test]
    fn test_attack_look_at_weight_blends_in() {
        let (mut fx, _) = attack_fixture();
        let mut state = AttackState::new(AttackTuning::default());
        state.on_enter(&mut fx.ctx(0.0));

        state.on_animation_ik_updated(&mut fx.ctx(0.5));
        assert!((state.look_at_weight() - 0.35).abs() < 1e-5);

        let (position, weight) = fx.animation.state().look_at.unwrap();
        assert_eq!(position, Vec3::new(0.0, 1.0, -1.0));
        assert!((weight - 0.35).abs() < 1e-5);
    }

    #[test]
    fn test_attack_look_at_weight_fades_when_target_outside_cone() {
        let (mut fx, _) = attack_fixture();
        let mut state = AttackState::new(AttackTuning::default());
        state.on_enter(&mut fx.ctx(0.0));
        state.on_animation_ik_updated(&mut fx.ctx(0.5));

        fx.zombie.target.position = Vec3::new(5.0, 0.0, 0.0);
        state.on_animation_ik_updated(&mut fx.ctx(0.5));
        assert!(state.look_at_weight() < 0.35);
    }

    // ------------------------------------------------------------------
    // Feeding
    // ------------------------------------------------------------------

    fn feeding_fixture() -> AgentFixture {
        let mut fx = AgentFixture::new();
        let food = fx.spawn();
        fx.zombie
            .target
            .set(TargetType::VisualFood, Some(food), Vec3::new(0.0, 0.0, -0.5), 0.5, 0.0);
        fx.zombie.appetite.satisfaction = 0.5;
        fx
    }

    #[test]
    fn test_feeding_sated_zombie_stops_eating() {
        let mut fx = feeding_fixture();
        let mut state = FeedingState::new(FeedingTuning::default());
        state.on_enter(&mut fx.ctx(0.0));
        assert!(fx.zombie.locomotion.feeding);

        fx.zombie.appetite.satisfaction = 0.95;
        assert_eq!(state.on_update(&mut fx.ctx(0.1)), BehaviorKind::Alerted);
        // Waypoints нет → цель очищена
        assert!(fx.zombie.target.is_none());

        state.on_exit(&mut fx.ctx(0.0));
        assert!(!fx.zombie.locomotion.feeding);
    }

    #[test]
    fn test_feeding_eats_and_bleeds_while_animating() {
        let mut fx = feeding_fixture();
        fx.animation.set_layer_state(params::CINEMATIC_LAYER, params::FEEDING_STATE);
        let mut state = FeedingState::new(FeedingTuning::default());
        state.on_enter(&mut fx.ctx(0.0));

        assert_eq!(state.on_update(&mut fx.ctx(0.2)), BehaviorKind::Feeding);

        assert!(fx.zombie.appetite.satisfaction > 0.5);
        assert_eq!(fx.effects.blood.len(), 1);
        assert_eq!(fx.effects.blood[0].amount, 10);
        assert_eq!(fx.effects.blood[0].position, Vec3::new(0.0, 1.7, 0.0));
        // Голову тянет к еде
        assert!(fx.transform.translation.z < 0.0);
    }

    #[test]
    fn test_feeding_without_feeding_animation_does_not_eat() {
        let mut fx = feeding_fixture();
        let mut state = FeedingState::new(FeedingTuning::default());
        state.on_enter(&mut fx.ctx(0.0));

        assert_eq!(state.on_update(&mut fx.ctx(0.2)), BehaviorKind::Feeding);
        assert_eq!(fx.zombie.appetite.satisfaction, 0.5);
        assert!(fx.effects.blood.is_empty());
    }

    #[test]
    fn test_feeding_interrupted_by_sound() {
        let mut fx = feeding_fixture();
        let source = fx.spawn();
        let mut state = FeedingState::new(FeedingTuning::default());
        state.on_enter(&mut fx.ctx(0.0));

        fx.zombie
            .threats
            .audio
            .set(TargetType::Audio, Some(source), Vec3::new(3.0, 0.0, 0.0), 3.0, 0.0);
        assert_eq!(state.on_update(&mut fx.ctx(0.1)), BehaviorKind::Alerted);
        assert!(fx.zombie.target.is(TargetType::Audio));
    }
}
