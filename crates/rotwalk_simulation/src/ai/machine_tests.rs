//! Tests for BehaviorMachine (transition protocol, fallback, freeze/force).

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::super::context::StateContext;
    use super::super::machine::{BehaviorMachine, BehaviorSetupError};
    use super::super::state::ZombieState;
    use super::super::testing::AgentFixture;
    use super::super::BehaviorKind;
    use crate::config::BehaviorTuning;

    type Journal = Arc<Mutex<Vec<String>>>;

    /// State, который пишет lifecycle hooks в общий журнал и просит заданный переход
    struct Recorder {
        kind: BehaviorKind,
        request: Arc<Mutex<Option<BehaviorKind>>>,
        journal: Journal,
    }

    impl ZombieState for Recorder {
        fn kind(&self) -> BehaviorKind {
            self.kind
        }

        fn on_enter(&mut self, _ctx: &mut StateContext<'_>) {
            self.journal.lock().unwrap().push(format!("enter {:?}", self.kind));
        }

        fn on_update(&mut self, _ctx: &mut StateContext<'_>) -> BehaviorKind {
            self.journal.lock().unwrap().push(format!("update {:?}", self.kind));
            self.request.lock().unwrap().take().unwrap_or(self.kind)
        }

        fn on_exit(&mut self, _ctx: &mut StateContext<'_>) {
            self.journal.lock().unwrap().push(format!("exit {:?}", self.kind));
        }

        fn on_destination_reached(&mut self, _ctx: &mut StateContext<'_>, reached: bool) {
            self.journal.lock().unwrap().push(format!("reached {:?} {}", self.kind, reached));
        }
    }

    struct Rig {
        journal: Journal,
        request: Arc<Mutex<Option<BehaviorKind>>>,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                journal: Arc::default(),
                request: Arc::default(),
            }
        }

        fn recorder(&self, kind: BehaviorKind) -> Recorder {
            Recorder {
                kind,
                request: self.request.clone(),
                journal: self.journal.clone(),
            }
        }

        fn request(&self, kind: BehaviorKind) {
            *self.request.lock().unwrap() = Some(kind);
        }

        fn take_journal(&self) -> Vec<String> {
            std::mem::take(&mut *self.journal.lock().unwrap())
        }
    }

    fn machine(rig: &Rig, initial: BehaviorKind, kinds: &[BehaviorKind]) -> BehaviorMachine {
        kinds
            .iter()
            .fold(BehaviorMachine::new(initial), |machine, kind| machine.with_state(rig.recorder(*kind)))
    }

    #[test]
    fn test_first_tick_enters_initial_state() {
        let rig = Rig::new();
        let mut fx = AgentFixture::new();
        let mut machine = machine(&rig, BehaviorKind::Alerted, &[BehaviorKind::Idle, BehaviorKind::Alerted]);

        machine.tick(&mut fx.ctx(0.1));

        assert_eq!(machine.current(), BehaviorKind::Alerted);
        assert!(machine.is_running());
        assert_eq!(rig.take_journal(), vec!["enter Alerted", "update Alerted"]);
    }

    #[test]
    fn test_same_kind_produces_no_lifecycle_hooks() {
        let rig = Rig::new();
        let mut fx = AgentFixture::new();
        let mut machine = machine(&rig, BehaviorKind::Idle, &[BehaviorKind::Idle]);
        machine.tick(&mut fx.ctx(0.1));
        rig.take_journal();

        for _ in 0..5 {
            machine.tick(&mut fx.ctx(0.1));
        }

        assert_eq!(rig.take_journal(), vec!["update Idle"; 5]);
        assert!(fx.effects.transitions.is_empty());
    }

    #[test]
    fn test_transition_exits_before_entering() {
        let rig = Rig::new();
        let mut fx = AgentFixture::new();
        let mut machine = machine(&rig, BehaviorKind::Idle, &[BehaviorKind::Idle, BehaviorKind::Pursuit]);
        machine.tick(&mut fx.ctx(0.1));
        rig.take_journal();

        rig.request(BehaviorKind::Pursuit);
        machine.tick(&mut fx.ctx(0.1));

        assert_eq!(rig.take_journal(), vec!["update Idle", "exit Idle", "enter Pursuit"]);
        assert_eq!(machine.current(), BehaviorKind::Pursuit);

        let change = fx.effects.transitions.last().copied().unwrap();
        assert_eq!(change.from, BehaviorKind::Idle);
        assert_eq!(change.to, BehaviorKind::Pursuit);
        assert_eq!(change.agent, fx.agent);
    }

    #[test]
    fn test_unregistered_request_falls_back_to_idle() {
        let rig = Rig::new();
        let mut fx = AgentFixture::new();
        let mut machine = machine(&rig, BehaviorKind::Alerted, &[BehaviorKind::Idle, BehaviorKind::Alerted]);
        machine.tick(&mut fx.ctx(0.1));
        rig.take_journal();

        rig.request(BehaviorKind::Feeding);
        machine.tick(&mut fx.ctx(0.1));

        assert_eq!(machine.current(), BehaviorKind::Idle);
        assert_eq!(rig.take_journal(), vec!["update Alerted", "exit Alerted", "enter Idle"]);
        assert_eq!(fx.effects.transitions.last().unwrap().to, BehaviorKind::Idle);
    }

    #[test]
    fn test_unregistered_initial_starts_in_idle() {
        let rig = Rig::new();
        let mut fx = AgentFixture::new();
        let mut machine = machine(&rig, BehaviorKind::Patrol, &[BehaviorKind::Idle]);

        assert_eq!(machine.start(&mut fx.ctx(0.0)), Ok(()));
        assert_eq!(machine.current(), BehaviorKind::Idle);
    }

    #[test]
    fn test_missing_idle_leaves_machine_inert() {
        let rig = Rig::new();
        let mut fx = AgentFixture::new();
        let mut machine = machine(&rig, BehaviorKind::Alerted, &[BehaviorKind::Alerted]);

        let err = machine.start(&mut fx.ctx(0.0)).unwrap_err();
        assert_eq!(err, BehaviorSetupError::MissingIdle { agent: fx.agent });
        assert!(machine.is_inert());

        for _ in 0..3 {
            machine.tick(&mut fx.ctx(0.1));
        }
        machine.force(BehaviorKind::Alerted, &mut fx.ctx(0.0));

        assert_eq!(machine.current(), BehaviorKind::None);
        assert!(rig.take_journal().is_empty());
    }

    #[test]
    fn test_freeze_exits_and_stops_dispatch() {
        let rig = Rig::new();
        let mut fx = AgentFixture::new();
        let mut machine = machine(&rig, BehaviorKind::Idle, &[BehaviorKind::Idle, BehaviorKind::Alerted]);
        machine.tick(&mut fx.ctx(0.1));
        rig.take_journal();

        machine.freeze(&mut fx.ctx(0.0));
        assert!(machine.is_frozen());
        assert_eq!(machine.current(), BehaviorKind::None);

        machine.tick(&mut fx.ctx(0.1));
        machine.destination_reached(&mut fx.ctx(0.0), true);
        assert_eq!(rig.take_journal(), vec!["exit Idle"]);

        machine.force(BehaviorKind::Alerted, &mut fx.ctx(0.0));
        assert!(machine.is_running());
        assert_eq!(machine.current(), BehaviorKind::Alerted);
        assert_eq!(rig.take_journal(), vec!["enter Alerted"]);
    }

    #[test]
    fn test_force_unregistered_falls_back_to_idle() {
        let rig = Rig::new();
        let mut fx = AgentFixture::new();
        let mut machine = machine(&rig, BehaviorKind::Idle, &[BehaviorKind::Idle]);
        machine.tick(&mut fx.ctx(0.1));
        machine.freeze(&mut fx.ctx(0.0));

        machine.force(BehaviorKind::Alerted, &mut fx.ctx(0.0));
        assert_eq!(machine.current(), BehaviorKind::Idle);
    }

    #[test]
    fn test_duplicate_registration_keeps_first() {
        let rig = Rig::new();
        let other = Rig::new();
        let mut fx = AgentFixture::new();
        let mut machine = BehaviorMachine::new(BehaviorKind::Idle)
            .with_state(rig.recorder(BehaviorKind::Idle))
            .with_state(other.recorder(BehaviorKind::Idle));

        machine.tick(&mut fx.ctx(0.1));
        assert_eq!(rig.take_journal().len(), 2);
        assert!(other.take_journal().is_empty());
    }

    #[test]
    fn test_destination_reached_reaches_active_state_only() {
        let rig = Rig::new();
        let mut fx = AgentFixture::new();
        let mut machine = machine(&rig, BehaviorKind::Idle, &[BehaviorKind::Idle, BehaviorKind::Patrol]);

        // До старта hooks не доставляются
        machine.destination_reached(&mut fx.ctx(0.0), true);
        assert!(rig.take_journal().is_empty());

        machine.tick(&mut fx.ctx(0.1));
        rig.take_journal();
        machine.destination_reached(&mut fx.ctx(0.0), false);
        assert_eq!(rig.take_journal(), vec!["reached Idle false"]);
    }

    #[test]
    fn test_standard_machine_registers_every_behavior() {
        let machine = BehaviorMachine::standard(BehaviorKind::Idle, &BehaviorTuning::default());
        for kind in [
            BehaviorKind::Idle,
            BehaviorKind::Alerted,
            BehaviorKind::Patrol,
            BehaviorKind::Pursuit,
            BehaviorKind::Attack,
            BehaviorKind::Feeding,
        ] {
            assert!(machine.is_registered(kind), "{:?} missing", kind);
        }
        assert!(!machine.is_registered(BehaviorKind::None));
    }
}
