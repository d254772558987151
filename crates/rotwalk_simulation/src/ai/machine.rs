//! BehaviorMachine: registry состояний + transition protocol
//!
//! Протокол tick:
//! 1. `on_update` активного state → желаемый kind
//! 2. kind != текущего → `on_exit` текущего, lookup нового (промах → Idle), `on_enter`
//! 3. активный kind обновляется ровно один раз
//!
//! Bone control замораживает машину (`freeze`) на время ragdoll и возвращает её через `force`.

use std::collections::HashMap;

use bevy::prelude::*;
use thiserror::Error;

use super::context::StateContext;
use super::events::{BehaviorChanged, SensorPhase};
use super::state::ZombieState;
use super::states::{AlertedState, AttackState, FeedingState, IdleState, PatrolState, PursuitState};
use super::BehaviorKind;
use crate::components::Percept;
use crate::config::BehaviorTuning;
use crate::logger;
use crate::services::PoseDelta;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BehaviorSetupError {
    #[error("agent {agent:?} has no Idle state registered; behavior machine stays inert")]
    MissingIdle { agent: Entity },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MachinePhase {
    /// Ещё не стартовала (initial state не entered)
    Pending,
    Running,
    /// Ragdoll: активного state нет, dispatch выключен
    Frozen,
    /// Ошибка конфигурации: машина инертна навсегда
    Failed,
}

#[derive(Component)]
pub struct BehaviorMachine {
    states: HashMap<BehaviorKind, Box<dyn ZombieState>>,
    current: BehaviorKind,
    initial: BehaviorKind,
    phase: MachinePhase,
}

impl BehaviorMachine {
    pub fn new(initial: BehaviorKind) -> Self {
        Self {
            states: HashMap::new(),
            current: BehaviorKind::None,
            initial,
            phase: MachinePhase::Pending,
        }
    }

    /// Полный набор состояний зомби
    pub fn standard(initial: BehaviorKind, tuning: &BehaviorTuning) -> Self {
        Self::new(initial)
            .with_state(IdleState::new(tuning.idle.clone()))
            .with_state(AlertedState::new(tuning.alerted.clone()))
            .with_state(PatrolState::new(tuning.patrol.clone()))
            .with_state(PursuitState::new(tuning.pursuit.clone()))
            .with_state(AttackState::new(tuning.attack.clone()))
            .with_state(FeedingState::new(tuning.feeding.clone()))
    }

    /// Регистрация state. Первый зарегистрированный для kind выигрывает
    pub fn with_state(mut self, state: impl ZombieState + 'static) -> Self {
        self.register(Box::new(state));
        self
    }

    pub fn register(&mut self, state: Box<dyn ZombieState>) {
        let kind = state.kind();
        if self.states.contains_key(&kind) {
            logger::log_warning(&format!("BehaviorMachine: duplicate {:?} state ignored", kind));
            return;
        }
        self.states.insert(kind, state);
    }

    /// Активный kind (`None`: машина не запущена, заморожена или инертна)
    pub fn current(&self) -> BehaviorKind {
        self.current
    }

    pub fn is_registered(&self, kind: BehaviorKind) -> bool {
        self.states.contains_key(&kind)
    }

    pub fn is_running(&self) -> bool {
        self.phase == MachinePhase::Running
    }

    pub fn is_frozen(&self) -> bool {
        self.phase == MachinePhase::Frozen
    }

    pub fn is_inert(&self) -> bool {
        self.phase == MachinePhase::Failed
    }

    /// Enter initial state (или Idle, если initial не зарегистрирован)
    ///
    /// Ошибка логируется один раз, машина переходит в инертный режим.
    pub fn start(&mut self, ctx: &mut StateContext<'_>) -> Result<(), BehaviorSetupError> {
        if self.phase != MachinePhase::Pending {
            return Ok(());
        }
        self.require_idle(ctx.agent)?;

        let kind = self.resolve(self.initial);
        if kind != self.initial {
            logger::log_warning(&format!(
                "BehaviorMachine {:?}: initial {:?} not registered, starting in {:?}",
                ctx.agent, self.initial, kind
            ));
        }

        self.enter(kind, ctx);
        self.phase = MachinePhase::Running;
        Ok(())
    }

    /// Один logic tick: update активного state + transition при необходимости
    pub fn tick(&mut self, ctx: &mut StateContext<'_>) {
        if self.phase == MachinePhase::Pending && self.start(ctx).is_err() {
            return;
        }
        if self.phase != MachinePhase::Running {
            return;
        }

        let Some(state) = self.states.get_mut(&self.current) else {
            return;
        };
        let requested = state.on_update(ctx);

        if requested != self.current {
            self.transition(requested, ctx);
        }
    }

    /// exit → lookup (промах → Idle) → enter. Повторный вход в тот же kind тоже проходит exit/enter
    fn transition(&mut self, requested: BehaviorKind, ctx: &mut StateContext<'_>) {
        let from = self.current;
        let to = self.resolve(requested);
        if to != requested {
            logger::log_warning(&format!(
                "BehaviorMachine {:?}: {:?} not registered, falling back to {:?}",
                ctx.agent, requested, to
            ));
        }

        self.exit_current(ctx);
        self.enter(to, ctx);

        logger::log(&format!("🧟 {:?}: {:?} → {:?}", ctx.agent, from, to));
        ctx.effects.transitions.push(BehaviorChanged {
            agent: ctx.agent,
            from,
            to,
        });
    }

    /// Ragdoll: exit активного state, dispatch выключен до `force`
    pub fn freeze(&mut self, ctx: &mut StateContext<'_>) {
        match self.phase {
            MachinePhase::Running => {
                let from = self.current;
                self.exit_current(ctx);
                self.current = BehaviorKind::None;
                self.phase = MachinePhase::Frozen;
                ctx.effects.transitions.push(BehaviorChanged {
                    agent: ctx.agent,
                    from,
                    to: BehaviorKind::None,
                });
            }
            MachinePhase::Pending => self.phase = MachinePhase::Frozen,
            MachinePhase::Frozen | MachinePhase::Failed => {}
        }
    }

    /// Принудительный переход (конец reanimation → Alerted). Промах → Idle
    pub fn force(&mut self, requested: BehaviorKind, ctx: &mut StateContext<'_>) {
        if self.phase == MachinePhase::Failed {
            return;
        }
        if self.require_idle(ctx.agent).is_err() {
            return;
        }

        let from = self.current;
        let to = self.resolve(requested);
        self.exit_current(ctx);
        self.enter(to, ctx);
        self.phase = MachinePhase::Running;

        logger::log(&format!("🧟 {:?}: forced {:?} → {:?}", ctx.agent, from, to));
        ctx.effects.transitions.push(BehaviorChanged {
            agent: ctx.agent,
            from,
            to,
        });
    }

    pub fn destination_reached(&mut self, ctx: &mut StateContext<'_>, reached: bool) {
        if let Some(state) = self.active_state() {
            state.on_destination_reached(ctx, reached);
        }
    }

    pub fn sensor_event(&mut self, ctx: &mut StateContext<'_>, phase: SensorPhase, percept: &Percept) {
        if let Some(state) = self.active_state() {
            state.on_sensor_event(ctx, phase, percept);
        }
    }

    pub fn pose_updated(&mut self, ctx: &mut StateContext<'_>, pose: &PoseDelta) {
        if let Some(state) = self.active_state() {
            state.on_animation_pose_updated(ctx, pose);
        }
    }

    pub fn ik_updated(&mut self, ctx: &mut StateContext<'_>) {
        if let Some(state) = self.active_state() {
            state.on_animation_ik_updated(ctx);
        }
    }

    fn active_state(&mut self) -> Option<&mut Box<dyn ZombieState>> {
        if self.phase != MachinePhase::Running {
            return None;
        }
        self.states.get_mut(&self.current)
    }

    fn resolve(&self, requested: BehaviorKind) -> BehaviorKind {
        if self.states.contains_key(&requested) {
            requested
        } else {
            BehaviorKind::Idle
        }
    }

    fn require_idle(&mut self, agent: Entity) -> Result<(), BehaviorSetupError> {
        if self.states.contains_key(&BehaviorKind::Idle) {
            return Ok(());
        }
        let error = BehaviorSetupError::MissingIdle { agent };
        if self.phase != MachinePhase::Failed {
            logger::log_error(&format!("BehaviorMachine: {}", error));
        }
        self.phase = MachinePhase::Failed;
        self.current = BehaviorKind::None;
        Err(error)
    }

    fn exit_current(&mut self, ctx: &mut StateContext<'_>) {
        if let Some(state) = self.states.get_mut(&self.current) {
            state.on_exit(ctx);
        }
    }

    fn enter(&mut self, kind: BehaviorKind, ctx: &mut StateContext<'_>) {
        if let Some(state) = self.states.get_mut(&kind) {
            state.on_enter(ctx);
            self.current = kind;
        }
    }
}

impl std::fmt::Debug for BehaviorMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut registered: Vec<BehaviorKind> = self.states.keys().copied().collect();
        registered.sort_by_key(|kind| kind.animator_code());
        f.debug_struct("BehaviorMachine")
            .field("current", &self.current)
            .field("phase", &self.phase)
            .field("registered", &registered)
            .finish()
    }
}
