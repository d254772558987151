//! Bone control: кто ведёт скелет: animator, ragdoll физика или blend между ними
//!
//! Переходы строго по кругу: Animated → Ragdoll → RagdollToAnimated → Animated.
//! Reanimation routine = generation counter + время старта; перезапуск инвалидирует старый.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ReanimationConfig;
use crate::logger;
use crate::services::BoneId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum BoneControlMode {
    #[default]
    Animated,
    Ragdoll,
    RagdollToAnimated,
}

impl BoneControlMode {
    pub fn can_transition_to(self, next: BoneControlMode) -> bool {
        matches!(
            (self, next),
            (BoneControlMode::Animated, BoneControlMode::Ragdoll)
                | (BoneControlMode::Ragdoll, BoneControlMode::RagdollToAnimated)
                | (BoneControlMode::RagdollToAnimated, BoneControlMode::Animated)
        )
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BoneControlError {
    #[error("illegal bone control transition {from:?} → {to:?}")]
    IllegalTransition { from: BoneControlMode, to: BoneControlMode },
}

/// Локальная ось root bone, по которой определяется "лежит на спине / на животе"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum BoneAlignment {
    XAxis,
    YAxis,
    #[default]
    ZAxis,
    XAxisInverted,
    YAxisInverted,
    ZAxisInverted,
}

impl BoneAlignment {
    /// Вертикальная компонента выбранной оси кости (>= 0 → reanimate from back)
    pub fn forward_test(self, rotation: Quat) -> f32 {
        match self {
            BoneAlignment::XAxis => (rotation * Vec3::X).y,
            BoneAlignment::YAxis => (rotation * Vec3::Y).y,
            BoneAlignment::ZAxis => (rotation * Vec3::Z).y,
            BoneAlignment::XAxisInverted => -(rotation * Vec3::X).y,
            BoneAlignment::YAxisInverted => -(rotation * Vec3::Y).y,
            BoneAlignment::ZAxisInverted => -(rotation * Vec3::Z).y,
        }
    }
}

/// World поза кости в момент выхода из ragdoll
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPartSnapshot {
    pub bone: BoneId,
    pub position: Vec3,
    pub rotation: Quat,
}

/// Команды rigid body частям скелета (применяются в `combat::systems`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RagdollCommand {
    /// Все части тела агента: kinematic (true) / свободная симуляция (false)
    SetKinematic(bool),
    Impulse { part: Entity, impulse: Vec3 },
    /// Основной collider агента
    SetSolid(bool),
}

/// In-flight reanimation routine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReanimationRoutine {
    pub generation: u64,
    /// Simulated time старта (секунды)
    pub started_at: f32,
}

#[derive(Component, Debug, Clone)]
pub struct BoneControl {
    mode: BoneControlMode,
    pub config: ReanimationConfig,
    routine: Option<ReanimationRoutine>,
    generation: u64,

    pub snapshots: Vec<BodyPartSnapshot>,
    /// Момент capture (начало RagdollToAnimated)
    pub ragdoll_end_time: f32,
    pub ragdoll_hip_position: Vec3,
    pub ragdoll_head_position: Vec3,
    pub ragdoll_feet_position: Vec3,

    /// Ожидают применения к rigid bodies
    pub commands: Vec<RagdollCommand>,
}

impl BoneControl {
    pub fn new(config: ReanimationConfig) -> Self {
        Self {
            mode: BoneControlMode::Animated,
            config,
            routine: None,
            generation: 0,
            snapshots: Vec::new(),
            ragdoll_end_time: f32::MIN,
            ragdoll_hip_position: Vec3::ZERO,
            ragdoll_head_position: Vec3::ZERO,
            ragdoll_feet_position: Vec3::ZERO,
            commands: Vec::new(),
        }
    }

    pub fn mode(&self) -> BoneControlMode {
        self.mode
    }

    pub fn transition(&mut self, to: BoneControlMode) -> Result<(), BoneControlError> {
        if !self.mode.can_transition_to(to) {
            return Err(BoneControlError::IllegalTransition { from: self.mode, to });
        }
        logger::log(&format!("🦴 Bone control: {:?} → {:?}", self.mode, to));
        self.mode = to;
        Ok(())
    }

    /// (Пере)запуск reanimation: in-flight routine отменяется
    pub fn start_reanimation(&mut self, now: f32) -> u64 {
        if let Some(previous) = self.routine {
            logger::log(&format!(
                "🦴 Reanimation #{} cancelled (restarted at {:.2}s)",
                previous.generation, now
            ));
        }
        self.generation += 1;
        self.routine = Some(ReanimationRoutine {
            generation: self.generation,
            started_at: now,
        });
        logger::log(&format!("🦴 Reanimation #{} scheduled at {:.2}s", self.generation, now));
        self.generation
    }

    pub fn cancel_reanimation(&mut self) {
        self.routine = None;
    }

    pub fn routine(&self) -> Option<ReanimationRoutine> {
        self.routine
    }

    pub fn is_reanimating(&self) -> bool {
        self.routine.is_some()
    }

    /// Окно, в котором root агента выравнивается по ragdoll hip
    pub fn in_transition_window(&self, now: f32) -> bool {
        now <= self.ragdoll_end_time + self.config.mecanim_transition_time
    }

    /// Нормализованный blend ragdoll → animated, [0, 1]
    pub fn blend_factor(&self, now: f32) -> f32 {
        let elapsed = now - self.ragdoll_end_time - self.config.mecanim_transition_time;
        (elapsed / self.config.blend_time).clamp(0.0, 1.0)
    }

    pub fn impulse(&mut self, part: Entity, impulse: Vec3) {
        self.commands.push(RagdollCommand::Impulse { part, impulse });
    }
}

impl Default for BoneControl {
    fn default() -> Self {
        Self::new(ReanimationConfig::default())
    }
}
