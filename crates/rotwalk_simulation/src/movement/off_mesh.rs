//! Off-mesh link traversal (прыжок / спуск по link'у навигации)
//!
//! Routine живёт в компоненте агента и продвигается раз в tick.
//! Новый старт инвалидирует предыдущий (generation).

use bevy::prelude::*;

use crate::services::OffMeshLink;

/// Длительность прыжка (секунды)
pub const JUMP_DURATION: f32 = 1.0;
/// Высота дуги в середине прыжка
pub const JUMP_HEIGHT: f32 = 1.0;

/// Дуга прыжка: 0 на краях, 1 в середине
pub fn jump_curve(t: f32) -> f32 {
    4.0 * t * (1.0 - t)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffMeshJump {
    pub generation: u64,
    pub start: Vec3,
    /// Конец link'а + base offset навигации
    pub end: Vec3,
    pub elapsed: f32,
    pub duration: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JumpStep {
    /// Позиция агента на этом tick
    Airborne(Vec3),
    Landed,
}

/// In-flight off-mesh traversal агента (максимум одна)
#[derive(Component, Debug, Clone, Default)]
pub struct OffMeshTraversal {
    jump: Option<OffMeshJump>,
    generation: u64,
}

impl OffMeshTraversal {
    /// Старт прыжка из текущей позиции агента. Активный прыжок отменяется
    pub fn start(&mut self, from: Vec3, link: OffMeshLink, base_offset: f32) -> u64 {
        self.generation += 1;
        self.jump = Some(OffMeshJump {
            generation: self.generation,
            start: from,
            end: link.end + Vec3::Y * base_offset,
            elapsed: 0.0,
            duration: JUMP_DURATION,
        });
        self.generation
    }

    pub fn cancel(&mut self) {
        self.jump = None;
    }

    pub fn jump(&self) -> Option<OffMeshJump> {
        self.jump
    }

    pub fn is_active(&self) -> bool {
        self.jump.is_some()
    }

    /// Шаг routine: позиция на дуге, пока elapsed ≤ duration, затем Landed
    pub fn step(&mut self, delta: f32) -> Option<JumpStep> {
        let jump = self.jump.as_mut()?;
        if jump.elapsed > jump.duration {
            self.jump = None;
            return Some(JumpStep::Landed);
        }

        let t = jump.elapsed / jump.duration;
        let position = jump.start.lerp(jump.end, t) + Vec3::Y * (JUMP_HEIGHT * jump_curve(t));
        jump.elapsed += delta;
        Some(JumpStep::Airborne(position))
    }
}
