//! Target Descriptor + threat candidates (VisualThreat / AudioThreat)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Тип цели / раздражителя
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum TargetType {
    #[default]
    None,
    Waypoint,
    VisualPlayer,
    VisualLight,
    VisualFood,
    Audio,
}

/// Цель (или кандидат угрозы): тип, источник, позиция, дистанция, время фиксации
///
/// Cleared состояние: `kind = None`, `distance = INFINITY`: любой кандидат "ближе".
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct AiTarget {
    pub kind: TargetType,
    /// Collider источника (None для waypoint)
    pub source: Option<Entity>,
    pub position: Vec3,
    pub distance: f32,
    /// Simulated time момента set()
    pub timestamp: f32,
}

impl Default for AiTarget {
    fn default() -> Self {
        Self {
            kind: TargetType::None,
            source: None,
            position: Vec3::ZERO,
            distance: f32::INFINITY,
            timestamp: 0.0,
        }
    }
}

impl AiTarget {
    pub fn set(&mut self, kind: TargetType, source: Option<Entity>, position: Vec3, distance: f32, now: f32) {
        self.kind = kind;
        self.source = source;
        self.position = position;
        self.distance = distance;
        self.timestamp = now;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_none(&self) -> bool {
        self.kind == TargetType::None
    }

    pub fn is(&self, kind: TargetType) -> bool {
        self.kind == kind
    }
}

/// Perception model: лучшие кандидаты текущего physics tick
///
/// Очищается в начале каждого physics tick, не переживает tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct ThreatModel {
    pub visual: AiTarget,
    pub audio: AiTarget,
}

impl ThreatModel {
    pub fn clear(&mut self) {
        self.visual.clear();
        self.audio.clear();
    }
}
