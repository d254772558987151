//! Waypoint network: упорядоченный набор patrol точек

use bevy::prelude::*;
use rand::Rng;

/// Patrol маршрут агента
///
/// `current = None`: маршрут ещё не начат. Индекс всегда в пределах `waypoints`.
#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct PatrolRoute {
    pub waypoints: Vec<Vec3>,
    pub current: Option<usize>,
    /// Случайный порядок вместо последовательного
    pub random: bool,
}

impl PatrolRoute {
    pub fn new(waypoints: Vec<Vec3>, random: bool) -> Self {
        Self {
            waypoints,
            current: None,
            random,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Текущая (или следующая при `increment`) точка маршрута
    ///
    /// Первый вызов выбирает стартовую точку (0 или случайную), `increment` игнорируется.
    pub fn waypoint(&mut self, increment: bool, rng: &mut impl Rng) -> Option<Vec3> {
        if self.waypoints.is_empty() {
            return None;
        }

        let index = match self.current {
            None if self.random => rng.gen_range(0..self.waypoints.len()),
            None => 0,
            Some(current) if increment => self.next_index(current, rng),
            Some(current) => current.min(self.waypoints.len() - 1),
        };

        self.current = Some(index);
        self.waypoints.get(index).copied()
    }

    fn next_index(&self, current: usize, rng: &mut impl Rng) -> usize {
        let count = self.waypoints.len();
        if self.random && count > 1 {
            // Случайная точка, но не текущая
            let offset = rng.gen_range(1..count);
            (current + offset) % count
        } else if current + 1 >= count {
            0
        } else {
            current + 1
        }
    }
}
