//! Behavior states зомби
//!
//! Каждый state владеет только своими таймерами + tuning; всё остальное живёт в `Zombie`.

pub mod alerted;
pub mod attack;
pub mod feeding;
pub mod idle;
pub mod patrol;
pub mod pursuit;

#[cfg(test)]
mod states_tests;

pub use alerted::AlertedState;
pub use attack::AttackState;
pub use feeding::FeedingState;
pub use idle::IdleState;
pub use patrol::PatrolState;
pub use pursuit::PursuitState;
