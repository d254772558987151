//! ECS Components для зомби-агентов
//!
//! Организация по доменам:
//! - zombie: данные агента (senses, vitals, appetite, locomotion, root motion)
//! - target: Target Descriptor + tick-scoped threat candidates
//! - patrol: waypoint network
//! - stimulus: источники раздражителей + части тела

pub mod patrol;
pub mod stimulus;
pub mod target;
pub mod zombie;

pub use patrol::*;
pub use stimulus::*;
pub use target::*;
pub use zombie::*;
