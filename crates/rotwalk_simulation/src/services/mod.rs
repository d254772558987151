//! External collaborators (navigation, physics queries, animation) + agent registry
//!
//! Ядро AI работает только через эти traits. Реальный движок подключает свои реализации,
//! тесты и headless демо используют `headless`.

pub mod animation;
pub mod headless;
pub mod navigation;
pub mod physics;
pub mod registry;
pub mod rig;


pub use animation::{params, AnimationRig, BoneId, PoseDelta};
pub use navigation::{NavMeshQuery, NavigationAgent, OffMeshLink, PathStatus};
pub use physics::{PhysicsQuery, RayHit};
pub use registry::{AgentRegistry, SceneServices};
pub use rig::ZombieRig;
