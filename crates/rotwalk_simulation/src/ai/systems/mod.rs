//! AI systems (ECS): по одной группе на фазу agent tick

pub mod animation;
pub mod behavior;
pub mod sensing;

pub use animation::{apply_animation_links, sample_animation, update_ik};
pub use behavior::{push_locomotion_params, run_behavior};
pub use sensing::{begin_physics_tick, dispatch_sensor_events, register_agent_colliders, update_target_triggers};
