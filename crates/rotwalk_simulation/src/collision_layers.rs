//! Collision Layers Constants
//!
//! Physics layers: centralised constants для raycast масок.
//!
//! ## Layers (битовая маска):
//! - Layer 1 (0b1 = 1): Default (стены, пропсы)
//! - Layer 2 (0b10 = 2): Player
//! - Layer 3 (0b100 = 4): AI Body Part (ragdoll rigid bodies зомби)
//! - Layer 4 (0b1000 = 8): Visual Aggravator (flash light cone, food)
//! - Layer 5 (0b10000 = 16): Geometry (static floor/terrain для reanimation floor probe)
//!
//! ## Использование:
//! ```rust
//! use rotwalk_simulation::collision_layers::*;
//!
//! // LOS до игрока: Default + Player + AI Body Part
//! let mask = COLLISION_MASK_PLAYER_LOS;
//! assert_ne!(mask & COLLISION_LAYER_PLAYER, 0);
//! ```

/// Layer 1: Default (стены, препятствия)
pub const COLLISION_LAYER_DEFAULT: u32 = 0b1;

/// Layer 2: Player body
pub const COLLISION_LAYER_PLAYER: u32 = 0b10;

/// Layer 3: AI Body Part (rigid bodies скелета зомби)
pub const COLLISION_LAYER_AI_BODY_PART: u32 = 0b100;

/// Layer 4: Visual Aggravator (flash light cone, food volumes)
pub const COLLISION_LAYER_VISUAL_AGGRAVATOR: u32 = 0b1000;

/// Layer 5: Static geometry (пол, terrain)
pub const COLLISION_LAYER_GEOMETRY: u32 = 0b10000;

/// Mask: LOS до игрока (Default + Player + AI Body Part)
pub const COLLISION_MASK_PLAYER_LOS: u32 =
    COLLISION_LAYER_DEFAULT | COLLISION_LAYER_PLAYER | COLLISION_LAYER_AI_BODY_PART;

/// Mask: LOS до визуальных раздражителей (еда): + Visual Aggravator
pub const COLLISION_MASK_VISUAL_LOS: u32 = COLLISION_MASK_PLAYER_LOS | COLLISION_LAYER_VISUAL_AGGRAVATOR;

/// Mask: floor probe при reanimation (Default + Geometry)
pub const COLLISION_MASK_GEOMETRY: u32 = COLLISION_LAYER_DEFAULT | COLLISION_LAYER_GEOMETRY;
