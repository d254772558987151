//! Skeletal-animation collaborator
//!
//! Параметры адресуются по имени (как в animator controller ассете).
//! Имена, которые читает controller зомби, собраны в [`params`].

use bevy::prelude::*;

/// Humanoid bone index в скелете агента
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoneId(pub u16);

impl BoneId {
    /// Root bone (таз): единственная кость, чья позиция blend'ится при reanimation
    pub const HIPS: BoneId = BoneId(0);
    pub const HEAD: BoneId = BoneId(1);
    pub const LEFT_FOOT: BoneId = BoneId(2);
    pub const RIGHT_FOOT: BoneId = BoneId(3);
}

/// Результат sampling позы за кадр (root motion)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseDelta {
    pub delta_position: Vec3,
    pub root_rotation: Quat,
}

/// Имена параметров / слоёв / состояний animator controller
pub mod params {
    pub const SPEED: &str = "Speed";
    pub const SEEKING: &str = "Seeking";
    pub const FEEDING: &str = "Feeding";
    pub const ATTACK: &str = "Attack";
    pub const STATE: &str = "State";
    pub const CRAWLING: &str = "Crawling";
    pub const HIT: &str = "Hit";
    pub const HIT_TYPE: &str = "HitType";
    pub const UPPER_BODY_DAMAGE: &str = "Upper Body Damage";
    pub const LOWER_BODY_DAMAGE: &str = "Lower Body Damage";
    pub const REANIMATE_FROM_BACK: &str = "Reanimate From Back";
    pub const REANIMATE_FROM_FRONT: &str = "Reanimate From Front";

    pub const CINEMATIC_LAYER: &str = "Cinematic";
    pub const FEEDING_STATE: &str = "Feeding State";
    pub const CRAWL_FEEDING_STATE: &str = "Crawl Feeding State";
}

pub trait AnimationRig: Send + Sync {
    fn set_float(&mut self, name: &str, value: f32);
    fn set_int(&mut self, name: &str, value: i32);
    fn set_bool(&mut self, name: &str, value: bool);
    /// One-shot trigger (сбрасывается controller'ом после срабатывания)
    fn set_trigger(&mut self, name: &str);

    /// Имя текущего состояния на слое (`None`: слой не найден)
    fn current_state(&self, layer: &str) -> Option<String>;

    fn bone_world_transform(&self, bone: BoneId) -> Option<Transform>;
    /// Перезаписать world позу кости поверх анимации (позиция опциональна)
    fn set_bone_world_pose(&mut self, bone: BoneId, position: Option<Vec3>, rotation: Quat);
    /// Кости, для которых снимаются snapshots при reanimation
    fn tracked_bones(&self) -> Vec<BoneId>;

    fn set_enabled(&mut self, enabled: bool);
    fn is_enabled(&self) -> bool;

    fn set_look_at(&mut self, position: Vec3, weight: f32);

    /// Просэмплировать позу за `delta` секунд (вызывается один раз за кадр)
    fn sample(&mut self, root: &Transform, delta: f32) -> PoseDelta;
}
