//! Геометрия поворотов: углы между направлениями, look rotation

use bevy::prelude::*;

const MIN_LENGTH_SQUARED: f32 = 1e-8;

/// Угол между векторами (градусы, 0..=180). Нулевой вектор → 0
pub fn unsigned_angle_deg(from: Vec3, to: Vec3) -> f32 {
    if from.length_squared() < MIN_LENGTH_SQUARED || to.length_squared() < MIN_LENGTH_SQUARED {
        return 0.0;
    }
    from.angle_between(to).to_degrees()
}

/// Угол со знаком вокруг Y: знак = знак `(from × to).y`
///
/// Положительный угол = поворот `rotate_y(+angle)` ведёт `from` к `to`.
pub fn signed_angle_deg(from: Vec3, to: Vec3) -> f32 {
    let angle = unsigned_angle_deg(from, to);
    angle * sign(from.cross(to).y) as f32
}

/// Знак для выбора направления поворота: 0 считается положительным
pub fn sign(value: f32) -> i32 {
    if value >= 0.0 {
        1
    } else {
        -1
    }
}

/// Rotation, смотрящая из `from` на `to` в горизонтальной плоскости
pub fn flat_look_rotation(from: Vec3, to: Vec3) -> Option<Quat> {
    let direction = Vec3::new(to.x - from.x, 0.0, to.z - from.z);
    look_rotation(direction)
}

pub fn look_rotation(direction: Vec3) -> Option<Quat> {
    if direction.length_squared() < MIN_LENGTH_SQUARED {
        return None;
    }
    Some(Transform::IDENTITY.looking_to(direction, Vec3::Y).rotation)
}

/// Поворот вокруг Y, переводящий горизонтальную проекцию `from` в проекцию `to`
pub fn yaw_between(from: Vec3, to: Vec3) -> Option<Quat> {
    let from = Vec3::new(from.x, 0.0, from.z);
    let to = Vec3::new(to.x, 0.0, to.z);
    if from.length_squared() < MIN_LENGTH_SQUARED || to.length_squared() < MIN_LENGTH_SQUARED {
        return None;
    }
    let angle = from.cross(to).y.atan2(from.dot(to));
    Some(Quat::from_rotation_y(angle))
}
