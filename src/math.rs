//! Vector and rotation helpers with host-engine semantics.
//!
//! Forward is `+Z`, up is `+Y`, right is `+X`. Euler angles are degrees and
//! compose as yaw, then pitch, then roll (`EulerRot::YXZ`).

use glam::{EulerRot, Quat, Vec3};

pub const FORWARD: Vec3 = Vec3::Z;
pub const UP: Vec3 = Vec3::Y;
pub const RIGHT: Vec3 = Vec3::X;

const ANGLE_EPSILON: f32 = 1e-15;
const VEC_EQ_EPSILON_SQ: f32 = 1e-10;

/// `+1.0` for zero and positive values.
pub fn sign(value: f32) -> f32 {
    if value >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Unsigned angle in degrees. Zero-length inputs yield `0`.
pub fn angle_deg(a: Vec3, b: Vec3) -> f32 {
    let denominator = (a.length_squared() * b.length_squared()).sqrt();
    if denominator < ANGLE_EPSILON {
        return 0.0;
    }
    let dot = (a.dot(b) / denominator).clamp(-1.0, 1.0);
    dot.acos().to_degrees()
}

/// Angle from `a` to `b`, negative when the turn is clockwise around `+Y`.
pub fn signed_angle_y(a: Vec3, b: Vec3) -> f32 {
    let angle = angle_deg(a, b);
    if a.cross(b).y < 0.0 {
        -angle
    } else {
        angle
    }
}

/// Step `current` towards `target` by at most `max_delta`.
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        return target;
    }
    current + sign(target - current) * max_delta
}

/// Angle in degrees between two orientations.
pub fn quat_angle_deg(a: Quat, b: Quat) -> f32 {
    let dot = a.dot(b).abs().min(1.0);
    if dot > 1.0 - 1e-6 {
        return 0.0;
    }
    (dot.acos() * 2.0).to_degrees()
}

/// Rotate `from` towards `to` by at most `max_degrees`.
pub fn rotate_towards(from: Quat, to: Quat, max_degrees: f32) -> Quat {
    let angle = quat_angle_deg(from, to);
    if angle == 0.0 || max_degrees >= angle {
        return to;
    }
    from.slerp(to, max_degrees / angle)
}

/// Shortest rotation taking direction `from` onto direction `to`.
pub fn from_to_rotation(from: Vec3, to: Vec3) -> Quat {
    let from = from.try_normalize().unwrap_or(UP);
    let to = to.try_normalize().unwrap_or(UP);
    Quat::from_rotation_arc(from, to)
}

pub fn euler_deg(x: f32, y: f32, z: f32) -> Quat {
    Quat::from_euler(EulerRot::YXZ, y.to_radians(), x.to_radians(), z.to_radians())
}

/// Inverse of [`euler_deg`]: `(pitch, yaw, roll)` in degrees.
pub fn to_euler_deg(rotation: Quat) -> Vec3 {
    let (y, x, z) = rotation.to_euler(EulerRot::YXZ);
    Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
}

/// Equality with the tolerance the host engine uses for `Vector3 ==`.
pub fn approx_eq(a: Vec3, b: Vec3) -> bool {
    (a - b).length_squared() < VEC_EQ_EPSILON_SQ
}
