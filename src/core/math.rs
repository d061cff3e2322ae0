// Math utilities and helper functions

use glam::{Quat, Vec3};

/// Clamp a value between min and max
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Wrap `t` into `[0, length)`
pub fn repeat(t: f32, length: f32) -> f32 {
    clamp(t - (t / length).floor() * length, 0.0, length)
}

/// Shortest signed difference between two angles in degrees, in `(-180, 180]`
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let delta = repeat(target - current, 360.0);
    if delta > 180.0 {
        delta - 360.0
    } else {
        delta
    }
}

/// Critically damped spring toward `target`.
///
/// `velocity` carries the spring state between calls and must be kept by the
/// caller. `max_speed` caps the rate of change (units/second); pass
/// `f32::INFINITY` for no cap. The result never overshoots `target`.
pub fn smooth_damp(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    max_speed: f32,
    dt: f32,
) -> f32 {
    let smooth_time = smooth_time.max(0.0001);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let original_target = target;
    let max_change = max_speed * smooth_time;
    let change = clamp(current - target, -max_change, max_change);
    let target = current - change;

    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;

    // Overshoot guard
    if (original_target - current > 0.0) == (output > original_target) {
        output = original_target;
        *velocity = 0.0;
    }

    output
}

/// [`smooth_damp`] for angles in degrees, always turning the short way round
pub fn smooth_damp_angle(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    max_speed: f32,
    dt: f32,
) -> f32 {
    let target = current + delta_angle(current, target);
    smooth_damp(current, target, velocity, smooth_time, max_speed, dt)
}

/// Rotation about the world up axis by `yaw_degrees`
pub fn yaw_rotation(yaw_degrees: f32) -> Quat {
    Quat::from_rotation_y(yaw_degrees.to_radians())
}

/// Forward (+Z rotated about +Y) unit vector for a yaw in degrees
pub fn yaw_forward(yaw_degrees: f32) -> Vec3 {
    let radians = yaw_degrees.to_radians();
    Vec3::new(radians.sin(), 0.0, radians.cos())
}

/// Yaw in degrees, in `[0, 360)`, of the forward axis of `rotation`
pub fn yaw_of(rotation: Quat) -> f32 {
    let forward = rotation * Vec3::Z;
    forward.x.atan2(forward.z).to_degrees().rem_euclid(360.0)
}
