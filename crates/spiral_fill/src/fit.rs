//! Sizing and orienting a model to sit on a pedestal.
use glam::{Quat, Vec3};

/// Bounds whose largest side is below this are too small to scale meaningfully.
pub const MIN_FIT_EXTENT: f32 = 0.001;

/// Uniform scale that makes the largest side of `extent` equal `desired_size`.
///
/// Returns `None` when the bounds are degenerate; callers keep a scale of 1.
pub fn scale_to_fit(extent: Vec3, desired_size: f32) -> Option<f32> {
    if !extent.is_finite() {
        return None;
    }
    let biggest = extent.abs().max_element();
    if biggest < MIN_FIT_EXTENT {
        return None;
    }
    Some(desired_size / biggest)
}

/// Yaw-only rotation for a catalog camera orbit angle `theta` (radians).
///
/// The orbit describes the camera, so pitch is dropped and only the heading is kept.
pub fn orbit_to_rotation(theta: f32) -> Quat {
    Quat::from_rotation_y(theta)
}

/// Centre of the bottom face of an axis-aligned box.
pub fn bottom_center_pivot(center: Vec3, size: Vec3) -> Vec3 {
    center - Vec3::Y * (size.y * 0.5)
}
