//! Look-at orientation with a stable fallback for near-vertical views.

use bevy::prelude::*;

/// Below this squared length a cross product is treated as degenerate.
const DEGENERATE_EPSILON: f32 = 1e-6;

/// Rotation that points a Bevy camera (forward is -Z) from `eye` at `target`.
///
/// `up` is the preferred up direction. When the view direction is parallel to
/// `up`, each of `fallbacks` is tried in order, then world Z and world X, so a
/// camera looking straight down still gets a well-defined roll.
///
/// Returns `None` when `eye` and `target` coincide.
pub fn look_at_rotation(eye: Vec3, target: Vec3, up: Vec3, fallbacks: &[Vec3]) -> Option<Quat> {
    let forward = (target - eye).normalize_or_zero();
    if forward == Vec3::ZERO {
        return None;
    }
    let back = -forward;

    let right = std::iter::once(up)
        .chain(fallbacks.iter().copied())
        .chain([Vec3::Z, Vec3::X])
        .map(|candidate| candidate.cross(back))
        .find(|right| right.length_squared() > DEGENERATE_EPSILON)?
        .normalize();
    let up = back.cross(right);

    Some(Quat::from_mat3(&Mat3::from_cols(right, up, back)))
}
