//! Gravity from a single dominant body.
//!
//! Uses the surface-gravity form of Newton's law, `g0 * (R/r)²`, which is
//! equivalent to `GM/r²` with `GM = g0 * R²`.

use bevy::math::DVec3;

use crate::types::DISTANCE_EPSILON;

/// Gravitational acceleration toward a body center.
///
/// # Arguments
/// * `offset` - Entity position minus body center (internal units)
/// * `radius` - Body radius (internal units)
/// * `surface_gravity` - Acceleration at the surface (internal units/s²)
///
/// # Returns
/// Acceleration vector pointing at the body center, or zero when the
/// entity sits at the center.
#[inline]
pub fn gravity_acceleration(offset: DVec3, radius: f64, surface_gravity: f64) -> DVec3 {
    let r = offset.length();
    if r < DISTANCE_EPSILON {
        return DVec3::ZERO;
    }
    let ratio = radius / r;
    // offset / r is the outward unit vector
    -offset / r * (surface_gravity * ratio * ratio)
}

/// Gravitational acceleration from a standard gravitational parameter.
///
/// Same guard as [`gravity_acceleration`].
#[inline]
pub fn gravity_acceleration_gm(offset: DVec3, gm: f64) -> DVec3 {
    let r_squared = offset.length_squared();
    if r_squared < DISTANCE_EPSILON * DISTANCE_EPSILON {
        return DVec3::ZERO;
    }
    let r = r_squared.sqrt();
    -offset * (gm / (r_squared * r))
}
