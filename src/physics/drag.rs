//! Atmospheric drag against an exponential atmosphere.
//!
//! Density decays as ρ(h) = ρ₀ × exp(-h / (H × 0.075)) below the configured
//! atmosphere height H and is exactly zero above it. Drag magnitude is
//! Cd × ρ × v² per unit mass, with v in physical m/s.

use bevy::math::DVec3;

use crate::types::{DISTANCE_EPSILON, Environment, SPEED_EPSILON, TROPOSPHERE_RATIO};

/// Air density (kg/m³) at an altitude above the primary surface.
///
/// # Arguments
/// * `altitude_km` - Height above the surface in kilometers
/// * `env` - Atmosphere configuration
pub fn air_density(altitude_km: f64, env: &Environment) -> f64 {
    let height = env.atmosphere_height_km;
    if altitude_km <= 0.0 {
        return env.surface_density;
    }
    if altitude_km >= height || height <= 0.0 {
        return 0.0;
    }
    env.surface_density * (-altitude_km / (height * TROPOSPHERE_RATIO)).exp()
}

/// Drag acceleration opposing the velocity (internal units/s²).
///
/// # Arguments
/// * `offset` - Position relative to the primary center (internal units)
/// * `velocity` - Velocity (internal units/s)
/// * `drag_coefficient` - Entity drag coefficient
/// * `mass` - Entity mass (kg)
/// * `env` - Atmosphere and unit configuration
pub fn drag_acceleration(
    offset: DVec3,
    velocity: DVec3,
    drag_coefficient: f64,
    mass: f64,
    env: &Environment,
) -> DVec3 {
    let speed = velocity.length();
    if speed < SPEED_EPSILON || mass <= 0.0 || offset.length() < DISTANCE_EPSILON {
        return DVec3::ZERO;
    }

    let density = air_density(env.altitude_km(offset.length()), env);
    if density <= 0.0 {
        return DVec3::ZERO;
    }

    let speed_m = env.to_meters(speed);
    let magnitude = env.accel_to_internal(drag_coefficient * density * speed_m * speed_m / mass);
    -velocity / speed * magnitude
}
