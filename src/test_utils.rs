//! Test utilities for simulation tests.
//!
//! Provides fixtures for common starting states and assertions for
//! physical invariants like energy conservation.

use bevy::math::DVec3;

use crate::entity::{EntityKind, SimEntity};
use crate::types::Environment;

/// Fixtures for creating test entities.
pub mod fixtures {
    use super::*;

    /// Environment without an atmosphere.
    pub fn airless() -> Environment {
        Environment {
            surface_density: 0.0,
            ..Default::default()
        }
    }

    /// Asteroid on a circular orbit around the primary.
    ///
    /// Starts on +X moving toward -Z.
    pub fn circular_orbit(env: &Environment, name: &str, altitude_km: f64) -> SimEntity {
        let r = env.primary.radius + altitude_km * 1000.0 / env.length_scale;
        let v = (env.primary_gm() / r).sqrt();
        SimEntity::new(EntityKind::Asteroid, name, DVec3::new(r, 0.0, 0.0))
            .in_flight(DVec3::new(0.0, 0.0, -v))
    }

    /// Cannonball released at rest above the primary's +Y pole.
    pub fn dropped_ball(env: &Environment, name: &str, altitude_km: f64) -> SimEntity {
        let r = env.primary.radius + altitude_km * 1000.0 / env.length_scale;
        SimEntity::new(EntityKind::Cannonball, name, DVec3::new(0.0, r, 0.0)).in_flight(DVec3::ZERO)
    }
}

/// Assertions for verifying physical invariants.
pub mod assertions {
    use super::*;

    /// Specific orbital energy around the primary: E = v²/2 - GM/r.
    pub fn orbital_energy(env: &Environment, pos: DVec3, vel: DVec3) -> f64 {
        0.5 * vel.length_squared() - env.primary_gm() / pos.length()
    }
}
