//! Common test utilities for integration tests.

#![allow(dead_code)]

use bevy::math::DVec3;
use orbital_cannon::collision::ImpactEvent;
use orbital_cannon::entity::{Attractor, EntityKind, SimEntity};
use orbital_cannon::types::{Environment, SimulationSettings};
use orbital_cannon::world::SimWorld;

/// Earth environment with the atmosphere switched off.
pub fn airless_environment() -> Environment {
    Environment {
        surface_density: 0.0,
        ..Default::default()
    }
}

/// Empty world around an airless Earth.
pub fn airless_world() -> SimWorld {
    SimWorld::new(airless_environment(), SimulationSettings::default())
}

/// Create a circular orbit state at the given altitude above the primary.
pub fn circular_orbit(env: &Environment, altitude_km: f64) -> (DVec3, DVec3) {
    let r = env.primary.radius + altitude_km * 1000.0 / env.length_scale;
    let v = (env.primary_gm() / r).sqrt();
    (DVec3::new(r, 0.0, 0.0), DVec3::new(0.0, 0.0, -v))
}

/// A resting moon-sized attractor, not moving.
pub fn parked_moon(position: DVec3) -> SimEntity {
    SimEntity::new(EntityKind::Moon, "Moon", position).with_attractor(Attractor {
        radius: 1737.4,
        surface_gravity: 1.62,
    })
}

/// Compute specific orbital energy around the primary.
pub fn orbital_energy(env: &Environment, pos: DVec3, vel: DVec3) -> f64 {
    0.5 * vel.length_squared() - env.primary_gm() / pos.length()
}

/// Compute specific angular momentum.
pub fn angular_momentum(pos: DVec3, vel: DVec3) -> DVec3 {
    pos.cross(vel)
}

/// Compute orbital period for a circular orbit of radius `r`.
pub fn orbital_period(env: &Environment, r: f64) -> f64 {
    use std::f64::consts::TAU;
    TAU * (r.powi(3) / env.primary_gm()).sqrt()
}

/// Tick until the first impact or until `max_steps` ticks have run.
pub fn run_until_impact(world: &mut SimWorld, dt: f64, max_steps: usize) -> Option<ImpactEvent> {
    for _ in 0..max_steps {
        world.tick(dt);
        if let Some(impact) = world.drain_impacts().into_iter().next() {
            return Some(impact);
        }
    }
    None
}
