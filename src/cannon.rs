//! The surface cannon and cannonball spawning.
//!
//! The cannon sits on the primary body at a geographic position and fires
//! along an elevation/azimuth direction in the local east-north-up frame.
//! Each shot registers a new cannonball grounded at the muzzle and then
//! fires it.

use bevy::log::info;
use bevy::math::DVec3;
use bevy::prelude::Resource;

use crate::entity::{EntityKind, SimEntity};
use crate::frame::{BodyId, Frame, Geographic, east_north_up, geographic_to_cartesian};
use crate::types::{DEG_TO_RAD, Environment, METERS_PER_KM};
use crate::world::{SimWorld, WorldError};

/// Cannon placement and aim.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct CannonParameters {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Muzzle height above the surface (km)
    pub altitude: f64,
    /// Angle above the local horizon in degrees
    pub elevation: f64,
    /// Heading in degrees, clockwise from north
    pub azimuth: f64,
    /// Muzzle speed (m/s)
    pub muzzle_speed: f64,
}

impl Default for CannonParameters {
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            altitude: 0.0,
            elevation: 45.0,
            azimuth: 0.0,
            muzzle_speed: 1500.0,
        }
    }
}

impl CannonParameters {
    fn geographic(&self, env: &Environment) -> Geographic {
        Geographic {
            latitude: self.latitude * DEG_TO_RAD,
            longitude: self.longitude * DEG_TO_RAD,
            altitude: self.altitude * METERS_PER_KM / env.length_scale,
        }
    }

    /// Muzzle position in the primary body's frame (internal units).
    pub fn muzzle_position(&self, env: &Environment) -> DVec3 {
        geographic_to_cartesian(self.geographic(env), env.primary.radius)
    }

    /// Unit firing direction in the primary body's frame.
    pub fn firing_direction(&self) -> DVec3 {
        let (east, north, up) =
            east_north_up(self.latitude * DEG_TO_RAD, self.longitude * DEG_TO_RAD);
        let (sin_el, cos_el) = (self.elevation * DEG_TO_RAD).sin_cos();
        let (sin_az, cos_az) = (self.azimuth * DEG_TO_RAD).sin_cos();
        (north * cos_az + east * sin_az) * cos_el + up * sin_el
    }

    /// Launch velocity in the world frame (internal units/s).
    pub fn launch_velocity(&self, env: &Environment) -> DVec3 {
        let speed = self.muzzle_speed / env.length_scale;
        env.primary.rotation * self.firing_direction() * speed
    }
}

/// Counter for generating unique cannonball names.
#[derive(Resource, Default, Debug)]
pub struct CannonballCounter(pub u32);

/// Register a cannonball at the muzzle and fire it.
///
/// Skips names already taken so shots never collide with existing entities.
///
/// # Returns
/// The new cannonball's name
pub fn spawn_cannonball(
    world: &mut SimWorld,
    counter: &mut CannonballCounter,
    cannon: &CannonParameters,
) -> Result<String, WorldError> {
    let name = loop {
        counter.0 += 1;
        let candidate = format!("Cannonball {}", counter.0);
        if world.get_entity_by_name(&candidate).is_err() {
            break candidate;
        }
    };

    let env = world.environment();
    let mut ball = SimEntity::new(EntityKind::Cannonball, name.clone(), cannon.muzzle_position(env));
    ball.body.frame = Frame::Body(BodyId::Primary);
    let velocity = cannon.launch_velocity(env);

    info!(
        "Spawning {} at lat {:.2}°, lon {:.2}°, elevation {:.1}°, azimuth {:.1}°",
        name, cannon.latitude, cannon.longitude, cannon.elevation, cannon.azimuth
    );

    world.register_entity(ball)?;
    world.fire(&name, velocity)?;
    Ok(name)
}

/// Range over a flat surface under uniform gravity (same units as `speed²/g`).
pub fn flat_range(speed: f64, elevation: f64, gravity: f64) -> f64 {
    speed * speed * (2.0 * elevation).sin() / gravity
}

/// Surface range of a ballistic shot over a spherical, airless body.
///
/// Arc length between launch and impact points for a projectile fired from
/// the surface. Returns `None` when the shot escapes.
///
/// # Arguments
/// * `speed` - Launch speed
/// * `elevation` - Flight path angle above the horizon (radians)
/// * `surface_gravity` - Gravity at the surface (consistent units)
/// * `radius` - Body radius (consistent units)
pub fn spherical_range(speed: f64, elevation: f64, surface_gravity: f64, radius: f64) -> Option<f64> {
    // Ratio of launch speed squared to circular speed squared
    let nu = speed * speed / (surface_gravity * radius);
    if nu >= 2.0 {
        return None;
    }
    let (sin_el, cos_el) = elevation.sin_cos();
    let half_angle = (nu * sin_el * cos_el).atan2(1.0 - nu * cos_el * cos_el);
    Some(2.0 * half_angle * radius)
}
