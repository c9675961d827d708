//! Core physics types, constants and environment configuration.

use bevy::math::DQuat;
use bevy::prelude::*;

/// Physical constants (SI units)

/// Earth's mean radius in meters
pub const EARTH_RADIUS_M: f64 = 6.371e6;

/// Earth's standard gravitational parameter (m³/s²)
pub const GM_EARTH: f64 = 3.986004418e14;

/// Moon's mean radius in meters
pub const MOON_RADIUS_M: f64 = 1.7374e6;

/// Moon's standard gravitational parameter (m³/s²)
pub const GM_MOON: f64 = 4.9048695e12;

/// Mean Earth–Moon distance in meters
pub const EARTH_MOON_DISTANCE_M: f64 = 3.844e8;

/// Sea-level air density (kg/m³)
pub const SEA_LEVEL_DENSITY: f64 = 1.225;

/// Default height of the simulated atmosphere (km)
pub const ATMOSPHERE_HEIGHT_KM: f64 = 100.0;

/// Ratio of the density decay scale to the atmosphere height.
///
/// A 100 km atmosphere decays with a 7.5 km scale, close to the real
/// troposphere scale height.
pub const TROPOSPHERE_RATIO: f64 = 0.075;

/// Default drag coefficient for simulated entities
pub const DEFAULT_DRAG_COEFFICIENT: f64 = 0.0004;

/// Engine acceleration at full thrust (m/s²)
pub const THRUST_ACCELERATION: f64 = 30.0;

/// Degrees to radians conversion factor
pub const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// Radians to degrees conversion factor
pub const RAD_TO_DEG: f64 = 180.0 / std::f64::consts::PI;

/// Meters per kilometer
pub const METERS_PER_KM: f64 = 1000.0;

/// Distances (internal units) below which radial quantities are treated as zero.
pub const DISTANCE_EPSILON: f64 = 1e-9;

/// Speeds (internal units per second) below which an entity is treated as resting.
pub const SPEED_EPSILON: f64 = 1e-9;

/// Simulation clock settings driving the tick from the frame clock.
///
/// Elapsed simulated time is owned by `SimWorld::elapsed`.
#[derive(Resource, Clone, Debug)]
pub struct SimulationTime {
    /// Time acceleration multiplier applied to the frame delta
    pub scale: f64,
    /// Whether simulation is paused
    pub paused: bool,
}

impl Default for SimulationTime {
    fn default() -> Self {
        Self {
            scale: 1.0,
            paused: false,
        }
    }
}

impl SimulationTime {
    /// Simulation step for a wall-clock frame delta.
    ///
    /// Returns 0 while paused.
    pub fn step_for(&self, frame_delta: f64) -> f64 {
        if self.paused {
            0.0
        } else {
            frame_delta * self.scale
        }
    }
}

/// The primary attracting body (Earth), fixed at the world origin.
#[derive(Clone, Debug, PartialEq)]
pub struct PrimaryBody {
    /// Display name, used in impact reports
    pub name: String,
    /// Radius in internal units
    pub radius: f64,
    /// Surface gravitational acceleration (m/s²)
    pub surface_gravity: f64,
    /// Orientation of the body's local frame relative to the world frame
    pub rotation: DQuat,
}

/// Environment parameters read by the force models.
///
/// Lengths are stored in internal units; `length_scale` converts them to
/// meters. External collaborators may change any field between ticks.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct Environment {
    /// Height of the atmosphere above the primary surface (km)
    pub atmosphere_height_km: f64,
    /// Air density at sea level (kg/m³)
    pub surface_density: f64,
    /// Meters per internal length unit
    pub length_scale: f64,
    /// The dominant body at the world origin
    pub primary: PrimaryBody,
    /// Clearance above a body's surface at which contact registers (internal units)
    pub collision_threshold: f64,
}

impl Default for Environment {
    /// Earth with a 100 km atmosphere, one internal unit per kilometer.
    fn default() -> Self {
        let length_scale = METERS_PER_KM;
        Self {
            atmosphere_height_km: ATMOSPHERE_HEIGHT_KM,
            surface_density: SEA_LEVEL_DENSITY,
            length_scale,
            primary: PrimaryBody {
                name: "Earth".to_string(),
                radius: EARTH_RADIUS_M / length_scale,
                surface_gravity: GM_EARTH / (EARTH_RADIUS_M * EARTH_RADIUS_M),
                rotation: DQuat::IDENTITY,
            },
            collision_threshold: 10.0 / length_scale,
        }
    }
}

impl Environment {
    /// Environment with the primary body described by its gravitational parameter.
    ///
    /// # Arguments
    /// * `radius_m` - Body radius in meters
    /// * `gm` - Standard gravitational parameter (m³/s²)
    /// * `length_scale` - Meters per internal unit
    pub fn with_primary_gm(radius_m: f64, gm: f64, length_scale: f64) -> Self {
        let mut env = Self {
            length_scale,
            collision_threshold: 10.0 / length_scale,
            ..Default::default()
        };
        env.primary.radius = radius_m / length_scale;
        env.primary.surface_gravity = gm / (radius_m * radius_m);
        env
    }

    /// Convert an internal length to meters.
    #[inline]
    pub fn to_meters(&self, internal: f64) -> f64 {
        internal * self.length_scale
    }

    /// Convert a physical acceleration (m/s²) to internal units per s².
    #[inline]
    pub fn accel_to_internal(&self, meters_per_s2: f64) -> f64 {
        meters_per_s2 / self.length_scale
    }

    /// Altitude in kilometers for a distance (internal units) from the primary center.
    #[inline]
    pub fn altitude_km(&self, distance: f64) -> f64 {
        self.to_meters(distance - self.primary.radius) / METERS_PER_KM
    }

    /// Primary's standard gravitational parameter in internal units³/s².
    pub fn primary_gm(&self) -> f64 {
        self.accel_to_internal(self.primary.surface_gravity) * self.primary.radius.powi(2)
    }
}

/// Per-world behavior switches.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct SimulationSettings {
    /// Turn spaceships toward their velocity while coasting.
    ///
    /// Off by default: spaceship attitude is driven only by user commands.
    pub auto_align_to_velocity: bool,
    /// Fraction of the remaining angle closed per simulated second when aligning
    pub align_rate: f64,
}

impl SimulationSettings {
    /// Settings with velocity alignment switched on.
    pub fn aligning(align_rate: f64) -> Self {
        Self {
            auto_align_to_velocity: true,
            align_rate,
        }
    }
}
