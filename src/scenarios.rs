//! Preset scenarios.
//!
//! Every scenario starts from the Earth at the world origin with the Moon on
//! a circular orbit around it, then adds the craft the scenario is about.

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::cannon::CannonballCounter;
use crate::collision::CollisionState;
use crate::entity::{Attractor, EntityKind, SimEntity};
use crate::frame::looking_to;
use crate::physics::physics_step;
use crate::types::{
    EARTH_MOON_DISTANCE_M, Environment, GM_MOON, METERS_PER_KM, MOON_RADIUS_M, SimulationSettings,
    SimulationTime,
};
use crate::world::{SimWorld, WorldError};

/// Mass of the Moon (kg)
const MOON_MASS: f64 = 7.342e22;

/// A predefined scenario configuration.
#[derive(Clone, Copy, Debug)]
pub struct Scenario {
    /// Unique identifier for the scenario.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Brief description of the scenario.
    pub description: &'static str,
    /// Altitude of the `Sat-1` satellite (km), if present.
    pub satellite_altitude_km: Option<f64>,
    /// Altitude of the `Ship-1` spaceship (km), if present.
    pub spaceship_altitude_km: Option<f64>,
    /// Initial time scale.
    pub time_scale: f64,
    /// Whether to start paused.
    pub start_paused: bool,
}

/// All available preset scenarios.
pub static SCENARIOS: &[Scenario] = &[CANNON_RANGE, LOW_ORBIT, SPACESHIP];

/// Earth and Moon only; the cannon provides the action.
pub static CANNON_RANGE: Scenario = Scenario {
    id: "cannon_range",
    name: "Cannon Range",
    description: "Fire cannonballs from the equator and watch them fall back.",
    satellite_altitude_km: None,
    spaceship_altitude_km: None,
    time_scale: 10.0,
    start_paused: false,
};

/// A satellite on a circular low Earth orbit.
pub static LOW_ORBIT: Scenario = Scenario {
    id: "low_orbit",
    name: "Low Orbit",
    description: "A satellite circles the Earth at 400 km, always facing down.",
    satellite_altitude_km: Some(400.0),
    spaceship_altitude_km: None,
    time_scale: 60.0,
    start_paused: false,
};

/// A steerable spaceship in orbit.
pub static SPACESHIP: Scenario = Scenario {
    id: "spaceship",
    name: "Spaceship",
    description: "Fly a spaceship from a 300 km parking orbit.",
    satellite_altitude_km: None,
    spaceship_altitude_km: Some(300.0),
    time_scale: 1.0,
    start_paused: true,
};

impl Default for Scenario {
    fn default() -> Self {
        CANNON_RANGE
    }
}

impl Scenario {
    /// Look up a preset by id.
    pub fn by_id(id: &str) -> Option<&'static Scenario> {
        SCENARIOS.iter().find(|s| s.id == id)
    }

    /// Simulation clock for this scenario.
    pub fn simulation_time(&self) -> SimulationTime {
        SimulationTime {
            scale: self.time_scale,
            paused: self.start_paused,
            ..Default::default()
        }
    }

    /// Build a populated world.
    pub fn build_world(
        &self,
        environment: Environment,
        settings: SimulationSettings,
    ) -> Result<SimWorld, WorldError> {
        let mut world = SimWorld::new(environment, settings);
        let moon = moon(world.environment());
        world.register_entity(moon)?;

        if let Some(altitude_km) = self.satellite_altitude_km {
            let (pos, vel) = circular_orbit(world.environment(), altitude_km, DVec3::Z, DVec3::Y);
            world.register_entity(SimEntity::new(EntityKind::Satellite, "Sat-1", pos).in_flight(vel))?;
        }

        if let Some(altitude_km) = self.spaceship_altitude_km {
            let (pos, vel) = circular_orbit(world.environment(), altitude_km, DVec3::NEG_X, DVec3::Z);
            let mut ship = SimEntity::new(EntityKind::Spaceship, "Ship-1", pos)
                .with_mass(20_000.0)
                .in_flight(vel);
            if let Some(rotation) = looking_to(vel, DVec3::Y) {
                ship = ship.with_rotation(rotation);
            }
            world.register_entity(ship)?;
        }

        Ok(world)
    }
}

/// Resource tracking the current active scenario.
#[derive(Resource, Default)]
pub struct CurrentScenario {
    /// ID of the current scenario.
    pub id: &'static str,
}

/// Scenario to load on the next frame, if any.
#[derive(Resource, Default)]
pub struct ScenarioRequest(pub Option<&'static str>);

/// Plugin providing scenario loading.
///
/// Expects `PhysicsPlugin` and `CollisionPlugin` to be added as well.
pub struct ScenarioPlugin;

impl Plugin for ScenarioPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CurrentScenario>()
            .init_resource::<ScenarioRequest>()
            .init_resource::<CannonballCounter>()
            .add_systems(Update, handle_scenario_request.before(physics_step));
    }
}

/// Replace the world with a freshly built scenario.
///
/// Environment and settings carry over from the current world. Cannonball
/// numbering and impact bookkeeping start over.
pub fn handle_scenario_request(
    mut request: ResMut<ScenarioRequest>,
    mut world: ResMut<SimWorld>,
    mut sim_time: ResMut<SimulationTime>,
    mut counter: ResMut<CannonballCounter>,
    mut collision_state: ResMut<CollisionState>,
    mut current: ResMut<CurrentScenario>,
) {
    let Some(id) = request.0 else {
        return;
    };
    request.0 = None;

    let Some(scenario) = Scenario::by_id(id) else {
        warn!("Unknown scenario ID: {}", id);
        return;
    };

    info!("Loading scenario: {} ({})", scenario.name, scenario.id);

    match scenario.build_world(world.environment().clone(), world.settings().clone()) {
        Ok(fresh) => *world = fresh,
        Err(err) => {
            warn!("Could not build scenario {}: {}", scenario.id, err);
            return;
        }
    }

    counter.0 = 0;
    collision_state.clear();
    *sim_time = scenario.simulation_time();
    current.id = scenario.id;
}

/// The Moon on a circular orbit around the primary.
pub fn moon(env: &Environment) -> SimEntity {
    let distance = EARTH_MOON_DISTANCE_M / env.length_scale;
    let speed = (env.primary_gm() / distance).sqrt();
    SimEntity::new(EntityKind::Moon, "Moon", DVec3::new(distance, 0.0, 0.0))
        .with_mass(MOON_MASS)
        .with_attractor(Attractor {
            radius: MOON_RADIUS_M / env.length_scale,
            surface_gravity: GM_MOON / (MOON_RADIUS_M * MOON_RADIUS_M),
        })
        .in_flight(DVec3::new(0.0, 0.0, -speed))
}

/// Position and velocity of a circular orbit around the primary.
///
/// # Arguments
/// * `altitude_km` - Height above the surface
/// * `radial` - Unit direction of the starting position
/// * `along` - Unit direction of motion, perpendicular to `radial`
pub fn circular_orbit(env: &Environment, altitude_km: f64, radial: DVec3, along: DVec3) -> (DVec3, DVec3) {
    let r = env.primary.radius + altitude_km * METERS_PER_KM / env.length_scale;
    let speed = (env.primary_gm() / r).sqrt();
    (radial * r, along * speed)
}
