//! Orbital Cannon - Newton's cannonball simulator
//!
//! Runs a preset scenario headlessly, fires one cannonball and reports
//! where it lands. Pass a scenario id as the first argument to pick a preset.

use std::time::Duration;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use orbital_cannon::cannon::{CannonParameters, CannonballCounter, spawn_cannonball};
use orbital_cannon::collision::{CollisionPlugin, CollisionState};
use orbital_cannon::physics::{PhysicsPlugin, physics_step};
use orbital_cannon::scenarios::{
    CurrentScenario, SCENARIOS, Scenario, ScenarioPlugin, ScenarioRequest, handle_scenario_request,
};
use orbital_cannon::types::{Environment, SimulationSettings};
use orbital_cannon::world::SimWorld;

/// Frame length fed to the app clock.
const FRAME: f64 = 1.0 / 60.0;

/// Give up after this many frames without an impact.
const MAX_FRAMES: u32 = 200_000;

fn main() {
    let id = std::env::args().nth(1);
    let scenario = match id.as_deref() {
        Some(id) => match Scenario::by_id(id) {
            Some(scenario) => *scenario,
            None => {
                let known: Vec<_> = SCENARIOS.iter().map(|s| s.id).collect();
                eprintln!("unknown scenario '{id}', expected one of {known:?}");
                std::process::exit(2);
            }
        },
        None => Scenario::default(),
    };

    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default()))
        // Insert resources before plugins that depend on them
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(FRAME)))
        .insert_resource(SimWorld::new(Environment::default(), SimulationSettings::default()))
        .insert_resource(ScenarioRequest(Some(scenario.id)))
        .insert_resource(CannonParameters::default())
        .add_plugins((PhysicsPlugin, CollisionPlugin, ScenarioPlugin))
        .add_systems(
            Update,
            fire_cannon
                .after(handle_scenario_request)
                .before(physics_step)
                .run_if(resource_changed::<CurrentScenario>),
        );

    info!("Running scenario '{}': {}", scenario.name, scenario.description);

    for _ in 0..MAX_FRAMES {
        app.update();
        if app.world().resource::<CollisionState>().has_collision() {
            break;
        }
    }

    report(&app);
}

/// Fire one shot once the scenario is in place.
fn fire_cannon(
    mut world: ResMut<SimWorld>,
    mut counter: ResMut<CannonballCounter>,
    cannon: Res<CannonParameters>,
) {
    if let Err(err) = spawn_cannonball(&mut world, &mut counter, &cannon) {
        error!("Could not fire the cannon: {err}");
    }
}

fn report(app: &App) {
    let world = app.world().resource::<SimWorld>();
    let state = app.world().resource::<CollisionState>();
    let length_scale = world.environment().length_scale;

    match &state.last_collision {
        Some(impact) => {
            let launch = app
                .world()
                .resource::<CannonParameters>()
                .muzzle_position(world.environment());
            let arc = launch.angle_between(impact.impact_position) * world.environment().primary.radius;
            info!(
                "{} hit {} after {:.1} s at {:.1} m/s, {:.1} km downrange",
                impact.entity_name,
                impact.body_name,
                impact.time,
                impact.impact_speed(length_scale),
                arc * length_scale / 1000.0
            );
        }
        None => warn!(
            "No impact after {:.1} s of simulated time",
            world.elapsed()
        ),
    }
}
