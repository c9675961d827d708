//! Force models and integration for simulated entities.
//!
//! Each in-flight entity is pulled by its single dominant body, slowed by
//! the primary's atmosphere and pushed by its engine. The sum is integrated
//! with semi-implicit Euler once per frame, in the `Update` schedule.

mod drag;
mod engine;
mod gravity;
mod integrator;

#[cfg(test)]
mod proptest_physics;

use bevy::math::{DQuat, DVec3};
use bevy::prelude::*;

pub use drag::{air_density, drag_acceleration};
pub use engine::engine_acceleration;
pub use gravity::{gravity_acceleration, gravity_acceleration_gm};
pub use integrator::MotionState;

use crate::entity::{Accelerations, SimEntity};
use crate::types::{Environment, SimulationTime};
use crate::world::SimWorld;

/// Gravity field of the dominant body as seen by one entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DominantField {
    /// Body center in world coordinates
    pub center: DVec3,
    /// Body radius (internal units)
    pub radius: f64,
    /// Surface gravity (internal units/s²)
    pub surface_gravity: f64,
    /// Whether the environment's atmosphere surrounds this body
    pub has_atmosphere: bool,
}

impl DominantField {
    /// Field of the environment's primary body.
    pub fn primary(env: &Environment) -> Self {
        Self {
            center: DVec3::ZERO,
            radius: env.primary.radius,
            surface_gravity: env.accel_to_internal(env.primary.surface_gravity),
            has_atmosphere: true,
        }
    }
}

/// Compute the acceleration breakdown for an in-flight entity.
///
/// # Arguments
/// * `entity` - Entity in the world frame
/// * `field` - Its dominant body
/// * `world_rotation` - Entity orientation in the world frame
/// * `env` - Environment parameters
pub fn accumulate_accelerations(
    entity: &SimEntity,
    field: &DominantField,
    world_rotation: DQuat,
    env: &Environment,
) -> Accelerations {
    let offset = entity.body.translation - field.center;

    let gravity = gravity_acceleration(offset, field.radius, field.surface_gravity);
    let friction = if field.has_atmosphere {
        drag_acceleration(offset, entity.velocity, entity.drag_coefficient, entity.mass, env)
    } else {
        DVec3::ZERO
    };
    let engine = engine_acceleration(
        entity.kind,
        world_rotation,
        entity.thrust_power,
        entity.thrust_direction,
        env,
    );

    Accelerations::new(gravity, friction, engine)
}

/// Plugin advancing the simulation once per frame.
///
/// Adds:
/// - `SimWorld`, `Environment`-owning registry (if not inserted already)
/// - `SimulationTime` for pause and time acceleration
/// - The `physics_step` system in `Update`
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimWorld>()
            .init_resource::<SimulationTime>()
            .add_systems(Update, physics_step);
    }
}

/// Advance the world by the scaled frame delta.
///
/// Does nothing while paused, so entity state stays untouched.
pub fn physics_step(
    mut world: ResMut<SimWorld>,
    sim_time: Res<SimulationTime>,
    time: Res<Time>,
) {
    let dt = sim_time.step_for(time.delta_secs_f64());
    if dt <= 0.0 {
        return;
    }

    world.tick(dt);
}
