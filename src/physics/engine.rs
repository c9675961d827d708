//! Engine thrust for powered craft.

use bevy::math::{DQuat, DVec3};

use crate::entity::{EntityKind, ThrustDirection};
use crate::frame::forward;
use crate::types::{Environment, THRUST_ACCELERATION};

/// Engine acceleration along the craft's forward axis (internal units/s²).
///
/// Only spaceships with a non-idle thrust direction and positive power
/// produce thrust.
///
/// # Arguments
/// * `kind` - Entity kind
/// * `rotation` - World orientation of the entity
/// * `power` - Throttle in [0, 1]
/// * `direction` - Forward, reverse or idle
/// * `env` - Unit configuration
pub fn engine_acceleration(
    kind: EntityKind,
    rotation: DQuat,
    power: f64,
    direction: ThrustDirection,
    env: &Environment,
) -> DVec3 {
    match kind {
        EntityKind::Spaceship if direction != ThrustDirection::Idle && power > 0.0 => {
            let magnitude = env.accel_to_internal(power.min(1.0) * THRUST_ACCELERATION);
            forward(rotation).normalize() * direction.sign() * magnitude
        }
        EntityKind::Spaceship
        | EntityKind::Cannonball
        | EntityKind::Satellite
        | EntityKind::Asteroid
        | EntityKind::Moon => DVec3::ZERO,
    }
}
