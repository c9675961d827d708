//! Attitude heuristics per entity kind.
//!
//! Satellites point along their acceleration (nadir-pointing under gravity).
//! Spaceships are steered by the user; when `auto_align_to_velocity` is set
//! they also drift toward their velocity vector. Other kinds keep their
//! orientation.

use bevy::math::DVec3;

use crate::entity::{EntityKind, SimEntity};
use crate::frame::looking_to;
use crate::types::{SimulationSettings, SPEED_EPSILON};

/// Update the orientation of an in-flight entity after integration.
///
/// The entity is expected to be in the world frame.
pub fn update_orientation(entity: &mut SimEntity, settings: &SimulationSettings, dt: f64) {
    match entity.kind {
        EntityKind::Satellite => {
            // Facing position + normalize(acceleration) from position
            if let Some(rotation) = looking_to(entity.accelerations.total, DVec3::Y) {
                entity.body.rotation = rotation;
            }
        }
        EntityKind::Spaceship => {
            if settings.auto_align_to_velocity {
                align_to_velocity(entity, settings.align_rate, dt);
            }
        }
        EntityKind::Cannonball | EntityKind::Asteroid | EntityKind::Moon => {}
    }
}

fn align_to_velocity(entity: &mut SimEntity, align_rate: f64, dt: f64) {
    if entity.velocity.length() < SPEED_EPSILON {
        return;
    }
    let Some(target) = looking_to(entity.velocity, DVec3::Y) else {
        return;
    };
    let t = (align_rate * dt).clamp(0.0, 1.0);
    entity.body.rotation = entity.body.rotation.slerp(target, t).normalize();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Accelerations;
    use crate::frame::forward;
    use bevy::math::DQuat;

    fn assert_dir_eq(a: DVec3, b: DVec3) {
        assert!((a - b).length() < 1e-9, "expected {b:?}, got {a:?}");
    }

    #[test]
    fn test_satellite_faces_acceleration() {
        let mut sat = SimEntity::new(EntityKind::Satellite, "sat", DVec3::new(7000.0, 0.0, 0.0))
            .in_flight(DVec3::new(0.0, 0.0, -7.5));
        sat.accelerations = Accelerations::new(DVec3::new(-0.008, 0.0, 0.0), DVec3::ZERO, DVec3::ZERO);

        update_orientation(&mut sat, &SimulationSettings::default(), 1.0);
        assert_dir_eq(forward(sat.body.rotation), DVec3::NEG_X);
    }

    #[test]
    fn test_satellite_without_acceleration_keeps_rotation() {
        let rotation = DQuat::from_rotation_z(0.3);
        let mut sat = SimEntity::new(EntityKind::Satellite, "sat", DVec3::X).with_rotation(rotation);

        update_orientation(&mut sat, &SimulationSettings::default(), 1.0);
        assert_eq!(sat.body.rotation, rotation);
    }

    #[test]
    fn test_spaceship_untouched_by_default() {
        let rotation = DQuat::from_rotation_x(1.0);
        let mut ship = SimEntity::new(EntityKind::Spaceship, "ship", DVec3::X)
            .with_rotation(rotation)
            .in_flight(DVec3::new(0.0, 0.0, 5.0));
        ship.accelerations = Accelerations::new(DVec3::NEG_X, DVec3::ZERO, DVec3::ZERO);

        update_orientation(&mut ship, &SimulationSettings::default(), 1.0);
        assert_eq!(ship.body.rotation, rotation);
    }

    #[test]
    fn test_spaceship_aligns_when_enabled() {
        let velocity = DVec3::new(0.0, 0.0, 5.0);
        let mut ship = SimEntity::new(EntityKind::Spaceship, "ship", DVec3::X).in_flight(velocity);
        let settings = SimulationSettings::aligning(0.5);

        // Half way after one second
        update_orientation(&mut ship, &settings, 1.0);
        let halfway = forward(ship.body.rotation);
        assert!(halfway.dot(DVec3::Z) > -1.0 + 1e-6);

        // Fully aligned once rate * dt reaches 1
        update_orientation(&mut ship, &settings, 4.0);
        assert_dir_eq(forward(ship.body.rotation), DVec3::Z);
    }

    #[test]
    fn test_passive_kinds_keep_rotation() {
        for kind in [EntityKind::Cannonball, EntityKind::Asteroid, EntityKind::Moon] {
            let rotation = DQuat::from_rotation_y(0.2);
            let mut e = SimEntity::new(kind, "e", DVec3::X)
                .with_rotation(rotation)
                .in_flight(DVec3::Y);
            e.accelerations = Accelerations::new(DVec3::NEG_X, DVec3::ZERO, DVec3::ZERO);

            update_orientation(&mut e, &SimulationSettings::aligning(1.0), 1.0);
            assert_eq!(e.body.rotation, rotation, "{kind:?} rotated");
        }
    }
}
