//! Property-based tests for the force models and integration using proptest.

use bevy::math::{DQuat, DVec3};
use proptest::prelude::*;

use super::{air_density, drag_acceleration, gravity_acceleration, gravity_acceleration_gm};
use crate::entity::EntityKind;
use crate::test_utils::{assertions, fixtures};
use crate::types::{Environment, SimulationSettings};
use crate::world::SimWorld;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Both forms of Newton's law agree everywhere outside the guard radius.
    #[test]
    fn prop_gravity_forms_agree(
        x in -1.0e5f64..1.0e5,
        y in -1.0e5f64..1.0e5,
        z in -1.0e5f64..1.0e5,
    ) {
        prop_assume!(DVec3::new(x, y, z).length() > 1.0);
        let env = Environment::default();
        let pos = DVec3::new(x, y, z);
        let g0 = env.accel_to_internal(env.primary.surface_gravity);

        let a = gravity_acceleration(pos, env.primary.radius, g0);
        let b = gravity_acceleration_gm(pos, env.primary_gm());
        prop_assert!(
            (a - b).length() <= 1e-10 * b.length(),
            "surface form {:?} differs from GM form {:?}", a, b
        );
        // Always attractive
        prop_assert!(a.dot(pos) < 0.0);
    }

    /// Density never increases with altitude and vanishes at the ceiling.
    #[test]
    fn prop_density_monotonic(
        low in 0.0f64..150.0,
        delta in 1e-3f64..50.0,
        height in 20.0f64..200.0,
    ) {
        let env = Environment {
            atmosphere_height_km: height,
            ..Default::default()
        };
        let high = low + delta;
        let rho_low = air_density(low, &env);
        let rho_high = air_density(high, &env);

        if high >= height {
            prop_assert_eq!(rho_high, 0.0);
        }
        if low < height {
            prop_assert!(rho_high < rho_low);
        } else {
            prop_assert_eq!(rho_low, 0.0);
        }
    }

    /// Drag always points against the velocity.
    #[test]
    fn prop_drag_opposes_velocity(
        altitude in 0.0f64..99.0,
        vx in -10.0f64..10.0,
        vy in -10.0f64..10.0,
        vz in -10.0f64..10.0,
    ) {
        let velocity = DVec3::new(vx, vy, vz);
        prop_assume!(velocity.length() > 1e-3);
        let env = Environment::default();
        let offset = DVec3::new(0.0, env.primary.radius + altitude, 0.0);

        let acc = drag_acceleration(offset, velocity, 0.0004, 1.0, &env);
        prop_assert!(acc.length() > 0.0);
        prop_assert!((acc.normalize().dot(velocity.normalize()) + 1.0).abs() < 1e-9);
    }

    /// Two worlds fed the same steps stay bit-identical.
    #[test]
    fn prop_tick_deterministic(
        altitude in 150.0f64..2000.0,
        steps in proptest::collection::vec(0.01f64..5.0, 1..40),
    ) {
        let env = fixtures::airless();
        let mut first = SimWorld::new(env.clone(), SimulationSettings::default());
        let mut second = SimWorld::new(env.clone(), SimulationSettings::default());
        for world in [&mut first, &mut second] {
            world.register_entity(fixtures::circular_orbit(&env, "rock", altitude)).unwrap();
            world.register_entity(fixtures::dropped_ball(&env, "ball", altitude)).unwrap();
        }

        for dt in &steps {
            first.tick(*dt);
            second.tick(*dt);
        }

        prop_assert_eq!(first.entities(), second.entities());
    }

    /// Specific energy of a vacuum orbit drifts little over a few minutes.
    #[test]
    #[ignore = "slow"]
    fn prop_energy_bounded_in_vacuum(
        altitude in 200.0f64..5000.0,
    ) {
        let env = fixtures::airless();
        let mut world = SimWorld::new(env.clone(), SimulationSettings::default());
        let rock = fixtures::circular_orbit(&env, "rock", altitude);
        let initial = assertions::orbital_energy(&env, rock.body.translation, rock.velocity);
        world.register_entity(rock).unwrap();

        for _ in 0..3000 {
            world.tick(0.1);
        }

        let rock = world.get_entity_by_name("rock").unwrap();
        prop_assert!(rock.is_free_falling);
        let last = assertions::orbital_energy(&env, rock.body.translation, rock.velocity);
        prop_assert!(((last - initial) / initial).abs() < 1e-3);
    }

    /// Spaceship thrust never changes the kinds that have no engine.
    #[test]
    fn prop_only_spaceships_thrust(angle in 0.0f64..6.28, power in 0.0f64..1.0) {
        let env = Environment::default();
        for &kind in EntityKind::ALL {
            let acc = super::engine_acceleration(
                kind,
                DQuat::from_rotation_y(angle),
                power,
                crate::entity::ThrustDirection::Forward,
                &env,
            );
            if kind != EntityKind::Spaceship || power == 0.0 {
                prop_assert_eq!(acc, DVec3::ZERO);
            }
        }
    }
}
