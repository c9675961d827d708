//! Semi-implicit (symplectic) Euler integration.
//!
//! Velocity is advanced before position, which keeps orbits bounded where
//! explicit Euler spirals outward.

use bevy::math::DVec3;

/// Position and velocity of a body being integrated.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionState {
    pub position: DVec3,
    pub velocity: DVec3,
}

impl MotionState {
    pub fn new(position: DVec3, velocity: DVec3) -> Self {
        Self { position, velocity }
    }

    /// Advance by one step:
    /// 1. v += a * dt
    /// 2. x += v * dt
    ///
    /// `dt` is used as given; callers decide about clamping.
    #[inline]
    pub fn step(self, acceleration: DVec3, dt: f64) -> Self {
        let velocity = self.velocity + acceleration * dt;
        let position = self.position + velocity * dt;
        Self { position, velocity }
    }

    /// Whether both vectors are finite.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::gravity::gravity_acceleration_gm;
    use approx::assert_relative_eq;
    use std::f64::consts::TAU;

    #[test]
    fn test_velocity_updated_before_position() {
        let state = MotionState::new(DVec3::ZERO, DVec3::X);
        let next = state.step(DVec3::new(0.0, 2.0, 0.0), 0.5);

        assert_eq!(next.velocity, DVec3::new(1.0, 1.0, 0.0));
        // Position uses the new velocity
        assert_eq!(next.position, DVec3::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn test_zero_dt_is_identity() {
        let state = MotionState::new(DVec3::new(1.0, 2.0, 3.0), DVec3::new(-4.0, 5.0, 0.5));
        assert_eq!(state.step(DVec3::new(9.0, 9.0, 9.0), 0.0), state);
    }

    #[test]
    fn test_circular_orbit_stays_bounded() {
        let gm: f64 = 398_600.4418; // km³/s²
        let r: f64 = 7000.0;
        let v = (gm / r).sqrt();
        let period = TAU * (r.powi(3) / gm).sqrt();

        let mut state = MotionState::new(DVec3::new(r, 0.0, 0.0), DVec3::new(0.0, 0.0, -v));
        let dt = 1.0;
        let steps = (period / dt).round() as usize;

        let mut max_error: f64 = 0.0;
        for _ in 0..steps {
            let acc = gravity_acceleration_gm(state.position, gm);
            state = state.step(acc, dt);
            max_error = max_error.max((state.position.length() - r).abs() / r);
        }

        assert!(max_error < 0.01, "radius drifted by {:.4}%", max_error * 100.0);
        // Back near the start after one period
        assert_relative_eq!(state.position.x, r, max_relative = 0.01);
    }
}
