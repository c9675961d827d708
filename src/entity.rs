//! Simulated entity definition.
//!
//! An entity is one physical object: a cannonball, satellite, spaceship,
//! asteroid or moon. Its kind selects which force and orientation behavior
//! applies; the simulation core owns and mutates its transform and velocity.

use bevy::math::{DQuat, DVec3};

use crate::frame::{BodyId, Frame};
use crate::types::DEFAULT_DRAG_COEFFICIENT;

/// Closed set of simulated entity kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Cannonball,
    Satellite,
    Spaceship,
    Asteroid,
    Moon,
}

impl EntityKind {
    /// All kinds, in declaration order.
    pub const ALL: &'static [EntityKind] = &[
        EntityKind::Cannonball,
        EntityKind::Satellite,
        EntityKind::Spaceship,
        EntityKind::Asteroid,
        EntityKind::Moon,
    ];
}

/// Requested engine direction for a spaceship.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThrustDirection {
    Reverse,
    #[default]
    Idle,
    Forward,
}

impl ThrustDirection {
    /// Sign applied to the forward axis: -1, 0 or 1.
    pub fn sign(self) -> f64 {
        match self {
            ThrustDirection::Reverse => -1.0,
            ThrustDirection::Idle => 0.0,
            ThrustDirection::Forward => 1.0,
        }
    }

    /// Parse the -1/0/1 convention used by input bindings.
    pub fn from_sign(sign: i8) -> Option<Self> {
        match sign {
            -1 => Some(ThrustDirection::Reverse),
            0 => Some(ThrustDirection::Idle),
            1 => Some(ThrustDirection::Forward),
            _ => None,
        }
    }
}

/// Transform of an entity within its current frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    /// Frame the translation and rotation are expressed in
    pub frame: Frame,
    /// Position in frame coordinates (internal units)
    pub translation: DVec3,
    /// Orientation relative to the frame
    pub rotation: DQuat,
    /// Visual scale, never touched by the simulation
    pub scale: DVec3,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            frame: Frame::World,
            translation: DVec3::ZERO,
            rotation: DQuat::IDENTITY,
            scale: DVec3::ONE,
        }
    }
}

impl Body {
    /// Body in the world frame at `translation`.
    pub fn at(translation: DVec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }
}

/// Breakdown of the acceleration applied during the last tick (internal units/s²).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Accelerations {
    pub gravity: DVec3,
    pub friction: DVec3,
    pub engine: DVec3,
    pub total: DVec3,
}

impl Accelerations {
    /// Build from components, computing the total.
    pub fn new(gravity: DVec3, friction: DVec3, engine: DVec3) -> Self {
        Self {
            gravity,
            friction,
            engine,
            total: gravity + friction + engine,
        }
    }

    /// Recompute `total` after a component changed.
    pub fn resum(&mut self) {
        self.total = self.gravity + self.friction + self.engine;
    }
}

/// Massive-body properties of an entity that attracts and can be hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attractor {
    /// Radius in internal units
    pub radius: f64,
    /// Surface gravitational acceleration (m/s²)
    pub surface_gravity: f64,
}

/// One simulated physical object.
#[derive(Clone, Debug, PartialEq)]
pub struct SimEntity {
    pub kind: EntityKind,
    /// Unique name within a world
    pub name: String,
    pub body: Body,
    /// Mass in kg
    pub mass: f64,
    pub drag_coefficient: f64,
    /// Velocity in the world frame (internal units/s); meaningful while free-falling
    pub velocity: DVec3,
    pub accelerations: Accelerations,
    pub is_free_falling: bool,
    /// Engine power in [0, 1]
    pub thrust_power: f64,
    pub thrust_direction: ThrustDirection,
    /// Whether the entity belongs to the physical iteration set
    pub physical: bool,
    /// Body whose gravity (and atmosphere) applies to this entity
    pub dominant_body: BodyId,
    /// Present on massive bodies such as the Moon
    pub attractor: Option<Attractor>,
}

impl SimEntity {
    /// Create a grounded entity at rest in the world frame.
    pub fn new(kind: EntityKind, name: impl Into<String>, position: DVec3) -> Self {
        Self {
            kind,
            name: name.into(),
            body: Body::at(position),
            mass: 1.0,
            drag_coefficient: DEFAULT_DRAG_COEFFICIENT,
            velocity: DVec3::ZERO,
            accelerations: Accelerations::default(),
            is_free_falling: false,
            thrust_power: 0.0,
            thrust_direction: ThrustDirection::Idle,
            physical: true,
            dominant_body: BodyId::Primary,
            attractor: None,
        }
    }

    /// Set the initial velocity and mark the entity as in flight.
    pub fn in_flight(mut self, velocity: DVec3) -> Self {
        self.velocity = velocity;
        self.is_free_falling = true;
        self
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_drag_coefficient(mut self, drag_coefficient: f64) -> Self {
        self.drag_coefficient = drag_coefficient;
        self
    }

    pub fn with_attractor(mut self, attractor: Attractor) -> Self {
        self.attractor = Some(attractor);
        self
    }

    pub fn with_dominant_body(mut self, body: BodyId) -> Self {
        self.dominant_body = body;
        self
    }

    pub fn with_rotation(mut self, rotation: DQuat) -> Self {
        self.body.rotation = rotation;
        self
    }

    /// Exclude the entity from the physical iteration set.
    pub fn non_physical(mut self) -> Self {
        self.physical = false;
        self
    }

    /// Whether the entity is integrated during a tick.
    pub fn is_in_flight(&self) -> bool {
        self.physical && self.is_free_falling
    }

    /// Reason the entity cannot be registered, if any.
    pub fn validate(&self) -> Option<String> {
        if self.name.trim().is_empty() {
            return Some("name must not be empty".to_string());
        }
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Some(format!("mass must be positive, got {}", self.mass));
        }
        if !(self.drag_coefficient.is_finite() && self.drag_coefficient > 0.0) {
            return Some(format!(
                "drag coefficient must be positive, got {}",
                self.drag_coefficient
            ));
        }
        if !(0.0..=1.0).contains(&self.thrust_power) {
            return Some(format!("thrust power must be in [0, 1], got {}", self.thrust_power));
        }
        if !self.body.translation.is_finite() || !self.velocity.is_finite() {
            return Some("position and velocity must be finite".to_string());
        }
        if let Some(attractor) = &self.attractor
            && !(attractor.radius > 0.0 && attractor.surface_gravity >= 0.0)
        {
            return Some("attractor radius must be positive".to_string());
        }
        if self.dominant_body == BodyId::Entity(self.name.clone()) {
            return Some("an entity cannot be its own dominant body".to_string());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entity_defaults() {
        let e = SimEntity::new(EntityKind::Cannonball, "ball", DVec3::X);
        assert_eq!(e.mass, 1.0);
        assert_eq!(e.drag_coefficient, 0.0004);
        assert!(!e.is_free_falling);
        assert!(e.physical);
        assert_eq!(e.body.frame, Frame::World);
        assert_eq!(e.dominant_body, BodyId::Primary);
        assert!(e.validate().is_none());
    }

    #[test]
    fn test_accelerations_total() {
        let acc = Accelerations::new(DVec3::X, DVec3::Y, DVec3::Z);
        assert_eq!(acc.total, DVec3::ONE);

        let mut acc = acc;
        acc.friction = DVec3::ZERO;
        acc.resum();
        assert_eq!(acc.total, DVec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn test_thrust_direction_signs() {
        for sign in [-1i8, 0, 1] {
            let dir = ThrustDirection::from_sign(sign).unwrap();
            assert_eq!(dir.sign(), sign as f64);
        }
        assert!(ThrustDirection::from_sign(2).is_none());
    }

    #[test]
    fn test_validate_rejects_bad_entities() {
        let base = SimEntity::new(EntityKind::Satellite, "sat", DVec3::X);

        assert!(SimEntity { name: "  ".into(), ..base.clone() }.validate().is_some());
        assert!(base.clone().with_mass(0.0).validate().is_some());
        assert!(base.clone().with_drag_coefficient(-1.0).validate().is_some());
        assert!(SimEntity { thrust_power: 1.5, ..base.clone() }.validate().is_some());
        assert!(base.clone().in_flight(DVec3::NAN).validate().is_some());
        assert!(
            base.clone()
                .with_dominant_body(BodyId::Entity("sat".into()))
                .validate()
                .is_some()
        );
    }
}
