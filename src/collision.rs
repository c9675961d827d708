//! Collision detection between in-flight entities and massive bodies.
//!
//! An entity hits a body once it comes within the body's radius plus a small
//! clearance. On impact:
//! - Free fall stops and velocity and drag are zeroed
//! - The entity is projected onto the body's surface
//! - Its transform is reparented into the body's frame
//! - An `ImpactEvent` is recorded for visual collaborators

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::entity::SimEntity;
use crate::frame::{BodyId, Frame, FramePose, reproject_rotation, reproject_to_frame, safe_normalize};
use crate::physics::physics_step;
use crate::world::SimWorld;

/// A massive body that entities may hit this tick.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionCandidate {
    pub body: BodyId,
    /// Display name of the body
    pub name: String,
    /// Pose of the body's frame; its origin is the body center
    pub pose: FramePose,
    /// Radius (internal units)
    pub radius: f64,
}

/// Record of an entity striking a body.
#[derive(Clone, Debug, PartialEq)]
pub struct ImpactEvent {
    /// Name of the entity that landed
    pub entity_name: String,
    /// The body that was hit
    pub body: BodyId,
    /// Display name of the body that was hit
    pub body_name: String,
    /// Contact point in world coordinates
    pub impact_position: DVec3,
    /// Velocity just before impact (internal units/s)
    pub impact_velocity: DVec3,
    /// Simulated seconds since the world started
    pub time: f64,
}

impl ImpactEvent {
    /// Impact speed in physical m/s.
    pub fn impact_speed(&self, length_scale: f64) -> f64 {
        self.impact_velocity.length() * length_scale
    }
}

/// Surface point above `position`, `threshold` clear of the surface.
///
/// Falls back to the body's +Y pole when `position` is the center.
pub fn surface_point(position: DVec3, center: DVec3, radius: f64, threshold: f64) -> DVec3 {
    let mut normal = safe_normalize(position - center);
    if normal == DVec3::ZERO {
        normal = DVec3::Y;
    }
    center + normal * (radius + threshold)
}

/// Find the body `position` has hit, if any.
///
/// Candidates whose body is `own_body` are skipped, so a moon never collides
/// with itself. When several bodies register a hit the nearest center wins;
/// on an exact tie the earlier candidate is kept.
pub fn detect_collision<'a>(
    position: DVec3,
    candidates: &'a [CollisionCandidate],
    threshold: f64,
    own_body: &BodyId,
) -> Option<&'a CollisionCandidate> {
    let mut hit: Option<(&CollisionCandidate, f64)> = None;

    for candidate in candidates {
        if &candidate.body == own_body {
            continue;
        }
        let distance = (position - candidate.pose.origin).length();
        if distance > candidate.radius + threshold {
            continue;
        }
        if hit.is_none_or(|(_, nearest)| distance < nearest) {
            hit = Some((candidate, distance));
        }
    }

    hit.map(|(candidate, _)| candidate)
}

/// Ground an entity on the body it hit.
///
/// # Arguments
/// * `entity` - The colliding entity
/// * `current_frame` - Pose of the frame the entity is currently expressed in
/// * `candidate` - The body that was hit
/// * `threshold` - Surface clearance (internal units)
/// * `time` - Simulation time for the event
pub fn resolve_impact(
    entity: &mut SimEntity,
    current_frame: &FramePose,
    candidate: &CollisionCandidate,
    threshold: f64,
    time: f64,
) -> ImpactEvent {
    let world_position = current_frame.to_world(entity.body.translation);
    let impact_velocity = entity.velocity;

    entity.is_free_falling = false;
    entity.velocity = DVec3::ZERO;
    entity.accelerations.friction = DVec3::ZERO;
    entity.accelerations.resum();

    let contact = surface_point(world_position, candidate.pose.origin, candidate.radius, threshold);
    let target_frame = Frame::Body(candidate.body.clone());

    if entity.body.frame == target_frame {
        entity.body.translation = candidate.pose.to_local(contact);
    } else {
        entity.body.translation = reproject_to_frame(
            current_frame.to_local(contact),
            current_frame,
            &candidate.pose,
        );
        entity.body.rotation =
            reproject_rotation(entity.body.rotation, current_frame, &candidate.pose);
        entity.body.frame = target_frame;
    }

    ImpactEvent {
        entity_name: entity.name.clone(),
        body: candidate.body.clone(),
        body_name: candidate.name.clone(),
        impact_position: contact,
        impact_velocity,
        time,
    }
}

/// Resource tracking impacts for UI display.
#[derive(Resource, Default)]
pub struct CollisionState {
    /// Most recent impact, if any.
    pub last_collision: Option<ImpactEvent>,
    /// Number of impacts observed since startup.
    pub total_impacts: usize,
}

impl CollisionState {
    /// Clear the collision state (e.g., when resetting a scenario).
    pub fn clear(&mut self) {
        self.last_collision = None;
        self.total_impacts = 0;
    }

    /// Check if there's been an impact.
    pub fn has_collision(&self) -> bool {
        self.last_collision.is_some()
    }
}

/// Move impacts recorded by the world into `CollisionState`.
pub fn collect_impacts(mut world: ResMut<SimWorld>, mut state: ResMut<CollisionState>) {
    for event in world.drain_impacts() {
        state.total_impacts += 1;
        state.last_collision = Some(event);
    }
}

/// Plugin providing impact bookkeeping.
pub struct CollisionPlugin;

impl Plugin for CollisionPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(CollisionState::default())
            .add_systems(Update, collect_impacts.after(physics_step));
    }
}
