//! Entity registry and the per-frame simulation tick.
//!
//! `SimWorld` owns every simulated entity together with the environment
//! parameters and settings the force models read. Entities are kept in
//! insertion order so a tick visits them deterministically.

use std::collections::HashMap;

use bevy::log::{debug, info, warn};
use bevy::math::{DQuat, DVec3};
use bevy::prelude::Resource;

use crate::collision::{CollisionCandidate, ImpactEvent, detect_collision, resolve_impact};
use crate::entity::{EntityKind, SimEntity, ThrustDirection};
use crate::frame::{BodyId, Frame, FramePose};
use crate::orientation::update_orientation;
use crate::physics::{DominantField, MotionState, accumulate_accelerations};
use crate::types::{Environment, SimulationSettings};

/// Longest chain of nested body frames that is resolved.
const MAX_FRAME_DEPTH: usize = 16;

/// Errors reported by registry operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum WorldError {
    /// Another entity already uses this name.
    #[error("an entity named {0:?} is already registered")]
    NameConflict(String),

    /// The entity failed validation.
    #[error("invalid entity {name:?}: {reason}")]
    InvalidEntity { name: String, reason: String },

    /// No entity with this name exists.
    #[error("no entity named {0:?}")]
    NotFound(String),

    /// The referenced body does not exist or has no attractor.
    #[error("{0:?} is not a massive body")]
    UnknownBody(BodyId),

    /// A command carried an out-of-range value.
    #[error("invalid command for {name:?}: {reason}")]
    InvalidCommand { name: String, reason: String },

    /// Integration produced NaN or infinity.
    #[error("entity {0:?} reached a non-finite state")]
    NonFiniteState(String),

    /// Frame parents nest deeper than supported (or form a loop).
    #[error("frame chain of {0:?} is nested too deeply")]
    FrameTooDeep(BodyId),
}

/// The authoritative set of simulated entities.
#[derive(Resource, Debug)]
pub struct SimWorld {
    entities: Vec<SimEntity>,
    index: HashMap<String, usize>,
    environment: Environment,
    settings: SimulationSettings,
    impacts: Vec<ImpactEvent>,
    elapsed: f64,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new(Environment::default(), SimulationSettings::default())
    }
}

impl SimWorld {
    pub fn new(environment: Environment, settings: SimulationSettings) -> Self {
        Self {
            entities: Vec::new(),
            index: HashMap::new(),
            environment,
            settings,
            impacts: Vec::new(),
            elapsed: 0.0,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Mutable environment; changes apply from the next tick.
    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SimulationSettings {
        &mut self.settings
    }

    /// Simulated seconds advanced so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Insert an entity.
    ///
    /// Fails without touching the registry if the name is taken, the entity
    /// is invalid, or it refers to a body that is not registered yet.
    pub fn register_entity(&mut self, entity: SimEntity) -> Result<(), WorldError> {
        if self.index.contains_key(&entity.name) {
            return Err(WorldError::NameConflict(entity.name));
        }
        if let Some(reason) = entity.validate() {
            return Err(WorldError::InvalidEntity {
                name: entity.name,
                reason,
            });
        }
        if entity.is_free_falling && entity.body.frame != Frame::World {
            return Err(WorldError::InvalidEntity {
                name: entity.name,
                reason: "in-flight entities must be in the world frame".to_string(),
            });
        }
        if let Frame::Body(body) = &entity.body.frame {
            self.check_massive(body)?;
        }
        self.check_massive(&entity.dominant_body)?;

        debug!("Registered {:?} {}", entity.kind, entity.name);
        self.index.insert(entity.name.clone(), self.entities.len());
        self.entities.push(entity);
        Ok(())
    }

    /// Look up an entity by name.
    ///
    /// Lookups are read-only; entities change only through the world's commands.
    ///
    /// ```compile_fail
    /// # use orbital_cannon::world::SimWorld;
    /// let world = SimWorld::default();
    /// world.get_entity_by_name("Sat-1").unwrap().name = "A".to_string();
    /// ```
    pub fn get_entity_by_name(&self, name: &str) -> Result<&SimEntity, WorldError> {
        let index = self.index_of(name)?;
        Ok(&self.entities[index])
    }

    /// Mutable access stays inside the registry so names and frames keep
    /// the guarantees checked at registration.
    fn entity_mut(&mut self, name: &str) -> Result<&mut SimEntity, WorldError> {
        let index = self.index_of(name)?;
        Ok(&mut self.entities[index])
    }

    /// Entities of one kind, in insertion order.
    pub fn get_entities_by_type(&self, kind: EntityKind) -> impl Iterator<Item = &SimEntity> + '_ {
        self.entities.iter().filter(move |e| e.kind == kind)
    }

    /// Entities in the physical iteration set, in insertion order.
    pub fn get_physical_entities(&self) -> impl Iterator<Item = &SimEntity> + '_ {
        self.entities.iter().filter(|e| e.physical)
    }

    /// All entities, in insertion order.
    pub fn entities(&self) -> &[SimEntity] {
        &self.entities
    }

    /// Launch an entity: Grounded → Flying.
    ///
    /// The entity is moved into the world frame at its current world
    /// position and orientation, then given `initial_velocity`.
    pub fn fire(&mut self, name: &str, initial_velocity: DVec3) -> Result<(), WorldError> {
        if !initial_velocity.is_finite() {
            return Err(WorldError::InvalidCommand {
                name: name.to_string(),
                reason: "initial velocity must be finite".to_string(),
            });
        }
        let index = self.index_of(name)?;
        let pose = self.world_pose(index)?;
        let length_scale = self.environment.length_scale;

        let entity = &mut self.entities[index];
        entity.body.frame = Frame::World;
        entity.body.translation = pose.origin;
        entity.body.rotation = pose.rotation;
        entity.velocity = initial_velocity;
        entity.is_free_falling = true;

        info!(
            "Firing {} at {:.1} m/s",
            entity.name,
            initial_velocity.length() * length_scale
        );
        Ok(())
    }

    /// Set a spaceship's engine command.
    pub fn set_thrust(
        &mut self,
        name: &str,
        power: f64,
        direction: ThrustDirection,
    ) -> Result<(), WorldError> {
        if !(0.0..=1.0).contains(&power) {
            return Err(WorldError::InvalidCommand {
                name: name.to_string(),
                reason: format!("thrust power must be in [0, 1], got {power}"),
            });
        }
        let entity = self.entity_mut(name)?;
        entity.thrust_power = power;
        entity.thrust_direction = direction;
        Ok(())
    }

    /// Set an entity's orientation relative to its current frame.
    pub fn set_orientation(&mut self, name: &str, rotation: DQuat) -> Result<(), WorldError> {
        if !rotation.is_finite() {
            return Err(WorldError::InvalidCommand {
                name: name.to_string(),
                reason: "rotation must be finite".to_string(),
            });
        }
        let entity = self.entity_mut(name)?;
        entity.body.rotation = rotation.normalize();
        Ok(())
    }

    /// Set an entity's mass (kg).
    pub fn set_mass(&mut self, name: &str, mass: f64) -> Result<(), WorldError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(WorldError::InvalidCommand {
                name: name.to_string(),
                reason: format!("mass must be positive, got {mass}"),
            });
        }
        self.entity_mut(name)?.mass = mass;
        Ok(())
    }

    /// Set an entity's drag coefficient.
    pub fn set_drag_coefficient(&mut self, name: &str, drag_coefficient: f64) -> Result<(), WorldError> {
        if !(drag_coefficient.is_finite() && drag_coefficient > 0.0) {
            return Err(WorldError::InvalidCommand {
                name: name.to_string(),
                reason: format!("drag coefficient must be positive, got {drag_coefficient}"),
            });
        }
        self.entity_mut(name)?.drag_coefficient = drag_coefficient;
        Ok(())
    }

    /// Move an entity within its current frame.
    ///
    /// Entities attached to it follow, since they are expressed in its frame.
    pub fn set_translation(&mut self, name: &str, translation: DVec3) -> Result<(), WorldError> {
        if !translation.is_finite() {
            return Err(WorldError::InvalidCommand {
                name: name.to_string(),
                reason: "translation must be finite".to_string(),
            });
        }
        self.entity_mut(name)?.body.translation = translation;
        Ok(())
    }

    /// Position of an entity in world coordinates.
    pub fn world_position(&self, name: &str) -> Result<DVec3, WorldError> {
        let index = self.index_of(name)?;
        Ok(self.world_pose(index)?.origin)
    }

    /// Pose of a frame in world coordinates.
    pub fn frame_pose(&self, frame: &Frame) -> Result<FramePose, WorldError> {
        self.frame_pose_at_depth(frame, 0)
    }

    /// Impacts recorded since the last drain.
    pub fn impacts(&self) -> &[ImpactEvent] {
        &self.impacts
    }

    /// Take the recorded impacts, leaving the log empty.
    pub fn drain_impacts(&mut self) -> Vec<ImpactEvent> {
        std::mem::take(&mut self.impacts)
    }

    /// Advance every in-flight physical entity by `dt` seconds.
    ///
    /// A non-positive `dt` leaves every entity untouched. An entity whose
    /// update fails is left as it was and the remaining entities are still
    /// processed.
    pub fn tick(&mut self, dt: f64) {
        if !dt.is_finite() || dt <= 0.0 {
            if dt != 0.0 {
                debug!("Ignoring tick with dt = {}", dt);
            }
            return;
        }

        for index in 0..self.entities.len() {
            if !self.entities[index].is_in_flight() {
                continue;
            }
            if let Err(err) = self.step_entity(index, dt) {
                warn!("Skipping {} this tick: {}", self.entities[index].name, err);
            }
        }

        self.elapsed += dt;
    }

    fn step_entity(&mut self, index: usize, dt: f64) -> Result<(), WorldError> {
        let entity = &self.entities[index];
        let field = self.dominant_field(&entity.dominant_body)?;

        let accelerations =
            accumulate_accelerations(entity, &field, entity.body.rotation, &self.environment);
        let motion = MotionState::new(entity.body.translation, entity.velocity)
            .step(accelerations.total, dt);
        if !motion.is_finite() || !accelerations.total.is_finite() {
            return Err(WorldError::NonFiniteState(entity.name.clone()));
        }

        let candidates = self.collision_candidates(&entity.name)?;
        let threshold = self.environment.collision_threshold;
        let time = self.elapsed + dt;
        let length_scale = self.environment.length_scale;

        let entity = &mut self.entities[index];
        entity.accelerations = accelerations;
        entity.velocity = motion.velocity;
        entity.body.translation = motion.position;

        let own_body = BodyId::Entity(entity.name.clone());
        match detect_collision(motion.position, &candidates, threshold, &own_body) {
            Some(candidate) => {
                let event = resolve_impact(entity, &FramePose::WORLD, candidate, threshold, time);
                info!(
                    "IMPACT! {} hit {} at {:.1} m/s",
                    event.entity_name,
                    event.body_name,
                    event.impact_speed(length_scale)
                );
                self.impacts.push(event);
            }
            None => update_orientation(entity, &self.settings, dt),
        }

        Ok(())
    }

    fn index_of(&self, name: &str) -> Result<usize, WorldError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| WorldError::NotFound(name.to_string()))
    }

    /// Registered entity carrying an attractor, by body id.
    fn check_massive(&self, body: &BodyId) -> Result<(), WorldError> {
        match body {
            BodyId::Primary => Ok(()),
            BodyId::Entity(name) => match self.index.get(name) {
                Some(&i) if self.entities[i].attractor.is_some() => Ok(()),
                _ => Err(WorldError::UnknownBody(body.clone())),
            },
        }
    }

    fn world_pose(&self, index: usize) -> Result<FramePose, WorldError> {
        self.world_pose_at_depth(index, 0)
    }

    fn world_pose_at_depth(&self, index: usize, depth: usize) -> Result<FramePose, WorldError> {
        let entity = &self.entities[index];
        let parent = self.frame_pose_at_depth(&entity.body.frame, depth)?;
        Ok(FramePose::new(
            parent.to_world(entity.body.translation),
            parent.rotation * entity.body.rotation,
        ))
    }

    fn frame_pose_at_depth(&self, frame: &Frame, depth: usize) -> Result<FramePose, WorldError> {
        match frame {
            Frame::World => Ok(FramePose::WORLD),
            Frame::Body(BodyId::Primary) => {
                Ok(FramePose::new(DVec3::ZERO, self.environment.primary.rotation))
            }
            Frame::Body(body @ BodyId::Entity(name)) => {
                if depth >= MAX_FRAME_DEPTH {
                    return Err(WorldError::FrameTooDeep(body.clone()));
                }
                let index = self
                    .index
                    .get(name)
                    .copied()
                    .ok_or_else(|| WorldError::UnknownBody(body.clone()))?;
                self.world_pose_at_depth(index, depth + 1)
            }
        }
    }

    /// Gravity field of a dominant body.
    fn dominant_field(&self, body: &BodyId) -> Result<DominantField, WorldError> {
        match body {
            BodyId::Primary => Ok(DominantField::primary(&self.environment)),
            BodyId::Entity(name) => {
                let index = self
                    .index
                    .get(name)
                    .copied()
                    .ok_or_else(|| WorldError::UnknownBody(body.clone()))?;
                let attractor = self.entities[index]
                    .attractor
                    .ok_or_else(|| WorldError::UnknownBody(body.clone()))?;
                Ok(DominantField {
                    center: self.world_pose(index)?.origin,
                    radius: attractor.radius,
                    surface_gravity: self.environment.accel_to_internal(attractor.surface_gravity),
                    has_atmosphere: false,
                })
            }
        }
    }

    /// Bodies the named entity may hit: the primary, then every attractor
    /// in insertion order. Bodies attached (directly or not) to the entity
    /// itself are left out so frames never form a loop.
    fn collision_candidates(&self, name: &str) -> Result<Vec<CollisionCandidate>, WorldError> {
        let primary = &self.environment.primary;
        let mut candidates = vec![CollisionCandidate {
            body: BodyId::Primary,
            name: primary.name.clone(),
            pose: FramePose::new(DVec3::ZERO, primary.rotation),
            radius: primary.radius,
        }];

        for (index, entity) in self.entities.iter().enumerate() {
            let Some(attractor) = entity.attractor else {
                continue;
            };
            if self.attached_to(index, name) {
                continue;
            }
            candidates.push(CollisionCandidate {
                body: BodyId::Entity(entity.name.clone()),
                name: entity.name.clone(),
                pose: self.world_pose(index)?,
                radius: attractor.radius,
            });
        }

        Ok(candidates)
    }

    /// Whether entity `index` is `name` or sits in a frame chain through `name`.
    fn attached_to(&self, index: usize, name: &str) -> bool {
        let mut current = index;
        for _ in 0..=MAX_FRAME_DEPTH {
            let entity = &self.entities[current];
            if entity.name == name {
                return true;
            }
            match &entity.body.frame {
                Frame::Body(BodyId::Entity(parent)) => match self.index.get(parent) {
                    Some(&parent_index) => current = parent_index,
                    None => return false,
                },
                Frame::World | Frame::Body(BodyId::Primary) => return false,
            }
        }
        true
    }
}
