//! Orbital Cannon - Newton's cannonball simulator
//!
//! A library crate providing a frame-aware simulation of projectiles,
//! satellites and spaceships around a primary body, with impact detection
//! and bevy plugins for driving it from an app.

pub mod cannon;
pub mod collision;
pub mod entity;
pub mod frame;
pub mod orientation;
pub mod physics;
pub mod scenarios;
pub mod types;
pub mod world;

#[cfg(test)]
pub mod test_utils;
