//! Reference frames and coordinate conversions.
//!
//! Every entity belongs to exactly one frame: the world frame or the local
//! frame of a massive body. Frames are rigid (rotation + translation), so
//! reparenting never distorts distances.

use bevy::math::{DAffine3, DMat3, DQuat, DVec3};

use crate::types::DISTANCE_EPSILON;

/// Identifies a massive body that can own a frame, attract and be hit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BodyId {
    /// The primary body fixed at the world origin (Earth)
    Primary,
    /// A registered entity carrying an attractor (e.g. the Moon)
    Entity(String),
}

/// Coordinate frame an entity's transform is expressed in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Frame {
    /// The world (inertial) frame
    #[default]
    World,
    /// Local frame of a massive body
    Body(BodyId),
}

/// Geographic position relative to a spherical body.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Geographic {
    /// Latitude in radians, positive north
    pub latitude: f64,
    /// Longitude in radians, positive east
    pub longitude: f64,
    /// Height above the surface in internal units
    pub altitude: f64,
}

/// Normalize a vector, returning zero for degenerate input.
#[inline]
pub fn safe_normalize(v: DVec3) -> DVec3 {
    let len = v.length();
    if len < DISTANCE_EPSILON || !len.is_finite() {
        DVec3::ZERO
    } else {
        v / len
    }
}

/// Convert latitude/longitude/altitude to body-relative Cartesian coordinates.
///
/// Y is the body's north pole axis; longitude 0 lies on +X and longitude
/// increases toward -Z.
pub fn geographic_to_cartesian(geo: Geographic, body_radius: f64) -> DVec3 {
    let r = body_radius + geo.altitude;
    let (sin_lat, cos_lat) = geo.latitude.sin_cos();
    let (sin_lon, cos_lon) = geo.longitude.sin_cos();
    DVec3::new(r * cos_lat * cos_lon, r * sin_lat, -r * cos_lat * sin_lon)
}

/// Convert body-relative Cartesian coordinates to latitude/longitude/altitude.
///
/// The body center maps to latitude 0, longitude 0, altitude `-radius`.
pub fn cartesian_to_geographic(pos: DVec3, body_radius: f64) -> Geographic {
    let r = pos.length();
    if r < DISTANCE_EPSILON {
        return Geographic {
            altitude: -body_radius,
            ..Default::default()
        };
    }
    Geographic {
        latitude: (pos.y / r).clamp(-1.0, 1.0).asin(),
        longitude: (-pos.z).atan2(pos.x),
        altitude: r - body_radius,
    }
}

/// Local east/north/up unit vectors at a geographic position.
pub fn east_north_up(latitude: f64, longitude: f64) -> (DVec3, DVec3, DVec3) {
    let (sin_lat, cos_lat) = latitude.sin_cos();
    let (sin_lon, cos_lon) = longitude.sin_cos();
    let east = DVec3::new(-sin_lon, 0.0, -cos_lon);
    let north = DVec3::new(-sin_lat * cos_lon, cos_lat, sin_lat * sin_lon);
    let up = DVec3::new(cos_lat * cos_lon, sin_lat, -cos_lat * sin_lon);
    (east, north, up)
}

/// Rotation whose forward axis (-Z) points along `direction`.
///
/// Falls back to any orthogonal up vector when `direction` is parallel to `up`.
/// Returns `None` for a zero direction.
pub fn looking_to(direction: DVec3, up: DVec3) -> Option<DQuat> {
    let back = -safe_normalize(direction);
    if back == DVec3::ZERO {
        return None;
    }
    let right = up
        .cross(back)
        .try_normalize()
        .unwrap_or_else(|| back.any_orthonormal_vector());
    let up = back.cross(right);
    Some(DQuat::from_mat3(&DMat3::from_cols(right, up, back)).normalize())
}

/// Forward axis (-Z) of a rotation.
#[inline]
pub fn forward(rotation: DQuat) -> DVec3 {
    rotation * DVec3::NEG_Z
}

/// Origin and orientation of a frame in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FramePose {
    pub origin: DVec3,
    pub rotation: DQuat,
}

impl Default for FramePose {
    fn default() -> Self {
        Self::WORLD
    }
}

impl FramePose {
    /// Pose of the world frame itself.
    pub const WORLD: Self = Self {
        origin: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
    };

    pub fn new(origin: DVec3, rotation: DQuat) -> Self {
        Self { origin, rotation }
    }

    /// Rigid transform from frame coordinates to world coordinates.
    #[inline]
    pub fn affine(&self) -> DAffine3 {
        DAffine3::from_rotation_translation(self.rotation, self.origin)
    }

    #[inline]
    pub fn to_world(&self, local: DVec3) -> DVec3 {
        self.origin + self.rotation * local
    }

    #[inline]
    pub fn to_local(&self, world: DVec3) -> DVec3 {
        self.rotation.inverse() * (world - self.origin)
    }
}

/// Re-express a local position of `old` frame in `new` frame coordinates.
///
/// The world position is unchanged.
pub fn reproject_to_frame(local: DVec3, old: &FramePose, new: &FramePose) -> DVec3 {
    let world = old.affine().transform_point3(local);
    new.affine().inverse().transform_point3(world)
}

/// Re-express a local orientation of `old` frame relative to `new` frame.
pub fn reproject_rotation(local: DQuat, old: &FramePose, new: &FramePose) -> DQuat {
    (new.rotation.inverse() * old.rotation * local).normalize()
}
