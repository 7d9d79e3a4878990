//! Downward support probe.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::ray::RayHit;
use super::world::CollisionWorld;

/// A ray cast along `-up` from slightly above a point.
///
/// Starting above the point keeps the probe working when the point has
/// sunk a little into the surface it stands on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundQuery {
    /// Height above the queried point where the ray starts.
    pub offset: f32,

    /// How far below the queried point a surface still counts as support.
    pub threshold: f32,
}

impl Default for GroundQuery {
    fn default() -> Self {
        Self {
            offset: 0.5,
            threshold: 0.25,
        }
    }
}

impl GroundQuery {
    pub fn new(offset: f32, threshold: f32) -> Self {
        Self { offset, threshold }
    }

    /// Closest support surface under `position`, if any lies within reach.
    pub fn probe(&self, world: &CollisionWorld, position: Vec3, up: Vec3) -> Option<RayHit> {
        let up = up.normalize_or_zero();
        if up == Vec3::ZERO {
            return None;
        }
        let origin = position + up * self.offset;
        world.raycast(origin, -up, self.threshold + self.offset)
    }

    pub fn is_supported(&self, world: &CollisionWorld, position: Vec3, up: Vec3) -> bool {
        self.probe(world, position, up).is_some()
    }
}
