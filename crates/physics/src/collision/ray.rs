//! Ray query results.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::world::CollidableId;

/// Closest intersection of a ray with the collidable set.
///
/// The normal is in world space. For a solid hit from outside it points away
/// from the surface, so `direction.dot(normal) < 0`; a ray that starts inside a
/// solid reports a zero distance and a normal that need not oppose it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    /// Collidable that was hit.
    pub collidable: CollidableId,

    /// Distance from the ray origin to the hit point.
    pub distance: f32,

    /// World-space hit point.
    pub point: Vec3,

    /// World-space surface normal at the hit point.
    pub normal: Vec3,
}

impl RayHit {
    /// Whether the surface faces against `direction`.
    #[inline]
    pub fn opposes(&self, direction: Vec3) -> bool {
        direction.dot(self.normal) < 0.0
    }
}
