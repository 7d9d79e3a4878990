//! Penalty-force contact between a moving agent and one collidable.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;
use super::world::{CollidableId, CollisionWorld};

/// How strongly an agent touches a collidable.
///
/// Ordered so the worst contact of a sub-step is the `max` over all tests.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Severity {
    /// Bounding boxes are apart.
    #[default]
    None,
    /// Boxes overlap but no opposing surface lies along the entry direction.
    Overlap,
    /// An opposing surface was hit and a penalty force applies.
    Hit,
}

/// Spring and damper constants of the penalty response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactConfig {
    /// Spring constant `ks` applied to the ray hit distance.
    pub stiffness: f32,

    /// Damping constant `kd` applied to the normal velocity.
    pub damping: f32,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            stiffness: 0.5,
            damping: 0.5,
        }
    }
}

/// Outcome of one agent-vs-collidable test. Recomputed every sub-step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollisionContact {
    pub severity: Severity,
    pub force: Vec3,
}

impl CollisionContact {
    pub const NONE: Self = Self {
        severity: Severity::None,
        force: Vec3::ZERO,
    };

    pub const OVERLAP: Self = Self {
        severity: Severity::Overlap,
        force: Vec3::ZERO,
    };
}

/// Test the agent against one collidable and compute its penalty force.
///
/// `entry_velocity` is the velocity frozen when the current contact began;
/// the narrow-phase ray follows it so the probe direction stays stable while
/// the live `velocity` reacts to the force. The ray starts at `position`,
/// and penetration depth is how far the agent's own box reaches past the hit
/// point along that ray. A collidable that is not in the world reports no
/// contact.
pub fn resolve_contact(
    world: &CollisionWorld,
    id: CollidableId,
    agent_bounds: &Aabb,
    position: Vec3,
    entry_velocity: Vec3,
    velocity: Vec3,
    config: &ContactConfig,
) -> CollisionContact {
    let Some(collidable) = world.get(id) else {
        return CollisionContact::NONE;
    };

    // Broad phase
    if !collidable.bounds().overlaps(agent_bounds) {
        return CollisionContact::NONE;
    }

    // Narrow phase
    let direction = entry_velocity.normalize_or_zero();
    if direction == Vec3::ZERO {
        return CollisionContact::OVERLAP;
    }

    let Some(hit) = collidable.raycast(position, direction, f32::MAX) else {
        return CollisionContact::OVERLAP;
    };
    if !hit.opposes(direction) {
        return CollisionContact::OVERLAP;
    }

    let depth = (reach(agent_bounds.half_extents(), direction) - hit.distance).max(0.0);
    let force = penalty_force(hit.normal, depth, velocity, config);
    if !force.is_finite() {
        return CollisionContact::OVERLAP;
    }

    CollisionContact {
        severity: Severity::Hit,
        force,
    }
}

/// Distance from a box center to its surface along the unit `direction`.
fn reach(half_extents: Vec3, direction: Vec3) -> f32 {
    let d = direction.abs();
    let mut reach = f32::INFINITY;
    for axis in 0..3 {
        if d[axis] > f32::EPSILON {
            reach = reach.min(half_extents[axis] / d[axis]);
        }
    }
    if reach.is_finite() {
        reach
    } else {
        0.0
    }
}

/// Spring on `depth` minus damper on the normal velocity, along `normal`.
///
/// The damper never exceeds the spring in magnitude, so the response cannot
/// pump energy into the agent.
fn penalty_force(normal: Vec3, depth: f32, velocity: Vec3, config: &ContactConfig) -> Vec3 {
    let spring = config.stiffness * depth;
    let limit = spring.abs();
    let damp = (config.damping * velocity.dot(normal)).clamp(-limit, limit);
    normal * (spring - damp)
}
