//! Collision detection and response for the player and the creature.
//!
//! This module owns the static collidable set and every query the movement
//! code issues against it.
//!
//! # Key Types
//!
//! - [`CollisionWorld`]: The ordered, append-only set of static collidables
//! - [`RayHit`]: Closest intersection returned by a ray query
//! - [`CollisionContact`]: Result of one agent-vs-collidable test
//! - [`GroundQuery`]: Downward support probe shared by player and creature
//!
//! # Contact Algorithm
//!
//! Contacts are resolved with penalty forces rather than exact resolution:
//! - Broad phase: agent and collidable bounding boxes must overlap
//! - Narrow phase: a ray along the frozen entry velocity must hit a surface
//!   whose normal opposes it
//! - Response: a spring term on the hit distance minus a clamped damping
//!   term on the normal velocity, applied along the surface normal

mod bounds;
mod contact;
mod ground;
mod ray;
mod world;

use thiserror::Error;

pub use bounds::Aabb;
pub use contact::{resolve_contact, CollisionContact, ContactConfig, Severity};
pub use ground::GroundQuery;
pub use ray::RayHit;
pub use world::{Collidable, CollidableId, CollisionWorld};

/// Errors raised while building collision geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollisionError {
    #[error("triangle mesh rejected: {0}")]
    InvalidTriMesh(String),

    #[error("convex hull of {0} points is degenerate")]
    DegenerateHull(usize),

    #[error("triangle index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
}
