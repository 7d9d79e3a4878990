//! Player movement physics.
//!
//! This module implements a force-integrated third-person controller with:
//!
//! - Camera-relative input acceleration and constant gravity
//! - Penalty-force collision response from every touching collidable
//! - A spring-damper grappling hook with tangential swing
//! - Squash-and-stretch deformation driven by acceleration
//! - A debug fly mode
//!
//! # Design
//!
//! Movement is driven by the [`CharacterController`], which takes an
//! [`InputSnapshot`] and updates the player's [`CharacterState`] against the
//! collision world. The controller runs a fixed number of sub-steps per
//! rendered frame so the spring-damper stays stable regardless of frame rate.
//!
//! All movement is deterministic: the same inputs always produce the same
//! outputs.

mod config;
mod controller;
mod deform;
mod grapple;
mod state;

pub use config::MovementConfig;
pub use controller::CharacterController;
pub use deform::{deform, DeformConfig};
pub use grapple::{GrappleConfig, GrapplingHook, RopeVisual, TargetMarker};
pub use state::{CharacterFlags, CharacterState, InputSnapshot};
