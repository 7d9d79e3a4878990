//! Procedural locomotion for the eight-legged creature.
//!
//! Feet stay planted in world space while the body moves. A foot that
//! drifts too far from its rest pose lifts and steps back, unless a
//! neighbouring leg is already stepping. Surfaces ahead of the feet tilt the
//! body into a climb; losing all support drops it toward the floor.

mod config;
mod controller;
mod ik;
mod leg;
mod rig;

pub use config::LocomotionConfig;
pub use controller::{BodyPose, LocomotionController};
pub use ik::{GoalBuffer, IkGoal, IkSolver};
pub use leg::{LegSlot, LegTarget, LegTopology, Side};
pub use rig::{CreatureRig, RigError};
