//! Skitter Creature
//!
//! Locomotion controller for the eight-legged enemy. It decides where each
//! foot should be and leaves the joints to an external IK solver.
//!
//! ```text
//! CreatureRig (bind pose) ──► LocomotionController::tick
//!                               │ steer + advance root
//!                               │ per leg: climb probe, gait, ground probe
//!                               │ climb pitch / falling
//!                               └► IkSolver::solve(&[IkGoal; 8])
//! ```

pub mod locomotion;

pub use locomotion::{
    BodyPose, CreatureRig, GoalBuffer, IkGoal, IkSolver, LegSlot, LegTarget, LegTopology,
    LocomotionConfig, LocomotionController, RigError, Side,
};
