//! Skitter Game Logic
//!
//! Ties the player controller, the creature and the camera together into
//! one frame-driven chase.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Simulation::frame                         │
//! │  ┌──────────┐   ┌────────────────┐   ┌─────────────────────┐  │
//! │  │ RawInput │──►│ Player physics │──►│ Creature locomotion │  │
//! │  │ + camera │   │ (10 sub-steps) │   │ (1 tick, IK solve)  │  │
//! │  └──────────┘   └────────────────┘   └─────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rendering, audio, menus and scoring are left to collaborators that read
//! the simulation's state after each frame.

pub mod arena;
pub mod camera;
pub mod input;
pub mod simulation;

// Re-export main types
pub use arena::{Arena, SpawnKind, SpawnPoint};
pub use camera::{CameraConfig, CameraRig};
pub use input::{InputEdges, InputTracker, RawInput};
pub use simulation::{Simulation, SimulationConfig, SimulationError};

// Re-export collaborator-facing types for convenience
pub use skitter_creature::{IkGoal, IkSolver, LocomotionController};
pub use skitter_physics::{CharacterState, CollisionWorld, MovementConfig};
