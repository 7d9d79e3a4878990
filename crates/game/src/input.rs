//! Player input handling.
//!
//! Converts the raw per-frame sample a platform layer fills into the
//! [`InputSnapshot`] the movement controller reads, and turns held action
//! buttons into one-shot presses.

use glam::Quat;
use serde::{Deserialize, Serialize};
use skitter_physics::InputSnapshot;

/// Raw player input for a single frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,

    /// Grapple button held.
    pub grapple: bool,

    /// Fly-mode debug button held.
    pub toggle_fly: bool,

    /// Mouse delta this frame (pixels).
    pub mouse_delta: (f32, f32),
}

impl RawInput {
    /// Snapshot for the movement controller under the given camera rotation.
    pub fn to_snapshot(&self, camera: Quat) -> InputSnapshot {
        InputSnapshot {
            forward: self.forward,
            backward: self.backward,
            left: self.left,
            right: self.right,
            jump: self.jump,
            camera,
        }
    }
}

/// Buttons that went down this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputEdges {
    pub grapple: bool,
    pub toggle_fly: bool,
}

/// Remembers last frame's buttons so held buttons fire once.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputTracker {
    grapple_held: bool,
    toggle_fly_held: bool,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record this frame's buttons and return the rising edges.
    pub fn update(&mut self, raw: &RawInput) -> InputEdges {
        let edges = InputEdges {
            grapple: raw.grapple && !self.grapple_held,
            toggle_fly: raw.toggle_fly && !self.toggle_fly_held,
        };
        self.grapple_held = raw.grapple;
        self.toggle_fly_held = raw.toggle_fly;
        edges
    }
}
