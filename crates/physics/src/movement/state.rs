//! Character state and input structures.

use std::collections::BTreeMap;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::grapple::GrapplingHook;
use crate::collision::{CollidableId, Severity};

/// Flags describing the character's current state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterFlags(pub u16);

impl CharacterFlags {
    /// Resting on something: a floor, or a wall while barely moving down.
    pub const GROUNDED: u16 = 1 << 0;

    /// The ground probe confirmed a floor under the feet.
    pub const FLOOR_CONTACT: u16 = 1 << 1;

    /// The collision box overlaps at least one collidable.
    pub const IN_CONTACT: u16 = 1 << 2;

    /// Debug fly mode: no gravity, full 3D steering.
    pub const FLY_MODE: u16 = 1 << 3;

    /// Jump input was held on the previous sub-step.
    pub const JUMP_HELD: u16 = 1 << 4;

    /// Check if a flag is set.
    #[inline]
    pub fn has(self, flag: u16) -> bool {
        (self.0 & flag) != 0
    }

    /// Set or clear a flag.
    #[inline]
    pub fn set(&mut self, flag: u16, value: bool) {
        if value {
            self.0 |= flag;
        } else {
            self.0 &= !flag;
        }
    }

    #[inline]
    pub fn grounded(self) -> bool {
        self.has(Self::GROUNDED)
    }

    #[inline]
    pub fn on_floor(self) -> bool {
        self.has(Self::FLOOR_CONTACT)
    }

    #[inline]
    pub fn flying(self) -> bool {
        self.has(Self::FLY_MODE)
    }
}

/// Complete simulation state of the player character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterState {
    /// Center of the collision box in world space.
    pub position: Vec3,

    /// Velocity in units per frame.
    pub velocity: Vec3,

    /// Net acceleration of the last sub-step.
    ///
    /// Transient: rebuilt from forces every sub-step and only read back to
    /// shape the deformation.
    pub acceleration: Vec3,

    /// Body heading in radians; 0 faces +Z.
    pub yaw: f32,

    /// Squash/stretch scale for the renderer.
    pub scale: Vec3,

    pub flags: CharacterFlags,

    /// Velocity frozen when each currently touching collidable was first
    /// touched.
    pub entry_velocities: BTreeMap<CollidableId, Vec3>,

    /// Worst contact of the last sub-step.
    pub severity: Severity,

    pub hook: GrapplingHook,
}

impl Default for CharacterState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            yaw: 0.0,
            scale: Vec3::ONE,
            flags: CharacterFlags::default(),
            entry_velocities: BTreeMap::new(),
            severity: Severity::None,
            hook: GrapplingHook::default(),
        }
    }
}

impl CharacterState {
    /// Create a new state at the given position.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Body orientation from the heading.
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    pub fn horizontal_speed(&self) -> f32 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z).length()
    }

    /// Bottom center of the collision box.
    pub fn feet(&self, half_extents: Vec3) -> Vec3 {
        self.position - Vec3::Y * half_extents.y
    }
}

/// Immutable input sample for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,

    /// Camera orientation; the camera looks along `camera * -Z`.
    pub camera: Quat,
}

impl InputSnapshot {
    /// Check if any movement key is held.
    #[inline]
    pub fn has_movement_input(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Held keys as a camera-local direction, not normalized.
    ///
    /// Opposing keys cancel.
    pub fn local_direction(&self) -> Vec3 {
        let x = (self.right as i32 - self.left as i32) as f32;
        let z = (self.backward as i32 - self.forward as i32) as f32;
        Vec3::new(x, 0.0, z)
    }

    /// Direction the camera looks along.
    pub fn camera_forward(&self) -> Vec3 {
        self.camera * Vec3::NEG_Z
    }
}
