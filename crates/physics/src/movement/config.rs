//! Movement configuration constants.
//!
//! All movement parameters are grouped here for easy tuning.
//!
//! Time is measured in rendered frames: speeds are units per frame and
//! accelerations units per frame squared. A frame is split into sub-steps by
//! the caller, so the same values hold at any sub-step count.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::deform::DeformConfig;
use super::grapple::GrappleConfig;
use crate::collision::{ContactConfig, GroundQuery};
use crate::ConfigError;

/// Configuration for the player character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementConfig {
    // ========================================================================
    // Body
    // ========================================================================
    /// Half-size of the collision box around the agent center.
    pub half_extents: Vec3,

    // ========================================================================
    // Forces
    // ========================================================================
    /// Downward acceleration.
    pub gravity: f32,

    /// Input acceleration along the camera-relative move direction.
    pub move_accel: f32,

    /// Horizontal speed limit. Vertical speed is never clamped.
    pub max_speed: f32,

    /// Vertical velocity set by a jump.
    pub jump_velocity: f32,

    /// Horizontal velocity retained per frame.
    pub horizontal_drag: f32,

    /// Downward speed below which a touching agent counts as resting.
    pub rest_speed: f32,

    /// Vertical speed while ascending in fly mode.
    pub fly_speed: f32,

    // ========================================================================
    // Subsystems
    // ========================================================================
    /// Floor support probe, measured from the bottom of the collision box.
    pub ground: GroundQuery,

    /// Penalty-force constants.
    pub contact: ContactConfig,

    /// Squash and stretch.
    pub deform: DeformConfig,

    /// Grappling hook.
    pub grapple: GrappleConfig,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            half_extents: Vec3::new(0.6, 1.0, 0.6),

            gravity: 0.02,
            move_accel: 0.1,
            max_speed: 0.4,
            jump_velocity: 0.5,
            horizontal_drag: 0.9,
            rest_speed: 0.05,
            fly_speed: 0.3,

            ground: GroundQuery::new(0.5, 0.25),
            contact: ContactConfig::default(),
            deform: DeformConfig::default(),
            grapple: GrappleConfig::default(),
        }
    }
}

impl MovementConfig {
    /// Low gravity, long jumps and a soft rope.
    pub fn floaty() -> Self {
        Self {
            gravity: 0.012,
            jump_velocity: 0.4,
            horizontal_drag: 0.95,
            grapple: GrappleConfig {
                spring_constant: 0.03,
                damping: 0.12,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Heavier body, quicker stops and a stiff rope.
    pub fn snappy() -> Self {
        Self {
            gravity: 0.03,
            move_accel: 0.15,
            max_speed: 0.35,
            jump_velocity: 0.6,
            horizontal_drag: 0.8,
            grapple: GrappleConfig {
                spring_constant: 0.08,
                damping: 0.3,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Reject values that would make the integrator misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::positive("half_extents.x", self.half_extents.x)?;
        ConfigError::positive("half_extents.y", self.half_extents.y)?;
        ConfigError::positive("half_extents.z", self.half_extents.z)?;
        ConfigError::non_negative("gravity", self.gravity)?;
        ConfigError::non_negative("move_accel", self.move_accel)?;
        ConfigError::positive("max_speed", self.max_speed)?;
        ConfigError::non_negative("jump_velocity", self.jump_velocity)?;
        ConfigError::in_range("horizontal_drag", self.horizontal_drag, 0.0, 1.0)?;
        ConfigError::non_negative("rest_speed", self.rest_speed)?;
        ConfigError::non_negative("fly_speed", self.fly_speed)?;
        ConfigError::non_negative("ground.offset", self.ground.offset)?;
        ConfigError::non_negative("ground.threshold", self.ground.threshold)?;
        ConfigError::non_negative("contact.stiffness", self.contact.stiffness)?;
        ConfigError::non_negative("contact.damping", self.contact.damping)?;
        self.deform.validate()?;
        self.grapple.validate()
    }
}
