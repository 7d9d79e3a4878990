//! Locomotion tuning.
//!
//! Rates are per creature tick; one tick runs per rendered frame.

use serde::{Deserialize, Serialize};
use skitter_physics::{ConfigError, GroundQuery};

/// Configuration for the creature's gait and body motion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocomotionConfig {
    // ========================================================================
    // Steering
    // ========================================================================
    /// Largest yaw change per tick (radians).
    pub turn_speed: f32,

    /// Distance advanced per tick, before the root scale is applied.
    pub move_speed: f32,

    // ========================================================================
    // Gait
    // ========================================================================
    /// Distance between a foot and its rest pose that triggers a step.
    pub return_threshold: f32,

    /// Distance a stepping foot travels per tick.
    pub step_speed: f32,

    /// Height a foot is lifted when a step begins.
    pub lift_height: f32,

    // ========================================================================
    // Climbing
    // ========================================================================
    /// Upward tilt added to the look direction of the climb probe.
    pub climb_tilt: f32,

    /// Climb probe length, before the root scale is applied.
    pub climb_reach: f32,

    /// Ticks the creature stays in climbing mode after the last detection.
    pub climb_cooldown: u32,

    /// Pitch per unit of front-minus-back leg height.
    pub pitch_sensitivity: f32,

    /// Largest pitch change per tick while climbing (radians).
    pub pitch_rate: f32,

    /// Pitch limit in either direction (radians).
    pub max_pitch: f32,

    // ========================================================================
    // Falling
    // ========================================================================
    /// Height lost per tick while unsupported.
    pub fall_step: f32,

    /// The root never falls below this height.
    pub min_height: f32,

    /// Pitch recovered toward level per tick while falling (radians).
    pub pitch_relax: f32,

    /// Per-foot support probe.
    pub ground: GroundQuery,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            turn_speed: 0.05,
            move_speed: 0.05,

            return_threshold: 2.0,
            step_speed: 0.4,
            lift_height: 0.5,

            climb_tilt: 0.5,
            climb_reach: 1.5,
            climb_cooldown: 30,
            pitch_sensitivity: 0.5,
            pitch_rate: 0.05,
            max_pitch: std::f32::consts::FRAC_PI_2,

            fall_step: 0.1,
            min_height: 0.0,
            pitch_relax: 0.05,

            ground: GroundQuery::new(0.5, 0.5),
        }
    }
}

impl LocomotionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::non_negative("turn_speed", self.turn_speed)?;
        ConfigError::non_negative("move_speed", self.move_speed)?;
        ConfigError::non_negative("return_threshold", self.return_threshold)?;
        ConfigError::positive("step_speed", self.step_speed)?;
        ConfigError::non_negative("lift_height", self.lift_height)?;
        ConfigError::non_negative("climb_reach", self.climb_reach)?;
        ConfigError::non_negative("pitch_rate", self.pitch_rate)?;
        ConfigError::in_range("max_pitch", self.max_pitch, 0.0, std::f32::consts::FRAC_PI_2)?;
        ConfigError::non_negative("fall_step", self.fall_step)?;
        ConfigError::non_negative("pitch_relax", self.pitch_relax)?;
        ConfigError::non_negative("ground.offset", self.ground.offset)?;
        ConfigError::non_negative("ground.threshold", self.ground.threshold)
    }
}
