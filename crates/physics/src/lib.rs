//! Skitter Physics
//!
//! The real-time physics layer that moves the player character through a
//! static world of collidables.
//!
//! # Architecture
//!
//! The crate is split into two systems:
//!
//! - **Collision**: The collidable set, ray queries, the penalty-force
//!   contact resolver and the downward ground probe
//! - **Movement**: Force accumulation, semi-implicit integration, the
//!   grappling hook spring and squash-and-stretch deformation
//!
//! # Per sub-step data flow
//!
//! ```text
//! InputSnapshot ──► CharacterController::run
//!                     │ 1. entry velocity on contact edge
//!                     │ 2. penalty forces (resolve_contact)
//!                     │ 3. deformation from last acceleration
//!                     │ 4. grounding (GroundQuery)
//!                     │ 5-7. input, gravity, grapple forces
//!                     │ 8. integrate, clamp, drag
//!                     └ 9. face movement direction
//! ```
//!
//! Every per-tick function is total: degenerate geometry falls back to zero
//! forces rather than NaN, and nothing here returns an error once the world
//! and configuration have been built.

pub mod collision;
pub mod movement;

use thiserror::Error;

// Re-export commonly used types
pub use collision::{
    resolve_contact, Aabb, Collidable, CollidableId, CollisionContact, CollisionError,
    CollisionWorld, ContactConfig, GroundQuery, RayHit, Severity,
};
pub use movement::{
    CharacterController, CharacterFlags, CharacterState, DeformConfig, GrappleConfig,
    GrapplingHook, InputSnapshot, MovementConfig, RopeVisual, TargetMarker,
};

/// Rejected configuration value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be finite and positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },

    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f32 },

    #[error("{name} must lie in {min}..={max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("sub-step count must be at least 1")]
    ZeroSubsteps,
}

impl ConfigError {
    /// Check that `value` is finite and strictly positive.
    pub fn positive(name: &'static str, value: f32) -> Result<(), Self> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(Self::NotPositive { name, value })
        }
    }

    /// Check that `value` is finite and not below zero.
    pub fn non_negative(name: &'static str, value: f32) -> Result<(), Self> {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(Self::Negative { name, value })
        }
    }

    /// Check that `value` lies in the closed range `min..=max`.
    pub fn in_range(name: &'static str, value: f32, min: f32, max: f32) -> Result<(), Self> {
        if value.is_finite() && value >= min && value <= max {
            Ok(())
        } else {
            Err(Self::OutOfRange {
                name,
                value,
                min,
                max,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_checks() {
        assert!(ConfigError::positive("gravity", 0.02).is_ok());
        assert!(ConfigError::positive("gravity", 0.0).is_err());
        assert!(ConfigError::positive("gravity", f32::NAN).is_err());

        assert!(ConfigError::non_negative("damping", 0.0).is_ok());
        assert!(ConfigError::non_negative("damping", -0.1).is_err());

        assert!(ConfigError::in_range("drag", 0.9, 0.0, 1.0).is_ok());
        assert_eq!(
            ConfigError::in_range("drag", 1.5, 0.0, 1.0),
            Err(ConfigError::OutOfRange {
                name: "drag",
                value: 1.5,
                min: 0.0,
                max: 1.0
            })
        );
    }

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::positive("max_speed", -1.0).unwrap_err();
        assert_eq!(err.to_string(), "max_speed must be finite and positive, got -1");
    }
}
