//! Squash-and-stretch deformation driven by acceleration.
//!
//! Purely visual: the scale produced here never feeds back into collision.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Tuning for the squash/stretch mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeformConfig {
    /// Acceleration magnitude below which the body relaxes to unit scale.
    pub threshold: f32,

    /// Fraction of the remaining distance to unit scale recovered per update.
    pub elasticity: f32,

    /// Deformation per unit of acceleration.
    pub gain: f32,

    /// Largest deviation from 1.0 on any axis.
    pub max_deform: f32,

    /// `|dir.y|` above which acceleration counts as vertical.
    pub vertical_dominance: f32,

    /// How much of the volume-preserving squash reaches the vertical axis
    /// during horizontal stretch.
    pub vertical_dampening: f32,
}

impl Default for DeformConfig {
    fn default() -> Self {
        Self {
            threshold: 0.05,
            elasticity: 0.1,
            gain: 1.5,
            max_deform: 0.3,
            vertical_dominance: 0.7,
            vertical_dampening: 0.9,
        }
    }
}

impl DeformConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::non_negative("deform.threshold", self.threshold)?;
        ConfigError::in_range("deform.elasticity", self.elasticity, 0.0, 1.0)?;
        ConfigError::non_negative("deform.gain", self.gain)?;
        ConfigError::in_range("deform.max_deform", self.max_deform, 0.0, 0.99)?;
        ConfigError::in_range("deform.vertical_dominance", self.vertical_dominance, 0.0, 1.0)?;
        ConfigError::in_range("deform.vertical_dampening", self.vertical_dampening, 0.0, 1.0)
    }
}

/// Compute the next body scale from the current one.
///
/// `yaw` is the body heading; horizontal stretch is applied along the
/// acceleration expressed in the body's local frame.
pub fn deform(scale: Vec3, acceleration: Vec3, yaw: f32, config: &DeformConfig) -> Vec3 {
    let magnitude = acceleration.length();
    if !magnitude.is_finite() || magnitude < config.threshold {
        return scale.lerp(Vec3::ONE, config.elasticity);
    }

    let dir = acceleration / magnitude;
    let amount = (magnitude * config.gain).min(config.max_deform);

    let target = if dir.y.abs() > config.vertical_dominance {
        let sy = if dir.y > 0.0 { 1.0 + amount } else { 1.0 - amount };
        let side = 1.0 / sy.sqrt();
        Vec3::new(side, sy, side)
    } else {
        let ground = Vec3::new(dir.x, 0.0, dir.z).normalize_or_zero();
        let local = Quat::from_rotation_y(-yaw) * ground;
        let squash = 1.0 / (1.0 + amount).sqrt() - 1.0;
        Vec3::new(
            1.0 + amount * local.x.abs(),
            1.0 + squash * config.vertical_dampening,
            1.0 + amount * local.z.abs(),
        )
    };

    target.clamp(
        Vec3::splat(1.0 - config.max_deform),
        Vec3::splat(1.0 + config.max_deform),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relaxes_toward_unit() {
        let config = DeformConfig::default();
        let mut scale = Vec3::new(1.3, 0.8, 1.1);

        for _ in 0..200 {
            scale = deform(scale, Vec3::ZERO, 0.0, &config);
        }

        assert!((scale - Vec3::ONE).length() < 1e-3);
    }

    #[test]
    fn test_upward_stretch_preserves_volume() {
        let config = DeformConfig::default();
        let scale = deform(Vec3::ONE, Vec3::new(0.0, 0.1, 0.0), 0.0, &config);

        assert!((scale.y - 1.15).abs() < 1e-5);
        assert!(scale.x < 1.0);
        assert!((scale.x * scale.y * scale.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_downward_squash() {
        let config = DeformConfig::default();
        let scale = deform(Vec3::ONE, Vec3::new(0.0, -1.0, 0.0), 0.0, &config);

        assert!((scale.y - (1.0 - config.max_deform)).abs() < 1e-5);
        assert!(scale.x > 1.0);
        assert!(scale.x <= 1.0 + config.max_deform + 1e-6);
    }

    #[test]
    fn test_horizontal_stretch_in_body_frame() {
        let config = DeformConfig::default();
        let accel = Vec3::new(0.1, 0.0, 0.0);

        // Facing +Z, acceleration along world X stretches local X
        let facing_z = deform(Vec3::ONE, accel, 0.0, &config);
        assert!(facing_z.x > 1.1);
        assert!((facing_z.z - 1.0).abs() < 1e-5);
        assert!(facing_z.y < 1.0);

        // Facing +X, the same acceleration lies along local Z
        let facing_x = deform(Vec3::ONE, accel, std::f32::consts::FRAC_PI_2, &config);
        assert!((facing_x.x - 1.0).abs() < 1e-5);
        assert!(facing_x.z > 1.1);
    }

    #[test]
    fn test_clamped() {
        let config = DeformConfig::default();
        for accel in [
            Vec3::new(100.0, 0.0, 0.0),
            Vec3::new(0.0, 100.0, 0.0),
            Vec3::new(0.0, -100.0, 0.0),
            Vec3::new(3.0, -2.0, 7.0),
        ] {
            let scale = deform(Vec3::ONE, accel, 0.4, &config);
            assert!(scale.max_element() <= 1.0 + config.max_deform + 1e-6);
            assert!(scale.min_element() >= 1.0 - config.max_deform - 1e-6);
        }
    }
}
