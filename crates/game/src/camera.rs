//! Third-person follow camera.

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use skitter_physics::ConfigError;

/// Camera tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Distance behind the player.
    pub distance: f32,

    /// Height above the player.
    pub height: f32,

    /// Radians per pixel of mouse motion.
    pub sensitivity: f32,

    /// Pitch limit in either direction (radians).
    pub max_pitch: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 5.0,
            height: 2.0,
            sensitivity: 0.002,
            max_pitch: FRAC_PI_2,
        }
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::non_negative("camera.distance", self.distance)?;
        ConfigError::positive("camera.sensitivity", self.sensitivity)?;
        ConfigError::in_range("camera.max_pitch", self.max_pitch, 0.0, FRAC_PI_2)
    }
}

/// Orbiting camera that looks along `rotation * -Z`.
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub config: CameraConfig,

    /// Heading in radians.
    pub yaw: f32,

    /// Look-up angle in radians.
    pub pitch: f32,

    /// Eye position in world space, refreshed by [`CameraRig::follow`].
    pub position: Vec3,
}

impl CameraRig {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            yaw: 0.0,
            pitch: 0.0,
            position: Vec3::ZERO,
        }
    }

    /// Turn the camera by a mouse delta in pixels.
    ///
    /// Moving the mouse right turns right; moving it up looks up.
    pub fn apply_mouse(&mut self, delta: (f32, f32)) {
        let (dx, dy) = delta;
        self.yaw -= dx * self.config.sensitivity;
        self.pitch = (self.pitch - dy * self.config.sensitivity)
            .clamp(-self.config.max_pitch, self.config.max_pitch);
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch)
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }

    /// Place the eye behind and above `target`.
    pub fn follow(&mut self, target: Vec3) {
        self.position = target
            + self.rotation() * Vec3::new(0.0, 0.0, self.config.distance)
            + Vec3::Y * self.config.height;
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_sits_behind_target() {
        let mut camera = CameraRig::default();
        camera.follow(Vec3::new(1.0, 1.0, 1.0));

        assert!((camera.position - Vec3::new(1.0, 3.0, 6.0)).length() < 1e-5);
        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_mouse_turns_and_clamps() {
        let mut camera = CameraRig::default();

        // Mouse right turns right: forward swings toward +X
        camera.apply_mouse((100.0, 0.0));
        assert!((camera.yaw + 0.2).abs() < 1e-6);
        assert!(camera.forward().x > 0.0);

        // Mouse up looks up, clamped at straight up
        camera.apply_mouse((0.0, -10_000.0));
        assert_eq!(camera.pitch, FRAC_PI_2);
        assert!(camera.forward().y > 0.999);

        camera.apply_mouse((0.0, 20_000.0));
        assert_eq!(camera.pitch, -FRAC_PI_2);
    }

    #[test]
    fn test_validate() {
        assert!(CameraConfig::default().validate().is_ok());
        let config = CameraConfig {
            sensitivity: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
