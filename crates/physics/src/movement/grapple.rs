//! Grappling hook: a spring-damper rope toward a surface anchor.
//!
//! # Lifecycle
//!
//! ```text
//! Inactive ──shoot() hit──► Active ──proximity / lifetime / re-shoot──► Inactive
//! ```
//!
//! The hook owns its rope and target-marker visuals. They exist exactly while
//! the hook is active; `expire()` drops both.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::CollisionWorld;
use crate::ConfigError;

/// Below this length a swing or rope direction is undefined.
const SWING_EPSILON: f32 = 1e-6;

/// Grappling hook tuning. Rates are per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrappleConfig {
    /// Pull per unit of rope length.
    pub spring_constant: f32,

    /// Velocity-proportional drag while attached.
    pub damping: f32,

    /// Scale applied to the vertical component of the pull.
    pub y_scale: f32,

    /// Longest shot that can attach.
    pub max_distance: f32,

    /// Detach once closer than this to the anchor.
    pub release_distance: f32,

    /// Largest magnitude of the tangential swing force.
    pub swing_max: f32,

    /// Height above the agent center the hook is fired from.
    pub launch_height: f32,

    /// Frames before the rope expires on its own.
    pub lifetime: f32,
}

impl Default for GrappleConfig {
    fn default() -> Self {
        Self {
            spring_constant: 0.05,
            damping: 0.2,
            y_scale: 0.5,
            max_distance: 100.0,
            release_distance: 1.5,
            swing_max: 0.05,
            launch_height: 1.0,
            lifetime: 300.0,
        }
    }
}

impl GrappleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::non_negative("grapple.spring_constant", self.spring_constant)?;
        ConfigError::non_negative("grapple.damping", self.damping)?;
        ConfigError::in_range("grapple.y_scale", self.y_scale, 0.0, 1.0)?;
        ConfigError::positive("grapple.max_distance", self.max_distance)?;
        ConfigError::non_negative("grapple.release_distance", self.release_distance)?;
        ConfigError::non_negative("grapple.swing_max", self.swing_max)?;
        ConfigError::positive("grapple.lifetime", self.lifetime)
    }
}

/// Rope endpoints for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RopeVisual {
    pub start: Vec3,
    pub end: Vec3,
}

impl RopeVisual {
    /// Move the agent end of the rope. The anchor end never moves.
    #[inline]
    pub fn refresh(&mut self, start: Vec3) {
        self.start = start;
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// Marker shown at the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetMarker {
    pub position: Vec3,
}

/// Grappling hook state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrapplingHook {
    anchor: Option<Vec3>,
    rope: Option<RopeVisual>,
    marker: Option<TargetMarker>,
    rope_length: f32,
    /// Current length of the taut rope, measured from the agent center.
    tether: Option<f32>,
    remaining: f32,
}

impl GrapplingHook {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn anchor(&self) -> Option<Vec3> {
        self.anchor
    }

    pub fn rope(&self) -> Option<&RopeVisual> {
        self.rope.as_ref()
    }

    pub fn marker(&self) -> Option<&TargetMarker> {
        self.marker.as_ref()
    }

    /// Rope length at the moment of attachment.
    pub fn rope_length(&self) -> f32 {
        self.rope_length
    }

    /// Frames left before the rope expires.
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Fire along `direction` from above `position`.
    ///
    /// Any existing hook is cancelled first, so re-triggering never leaves two
    /// ropes alive. Returns whether a surface was hit.
    pub fn shoot(
        &mut self,
        config: &GrappleConfig,
        world: &CollisionWorld,
        position: Vec3,
        direction: Vec3,
    ) -> bool {
        if self.is_active() {
            log::debug!("Grapple re-triggered, cancelling previous hook");
            self.expire();
        }

        let origin = position + Vec3::Y * config.launch_height;
        match world.raycast(origin, direction, config.max_distance) {
            Some(hit) => {
                self.attach(config, origin, hit.point);
                self.tether = Some(position.distance(hit.point));
                true
            }
            None => {
                log::debug!("Grapple missed");
                false
            }
        }
    }

    /// Attach directly to `anchor`, as if a shot from `origin` had hit it.
    pub fn attach(&mut self, config: &GrappleConfig, origin: Vec3, anchor: Vec3) {
        self.anchor = Some(anchor);
        self.rope_length = origin.distance(anchor);
        self.rope = Some(RopeVisual {
            start: origin,
            end: anchor,
        });
        self.marker = Some(TargetMarker { position: anchor });
        self.tether = None;
        self.remaining = config.lifetime;
        log::debug!(
            "Grapple attached at ({:.2}, {:.2}, {:.2}), length {:.2}",
            anchor.x,
            anchor.y,
            anchor.z,
            self.rope_length
        );
    }

    /// Drop the hook and both of its visuals.
    pub fn expire(&mut self) {
        self.anchor = None;
        self.rope = None;
        self.marker = None;
        self.rope_length = 0.0;
        self.tether = None;
        self.remaining = 0.0;
    }

    /// Pull on an agent at `position` moving with `velocity`.
    ///
    /// Zero while inactive.
    pub fn force(&self, config: &GrappleConfig, position: Vec3, velocity: Vec3) -> Vec3 {
        let Some(anchor) = self.anchor else {
            return Vec3::ZERO;
        };

        let to_anchor = anchor - position;
        let distance = to_anchor.length();
        let direction = to_anchor.normalize_or_zero();

        let mut force = direction * (distance * config.spring_constant) - velocity * config.damping;
        force.y *= config.y_scale;

        // Swing follows the agent's own motion around the anchor
        let tangential = velocity - direction * velocity.dot(direction);
        if tangential.length() > SWING_EPSILON {
            let swing = velocity.length().min(config.swing_max);
            force += tangential.normalize() * swing;
        }

        force
    }

    /// Hold the agent inside the rope.
    ///
    /// The rope reels in but never pays out: past its current length the
    /// agent is pulled back onto it and loses its outward velocity. Without
    /// a length yet, the current distance is taken.
    pub fn constrain(&mut self, position: &mut Vec3, velocity: &mut Vec3) {
        let Some(anchor) = self.anchor else {
            return;
        };

        let from_anchor = *position - anchor;
        let distance = from_anchor.length();
        let tether = *self.tether.get_or_insert(distance);

        if distance > tether && distance > SWING_EPSILON {
            let outward = from_anchor / distance;
            *position = anchor + outward * tether;
            let stretch = velocity.dot(outward);
            if stretch > 0.0 {
                *velocity -= outward * stretch;
            }
        } else {
            self.tether = Some(distance);
        }
    }

    /// Keep the rope attached to the agent's launch point.
    pub fn refresh_rope(&mut self, config: &GrappleConfig, position: Vec3) {
        if let Some(rope) = self.rope.as_mut() {
            rope.refresh(position + Vec3::Y * config.launch_height);
        }
    }

    /// Advance the lifetime by `dt` frames and release on proximity.
    pub fn update(&mut self, config: &GrappleConfig, position: Vec3, dt: f32) {
        let Some(anchor) = self.anchor else {
            return;
        };

        self.remaining -= dt;
        if self.remaining <= 0.0 {
            log::debug!("Grapple rope expired");
            self.expire();
            return;
        }

        if position.distance(anchor) < config.release_distance {
            log::debug!("Grapple released near anchor");
            self.expire();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();
        // Wall facing -X at x=20
        world.add_box(Vec3::new(20.5, 5.0, 0.0), Vec3::new(0.5, 10.0, 10.0));
        world
    }

    #[test]
    fn test_shoot_attaches_with_visuals() {
        let config = GrappleConfig::default();
        let world = create_test_world();
        let mut hook = GrapplingHook::new();

        assert!(hook.shoot(&config, &world, Vec3::ZERO, Vec3::X));
        assert!(hook.is_active());

        let anchor = hook.anchor().unwrap();
        assert!((anchor - Vec3::new(20.0, 1.0, 0.0)).length() < 1e-3);
        assert!((hook.rope_length() - 20.0).abs() < 1e-3);
        assert_eq!(hook.marker().unwrap().position, anchor);
        assert_eq!(hook.rope().unwrap().end, anchor);
        assert_eq!(hook.remaining(), config.lifetime);
    }

    #[test]
    fn test_shoot_miss_and_out_of_range() {
        let world = create_test_world();
        let mut hook = GrapplingHook::new();

        assert!(!hook.shoot(&GrappleConfig::default(), &world, Vec3::ZERO, Vec3::NEG_X));
        assert!(!hook.is_active());

        let short = GrappleConfig {
            max_distance: 10.0,
            ..Default::default()
        };
        assert!(!hook.shoot(&short, &world, Vec3::ZERO, Vec3::X));
        assert!(hook.rope().is_none());
    }

    #[test]
    fn test_retrigger_cancels_previous() {
        let config = GrappleConfig::default();
        let world = create_test_world();
        let mut hook = GrapplingHook::new();

        assert!(hook.shoot(&config, &world, Vec3::ZERO, Vec3::X));
        // Second shot misses; the first hook must not survive it
        assert!(!hook.shoot(&config, &world, Vec3::ZERO, Vec3::NEG_X));
        assert!(!hook.is_active());
        assert!(hook.rope().is_none());
        assert!(hook.marker().is_none());
    }

    #[test]
    fn test_lifetime_expiry() {
        let config = GrappleConfig {
            lifetime: 1.0,
            ..Default::default()
        };
        let mut hook = GrapplingHook::new();
        hook.attach(&config, Vec3::ZERO, Vec3::new(0.0, 50.0, 0.0));

        for _ in 0..9 {
            hook.update(&config, Vec3::ZERO, 0.1);
        }
        assert!(hook.is_active());

        hook.update(&config, Vec3::ZERO, 0.1);
        hook.update(&config, Vec3::ZERO, 0.1);
        assert!(!hook.is_active());
        assert!(hook.rope().is_none());
        assert!(hook.marker().is_none());
    }

    #[test]
    fn test_release_on_proximity() {
        let config = GrappleConfig::default();
        let mut hook = GrapplingHook::new();
        hook.attach(&config, Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0));

        hook.update(&config, Vec3::new(0.0, 8.0, 0.0), 0.1);
        assert!(hook.is_active());

        hook.update(&config, Vec3::new(0.0, 9.0, 0.0), 0.1);
        assert!(!hook.is_active());
    }

    #[test]
    fn test_force_vertical_rope_has_no_swing() {
        let config = GrappleConfig::default();
        let mut hook = GrapplingHook::new();
        hook.attach(&config, Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0));

        let force = hook.force(&config, Vec3::ZERO, Vec3::ZERO);
        // 10 * 0.05, then scaled by y_scale
        assert!((force - Vec3::new(0.0, 0.25, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_force_swing_is_tangential_and_clamped() {
        let config = GrappleConfig::default();
        let mut hook = GrapplingHook::new();
        hook.attach(&config, Vec3::ZERO, Vec3::new(10.0, 10.0, 0.0));

        let at_rest = hook.force(&config, Vec3::ZERO, Vec3::ZERO);
        let moving = hook.force(&config, Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0));

        // Damping on z is -1.0; the swing along cross((10,10,0), Y) = +z adds swing_max
        let swing = moving - at_rest;
        assert!(swing.x.abs() < 1e-6 && swing.y.abs() < 1e-6);
        assert!((swing.z - (-5.0 * config.damping + config.swing_max)).abs() < 1e-5);
    }

    #[test]
    fn test_swing_follows_motion() {
        let config = GrappleConfig::default();
        let mut hook = GrapplingHook::new();
        hook.attach(&config, Vec3::ZERO, Vec3::new(10.0, 10.0, 0.0));
        let at_rest = hook.force(&config, Vec3::ZERO, Vec3::ZERO);

        // Swinging toward -z pushes further toward -z
        let swing = hook.force(&config, Vec3::ZERO, Vec3::new(0.0, 0.0, -5.0)) - at_rest;
        assert!((swing.z - (5.0 * config.damping - config.swing_max)).abs() < 1e-5);

        // Motion straight along the rope gets no swing at all
        let velocity = Vec3::new(1.0, 1.0, 0.0);
        let mut expected = -velocity * config.damping;
        expected.y *= config.y_scale;
        let along = hook.force(&config, Vec3::ZERO, velocity) - at_rest;
        assert!((along - expected).length() < 1e-5);
    }

    #[test]
    fn test_rope_never_pays_out() {
        let config = GrappleConfig::default();
        let mut hook = GrapplingHook::new();
        hook.attach(&config, Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0));

        // First call takes up the slack at the current distance
        let mut position = Vec3::ZERO;
        let mut velocity = Vec3::ZERO;
        hook.constrain(&mut position, &mut velocity);
        assert_eq!(position, Vec3::ZERO);

        // Falling away is pulled back onto the rope and keeps only its swing
        let mut position = Vec3::new(0.0, -2.0, 0.0);
        let mut velocity = Vec3::new(0.5, -1.0, 0.0);
        hook.constrain(&mut position, &mut velocity);
        assert!(position.length() < 1e-5);
        assert!((velocity - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-5);

        // Climbing closer shortens it for good
        let mut position = Vec3::new(0.0, 5.0, 0.0);
        hook.constrain(&mut position, &mut velocity);
        let mut position = Vec3::new(0.0, 3.0, 0.0);
        hook.constrain(&mut position, &mut velocity);
        assert!((position.y - 5.0).abs() < 1e-5);

        // Inactive hooks leave the agent alone
        hook.expire();
        let mut position = Vec3::new(0.0, -50.0, 0.0);
        hook.constrain(&mut position, &mut velocity);
        assert_eq!(position, Vec3::new(0.0, -50.0, 0.0));
    }

    #[test]
    fn test_inactive_force_is_zero() {
        let hook = GrapplingHook::new();
        assert_eq!(
            hook.force(&GrappleConfig::default(), Vec3::ONE, Vec3::ONE),
            Vec3::ZERO
        );
    }
}
