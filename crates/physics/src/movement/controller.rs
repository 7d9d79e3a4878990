//! Player character controller.
//!
//! This is the main entry point for player movement. It accumulates forces
//! from input, gravity, collision penalties and the grappling hook, then
//! integrates them with semi-implicit Euler.

use glam::{Quat, Vec3};

use crate::collision::{resolve_contact, Aabb, CollisionWorld, Severity};

use super::config::MovementConfig;
use super::deform::deform;
use super::state::{CharacterFlags, CharacterState, InputSnapshot};

/// How far below a spawn point to look for a floor.
const SPAWN_TRACE_DISTANCE: f32 = 1000.0;

/// Player character controller.
///
/// # Example
///
/// ```ignore
/// let controller = CharacterController::new(MovementConfig::default());
/// let mut state = CharacterState::default();
/// controller.spawn_at(&mut state, spawn_position, &world);
///
/// // Each rendered frame:
/// controller.step_frame(&mut state, &input, &world, 1.0, 10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CharacterController {
    /// Movement configuration.
    pub config: MovementConfig,
}

impl CharacterController {
    /// Create a new controller with the given configuration.
    pub fn new(config: MovementConfig) -> Self {
        Self { config }
    }

    /// Place the agent on the first surface below `spawn_pos`.
    ///
    /// Resets all other state. With nothing below, the agent stays at
    /// `spawn_pos` and falls from there.
    pub fn spawn_at(&self, state: &mut CharacterState, spawn_pos: Vec3, world: &CollisionWorld) {
        *state = CharacterState::new(spawn_pos);

        if let Some(hit) = world.raycast(spawn_pos, Vec3::NEG_Y, SPAWN_TRACE_DISTANCE) {
            state.position = hit.point + Vec3::Y * self.config.half_extents.y;
            state.flags.set(CharacterFlags::GROUNDED, true);
            state.flags.set(CharacterFlags::FLOOR_CONTACT, true);
        }

        log::debug!(
            "Spawned at ({:.2}, {:.2}, {:.2})",
            state.position.x,
            state.position.y,
            state.position.z
        );
    }

    /// Enable or disable debug fly mode.
    pub fn set_fly_mode(&self, state: &mut CharacterState, enabled: bool) {
        if state.flags.flying() != enabled {
            log::debug!("Fly mode {}", if enabled { "on" } else { "off" });
        }
        state.flags.set(CharacterFlags::FLY_MODE, enabled);
        if enabled {
            state.flags.set(CharacterFlags::GROUNDED, false);
            state.flags.set(CharacterFlags::FLOOR_CONTACT, false);
        }
    }

    /// Fire the grappling hook along the camera's forward direction.
    pub fn shoot_grapple(
        &self,
        state: &mut CharacterState,
        camera: Quat,
        world: &CollisionWorld,
    ) -> bool {
        state
            .hook
            .shoot(&self.config.grapple, world, state.position, camera * Vec3::NEG_Z)
    }

    /// Advance one rendered frame of `frame_dt` in `substeps` equal sub-steps.
    pub fn step_frame(
        &self,
        state: &mut CharacterState,
        input: &InputSnapshot,
        world: &CollisionWorld,
        frame_dt: f32,
        substeps: u32,
    ) {
        let substeps = substeps.max(1);
        let dt = frame_dt / substeps as f32;
        for _ in 0..substeps {
            self.run(state, input, world, dt);
        }
    }

    /// Advance one physics sub-step of `dt` frames.
    ///
    /// Collision resolution always precedes deformation and integration.
    pub fn run(
        &self,
        state: &mut CharacterState,
        input: &InputSnapshot,
        world: &CollisionWorld,
        dt: f32,
    ) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }

        let config = &self.config;
        let flying = state.flags.flying();

        // Penalty forces and contact severity
        let collision_force = self.resolve_contacts(state, world);

        // Squash/stretch from the previous sub-step's acceleration
        state.scale = deform(state.scale, state.acceleration, state.yaw, &config.deform);

        if flying {
            state.flags.set(CharacterFlags::GROUNDED, false);
            state.flags.set(CharacterFlags::FLOOR_CONTACT, false);
        } else {
            self.check_ground(state, world);
            self.check_jump(state, input);
        }
        state.flags.set(CharacterFlags::JUMP_HELD, input.jump);

        // Input, gravity and grapple forces
        let move_dir = self.move_direction(input, flying);
        let mut acceleration = collision_force + move_dir * config.move_accel;

        // A confirmed floor carries the body's weight
        if !flying && !state.flags.on_floor() {
            acceleration.y -= config.gravity;
        }

        if state.hook.is_active() {
            acceleration += state
                .hook
                .force(&config.grapple, state.position, state.velocity);
            state.hook.refresh_rope(&config.grapple, state.position);
        }

        // Integrate
        state.acceleration = acceleration;
        state.velocity += acceleration * dt;
        if flying && input.jump {
            state.velocity.y = config.fly_speed;
        }
        clamp_horizontal_speed(&mut state.velocity, config.max_speed);
        state.position += state.velocity * dt;

        let drag = config.horizontal_drag.powf(dt);
        state.velocity.x *= drag;
        state.velocity.z *= drag;
        if flying {
            state.velocity.y *= drag;
        }

        state.hook.constrain(&mut state.position, &mut state.velocity);
        state.hook.update(&config.grapple, state.position, dt);

        // Face the direction of travel
        let heading = Vec3::new(move_dir.x, 0.0, move_dir.z);
        if heading.length_squared() > 1e-8 {
            state.yaw = heading.x.atan2(heading.z);
        }
    }

    // ========================================================================
    // Collision
    // ========================================================================

    /// Sum penalty forces over every collidable and record the worst contact.
    ///
    /// Each collidable freezes its own entry velocity when its bounds start
    /// overlapping the agent, and forgets it when they separate.
    fn resolve_contacts(&self, state: &mut CharacterState, world: &CollisionWorld) -> Vec3 {
        let bounds = Aabb::from_center_half_extents(state.position, self.config.half_extents);

        let mut force = Vec3::ZERO;
        let mut severity = Severity::None;
        let mut touching = false;

        for collidable in world.iter() {
            if !collidable.bounds().overlaps(&bounds) {
                state.entry_velocities.remove(&collidable.id);
                continue;
            }
            touching = true;

            let velocity = state.velocity;
            let entry = *state
                .entry_velocities
                .entry(collidable.id)
                .or_insert(velocity);

            let contact = resolve_contact(
                world,
                collidable.id,
                &bounds,
                state.position,
                entry,
                velocity,
                &self.config.contact,
            );
            severity = severity.max(contact.severity);
            force += contact.force;
        }

        if touching != state.flags.has(CharacterFlags::IN_CONTACT) {
            log::trace!("Contact {}", if touching { "began" } else { "ended" });
        }
        state.flags.set(CharacterFlags::IN_CONTACT, touching);
        state.severity = severity;

        force
    }

    // ========================================================================
    // Ground and Jump
    // ========================================================================

    /// Two-stage grounding: touching while barely moving down counts as
    /// resting, a floor under the feet additionally stops vertical motion.
    fn check_ground(&self, state: &mut CharacterState, world: &CollisionWorld) {
        let config = &self.config;
        let vy = state.velocity.y;
        let resting = state.severity >= Severity::Overlap && vy <= 0.0 && vy > -config.rest_speed;

        let on_floor = resting
            && config
                .ground
                .is_supported(world, state.feet(config.half_extents), Vec3::Y);
        if on_floor {
            state.velocity.y = 0.0;
        }

        if resting && !state.flags.grounded() {
            log::trace!("Grounded (floor: {})", on_floor);
        }
        state.flags.set(CharacterFlags::GROUNDED, resting);
        state.flags.set(CharacterFlags::FLOOR_CONTACT, on_floor);
    }

    /// Jump on the rising edge of the jump input while grounded.
    fn check_jump(&self, state: &mut CharacterState, input: &InputSnapshot) {
        let pressed = input.jump && !state.flags.has(CharacterFlags::JUMP_HELD);
        if !pressed || !state.flags.grounded() {
            return;
        }

        state.velocity.y = self.config.jump_velocity;
        state.flags.set(CharacterFlags::GROUNDED, false);
        state.flags.set(CharacterFlags::FLOOR_CONTACT, false);
        log::debug!("Jump at y={:.2}", state.position.y);
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Unit move direction in world space, or zero.
    ///
    /// Projected onto the horizontal plane unless flying.
    fn move_direction(&self, input: &InputSnapshot, flying: bool) -> Vec3 {
        if !input.has_movement_input() {
            return Vec3::ZERO;
        }

        // Opposing keys cancel to a zero direction
        let dir = input.camera * input.local_direction().normalize_or_zero();
        if flying {
            dir.normalize_or_zero()
        } else {
            Vec3::new(dir.x, 0.0, dir.z).normalize_or_zero()
        }
    }
}

/// Limit horizontal speed, leaving the vertical component untouched.
fn clamp_horizontal_speed(velocity: &mut Vec3, max_speed: f32) {
    let horizontal = Vec3::new(velocity.x, 0.0, velocity.z);
    let speed = horizontal.length();
    if speed > max_speed {
        let clamped = horizontal * (max_speed / speed);
        velocity.x = clamped.x;
        velocity.z = clamped.z;
    }
}

// ============================================================================
// Tests
// ============================================================================
