//! Creature locomotion controller.
//!
//! Each tick the creature turns toward the player, walks forward, re-plans
//! its eight footholds and hands the result to the IK solver.
//!
//! # Tick order
//!
//! 1. Steer yaw toward the player bearing and advance the root
//! 2. Per leg: rest pose to world, climb probe, gait step, ground probe
//! 3. Climbing pitch or falling recovery
//! 4. One IK solve with every goal

use glam::{Affine3A, Quat, Vec3};
use serde::{Deserialize, Serialize};
use skitter_physics::CollisionWorld;

use super::config::LocomotionConfig;
use super::ik::{IkGoal, IkSolver};
use super::leg::{LegSlot, LegTarget, LegTopology};
use super::rig::{body_rotation, CreatureRig};

/// Body orientation of the creature.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BodyPose {
    /// Heading in radians; 0 faces +Z.
    pub yaw: f32,

    /// Nose-up pitch in radians.
    pub pitch: f32,
}

/// Procedural leg placement for an eight-legged creature.
#[derive(Debug, Clone)]
pub struct LocomotionController {
    config: LocomotionConfig,
    topology: LegTopology,
    root_position: Vec3,
    scale: Vec3,
    pose: BodyPose,
    /// Indexed by [`LegSlot::ordinal`].
    legs: Vec<LegTarget>,
    climbing: bool,
    climb_timer: u32,
    target_pitch: f32,
    falling: bool,
    goals: Vec<IkGoal>,
}

impl LocomotionController {
    /// Create a controller with the arachnid neighbour table.
    pub fn new(config: LocomotionConfig, rig: CreatureRig) -> Self {
        Self::with_topology(config, LegTopology::arachnid(), rig)
    }

    pub fn with_topology(config: LocomotionConfig, topology: LegTopology, rig: CreatureRig) -> Self {
        Self {
            config,
            topology,
            root_position: rig.root_position,
            scale: rig.scale,
            pose: BodyPose {
                yaw: rig.yaw,
                pitch: rig.pitch,
            },
            legs: rig.legs,
            climbing: false,
            climb_timer: 0,
            target_pitch: 0.0,
            falling: false,
            goals: Vec::with_capacity(LegSlot::COUNT),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn topology(&self) -> &LegTopology {
        &self.topology
    }

    pub fn root_position(&self) -> Vec3 {
        self.root_position
    }

    pub fn root_rotation(&self) -> Quat {
        body_rotation(self.pose.yaw, self.pose.pitch)
    }

    pub fn body_pose(&self) -> BodyPose {
        self.pose
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn legs(&self) -> &[LegTarget] {
        &self.legs
    }

    pub fn leg(&self, slot: LegSlot) -> Option<&LegTarget> {
        slot.is_valid().then(|| &self.legs[slot.ordinal()])
    }

    /// Direct access to one foothold, for collaborators that nudge a foot.
    pub fn leg_mut(&mut self, slot: LegSlot) -> Option<&mut LegTarget> {
        if slot.is_valid() {
            Some(&mut self.legs[slot.ordinal()])
        } else {
            None
        }
    }

    pub fn is_climbing(&self) -> bool {
        self.climbing
    }

    pub fn is_falling(&self) -> bool {
        self.falling
    }

    /// Unit direction the body faces, including pitch.
    pub fn forward(&self) -> Vec3 {
        self.root_rotation() * Vec3::Z
    }

    /// Unit up direction of the body.
    pub fn up(&self) -> Vec3 {
        self.root_rotation() * Vec3::Y
    }

    /// Root transform used to place rest poses.
    pub fn root_transform(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.root_rotation(), self.root_position)
    }

    /// World-space rest pose of one leg under the current root transform.
    pub fn rest_world(&self, slot: LegSlot) -> Option<Vec3> {
        let leg = self.leg(slot)?;
        Some(self.root_transform().transform_point3(leg.rest_local()))
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advance one tick and run the solver once.
    ///
    /// Without a `player` the creature holds its heading and position but its
    /// legs still settle.
    pub fn tick<S>(&mut self, player: Option<Vec3>, world: &CollisionWorld, solver: &mut S)
    where
        S: IkSolver + ?Sized,
    {
        if let Some(target) = player {
            self.steer_toward(target);
            self.root_position += self.forward() * self.config.move_speed * self.scale;
        }

        let (climb_detected, any_grounded) = self.update_legs(world);

        if climb_detected {
            if !self.climbing {
                self.target_pitch = self.pitch_from_legs();
                log::debug!(
                    "Creature started climbing, target pitch {:.3}",
                    self.target_pitch
                );
            }
            self.climbing = true;
            self.climb_timer = self.config.climb_cooldown;
        }

        if self.climbing {
            self.pose.pitch = approach(self.pose.pitch, self.target_pitch, self.config.pitch_rate);
            self.climb_timer = self.climb_timer.saturating_sub(1);
            if self.climb_timer == 0 {
                self.climbing = false;
                log::debug!("Creature stopped climbing");
            }
        }

        let falling = !self.climbing && !any_grounded;
        if falling && !self.falling {
            log::debug!("Creature lost footing at y={:.2}", self.root_position.y);
        }
        self.falling = falling;
        if falling {
            if self.root_position.y > self.config.min_height {
                self.root_position.y =
                    (self.root_position.y - self.config.fall_step).max(self.config.min_height);
            }
            self.pose.pitch = approach(self.pose.pitch, 0.0, self.config.pitch_relax);
        }

        self.goals.clear();
        self.goals.extend(self.legs.iter().map(|leg| IkGoal {
            slot: leg.slot(),
            position: leg.position,
        }));
        solver.solve(&self.goals);
    }

    /// Rate-limited turn toward the horizontal bearing of `target`.
    fn steer_toward(&mut self, target: Vec3) {
        let dx = target.x - self.root_position.x;
        let dz = target.z - self.root_position.z;
        if dx.abs() <= f32::EPSILON && dz.abs() <= f32::EPSILON {
            return;
        }

        let bearing = dx.atan2(dz);
        let delta = wrap_angle(bearing - self.pose.yaw);
        self.pose.yaw = if delta.abs() <= self.config.turn_speed {
            bearing
        } else {
            wrap_angle(self.pose.yaw + self.config.turn_speed.copysign(delta))
        };
    }

    /// Re-plan every leg. Returns whether a climbable surface was found and
    /// whether any foot has support.
    fn update_legs(&mut self, world: &CollisionWorld) -> (bool, bool) {
        let transform = self.root_transform();
        let forward = self.forward();
        let up = self.up();
        let config = &self.config;

        let climb_dir = (forward + up * config.climb_tilt).normalize_or_zero();
        let climb_reach = config.climb_reach * self.scale.abs().max_element();
        let lift = up * config.lift_height;

        let mut climb_detected = false;
        let mut any_grounded = false;

        for i in 0..self.legs.len() {
            let rest = transform.transform_point3(self.legs[i].rest_local());

            // Probe from the same height as the ground query so a flat floor
            // under the foot does not count as a wall. A probe that starts
            // inside geometry (a pitched body's back feet) sees nothing ahead.
            let mut live_rest = rest;
            let probe_origin = rest + up * config.ground.offset;
            if let Some(hit) = world
                .raycast(probe_origin, climb_dir, climb_reach)
                .filter(|hit| hit.distance > f32::EPSILON)
            {
                live_rest = hit.point;
                climb_detected = true;
            }

            let slot = self.legs[i].slot();
            if !self.legs[i].is_returning()
                && self.legs[i].position.distance(live_rest) > config.return_threshold
                && !self.neighbour_returning(slot)
            {
                self.legs[i].begin_return(lift);
                log::trace!("{slot} lifted");
            }

            if self.legs[i].is_returning() {
                self.legs[i].step_toward(live_rest, config.step_speed);
                if !self.legs[i].is_returning() {
                    log::trace!("{slot} planted");
                }
            }

            let grounded = config.ground.is_supported(world, self.legs[i].position, up);
            self.legs[i].set_grounded(grounded);
            any_grounded |= grounded;
        }

        (climb_detected, any_grounded)
    }

    fn neighbour_returning(&self, slot: LegSlot) -> bool {
        self.topology
            .neighbours(slot)
            .any(|other| self.legs[other.ordinal()].is_returning())
    }

    /// Target pitch from how much higher the front feet are than the back
    /// feet, measured along the body's up axis.
    fn pitch_from_legs(&self) -> f32 {
        let up = self.up();
        let (mut front, mut front_n, mut back, mut back_n) = (0.0, 0, 0.0, 0);
        for leg in &self.legs {
            let height = (leg.position - self.root_position).dot(up);
            if leg.slot().is_front() {
                front += height;
                front_n += 1;
            } else {
                back += height;
                back_n += 1;
            }
        }
        if front_n == 0 || back_n == 0 {
            return self.pose.pitch;
        }

        let asymmetry = front / front_n as f32 - back / back_n as f32;
        (self.pose.pitch + self.config.pitch_sensitivity * asymmetry)
            .clamp(-self.config.max_pitch, self.config.max_pitch)
    }
}

/// Wrap an angle into `[-PI, PI]`.
fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped < -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Move `current` toward `target` by at most `max_step`.
fn approach(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_step {
        target
    } else {
        current + max_step.copysign(delta)
    }
}

// ============================================================================
// Tests
// ============================================================================
