//! Game simulation - the per-frame driver.
//!
//! One rendered frame runs the player controller in fixed sub-steps, then a
//! single creature tick that tracks where the player ended up.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use skitter_creature::{GoalBuffer, IkGoal, LocomotionConfig, LocomotionController, RigError};
use skitter_physics::{CharacterController, CharacterState, ConfigError, MovementConfig};
use thiserror::Error;

use crate::arena::{Arena, SpawnKind};
use crate::camera::{CameraConfig, CameraRig};
use crate::input::{InputTracker, RawInput};

/// Errors raised while setting up a simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid creature rig: {0}")]
    Rig(#[from] RigError),

    #[error("arena has no {0:?} spawn point")]
    MissingSpawn(SpawnKind),
}

/// Game simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Player physics sub-steps per frame.
    pub substeps: u32,

    /// Simulated time per rendered frame, in frames.
    pub frame_dt: f32,

    pub movement: MovementConfig,

    pub locomotion: LocomotionConfig,

    pub camera: CameraConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            substeps: 10,
            frame_dt: 1.0,
            movement: MovementConfig::default(),
            locomotion: LocomotionConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.substeps == 0 {
            return Err(ConfigError::ZeroSubsteps);
        }
        ConfigError::positive("frame_dt", self.frame_dt)?;
        self.movement.validate()?;
        self.locomotion.validate()?;
        self.camera.validate()
    }

    /// Length of one player sub-step.
    pub fn substep_dt(&self) -> f32 {
        self.frame_dt / self.substeps.max(1) as f32
    }
}

/// The chase: one player, one creature, one arena.
#[derive(Debug)]
pub struct Simulation {
    /// Frames run so far.
    pub frame: u64,

    config: SimulationConfig,
    arena: Arena,
    controller: CharacterController,
    player: CharacterState,
    creature: LocomotionController,
    solver: GoalBuffer,
    camera: CameraRig,
    input: InputTracker,
}

impl Simulation {
    /// Create a simulation and place both actors at their spawn points.
    pub fn new(config: SimulationConfig, arena: Arena) -> Result<Self, SimulationError> {
        config.validate()?;

        let player_spawn = arena
            .spawn(SpawnKind::Player)
            .ok_or(SimulationError::MissingSpawn(SpawnKind::Player))?
            .clone();
        let creature_spawn = arena
            .spawn(SpawnKind::Creature)
            .ok_or(SimulationError::MissingSpawn(SpawnKind::Creature))?;

        let rig = creature_spawn.creature_rig()?;
        let creature = LocomotionController::new(config.locomotion.clone(), rig);

        let controller = CharacterController::new(config.movement.clone());
        let mut player = CharacterState::default();
        controller.spawn_at(&mut player, player_spawn.position, &arena.collision);
        player.yaw = player_spawn.facing;

        // Camera yaw 0 looks along -Z while body yaw 0 faces +Z
        let mut camera = CameraRig::new(config.camera.clone());
        camera.yaw = player_spawn.facing + std::f32::consts::PI;
        camera.follow(player.position);

        log::info!(
            "Simulation ready in {} with {} collidables",
            arena.name,
            arena.collision.len()
        );

        Ok(Self {
            frame: 0,
            config,
            arena,
            controller,
            player,
            creature,
            solver: GoalBuffer::new(),
            camera,
            input: InputTracker::new(),
        })
    }

    /// Create a simulation with default configuration and the test arena.
    pub fn test() -> Result<Self, SimulationError> {
        Self::new(SimulationConfig::default(), Arena::test_arena())
    }

    /// Advance one rendered frame.
    pub fn frame(&mut self, raw: &RawInput) {
        self.camera.apply_mouse(raw.mouse_delta);

        let edges = self.input.update(raw);
        if edges.toggle_fly {
            let enabled = !self.player.flags.flying();
            self.controller.set_fly_mode(&mut self.player, enabled);
        }
        if edges.grapple {
            self.controller.shoot_grapple(
                &mut self.player,
                self.camera.rotation(),
                &self.arena.collision,
            );
        }

        let snapshot = raw.to_snapshot(self.camera.rotation());
        self.controller.step_frame(
            &mut self.player,
            &snapshot,
            &self.arena.collision,
            self.config.frame_dt,
            self.config.substeps,
        );

        self.creature
            .tick(Some(self.player.position), &self.arena.collision, &mut self.solver);

        self.camera.follow(self.player.position);
        self.frame += 1;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn player(&self) -> &CharacterState {
        &self.player
    }

    pub fn creature(&self) -> &LocomotionController {
        &self.creature
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    /// Foot goals handed to the IK solver on the last frame.
    pub fn ik_goals(&self) -> &[IkGoal] {
        self.solver.goals()
    }

    /// Straight-line distance from the player to the creature's root.
    pub fn distance_to_creature(&self) -> f32 {
        self.player.position.distance(self.creature.root_position())
    }

    pub fn player_position(&self) -> Vec3 {
        self.player.position
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use skitter_creature::LegSlot;

    #[test]
    fn test_simulation_creation() {
        let sim = Simulation::test().unwrap();
        assert_eq!(sim.frame, 0);

        // Player dropped onto the floor under its spawn point
        let player = sim.player();
        assert!((player.position - Vec3::new(-20.0, 1.0, 0.0)).length() < 1e-4);
        assert!(player.flags.on_floor());
        assert!(sim.distance_to_creature() > 30.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulationConfig {
            substeps: 0,
            ..Default::default()
        };
        assert!(matches!(
            Simulation::new(config, Arena::test_arena()),
            Err(SimulationError::Config(ConfigError::ZeroSubsteps))
        ));

        assert!(matches!(
            Simulation::new(SimulationConfig::default(), Arena::new("Empty")),
            Err(SimulationError::MissingSpawn(SpawnKind::Player))
        ));
    }

    #[test]
    fn test_frame_advances() {
        let mut sim = Simulation::test().unwrap();

        sim.frame(&RawInput::default());
        assert_eq!(sim.frame, 1);
        assert_eq!(sim.ik_goals().len(), LegSlot::COUNT);

        sim.frame(&RawInput::default());
        assert_eq!(sim.frame, 2);
    }

    #[test]
    fn test_idle_player_stays_on_floor() {
        let mut sim = Simulation::test().unwrap();
        let start = sim.player_position();

        for _ in 0..60 {
            sim.frame(&RawInput::default());
        }

        let end = sim.player_position();
        assert!((end - start).length() < 0.05, "drifted to {end:?}");
    }

    #[test]
    fn test_movement_input() {
        let mut sim = Simulation::test().unwrap();
        let start = sim.player_position();

        let input = RawInput {
            forward: true,
            ..Default::default()
        };
        for _ in 0..60 {
            sim.frame(&input);
        }

        // Camera faces +X at spawn, so forward heads toward the creature
        let end = sim.player_position();
        assert!(end.x - start.x > 1.0, "moved to {end:?}");
        assert!(end.y > 0.5);
    }

    #[test]
    fn test_creature_closes_distance() {
        let mut sim = Simulation::test().unwrap();
        let start = sim.distance_to_creature();

        for _ in 0..100 {
            sim.frame(&RawInput::default());
        }

        assert!(sim.distance_to_creature() < start - 2.0);
        assert!(!sim.creature().is_falling());
    }

    #[test]
    fn test_fly_toggle_fires_once_per_press() {
        let mut sim = Simulation::test().unwrap();
        let held = RawInput {
            toggle_fly: true,
            ..Default::default()
        };

        sim.frame(&held);
        sim.frame(&held);
        sim.frame(&held);
        assert!(sim.player().flags.flying());

        sim.frame(&RawInput::default());
        sim.frame(&held);
        assert!(!sim.player().flags.flying());
    }

    #[test]
    fn test_grapple_attaches_to_beam() {
        let mut sim = Simulation::test().unwrap();

        // Look straight up at the beam and fire
        let input = RawInput {
            grapple: true,
            mouse_delta: (0.0, -10_000.0),
            ..Default::default()
        };
        sim.frame(&input);

        let hook = &sim.player().hook;
        assert!(hook.is_active());
        let anchor = hook.anchor().unwrap();
        assert!((anchor.y - 19.5).abs() < 1e-3);

        // Reeled upward over the following frames
        let start_y = sim.player_position().y;
        for _ in 0..5 {
            sim.frame(&RawInput::default());
        }
        assert!(sim.player_position().y > start_y);
    }

    #[test]
    fn test_camera_follows_player() {
        let mut sim = Simulation::test().unwrap();
        sim.frame(&RawInput::default());

        let camera = sim.camera();
        let offset = camera.position - sim.player_position();
        assert!((offset.length() - (5.0f32 * 5.0 + 2.0 * 2.0).sqrt()).abs() < 1e-3);
        assert!(offset.y > 1.9);
    }

    #[test]
    fn test_determinism() {
        let inputs: Vec<_> = (0..100)
            .map(|i| RawInput {
                forward: i % 2 == 0,
                right: i % 3 == 0,
                jump: i % 10 == 0,
                mouse_delta: ((i % 7) as f32, 0.0),
                ..Default::default()
            })
            .collect();

        let mut sim1 = Simulation::test().unwrap();
        let mut sim2 = Simulation::test().unwrap();
        for input in &inputs {
            sim1.frame(input);
            sim2.frame(input);
        }

        assert_eq!(sim1.player_position(), sim2.player_position());
        assert_eq!(sim1.creature().root_position(), sim2.creature().root_position());
        assert_eq!(sim1.ik_goals(), sim2.ik_goals());
    }
}
