//! Arena geometry and spawn points.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use skitter_creature::{CreatureRig, LegSlot, RigError, Side};
use skitter_physics::CollisionWorld;

/// Height of the creature's root above its feet in the bind pose.
const CREATURE_STANCE_HEIGHT: f32 = 1.0;

/// A static arena containing collision geometry and spawn points.
#[derive(Debug)]
pub struct Arena {
    /// Display name.
    pub name: String,

    /// Collision world shared by the player and the creature.
    pub collision: CollisionWorld,

    pub spawn_points: Vec<SpawnPoint>,
}

/// Where an actor enters the arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// Position in world space.
    pub position: Vec3,

    /// Initial facing direction (yaw in radians, 0 faces +Z).
    pub facing: f32,

    pub kind: SpawnKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnKind {
    Player,
    Creature,
}

impl SpawnPoint {
    /// Creature bind pose standing at this spawn point.
    ///
    /// The root sits at the spawn position with two rows of four feet one
    /// stance height below it.
    pub fn creature_rig(&self) -> Result<CreatureRig, RigError> {
        let rotation = Quat::from_rotation_y(self.facing);
        let feet: Vec<_> = LegSlot::all()
            .map(|slot| {
                let x = match slot.side {
                    Side::Left => 1.2,
                    Side::Right => -1.2,
                };
                let z = 1.5 - slot.index as f32;
                let offset = Vec3::new(x, -CREATURE_STANCE_HEIGHT, z);
                (slot, self.position + rotation * offset)
            })
            .collect();

        CreatureRig::from_bind_pose(self.position, rotation, Vec3::ONE, &feet)
    }
}

impl Arena {
    /// Create an empty arena.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            collision: CollisionWorld::new(),
            spawn_points: Vec::new(),
        }
    }

    /// Floor, a ring of buildings and a high beam to swing from.
    pub fn test_arena() -> Self {
        let mut arena = Self::new("Test Arena");
        let collision = &mut arena.collision;

        // Floor
        collision.add_box(Vec3::new(0.0, -0.5, 0.0), Vec3::new(60.0, 0.5, 60.0));

        // Buildings
        let ring_radius = 35.0;
        for i in 0..8 {
            let angle = i as f32 * std::f32::consts::FRAC_PI_4;
            let height = 6.0 + (i % 3) as f32 * 3.0;
            let center = Vec3::new(
                ring_radius * angle.cos(),
                height / 2.0,
                ring_radius * angle.sin(),
            );
            collision.add_oriented_box(
                center,
                Vec3::new(4.0, height / 2.0, 4.0),
                Quat::from_rotation_y(angle),
            );
        }

        // Beam across the middle, high enough to grapple from
        collision.add_box(Vec3::new(0.0, 20.0, 0.0), Vec3::new(30.0, 0.5, 1.0));

        // Low ledge the creature can climb
        collision.add_box(Vec3::new(0.0, 1.0, -15.0), Vec3::new(5.0, 1.0, 3.0));

        arena.spawn_points.push(SpawnPoint {
            position: Vec3::new(-20.0, 3.0, 0.0),
            facing: std::f32::consts::FRAC_PI_2,
            kind: SpawnKind::Player,
        });
        arena.spawn_points.push(SpawnPoint {
            position: Vec3::new(20.0, CREATURE_STANCE_HEIGHT, 0.0),
            facing: -std::f32::consts::FRAC_PI_2,
            kind: SpawnKind::Creature,
        });

        arena
    }

    /// First spawn point of the given kind.
    pub fn spawn(&self, kind: SpawnKind) -> Option<&SpawnPoint> {
        self.spawn_points.iter().find(|s| s.kind == kind)
    }

    pub fn spawn_count(&self, kind: SpawnKind) -> usize {
        self.spawn_points.iter().filter(|s| s.kind == kind).count()
    }
}
