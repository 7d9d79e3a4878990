//! Bind-pose capture for the creature.

use glam::{Affine3A, EulerRot, Quat, Vec3};
use thiserror::Error;

use super::leg::{LegSlot, LegTarget};

/// Errors raised while setting up a creature.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RigError {
    #[error("no foot supplied for the {0}")]
    MissingSlot(LegSlot),

    #[error("foot supplied twice for the {0}")]
    DuplicateSlot(LegSlot),

    #[error("{0} is outside the leg range")]
    InvalidSlot(LegSlot),

    #[error("{0} cannot neighbour itself")]
    SelfNeighbour(LegSlot),

    #[error("root scale must be finite and non-zero on every axis, got {0}")]
    DegenerateScale(Vec3),
}

/// Root transform and leg rest poses captured from the bind pose.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatureRig {
    pub(crate) root_position: Vec3,
    pub(crate) yaw: f32,
    pub(crate) pitch: f32,
    pub(crate) scale: Vec3,
    /// Indexed by [`LegSlot::ordinal`].
    pub(crate) legs: Vec<LegTarget>,
}

impl CreatureRig {
    /// Capture rest poses from world-space foot positions in the bind pose.
    ///
    /// Only the yaw and pitch of `root_rotation` are kept; roll is dropped
    /// before the feet are expressed in the root frame. Every slot must be
    /// supplied exactly once.
    pub fn from_bind_pose(
        root_position: Vec3,
        root_rotation: Quat,
        scale: Vec3,
        feet: &[(LegSlot, Vec3)],
    ) -> Result<Self, RigError> {
        if !scale.is_finite() || scale.abs().min_element() <= f32::EPSILON {
            return Err(RigError::DegenerateScale(scale));
        }

        let (yaw, neg_pitch, _roll) = root_rotation.normalize().to_euler(EulerRot::YXZ);
        let pitch = -neg_pitch;

        let root = Affine3A::from_scale_rotation_translation(
            scale,
            body_rotation(yaw, pitch),
            root_position,
        );
        let to_local = root.inverse();

        let mut slots: [Option<Vec3>; LegSlot::COUNT] = [None; LegSlot::COUNT];
        for &(slot, foot) in feet {
            if !slot.is_valid() {
                return Err(RigError::InvalidSlot(slot));
            }
            let entry = &mut slots[slot.ordinal()];
            if entry.is_some() {
                return Err(RigError::DuplicateSlot(slot));
            }
            *entry = Some(foot);
        }

        let legs = LegSlot::all()
            .map(|slot| {
                let foot = slots[slot.ordinal()].ok_or(RigError::MissingSlot(slot))?;
                Ok(LegTarget::new(slot, foot, to_local.transform_point3(foot)))
            })
            .collect::<Result<Vec<_>, RigError>>()?;

        Ok(Self {
            root_position,
            yaw,
            pitch,
            scale,
            legs,
        })
    }

    pub fn root_position(&self) -> Vec3 {
        self.root_position
    }

    pub fn root_rotation(&self) -> Quat {
        body_rotation(self.yaw, self.pitch)
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn legs(&self) -> &[LegTarget] {
        &self.legs
    }
}

/// Root orientation for a heading and a nose-up pitch.
#[inline]
pub(crate) fn body_rotation(yaw: f32, pitch: f32) -> Quat {
    Quat::from_rotation_y(yaw) * Quat::from_rotation_x(-pitch)
}
