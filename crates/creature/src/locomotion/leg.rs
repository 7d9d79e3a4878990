//! Leg identity, neighbour topology and per-leg gait state.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::rig::RigError;

/// Which side of the body a leg is on, seen from behind the creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Explicit skeletal slot of one leg.
///
/// Assigned by whoever loads the creature asset; index 0 is the front pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LegSlot {
    pub side: Side,
    pub index: u8,
}

impl LegSlot {
    /// Legs on each side.
    pub const PER_SIDE: u8 = 4;

    /// Legs in total.
    pub const COUNT: usize = 2 * Self::PER_SIDE as usize;

    pub const fn new(side: Side, index: u8) -> Self {
        Self { side, index }
    }

    pub const fn left(index: u8) -> Self {
        Self::new(Side::Left, index)
    }

    pub const fn right(index: u8) -> Self {
        Self::new(Side::Right, index)
    }

    /// Every slot, left side front to back, then right side front to back.
    pub fn all() -> impl Iterator<Item = LegSlot> {
        [Side::Left, Side::Right]
            .into_iter()
            .flat_map(|side| (0..Self::PER_SIDE).map(move |index| Self::new(side, index)))
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.index < Self::PER_SIDE
    }

    /// Position in [`LegSlot::all`] order.
    #[inline]
    pub fn ordinal(self) -> usize {
        let base = match self.side {
            Side::Left => 0,
            Side::Right => Self::PER_SIDE as usize,
        };
        base + self.index as usize
    }

    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        let per_side = Self::PER_SIDE as usize;
        match ordinal {
            o if o < per_side => Some(Self::left(o as u8)),
            o if o < Self::COUNT => Some(Self::right((o - per_side) as u8)),
            _ => None,
        }
    }

    /// The same leg on the other side.
    #[inline]
    pub fn mirrored(self) -> Self {
        Self::new(self.side.opposite(), self.index)
    }

    /// Whether the leg belongs to the front half of the body.
    #[inline]
    pub fn is_front(self) -> bool {
        self.index < Self::PER_SIDE / 2
    }
}

impl fmt::Display for LegSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.side {
            Side::Left => "left",
            Side::Right => "right",
        };
        write!(f, "{side} leg {}", self.index)
    }
}

/// Which legs count as neighbours for the gait's mutual exclusion.
///
/// Symmetric: if `a` neighbours `b`, `b` neighbours `a`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegTopology {
    /// Bit `j` of entry `i` is set when ordinals `i` and `j` are neighbours.
    neighbours: [u8; LegSlot::COUNT],
}

impl LegTopology {
    /// No leg has neighbours; every leg may step at any time.
    pub fn empty() -> Self {
        Self {
            neighbours: [0; LegSlot::COUNT],
        }
    }

    /// Same-side legs one index apart, plus each leg and its mirror.
    pub fn arachnid() -> Self {
        let mut topology = Self::empty();
        for side in [Side::Left, Side::Right] {
            for index in 0..LegSlot::PER_SIDE {
                let slot = LegSlot::new(side, index);
                if index + 1 < LegSlot::PER_SIDE {
                    topology.link(slot, LegSlot::new(side, index + 1));
                }
                topology.link(slot, slot.mirrored());
            }
        }
        topology
    }

    /// Build a topology from explicit neighbour pairs.
    pub fn from_pairs(pairs: &[(LegSlot, LegSlot)]) -> Result<Self, RigError> {
        let mut topology = Self::empty();
        for &(a, b) in pairs {
            for slot in [a, b] {
                if !slot.is_valid() {
                    return Err(RigError::InvalidSlot(slot));
                }
            }
            if a == b {
                return Err(RigError::SelfNeighbour(a));
            }
            topology.link(a, b);
        }
        Ok(topology)
    }

    #[inline]
    pub fn are_neighbours(&self, a: LegSlot, b: LegSlot) -> bool {
        a.is_valid() && b.is_valid() && self.neighbours[a.ordinal()] & (1 << b.ordinal()) != 0
    }

    /// Neighbours of `slot` in ordinal order.
    pub fn neighbours(&self, slot: LegSlot) -> impl Iterator<Item = LegSlot> + '_ {
        LegSlot::all().filter(move |&other| self.are_neighbours(slot, other))
    }

    fn link(&mut self, a: LegSlot, b: LegSlot) {
        self.neighbours[a.ordinal()] |= 1 << b.ordinal();
        self.neighbours[b.ordinal()] |= 1 << a.ordinal();
    }
}

impl Default for LegTopology {
    fn default() -> Self {
        Self::arachnid()
    }
}

/// IK goal and gait state of one leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegTarget {
    slot: LegSlot,

    /// World-space IK goal for the foot.
    pub position: Vec3,

    returning: bool,
    grounded: bool,

    /// Foothold in the creature root's local frame, fixed at setup.
    rest_local: Vec3,
}

impl LegTarget {
    pub(crate) fn new(slot: LegSlot, position: Vec3, rest_local: Vec3) -> Self {
        Self {
            slot,
            position,
            returning: false,
            grounded: false,
            rest_local,
        }
    }

    #[inline]
    pub fn slot(&self) -> LegSlot {
        self.slot
    }

    /// Mid-step toward a new foothold.
    #[inline]
    pub fn is_returning(&self) -> bool {
        self.returning
    }

    /// Support found under the foot on the last tick.
    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    #[inline]
    pub fn rest_local(&self) -> Vec3 {
        self.rest_local
    }

    pub(crate) fn begin_return(&mut self, lift: Vec3) {
        self.position += lift;
        self.returning = true;
    }

    /// Move toward `goal` by at most `step`, snapping on when within reach.
    pub(crate) fn step_toward(&mut self, goal: Vec3, step: f32) {
        let to_goal = goal - self.position;
        let distance = to_goal.length();
        if distance <= step {
            self.position = goal;
            self.returning = false;
        } else {
            self.position += to_goal * (step / distance);
        }
    }

    pub(crate) fn set_grounded(&mut self, grounded: bool) {
        self.grounded = grounded;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_ordinals() {
        let slots: Vec<_> = LegSlot::all().collect();
        assert_eq!(slots.len(), LegSlot::COUNT);
        for (i, slot) in slots.iter().enumerate() {
            assert_eq!(slot.ordinal(), i);
            assert_eq!(LegSlot::from_ordinal(i), Some(*slot));
        }
        assert_eq!(LegSlot::from_ordinal(LegSlot::COUNT), None);
        assert_eq!(LegSlot::left(2).mirrored(), LegSlot::right(2));
        assert!(LegSlot::right(1).is_front());
        assert!(!LegSlot::right(2).is_front());
        assert_eq!(LegSlot::right(3).to_string(), "right leg 3");
    }

    #[test]
    fn test_arachnid_topology() {
        let topology = LegTopology::arachnid();

        assert!(topology.are_neighbours(LegSlot::left(0), LegSlot::left(1)));
        assert!(topology.are_neighbours(LegSlot::left(1), LegSlot::left(0)));
        assert!(topology.are_neighbours(LegSlot::left(2), LegSlot::right(2)));

        // No wrap from the back leg to the front leg
        assert!(!topology.are_neighbours(LegSlot::left(3), LegSlot::left(0)));
        // Diagonals are free
        assert!(!topology.are_neighbours(LegSlot::left(0), LegSlot::right(1)));
        assert!(!topology.are_neighbours(LegSlot::left(0), LegSlot::left(0)));

        let middle: Vec<_> = topology.neighbours(LegSlot::right(1)).collect();
        assert_eq!(
            middle,
            vec![LegSlot::left(1), LegSlot::right(0), LegSlot::right(2)]
        );
        assert_eq!(topology.neighbours(LegSlot::left(3)).count(), 2);
    }

    #[test]
    fn test_topology_from_pairs() {
        let topology =
            LegTopology::from_pairs(&[(LegSlot::left(0), LegSlot::right(3))]).unwrap();
        assert!(topology.are_neighbours(LegSlot::right(3), LegSlot::left(0)));
        assert_eq!(topology.neighbours(LegSlot::left(1)).count(), 0);

        assert_eq!(
            LegTopology::from_pairs(&[(LegSlot::left(0), LegSlot::left(4))]),
            Err(RigError::InvalidSlot(LegSlot::left(4)))
        );
        assert_eq!(
            LegTopology::from_pairs(&[(LegSlot::left(1), LegSlot::left(1))]),
            Err(RigError::SelfNeighbour(LegSlot::left(1)))
        );
    }

    #[test]
    fn test_step_toward_snaps() {
        let mut leg = LegTarget::new(LegSlot::left(0), Vec3::ZERO, Vec3::ZERO);
        leg.begin_return(Vec3::new(0.0, 0.5, 0.0));
        assert!(leg.is_returning());

        let goal = Vec3::new(1.0, 0.0, 0.0);
        leg.step_toward(goal, 0.4);
        assert!(leg.is_returning());
        leg.step_toward(goal, 0.4);
        leg.step_toward(goal, 0.4);
        leg.step_toward(goal, 0.4);
        assert_eq!(leg.position, goal);
        assert!(!leg.is_returning());
    }
}
