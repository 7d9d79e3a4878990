//! Seam to the external inverse-kinematics solver.
//!
//! The locomotion controller only ever hands the solver a complete set of
//! foot goals, once per tick. Bone chains, joint limits and convergence are
//! the solver's business.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::leg::LegSlot;

/// Desired world-space position of one foot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IkGoal {
    pub slot: LegSlot,
    pub position: Vec3,
}

/// Converges leg end-effectors toward their goals.
///
/// Unreachable goals are not an error: the solver gets as close as its joint
/// limits allow.
pub trait IkSolver {
    fn solve(&mut self, goals: &[IkGoal]);
}

impl<F> IkSolver for F
where
    F: FnMut(&[IkGoal]),
{
    fn solve(&mut self, goals: &[IkGoal]) {
        self(goals)
    }
}

/// Solver stand-in that keeps the latest goals for a renderer to read.
#[derive(Debug, Clone, Default)]
pub struct GoalBuffer {
    goals: Vec<IkGoal>,
    solves: u64,
}

impl GoalBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn goals(&self) -> &[IkGoal] {
        &self.goals
    }

    pub fn goal(&self, slot: LegSlot) -> Option<Vec3> {
        self.goals
            .iter()
            .find(|goal| goal.slot == slot)
            .map(|goal| goal.position)
    }

    /// Number of solve calls so far.
    pub fn solves(&self) -> u64 {
        self.solves
    }
}

impl IkSolver for GoalBuffer {
    fn solve(&mut self, goals: &[IkGoal]) {
        self.goals.clear();
        self.goals.extend_from_slice(goals);
        self.solves += 1;
    }
}
