//! Repair state machine
//!
//! The hero rebuilds a brick by standing in a grid cell and tapping the repair
//! key. Progress belongs to one cell: moving to another cell (or off the grid)
//! throws it away.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::GridCell;

/// Where the repair machine currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairPhase {
    /// Hero is off the grid (or dead)
    Idle,
    /// Hero is over a cell; presses accumulate
    Targeting(GridCell),
}

/// Result of one repair key press
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RepairStep {
    /// No target cell, press ignored
    Idle,
    /// Progress advanced but the brick isn't finished
    Progress { cell: GridCell, progress: f32 },
    /// Progress crossed 1.0; a brick should be built in `cell`
    Completed(GridCell),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepairState {
    /// Cell being worked on
    pub target: Option<GridCell>,
    /// 0.0 - 1.0
    pub progress: f32,
    /// Freshly built brick the hero may overlap until they walk away
    pub just_repaired: Option<u32>,
}

impl RepairState {
    pub fn phase(&self) -> RepairPhase {
        match self.target {
            Some(cell) => RepairPhase::Targeting(cell),
            None => RepairPhase::Idle,
        }
    }

    /// Drop the target and any progress
    pub fn reset(&mut self) {
        self.target = None;
        self.progress = 0.0;
    }

    /// Follow the hero's current cell. Returns true if the target changed.
    pub fn track(&mut self, cell: Option<GridCell>) -> bool {
        if cell == self.target {
            return false;
        }
        match cell {
            Some(cell) => {
                self.target = Some(cell);
                self.progress = 0.0;
            }
            None => self.reset(),
        }
        true
    }

    /// Register one press of the repair key
    pub fn press(&mut self, increment: f32) -> RepairStep {
        let Some(cell) = self.target else {
            return RepairStep::Idle;
        };
        self.progress += increment;
        if self.progress >= 1.0 {
            self.progress = 0.0;
            RepairStep::Completed(cell)
        } else {
            RepairStep::Progress {
                cell,
                progress: self.progress,
            }
        }
    }

    /// Clear the collision exemption once the hero is far enough from the brick
    pub fn release_if_clear(&mut self, hero_pos: Vec2, brick_pos: Vec2, threshold: Vec2) {
        let delta = (hero_pos - brick_pos).abs();
        if delta.x > threshold.x || delta.y > threshold.y {
            self.just_repaired = None;
        }
    }

    /// The brick `id` left play; don't keep pointing at it
    pub fn forget_brick(&mut self, id: u32) {
        if self.just_repaired == Some(id) {
            self.just_repaired = None;
        }
    }
}
