//! Physical display assignment for display targets
//!
//! Assignment is first-claim: the display taken by target 1 is not offered to
//! targets 2 to 4, the one taken by target 2 is not offered to 3 and 4, and
//! so on. Secondary targets form a chain; a target can only be assigned when
//! the one before it is.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::target::{TargetId, MAX_DISPLAY_TARGETS};

/// Errors from display assignment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignmentError {
    #[error("{0} cannot be assigned a physical display")]
    NotAssignable(TargetId),
    #[error("{target} is unavailable: {display_count} display(s) connected")]
    Unavailable { target: TargetId, display_count: usize },
    #[error("{0} requires the preceding display target to be assigned")]
    ChainBroken(TargetId),
    #[error("Display {display} is not offered to {target}")]
    NotCandidate { target: TargetId, display: usize },
    #[error("The primary display target cannot be unassigned")]
    PrimaryRequired,
}

/// Active state change of a display target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveChange {
    pub target: TargetId,
    pub active: bool,
}

/// Which physical display each display target uses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayAssignment {
    /// Number of connected physical displays
    display_count: usize,
    /// Zero-based physical display per target, index 0 is the primary target
    assigned: [Option<usize>; MAX_DISPLAY_TARGETS as usize],
}

impl Default for DisplayAssignment {
    fn default() -> Self {
        Self::new(1)
    }
}

impl DisplayAssignment {
    /// Primary target on the first display, secondaries unassigned
    pub fn new(display_count: usize) -> Self {
        Self {
            display_count,
            assigned: [(display_count > 0).then_some(0), None, None, None],
        }
    }

    pub fn display_count(&self) -> usize {
        self.display_count
    }

    /// Physical display of a target
    pub fn assigned(&self, target: TargetId) -> Option<usize> {
        target.display_index().and_then(|i| self.assigned[i])
    }

    /// Whether the target currently renders to a display
    pub fn is_active(&self, target: TargetId) -> bool {
        self.assigned(target).is_some()
    }

    /// Active display targets in order
    pub fn active_targets(&self) -> Vec<TargetId> {
        (0..MAX_DISPLAY_TARGETS as usize)
            .filter(|&i| self.assigned[i].is_some())
            .filter_map(TargetId::from_display_index)
            .collect()
    }

    /// Whether the target may be assigned at all
    ///
    /// One physical display is kept for the operator, so secondary target `n`
    /// needs at least `n + 1` displays, and the preceding target must be
    /// assigned.
    pub fn is_available(&self, target: TargetId) -> bool {
        match target.display_index() {
            Some(0) => self.display_count > 0,
            Some(i) => self.display_count >= i + 2 && self.assigned[i - 1].is_some(),
            None => false,
        }
    }

    /// Displays offered to a target
    ///
    /// Every display not already claimed by a lower-numbered target.
    pub fn candidates(&self, target: TargetId) -> Vec<usize> {
        let Some(index) = target.display_index() else {
            return Vec::new();
        };
        let claimed = &self.assigned[..index];
        (0..self.display_count)
            .filter(|display| !claimed.contains(&Some(*display)))
            .collect()
    }

    /// Assign a display to a target, or clear a secondary target with `None`
    ///
    /// Returns the targets whose active state changed, including secondary
    /// targets dropped because their display got claimed or their chain broke.
    pub fn assign(&mut self, target: TargetId, screen: Option<usize>) -> Result<Vec<ActiveChange>, AssignmentError> {
        let index = target.display_index().ok_or(AssignmentError::NotAssignable(target))?;
        match screen {
            None if index == 0 => return Err(AssignmentError::PrimaryRequired),
            None => {}
            Some(display) => {
                if index > 0 && self.assigned[index - 1].is_none() {
                    return Err(AssignmentError::ChainBroken(target));
                }
                if !self.is_available(target) {
                    return Err(AssignmentError::Unavailable {
                        target,
                        display_count: self.display_count,
                    });
                }
                if !self.candidates(target).contains(&display) {
                    return Err(AssignmentError::NotCandidate { target, display });
                }
            }
        }

        let before = self.assigned;
        self.assigned[index] = screen;
        self.normalize();
        tracing::info!(target_id = %target, ?screen, "Display assignment changed");
        Ok(self.changes_since(before))
    }

    /// Update the number of connected displays and drop invalid assignments
    pub fn set_display_count(&mut self, display_count: usize) -> Vec<ActiveChange> {
        let before = self.assigned;
        self.display_count = display_count;
        self.normalize();
        if before != self.assigned {
            tracing::info!(display_count, "Display assignment normalized");
        }
        self.changes_since(before)
    }

    /// Re-apply the first-claim and chain rules
    ///
    /// The primary target falls back to the first display when its display
    /// disappeared. Secondary assignments that are no longer offered, or
    /// whose preceding target is unassigned, are cleared.
    pub fn normalize(&mut self) {
        self.assigned[0] = match self.assigned[0] {
            Some(display) if display < self.display_count => Some(display),
            _ => (self.display_count > 0).then_some(0),
        };
        for index in 1..self.assigned.len() {
            let Some(display) = self.assigned[index] else {
                continue;
            };
            let keep = self.assigned[index - 1].is_some()
                && self.display_count >= index + 2
                && !self.assigned[..index].contains(&Some(display))
                && display < self.display_count;
            if !keep {
                self.assigned[index] = None;
            }
        }
    }

    fn changes_since(&self, before: [Option<usize>; MAX_DISPLAY_TARGETS as usize]) -> Vec<ActiveChange> {
        (0..self.assigned.len())
            .filter(|&i| before[i].is_some() != self.assigned[i].is_some())
            .filter_map(|i| {
                TargetId::from_display_index(i).map(|target| ActiveChange {
                    target,
                    active: self.assigned[i].is_some(),
                })
            })
            .collect()
    }
}
