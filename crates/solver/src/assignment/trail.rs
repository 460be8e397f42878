use super::{
    Cell,
    PartialAssignment,
};
use crate::Item;
use bounded::Index;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TrailLimit(u32);

impl Index for TrailLimit {
    fn from_index(index: usize) -> Self {
        assert!(index <= u32::MAX as usize, "encountered too long trail");
        Self(index as u32)
    }

    fn into_index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies a decision level created by [`Trail::bump_decision_level`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct DecisionLevel(u32);

impl Index for DecisionLevel {
    fn from_index(index: usize) -> Self {
        assert!(index <= u32::MAX as usize, "encountered too many decision levels");
        Self(index as u32)
    }

    fn into_index(self) -> usize {
        self.0 as usize
    }
}

/// The trail length at the start of every open decision level.
#[derive(Debug, Default, Clone)]
pub struct TrailLimits {
    limits: Vec<TrailLimit>,
}

impl TrailLimits {
    /// Opens a new decision level starting at the given limit.
    pub fn push(&mut self, new_limit: TrailLimit) -> DecisionLevel {
        let index = self.limits.len();
        self.limits.push(new_limit);
        DecisionLevel::from_index(index)
    }

    /// Closes the given level and all levels opened after it.
    ///
    /// Returns the trail length at which the given level started.
    ///
    /// # Panics
    ///
    /// If the level is not open.
    pub fn pop_to_level(&mut self, level: DecisionLevel) -> TrailLimit {
        let limit = *self
            .limits
            .get(level.into_index())
            .expect("encountered unexpected closed decision level");
        self.limits.truncate(level.into_index());
        limit
    }

    /// Returns the number of open decision levels.
    pub fn current_decision_level(&self) -> usize {
        self.limits.len()
    }
}

/// A reversible change recorded on the trail.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TrailEntry {
    /// The item has been assigned from `Free` to a fixed value.
    Assigned(Item),
    /// The cell held `old_value` before it was overwritten.
    Cell { cell: Cell, old_value: u64 },
}

/// Records every change to backtrackable state in LIFO order.
#[derive(Debug, Default, Clone)]
pub struct Trail {
    entries: Vec<TrailEntry>,
    limits: TrailLimits,
}

impl Trail {
    /// Pushes a new decision level and returns it.
    pub fn bump_decision_level(&mut self) -> DecisionLevel {
        let limit = TrailLimit::from_index(self.entries.len());
        self.limits.push(limit)
    }

    /// Returns the number of open decision levels.
    pub fn current_decision_level(&self) -> usize {
        self.limits.current_decision_level()
    }

    /// Returns the number of recorded changes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Records a change.
    pub fn push(&mut self, entry: TrailEntry) {
        self.entries.push(entry);
    }

    /// Undoes every change recorded since the given level was opened.
    ///
    /// Unassigns items in `values` and restores overwritten `cells`.
    pub fn pop_to_level(
        &mut self,
        level: DecisionLevel,
        values: &mut PartialAssignment,
        cells: &mut [u64],
    ) {
        let limit = self.limits.pop_to_level(level).into_index();
        while self.entries.len() > limit {
            match self.entries.pop() {
                Some(TrailEntry::Assigned(item)) => values.unassign(item),
                Some(TrailEntry::Cell { cell, old_value }) => {
                    cells[cell.into_index()] = old_value;
                }
                None => break,
            }
        }
    }
}
