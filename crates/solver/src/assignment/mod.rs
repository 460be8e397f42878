//! Backtrackable search state.
//!
//! Holds the ternary value of every item and a set of generic `u64` cells
//! that propagators use for their own backtrackable counters. Every change
//! is recorded on a single trail and undone in LIFO order when the engine
//! backtracks past the decision level that made it.

mod partial;
mod trail;

#[cfg(test)]
mod tests;

pub use self::{
    partial::PartialAssignment,
    trail::DecisionLevel,
};
use self::trail::{
    Trail,
    TrailEntry,
};
use crate::{
    Item,
    ItemSet,
    Value,
};
use bounded::Index;
use core::fmt::{
    self,
    Display,
};

/// Errors that may be encountered when operating on the assignment.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    /// Item invalid for the current assignment.
    InvalidItem,
    /// When trying to assign an item to the value it already has.
    AlreadyAssigned,
    /// When trying to assign an item that already has the opposite value.
    ConflictingAssignment,
    /// When trying to assign [`Value::Free`].
    FreeValue,
}

impl Display for AssignmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidItem => write!(f, "the item for the assignment is invalid"),
            Self::AlreadyAssigned => write!(f, "the item has already been assigned"),
            Self::ConflictingAssignment => {
                write!(f, "the assignment is in conflict with existing assignment")
            }
            Self::FreeValue => write!(f, "items cannot be assigned the free value"),
        }
    }
}

/// A backtrackable `u64` storage location.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Cell(u32);

impl Index for Cell {
    fn from_index(index: usize) -> Self {
        assert!(index <= u32::MAX as usize, "encountered too many cells");
        Self(index as u32)
    }

    fn into_index(self) -> usize {
        self.0 as usize
    }
}

/// A contiguous range of cells allocated together.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CellRange {
    start: usize,
    len: usize,
}

impl CellRange {
    /// Returns the number of cells in the range.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the cell at position `n` of the range.
    ///
    /// # Panics
    ///
    /// If `n` is out of bounds for the range.
    #[inline]
    pub fn get(&self, n: usize) -> Cell {
        assert!(n < self.len, "cell {} out of range of {} cells", n, self.len);
        Cell::from_index(self.start + n)
    }

    /// Returns an iterator over all cells of the range.
    pub fn iter(&self) -> impl Iterator<Item = Cell> {
        (self.start..self.start + self.len).map(Cell::from_index)
    }
}

/// The item values, the propagator cells and the trail undoing both.
#[derive(Debug, Default, Clone)]
pub struct Assignment {
    trail: Trail,
    values: PartialAssignment,
    cells: Vec<u64>,
}

impl Assignment {
    /// Creates an assignment with every item free and no cells.
    pub fn new(len_items: usize) -> Self {
        Self {
            trail: Trail::default(),
            values: PartialAssignment::new(len_items),
            cells: Vec::new(),
        }
    }

    /// Returns a view into the item values.
    pub fn values(&self) -> &PartialAssignment {
        &self.values
    }

    /// Returns the value of the item.
    ///
    /// # Panics
    ///
    /// If the item is out of bounds.
    #[inline]
    pub fn get(&self, item: Item) -> Value {
        self.values.get(item)
    }

    /// Returns the set of items assigned to [`Value::In`].
    pub fn included(&self) -> ItemSet {
        self.values.included()
    }

    /// Assigns a free item and records the assignment on the trail.
    ///
    /// # Errors
    ///
    /// - If the item is out of bounds.
    /// - If the value is [`Value::Free`].
    /// - If the item has already been assigned.
    pub fn assign(&mut self, item: Item, value: Value) -> Result<(), AssignmentError> {
        if item.into_index() >= self.values.len() {
            return Err(AssignmentError::InvalidItem)
        }
        if value.is_free() {
            return Err(AssignmentError::FreeValue)
        }
        match self.values.get(item) {
            Value::Free => (),
            current if current == value => return Err(AssignmentError::AlreadyAssigned),
            _ => return Err(AssignmentError::ConflictingAssignment),
        }
        self.values.assign(item, value);
        self.trail.push(TrailEntry::Assigned(item));
        Ok(())
    }

    /// Opens a new decision level and returns it.
    pub fn bump_decision_level(&mut self) -> DecisionLevel {
        self.trail.bump_decision_level()
    }

    /// Returns the number of open decision levels.
    pub fn current_decision_level(&self) -> usize {
        self.trail.current_decision_level()
    }

    /// Undoes every change made since the given level was opened.
    ///
    /// # Panics
    ///
    /// If the level has already been closed.
    pub fn pop_to_level(&mut self, level: DecisionLevel) {
        self.trail
            .pop_to_level(level, &mut self.values, &mut self.cells);
    }

    /// Allocates one new cell per value, holding that value.
    ///
    /// # Note
    ///
    /// Allocation itself is not undone by backtracking; propagators allocate
    /// their cells once before the search starts.
    pub fn alloc_cells_with<I>(&mut self, values: I) -> CellRange
    where
        I: IntoIterator<Item = u64>,
    {
        let start = self.cells.len();
        self.cells.extend(values);
        CellRange {
            start,
            len: self.cells.len() - start,
        }
    }

    /// Allocates `len` new cells holding `init`.
    pub fn alloc_cells(&mut self, len: usize, init: u64) -> CellRange {
        self.alloc_cells_with(core::iter::repeat(init).take(len))
    }

    /// Allocates a single cell holding `init`.
    pub fn alloc_cell(&mut self, init: u64) -> Cell {
        self.alloc_cells(1, init).get(0)
    }

    /// Returns the current value of the cell.
    ///
    /// # Panics
    ///
    /// If the cell has not been allocated by this assignment.
    #[inline]
    pub fn cell(&self, cell: Cell) -> u64 {
        self.cells[cell.into_index()]
    }

    /// Overwrites the cell, recording its old value if it changes.
    ///
    /// # Panics
    ///
    /// If the cell has not been allocated by this assignment.
    #[inline]
    pub fn set_cell(&mut self, cell: Cell, new_value: u64) {
        let slot = &mut self.cells[cell.into_index()];
        let old_value = *slot;
        if old_value != new_value {
            *slot = new_value;
            self.trail.push(TrailEntry::Cell { cell, old_value });
        }
    }

    /// Returns the number of changes recorded on the trail.
    pub fn trail_len(&self) -> usize {
        self.trail.len()
    }
}
