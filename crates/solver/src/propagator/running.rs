use crate::{
    Assignment,
    Cell,
    CellRange,
    Cover,
    Dataset,
    Item,
    Value,
};
use bounded::Index as _;

/// The cover of the included items kept in backtrackable cells.
///
/// Besides the cover words it keeps one frequency estimate per item so that
/// projected covers known to be frequent need not be counted.
#[derive(Debug, Clone)]
pub struct RunningCover {
    len_transactions: usize,
    /// The chunks of the running cover.
    words: CellRange,
    /// The number of assigned items already intersected into the cover.
    synced: Cell,
    /// Per item a lower bound on its projected frequency, offset by the
    /// number of transactions that had left the cover when it was refreshed.
    estimates: CellRange,
}

impl RunningCover {
    /// Allocates the cells of the running cover in `assignment`.
    pub fn new(dataset: &Dataset, assignment: &mut Assignment) -> Self {
        let all = dataset.all_transactions();
        let words = assignment.alloc_cells_with(all.chunks().iter().copied());
        let synced = assignment.alloc_cell(0);
        let estimates = assignment.alloc_cells_with(
            dataset
                .items()
                .map(|item| dataset.vertical(item).count_ones() as u64),
        );
        Self {
            len_transactions: dataset.len_transactions(),
            words,
            synced,
            estimates,
        }
    }

    /// Intersects the items included since the last call into the running
    /// cover and returns it.
    pub fn sync(&self, dataset: &Dataset, assignment: &mut Assignment) -> Cover {
        let mut cover = Cover::from_chunks(
            self.len_transactions,
            self.words.iter().map(|cell| assignment.cell(cell)),
        );
        let synced = assignment.cell(self.synced) as usize;
        let values = assignment.values();
        let pending = values.assigned()[synced..]
            .iter()
            .copied()
            .filter(|&item| values.get(item) == Value::In)
            .collect::<Vec<_>>();
        if !pending.is_empty() {
            for item in pending {
                cover.intersect_with(dataset.vertical(item));
            }
            for (n, &chunk) in cover.chunks().iter().enumerate() {
                assignment.set_cell(self.words.get(n), chunk);
            }
        }
        self.mark_synced(assignment);
        cover
    }

    /// Records that every assigned item has been intersected into the cover.
    pub fn mark_synced(&self, assignment: &mut Assignment) {
        let len_assigned = assignment.values().len_assigned() as u64;
        assignment.set_cell(self.synced, len_assigned);
    }

    /// Returns the number of transactions that left the cover.
    pub fn removed(&self, cover: &Cover) -> usize {
        self.len_transactions - cover.count_ones()
    }

    /// Returns `true` if `projection`, the projected cover of `item`, has at
    /// least `min_frequency` transactions.
    ///
    /// Only counts the projection if the estimate is inconclusive, and then
    /// refreshes the estimate.
    pub fn is_frequent(
        &self,
        assignment: &mut Assignment,
        item: Item,
        projection: &Cover,
        removed: usize,
        min_frequency: usize,
    ) -> bool {
        let cell = self.estimates.get(item.into_index());
        let estimate = (assignment.cell(cell) as usize).saturating_sub(removed);
        if estimate >= min_frequency {
            return true
        }
        let frequency = projection.count_ones();
        assignment.set_cell(cell, (frequency + removed) as u64);
        frequency >= min_frequency
    }
}
