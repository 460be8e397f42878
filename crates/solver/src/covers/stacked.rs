use super::{
    intersect_items,
    CoverIndex,
    CoverStats,
};
use crate::{
    Cover,
    Dataset,
    ItemSet,
};

/// Memoizes the covers of the current search branch on a stack.
///
/// A query pops every entry that is not a subset of the queried itemset and
/// then only intersects the items missing from the nearest remaining entry.
#[derive(Debug, Default, Clone)]
pub struct StackedCovers {
    stack: Vec<(ItemSet, Cover)>,
    stats: CoverStats,
}

impl StackedCovers {
    /// Returns the number of memoized entries.
    pub fn len(&self) -> usize {
        self.stack.len()
    }
}

impl CoverIndex for StackedCovers {
    fn cover_of(&mut self, dataset: &Dataset, itemset: &ItemSet) -> Cover {
        self.stats.queries += 1;
        if !itemset.any() {
            self.stats.hits += 1;
            return dataset.all_transactions().clone()
        }
        while let Some((ancestor, ancestor_cover)) = self.stack.last() {
            if ancestor == itemset {
                self.stats.hits += 1;
                return ancestor_cover.clone()
            }
            if ancestor.is_subset_of(itemset) {
                let mut missing = itemset.clone();
                missing.difference_with(ancestor);
                let cover =
                    intersect_items(dataset, ancestor_cover.clone(), &missing, &mut self.stats);
                self.stack.push((itemset.clone(), cover.clone()));
                return cover
            }
            self.stack.pop();
        }
        let cover = intersect_items(
            dataset,
            dataset.all_transactions().clone(),
            itemset,
            &mut self.stats,
        );
        self.stack.push((itemset.clone(), cover.clone()));
        cover
    }

    fn remember(&mut self, itemset: &ItemSet, cover: &Cover) {
        if matches!(self.stack.last(), Some((top, _)) if top == itemset) {
            return
        }
        self.stack.push((itemset.clone(), cover.clone()));
    }

    fn reset(&mut self) {
        self.stack.clear();
        self.stats = CoverStats::default();
    }

    fn stats(&self) -> CoverStats {
        self.stats
    }
}
