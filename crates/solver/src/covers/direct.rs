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

/// Recomputes every cover from the vertical index.
#[derive(Debug, Default, Clone)]
pub struct DirectCovers {
    stats: CoverStats,
}

impl CoverIndex for DirectCovers {
    fn cover_of(&mut self, dataset: &Dataset, itemset: &ItemSet) -> Cover {
        self.stats.queries += 1;
        intersect_items(
            dataset,
            dataset.all_transactions().clone(),
            itemset,
            &mut self.stats,
        )
    }

    fn reset(&mut self) {
        self.stats = CoverStats::default();
    }

    fn stats(&self) -> CoverStats {
        self.stats
    }
}
