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

type HashMap<K, V> = std::collections::HashMap<K, V, ahash::RandomState>;

/// Memoizes every cover ever computed or confirmed.
#[derive(Debug, Default, Clone)]
pub struct FullCovers {
    cache: HashMap<ItemSet, Cover>,
    stats: CoverStats,
}

impl FullCovers {
    /// Returns the number of memoized covers.
    pub fn len(&self) -> usize {
        self.cache.len()
    }
}

impl CoverIndex for FullCovers {
    fn cover_of(&mut self, dataset: &Dataset, itemset: &ItemSet) -> Cover {
        self.stats.queries += 1;
        if let Some(cover) = self.cache.get(itemset) {
            self.stats.hits += 1;
            return cover.clone()
        }
        let cover = intersect_items(
            dataset,
            dataset.all_transactions().clone(),
            itemset,
            &mut self.stats,
        );
        self.cache.insert(itemset.clone(), cover.clone());
        cover
    }

    fn remember(&mut self, itemset: &ItemSet, cover: &Cover) {
        if !self.cache.contains_key(itemset) {
            self.cache.insert(itemset.clone(), cover.clone());
        }
    }

    fn reset(&mut self) {
        self.cache.clear();
        self.stats = CoverStats::default();
    }

    fn stats(&self) -> CoverStats {
        self.stats
    }
}
