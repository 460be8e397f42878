use crate::ItemSet;

type HashSet<T> = std::collections::HashSet<T, ahash::RandomState>;

/// Itemsets that must not be accepted again during a run.
#[derive(Debug, Default, Clone)]
pub struct Nogoods {
    forbidden: HashSet<ItemSet>,
}

impl Nogoods {
    /// Forbids the itemset. Returns `false` if it was already forbidden.
    pub fn record(&mut self, itemset: ItemSet) -> bool {
        self.forbidden.insert(itemset)
    }

    /// Returns `true` if the itemset has been forbidden.
    pub fn is_forbidden(&self, itemset: &ItemSet) -> bool {
        self.forbidden.contains(itemset)
    }

    /// Returns the number of forbidden itemsets.
    pub fn len(&self) -> usize {
        self.forbidden.len()
    }
}
