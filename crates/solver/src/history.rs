use crate::{
    jaccard,
    ItemsetCover,
};
use core::ops::{
    self,
    Range,
};

/// The ordered sequence of accepted solutions of a run.
///
/// Entries are only ever appended; extraction creates a new history.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct History {
    entries: Vec<ItemsetCover>,
}

/// The result of [`History::diverse_subset`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DiverseSubset {
    /// Indices of the selected entries in selection order.
    pub indices: Vec<usize>,
    /// For every selected entry after the first, its maximum similarity to
    /// the entries selected before it.
    pub weights: Vec<f64>,
}

impl History {
    /// Appends an accepted solution.
    pub fn push(&mut self, solution: ItemsetCover) {
        self.entries.push(solution);
    }

    /// Returns the entry at `index` if any.
    pub fn get(&self, index: usize) -> Option<&ItemsetCover> {
        self.entries.get(index)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the history has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the entries in acceptance order.
    pub fn iter(&self) -> core::slice::Iter<ItemsetCover> {
        self.entries.iter()
    }

    /// Removes all entries so that the history can be reused.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns a new history holding the entries at `indices` in that order.
    ///
    /// # Panics
    ///
    /// If an index is out of bounds.
    pub fn extract(&self, indices: &[usize]) -> Self {
        indices.iter().map(|&index| self[index].clone()).collect()
    }

    /// Returns a new history holding the entries in `range`.
    ///
    /// # Panics
    ///
    /// If the range is out of bounds.
    pub fn extract_range(&self, range: Range<usize>) -> Self {
        self.entries[range].iter().cloned().collect()
    }

    /// Returns the items of every entry as ascending 1-based identifiers.
    pub fn itemsets_one_based(&self) -> Vec<Vec<usize>> {
        self.iter()
            .map(|entry| entry.one_based_items().collect())
            .collect()
    }

    /// Returns the exact similarities of all pairs `(j, i)` with `j < i`,
    /// ordered by `i` then `j`.
    fn pair_similarities(&self) -> Vec<f64> {
        let mut similarities = Vec::with_capacity(self.len() * self.len().saturating_sub(1) / 2);
        for (i, current) in self.iter().enumerate() {
            for previous in &self.entries[..i] {
                similarities.push(jaccard::exact(current.cover(), previous.cover()));
            }
        }
        similarities
    }

    /// Returns the pair similarity at every integer percentile `0..=100`.
    ///
    /// Value `p` is the smallest similarity such that at least `p` percent
    /// of all pairs are at most as similar. Empty for fewer than two entries.
    pub fn percentile_similarities(&self) -> Vec<f64> {
        let mut sorted = self.pair_similarities();
        if sorted.is_empty() {
            return Vec::new()
        }
        sorted.sort_by(f64::total_cmp);
        let last = sorted.len() - 1;
        (0..=100).map(|percent| sorted[last * percent / 100]).collect()
    }

    /// Returns the average pair similarity after every entry but the first.
    ///
    /// Value `i - 1` averages the similarities of all pairs among the first
    /// `i + 1` entries.
    pub fn average_similarities(&self) -> Vec<f64> {
        let mut averages = Vec::with_capacity(self.len().saturating_sub(1));
        let mut total = 0.0;
        let mut count = 0usize;
        for (i, current) in self.iter().enumerate().skip(1) {
            for previous in &self.entries[..i] {
                total += jaccard::exact(current.cover(), previous.cover());
                count += 1;
            }
            averages.push(total / count as f64);
        }
        averages
    }

    /// Returns the least similar pair `(j, i)` with `j < i`.
    ///
    /// The first pair found with similarity `0` is returned immediately.
    fn least_similar_pair(&self) -> Option<(usize, usize)> {
        let mut minimum = f64::INFINITY;
        let mut pair = None;
        for (i, current) in self.iter().enumerate().skip(1) {
            for (j, previous) in self.entries[..i].iter().enumerate() {
                let similarity = jaccard::exact(current.cover(), previous.cover());
                if similarity == 0.0 {
                    return Some((j, i))
                }
                if similarity < minimum {
                    minimum = similarity;
                    pair = Some((j, i));
                }
            }
        }
        pair
    }

    /// Greedily selects `k` mutually dissimilar entries.
    ///
    /// Seeds the selection with the least similar pair, then repeatedly adds
    /// the entry whose maximum similarity to the selection is smallest.
    /// `k` is clamped to the history length. Deterministic for identical
    /// histories.
    pub fn diverse_subset(&self, k: usize) -> DiverseSubset {
        let k = k.min(self.len());
        let (first, second) = match self.least_similar_pair() {
            Some(pair) => pair,
            None => {
                return DiverseSubset {
                    indices: (0..k).collect(),
                    weights: Vec::new(),
                }
            }
        };
        let mut max_to_selection = vec![0.0; self.len()];
        let mut selection = DiverseSubset::default();
        self.select(first, &mut max_to_selection, &mut selection);
        selection.weights.push(max_to_selection[second]);
        self.select(second, &mut max_to_selection, &mut selection);
        while selection.indices.len() < k {
            let mut best = f64::INFINITY;
            let mut next = None;
            for (index, &similarity) in max_to_selection.iter().enumerate() {
                if similarity < best {
                    best = similarity;
                    next = Some(index);
                }
            }
            let next = next.expect("encountered unexpected exhausted history");
            selection.weights.push(best);
            self.select(next, &mut max_to_selection, &mut selection);
        }
        selection.indices.truncate(k);
        selection.weights.truncate(k.saturating_sub(1));
        selection
    }

    /// Adds the entry to the selection and updates the maximum similarities.
    fn select(&self, index: usize, max_to_selection: &mut [f64], selection: &mut DiverseSubset) {
        selection.indices.push(index);
        let cover = self[index].cover();
        for (other, max) in max_to_selection.iter_mut().enumerate() {
            *max = if other == index {
                f64::INFINITY
            } else {
                max.max(jaccard::exact(self[other].cover(), cover))
            };
        }
    }
}

impl ops::Index<usize> for History {
    type Output = ItemsetCover;

    fn index(&self, index: usize) -> &Self::Output {
        &self.entries[index]
    }
}

impl FromIterator<ItemsetCover> for History {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = ItemsetCover>,
    {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a ItemsetCover;
    type IntoIter = core::slice::Iter<'a, ItemsetCover>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
