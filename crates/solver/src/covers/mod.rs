//! Computation and memoization of itemset covers.
//!
//! All strategies return bit-identical covers for the same itemset. They only
//! differ in how many bitset intersections they perform and how much memory
//! they keep around.

mod direct;
mod full;
mod stacked;


pub use self::{
    direct::DirectCovers,
    full::FullCovers,
    stacked::StackedCovers,
};
use crate::{
    ConfigError,
    Cover,
    Dataset,
    ItemSet,
};
use core::{
    fmt,
    str::FromStr,
};

/// Counters describing the work performed by a cover index.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct CoverStats {
    /// Number of queries answered.
    pub queries: u64,
    /// Number of queries answered from memory without any intersection.
    pub hits: u64,
    /// Number of bitset intersections performed.
    pub intersections: u64,
}

/// Computes the cover of itemsets over a dataset's vertical index.
pub trait CoverIndex {
    /// Returns the cover of the itemset.
    ///
    /// The cover of the empty itemset is the set of all transactions.
    fn cover_of(&mut self, dataset: &Dataset, itemset: &ItemSet) -> Cover;

    /// Informs the index that `cover` is the confirmed cover of `itemset`.
    ///
    /// Strategies may use this as a memoization hint.
    fn remember(&mut self, _itemset: &ItemSet, _cover: &Cover) {}

    /// Forgets everything memoized so far and clears the counters.
    ///
    /// A miner builds its own index, so this only matters to callers that
    /// query one index for several unrelated runs.
    fn reset(&mut self);

    /// Returns the work counters of the index.
    fn stats(&self) -> CoverStats;
}

/// Selects one of the cover index implementations.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CoverStrategy {
    /// Always intersect the vertical covers of all items.
    Direct,
    /// Reuse the nearest memoized ancestor of the current branch.
    Stacked,
    /// Memoize every cover ever computed.
    Full,
}

impl CoverStrategy {
    /// Creates a fresh cover index of this strategy.
    pub fn build(self) -> Box<dyn CoverIndex> {
        match self {
            Self::Direct => Box::new(DirectCovers::default()),
            Self::Stacked => Box::new(StackedCovers::default()),
            Self::Full => Box::new(FullCovers::default()),
        }
    }
}

impl FromStr for CoverStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direct" => Ok(Self::Direct),
            "stacked" => Ok(Self::Stacked),
            "full" => Ok(Self::Full),
            unknown => Err(ConfigError::UnknownStrategy(unknown.to_string())),
        }
    }
}

impl fmt::Display for CoverStrategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Direct => "direct",
            Self::Stacked => "stacked",
            Self::Full => "full",
        };
        write!(f, "{}", name)
    }
}

/// Intersects `cover` with the vertical covers of all items in `items`.
///
/// Counts every intersection in `stats`.
fn intersect_items(
    dataset: &Dataset,
    mut cover: Cover,
    items: &ItemSet,
    stats: &mut CoverStats,
) -> Cover {
    for item in items.iter_ones() {
        cover.intersect_with(dataset.vertical(item));
        stats.intersections += 1;
    }
    cover
}
