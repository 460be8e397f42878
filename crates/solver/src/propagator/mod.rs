//! Propagators pruning a search node.
//!
//! A propagator inspects the current assignment and either fails, which
//! prunes the node, or forces further items and reports the projected cover
//! of every item that is still free.
//!
//! - [`ClosedPattern`] enforces closedness and frequency.
//! - [`ClosedDiversity`] additionally bounds the similarity to the history.
//!
//! Both come in a fresh variant recomputing the node from scratch and an
//! incremental variant keeping its state in backtrackable cells.

mod closed;
mod diversity;
mod running;

#[cfg(test)]
mod tests;

pub use self::{
    closed::{
        ClosedPattern,
        IncrementalClosedPattern,
    },
    diversity::{
        ClosedDiversity,
        IncrementalClosedDiversity,
    },
};
use crate::{
    covers::CoverStats,
    Assignment,
    Cover,
    Dataset,
    History,
    Item,
    MinerConfig,
    Value,
};
use bounded::BoundedMap;
use core::fmt;

/// Why a propagator pruned a node.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FailReason {
    /// The cover is smaller than the minimum frequency.
    Infrequent,
    /// An excluded item is contained in every covered transaction.
    ExcludedExtension,
    /// The lower bound on the similarity to a history entry is violated.
    Similarity,
    /// The exact similarity of a complete itemset to a history entry is violated.
    ExactSimilarity,
    /// Every item is fixed and none is included.
    EmptyItemset,
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Infrequent => write!(f, "infrequent cover"),
            Self::ExcludedExtension => write!(f, "excluded full extension"),
            Self::Similarity => write!(f, "similarity lower bound violated"),
            Self::ExactSimilarity => write!(f, "exact similarity violated"),
            Self::EmptyItemset => write!(f, "empty itemset"),
        }
    }
}

/// Signals that the current node cannot lead to a solution.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Fail {
    reason: FailReason,
}

impl Fail {
    fn new(reason: FailReason) -> Self {
        Self { reason }
    }

    /// Returns the reason of the failure.
    pub fn reason(&self) -> FailReason {
        self.reason
    }
}

/// The cover of a node and the projected covers of its free items.
///
/// Only valid for the node it was computed for.
#[derive(Debug, Clone)]
pub struct Extensions {
    cover: Cover,
    free: BoundedMap<Item, Cover>,
}

impl Extensions {
    /// Returns the cover of the included items.
    pub fn cover(&self) -> &Cover {
        &self.cover
    }

    /// Returns `true` if no item is free.
    pub fn is_leaf(&self) -> bool {
        self.free.is_empty()
    }

    /// Returns the number of free items.
    pub fn len_free(&self) -> usize {
        self.free.len()
    }

    /// Returns the free items in ascending order.
    pub fn free_items(&self) -> impl Iterator<Item = Item> + '_ {
        self.free.keys()
    }

    /// Returns the free items with their projected covers in ascending order.
    pub fn projections(&self) -> impl Iterator<Item = (Item, &Cover)> + '_ {
        self.free.iter()
    }

    /// Returns the projected cover of a free item.
    ///
    /// # Panics
    ///
    /// If the item is not free at this node.
    pub fn projection(&self, item: Item) -> &Cover {
        self.free
            .get(item)
            .ok()
            .flatten()
            .expect("encountered unexpected projection request for a fixed item")
    }
}

/// Read-only state shared by all propagators of a run.
#[derive(Debug, Copy, Clone)]
pub struct Context<'a> {
    pub dataset: &'a Dataset,
    pub history: &'a History,
}

/// Prunes search nodes.
pub trait Propagator {
    /// Propagates the current node.
    ///
    /// Forced assignments are recorded in `assignment` at its current
    /// decision level.
    ///
    /// # Errors
    ///
    /// If the node cannot lead to a solution.
    fn propagate(
        &mut self,
        context: &Context,
        assignment: &mut Assignment,
    ) -> Result<Extensions, Fail>;

    /// Returns the work counters of the cover index, if the propagator uses one.
    fn cover_stats(&self) -> Option<CoverStats> {
        None
    }
}

/// Whether propagation recomputes every node from scratch.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Propagation {
    /// Recompute covers through a cover index at every node.
    Fresh,
    /// Maintain the running cover in backtrackable cells.
    Incremental,
}

/// How much effort is spent on forcing items out.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Consistency {
    /// Additionally force out items dominated by an excluded item.
    Strong,
    /// Only the frequency and similarity rules.
    Weak,
}

/// Creates the propagator selected by the configuration.
///
/// Incremental propagators allocate their cells in `assignment`.
pub fn build(
    config: &MinerConfig,
    dataset: &Dataset,
    assignment: &mut Assignment,
) -> Box<dyn Propagator> {
    let rules = Rules {
        min_frequency: config.min_frequency,
        consistency: config.consistency,
    };
    match (config.propagation, config.diversity) {
        (Propagation::Fresh, None) => {
            Box::new(ClosedPattern::new(rules, config.cover_strategy.build()))
        }
        (Propagation::Fresh, Some(diversity)) => {
            Box::new(ClosedDiversity::new(rules, diversity, config.cover_strategy.build()))
        }
        (Propagation::Incremental, None) => {
            Box::new(IncrementalClosedPattern::new(rules, dataset, assignment))
        }
        (Propagation::Incremental, Some(diversity)) => {
            Box::new(IncrementalClosedDiversity::new(rules, diversity, dataset, assignment))
        }
    }
}

/// The closure and frequency rules shared by all propagators.
#[derive(Debug, Copy, Clone)]
pub struct Rules {
    pub min_frequency: usize,
    pub consistency: Consistency,
}

impl Rules {
    /// Applies the closure and frequency rules to the node with the given cover.
    ///
    /// `is_frequent` decides whether a projected cover reaches the minimum
    /// frequency. `is_diverse` decides whether a projected cover may still
    /// satisfy the diversity constraint.
    ///
    /// # Errors
    ///
    /// - If the cover is infrequent.
    /// - If an excluded item is a full extension.
    /// - If no item is free and none is included.
    pub fn apply<F, D>(
        &self,
        dataset: &Dataset,
        assignment: &mut Assignment,
        cover: Cover,
        mut is_frequent: F,
        mut is_diverse: D,
    ) -> Result<Extensions, Fail>
    where
        F: FnMut(&mut Assignment, Item, &Cover) -> bool,
        D: FnMut(&Cover) -> bool,
    {
        if cover.count_ones() < self.min_frequency {
            return Err(Fail::new(FailReason::Infrequent))
        }
        let len_items = dataset.len_items();
        let values = assignment.values();
        if values
            .items_with(Value::Out)
            .any(|item| cover.is_subset_of(dataset.vertical(item)))
        {
            return Err(Fail::new(FailReason::ExcludedExtension))
        }
        let candidates = values.items_with(Value::Free).collect::<Vec<_>>();
        let mut free = BoundedMap::with_capacity(len_items);
        for item in candidates {
            let vertical = dataset.vertical(item);
            if cover.is_subset_of(vertical) {
                force(assignment, item, Value::In);
                continue
            }
            let projection = cover.intersection(vertical);
            if !is_frequent(assignment, item, &projection) || !is_diverse(&projection) {
                force(assignment, item, Value::Out);
                continue
            }
            free.insert(item, projection)
                .expect("encountered unexpected out of bounds item");
        }
        if self.consistency == Consistency::Strong {
            self.dominate(dataset, assignment, &cover, &mut free);
        }
        if free.is_empty() && assignment.values().items_with(Value::In).next().is_none() {
            return Err(Fail::new(FailReason::EmptyItemset))
        }
        Ok(Extensions { cover, free })
    }

    /// Forces out every free item whose projection is contained in the
    /// projection of an excluded item.
    ///
    /// Including such an item would make the excluded item a full extension.
    fn dominate(
        &self,
        dataset: &Dataset,
        assignment: &mut Assignment,
        cover: &Cover,
        free: &mut BoundedMap<Item, Cover>,
    ) {
        let mut excluded = assignment
            .values()
            .items_with(Value::Out)
            .collect::<Vec<_>>();
        while let Some(item) = excluded.pop() {
            if free.is_empty() {
                return
            }
            let extension = cover.intersection(dataset.vertical(item));
            if extension.count_ones() < self.min_frequency {
                continue
            }
            let dominated = free
                .iter()
                .filter(|(_, projection)| projection.is_subset_of(&extension))
                .map(|(candidate, _)| candidate)
                .collect::<Vec<_>>();
            for candidate in dominated {
                free.take(candidate)
                    .expect("encountered unexpected out of bounds item");
                force(assignment, candidate, Value::Out);
                excluded.push(candidate);
            }
        }
    }
}

/// Assigns a free item during propagation.
fn force(assignment: &mut Assignment, item: Item, value: Value) {
    assignment
        .assign(item, value)
        .expect("encountered unexpected non-free item during propagation");
}
