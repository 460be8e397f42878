//! Branching strategies choosing the next item to include.
//!
//! The engine always tries to include the chosen item first and excludes it
//! once the included branch is exhausted.

mod order;
mod oriented;
mod transaction_weight;


pub use self::{
    order::{
        InputOrder,
        MinCov,
        RandomOrder,
        ReverseOrder,
    },
    oriented::Oriented,
    transaction_weight::TransactionWeight,
};
use crate::{
    jaccard,
    propagator::Extensions,
    ConfigError,
    Cover,
    Dataset,
    History,
    Item,
};
use core::{
    fmt,
    str::FromStr,
};
use rand::rngs::SmallRng;

/// Everything a branching strategy may inspect at a node.
#[derive(Debug, Copy, Clone)]
pub struct DecisionContext<'a> {
    pub dataset: &'a Dataset,
    pub history: &'a History,
    pub extensions: &'a Extensions,
    /// The number of decisions above the node.
    pub depth: usize,
}

/// Chooses the next item to branch on.
pub trait Brancher {
    /// Returns the free item to include next, or `None` at a leaf.
    fn decide(&mut self, context: &DecisionContext, rng: &mut SmallRng) -> Option<Item>;
}

/// The similarity measure scored by the oriented strategies.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoundKind {
    /// The exact Jaccard similarity.
    Exact,
    /// The Jaccard upper bound.
    UpperBound,
}

impl BoundKind {
    /// Returns the similarity of `projection` to `entry` under this measure.
    pub fn similarity(self, projection: &Cover, entry: &Cover, theta: usize) -> f64 {
        match self {
            Self::Exact => jaccard::exact(projection, entry),
            Self::UpperBound => jaccard::ub(projection, entry, theta),
        }
    }
}

impl FromStr for BoundKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Exact" => Ok(Self::Exact),
            "UB" => Ok(Self::UpperBound),
            unknown => Err(ConfigError::UnknownBound(unknown.to_string())),
        }
    }
}

impl fmt::Display for BoundKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "Exact"),
            Self::UpperBound => write!(f, "UB"),
        }
    }
}

/// Selects one of the branching strategies.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BranchingStrategy {
    /// The free item with the smallest projected cover.
    MinCov,
    /// The first free item.
    InputOrder,
    /// The last free item.
    ReverseOrder,
    /// A uniformly random free item.
    RandomOrder,
    /// The free item least similar to the history.
    OrientedDeterministic(BoundKind),
    /// A free item sampled inversely proportional to its similarity to the history.
    OrientedRandomized(BoundKind),
    /// The free item whose projection covers the least represented transactions.
    TransactionWeight,
}

impl BranchingStrategy {
    /// Creates a fresh brancher of this strategy.
    pub fn build(self, dataset: &Dataset, min_frequency: usize) -> Box<dyn Brancher> {
        match self {
            Self::MinCov => Box::new(MinCov),
            Self::InputOrder => Box::new(InputOrder),
            Self::ReverseOrder => Box::new(ReverseOrder),
            Self::RandomOrder => Box::new(RandomOrder),
            Self::OrientedDeterministic(bound) => {
                Box::new(Oriented::deterministic(bound, dataset, min_frequency))
            }
            Self::OrientedRandomized(bound) => {
                Box::new(Oriented::randomized(bound, dataset, min_frequency))
            }
            Self::TransactionWeight => Box::new(TransactionWeight::new(dataset)),
        }
    }

    /// Returns `true` if the strategy consumes the random source.
    pub fn is_randomized(self) -> bool {
        matches!(self, Self::RandomOrder | Self::OrientedRandomized(_))
    }
}

impl fmt::Display for BranchingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MinCov => write!(f, "min-cov"),
            Self::InputOrder => write!(f, "input-order"),
            Self::ReverseOrder => write!(f, "reverse-order"),
            Self::RandomOrder => write!(f, "random-order"),
            Self::OrientedDeterministic(bound) => write!(f, "oriented-det({})", bound),
            Self::OrientedRandomized(bound) => write!(f, "oriented-random({})", bound),
            Self::TransactionWeight => write!(f, "transaction-weight"),
        }
    }
}

/// Returns the item with the smallest score, the first one on ties.
fn argmin<I>(scores: I) -> Option<Item>
where
    I: IntoIterator<Item = (Item, f64)>,
{
    let mut best = None;
    let mut best_score = f64::INFINITY;
    for (item, score) in scores {
        if best.is_none() || score < best_score {
            best = Some(item);
            best_score = score;
        }
    }
    best
}
