//! Mining of closed, frequent and pairwise diverse itemsets.
//!
//! The miner is a depth-first search over one ternary decision variable per
//! item. At every node a propagator enforces closedness and frequency of the
//! itemset under construction and, in diversity mode, a bound on the Jaccard
//! similarity of its cover to every previously accepted solution. Accepted
//! solutions are collected in a [`History`] which also offers the post-hoc
//! diversification used by the [`pipeline`].

#![forbid(unsafe_code)]
#![allow(clippy::len_without_is_empty)]

mod assignment;
mod builder;
pub mod branching;
mod config;
pub mod covers;
mod dataset;
mod engine;
mod history;
mod item;
pub mod jaccard;
mod nogood;
pub mod pipeline;
pub mod propagator;


pub use crate::{
    assignment::{
        Assignment,
        AssignmentError,
        Cell,
        CellRange,
        DecisionLevel,
        PartialAssignment,
    },
    branching::{
        BoundKind,
        BranchingStrategy,
    },
    builder::DatasetBuilder,
    config::{
        ConfigError,
        DEFAULT_SEED,
        DiversityConfig,
        Limits,
        MinerConfig,
    },
    covers::CoverStrategy,
    dataset::Dataset,
    engine::{
        Completion,
        Miner,
        SearchOutcome,
        Statistics,
        StopHandle,
    },
    history::{
        DiverseSubset,
        History,
    },
    item::{
        Cover,
        Item,
        ItemSet,
        ItemsetCover,
        Transaction,
        Value,
    },
    propagator::{
        Consistency,
        Propagation,
    },
};

/// Errors surfaced to callers of the miner.
///
/// Propagation failures are not errors: they are handled by backtracking.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A dataset line contains a token that is not a positive item id.
    #[error("line {line}: invalid item `{token}`, expected a positive integer")]
    InvalidItem { line: usize, token: String },
    /// The dataset contains no transaction line.
    #[error("the dataset contains no transactions")]
    EmptyDataset,
    /// The dataset could not be read.
    #[error("failed to read the dataset")]
    Io(#[from] std::io::Error),
    /// The run was rejected before any search started.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
