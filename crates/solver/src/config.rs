use crate::{
    BranchingStrategy,
    Consistency,
    CoverStrategy,
    Propagation,
};
use core::time::Duration;

/// The seed used when none is configured.
pub const DEFAULT_SEED: u64 = 97;

/// A configuration rejected before any search started.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The approach needs a positive number of requested solutions.
    #[error("the {0} approach requires a positive number of solutions")]
    MissingSolutionCount(&'static str),
    /// The oversampling factor of the post-hoc approach is not above `1`.
    #[error("the oversampling factor must be greater than 1, got {0}")]
    InvalidFactor(f64),
    /// The name does not denote a known strategy.
    #[error("unknown strategy `{0}`")]
    UnknownStrategy(String),
    /// The name does not denote a known similarity bound.
    #[error("unknown bound `{0}`, expected `Exact` or `UB`")]
    UnknownBound(String),
    /// The similarity bound is outside of `[0, 1]`.
    #[error("the similarity bound must be within [0, 1], got {0}")]
    InvalidSimilarityBound(f64),
    /// The frequency threshold in percent is outside of `[0, 100]`.
    #[error("the frequency threshold must be within [0, 100] percent, got {0}")]
    InvalidThreshold(f64),
}

/// Enables the diversity constraint.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DiversityConfig {
    /// Maximum Jaccard similarity between the covers of two solutions.
    pub bound: f64,
    /// Re-verify complete itemsets with the exact similarity.
    pub check_exact: bool,
    /// Skip history entries that can no longer be violated below a node.
    pub retire_by_upper_bound: bool,
}

impl DiversityConfig {
    /// Creates a diversity configuration with the given bound.
    pub fn new(bound: f64) -> Self {
        Self {
            bound,
            check_exact: false,
            retire_by_upper_bound: true,
        }
    }
}

/// Limits after which the search stops early.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Stop once this many solutions have been accepted.
    pub solutions: Option<usize>,
    /// Stop once this much time has passed since the search started.
    pub time: Option<Duration>,
}

/// Configuration of a single [`Miner`](crate::Miner) run.
#[derive(Debug, Clone, PartialEq)]
pub struct MinerConfig {
    pub min_frequency: usize,
    pub diversity: Option<DiversityConfig>,
    pub propagation: Propagation,
    pub consistency: Consistency,
    pub cover_strategy: CoverStrategy,
    pub branching: BranchingStrategy,
    pub limits: Limits,
    pub seed: u64,
    pub restart_on_solution: bool,
    pub record_nogoods: bool,
}

impl MinerConfig {
    /// Mines all closed frequent itemsets.
    pub fn closed_patterns(min_frequency: usize) -> Self {
        Self {
            min_frequency,
            diversity: None,
            propagation: Propagation::Incremental,
            consistency: Consistency::Strong,
            cover_strategy: CoverStrategy::Stacked,
            branching: BranchingStrategy::MinCov,
            limits: Limits::default(),
            seed: DEFAULT_SEED,
            restart_on_solution: false,
            record_nogoods: true,
        }
    }

    /// Mines closed frequent itemsets whose covers are pairwise diverse.
    pub fn closed_diversity(min_frequency: usize, bound: f64) -> Self {
        Self {
            diversity: Some(DiversityConfig::new(bound)),
            consistency: Consistency::Weak,
            ..Self::closed_patterns(min_frequency)
        }
    }

    pub fn with_propagation(mut self, propagation: Propagation) -> Self {
        self.propagation = propagation;
        self
    }

    pub fn with_consistency(mut self, consistency: Consistency) -> Self {
        self.consistency = consistency;
        self
    }

    pub fn with_cover_strategy(mut self, cover_strategy: CoverStrategy) -> Self {
        self.cover_strategy = cover_strategy;
        self
    }

    pub fn with_branching(mut self, branching: BranchingStrategy) -> Self {
        self.branching = branching;
        self
    }

    pub fn with_check_exact(mut self, check_exact: bool) -> Self {
        if let Some(diversity) = &mut self.diversity {
            diversity.check_exact = check_exact;
        }
        self
    }

    pub fn with_retirement(mut self, retire_by_upper_bound: bool) -> Self {
        if let Some(diversity) = &mut self.diversity {
            diversity.retire_by_upper_bound = retire_by_upper_bound;
        }
        self
    }

    pub fn with_solution_limit(mut self, solutions: usize) -> Self {
        self.limits.solutions = Some(solutions);
        self
    }

    pub fn with_time_limit(mut self, time: Duration) -> Self {
        self.limits.time = Some(time);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_restart_on_solution(mut self, restart_on_solution: bool) -> Self {
        self.restart_on_solution = restart_on_solution;
        self
    }

    pub fn with_nogoods(mut self, record_nogoods: bool) -> Self {
        self.record_nogoods = record_nogoods;
        self
    }

    /// Checks the configuration for values the search cannot work with.
    ///
    /// # Errors
    ///
    /// If the similarity bound is outside of `[0, 1]` or NaN.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(diversity) = &self.diversity {
            if !(0.0..=1.0).contains(&diversity.bound) {
                return Err(ConfigError::InvalidSimilarityBound(diversity.bound))
            }
        }
        Ok(())
    }
}
