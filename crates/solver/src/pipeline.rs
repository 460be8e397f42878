//! Runs one of the mining approaches end to end.
//!
//! Every approach maps onto a [`MinerConfig`]. The post-hoc approach
//! oversamples with an inner approach and then keeps a diverse subset of the
//! oversampled history.

use crate::{
    BoundKind,
    BranchingStrategy,
    Completion,
    ConfigError,
    Consistency,
    DEFAULT_SEED,
    Dataset,
    Error,
    History,
    Miner,
    MinerConfig,
    Propagation,
};
use core::{
    fmt,
    str::FromStr,
    time::Duration,
};
use log::info;
use std::time::Instant;

/// The time limit used when none is requested.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(60);

/// The minimum frequency of a run.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Frequency {
    /// A number of transactions.
    Absolute(usize),
    /// A percentage of the transactions, rounded up.
    Percent(f64),
}

impl Frequency {
    /// Returns the minimum number of transactions for the dataset.
    ///
    /// # Errors
    ///
    /// If a percentage is outside of `[0, 100]`.
    pub fn resolve(self, dataset: &Dataset) -> Result<usize, ConfigError> {
        match self {
            Self::Absolute(min_frequency) => Ok(min_frequency),
            Self::Percent(percent) if (0.0..=100.0).contains(&percent) => {
                Ok(dataset.min_frequency(percent))
            }
            Self::Percent(percent) => Err(ConfigError::InvalidThreshold(percent)),
        }
    }
}

/// The approach generating the oversampled history of a post-hoc run.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PostHocInner {
    /// All closed itemsets in search order.
    All,
    /// Random search.
    Random,
    /// Deterministic oriented search with exact similarities.
    OrientedDeterministic,
    /// Randomized oriented search with exact similarities.
    OrientedRandomized,
}

impl FromStr for PostHocInner {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "random" => Ok(Self::Random),
            "orientedDet" => Ok(Self::OrientedDeterministic),
            "orientedRandom" => Ok(Self::OrientedRandomized),
            unknown => Err(ConfigError::UnknownStrategy(unknown.to_string())),
        }
    }
}

impl fmt::Display for PostHocInner {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::All => "all",
            Self::Random => "random",
            Self::OrientedDeterministic => "orientedDet",
            Self::OrientedRandomized => "orientedRandom",
        };
        write!(f, "{}", name)
    }
}

/// A mining approach.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Approach {
    /// Closed diversity search with the given similarity bound.
    ClosedDiversity { bound: f64, check_exact: bool },
    /// Random search restarting after every solution.
    RandomSearch,
    /// Oriented search always choosing the least similar item.
    OrientedDeterministic(BoundKind),
    /// Oriented search sampling items by their similarity.
    OrientedRandomized(BoundKind),
    /// Search steered towards rarely covered transactions.
    TransactionOriented,
    /// Oversample `factor` times the requested solutions, then diversify.
    PostHoc { factor: f64, inner: PostHocInner },
}

impl Approach {
    /// Returns the name of the approach.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ClosedDiversity { .. } => "closedDiv",
            Self::RandomSearch => "randomSearch",
            Self::OrientedDeterministic(_) => "orientedDet",
            Self::OrientedRandomized(_) => "orientedRandom",
            Self::TransactionOriented => "transactionOriented",
            Self::PostHoc { .. } => "postHoc",
        }
    }

    /// Returns the tag identifying the approach in output file names.
    pub fn tag(&self) -> String {
        match self {
            Self::OrientedDeterministic(bound) | Self::OrientedRandomized(bound) => {
                format!("{}{}", self.name(), bound)
            }
            Self::PostHoc { factor, inner } => format!("-postHoc({},{:?})", inner, factor),
            _ => self.name().to_string(),
        }
    }

    /// Returns `true` if the approach needs a requested number of solutions.
    pub fn is_count_driven(&self) -> bool {
        !matches!(self, Self::ClosedDiversity { .. })
    }
}

/// A complete mining request.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    pub frequency: Frequency,
    /// The number of requested solutions, `0` for no limit.
    pub solutions: usize,
    pub time_limit: Duration,
    pub seed: u64,
    pub approach: Approach,
}

impl RunRequest {
    /// Creates a request with the default time limit and seed.
    pub fn new(frequency: Frequency, approach: Approach) -> Self {
        Self {
            frequency,
            solutions: 0,
            time_limit: DEFAULT_TIME_LIMIT,
            seed: DEFAULT_SEED,
            approach,
        }
    }

    pub fn with_solutions(mut self, solutions: usize) -> Self {
        self.solutions = solutions;
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks the request before any search starts.
    ///
    /// # Errors
    ///
    /// - If a count-driven approach is requested without a solution count.
    /// - If the post-hoc factor is not greater than `1`.
    /// - If the similarity bound is outside of `[0, 1]`.
    /// - If a frequency percentage is outside of `[0, 100]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.approach.is_count_driven() && self.solutions == 0 {
            return Err(ConfigError::MissingSolutionCount(self.approach.name()))
        }
        match self.approach {
            Approach::PostHoc { factor, .. } if factor.is_nan() || factor <= 1.0 => {
                return Err(ConfigError::InvalidFactor(factor))
            }
            Approach::ClosedDiversity { bound, .. } if !(0.0..=1.0).contains(&bound) => {
                return Err(ConfigError::InvalidSimilarityBound(bound))
            }
            _ => (),
        }
        if let Frequency::Percent(percent) = self.frequency {
            if !(0.0..=100.0).contains(&percent) {
                return Err(ConfigError::InvalidThreshold(percent))
            }
        }
        Ok(())
    }
}

/// The result of a run.
#[derive(Debug, Clone)]
pub enum RunOutput {
    /// The accepted itemsets with elapsed times in nanoseconds.
    Solutions {
        history: History,
        times_nanos: Vec<u128>,
        completion: Completion,
    },
    /// The time limit expired before a usable result was found.
    TimedOut { time_limit: Duration },
}

impl RunOutput {
    /// Returns the history if the run produced one.
    pub fn history(&self) -> Option<&History> {
        match self {
            Self::Solutions { history, .. } => Some(history),
            Self::TimedOut { .. } => None,
        }
    }
}

impl fmt::Display for RunOutput {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Solutions {
                history,
                times_nanos,
                ..
            } => {
                write!(f, "{}", history.len())?;
                for time in times_nanos {
                    write!(f, " {}", time)?;
                }
                writeln!(f)?;
                for entry in history {
                    for item in entry.one_based_items() {
                        write!(f, "{} ", item)?;
                    }
                    writeln!(f)?;
                }
                Ok(())
            }
            Self::TimedOut { time_limit } => writeln!(f, "0 {}", time_limit.as_nanos()),
        }
    }
}

/// Returns the base configuration shared by all count-driven searches.
fn count_driven(min_frequency: usize, branching: BranchingStrategy) -> MinerConfig {
    MinerConfig::closed_patterns(min_frequency)
        .with_propagation(Propagation::Incremental)
        .with_consistency(Consistency::Weak)
        .with_branching(branching)
        .with_restart_on_solution(true)
}

/// Returns the miner configuration of a non post-hoc approach.
fn approach_config(approach: Approach, min_frequency: usize) -> MinerConfig {
    match approach {
        Approach::ClosedDiversity { bound, check_exact } => {
            MinerConfig::closed_diversity(min_frequency, bound).with_check_exact(check_exact)
        }
        Approach::RandomSearch => count_driven(min_frequency, BranchingStrategy::RandomOrder),
        Approach::OrientedDeterministic(bound) => {
            count_driven(min_frequency, BranchingStrategy::OrientedDeterministic(bound))
        }
        Approach::OrientedRandomized(bound) => {
            count_driven(min_frequency, BranchingStrategy::OrientedRandomized(bound))
        }
        Approach::TransactionOriented => {
            count_driven(min_frequency, BranchingStrategy::TransactionWeight)
        }
        Approach::PostHoc { inner, .. } => {
            match inner {
                PostHocInner::All => {
                    MinerConfig::closed_patterns(min_frequency)
                        .with_consistency(Consistency::Weak)
                }
                PostHocInner::Random => approach_config(Approach::RandomSearch, min_frequency),
                PostHocInner::OrientedDeterministic => {
                    approach_config(
                        Approach::OrientedDeterministic(BoundKind::Exact),
                        min_frequency,
                    )
                }
                PostHocInner::OrientedRandomized => {
                    approach_config(Approach::OrientedRandomized(BoundKind::Exact), min_frequency)
                }
            }
        }
    }
}

/// Runs the requested approach on the dataset.
///
/// # Errors
///
/// If the request is invalid. No search is started in that case.
pub fn run(dataset: &Dataset, request: &RunRequest) -> Result<RunOutput, Error> {
    request.validate()?;
    let started = Instant::now();
    let min_frequency = request.frequency.resolve(dataset)?;
    let solutions = match request.approach {
        Approach::PostHoc { factor, .. } => (request.solutions as f64 * factor).round() as usize,
        _ => request.solutions,
    };
    let mut config = approach_config(request.approach, min_frequency)
        .with_time_limit(request.time_limit)
        .with_seed(request.seed);
    if solutions > 0 {
        config = config.with_solution_limit(solutions);
    }
    info!(
        "running {} with min frequency {} for {} solutions",
        request.approach.tag(),
        min_frequency,
        solutions,
    );
    let outcome = Miner::new(dataset, config)?.run();
    if !outcome.completion.is_complete() {
        info!("{} timed out after {:?}", request.approach.tag(), request.time_limit);
        return Ok(RunOutput::TimedOut {
            time_limit: request.time_limit,
        })
    }
    let output = match request.approach {
        Approach::PostHoc { .. } => {
            let selection_started = Instant::now();
            let subset = outcome.history.diverse_subset(request.solutions);
            let history = outcome.history.extract(&subset.indices);
            let finished = Instant::now();
            info!(
                "kept {} of {} oversampled itemsets, selection weights {:?}",
                subset.indices.len(),
                outcome.history.len(),
                subset.weights,
            );
            RunOutput::Solutions {
                history,
                times_nanos: vec![
                    (finished - started).as_nanos(),
                    (finished - selection_started).as_nanos(),
                ],
                completion: outcome.completion,
            }
        }
        _ => {
            RunOutput::Solutions {
                history: outcome.history,
                times_nanos: vec![started.elapsed().as_nanos()],
                completion: outcome.completion,
            }
        }
    };
    Ok(output)
}
