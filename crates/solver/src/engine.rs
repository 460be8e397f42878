use crate::{
    branching::{
        Brancher,
        DecisionContext,
    },
    covers::CoverStats,
    nogood::Nogoods,
    propagator::{
        self,
        Context,
        Propagator,
    },
    Assignment,
    Cover,
    Dataset,
    Error,
    History,
    ItemsetCover,
    MinerConfig,
    Value,
};
use log::{
    debug,
    info,
    trace,
};
use rand::{
    rngs::SmallRng,
    SeedableRng,
};
use std::{
    sync::{
        atomic::{
            AtomicBool,
            Ordering,
        },
        Arc,
    },
    time::Instant,
};

/// How a search run ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The whole search space has been explored.
    Exhausted,
    /// The requested number of solutions has been accepted.
    LimitReached,
    /// The time limit expired or a stop was requested before completion.
    Stopped,
}

impl Completion {
    /// Returns `true` unless the run was stopped early.
    pub fn is_complete(self) -> bool {
        !matches!(self, Self::Stopped)
    }
}

/// Counters describing the work of a search run.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Statistics {
    /// Propagated search nodes.
    pub nodes: u64,
    /// Branching decisions.
    pub decisions: u64,
    /// Pruned nodes including rejected duplicate leaves.
    pub failures: u64,
    /// Accepted solutions.
    pub solutions: u64,
    /// Restarts from the root.
    pub restarts: u64,
    /// Work of the cover index if the propagator uses one.
    pub covers: Option<CoverStats>,
}

/// The result of a search run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub history: History,
    pub completion: Completion,
    pub statistics: Statistics,
}

/// Requests a running search to stop at the next node boundary.
#[derive(Debug, Default, Clone)]
pub struct StopHandle {
    requested: Arc<AtomicBool>,
}

impl StopHandle {
    /// Requests the search to stop.
    pub fn request_stop(&self) {
        self.requested.store(true, Ordering::Relaxed);
    }

    /// Returns `true` if a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.requested.load(Ordering::Relaxed)
    }
}

/// Control flow returned while exploring a subtree.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Flow {
    /// The subtree is done, continue with its siblings.
    Continue,
    /// Unwind to the root and search again.
    Restart,
    /// Unwind completely and end the run.
    Stop(Completion),
}

/// Depth-first search for closed and optionally diverse itemsets.
pub struct Miner<'a> {
    dataset: &'a Dataset,
    config: MinerConfig,
    assignment: Assignment,
    propagator: Box<dyn Propagator>,
    brancher: Box<dyn Brancher>,
    history: History,
    nogoods: Nogoods,
    rng: SmallRng,
    statistics: Statistics,
    stop: StopHandle,
    deadline: Option<Instant>,
}

impl<'a> Miner<'a> {
    /// Prepares a search run over the dataset.
    ///
    /// # Errors
    ///
    /// If the configuration is invalid.
    pub fn new(dataset: &'a Dataset, config: MinerConfig) -> Result<Self, Error> {
        config.validate()?;
        let mut assignment = Assignment::new(dataset.len_items());
        let propagator = propagator::build(&config, dataset, &mut assignment);
        let brancher = config.branching.build(dataset, config.min_frequency);
        Ok(Self {
            dataset,
            assignment,
            propagator,
            brancher,
            history: History::default(),
            nogoods: Nogoods::default(),
            rng: SmallRng::seed_from_u64(config.seed),
            statistics: Statistics::default(),
            stop: StopHandle::default(),
            deadline: None,
            config,
        })
    }

    /// Returns a handle to stop the run from elsewhere.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Runs the search until the space is exhausted or a limit is hit.
    pub fn run(mut self) -> SearchOutcome {
        let started = Instant::now();
        self.deadline = self
            .config
            .limits
            .time
            .and_then(|limit| started.checked_add(limit));
        info!(
            "mining {} items over {} transactions: min frequency {}, diversity {:?}, {:?} {:?} propagation, {} branching",
            self.dataset.len_items(),
            self.dataset.len_transactions(),
            self.config.min_frequency,
            self.config.diversity,
            self.config.consistency,
            self.config.propagation,
            self.config.branching,
        );
        let completion = if self.config.limits.solutions == Some(0) {
            Completion::LimitReached
        } else {
            self.search()
        };
        self.statistics.covers = self.propagator.cover_stats();
        info!(
            "search {:?} after {:?}: {} solutions, {} nodes, {} decisions, {} failures, {} restarts",
            completion,
            started.elapsed(),
            self.statistics.solutions,
            self.statistics.nodes,
            self.statistics.decisions,
            self.statistics.failures,
            self.statistics.restarts,
        );
        SearchOutcome {
            history: self.history,
            completion,
            statistics: self.statistics,
        }
    }

    /// Explores from the root, again after every restart.
    fn search(&mut self) -> Completion {
        loop {
            let root = self.assignment.bump_decision_level();
            let flow = self.explore(0);
            self.assignment.pop_to_level(root);
            match flow {
                Flow::Continue => return Completion::Exhausted,
                Flow::Stop(completion) => return completion,
                Flow::Restart => {
                    self.statistics.restarts += 1;
                    debug!("restart {} from the root", self.statistics.restarts);
                }
            }
        }
    }

    /// Returns the completion if a limit has been hit.
    fn poll_limits(&self) -> Option<Completion> {
        if self.stop.is_stop_requested() {
            return Some(Completion::Stopped)
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(Completion::Stopped),
            _ => None,
        }
    }

    /// Propagates the current node and explores its subtree.
    fn explore(&mut self, depth: usize) -> Flow {
        if let Some(completion) = self.poll_limits() {
            return Flow::Stop(completion)
        }
        self.statistics.nodes += 1;
        let context = Context {
            dataset: self.dataset,
            history: &self.history,
        };
        let extensions = match self.propagator.propagate(&context, &mut self.assignment) {
            Ok(extensions) => extensions,
            Err(fail) => {
                self.statistics.failures += 1;
                trace!("node at depth {} pruned: {}", depth, fail.reason());
                return Flow::Continue
            }
        };
        if extensions.is_leaf() {
            return self.accept(extensions.cover())
        }
        let decision = DecisionContext {
            dataset: self.dataset,
            history: &self.history,
            extensions: &extensions,
            depth,
        };
        let item = self
            .brancher
            .decide(&decision, &mut self.rng)
            .expect("encountered unexpected missing decision at an inner node");
        self.statistics.decisions += 1;
        for value in [Value::In, Value::Out] {
            let level = self.assignment.bump_decision_level();
            self.assignment
                .assign(item, value)
                .expect("encountered unexpected non-free decision item");
            let flow = self.explore(depth + 1);
            self.assignment.pop_to_level(level);
            if flow != Flow::Continue {
                return flow
            }
        }
        Flow::Continue
    }

    /// Accepts the complete itemset of the current node unless it is forbidden.
    fn accept(&mut self, cover: &Cover) -> Flow {
        let itemset = self.assignment.included();
        if self.config.record_nogoods {
            if self.nogoods.is_forbidden(&itemset) {
                self.statistics.failures += 1;
                trace!("leaf rejected: itemset already accepted");
                return Flow::Continue
            }
            self.nogoods.record(itemset.clone());
        }
        let solution = ItemsetCover::new(itemset, cover.clone());
        debug!(
            "solution {}: {} items, frequency {}",
            self.history.len(),
            solution.itemset().count_ones(),
            solution.frequency(),
        );
        self.history.push(solution);
        self.statistics.solutions += 1;
        if matches!(self.config.limits.solutions, Some(limit) if self.history.len() >= limit) {
            return Flow::Stop(Completion::LimitReached)
        }
        if self.config.restart_on_solution {
            return Flow::Restart
        }
        Flow::Continue
    }
}
