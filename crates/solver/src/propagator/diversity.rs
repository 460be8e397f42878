use super::{
    running::RunningCover,
    Context,
    Extensions,
    Fail,
    FailReason,
    Propagator,
    Rules,
};
use crate::{
    covers::{
        CoverIndex,
        CoverStats,
    },
    jaccard,
    Assignment,
    Cell,
    Cover,
    Dataset,
    DiversityConfig,
    History,
    ItemsetCover,
};

/// Returns `true` if the lower bound of `cover` against an entry violates the bound.
fn lb_violated<'a, I>(cover: &Cover, entries: I, theta: usize, bound: f64) -> bool
where
    I: IntoIterator<Item = &'a ItemsetCover>,
{
    entries
        .into_iter()
        .any(|entry| jaccard::violates(jaccard::lb(cover, entry.cover(), theta), bound))
}

/// Returns `true` if the exact similarity of `cover` to an entry violates the bound.
fn exact_violated<'a, I>(cover: &Cover, entries: I, bound: f64) -> bool
where
    I: IntoIterator<Item = &'a ItemsetCover>,
{
    entries
        .into_iter()
        .any(|entry| jaccard::violates(jaccard::exact(cover, entry.cover()), bound))
}

/// Enforces closedness, frequency and diversity, recomputing every node.
pub struct ClosedDiversity {
    rules: Rules,
    diversity: DiversityConfig,
    covers: Box<dyn CoverIndex>,
}

impl ClosedDiversity {
    pub fn new(rules: Rules, diversity: DiversityConfig, covers: Box<dyn CoverIndex>) -> Self {
        Self {
            rules,
            diversity,
            covers,
        }
    }
}

impl Propagator for ClosedDiversity {
    fn propagate(
        &mut self,
        context: &Context,
        assignment: &mut Assignment,
    ) -> Result<Extensions, Fail> {
        let theta = self.rules.min_frequency;
        let bound = self.diversity.bound;
        let history = context.history;
        let cover = self
            .covers
            .cover_of(context.dataset, &assignment.included());
        if lb_violated(&cover, history, theta, bound) {
            return Err(Fail::new(FailReason::Similarity))
        }
        let extensions = self.rules.apply(
            context.dataset,
            assignment,
            cover,
            |_, _, projection| projection.count_ones() >= theta,
            |projection| !lb_violated(projection, history, theta, bound),
        )?;
        self.covers
            .remember(&assignment.included(), extensions.cover());
        if self.diversity.check_exact
            && extensions.is_leaf()
            && exact_violated(extensions.cover(), history, bound)
        {
            return Err(Fail::new(FailReason::ExactSimilarity))
        }
        Ok(extensions)
    }

    fn cover_stats(&self) -> Option<CoverStats> {
        Some(self.covers.stats())
    }
}

/// Enforces closedness, frequency and diversity on backtrackable state.
///
/// History entries that no descendant of a node can violate are retired:
/// they are swapped in front of a working order and skipped until the
/// search backtracks above the node that retired them.
pub struct IncrementalClosedDiversity {
    rules: Rules,
    diversity: DiversityConfig,
    running: RunningCover,
    /// Permutation of the history indices; retired entries come first.
    order: Vec<usize>,
    /// The number of retired entries at the front of `order`.
    retired: Cell,
}

impl IncrementalClosedDiversity {
    /// Allocates the backtrackable state in `assignment`.
    pub fn new(
        rules: Rules,
        diversity: DiversityConfig,
        dataset: &Dataset,
        assignment: &mut Assignment,
    ) -> Self {
        Self {
            rules,
            diversity,
            running: RunningCover::new(dataset, assignment),
            order: Vec::new(),
            retired: assignment.alloc_cell(0),
        }
    }

    /// Retires entries that can no longer be violated and checks the rest.
    ///
    /// `boundary` is the number of entries retired by ancestors of the node.
    /// Returns the number of retired entries.
    fn retire(
        &mut self,
        cover: &Cover,
        history: &History,
        mut boundary: usize,
    ) -> Result<usize, Fail> {
        let theta = self.rules.min_frequency;
        let bound = self.diversity.bound;
        let len_cover = cover.count_ones();
        let order = &mut self.order;
        let known = order.len();
        order.extend(known..history.len());
        for position in boundary..order.len() {
            let entry = history[order[position]].cover();
            let bounds = jaccard::lb_and_ub_descendants(cover, len_cover, entry, theta);
            if self.diversity.retire_by_upper_bound && bounds.upper < bound {
                order.swap(boundary, position);
                boundary += 1;
                continue
            }
            if jaccard::violates(bounds.lower, bound) {
                return Err(Fail::new(FailReason::Similarity))
            }
        }
        Ok(boundary)
    }
}

impl Propagator for IncrementalClosedDiversity {
    fn propagate(
        &mut self,
        context: &Context,
        assignment: &mut Assignment,
    ) -> Result<Extensions, Fail> {
        let rules = self.rules;
        let theta = rules.min_frequency;
        let bound = self.diversity.bound;
        let history = context.history;
        let cover = self.running.sync(context.dataset, assignment);
        let retired = assignment.cell(self.retired) as usize;
        let boundary = self.retire(&cover, history, retired)?;
        assignment.set_cell(self.retired, boundary as u64);
        let running = &self.running;
        let removed = running.removed(&cover);
        let order = &self.order[boundary..];
        let active = move || order.iter().map(move |&index| &history[index]);
        let extensions = rules.apply(
            context.dataset,
            assignment,
            cover,
            |assignment, item, projection| {
                running.is_frequent(assignment, item, projection, removed, theta)
            },
            |projection| !lb_violated(projection, active(), theta, bound),
        )?;
        running.mark_synced(assignment);
        if self.diversity.check_exact
            && extensions.is_leaf()
            && exact_violated(extensions.cover(), active(), bound)
        {
            return Err(Fail::new(FailReason::ExactSimilarity))
        }
        Ok(extensions)
    }
}
