use super::{
    running::RunningCover,
    Context,
    Extensions,
    Fail,
    Propagator,
    Rules,
};
use crate::{
    covers::{
        CoverIndex,
        CoverStats,
    },
    Assignment,
    Dataset,
};

/// Enforces closedness and frequency, recomputing every node.
pub struct ClosedPattern {
    rules: Rules,
    covers: Box<dyn CoverIndex>,
}

impl ClosedPattern {
    pub fn new(rules: Rules, covers: Box<dyn CoverIndex>) -> Self {
        Self { rules, covers }
    }
}

impl Propagator for ClosedPattern {
    fn propagate(
        &mut self,
        context: &Context,
        assignment: &mut Assignment,
    ) -> Result<Extensions, Fail> {
        let min_frequency = self.rules.min_frequency;
        let cover = self
            .covers
            .cover_of(context.dataset, &assignment.included());
        let extensions = self.rules.apply(
            context.dataset,
            assignment,
            cover,
            |_, _, projection| projection.count_ones() >= min_frequency,
            |_| true,
        )?;
        self.covers
            .remember(&assignment.included(), extensions.cover());
        Ok(extensions)
    }

    fn cover_stats(&self) -> Option<CoverStats> {
        Some(self.covers.stats())
    }
}

/// Enforces closedness and frequency on a backtrackable running cover.
pub struct IncrementalClosedPattern {
    rules: Rules,
    running: RunningCover,
}

impl IncrementalClosedPattern {
    /// Allocates the backtrackable state in `assignment`.
    pub fn new(rules: Rules, dataset: &Dataset, assignment: &mut Assignment) -> Self {
        Self {
            rules,
            running: RunningCover::new(dataset, assignment),
        }
    }
}

impl Propagator for IncrementalClosedPattern {
    fn propagate(
        &mut self,
        context: &Context,
        assignment: &mut Assignment,
    ) -> Result<Extensions, Fail> {
        let min_frequency = self.rules.min_frequency;
        let running = &self.running;
        let cover = running.sync(context.dataset, assignment);
        let removed = running.removed(&cover);
        let extensions = self.rules.apply(
            context.dataset,
            assignment,
            cover,
            |assignment, item, projection| {
                running.is_frequent(assignment, item, projection, removed, min_frequency)
            },
            |_| true,
        )?;
        running.mark_synced(assignment);
        Ok(extensions)
    }
}
