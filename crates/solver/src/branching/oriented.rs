use super::{
    argmin,
    BoundKind,
    Brancher,
    DecisionContext,
};
use crate::{
    Cover,
    Dataset,
    History,
    Item,
    ItemsetCover,
};
use bounded::BoundedArray;
use rand::{
    rngs::SmallRng,
    Rng,
};

/// Keeps sampling weights finite for items dissimilar to the whole history.
const EPSILON: f64 = 1e-9;

/// The running maximum similarity of one root projection to the history.
#[derive(Debug, Default, Copy, Clone)]
struct RootScore {
    max: f64,
    /// The number of history entries folded into `max`.
    seen: usize,
}

/// Steers the search away from the history.
///
/// Scores every free item by the maximum similarity of its projected cover
/// to any history entry. The root scores are cached across restarts and
/// only updated with the entries accepted since.
#[derive(Debug, Clone)]
pub struct Oriented {
    bound: BoundKind,
    randomized: bool,
    theta: usize,
    root: BoundedArray<Item, RootScore>,
}

impl Oriented {
    /// Always chooses the least similar free item.
    pub fn deterministic(bound: BoundKind, dataset: &Dataset, theta: usize) -> Self {
        Self::new(bound, false, dataset, theta)
    }

    /// Samples free items with weight `1 / (score + ε)`.
    pub fn randomized(bound: BoundKind, dataset: &Dataset, theta: usize) -> Self {
        Self::new(bound, true, dataset, theta)
    }

    fn new(bound: BoundKind, randomized: bool, dataset: &Dataset, theta: usize) -> Self {
        Self {
            bound,
            randomized,
            theta,
            root: BoundedArray::with_len(dataset.len_items(), |_| RootScore::default()),
        }
    }

    /// Returns the maximum similarity of the projection to the given entries.
    fn max_similarity<'a, I>(&self, projection: &Cover, entries: I) -> f64
    where
        I: IntoIterator<Item = &'a ItemsetCover>,
    {
        entries
            .into_iter()
            .map(|entry| self.bound.similarity(projection, entry.cover(), self.theta))
            .fold(0.0, f64::max)
    }

    /// Folds the entries accepted since the last root decision into the score.
    fn root_score(&mut self, item: Item, projection: &Cover, history: &History) -> f64 {
        let cached = self.root[item];
        let fresh = self.max_similarity(projection, history.iter().skip(cached.seen));
        let updated = RootScore {
            max: cached.max.max(fresh),
            seen: history.len(),
        };
        self.root[item] = updated;
        updated.max
    }

    fn scores(&mut self, context: &DecisionContext) -> Vec<(Item, f64)> {
        let history = context.history;
        context
            .extensions
            .projections()
            .map(|(item, projection)| {
                let score = if context.depth == 0 {
                    self.root_score(item, projection, history)
                } else {
                    self.max_similarity(projection, history)
                };
                (item, score)
            })
            .collect()
    }
}

/// Samples an item with probability proportional to its weight.
fn roulette(weights: &[(Item, f64)], rng: &mut SmallRng) -> Option<Item> {
    let total = weights.iter().map(|&(_, weight)| weight).sum::<f64>();
    let mut remaining = rng.gen::<f64>() * total;
    let last = weights.len().checked_sub(1)?;
    let mut chosen = 0;
    while chosen < last && remaining >= weights[chosen].1 {
        remaining -= weights[chosen].1;
        chosen += 1;
    }
    Some(weights[chosen].0)
}

impl Brancher for Oriented {
    fn decide(&mut self, context: &DecisionContext, rng: &mut SmallRng) -> Option<Item> {
        let scores = self.scores(context);
        if !self.randomized {
            return argmin(scores)
        }
        let weights = scores
            .into_iter()
            .map(|(item, score)| (item, 1.0 / (score + EPSILON)))
            .collect::<Vec<_>>();
        roulette(&weights, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bounded::Index as _;
    use rand::SeedableRng;

    #[test]
    fn roulette_follows_weights() {
        let mut rng = SmallRng::seed_from_u64(5);
        let weights = [(Item::from_index(0), 1.0), (Item::from_index(1), 3.0)];
        let mut second = 0;
        for _ in 0..4000 {
            if roulette(&weights, &mut rng) == Some(Item::from_index(1)) {
                second += 1;
            }
        }
        assert!((2700..3300).contains(&second), "second chosen {} times", second);
        assert_eq!(roulette(&[], &mut rng), None);
    }
}
