use super::{
    argmin,
    Brancher,
    DecisionContext,
};
use crate::{
    Dataset,
    Item,
    Transaction,
};
use bounded::BoundedArray;
use rand::rngs::SmallRng;

/// Steers the search towards transactions rarely covered by the history.
///
/// Counts for every transaction how many history entries cover it and
/// chooses the free item whose projected cover has the smallest total count.
#[derive(Debug, Clone)]
pub struct TransactionWeight {
    counts: BoundedArray<Transaction, u64>,
    /// The number of history entries already counted.
    seen: usize,
}

impl TransactionWeight {
    pub fn new(dataset: &Dataset) -> Self {
        Self {
            counts: BoundedArray::with_len(dataset.len_transactions(), |_| 0),
            seen: 0,
        }
    }

    /// Returns how many counted history entries cover the transaction.
    pub fn count(&self, transaction: Transaction) -> u64 {
        self.counts[transaction]
    }
}

impl Brancher for TransactionWeight {
    fn decide(&mut self, context: &DecisionContext, _rng: &mut SmallRng) -> Option<Item> {
        for entry in context.history.iter().skip(self.seen) {
            for transaction in entry.cover().iter_ones() {
                self.counts[transaction] += 1;
            }
        }
        self.seen = context.history.len();
        let counts = &self.counts;
        argmin(context.extensions.projections().map(|(item, projection)| {
            let weight = projection
                .iter_ones()
                .map(|transaction| counts[transaction])
                .sum::<u64>();
            (item, weight as f64)
        }))
    }
}
