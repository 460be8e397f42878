use crate::{
    builder::DatasetBuilder,
    Cover,
    Error,
    Item,
    Transaction,
};
use bounded::{
    BoundedArray,
    Index as _,
};
use std::io::BufRead;

/// A transactional dataset stored as vertical index.
///
/// For every item the dataset stores the set of transactions containing it.
/// The dataset is immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    vertical: BoundedArray<Item, Cover>,
    all_transactions: Cover,
}

impl Dataset {
    /// Builds the vertical index of the given horizontal transactions.
    ///
    /// # Panics
    ///
    /// If a transaction contains an item whose index is not below `len_items`.
    pub fn from_transactions<T, I>(len_items: usize, transactions: T) -> Self
    where
        T: IntoIterator<Item = I>,
        I: IntoIterator<Item = Item>,
    {
        let transactions = transactions
            .into_iter()
            .map(|items| items.into_iter().collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let len_transactions = transactions.len();
        let mut vertical =
            BoundedArray::with_len(len_items, |_| Cover::with_len(len_transactions));
        for (index, items) in transactions.iter().enumerate() {
            let transaction = Transaction::from_index(index);
            for &item in items {
                vertical[item]
                    .set(transaction, true)
                    .expect("encountered unexpected out of bounds transaction");
            }
        }
        Self {
            vertical,
            all_transactions: Cover::full(len_transactions),
        }
    }

    /// Parses a dataset from its textual representation.
    ///
    /// # Errors
    ///
    /// If a line contains an invalid item or there are no transactions.
    pub fn parse(input: &str) -> Result<Self, Error> {
        Self::from_reader(input.as_bytes())
    }

    /// Parses a dataset from the given reader.
    ///
    /// # Errors
    ///
    /// If reading fails, a line contains an invalid item or there are no transactions.
    pub fn from_reader<R>(reader: R) -> Result<Self, Error>
    where
        R: BufRead,
    {
        let mut builder = DatasetBuilder::default();
        for (index, line) in reader.lines().enumerate() {
            if !builder.push_line(index + 1, &line?)? {
                break
            }
        }
        builder.finalize()
    }

    /// Returns the number of items.
    #[inline]
    pub fn len_items(&self) -> usize {
        self.vertical.len()
    }

    /// Returns the number of transactions.
    #[inline]
    pub fn len_transactions(&self) -> usize {
        self.all_transactions.len()
    }

    /// Returns an iterator over all items in ascending order.
    pub fn items(&self) -> impl Iterator<Item = Item> {
        (0..self.len_items()).map(Item::from_index)
    }

    /// Returns the set of transactions containing the item.
    ///
    /// # Panics
    ///
    /// If the item does not belong to the dataset.
    #[inline]
    pub fn vertical(&self, item: Item) -> &Cover {
        &self.vertical[item]
    }

    /// Returns the set of all transactions, the cover of the empty itemset.
    #[inline]
    pub fn all_transactions(&self) -> &Cover {
        &self.all_transactions
    }

    /// Converts a frequency threshold in percent into a transaction count.
    ///
    /// Rounds up so that the threshold is never undercut.
    pub fn min_frequency(&self, percent: f64) -> usize {
        (percent * self.len_transactions() as f64 / 100.0).ceil() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bounded::Index as _;

    #[test]
    fn parse_builds_vertical_index() {
        let dataset = Dataset::parse("1 2\n2 3\n\n# comment\n3\n").unwrap();
        assert_eq!(dataset.len_items(), 3);
        assert_eq!(dataset.len_transactions(), 3);
        let vertical = |id| {
            dataset
                .vertical(Item::from_one_based(id).unwrap())
                .iter_ones()
                .map(|t: Transaction| t.into_index())
                .collect::<Vec<_>>()
        };
        assert_eq!(vertical(1), [0]);
        assert_eq!(vertical(2), [0, 1]);
        assert_eq!(vertical(3), [1, 2]);
        assert_eq!(dataset.all_transactions().count_ones(), 3);
    }

    #[test]
    fn min_frequency_rounds_up() {
        let dataset = Dataset::parse("1\n1\n1\n1\n1\n1\n1\n").unwrap();
        assert_eq!(dataset.min_frequency(0.0), 0);
        assert_eq!(dataset.min_frequency(10.0), 1);
        assert_eq!(dataset.min_frequency(50.0), 4);
        assert_eq!(dataset.min_frequency(100.0), 7);
    }
}
