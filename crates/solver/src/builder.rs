use crate::{
    Dataset,
    Error,
    Item,
};

/// Marks the end of the transactions; everything after it is ignored.
const END_MARKER: &str = "[EOF]";

/// Incrementally collects transaction lines into a [`Dataset`].
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    len_items: usize,
    transactions: Vec<Vec<Item>>,
}

impl DatasetBuilder {
    /// Returns `true` if the line carries no transaction.
    fn is_comment(line: &str) -> bool {
        matches!(line.chars().next(), None | Some('#' | '%' | '@'))
    }

    /// Consumes one line of input with the given 1-based line number.
    ///
    /// Returns `false` once the end marker has been reached.
    ///
    /// # Errors
    ///
    /// If the line contains a token that is not a positive item id.
    pub fn push_line(&mut self, line_number: usize, line: &str) -> Result<bool, Error> {
        let line = line.trim();
        if line == END_MARKER {
            return Ok(false)
        }
        if Self::is_comment(line) {
            return Ok(true)
        }
        let items = line
            .split_whitespace()
            .map(|token| {
                token
                    .parse::<usize>()
                    .ok()
                    .and_then(Item::from_one_based)
                    .ok_or_else(|| {
                        Error::InvalidItem {
                            line: line_number,
                            token: token.to_string(),
                        }
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        for item in &items {
            self.len_items = self.len_items.max(item.one_based());
        }
        self.transactions.push(items);
        Ok(true)
    }

    /// Builds the vertical index of all consumed transactions.
    ///
    /// # Errors
    ///
    /// If no transaction has been consumed.
    pub fn finalize(self) -> Result<Dataset, Error> {
        if self.transactions.is_empty() {
            return Err(Error::EmptyDataset)
        }
        Ok(Dataset::from_transactions(self.len_items, self.transactions))
    }
}
