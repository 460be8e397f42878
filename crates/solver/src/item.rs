use bounded::{
    BoundedBitmap,
    Index,
};
use core::{
    convert::TryFrom,
    fmt,
    ops::Not,
};

/// An item of the dataset.
///
/// Items are 0-based internally and 1-based in every textual format.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Item {
    value: u32,
}

impl Item {
    /// The maximum supported number of unique items.
    pub const MAX_LEN: usize = u32::MAX as usize;

    /// Returns the item for the given 1-based identifier.
    ///
    /// Returns `None` for `0` and for identifiers beyond [`Item::MAX_LEN`].
    pub fn from_one_based(id: usize) -> Option<Self> {
        let index = id.checked_sub(1)?;
        u32::try_from(index).ok().map(|value| Self { value })
    }

    /// Returns the 1-based identifier of the item.
    #[inline]
    pub fn one_based(self) -> usize {
        self.value as usize + 1
    }
}

impl Index for Item {
    #[inline]
    fn from_index(index: usize) -> Self {
        assert!(index < Self::MAX_LEN, "encountered out of range item index {}", index);
        Self {
            value: index as u32,
        }
    }

    #[inline]
    fn into_index(self) -> usize {
        self.value as usize
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.one_based())
    }
}

/// A transaction of the dataset, 0-based.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Transaction {
    value: u32,
}

impl Index for Transaction {
    #[inline]
    fn from_index(index: usize) -> Self {
        assert!(
            index <= u32::MAX as usize,
            "encountered out of range transaction index {}",
            index
        );
        Self {
            value: index as u32,
        }
    }

    #[inline]
    fn into_index(self) -> usize {
        self.value as usize
    }
}

/// The state of the decision variable of an item.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Value {
    /// The item is neither included nor excluded yet.
    Free,
    /// The item is part of the itemset.
    In,
    /// The item is excluded from the itemset.
    Out,
}

impl Default for Value {
    fn default() -> Self {
        Self::Free
    }
}

impl Value {
    /// Returns `true` if the value is [`Value::Free`].
    #[inline]
    pub fn is_free(self) -> bool {
        matches!(self, Self::Free)
    }
}

impl Not for Value {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::Free => Self::Free,
            Self::In => Self::Out,
            Self::Out => Self::In,
        }
    }
}

/// A set of items.
pub type ItemSet = BoundedBitmap<Item>;

/// A set of transactions.
pub type Cover = BoundedBitmap<Transaction>;

/// An itemset together with its cover.
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemsetCover {
    itemset: ItemSet,
    cover: Cover,
    frequency: usize,
}

impl ItemsetCover {
    /// Pairs the itemset with its cover.
    ///
    /// The caller guarantees that `cover` is the cover of `itemset`.
    pub fn new(itemset: ItemSet, cover: Cover) -> Self {
        let frequency = cover.count_ones();
        Self {
            itemset,
            cover,
            frequency,
        }
    }

    /// Returns the itemset.
    #[inline]
    pub fn itemset(&self) -> &ItemSet {
        &self.itemset
    }

    /// Returns the cover of the itemset.
    #[inline]
    pub fn cover(&self) -> &Cover {
        &self.cover
    }

    /// Returns the number of transactions covering the itemset.
    #[inline]
    pub fn frequency(&self) -> usize {
        self.frequency
    }

    /// Returns the items of the itemset as ascending 1-based identifiers.
    pub fn one_based_items(&self) -> impl Iterator<Item = usize> + '_ {
        self.itemset.iter_ones().map(Item::one_based)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_ids_are_one_based() {
        assert_eq!(Item::from_one_based(0), None);
        let item = Item::from_one_based(1).unwrap();
        assert_eq!(item.into_index(), 0);
        assert_eq!(item.one_based(), 1);
        assert_eq!(item.to_string(), "1");
        assert_eq!(Item::from_index(41).one_based(), 42);
    }

    #[test]
    fn value_negation_flips_fixed_values() {
        assert_eq!(!Value::In, Value::Out);
        assert_eq!(!Value::Out, Value::In);
        assert_eq!(!Value::Free, Value::Free);
        assert!(Value::default().is_free());
    }

    #[test]
    fn itemset_cover_caches_frequency() {
        let itemset = ItemSet::from_indices(4, [Item::from_index(1), Item::from_index(3)]).unwrap();
        let cover = Cover::from_indices(5, [0, 2, 4].map(Transaction::from_index)).unwrap();
        let pair = ItemsetCover::new(itemset, cover);
        assert_eq!(pair.frequency(), 3);
        assert_eq!(pair.one_based_items().collect::<Vec<_>>(), [2, 4]);
    }
}
