use super::{
    BoundedArray,
    Index,
    OutOfBoundsAccess,
};
use core::marker::PhantomData;

/// A map from index-like keys below a fixed capacity to values.
///
/// Iterates in ascending key order regardless of insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedMap<K, V> {
    /// The current number of occupied slots.
    len: usize,
    /// The slots of the bounded map, one per possible key.
    slots: BoundedArray<K, Option<V>>,
    marker: PhantomData<fn() -> K>,
}

impl<K, V> BoundedMap<K, V> {
    /// Returns the number of stored mappings.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the bounded map has no mappings.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> BoundedMap<K, V>
where
    K: Index,
{
    /// Creates a new bounded map for the keys `0..capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            len: 0,
            slots: BoundedArray::with_len(capacity, |_| None),
            marker: Default::default(),
        }
    }

    /// Inserts the given value for the key and returns the old value if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the key's index is out of bounds.
    #[inline]
    pub fn insert(&mut self, key: K, new_value: V) -> Result<Option<V>, OutOfBoundsAccess> {
        let old_value = self.slots.get_mut(key)?.replace(new_value);
        if old_value.is_none() {
            self.len += 1;
        }
        Ok(old_value)
    }

    /// Takes the value of the given key and returns it if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the key's index is out of bounds.
    #[inline]
    pub fn take(&mut self, key: K) -> Result<Option<V>, OutOfBoundsAccess> {
        let old_value = self.slots.get_mut(key)?.take();
        if old_value.is_some() {
            self.len -= 1;
        }
        Ok(old_value)
    }

    /// Returns a shared reference to the value for the given key if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the key's index is out of bounds.
    #[inline]
    pub fn get(&self, key: K) -> Result<Option<&V>, OutOfBoundsAccess> {
        self.slots.get(key).map(Option::as_ref)
    }

    /// Returns an iterator over the occupied keys in ascending order.
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the key and value pairs in ascending key order.
    #[inline]
    pub fn iter(&self) -> Iter<K, V> {
        Iter::new(self)
    }
}

/// Iterator over the occupied slots of a [`BoundedMap`].
pub struct Iter<'a, K, V> {
    iter: core::iter::Enumerate<core::slice::Iter<'a, Option<V>>>,
    marker: PhantomData<fn() -> K>,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn new(bounded_map: &'a BoundedMap<K, V>) -> Self {
        Self {
            iter: bounded_map.slots.iter().enumerate(),
            marker: Default::default(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V>
where
    K: Index,
{
    type Item = (K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        'find: loop {
            match self.iter.next() {
                Some((index, Some(value))) => return Some((K::from_index(index), value)),
                Some((_, None)) => continue 'find,
                None => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn iterates_in_ascending_key_order() {
        let mut map = <BoundedMap<usize, &str>>::with_capacity(6);
        assert!(map.is_empty());
        assert_eq!(map.insert(4, "e"), Ok(None));
        assert_eq!(map.insert(0, "a"), Ok(None));
        assert_eq!(map.insert(2, "c"), Ok(None));
        assert_eq!(map.keys().collect::<Vec<_>>(), [0, 2, 4]);
        assert_eq!(map.iter().map(|(_, value)| *value).collect::<Vec<_>>(), ["a", "c", "e"]);
    }

    #[test]
    fn insert_and_take_track_len() {
        let mut map = <BoundedMap<usize, u64>>::with_capacity(4);
        assert_eq!(map.insert(3, 30), Ok(None));
        assert_eq!(map.insert(1, 10), Ok(None));
        assert_eq!(map.insert(1, 11), Ok(Some(10)));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(1), Ok(Some(&11)));
        assert_eq!(map.take(1), Ok(Some(11)));
        assert_eq!(map.take(1), Ok(None));
        assert_eq!(map.get(1), Ok(None));
        assert_eq!(map.len(), 1);
        assert_eq!(map.insert(4, 40), Err(OutOfBoundsAccess));
        assert_eq!(map.get(4), Err(OutOfBoundsAccess));
    }
}
