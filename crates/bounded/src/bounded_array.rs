use super::{
    Index,
    OutOfBoundsAccess,
};
use alloc::vec::Vec;
use core::{
    iter::FromIterator,
    marker::PhantomData,
    ops,
};

/// A fixed length array that is accessed through typed indices.
///
/// Holds one slot per item or per transaction of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoundedArray<Idx, T> {
    values: Vec<T>,
    marker: PhantomData<fn() -> Idx>,
}

impl<Idx, T> Default for BoundedArray<Idx, T> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            marker: Default::default(),
        }
    }
}

impl<Idx, T> FromIterator<T> for BoundedArray<Idx, T> {
    fn from_iter<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self {
            values: values.into_iter().collect(),
            marker: Default::default(),
        }
    }
}

impl<Idx, T> BoundedArray<Idx, T> {
    /// Returns the length of the bounded array.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the bounded array has no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the values of the bounded array as slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    /// Returns the values of the bounded array as exclusive slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// Returns an iterator yielding shared references over the array values.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<T> {
        self.values.iter()
    }

    /// Returns an iterator yielding exclusive references over the array values.
    #[inline]
    pub fn iter_mut(&mut self) -> core::slice::IterMut<T> {
        self.values.iter_mut()
    }
}

impl<Idx, T> BoundedArray<Idx, T>
where
    Idx: Index,
{
    /// Creates a new bounded array with the given length.
    ///
    /// Every slot is initialized by calling `placeholder` with its index.
    pub fn with_len<F>(len: usize, mut placeholder: F) -> Self
    where
        F: FnMut(Idx) -> T,
    {
        Self {
            values: (0..len)
                .map(|idx| placeholder(Idx::from_index(idx)))
                .collect(),
            marker: Default::default(),
        }
    }

    /// Ensures that the given index is valid for the bounded array.
    ///
    /// # Errors
    ///
    /// If the given index is out of bounds.
    fn ensure_valid_index(&self, index: Idx) -> Result<usize, OutOfBoundsAccess> {
        let index = index.into_index();
        if index >= self.len() {
            return Err(OutOfBoundsAccess)
        }
        Ok(index)
    }

    /// Replaces the value at the given index and returns the old one.
    ///
    /// # Errors
    ///
    /// If the given index is out of bounds for the bounded array.
    #[inline]
    pub fn replace(&mut self, index: Idx, new_value: T) -> Result<T, OutOfBoundsAccess> {
        self.ensure_valid_index(index)
            .map(move |index| core::mem::replace(&mut self.values[index], new_value))
    }

    /// Returns a shared reference to the element at the given index.
    ///
    /// # Errors
    ///
    /// If the given index is out of bounds for the bounded array.
    #[inline]
    pub fn get(&self, index: Idx) -> Result<&T, OutOfBoundsAccess> {
        self.ensure_valid_index(index)
            .map(move |index| &self.values[index])
    }

    /// Returns an exclusive reference to the element at the given index.
    ///
    /// # Errors
    ///
    /// If the given index is out of bounds for the bounded array.
    #[inline]
    pub fn get_mut(&mut self, index: Idx) -> Result<&mut T, OutOfBoundsAccess> {
        self.ensure_valid_index(index)
            .map(move |index| &mut self.values[index])
    }

    /// Returns an iterator over the indices and shared values of the array.
    #[inline]
    pub fn enumerate(&self) -> impl Iterator<Item = (Idx, &T)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(index, value)| (Idx::from_index(index), value))
    }
}

impl<Idx, T> ops::Index<Idx> for BoundedArray<Idx, T>
where
    Idx: Index,
{
    type Output = T;

    /// Returns a shared reference to the value at the given index.
    ///
    /// # Panics
    ///
    /// If the index is out of bounds.
    #[inline]
    fn index(&self, index: Idx) -> &Self::Output {
        self.get(index).expect("encountered out of bounds index")
    }
}

impl<Idx, T> ops::IndexMut<Idx> for BoundedArray<Idx, T>
where
    Idx: Index,
{
    /// Returns an exclusive reference to the value at the given index.
    ///
    /// # Panics
    ///
    /// If the index is out of bounds.
    #[inline]
    fn index_mut(&mut self, index: Idx) -> &mut Self::Output {
        self.get_mut(index).expect("encountered out of bounds index")
    }
}
