use super::{
    BoundedArray,
    Index,
    OutOfBoundsAccess,
};
use core::{
    fmt,
    marker::PhantomData,
};

/// The underlying word type of the bounded bitmap.
pub type Chunk = u64;

/// The number of bits stored in a single chunk.
pub const CHUNK_LEN: usize = core::mem::size_of::<Chunk>() * 8;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
struct ChunkIndex {
    value: usize,
}

impl Index for ChunkIndex {
    #[inline]
    fn from_index(index: usize) -> Self {
        Self { value: index }
    }

    #[inline]
    fn into_index(self) -> usize {
        self.value
    }
}

/// A set of indices within a fixed universe `0..len` packed into 64-bit words.
///
/// Bits beyond `len` in the last chunk are always zero so that equality,
/// hashing and counting work on whole chunks.
#[derive(PartialEq, Eq, Hash)]
pub struct BoundedBitmap<Idx> {
    len: usize,
    chunks: BoundedArray<ChunkIndex, Chunk>,
    marker: PhantomData<fn() -> Idx>,
}

impl<Idx> Clone for BoundedBitmap<Idx> {
    fn clone(&self) -> Self {
        Self {
            len: self.len,
            chunks: self.chunks.clone(),
            marker: Default::default(),
        }
    }
}

impl<Idx> Default for BoundedBitmap<Idx> {
    fn default() -> Self {
        Self {
            len: 0,
            chunks: BoundedArray::default(),
            marker: Default::default(),
        }
    }
}

impl<Idx> fmt::Debug for BoundedBitmap<Idx> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.ones_raw()).finish()
    }
}

impl<Idx> BoundedBitmap<Idx> {
    /// Returns the number of chunks required to store `len` bits.
    #[inline]
    pub fn required_chunks(len: usize) -> usize {
        (len + CHUNK_LEN - 1) / CHUNK_LEN
    }

    /// Creates a bitmap over `0..len` with no bits set.
    pub fn with_len(len: usize) -> Self {
        Self {
            len,
            chunks: BoundedArray::with_len(Self::required_chunks(len), |_| 0),
            marker: Default::default(),
        }
    }

    /// Creates a bitmap over `0..len` with every bit set.
    pub fn full(len: usize) -> Self {
        let mut bitmap = Self {
            len,
            chunks: BoundedArray::with_len(Self::required_chunks(len), |_| !0),
            marker: Default::default(),
        };
        bitmap.clear_tail();
        bitmap
    }

    /// Creates a bitmap over `0..len` from its raw chunks.
    ///
    /// Bits beyond `len` are discarded.
    ///
    /// # Panics
    ///
    /// If the number of chunks does not match `len`.
    pub fn from_chunks<I>(len: usize, chunks: I) -> Self
    where
        I: IntoIterator<Item = Chunk>,
    {
        let chunks = chunks.into_iter().collect::<BoundedArray<ChunkIndex, Chunk>>();
        assert_eq!(
            chunks.len(),
            Self::required_chunks(len),
            "encountered unexpected number of chunks for a bitmap of length {}",
            len,
        );
        let mut bitmap = Self {
            len,
            chunks,
            marker: Default::default(),
        };
        bitmap.clear_tail();
        bitmap
    }

    /// Zeroes all bits of the last chunk that lie beyond `len`.
    fn clear_tail(&mut self) {
        let used = self.len % CHUNK_LEN;
        if used != 0 {
            if let Some(last) = self.chunks.as_mut_slice().last_mut() {
                *last &= (1 << used) - 1;
            }
        }
    }

    /// Returns the size of the universe of the bitmap.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the universe of the bitmap is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the raw chunks of the bitmap.
    #[inline]
    pub fn chunks(&self) -> &[Chunk] {
        self.chunks.as_slice()
    }

    /// Returns the number of set bits.
    pub fn count_ones(&self) -> usize {
        self.chunks
            .iter()
            .map(|chunk| chunk.count_ones() as usize)
            .sum()
    }

    /// Returns `true` if at least one bit is set.
    pub fn any(&self) -> bool {
        self.chunks.iter().any(|&chunk| chunk != 0)
    }

    /// Returns `true` if every bit set in `self` is also set in `other`.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        debug_assert_eq!(self.len, other.len);
        self.chunks
            .iter()
            .zip(other.chunks.iter())
            .all(|(lhs, rhs)| lhs & !rhs == 0)
    }

    /// Returns `|self ∩ other|` without allocating.
    pub fn intersection_len(&self, other: &Self) -> usize {
        debug_assert_eq!(self.len, other.len);
        self.chunks
            .iter()
            .zip(other.chunks.iter())
            .map(|(lhs, rhs)| (lhs & rhs).count_ones() as usize)
            .sum()
    }

    /// Returns `|self \ other|` without allocating.
    pub fn difference_len(&self, other: &Self) -> usize {
        debug_assert_eq!(self.len, other.len);
        self.chunks
            .iter()
            .zip(other.chunks.iter())
            .map(|(lhs, rhs)| (lhs & !rhs).count_ones() as usize)
            .sum()
    }

    /// Keeps only the bits that are also set in `other`.
    pub fn intersect_with(&mut self, other: &Self) {
        debug_assert_eq!(self.len, other.len);
        for (lhs, rhs) in self.chunks.iter_mut().zip(other.chunks.iter()) {
            *lhs &= rhs;
        }
    }

    /// Clears all bits that are set in `other`.
    pub fn difference_with(&mut self, other: &Self) {
        debug_assert_eq!(self.len, other.len);
        for (lhs, rhs) in self.chunks.iter_mut().zip(other.chunks.iter()) {
            *lhs &= !rhs;
        }
    }

    /// Sets all bits that are set in `other`.
    pub fn union_with(&mut self, other: &Self) {
        debug_assert_eq!(self.len, other.len);
        for (lhs, rhs) in self.chunks.iter_mut().zip(other.chunks.iter()) {
            *lhs |= rhs;
        }
    }

    /// Returns the intersection of `self` and `other` as new bitmap.
    pub fn intersection(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.intersect_with(other);
        result
    }

    /// Clears every bit of the bitmap.
    pub fn clear(&mut self) {
        for chunk in self.chunks.iter_mut() {
            *chunk = 0;
        }
    }

    fn ones_raw(&self) -> RawOnes {
        RawOnes {
            chunks: self.chunks.as_slice(),
            offset: 0,
            current: self.chunks.as_slice().first().copied().unwrap_or(0),
        }
    }

    fn split_index(index: usize) -> (ChunkIndex, Chunk) {
        (
            ChunkIndex::from_index(index / CHUNK_LEN),
            1 << (index % CHUNK_LEN),
        )
    }
}

impl<Idx> BoundedBitmap<Idx>
where
    Idx: Index,
{
    /// Creates a bitmap over `0..len` with the given indices set.
    ///
    /// # Errors
    ///
    /// If any of the indices is out of bounds.
    pub fn from_indices<I>(len: usize, indices: I) -> Result<Self, OutOfBoundsAccess>
    where
        I: IntoIterator<Item = Idx>,
    {
        let mut bitmap = Self::with_len(len);
        for index in indices {
            bitmap.set(index, true)?;
        }
        Ok(bitmap)
    }

    /// Ensures that the given index is valid for the bounded bitmap.
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

    /// Returns `true` if the bit at the given index is set.
    ///
    /// # Errors
    ///
    /// If the given index is out of bounds.
    #[inline]
    pub fn get(&self, index: Idx) -> Result<bool, OutOfBoundsAccess> {
        let index = self.ensure_valid_index(index)?;
        let (chunk_idx, mask) = Self::split_index(index);
        let chunk = self
            .chunks
            .get(chunk_idx)
            .expect("encountered unexpected out of bounds chunk");
        Ok(chunk & mask != 0)
    }

    /// Returns `true` if the bit at the given index is set.
    ///
    /// # Panics
    ///
    /// If the given index is out of bounds.
    #[inline]
    pub fn contains(&self, index: Idx) -> bool {
        self.get(index).expect("encountered out of bounds index")
    }

    /// Sets the bit at the given index to the new value.
    ///
    /// # Errors
    ///
    /// If the given index is out of bounds.
    #[inline]
    pub fn set(&mut self, index: Idx, new_value: bool) -> Result<(), OutOfBoundsAccess> {
        let index = self.ensure_valid_index(index)?;
        let (chunk_idx, mask) = Self::split_index(index);
        let chunk = self
            .chunks
            .get_mut(chunk_idx)
            .expect("encountered unexpected out of bounds chunk");
        if new_value {
            *chunk |= mask;
        } else {
            *chunk &= !mask;
        }
        Ok(())
    }

    /// Returns an iterator over the indices of all set bits in ascending order.
    #[inline]
    pub fn iter_ones(&self) -> Ones<Idx> {
        Ones {
            raw: self.ones_raw(),
            marker: Default::default(),
        }
    }
}

struct RawOnes<'a> {
    chunks: &'a [Chunk],
    offset: usize,
    current: Chunk,
}

impl<'a> Iterator for RawOnes<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(self.offset * CHUNK_LEN + bit)
            }
            self.offset += 1;
            self.current = *self.chunks.get(self.offset)?;
        }
    }
}

/// Iterator over the set bits of a [`BoundedBitmap`].
pub struct Ones<'a, Idx> {
    raw: RawOnes<'a>,
    marker: PhantomData<fn() -> Idx>,
}

impl<'a, Idx> Iterator for Ones<'a, Idx>
where
    Idx: Index,
{
    type Item = Idx;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.raw.next().map(Idx::from_index)
    }
}
