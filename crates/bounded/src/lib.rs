//! Fixed size containers addressed by typed indices.
//!
//! Items and transactions of a dataset are dense indices, so every per item
//! or per transaction table of the miner is one of these containers.

#![forbid(unsafe_code)]
#![no_std]

extern crate alloc;

pub mod bounded_array;
pub mod bounded_bitmap;
pub mod bounded_map;
pub mod bounded_stack;

pub use self::{
    bounded_array::BoundedArray,
    bounded_bitmap::BoundedBitmap,
    bounded_map::BoundedMap,
    bounded_stack::BoundedStack,
};
use core::fmt;

/// Raised when an index lies outside of a bounded container.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OutOfBoundsAccess;

impl fmt::Display for OutOfBoundsAccess {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "out of bounds access")
    }
}

/// Dense identifiers that address slots of the bounded containers.
pub trait Index: Copy + Clone {
    /// Converts a zero-based position into the identifier.
    fn from_index(index: usize) -> Self;
    /// Returns the zero-based position of the identifier.
    fn into_index(self) -> usize;
}

impl Index for usize {
    #[inline]
    fn from_index(index: usize) -> Self {
        index
    }

    #[inline]
    fn into_index(self) -> usize {
        self
    }
}
