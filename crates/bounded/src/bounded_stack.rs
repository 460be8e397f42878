use super::OutOfBoundsAccess;
use alloc::vec::Vec;

/// A stack that never grows beyond the capacity it was created with.
///
/// Used to record the order in which items are assigned so that they can be
/// unassigned in reverse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedStack<T> {
    capacity: usize,
    stack: Vec<T>,
}

impl<T> Default for BoundedStack<T> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<T> BoundedStack<T> {
    /// Creates a new empty bounded stack that can hold up to `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            stack: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of values on the stack.
    #[inline]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Returns `true` if the bounded stack is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Pushes the value to the bounded stack.
    ///
    /// # Errors
    ///
    /// If the bounded stack is full already.
    #[inline]
    pub fn try_push(&mut self, new_value: T) -> Result<(), OutOfBoundsAccess> {
        if self.len() == self.capacity {
            return Err(OutOfBoundsAccess)
        }
        self.stack.push(new_value);
        Ok(())
    }

    /// Pushes the value to the bounded stack.
    ///
    /// # Panics
    ///
    /// If the bounded stack is full already.
    #[inline]
    pub fn push(&mut self, new_value: T) {
        let capacity = self.capacity;
        self.try_push(new_value).unwrap_or_else(|_| {
            panic!(
                "pushed more elements to bounded stack than its capacity of {}",
                capacity
            )
        })
    }

    /// Pops the most recently pushed value if any.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.stack.pop()
    }

    /// Returns the values from the oldest to the most recent.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.stack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_respects_capacity() {
        let mut stack = <BoundedStack<u32>>::with_capacity(2);
        assert!(stack.is_empty());
        assert_eq!(stack.try_push(7), Ok(()));
        stack.push(3);
        assert_eq!(stack.try_push(5), Err(OutOfBoundsAccess));
        assert_eq!(stack.as_slice(), &[7, 3]);
    }

    #[test]
    fn pop_returns_values_in_reverse() {
        let mut stack = <BoundedStack<u32>>::with_capacity(3);
        for value in [4, 0, 2] {
            stack.push(value);
        }
        assert_eq!(stack.pop(), Some(2));
        assert_eq!(stack.pop(), Some(0));
        assert_eq!(stack.len(), 1);
        stack.push(1);
        assert_eq!(stack.as_slice(), &[4, 1]);
    }

    #[test]
    fn default_holds_nothing() {
        struct Opaque;
        let mut stack = <BoundedStack<Opaque>>::default();
        assert!(stack.is_empty());
        assert_eq!(stack.try_push(Opaque), Err(OutOfBoundsAccess));
    }

    #[test]
    #[should_panic]
    fn push_beyond_capacity_panics() {
        let mut stack = <BoundedStack<u32>>::with_capacity(0);
        stack.push(1);
    }
}
