//! This module contains utility functionality needed for this crate. Most
//! prominently, it contains the definition of the [DigitSet] used by the
//! generator's legality check and the validator's uniqueness check.

use crate::error::{KenkenError, KenkenResult};

/// A set of digits in the range `[1, size]` that is implemented as a bit
/// mask. Since puzzle sizes are small (at most 64), a single `u64` suffices,
/// which generally has better performance than a `HashSet`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DigitSet {
    size: usize,
    bits: u64,
    len: usize
}

impl DigitSet {

    /// Creates a new, empty digit set for digits in the range `[1, size]`.
    ///
    /// # Errors
    ///
    /// `KenkenError::InvalidSize` if `size` is 0 or greater than 64.
    pub fn new(size: usize) -> KenkenResult<DigitSet> {
        if size == 0 || size > 64 {
            return Err(KenkenError::InvalidSize);
        }

        Ok(DigitSet {
            size,
            bits: 0,
            len: 0
        })
    }

    /// Inserts the given digit into this set. Returns `true` if the set
    /// changed, that is, the digit was not present before, and `false`
    /// otherwise.
    ///
    /// # Errors
    ///
    /// `KenkenError::InvalidNumber` if `digit` is 0 or greater than the size
    /// provided at construction.
    pub fn insert(&mut self, digit: usize) -> KenkenResult<bool> {
        if digit == 0 || digit > self.size {
            return Err(KenkenError::InvalidNumber);
        }

        let mask = 1u64 << (digit - 1);

        if self.bits & mask == 0 {
            self.bits |= mask;
            self.len += 1;
            Ok(true)
        }
        else {
            Ok(false)
        }
    }

    /// Indicates whether the given digit is contained in this set. Digits
    /// outside the range `[1, size]` are never contained.
    pub fn contains(&self, digit: usize) -> bool {
        digit >= 1 && digit <= self.size && self.bits & (1u64 << (digit - 1)) != 0
    }

    /// Removes all digits from this set.
    pub fn clear(&mut self) {
        self.bits = 0;
        self.len = 0;
    }

    /// Gets the number of digits contained in this set.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Indicates whether this set contains no digits.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Computes the absolute difference between two `usize`, avoiding underflow.
pub(crate) fn abs_diff(a: usize, b: usize) -> usize {
    if a > b { a - b } else { b - a }
}

/// Indicates whether the given iterator yields any duplicate elements,
/// requiring quadratic time. Intended for short sequences such as cage cell
/// lists.
pub(crate) fn contains_duplicate<T: Eq>(
        iter: impl Iterator<Item = T> + Clone) -> bool {
    let mut iter_index = iter.clone().enumerate();

    while let Some((index, element)) = iter_index.next() {
        if iter.clone().skip(index + 1).any(|other| other == element) {
            return true;
        }
    }

    false
}
