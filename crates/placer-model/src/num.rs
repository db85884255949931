// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Solver Weight Trait
//!
//! Unified numeric bounds for board weights and placement scores.
//! `SolverWeight` collects the integer capabilities the model and the
//! search engines rely on: primitive unsigned integers with a lossless
//! widening into `u64` (for atomic incumbent storage) and a by-value
//! saturating addition.
//!
//! Scores are sums of weights. They never overflow; a sum that would exceed
//! the type's range clamps to `T::max_value()`. Any admissible bound stays
//! admissible under clamping because the true objective clamps the same way.

use num_traits::{CheckedAdd, PrimInt, Unsigned};
use std::hash::Hash;

/// A trait alias for numeric types that can be used as weights.
/// These are the unsigned integer types `u8`, `u16`, `u32` and `u64`.
///
/// # Note
///
/// `u128` and `usize` are excluded because they do not convert into `u64`
/// losslessly on every platform.
pub trait SolverWeight:
    PrimInt
    + Unsigned
    + CheckedAdd
    + Into<u64>
    + TryFrom<u64>
    + Hash
    + std::fmt::Debug
    + std::fmt::Display
    + Send
    + Sync
    + 'static
{
    /// Adds `rhs`, clamping at `Self::max_value()` instead of overflowing.
    #[inline(always)]
    fn saturating_add_val(self, rhs: Self) -> Self {
        self.checked_add(&rhs).unwrap_or_else(Self::max_value)
    }

    /// Widens the value into a `u64`.
    #[inline(always)]
    fn as_u64(self) -> u64 {
        self.into()
    }

    /// Narrows a `u64` back into `Self`, clamping values that do not fit.
    #[inline(always)]
    fn from_u64_saturating(value: u64) -> Self {
        Self::try_from(value).unwrap_or_else(|_| Self::max_value())
    }
}

impl<T> SolverWeight for T where
    T: PrimInt
        + Unsigned
        + CheckedAdd
        + Into<u64>
        + TryFrom<u64>
        + Hash
        + std::fmt::Debug
        + std::fmt::Display
        + Send
        + Sync
        + 'static
{
}

/// Sums the given weights with saturating semantics.
#[inline]
pub fn saturating_sum<T, I>(iter: I) -> T
where
    T: SolverWeight,
    I: IntoIterator<Item = T>,
{
    iter.into_iter()
        .fold(T::zero(), |acc, w| acc.saturating_add_val(w))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturating_add_val_clamps() {
        assert_eq!(200u8.saturating_add_val(100), u8::MAX);
        assert_eq!(20u8.saturating_add_val(100), 120);
        assert_eq!(u64::MAX.saturating_add_val(1), u64::MAX);
    }

    #[test]
    fn test_u64_round_trip_and_clamping() {
        assert_eq!(42u16.as_u64(), 42);
        assert_eq!(u16::from_u64_saturating(42), 42u16);
        assert_eq!(u16::from_u64_saturating(1 << 20), u16::MAX);
        assert_eq!(u64::from_u64_saturating(u64::MAX), u64::MAX);
    }

    #[test]
    fn test_saturating_sum() {
        assert_eq!(saturating_sum::<u32, _>([1, 2, 3]), 6);
        assert_eq!(saturating_sum::<u8, _>([250, 10]), u8::MAX);
        assert_eq!(saturating_sum::<u64, _>(std::iter::empty()), 0);
    }
}
