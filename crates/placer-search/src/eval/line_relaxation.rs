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

//! Per-line relaxation bound.
//!
//! Every placer occupies exactly one row, one column, one diagonal and one
//! anti-diagonal, and no two placers share a line of any family. Looking at a
//! single family in isolation, the best `k` placers can therefore do is take
//! the heaviest free cell of `k` distinct free lines. Summing the `k` largest
//! per-line maxima gives an admissible bound per family; the minimum over the
//! four families is still admissible and is usually much tighter than any
//! single one.
//!
//! Only cells that are not covered contribute, and lines that already hold a
//! placer are skipped entirely. Line occupancy is read from the coverage bit
//! sets, so the exclusion never depends on the order in which cells are scanned.
//!
//! The per-line maxima are accumulated in one pass over the board's sparse
//! index of weighted cells, making the bound O(#nonzero + n log n).

use crate::eval::estimator::BoundEstimator;
use placer_model::{
    board::WeightedBoard,
    coord::LineFamily,
    coverage::Coverage,
    num::{SolverWeight, saturating_sum},
};

/// Admissible bound taking, per line family, the `k` largest per-line maxima
/// of uncovered weight and returning the minimum over the four families.
#[derive(Debug, Clone, Default)]
pub struct LineRelaxationBound<T> {
    /// Per-family scratch buffers holding the maximum uncovered weight of each line.
    line_maxima: [Vec<T>; 4],
}

impl<T> LineRelaxationBound<T>
where
    T: SolverWeight,
{
    /// Creates a new estimator with empty scratch buffers.
    #[inline]
    pub fn new() -> Self {
        Self {
            line_maxima: [Vec::new(), Vec::new(), Vec::new(), Vec::new()],
        }
    }

    /// Creates a new estimator with scratch buffers sized for boards of side `size`.
    #[inline]
    pub fn preallocated(size: usize) -> Self {
        Self {
            line_maxima: LineFamily::ALL.map(|family| Vec::with_capacity(family.num_lines(size))),
        }
    }

    /// Returns the total allocated memory in bytes.
    #[inline]
    pub fn allocated_memory_bytes(&self) -> usize {
        self.line_maxima
            .iter()
            .map(|buf| buf.capacity() * std::mem::size_of::<T>())
            .sum()
    }

    fn reset_buffers(&mut self, size: usize) {
        for (buf, family) in self.line_maxima.iter_mut().zip(LineFamily::ALL) {
            buf.clear();
            buf.resize(family.num_lines(size), T::zero());
        }
    }

    /// Sums the `k` largest maxima among the free lines of `family`.
    fn family_bound(
        buf: &mut [T],
        family: LineFamily,
        coverage: &Coverage,
        remaining: usize,
    ) -> T {
        // Occupied lines are zeroed out rather than removed so the buffer stays
        // indexable by line id; zero entries never change a top-k sum.
        for (line, max) in buf.iter_mut().enumerate() {
            if coverage.is_line_occupied(family, line) {
                *max = T::zero();
            }
        }

        let k = remaining.min(buf.len());
        if k == 0 {
            return T::zero();
        }
        if k < buf.len() {
            buf.select_nth_unstable_by(k - 1, |a, b| b.cmp(a));
        }
        saturating_sum(buf[..k].iter().copied())
    }
}

impl<T> BoundEstimator<T> for LineRelaxationBound<T>
where
    T: SolverWeight,
{
    fn name(&self) -> &str {
        "LineRelaxationBound"
    }

    fn estimate_remaining(
        &mut self,
        board: &WeightedBoard<T>,
        remaining: usize,
        coverage: &Coverage,
    ) -> T {
        if remaining == 0 {
            return T::zero();
        }

        let size = board.size();
        self.reset_buffers(size);

        for &cell in board.weighted_cells() {
            if coverage.is_covered(cell) {
                continue;
            }
            // SAFETY: the sparse index only holds coordinates on the board.
            let weight = unsafe { board.weight_unchecked(cell) };
            for (buf, family) in self.line_maxima.iter_mut().zip(LineFamily::ALL) {
                let line = cell.line(family, size);
                if weight > buf[line] {
                    buf[line] = weight;
                }
            }
        }

        let mut bound = T::max_value();
        for (buf, family) in self.line_maxima.iter_mut().zip(LineFamily::ALL) {
            let family_bound = Self::family_bound(buf, family, coverage, remaining);
            if family_bound < bound {
                bound = family_bound;
            }
        }
        bound
    }
}
