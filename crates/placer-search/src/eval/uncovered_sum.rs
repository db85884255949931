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

use crate::eval::estimator::BoundEstimator;
use placer_model::{board::WeightedBoard, coverage::Coverage, num::SolverWeight};

/// Bounds the remaining weight by the total weight of all uncovered cells.
///
/// Cheap and trivially admissible, but it ignores that placers exclude each
/// other, so it is much looser than [`LineRelaxationBound`] on dense boards.
///
/// [`LineRelaxationBound`]: crate::eval::line_relaxation::LineRelaxationBound
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UncoveredSumBound;

impl UncoveredSumBound {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl<T> BoundEstimator<T> for UncoveredSumBound
where
    T: SolverWeight,
{
    fn name(&self) -> &str {
        "UncoveredSumBound"
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

        board
            .weighted_cells()
            .iter()
            .filter(|&&cell| !coverage.is_covered(cell))
            .fold(T::zero(), |acc, &cell| {
                acc.saturating_add_val(board.weight(cell))
            })
    }
}
