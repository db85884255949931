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

use placer_model::{
    board::WeightedBoard, coverage::Coverage, num::SolverWeight, placement::Placement,
};

/// A strategy for bounding the weight still collectable from a partial placement.
///
/// `BoundEstimator` decouples the solvers from a particular relaxation.
/// The solvers call:
/// - `estimate_remaining` to bound the additional weight obtainable by
///   `remaining` more non-attacking placers given the current coverage,
/// - `upper_bound` to obtain `score + estimate` for a node.
///
/// Every implementation must be admissible: the estimate may never be lower
/// than the best weight actually achievable from the given state. The solvers
/// prune a node as soon as its upper bound does not exceed the incumbent, so an
/// underestimate loses optima.
pub trait BoundEstimator<T>
where
    T: SolverWeight,
{
    /// Returns the name of the estimator.
    fn name(&self) -> &str;

    /// Bounds the weight obtainable by placing `remaining` more placers on
    /// cells not covered by `coverage`.
    ///
    /// Returns zero when `remaining` is zero.
    fn estimate_remaining(
        &mut self,
        board: &WeightedBoard<T>,
        remaining: usize,
        coverage: &Coverage,
    ) -> T;

    /// Computes the total upper bound `f(n) = g(n) + h(n)` for a node, where
    /// `g(n)` is the score collected so far and `h(n)` the remaining estimate.
    #[inline]
    fn upper_bound(
        &mut self,
        board: &WeightedBoard<T>,
        score: T,
        remaining: usize,
        coverage: &Coverage,
    ) -> T {
        let h_n = self.estimate_remaining(board, remaining, coverage);
        score.saturating_add_val(h_n)
    }

    /// Computes the upper bound for the state reached by placing `placement`
    /// on an empty board.
    fn upper_bound_of(&mut self, board: &WeightedBoard<T>, placement: &Placement<T>) -> T {
        let coverage = Coverage::from_cells(board.size(), placement.cells());
        let remaining = board.num_placers().saturating_sub(placement.len());
        self.upper_bound(board, placement.score(), remaining, &coverage)
    }
}

impl<T> std::fmt::Debug for dyn BoundEstimator<T>
where
    T: SolverWeight,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BoundEstimator({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn BoundEstimator<T>
where
    T: SolverWeight,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BoundEstimator({})", self.name())
    }
}

impl<T, E> BoundEstimator<T> for &mut E
where
    T: SolverWeight,
    E: BoundEstimator<T> + ?Sized,
{
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn estimate_remaining(
        &mut self,
        board: &WeightedBoard<T>,
        remaining: usize,
        coverage: &Coverage,
    ) -> T {
        (**self).estimate_remaining(board, remaining, coverage)
    }
}
