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

//! Immutable search states for best-first search
//!
//! A `PlacementState` is a row-ordered sequence of placed coordinates plus
//! its collected score and line coverage. States are cheap to clone: the
//! sequence lives behind an `Arc<[Coordinate]>`. Equality and hashing only
//! look at the sequence, so states can live in hashed collections.

use placer_model::{
    board::WeightedBoard, coord::Coordinate, coverage::Coverage, num::SolverWeight,
    placement::Placement,
};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct PlacementState<T> {
    cells: Arc<[Coordinate]>,
    score: T,
    coverage: Coverage,
}

impl<T> PlacementState<T>
where
    T: SolverWeight,
{
    /// Returns the empty state of a board of side `size`.
    #[inline]
    pub fn root(size: usize) -> Self {
        Self {
            cells: Arc::from(Vec::new()),
            score: T::zero(),
            coverage: Coverage::new(size),
        }
    }

    /// Returns the state reached by additionally placing `coord`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `coord` is covered or does not lie below
    /// the last placed row.
    pub fn successor(&self, board: &WeightedBoard<T>, coord: Coordinate) -> Self {
        debug_assert!(
            !self.coverage.is_covered(coord),
            "called `PlacementState::successor` with covered coordinate {}",
            coord
        );
        debug_assert!(
            self.last_row().is_none_or(|row| coord.row() > row),
            "called `PlacementState::successor` with coordinate {} out of row order",
            coord
        );

        let mut cells = Vec::with_capacity(self.cells.len() + 1);
        cells.extend_from_slice(&self.cells);
        cells.push(coord);

        let mut coverage = self.coverage.clone();
        coverage.occupy(coord);

        Self {
            cells: Arc::from(cells),
            score: self.score.saturating_add_val(board.weight(coord)),
            coverage,
        }
    }

    /// Returns the collected weight, `g(n)`.
    #[inline]
    pub fn score(&self) -> T {
        self.score
    }

    #[inline]
    pub fn cells(&self) -> &[Coordinate] {
        &self.cells
    }

    /// Returns the shared coordinate sequence.
    #[inline]
    pub fn key(&self) -> Arc<[Coordinate]> {
        Arc::clone(&self.cells)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn coverage(&self) -> &Coverage {
        &self.coverage
    }

    #[inline]
    pub fn last_row(&self) -> Option<usize> {
        self.cells.last().map(Coordinate::row)
    }

    /// Returns `true` once the state holds `num_placers` placers.
    #[inline]
    pub fn is_terminal(&self, num_placers: usize) -> bool {
        self.cells.len() == num_placers
    }

    #[inline]
    pub fn to_placement(&self) -> Placement<T> {
        Placement::new(self.score, self.cells.to_vec())
    }
}

impl<T> PartialEq for PlacementState<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
    }
}

impl<T> Eq for PlacementState<T> {}

impl<T> std::hash::Hash for PlacementState<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.cells.hash(state);
    }
}

impl<T> std::fmt::Display for PlacementState<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PlacementState(score: {}, cells: [", self.score)?;
        for (i, coord) in self.cells.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", coord)?;
        }
        write!(f, "])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    fn c(row: usize, col: usize) -> Coordinate {
        Coordinate::new(row, col)
    }

    fn board() -> WeightedBoard<u32> {
        WeightedBoard::from_contributions(4, 2, [(c(0, 0), 1), (c(1, 2), 3), (c(3, 3), 5)])
            .expect("valid board")
    }

    #[test]
    fn test_successor_accumulates_score_and_coverage() {
        let board = board();
        let root = PlacementState::root(board.size());
        assert!(root.is_empty());
        assert_eq!(root.last_row(), None);

        let a = root.successor(&board, c(1, 2));
        let b = a.successor(&board, c(3, 3));
        assert_eq!(b.score(), 8);
        assert_eq!(b.cells(), &[c(1, 2), c(3, 3)]);
        assert!(b.coverage().is_covered(c(0, 2)));
        assert!(b.is_terminal(2));
        assert_eq!(b.to_placement(), Placement::new(8, vec![c(1, 2), c(3, 3)]));

        // The parent is untouched.
        assert_eq!(a.len(), 1);
        assert!(!a.coverage().is_covered(c(3, 0)));
    }

    #[test]
    fn test_equality_and_hash_follow_sequence() {
        let board = board();
        let root = PlacementState::root(board.size());
        let a = root.successor(&board, c(0, 1));
        let b = root.successor(&board, c(0, 1));
        let other = root.successor(&board, c(0, 2));

        let mut set = FxHashSet::default();
        assert!(set.insert(a.clone()));
        assert!(!set.insert(b));
        assert!(set.insert(other));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&a));
    }

    #[test]
    fn test_display() {
        let board = board();
        let s = PlacementState::root(board.size()).successor(&board, c(1, 2));
        assert_eq!(s.to_string(), "PlacementState(score: 3, cells: [(1, 2)])");
    }
}
