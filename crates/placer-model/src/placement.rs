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

//! The solution type exchanged by all solvers.

use crate::{board::WeightedBoard, coord::Coordinate, num::SolverWeight};
use thiserror::Error;

/// Reasons a placement fails validation against a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    /// Two placers share a row, column or diagonal.
    #[error("placers at {first} and {second} attack each other")]
    Attacking { first: Coordinate, second: Coordinate },
    /// The cell at `index` is not in a strictly later row than its predecessor.
    #[error("placement at index {index} breaks strictly increasing row order")]
    RowOrder { index: usize },
    /// A cell lies outside the board.
    #[error("placement {coord} is out of bounds for a board of size {size}")]
    OutOfBounds { coord: Coordinate, size: usize },
    /// The placement has the wrong number of placers.
    #[error("expected {expected} placers but found {actual}")]
    WrongCount { expected: usize, actual: usize },
    /// The recorded score does not equal the sum of the covered weights.
    #[error("recorded score {actual} does not match the board score {expected}")]
    ScoreMismatch { expected: u64, actual: u64 },
}

/// A finished placement: the cells holding placers, in strictly increasing
/// row order, together with the total weight collected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Placement<T> {
    score: T,
    cells: Vec<Coordinate>,
}

impl<T> Placement<T>
where
    T: SolverWeight,
{
    /// Constructs a new `Placement`.
    #[inline]
    pub fn new(score: T, cells: Vec<Coordinate>) -> Self {
        Self { score, cells }
    }

    /// Constructs the placement of `cells` on `board`, computing its score.
    pub fn from_cells(board: &WeightedBoard<T>, cells: Vec<Coordinate>) -> Self {
        let score = crate::num::saturating_sum(cells.iter().map(|&c| board.weight(c)));
        Self { score, cells }
    }

    /// An empty placement with score zero.
    #[inline]
    pub fn empty() -> Self {
        Self {
            score: T::zero(),
            cells: Vec::new(),
        }
    }

    /// Returns the total weight collected by this placement.
    #[inline]
    pub fn score(&self) -> T {
        self.score
    }

    /// Returns the cells holding placers, in increasing row order.
    #[inline]
    pub fn cells(&self) -> &[Coordinate] {
        &self.cells
    }

    /// Returns the number of placers.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if no placer is placed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Consumes the placement and returns its cells.
    #[inline]
    pub fn into_cells(self) -> Vec<Coordinate> {
        self.cells
    }

    /// Returns `true` if rows strictly increase along the placement.
    pub fn is_row_monotone(&self) -> bool {
        self.cells.windows(2).all(|w| w[0].row() < w[1].row())
    }

    /// Returns `true` if no two placers attack each other.
    pub fn is_non_attacking(&self) -> bool {
        self.cells
            .iter()
            .enumerate()
            .all(|(i, a)| self.cells[i + 1..].iter().all(|b| !a.attacks(b)))
    }

    /// Validates the placement against `board`: it must place exactly
    /// `board.num_placers()` non-attacking placers on the board in
    /// increasing row order, and its score must equal the weights covered.
    ///
    /// # Errors
    ///
    /// Returns the first violated condition as a [`PlacementError`].
    pub fn validate(&self, board: &WeightedBoard<T>) -> Result<(), PlacementError> {
        if self.cells.len() != board.num_placers() {
            return Err(PlacementError::WrongCount {
                expected: board.num_placers(),
                actual: self.cells.len(),
            });
        }

        if let Some(&coord) = self.cells.iter().find(|c| !c.is_within(board.size())) {
            return Err(PlacementError::OutOfBounds {
                coord,
                size: board.size(),
            });
        }

        if let Some(index) = (1..self.cells.len())
            .find(|&i| self.cells[i - 1].row() >= self.cells[i].row())
        {
            return Err(PlacementError::RowOrder { index });
        }

        for (i, first) in self.cells.iter().enumerate() {
            if let Some(second) = self.cells[i + 1..].iter().find(|b| first.attacks(b)) {
                return Err(PlacementError::Attacking {
                    first: *first,
                    second: *second,
                });
            }
        }

        let expected = crate::num::saturating_sum(self.cells.iter().map(|&c| board.weight(c)));
        if expected != self.score {
            return Err(PlacementError::ScoreMismatch {
                expected: expected.as_u64(),
                actual: self.score.as_u64(),
            });
        }

        Ok(())
    }
}

impl<T> std::fmt::Display for Placement<T>
where
    T: SolverWeight,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Placement(score: {}, cells: [", self.score)?;
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", cell)?;
        }
        write!(f, "])")
    }
}
