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

//! The weighted board: an immutable weight function over the cells of an
//! `n x n` grid together with the number of placers to put on it.
//!
//! Weights are stored densely in a flattened row-major array for O(1)
//! lookups. Because realistic instances are sparse, the board also keeps
//! the list of cells with a positive weight, so bound computations can run
//! in O(#nonzero cells) rather than O(n²).

use crate::{coord::Coordinate, num::SolverWeight};
use thiserror::Error;

#[inline(always)]
fn flatten_index(size: usize, coord: Coordinate) -> usize {
    coord.row() * size + coord.col()
}

/// Errors raised while constructing a [`WeightedBoard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    /// The board must have at least one row and one column.
    #[error("invalid board size: the board must have at least one row")]
    InvalidSize,
    /// More placers were requested than the board has rows; no two placers
    /// may share a row, so this can never be satisfied.
    #[error("cannot place {placers} placers on a board of size {size}")]
    TooManyPlacers { placers: usize, size: usize },
    /// A contribution referenced a cell outside the board.
    #[error("coordinate ({row}, {col}) is out of bounds for a board of size {size}")]
    CoordinateOutOfBounds { row: usize, col: usize, size: usize },
}

/// An immutable weight function over the cells of a square board.
#[derive(Clone, PartialEq, Eq)]
pub struct WeightedBoard<T> {
    size: usize,
    num_placers: usize,
    /// Row-major weights, `weights[row * size + col]`.
    weights: Vec<T>,
    /// Cells with a positive weight, in row-major order.
    weighted_cells: Vec<Coordinate>,
}

impl<T> WeightedBoard<T>
where
    T: SolverWeight,
{
    /// Builds a board from an iterator of `(coordinate, weight)` contributions.
    /// Repeated coordinates accumulate their weights.
    ///
    /// # Errors
    ///
    /// Returns a [`BoardError`] if `size` is zero, if `num_placers`
    /// exceeds `size` or if a contribution lies outside the board.
    pub fn from_contributions<I>(
        size: usize,
        num_placers: usize,
        contributions: I,
    ) -> Result<Self, BoardError>
    where
        I: IntoIterator<Item = (Coordinate, T)>,
    {
        let mut builder = BoardBuilder::new(size, num_placers);
        for (coord, weight) in contributions {
            builder.add_weight(coord, weight)?;
        }
        builder.build()
    }

    /// Returns the side length `n` of the board.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the number of placers `d` that must be placed.
    #[inline]
    pub fn num_placers(&self) -> usize {
        self.num_placers
    }

    /// Returns the number of cells on the board.
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.weights.len()
    }

    /// Returns the weight of the given cell, or zero if the cell is off the board.
    #[inline]
    pub fn weight(&self, coord: Coordinate) -> T {
        if !coord.is_within(self.size) {
            return T::zero();
        }
        self.weights[flatten_index(self.size, coord)]
    }

    /// Returns the weight of the given cell without checking bounds.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `coord` is not on the board.
    ///
    /// # Safety
    ///
    /// The caller must ensure that `coord` lies on the board.
    #[inline(always)]
    pub unsafe fn weight_unchecked(&self, coord: Coordinate) -> T {
        debug_assert!(
            coord.is_within(self.size),
            "called `WeightedBoard::weight_unchecked` with coordinate out of bounds: the size is {} but the coordinate is {}",
            self.size,
            coord
        );
        unsafe { *self.weights.get_unchecked(flatten_index(self.size, coord)) }
    }

    /// Returns the cells with a positive weight, in row-major order.
    #[inline]
    pub fn weighted_cells(&self) -> &[Coordinate] {
        &self.weighted_cells
    }

    /// Returns the sum of all weights on the board (saturating).
    #[inline]
    pub fn total_weight(&self) -> T {
        crate::num::saturating_sum(self.weighted_cells.iter().map(|&c| self.weight(c)))
    }

    /// Returns the largest single cell weight, or zero for an empty board.
    #[inline]
    pub fn max_weight(&self) -> T {
        self.weighted_cells
            .iter()
            .map(|&c| self.weight(c))
            .max()
            .unwrap_or_else(T::zero)
    }

    /// Returns an iterator over all coordinates of the board, row-major.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + use<T> {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| Coordinate::new(row, col)))
    }
}

impl<T> std::fmt::Debug for WeightedBoard<T>
where
    T: SolverWeight,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeightedBoard")
            .field("size", &self.size)
            .field("num_placers", &self.num_placers)
            .field("weighted_cells", &self.weighted_cells.len())
            .finish()
    }
}

impl<T> std::fmt::Display for WeightedBoard<T>
where
    T: SolverWeight,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "WeightedBoard(size: {}, placers: {}, weighted cells: {}, total weight: {})",
            self.size,
            self.num_placers,
            self.weighted_cells.len(),
            self.total_weight()
        )
    }
}

/// Incremental builder for a [`WeightedBoard`].
///
/// Contributions may be added in any order and repeated coordinates
/// accumulate. Dimension checks are deferred to [`BoardBuilder::build`]
/// except for per-cell bounds, which are reported as soon as the cell
/// is added.
#[derive(Clone)]
pub struct BoardBuilder<T> {
    size: usize,
    num_placers: usize,
    weights: Vec<T>,
}

impl<T> BoardBuilder<T>
where
    T: SolverWeight,
{
    /// Creates a new builder for a board of side length `size` on which
    /// `num_placers` placers must be placed. All weights start at zero.
    pub fn new(size: usize, num_placers: usize) -> Self {
        Self {
            size,
            num_placers,
            weights: vec![T::zero(); size.saturating_mul(size)],
        }
    }

    /// Returns the side length of the board under construction.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the number of placers of the board under construction.
    #[inline]
    pub fn num_placers(&self) -> usize {
        self.num_placers
    }

    #[inline]
    fn checked_index(&self, coord: Coordinate) -> Result<usize, BoardError> {
        if !coord.is_within(self.size) {
            return Err(BoardError::CoordinateOutOfBounds {
                row: coord.row(),
                col: coord.col(),
                size: self.size,
            });
        }
        Ok(flatten_index(self.size, coord))
    }

    /// Adds `weight` to the cell at `coord`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::CoordinateOutOfBounds`] if `coord` is not on the board.
    pub fn add_weight(&mut self, coord: Coordinate, weight: T) -> Result<&mut Self, BoardError> {
        let index = self.checked_index(coord)?;
        self.weights[index] = self.weights[index].saturating_add_val(weight);
        Ok(self)
    }

    /// Adds a single unit of weight to the cell at `coord`. Recording one
    /// package per call makes the cell weight the number of packages
    /// dropped on it.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::CoordinateOutOfBounds`] if `coord` is not on the board.
    pub fn add_package(&mut self, coord: Coordinate) -> Result<&mut Self, BoardError> {
        self.add_weight(coord, T::one())
    }

    /// Overwrites the weight of the cell at `coord`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::CoordinateOutOfBounds`] if `coord` is not on the board.
    pub fn set_weight(&mut self, coord: Coordinate, weight: T) -> Result<&mut Self, BoardError> {
        let index = self.checked_index(coord)?;
        self.weights[index] = weight;
        Ok(self)
    }

    /// Finalizes the board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidSize`] for an empty board and
    /// [`BoardError::TooManyPlacers`] if more placers than rows are requested.
    pub fn build(self) -> Result<WeightedBoard<T>, BoardError> {
        if self.size == 0 {
            return Err(BoardError::InvalidSize);
        }
        if self.num_placers > self.size {
            return Err(BoardError::TooManyPlacers {
                placers: self.num_placers,
                size: self.size,
            });
        }

        let size = self.size;
        let weighted_cells = self
            .weights
            .iter()
            .enumerate()
            .filter(|(_, w)| !w.is_zero())
            .map(|(i, _)| Coordinate::new(i / size, i % size))
            .collect();

        Ok(WeightedBoard {
            size,
            num_placers: self.num_placers,
            weights: self.weights,
            weighted_cells,
        })
    }
}

impl<T> std::fmt::Debug for BoardBuilder<T>
where
    T: SolverWeight,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardBuilder")
            .field("size", &self.size)
            .field("num_placers", &self.num_placers)
            .finish()
    }
}
