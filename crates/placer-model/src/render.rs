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

//! Debug rendering of a partial placement.
//!
//! A `BoardSnapshot` prints a short summary followed by the board grid.
//! Each cell is drawn as `|m ww` where `m` is `x` for a placer, `.` for a
//! cell attacked by a placer and blank otherwise, and `ww` is the cell
//! weight (blank for zero):
//!
//! ```text
//! Placed:   1
//! Left:     1
//! Score:    3
//! Eligb:    5
//! +----+----+----+----+
//! |.  1|.   |.   |.   |
//! +----+----+----+----+
//! |.   |.   |x  3|.   |
//! ...
//! ```

use crate::{
    board::{BoardError, WeightedBoard},
    coord::Coordinate,
    coverage::Coverage,
    num::SolverWeight,
};

/// A printable view of a board together with a partial placement.
#[derive(Clone)]
pub struct BoardSnapshot<'a, T> {
    board: &'a WeightedBoard<T>,
    cells: &'a [Coordinate],
    coverage: Coverage,
    score: T,
    estimate: Option<T>,
}

impl<'a, T> BoardSnapshot<'a, T>
where
    T: SolverWeight,
{
    /// Creates a snapshot of `cells` placed on `board`.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::CoordinateOutOfBounds` for the first cell that
    /// lies outside the board.
    pub fn new(board: &'a WeightedBoard<T>, cells: &'a [Coordinate]) -> Result<Self, BoardError> {
        let size = board.size();
        if let Some(&cell) = cells.iter().find(|cell| !cell.is_within(size)) {
            return Err(BoardError::CoordinateOutOfBounds {
                row: cell.row(),
                col: cell.col(),
                size,
            });
        }

        let coverage = Coverage::from_cells(size, cells);
        let score = crate::num::saturating_sum(cells.iter().map(|&c| board.weight(c)));
        Ok(Self {
            board,
            cells,
            coverage,
            score,
            estimate: None,
        })
    }

    /// Attaches the bound estimate of the weight still collectable,
    /// printed in the `Eligb` line.
    pub fn with_estimate(mut self, estimate: T) -> Self {
        self.estimate = Some(estimate);
        self
    }

    /// Returns the number of placers already placed.
    #[inline]
    pub fn num_placed(&self) -> usize {
        self.cells.len()
    }

    /// Returns the number of placers still to be placed.
    #[inline]
    pub fn num_left(&self) -> usize {
        self.board.num_placers().saturating_sub(self.cells.len())
    }

    /// Returns the weight collected by the placed placers.
    #[inline]
    pub fn score(&self) -> T {
        self.score
    }

    /// Returns the lines attacked by the placed cells.
    #[inline]
    pub fn coverage(&self) -> &Coverage {
        &self.coverage
    }

    /// Returns the attached estimate, if any.
    #[inline]
    pub fn estimate(&self) -> Option<T> {
        self.estimate
    }

    fn write_separator(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for _ in 0..self.board.size() {
            write!(f, "+----")?;
        }
        writeln!(f, "+")
    }

    fn write_row(&self, f: &mut std::fmt::Formatter<'_>, row: usize) -> std::fmt::Result {
        for col in 0..self.board.size() {
            let coord = Coordinate::new(row, col);
            let marker = if self.cells.contains(&coord) {
                'x'
            } else if self.coverage.is_covered(coord) {
                '.'
            } else {
                ' '
            };
            let weight = self.board.weight(coord);
            if weight.is_zero() {
                write!(f, "|{}   ", marker)?;
            } else {
                write!(f, "|{} {:>2}", marker, weight)?;
            }
        }
        writeln!(f, "|")
    }
}

impl<T> std::fmt::Debug for BoardSnapshot<'_, T>
where
    T: SolverWeight,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardSnapshot")
            .field("board", self.board)
            .field("cells", &self.cells)
            .field("score", &self.score)
            .field("estimate", &self.estimate)
            .finish()
    }
}

impl<T> std::fmt::Display for BoardSnapshot<'_, T>
where
    T: SolverWeight,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Placed: {:>3}", self.num_placed())?;
        writeln!(f, "Left:   {:>3}", self.num_left())?;
        writeln!(f, "Score:  {:>3}", self.score)?;
        match self.estimate {
            Some(estimate) => writeln!(f, "Eligb:  {:>3}", estimate)?,
            None => writeln!(f, "Eligb:    -")?,
        }
        for row in 0..self.board.size() {
            self.write_separator(f)?;
            self.write_row(f, row)?;
        }
        self.write_separator(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(row: usize, col: usize) -> Coordinate {
        Coordinate::new(row, col)
    }

    #[test]
    fn test_snapshot_summary_and_grid() {
        let board =
            WeightedBoard::<u32>::from_contributions(2, 1, [(c(0, 0), 7), (c(1, 1), 12)]).unwrap();
        let cells = [c(0, 0)];
        let snapshot = BoardSnapshot::new(&board, &cells)
            .unwrap()
            .with_estimate(0);

        assert_eq!(snapshot.num_placed(), 1);
        assert_eq!(snapshot.num_left(), 0);
        assert_eq!(snapshot.score(), 7);

        let rendered = snapshot.to_string();
        let expected = "\
Placed:   1
Left:     0
Score:    7
Eligb:    0
+----+----+
|x  7|.   |
+----+----+
|.   |. 12|
+----+----+
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_snapshot_without_estimate() {
        let board = WeightedBoard::<u8>::from_contributions(1, 1, [(c(0, 0), 3)]).unwrap();
        let snapshot = BoardSnapshot::new(&board, &[]).unwrap();
        let rendered = snapshot.to_string();
        assert!(rendered.contains("Eligb:    -"));
        assert!(rendered.contains("|   3|"));
    }

    #[test]
    fn test_snapshot_rejects_cells_off_the_board() {
        let board = WeightedBoard::<u32>::from_contributions(3, 2, [(c(0, 0), 1)]).unwrap();
        let cells = [c(0, 0), c(5, 5)];
        let err = BoardSnapshot::new(&board, &cells).unwrap_err();
        assert_eq!(
            err,
            BoardError::CoordinateOutOfBounds {
                row: 5,
                col: 5,
                size: 3
            }
        );
    }

    #[test]
    fn test_snapshot_debug_summarizes_board() {
        let board = WeightedBoard::<u32>::from_contributions(2, 1, [(c(1, 1), 4)]).unwrap();
        let cells = [c(1, 1)];
        let rendered = format!("{:?}", BoardSnapshot::new(&board, &cells).unwrap());
        assert!(rendered.starts_with("BoardSnapshot { board: WeightedBoard"));
        assert!(rendered.contains("score: 4"));
        assert!(rendered.contains("estimate: None"));
    }
}
