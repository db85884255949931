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

//! Cell addresses and the four attack line families.
//!
//! A placer covers every cell that shares its row, its column, its
//! diagonal or its anti-diagonal. Each of these families partitions the
//! board into lines identified by a dense index:
//!
//! - row: `row` in `0..n`
//! - column: `col` in `0..n`
//! - diagonal: `row - col + (n - 1)` in `0..2n-1`
//! - anti-diagonal: `row + col` in `0..2n-1`

/// A cell address on an `n x n` board, ordered lexicographically by
/// `(row, col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Coordinate {
    row: usize,
    col: usize,
}

impl Coordinate {
    /// Creates a new coordinate.
    #[inline(always)]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns the row of the coordinate.
    #[inline(always)]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// Returns the column of the coordinate.
    #[inline(always)]
    pub const fn col(&self) -> usize {
        self.col
    }

    /// Returns `true` if the coordinate lies on a board of the given size.
    #[inline(always)]
    pub const fn is_within(&self, size: usize) -> bool {
        self.row < size && self.col < size
    }

    /// Returns the index of the diagonal through this cell on a board
    /// of the given size.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the coordinate is not on the board.
    #[inline(always)]
    pub fn diagonal(&self, size: usize) -> usize {
        debug_assert!(
            self.is_within(size),
            "called `Coordinate::diagonal` with coordinate {} out of bounds for board size {}",
            self,
            size
        );
        self.row + (size - 1) - self.col
    }

    /// Returns the index of the anti-diagonal through this cell.
    #[inline(always)]
    pub const fn anti_diagonal(&self) -> usize {
        self.row + self.col
    }

    /// Returns the line index of this cell within `family`.
    #[inline(always)]
    pub fn line(&self, family: LineFamily, size: usize) -> usize {
        match family {
            LineFamily::Row => self.row,
            LineFamily::Column => self.col,
            LineFamily::Diagonal => self.diagonal(size),
            LineFamily::AntiDiagonal => self.anti_diagonal(),
        }
    }

    /// Returns `true` if a placer on `self` and a placer on `other` would
    /// attack each other. A cell does not attack itself.
    #[inline]
    pub fn attacks(&self, other: &Coordinate) -> bool {
        if self == other {
            return false;
        }
        self.row == other.row
            || self.col == other.col
            || self.row.abs_diff(other.row) == self.col.abs_diff(other.col)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for Coordinate {
    #[inline(always)]
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

/// One of the four families of attack lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LineFamily {
    Row,
    Column,
    Diagonal,
    AntiDiagonal,
}

impl LineFamily {
    /// All families, in mask bit order.
    pub const ALL: [LineFamily; 4] = [
        LineFamily::Row,
        LineFamily::Column,
        LineFamily::Diagonal,
        LineFamily::AntiDiagonal,
    ];

    /// Returns the number of lines this family has on a board of the given size.
    #[inline(always)]
    pub const fn num_lines(&self, size: usize) -> usize {
        match self {
            LineFamily::Row | LineFamily::Column => size,
            LineFamily::Diagonal | LineFamily::AntiDiagonal => {
                if size == 0 {
                    0
                } else {
                    2 * size - 1
                }
            }
        }
    }

    /// Returns the bit used for this family in a line mask.
    #[inline(always)]
    pub const fn mask_bit(&self) -> u8 {
        match self {
            LineFamily::Row => 0b0001,
            LineFamily::Column => 0b0010,
            LineFamily::Diagonal => 0b0100,
            LineFamily::AntiDiagonal => 0b1000,
        }
    }

    /// Returns an iterator over the cells of line `line` of this family
    /// on a board of the given size, in row-major order.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `line` is out of bounds.
    pub fn cells(&self, line: usize, size: usize) -> impl Iterator<Item = Coordinate> + use<> {
        debug_assert!(
            line < self.num_lines(size),
            "called `LineFamily::cells` with line out of bounds: the len is {} but the index is {}",
            self.num_lines(size),
            line
        );

        let family = *self;
        (0..size)
            .flat_map(move |row| (0..size).map(move |col| Coordinate::new(row, col)))
            .filter(move |coord| coord.line(family, size) == line)
    }
}

impl std::fmt::Display for LineFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineFamily::Row => write!(f, "Row"),
            LineFamily::Column => write!(f, "Column"),
            LineFamily::Diagonal => write!(f, "Diagonal"),
            LineFamily::AntiDiagonal => write!(f, "AntiDiagonal"),
        }
    }
}
