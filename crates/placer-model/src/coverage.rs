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

//! Line occupancy masks.
//!
//! `Coverage` keeps one bit set per line family. Bit `i` of a family is set
//! iff line `i` of that family holds a placer. A cell is covered iff any of
//! its four lines is occupied. Bit sets are sized from the board, so the
//! board dimension is not limited by the machine word width.

use crate::coord::{Coordinate, LineFamily};
use fixedbitset::FixedBitSet;

/// A mask of the lines newly occupied by a single placement.
///
/// Bits follow [`LineFamily::mask_bit`]. Placing onto an uncovered cell
/// always yields [`LineMask::ALL`]; a partial mask only appears when a
/// placement is forced onto a covered cell.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LineMask(u8);

impl LineMask {
    /// No lines.
    pub const NONE: LineMask = LineMask(0);
    /// All four lines.
    pub const ALL: LineMask = LineMask(0b1111);

    /// Returns `true` if the mask contains the line of `family`.
    #[inline(always)]
    pub const fn contains(&self, family: LineFamily) -> bool {
        self.0 & family.mask_bit() != 0
    }

    #[inline(always)]
    const fn with(self, family: LineFamily) -> Self {
        LineMask(self.0 | family.mask_bit())
    }

    /// Returns the raw bits of the mask.
    #[inline(always)]
    pub const fn bits(&self) -> u8 {
        self.0
    }
}

/// Occupancy of rows, columns, diagonals and anti-diagonals.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Coverage {
    size: usize,
    lines: [FixedBitSet; 4],
}

impl Coverage {
    /// Creates an empty coverage for a board of the given size.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            lines: LineFamily::ALL.map(|family| FixedBitSet::with_capacity(family.num_lines(size))),
        }
    }

    /// Creates the coverage induced by placers on the given cells.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if a cell is off the board.
    pub fn from_cells<'a, I>(size: usize, cells: I) -> Self
    where
        I: IntoIterator<Item = &'a Coordinate>,
    {
        let mut coverage = Self::new(size);
        for cell in cells {
            coverage.occupy(*cell);
        }
        coverage
    }

    /// Returns the board size this coverage was created for.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline(always)]
    fn family_index(family: LineFamily) -> usize {
        match family {
            LineFamily::Row => 0,
            LineFamily::Column => 1,
            LineFamily::Diagonal => 2,
            LineFamily::AntiDiagonal => 3,
        }
    }

    /// Returns `true` if line `line` of `family` is occupied.
    #[inline(always)]
    pub fn is_line_occupied(&self, family: LineFamily, line: usize) -> bool {
        self.lines[Self::family_index(family)].contains(line)
    }

    /// Returns the number of occupied lines in `family`.
    #[inline]
    pub fn num_occupied(&self, family: LineFamily) -> usize {
        self.lines[Self::family_index(family)].count_ones(..)
    }

    /// Returns `true` if a placer on `coord` would be attacked by an
    /// existing placer, i.e. any of its four lines is occupied.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `coord` is off the board.
    #[inline(always)]
    pub fn is_covered(&self, coord: Coordinate) -> bool {
        debug_assert!(
            coord.is_within(self.size),
            "called `Coverage::is_covered` with coordinate out of bounds: the size is {} but the coordinate is {}",
            self.size,
            coord
        );

        LineFamily::ALL
            .iter()
            .any(|&family| self.is_line_occupied(family, coord.line(family, self.size)))
    }

    /// Marks the four lines of `coord` as occupied and returns the mask of
    /// lines that were not occupied before.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `coord` is off the board.
    #[inline]
    pub fn occupy(&mut self, coord: Coordinate) -> LineMask {
        debug_assert!(
            coord.is_within(self.size),
            "called `Coverage::occupy` with coordinate out of bounds: the size is {} but the coordinate is {}",
            self.size,
            coord
        );

        let mut mask = LineMask::NONE;
        for family in LineFamily::ALL {
            let line = coord.line(family, self.size);
            let bits = &mut self.lines[Self::family_index(family)];
            if !bits.put(line) {
                mask = mask.with(family);
            }
        }
        mask
    }

    /// Clears exactly the lines of `coord` contained in `mask`.
    ///
    /// This is the inverse of the [`Coverage::occupy`] call that returned `mask`.
    #[inline]
    pub fn release(&mut self, coord: Coordinate, mask: LineMask) {
        debug_assert!(
            coord.is_within(self.size),
            "called `Coverage::release` with coordinate out of bounds: the size is {} but the coordinate is {}",
            self.size,
            coord
        );

        for family in LineFamily::ALL {
            if mask.contains(family) {
                let line = coord.line(family, self.size);
                self.lines[Self::family_index(family)].set(line, false);
            }
        }
    }

    /// Clears all lines.
    #[inline]
    pub fn clear(&mut self) {
        for bits in &mut self.lines {
            bits.clear();
        }
    }

    /// Resizes the coverage for a board of a different size and clears it.
    pub fn reset(&mut self, size: usize) {
        self.size = size;
        for family in LineFamily::ALL {
            let bits = &mut self.lines[Self::family_index(family)];
            let num_lines = family.num_lines(size);
            if bits.len() == num_lines {
                bits.clear();
            } else {
                *bits = FixedBitSet::with_capacity(num_lines);
            }
        }
    }
}

impl std::fmt::Debug for Coverage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coverage")
            .field("size", &self.size)
            .field("rows", &self.lines[0].ones().collect::<Vec<_>>())
            .field("cols", &self.lines[1].ones().collect::<Vec<_>>())
            .field("diag1", &self.lines[2].ones().collect::<Vec<_>>())
            .field("diag2", &self.lines[3].ones().collect::<Vec<_>>())
            .finish()
    }
}

impl std::fmt::Display for Coverage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Coverage(size: {}, rows: {}, cols: {}, diag1: {}, diag2: {})",
            self.size,
            self.num_occupied(LineFamily::Row),
            self.num_occupied(LineFamily::Column),
            self.num_occupied(LineFamily::Diagonal),
            self.num_occupied(LineFamily::AntiDiagonal)
        )
    }
}
