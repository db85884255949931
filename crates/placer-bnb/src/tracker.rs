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

//! Incremental coverage tracking with an undo trail.
//!
//! `CoverageTracker` owns the line bit sets of the current partial placement
//! together with a linear trail of the placements made so far. Every `place`
//! records exactly which line bits it set and the score before it, so the
//! matching `unplace` restores the previous state bit for bit. Undo is strictly
//! LIFO; there is no way to remove anything but the most recent placement.

use placer_model::{
    board::WeightedBoard,
    coord::Coordinate,
    coverage::{Coverage, LineMask},
    num::SolverWeight,
    placement::Placement,
};

/// A compact record of a single placement, sufficient to undo it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TrailEntry<T> {
    old_score: T,
    coord: Coordinate,
    mask: LineMask,
}

impl<T> TrailEntry<T>
where
    T: Copy,
{
    /// Returns the score before the placement.
    #[inline]
    pub fn old_score(&self) -> T {
        self.old_score
    }

    /// Returns the placed coordinate.
    #[inline]
    pub fn coord(&self) -> Coordinate {
        self.coord
    }

    /// Returns the line bits newly set by the placement.
    #[inline]
    pub fn mask(&self) -> LineMask {
        self.mask
    }
}

impl<T> std::fmt::Display for TrailEntry<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TrailEntry(coord: {}, mask: {:#06b}, old_score: {})",
            self.coord,
            self.mask.bits(),
            self.old_score
        )
    }
}

/// Coverage of the current partial placement plus the undo trail.
///
/// Two trackers compare equal when they hold the same placements in the same
/// order with the same coverage and score; allocated capacity is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageTracker<T> {
    coverage: Coverage,
    trail: Vec<TrailEntry<T>>,
    cells: Vec<Coordinate>,
    score: T,
    num_placers: usize,
}

impl<T> Default for CoverageTracker<T>
where
    T: SolverWeight,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CoverageTracker<T>
where
    T: SolverWeight,
{
    /// Creates an empty tracker for a zero-sized board.
    #[inline]
    pub fn new() -> Self {
        Self {
            coverage: Coverage::new(0),
            trail: Vec::new(),
            cells: Vec::new(),
            score: T::zero(),
            num_placers: 0,
        }
    }

    /// Creates an empty tracker with storage for a board of side `size`
    /// holding `num_placers` placers.
    #[inline]
    pub fn preallocated(size: usize, num_placers: usize) -> Self {
        Self {
            coverage: Coverage::new(size),
            trail: Vec::with_capacity(num_placers),
            cells: Vec::with_capacity(num_placers),
            score: T::zero(),
            num_placers,
        }
    }

    /// Clears the tracker and resizes it for `board`, keeping allocations
    /// where possible.
    pub fn reset(&mut self, board: &WeightedBoard<T>) {
        self.coverage.reset(board.size());
        self.trail.clear();
        self.cells.clear();
        self.score = T::zero();
        self.num_placers = board.num_placers();

        let d = board.num_placers();
        if self.trail.capacity() < d {
            self.trail.reserve(d);
        }
        if self.cells.capacity() < d {
            self.cells.reserve(d);
        }
    }

    /// Clears all placements without changing the board dimensions.
    #[inline]
    pub fn clear(&mut self) {
        self.coverage.clear();
        self.trail.clear();
        self.cells.clear();
        self.score = T::zero();
    }

    /// Returns `true` if `coord` shares a line with any placed coordinate.
    #[inline(always)]
    pub fn covered(&self, coord: Coordinate) -> bool {
        self.coverage.is_covered(coord)
    }

    /// Places a placer on `coord`, collecting its weight.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `coord` is off the board or already covered.
    #[inline]
    pub fn place(&mut self, board: &WeightedBoard<T>, coord: Coordinate) {
        debug_assert!(
            coord.is_within(self.coverage.size()),
            "called `CoverageTracker::place` with coordinate out of bounds: the size is {} but the coordinate is {}",
            self.coverage.size(),
            coord
        );
        debug_assert!(
            !self.covered(coord),
            "called `CoverageTracker::place` with covered coordinate {}",
            coord
        );

        let mask = self.coverage.occupy(coord);
        self.trail.push(TrailEntry {
            old_score: self.score,
            coord,
            mask,
        });
        self.cells.push(coord);
        self.score = self.score.saturating_add_val(board.weight(coord));
    }

    /// Undoes the most recent `place` and returns its coordinate.
    ///
    /// # Panics
    ///
    /// Panics if nothing has been placed.
    #[inline]
    pub fn unplace(&mut self) -> Coordinate {
        let entry = self
            .trail
            .pop()
            .expect("called `CoverageTracker::unplace` on an empty tracker");
        self.cells.pop();
        self.coverage.release(entry.coord, entry.mask);
        self.score = entry.old_score;
        entry.coord
    }

    /// Returns `true` once all placers are placed.
    #[inline(always)]
    pub fn is_done(&self) -> bool {
        self.cells.len() == self.num_placers
    }

    /// Returns the weight collected so far.
    #[inline(always)]
    pub fn score(&self) -> T {
        self.score
    }

    /// Returns the number of placed placers.
    #[inline(always)]
    pub fn depth(&self) -> usize {
        self.cells.len()
    }

    /// Returns the number of placers still to place.
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.num_placers.saturating_sub(self.cells.len())
    }

    /// Returns the number of placers a complete placement holds.
    #[inline]
    pub fn num_placers(&self) -> usize {
        self.num_placers
    }

    /// Returns the placed coordinates in placement order.
    #[inline]
    pub fn placements(&self) -> &[Coordinate] {
        &self.cells
    }

    /// Returns the row of the most recent placement, if any.
    #[inline]
    pub fn last_row(&self) -> Option<usize> {
        self.cells.last().map(Coordinate::row)
    }

    /// Returns the current line coverage.
    #[inline]
    pub fn coverage(&self) -> &Coverage {
        &self.coverage
    }

    /// Returns the trail entries, oldest first.
    #[inline]
    pub fn trail(&self) -> &[TrailEntry<T>] {
        &self.trail
    }

    /// Builds a `Placement` from the current state.
    #[inline]
    pub fn to_placement(&self) -> Placement<T> {
        Placement::new(self.score, self.cells.clone())
    }

    /// Returns the total allocated memory in bytes.
    #[inline]
    pub fn allocated_memory_bytes(&self) -> usize {
        let trail = self.trail.capacity() * std::mem::size_of::<TrailEntry<T>>();
        let cells = self.cells.capacity() * std::mem::size_of::<Coordinate>();
        // Each bit set stores at most 2n - 1 bits.
        let lines = 4 * (2 * self.coverage.size()).div_ceil(8);
        trail + cells + lines
    }
}

impl<T> std::fmt::Display for CoverageTracker<T>
where
    T: SolverWeight,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CoverageTracker(depth: {}/{}, score: {})",
            self.depth(),
            self.num_placers,
            self.score
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn c(row: usize, col: usize) -> Coordinate {
        Coordinate::new(row, col)
    }

    fn scenario_board() -> WeightedBoard<u32> {
        WeightedBoard::from_contributions(4, 2, [(c(0, 0), 1), (c(1, 2), 3), (c(3, 3), 5)])
            .unwrap()
    }

    #[test]
    fn test_place_covers_all_four_lines() {
        let board = scenario_board();
        let mut t = CoverageTracker::new();
        t.reset(&board);

        t.place(&board, c(1, 2));
        assert_eq!(t.score(), 3);
        assert_eq!(t.depth(), 1);
        assert_eq!(t.remaining(), 1);
        assert_eq!(t.last_row(), Some(1));

        assert!(t.covered(c(1, 0))); // row
        assert!(t.covered(c(3, 2))); // column
        assert!(t.covered(c(2, 3))); // diagonal
        assert!(t.covered(c(0, 3))); // anti-diagonal
        assert!(!t.covered(c(0, 0)));
        assert!(!t.covered(c(3, 3)));
    }

    #[test]
    fn test_place_then_unplace_restores_equal_state() {
        let board = scenario_board();
        let mut t = CoverageTracker::preallocated(4, 2);
        t.reset(&board);
        t.place(&board, c(0, 0));
        let before = t.clone();

        t.place(&board, c(1, 2));
        assert!(t.is_done());
        assert_eq!(t.score(), 4);
        assert_eq!(t.unplace(), c(1, 2));
        assert_eq!(t, before);

        assert_eq!(t.unplace(), c(0, 0));
        assert_eq!(t.score(), 0);
        assert_eq!(t.depth(), 0);
        assert!(!t.covered(c(2, 2)));
    }

    #[test]
    fn test_unplace_only_clears_bits_it_set() {
        let board = WeightedBoard::<u32>::from_contributions(5, 3, std::iter::empty()).unwrap();
        let mut t = CoverageTracker::new();
        t.reset(&board);
        t.place(&board, c(0, 2));
        t.place(&board, c(2, 3));
        assert_eq!(t.trail().len(), 2);
        assert!(t.covered(c(3, 4)));
        assert!(t.covered(c(4, 3)));

        assert_eq!(t.unplace(), c(2, 3));
        // Lines of (0, 2) stay occupied.
        assert!(t.covered(c(0, 4)));
        assert!(t.covered(c(4, 2)));
        assert!(t.covered(c(2, 0)));
        assert!(t.covered(c(2, 4)));
        // Lines only (2, 3) occupied are free again.
        assert!(!t.covered(c(3, 4)));
        assert!(!t.covered(c(4, 3)));
        assert!(!t.covered(c(2, 1)));
    }

    #[test]
    #[should_panic(expected = "called `CoverageTracker::unplace` on an empty tracker")]
    fn test_unplace_on_empty_tracker_panics() {
        let mut t = CoverageTracker::<u32>::new();
        t.unplace();
    }

    #[test]
    fn test_random_place_unplace_sequences_are_idempotent() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let board = WeightedBoard::<u64>::from_contributions(
            8,
            8,
            (0..20).map(|i| (c(i % 8, (i * 3) % 8), i as u64 + 1)),
        )
        .unwrap();
        let mut t = CoverageTracker::new();
        t.reset(&board);

        let mut snapshots = vec![t.clone()];
        for _ in 0..500 {
            let free: Vec<_> = board.coordinates().filter(|&x| !t.covered(x)).collect();
            if !free.is_empty() && (t.depth() == 0 || rng.random_bool(0.6)) {
                let coord = free[rng.random_range(0..free.len())];
                t.place(&board, coord);
                snapshots.push(t.clone());
            } else if t.depth() > 0 {
                t.unplace();
                snapshots.pop();
                assert_eq!(&t, snapshots.last().unwrap());
            }
            assert_eq!(
                t.score(),
                t.placements().iter().map(|&x| board.weight(x)).sum::<u64>()
            );
        }
        while t.depth() > 0 {
            t.unplace();
        }
        assert_eq!(t, snapshots[0]);
    }

    #[test]
    fn test_reset_resizes_and_clears() {
        let big = WeightedBoard::<u32>::from_contributions(8, 3, std::iter::empty()).unwrap();
        let small = scenario_board();
        let mut t = CoverageTracker::new();
        t.reset(&big);
        t.place(&big, c(7, 7));
        t.reset(&small);
        assert_eq!(t.depth(), 0);
        assert_eq!(t.num_placers(), 2);
        assert_eq!(t.coverage().size(), 4);
        assert!(!t.covered(c(3, 3)));
        assert!(t.allocated_memory_bytes() > 0);
    }

    #[test]
    fn test_to_placement_and_display() {
        let board = scenario_board();
        let mut t = CoverageTracker::new();
        t.reset(&board);
        t.place(&board, c(1, 2));
        t.place(&board, c(3, 3));
        let p = t.to_placement();
        assert_eq!(p.score(), 8);
        assert!(p.validate(&board).is_ok());
        assert_eq!(t.to_string(), "CoverageTracker(depth: 2/2, score: 8)");
        assert_eq!(
            t.trail()[1].to_string(),
            format!(
                "TrailEntry(coord: (3, 3), mask: {:#06b}, old_score: 3)",
                t.trail()[1].mask().bits()
            )
        );
    }
}
