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

//! Validation utilities for bound estimators. This module provides an
//! exhaustive reference solver and a harness that checks a `BoundEstimator`
//! is admissible, in the sense required by the solvers: for every reachable
//! partial placement the estimate must be at least the best weight any
//! completion of that placement actually collects.
//!
//! The reference solver enumerates placements row by row without any
//! pruning, so it is only practical for small boards (`n <= 8`). The
//! admissibility harness walks all partial placements in depth-first order
//! and stops after a configurable number of states so it can also be used as
//! a cheap smoke test on larger instances. These routines are intended for
//! diagnostics during development and testing; they never alter the board or
//! the estimator beyond its scratch buffers.

use crate::eval::estimator::BoundEstimator;
use placer_model::{
    board::WeightedBoard,
    coord::Coordinate,
    coverage::Coverage,
    num::SolverWeight,
    placement::Placement,
};

/// Finds an optimal placement by exhaustive enumeration.
///
/// Returns `None` if `board.num_placers()` non-attacking placers do not fit
/// on the board. Ties are broken towards the lexicographically smallest
/// placement.
pub fn brute_force_optimum<T>(board: &WeightedBoard<T>) -> Option<Placement<T>>
where
    T: SolverWeight,
{
    let mut coverage = Coverage::new(board.size());
    let mut cells = Vec::with_capacity(board.num_placers());
    let mut best: Option<Placement<T>> = None;
    enumerate(
        board,
        0,
        board.num_placers(),
        T::zero(),
        &mut coverage,
        &mut cells,
        &mut |score, cells| {
            if best.as_ref().is_none_or(|b| score > b.score()) {
                best = Some(Placement::new(score, cells.to_vec()));
            }
        },
    );
    best
}

/// Returns the best additional weight obtainable by placing `remaining`
/// more placers on cells not covered by `coverage`, or `None` if they do not fit.
pub fn best_completion<T>(
    board: &WeightedBoard<T>,
    coverage: &Coverage,
    remaining: usize,
) -> Option<T>
where
    T: SolverWeight,
{
    let mut coverage = coverage.clone();
    let mut cells = Vec::with_capacity(remaining);
    let mut best: Option<T> = None;
    enumerate(
        board,
        0,
        remaining,
        T::zero(),
        &mut coverage,
        &mut cells,
        &mut |score, _| {
            if best.is_none_or(|b| score > b) {
                best = Some(score);
            }
        },
    );
    best
}

/// Checks whether `estimator` is admissible on every partial placement of
/// `board` reachable in row order, visiting at most `max_states` states.
///
/// Returns `true` when no violation is detected and `false` at the first
/// state whose estimate is lower than its best completion. States without
/// any feasible completion are skipped, since every bound is admissible there.
pub fn is_admissible_exhaustive<T, E>(
    estimator: &mut E,
    board: &WeightedBoard<T>,
    max_states: usize,
) -> bool
where
    T: SolverWeight,
    E: BoundEstimator<T> + ?Sized,
{
    let mut coverage = Coverage::new(board.size());
    let mut cells = Vec::with_capacity(board.num_placers());
    let mut visited = 0usize;
    check_state(
        estimator,
        board,
        0,
        &mut coverage,
        &mut cells,
        &mut visited,
        max_states,
    )
}

fn check_state<T, E>(
    estimator: &mut E,
    board: &WeightedBoard<T>,
    first_row: usize,
    coverage: &mut Coverage,
    cells: &mut Vec<Coordinate>,
    visited: &mut usize,
    max_states: usize,
) -> bool
where
    T: SolverWeight,
    E: BoundEstimator<T> + ?Sized,
{
    if *visited >= max_states {
        return true;
    }
    *visited += 1;

    let remaining = board.num_placers() - cells.len();
    if let Some(actual) = best_completion(board, coverage, remaining) {
        let estimate = estimator.estimate_remaining(board, remaining, coverage);
        if estimate < actual {
            return false;
        }
    }

    if remaining == 0 {
        return true;
    }

    let size = board.size();
    for row in first_row..size {
        for col in 0..size {
            let coord = Coordinate::new(row, col);
            if coverage.is_covered(coord) {
                continue;
            }
            let mask = coverage.occupy(coord);
            cells.push(coord);
            let ok = check_state(
                estimator,
                board,
                row + 1,
                coverage,
                cells,
                visited,
                max_states,
            );
            cells.pop();
            coverage.release(coord, mask);
            if !ok {
                return false;
            }
        }
    }
    true
}

/// Enumerates every set of `remaining` non-attacking uncovered cells in rows
/// `first_row..`, calling `visit` with the collected score and the cells.
fn enumerate<T, F>(
    board: &WeightedBoard<T>,
    first_row: usize,
    remaining: usize,
    score: T,
    coverage: &mut Coverage,
    cells: &mut Vec<Coordinate>,
    visit: &mut F,
) where
    T: SolverWeight,
    F: FnMut(T, &[Coordinate]),
{
    if remaining == 0 {
        visit(score, cells);
        return;
    }

    let size = board.size();
    if size - first_row.min(size) < remaining {
        return;
    }

    for row in first_row..size {
        for col in 0..size {
            let coord = Coordinate::new(row, col);
            if coverage.is_covered(coord) {
                continue;
            }
            let mask = coverage.occupy(coord);
            cells.push(coord);
            enumerate(
                board,
                row + 1,
                remaining - 1,
                score.saturating_add_val(board.weight(coord)),
                coverage,
                cells,
                visit,
            );
            cells.pop();
            coverage.release(coord, mask);
        }
    }
}
