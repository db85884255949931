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

//! Best-first (A*) solver for the weighted placement problem.
//!
//! States are immutable `PlacementState` values kept in a max-priority queue
//! ordered by `f = g + h`, where `g` is the collected weight and `h` the
//! estimate of a `BoundEstimator` against the state's own coverage. Because
//! the estimate never underestimates, the first terminal state popped is
//! optimal.
//!
//! Ties are broken by the larger `g`, then by the lexicographically smaller
//! coordinate sequence, so runs are deterministic. A hashed frontier set and
//! a hashed explored set keep every sequence from being queued twice.

use crate::{result::AstarSolverOutcome, state::PlacementState, stats::AstarSolverStatistics};
use placer_model::{board::WeightedBoard, coord::Coordinate, num::SolverWeight};
use placer_search::{
    eval::estimator::BoundEstimator,
    monitor::search_monitor::{SearchCommand, SearchMonitor},
};
use rustc_hash::FxHashSet;
use std::{cmp::Ordering, collections::BinaryHeap, sync::Arc};

/// A queued state with its priority.
#[derive(Debug, Clone)]
struct FrontierNode<T> {
    upper_bound: T, // Primary key (descending)
    state: PlacementState<T>,
}

impl<T> PartialEq for FrontierNode<T>
where
    T: SolverWeight,
{
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for FrontierNode<T> where T: SolverWeight {}

impl<T> Ord for FrontierNode<T>
where
    T: SolverWeight,
{
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        // `BinaryHeap` pops the greatest element:
        // 1. Higher upper bound first
        // 2. Higher collected score first
        // 3. Lexicographically smaller sequence first
        self.upper_bound
            .cmp(&other.upper_bound)
            .then_with(|| self.state.score().cmp(&other.state.score()))
            .then_with(|| other.state.cells().cmp(self.state.cells()))
    }
}

impl<T> PartialOrd for FrontierNode<T>
where
    T: SolverWeight,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A best-first solver that owns its frontier and explored sets and reuses
/// their allocations across solves.
#[derive(Debug, Clone)]
pub struct BestFirstSolver<T> {
    frontier: BinaryHeap<FrontierNode<T>>,
    queued: FxHashSet<Arc<[Coordinate]>>,
    explored: FxHashSet<Arc<[Coordinate]>>,
}

impl<T> Default for BestFirstSolver<T>
where
    T: SolverWeight,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BestFirstSolver<T>
where
    T: SolverWeight,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            frontier: BinaryHeap::new(),
            queued: FxHashSet::default(),
            explored: FxHashSet::default(),
        }
    }

    /// Creates a solver whose frontier and sets can hold `capacity` states
    /// without reallocating.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            frontier: BinaryHeap::with_capacity(capacity),
            queued: FxHashSet::with_capacity_and_hasher(capacity, Default::default()),
            explored: FxHashSet::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Searches `board` for a maximum-weight placement.
    ///
    /// `monitor` is stepped once per expansion and may abort the search, in
    /// which case the outcome carries no placement.
    pub fn solve<E, M>(
        &mut self,
        board: &WeightedBoard<T>,
        estimator: &mut E,
        monitor: &mut M,
    ) -> AstarSolverOutcome<T>
    where
        E: BoundEstimator<T>,
        M: SearchMonitor<T> + ?Sized,
    {
        let start_time = std::time::Instant::now();
        let mut stats = AstarSolverStatistics::default();
        self.reset();
        monitor.on_enter_search(board);

        let num_placers = board.num_placers();
        let root = PlacementState::root(board.size());
        let root_bound = estimator.upper_bound(board, root.score(), num_placers, root.coverage());
        self.enqueue(root, root_bound, &mut stats);

        let outcome = loop {
            monitor.on_step();
            if let SearchCommand::Terminate(msg) = monitor.search_command() {
                break Err(msg);
            }

            let node = match self.frontier.pop() {
                Some(node) => node,
                None => break Ok(None),
            };
            let state = node.state;
            self.queued.remove(state.cells());

            if state.is_terminal(num_placers) {
                break Ok(Some(state.to_placement()));
            }

            stats.on_expansion();
            self.explored.insert(state.key());
            self.expand(board, estimator, &state, &mut stats);
        };

        stats.set_explored(self.explored.len());
        let outcome = match outcome {
            Ok(Some(placement)) => {
                stats.on_solution_found();
                monitor.on_solution_found(&placement);
                stats.set_total_time(start_time.elapsed());
                AstarSolverOutcome::optimal(placement, stats)
            }
            Ok(None) => {
                stats.set_total_time(start_time.elapsed());
                AstarSolverOutcome::infeasible(stats)
            }
            Err(msg) => {
                stats.set_total_time(start_time.elapsed());
                AstarSolverOutcome::aborted(msg, stats)
            }
        };

        monitor.on_exit_search();
        self.reset();
        outcome
    }

    /// Queues every unexplored successor of `state` in the admissible row window.
    fn expand<E>(
        &mut self,
        board: &WeightedBoard<T>,
        estimator: &mut E,
        state: &PlacementState<T>,
        stats: &mut AstarSolverStatistics,
    ) where
        E: BoundEstimator<T>,
    {
        let size = board.size();
        let remaining = board.num_placers() - state.len();
        let first_row = state.last_row().map_or(0, |row| row + 1);
        let last_row = size - remaining;
        if first_row > last_row {
            return;
        }

        for row in first_row..=last_row {
            for col in 0..size {
                let coord = Coordinate::new(row, col);
                if state.coverage().is_covered(coord) {
                    continue;
                }

                let child = state.successor(board, coord);
                if self.explored.contains(child.cells()) || self.queued.contains(child.cells()) {
                    stats.on_duplicate();
                    continue;
                }

                let upper_bound =
                    estimator.upper_bound(board, child.score(), remaining - 1, child.coverage());
                self.enqueue(child, upper_bound, stats);
            }
        }
    }

    #[inline]
    fn enqueue(
        &mut self,
        state: PlacementState<T>,
        upper_bound: T,
        stats: &mut AstarSolverStatistics,
    ) {
        self.queued.insert(state.key());
        self.frontier.push(FrontierNode { upper_bound, state });
        stats.on_generated();
        stats.on_frontier_size(self.frontier.len());
    }

    /// Clears the frontier and both sets, keeping their capacity.
    #[inline]
    fn reset(&mut self) {
        self.frontier.clear();
        self.queued.clear();
        self.explored.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use placer_model::board::BoardBuilder;
    use placer_search::{
        eval::{
            line_relaxation::LineRelaxationBound, uncovered_sum::UncoveredSumBound,
            validation::brute_force_optimum,
        },
        monitor::{composite::CompositeMonitor, time_limit::TimeLimitMonitor},
        result::{SolverResult, TerminationReason},
    };
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::time::Duration;

    type W = u32;

    fn c(row: usize, col: usize) -> Coordinate {
        Coordinate::new(row, col)
    }

    fn solve(board: &WeightedBoard<W>) -> AstarSolverOutcome<W> {
        let mut solver = BestFirstSolver::new();
        let mut estimator = LineRelaxationBound::new();
        let mut monitor = CompositeMonitor::new();
        solver.solve(board, &mut estimator, &mut monitor)
    }

    #[test]
    fn test_scenario_a() {
        let board =
            WeightedBoard::<W>::from_contributions(4, 2, [(c(0, 0), 1), (c(1, 2), 3), (c(3, 3), 5)])
                .expect("valid board");
        let outcome = solve(&board);

        assert_eq!(outcome.termination_reason(), &TerminationReason::OptimalityProven);
        let placement = outcome.placement().expect("placement");
        assert_eq!(placement.score(), 8);
        assert_eq!(placement.cells(), &[c(1, 2), c(3, 3)]);
        assert_eq!(outcome.statistics().solutions_found, 1);
    }

    #[test]
    fn test_scenario_b_exhausted_frontier_is_infeasible() {
        let board = WeightedBoard::<W>::from_contributions(3, 3, []).expect("valid board");
        let outcome = solve(&board);

        assert_eq!(outcome.result(), &SolverResult::Infeasible);
        assert_eq!(outcome.best_score(), Some(0));
        assert!(outcome.statistics().expansions > 0);
        assert_eq!(outcome.statistics().explored, outcome.statistics().expansions as usize);
    }

    #[test]
    fn test_scenario_c_and_d() {
        let board = WeightedBoard::<W>::from_contributions(
            5,
            1,
            [(c(4, 4), 2), (c(3, 1), 6), (c(0, 2), 5)],
        )
        .expect("valid board");
        assert_eq!(solve(&board).best_score(), Some(6));

        let empty = WeightedBoard::<W>::from_contributions(5, 0, [(c(1, 1), 9)])
            .expect("valid board");
        let outcome = solve(&empty);
        assert_eq!(outcome.best_score(), Some(0));
        assert!(outcome.placement().expect("placement").is_empty());
        assert_eq!(outcome.statistics().expansions, 0);
    }

    #[test]
    fn test_ties_prefer_lexicographically_smaller_sequence() {
        let board = WeightedBoard::<W>::from_contributions(4, 1, [(c(2, 1), 4), (c(1, 3), 4)])
            .expect("valid board");
        let placement = solve(&board).placement().cloned().expect("placement");
        assert_eq!(placement.cells(), &[c(1, 3)]);
    }

    #[test]
    fn test_matches_brute_force_on_random_boards() {
        let mut rng = ChaCha8Rng::seed_from_u64(0xA57A2);
        let mut solver = BestFirstSolver::with_capacity(64);
        let mut line = LineRelaxationBound::new();
        let mut uncovered = UncoveredSumBound::new();
        let mut monitor = CompositeMonitor::new();

        for _ in 0..50 {
            let size = rng.random_range(1..=6);
            let num_placers = rng.random_range(0..=size);
            let mut builder = BoardBuilder::new(size, num_placers);
            for _ in 0..rng.random_range(0..=3 * size) {
                let coord = c(rng.random_range(0..size), rng.random_range(0..size));
                let weight: W = rng.random_range(1..=9);
                builder.add_weight(coord, weight).expect("in bounds");
            }
            let board = builder.build().expect("valid board");
            let expected = brute_force_optimum(&board).map(|p| p.score());

            for outcome in [
                solver.solve(&board, &mut line, &mut monitor),
                solver.solve(&board, &mut uncovered, &mut monitor),
            ] {
                match expected {
                    Some(score) => {
                        assert!(outcome.result().placement().is_some());
                        assert_eq!(outcome.best_score(), Some(score));
                        let placement = outcome.placement().expect("placement");
                        assert!(placement.validate(&board).is_ok());
                    }
                    None => assert_eq!(outcome.result(), &SolverResult::Infeasible),
                }
            }
        }
    }

    #[test]
    fn test_time_limit_aborts_with_unknown() {
        let board = WeightedBoard::<W>::from_contributions(6, 6, [(c(0, 1), 1)])
            .expect("valid board");
        let mut solver = BestFirstSolver::new();
        let mut estimator = LineRelaxationBound::new();
        let mut monitor = TimeLimitMonitor::with_clock_check_mask(Duration::ZERO, 0);
        let outcome = solver.solve(&board, &mut estimator, &mut monitor);

        assert_eq!(outcome.result(), &SolverResult::Unknown);
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::Aborted("time limit reached".into())
        );
        assert_eq!(outcome.best_score(), None);
    }

    #[test]
    fn test_statistics_track_frontier() {
        let board = WeightedBoard::<W>::from_contributions(
            5,
            3,
            [(c(0, 0), 2), (c(1, 3), 4), (c(2, 1), 3), (c(4, 2), 7)],
        )
        .expect("valid board");
        let outcome = solve(&board);
        let stats = outcome.statistics();

        assert!(stats.generated >= stats.expansions);
        assert!(stats.peak_frontier >= 1);
        assert_eq!(stats.explored as u64, stats.expansions);
        assert_eq!(
            outcome.best_score(),
            brute_force_optimum(&board).map(|p| p.score())
        );
    }

    #[test]
    fn test_solver_is_reusable() {
        let board =
            WeightedBoard::<W>::from_contributions(4, 2, [(c(0, 0), 1), (c(1, 2), 3), (c(3, 3), 5)])
                .expect("valid board");
        let mut solver = BestFirstSolver::new();
        let mut estimator = LineRelaxationBound::new();
        let mut monitor = CompositeMonitor::new();

        let first = solver.solve(&board, &mut estimator, &mut monitor);
        assert!(solver.frontier.is_empty());
        assert!(solver.explored.is_empty());
        let second = solver.solve(&board, &mut estimator, &mut monitor);
        assert_eq!(first.result(), second.result());
        assert_eq!(first.statistics().expansions, second.statistics().expansions);
    }
}
