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

//! Branch-and-bound solver for the weighted placement problem.
//!
//! The solver explores placements row by row in a depth-first manner. Its
//! state lives in two reusable structures: a `CoverageTracker` holding the
//! placed coordinates, their line coverage and an undo trail, and a
//! `SearchStack` holding the pending candidates of every open decision level
//! together with the upper bound of the node that generated them.
//!
//! At every node the solver asks a `BoundEstimator` for `score + estimate`.
//! A node whose bound does not exceed the best known score is pruned, and a
//! level whose owning bound has been reached by the incumbent is abandoned
//! with all its remaining siblings. Candidates are enumerated in increasing
//! `(row, col)` order, so runs are deterministic.
//!
//! A session can start below a fixed prefix of placements and can share its
//! incumbent with other solver instances through a `SharedIncumbent`. The
//! tracker and stack keep their capacity between runs and are empty again
//! after every solve.

use crate::{
    incumbent::{IncumbentStore, NoSharedIncumbent, SharedIncumbentAdapter},
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    result::BnbSolverOutcome,
    stack::SearchStack,
    stats::BnbSolverStatistics,
    tracker::CoverageTracker,
};
use placer_model::{
    board::WeightedBoard, coord::Coordinate, num::SolverWeight, placement::Placement,
};
use placer_search::{
    eval::{self, estimator::BoundEstimator},
    incumbent::SharedIncumbent,
    monitor::search_monitor::SearchCommand,
    result::TerminationReason,
};

/// Largest board side for which the debug admissibility check runs.
const ADMISSIBILITY_CHECK_MAX_SIZE: usize = 5;
const ADMISSIBILITY_CHECK_MAX_STATES: usize = 2_000;

/// A depth-first branch-and-bound solver over row-ordered placements.
///
/// This is only the execution engine: the bound is supplied by a
/// `BoundEstimator` and observation by a `TreeSearchMonitor`.
#[derive(Clone, Debug)]
pub struct BranchAndBoundSolver<T> {
    tracker: CoverageTracker<T>,
    stack: SearchStack<T>,
}

impl<T> Default for BranchAndBoundSolver<T>
where
    T: SolverWeight,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BranchAndBoundSolver<T>
where
    T: SolverWeight,
{
    /// Creates a new solver instance.
    #[inline]
    pub fn new() -> Self {
        Self {
            tracker: CoverageTracker::new(),
            stack: SearchStack::new(),
        }
    }

    /// Creates a solver with storage preallocated for a board of side `size`
    /// holding `num_placers` placers.
    ///
    /// # Note
    ///
    /// The solver grows its storage on demand when solving a larger board;
    /// preallocation only moves the cost of the allocations to construction.
    #[inline]
    pub fn preallocated(size: usize, num_placers: usize) -> Self {
        Self {
            tracker: CoverageTracker::preallocated(size, num_placers),
            stack: SearchStack::preallocated(size, num_placers),
        }
    }

    /// Solves `board` as a standalone, single threaded search.
    #[inline]
    pub fn solve<E, S>(
        &mut self,
        board: &WeightedBoard<T>,
        estimator: &mut E,
        monitor: S,
    ) -> BnbSolverOutcome<T>
    where
        E: BoundEstimator<T>,
        S: TreeSearchMonitor<T>,
    {
        let backing = NoSharedIncumbent::new();
        self.solve_internal(board, &[], estimator, monitor, backing)
    }

    /// Solves `board`, pruning against and publishing to `incumbent`.
    #[inline]
    pub fn solve_with_incumbent<E, S>(
        &mut self,
        board: &WeightedBoard<T>,
        estimator: &mut E,
        monitor: S,
        incumbent: &SharedIncumbent<T>,
    ) -> BnbSolverOutcome<T>
    where
        E: BoundEstimator<T>,
        S: TreeSearchMonitor<T>,
    {
        let backing = SharedIncumbentAdapter::new(incumbent);
        self.solve_internal(board, &[], estimator, monitor, backing)
    }

    /// Solves `board` below the placements in `fixed`.
    ///
    /// The prefix must be in strictly increasing row order, on the board,
    /// pairwise non-attacking and no longer than `board.num_placers()`;
    /// otherwise the outcome is `Infeasible`.
    #[inline]
    pub fn solve_with_fixed<E, S>(
        &mut self,
        board: &WeightedBoard<T>,
        estimator: &mut E,
        monitor: S,
        fixed: &[Coordinate],
    ) -> BnbSolverOutcome<T>
    where
        E: BoundEstimator<T>,
        S: TreeSearchMonitor<T>,
    {
        let backing = NoSharedIncumbent::new();
        self.solve_internal(board, fixed, estimator, monitor, backing)
    }

    /// Solves `board` below the placements in `fixed`, sharing the incumbent
    /// with other solver instances.
    #[inline]
    pub fn solve_with_fixed_and_incumbent<E, S>(
        &mut self,
        board: &WeightedBoard<T>,
        estimator: &mut E,
        monitor: S,
        fixed: &[Coordinate],
        incumbent: &SharedIncumbent<T>,
    ) -> BnbSolverOutcome<T>
    where
        E: BoundEstimator<T>,
        S: TreeSearchMonitor<T>,
    {
        let backing = SharedIncumbentAdapter::new(incumbent);
        self.solve_internal(board, fixed, estimator, monitor, backing)
    }

    /// Returns the memory currently held by the solver's reusable structures.
    #[inline]
    pub fn allocated_memory_bytes(&self) -> usize {
        self.tracker.allocated_memory_bytes() + self.stack.allocated_memory_bytes()
    }

    /// # Panics
    ///
    /// In debug builds, panics if `estimator` underestimates the best
    /// completion of some state of a small board.
    #[inline(always)]
    fn solve_internal<E, S, I>(
        &mut self,
        board: &WeightedBoard<T>,
        fixed: &[Coordinate],
        estimator: &mut E,
        mut monitor: S,
        backing: I,
    ) -> BnbSolverOutcome<T>
    where
        E: BoundEstimator<T>,
        S: TreeSearchMonitor<T>,
        I: IncumbentStore<T>,
    {
        debug_assert!(
            board.size() > ADMISSIBILITY_CHECK_MAX_SIZE
                || eval::validation::is_admissible_exhaustive(
                    estimator,
                    board,
                    ADMISSIBILITY_CHECK_MAX_STATES
                ),
            "BoundEstimator '{}' is not admissible",
            estimator.name()
        );

        let session =
            BnbSolverSearchSession::new(self, board, fixed, estimator, &mut monitor, backing);
        let outcome = session.run();
        self.reset();
        outcome
    }

    /// Clears the tracker and the stack without releasing their memory.
    #[inline]
    fn reset(&mut self) {
        self.tracker.clear();
        self.stack.reset();
    }
}

/// The state and logic of a single search run.
struct BnbSolverSearchSession<'a, T, E, S, I>
where
    T: SolverWeight,
{
    solver: &'a mut BranchAndBoundSolver<T>,
    board: &'a WeightedBoard<T>,
    fixed: &'a [Coordinate],
    estimator: &'a mut E,
    monitor: &'a mut S,
    incumbent: I,
    best_score: Option<T>,
    best_placement: Option<Placement<T>>,
    stats: BnbSolverStatistics<T>,
    start_time: std::time::Instant,
}

impl<'a, T, E, S, I> std::fmt::Debug for BnbSolverSearchSession<'a, T, E, S, I>
where
    T: SolverWeight,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BnbSolverSearchSession")
            .field("tracker", &self.solver.tracker)
            .field("best_score", &self.best_score)
            .field("best_placement", &self.best_placement)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<'a, T, E, S, I> BnbSolverSearchSession<'a, T, E, S, I>
where
    T: SolverWeight,
    E: BoundEstimator<T>,
    S: TreeSearchMonitor<T>,
    I: IncumbentStore<T>,
{
    #[inline]
    fn new(
        solver: &'a mut BranchAndBoundSolver<T>,
        board: &'a WeightedBoard<T>,
        fixed: &'a [Coordinate],
        estimator: &'a mut E,
        monitor: &'a mut S,
        incumbent: I,
    ) -> Self {
        let best_score = incumbent.initial_lower_bound();
        Self {
            solver,
            board,
            fixed,
            estimator,
            monitor,
            incumbent,
            best_score,
            best_placement: None,
            stats: BnbSolverStatistics::default(),
            start_time: std::time::Instant::now(),
        }
    }

    fn run(mut self) -> BnbSolverOutcome<T> {
        self.monitor.on_enter_search(self.board, &self.stats);

        if !self.initialize() {
            self.stats.set_total_time(self.start_time.elapsed());
            self.monitor.on_exit_search(&self.stats);
            return self.finalize_result(TerminationReason::InfeasibilityProven);
        }

        let termination_reason = loop {
            self.best_score = self.incumbent.tighten(self.best_score);
            self.monitor.on_step(&self.solver.tracker, &self.stats);
            self.stats.on_step();

            if let SearchCommand::Terminate(msg) =
                self.monitor.search_command(&self.solver.tracker, &self.stats)
            {
                break TerminationReason::Aborted(msg);
            }

            self.try_early_exit();

            if self.solver.stack.is_current_level_empty() {
                if self.solver.stack.depth() <= 1 {
                    break if self.best_placement.is_some() {
                        TerminationReason::OptimalityProven
                    } else {
                        TerminationReason::InfeasibilityProven
                    };
                }
                self.backtrack_step();
            } else {
                self.process_next_candidate();
            }
        };

        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);
        self.finalize_result(termination_reason)
    }

    /// Converts the termination reason into an outcome. Consumes the session.
    fn finalize_result(self, reason: TerminationReason) -> BnbSolverOutcome<T> {
        match reason {
            TerminationReason::OptimalityProven => match self.best_placement {
                Some(placement) => BnbSolverOutcome::optimal(placement, self.stats),
                None => BnbSolverOutcome::infeasible(self.stats),
            },
            TerminationReason::InfeasibilityProven => BnbSolverOutcome::infeasible(self.stats),
            TerminationReason::Aborted(msg) => {
                BnbSolverOutcome::aborted(self.best_placement, msg, self.stats)
            }
        }
    }

    /// Sets up the root node. Returns `false` if the fixed prefix is invalid.
    fn initialize(&mut self) -> bool {
        self.solver.tracker.reset(self.board);
        self.solver
            .stack
            .ensure_capacity(self.board.size(), self.board.num_placers());

        if !self.apply_fixed_prefix() {
            return false;
        }

        self.stats.on_node_explored();
        self.stats
            .on_depth_update(self.solver.tracker.depth() as u64);

        if self.solver.tracker.is_done() {
            let score = self.solver.tracker.score();
            self.solver.stack.push_frame(score);
            self.stats.set_root_upper_bound(score);
            self.handle_complete_solution();
            return true;
        }

        let upper_bound = self.compute_upper_bound();
        self.stats.set_root_upper_bound(upper_bound);
        self.solver.stack.push_frame(upper_bound);

        if self.is_dominated(upper_bound) {
            self.stats.on_pruning_bound();
            self.monitor.on_prune(
                &self.solver.tracker,
                PruneReason::BoundDominated,
                &self.stats,
            );
            return true;
        }

        self.enqueue_candidates();
        true
    }

    /// Places the fixed prefix, rejecting anything that is not a valid
    /// row-ordered partial placement.
    fn apply_fixed_prefix(&mut self) -> bool {
        if self.fixed.len() > self.board.num_placers() {
            return false;
        }

        let size = self.board.size();
        let mut previous_row: Option<usize> = None;
        for &coord in self.fixed {
            if !coord.is_within(size) {
                return false;
            }
            if previous_row.is_some_and(|row| coord.row() <= row) {
                return false;
            }
            if self.solver.tracker.covered(coord) {
                return false;
            }
            self.solver.tracker.place(self.board, coord);
            previous_row = Some(coord.row());
        }
        true
    }

    /// Discards the rest of the current level once the incumbent has reached
    /// the bound of the node that owns it.
    #[inline(always)]
    fn try_early_exit(&mut self) {
        if self.solver.stack.is_current_level_empty() {
            return;
        }
        let level_bound = match self.solver.stack.current_frame() {
            Some(frame) => frame.upper_bound(),
            None => return,
        };
        if self.is_dominated(level_bound) {
            self.solver.stack.clear_current_level();
            self.stats.on_early_exit();
        }
    }

    #[inline(always)]
    fn is_dominated(&self, upper_bound: T) -> bool {
        self.best_score.is_some_and(|best| upper_bound <= best)
    }

    #[inline(always)]
    fn compute_upper_bound(&mut self) -> T {
        let tracker = &self.solver.tracker;
        let estimate =
            self.estimator
                .estimate_remaining(self.board, tracker.remaining(), tracker.coverage());
        let upper_bound = tracker.score().saturating_add_val(estimate);
        self.monitor
            .on_upper_bound_computed(tracker, upper_bound, estimate, &self.stats);
        upper_bound
    }

    /// Pushes every uncovered cell in the admissible row window of the current
    /// node, so that they pop in increasing `(row, col)` order.
    fn enqueue_candidates(&mut self) -> usize {
        let tracker = &self.solver.tracker;
        let size = self.board.size();
        let first_row = tracker.last_row().map_or(0, |row| row + 1);
        let last_row = size - tracker.remaining();

        let before = self.solver.stack.num_entries();
        if first_row <= last_row {
            for row in (first_row..=last_row).rev() {
                for col in (0..size).rev() {
                    let coord = Coordinate::new(row, col);
                    if !tracker.covered(coord) {
                        self.solver.stack.push(coord);
                    }
                }
            }
        }
        let added = self.solver.stack.num_entries() - before;

        self.monitor
            .on_candidates_enqueued(&self.solver.tracker, added, &self.stats);
        added
    }

    #[inline]
    fn backtrack_step(&mut self) {
        self.stats.on_backtrack();
        self.monitor.on_backtrack(&self.solver.tracker, &self.stats);

        self.solver.tracker.unplace();
        self.solver.stack.pop_frame();
    }

    #[inline(always)]
    fn process_next_candidate(&mut self) {
        let coord = match self.solver.stack.pop() {
            Some(coord) => coord,
            None => return,
        };
        self.stats.on_candidate_generated();
        self.descend(coord);
    }

    /// Places `coord` and opens the child's decision level.
    fn descend(&mut self, coord: Coordinate) {
        debug_assert!(
            !self.solver.tracker.covered(coord),
            "called `BnbSolverSearchSession::descend` with covered coordinate {}",
            coord
        );

        self.solver.tracker.place(self.board, coord);
        self.stats.on_node_explored();
        self.stats
            .on_depth_update(self.solver.tracker.depth() as u64);
        self.monitor
            .on_descend(&self.solver.tracker, coord, &self.stats);

        if self.solver.tracker.is_done() {
            self.solver.stack.push_frame(self.solver.tracker.score());
            self.handle_complete_solution();
            return;
        }

        let upper_bound = self.compute_upper_bound();
        self.solver.stack.push_frame(upper_bound);

        if self.is_dominated(upper_bound) {
            self.stats.on_pruning_bound();
            self.monitor.on_prune(
                &self.solver.tracker,
                PruneReason::BoundDominated,
                &self.stats,
            );
            self.backtrack_step();
            return;
        }

        if self.enqueue_candidates() == 0 {
            self.stats.on_pruning_infeasible();
            self.monitor
                .on_prune(&self.solver.tracker, PruneReason::Infeasible, &self.stats);
        }
    }

    /// Installs the current complete placement if it improves the incumbent.
    fn handle_complete_solution(&mut self) {
        let score = self.solver.tracker.score();
        if self.best_score.is_none_or(|best| score > best) {
            let placement = self.solver.tracker.to_placement();
            self.best_score = Some(score);
            self.incumbent.on_solution_found(&placement);
            self.stats.on_solution_found();
            self.monitor.on_solution_found(&placement, &self.stats);
            self.best_placement = Some(placement);
        } else {
            self.stats.on_pruning_bound();
            self.monitor.on_prune(
                &self.solver.tracker,
                PruneReason::BoundDominated,
                &self.stats,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{
        log::LogTreeSearchMonitor, no_op::NoOperationMonitor, wrapper::WrapperMonitor,
    };
    use placer_model::board::BoardBuilder;
    use placer_search::{
        eval::{
            line_relaxation::LineRelaxationBound, uncovered_sum::UncoveredSumBound,
            validation::brute_force_optimum,
        },
        monitor::solution::SolutionMonitor,
        result::SolverResult,
    };
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::sync::atomic::AtomicU64;

    type W = u32;

    fn c(row: usize, col: usize) -> Coordinate {
        Coordinate::new(row, col)
    }

    fn scenario_a() -> WeightedBoard<W> {
        WeightedBoard::from_contributions(4, 2, [(c(0, 0), 1), (c(1, 2), 3), (c(3, 3), 5)])
            .expect("valid board")
    }

    fn random_board(rng: &mut ChaCha8Rng, size: usize, num_placers: usize) -> WeightedBoard<W> {
        let mut builder = BoardBuilder::new(size, num_placers);
        let packages = rng.random_range(0..=2 * size * size);
        for _ in 0..packages {
            let coord = c(rng.random_range(0..size), rng.random_range(0..size));
            builder.add_package(coord).expect("in bounds");
        }
        builder.build().expect("valid board")
    }

    fn solve_default(board: &WeightedBoard<W>) -> BnbSolverOutcome<W> {
        let mut solver = BranchAndBoundSolver::new();
        let mut estimator = LineRelaxationBound::new();
        solver.solve(board, &mut estimator, NoOperationMonitor::new())
    }

    struct AbortAfter {
        remaining_steps: u64,
    }

    impl TreeSearchMonitor<W> for AbortAfter {
        fn name(&self) -> &str {
            "AbortAfter"
        }
        fn on_enter_search(&mut self, _: &WeightedBoard<W>, _: &BnbSolverStatistics<W>) {}
        fn on_exit_search(&mut self, _: &BnbSolverStatistics<W>) {}
        fn search_command(
            &mut self,
            _: &CoverageTracker<W>,
            _: &BnbSolverStatistics<W>,
        ) -> SearchCommand {
            if self.remaining_steps == 0 {
                return SearchCommand::Terminate("step budget exhausted".into());
            }
            self.remaining_steps -= 1;
            SearchCommand::Continue
        }
        fn on_step(&mut self, _: &CoverageTracker<W>, _: &BnbSolverStatistics<W>) {}
        fn on_upper_bound_computed(
            &mut self,
            _: &CoverageTracker<W>,
            _: W,
            _: W,
            _: &BnbSolverStatistics<W>,
        ) {
        }
        fn on_prune(&mut self, _: &CoverageTracker<W>, _: PruneReason, _: &BnbSolverStatistics<W>) {}
        fn on_candidates_enqueued(
            &mut self,
            _: &CoverageTracker<W>,
            _: usize,
            _: &BnbSolverStatistics<W>,
        ) {
        }
        fn on_descend(&mut self, _: &CoverageTracker<W>, _: Coordinate, _: &BnbSolverStatistics<W>) {}
        fn on_backtrack(&mut self, _: &CoverageTracker<W>, _: &BnbSolverStatistics<W>) {}
        fn on_solution_found(&mut self, _: &Placement<W>, _: &BnbSolverStatistics<W>) {}
    }

    #[test]
    fn test_scenario_a_optimal_score() {
        let board = scenario_a();
        let outcome = solve_default(&board);

        assert_eq!(outcome.termination_reason(), &TerminationReason::OptimalityProven);
        let placement = outcome.placement().expect("optimal placement");
        assert_eq!(placement.score(), 8);
        assert_eq!(placement.cells(), &[c(1, 2), c(3, 3)]);
        assert!(placement.validate(&board).is_ok());
    }

    #[test]
    fn test_scenario_b_all_zero_three_by_three_is_infeasible() {
        let board = WeightedBoard::<W>::from_contributions(3, 3, []).expect("valid board");
        let outcome = solve_default(&board);

        assert_eq!(outcome.result(), &SolverResult::Infeasible);
        assert_eq!(outcome.best_score(), Some(0));
        assert_eq!(outcome.statistics().solutions_found, 0);
    }

    #[test]
    fn test_scenario_c_single_placer_takes_max_cell() {
        let board = WeightedBoard::<W>::from_contributions(
            5,
            1,
            [(c(0, 4), 3), (c(2, 2), 9), (c(4, 0), 7), (c(2, 2), 1)],
        )
        .expect("valid board");
        let outcome = solve_default(&board);

        let placement = outcome.placement().expect("placement");
        assert_eq!(placement.score(), 10);
        assert_eq!(placement.cells(), &[c(2, 2)]);
    }

    #[test]
    fn test_scenario_d_zero_placers_needs_no_search() {
        let board = WeightedBoard::<W>::from_contributions(4, 0, [(c(1, 1), 4)])
            .expect("valid board");
        let outcome = solve_default(&board);

        assert_eq!(outcome.termination_reason(), &TerminationReason::OptimalityProven);
        let placement = outcome.placement().expect("empty placement");
        assert!(placement.is_empty());
        assert_eq!(placement.score(), 0);
        assert_eq!(outcome.statistics().nodes_explored, 1);
        assert_eq!(outcome.statistics().candidates_generated, 0);
    }

    #[test]
    fn test_all_zero_feasible_board_is_optimal_with_zero() {
        let board = WeightedBoard::<W>::from_contributions(4, 4, []).expect("valid board");
        let outcome = solve_default(&board);

        assert_eq!(outcome.termination_reason(), &TerminationReason::OptimalityProven);
        let placement = outcome.placement().expect("placement");
        assert_eq!(placement.score(), 0);
        assert_eq!(placement.len(), 4);
        assert!(placement.validate(&board).is_ok());
    }

    #[test]
    fn test_matches_brute_force_on_random_boards() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5EED);
        let mut solver = BranchAndBoundSolver::new();
        let mut line = LineRelaxationBound::new();
        let mut uncovered = UncoveredSumBound::new();

        for _ in 0..60 {
            let size = rng.random_range(1..=6);
            let num_placers = rng.random_range(0..=size);
            let board = random_board(&mut rng, size, num_placers);
            let expected = brute_force_optimum(&board).map(|p| p.score());

            for outcome in [
                solver.solve(&board, &mut line, NoOperationMonitor::new()),
                solver.solve(&board, &mut uncovered, NoOperationMonitor::new()),
            ] {
                match expected {
                    Some(score) => {
                        assert!(outcome.result().placement().is_some(), "board {:?}", board);
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
    fn test_fixed_prefix_restricts_search() {
        let board = scenario_a();
        let mut solver = BranchAndBoundSolver::new();
        let mut estimator = LineRelaxationBound::new();

        let outcome = solver.solve_with_fixed(
            &board,
            &mut estimator,
            NoOperationMonitor::new(),
            &[c(0, 0)],
        );
        let placement = outcome.placement().expect("placement");
        assert_eq!(placement.cells()[0], c(0, 0));
        // (0, 0) shares the main diagonal with (3, 3); best partner is (1, 2).
        assert_eq!(placement.score(), 4);
    }

    #[test]
    fn test_complete_fixed_prefix_is_its_own_optimum() {
        let board = scenario_a();
        let mut solver = BranchAndBoundSolver::new();
        let mut estimator = LineRelaxationBound::new();

        let outcome = solver.solve_with_fixed(
            &board,
            &mut estimator,
            NoOperationMonitor::new(),
            &[c(1, 2), c(3, 3)],
        );
        assert_eq!(outcome.termination_reason(), &TerminationReason::OptimalityProven);
        assert_eq!(outcome.best_score(), Some(8));
    }

    #[test]
    fn test_invalid_fixed_prefixes_are_infeasible() {
        let board = scenario_a();
        let mut solver = BranchAndBoundSolver::new();
        let mut estimator = LineRelaxationBound::new();

        let invalid: [&[Coordinate]; 4] = [
            &[c(0, 0), c(1, 1)],         // attacking
            &[c(2, 0), c(0, 3)],         // out of row order
            &[c(0, 4)],                  // off the board
            &[c(0, 1), c(2, 0), c(3, 2)], // longer than d
        ];
        for prefix in invalid {
            let outcome =
                solver.solve_with_fixed(&board, &mut estimator, NoOperationMonitor::new(), prefix);
            assert_eq!(outcome.result(), &SolverResult::Infeasible, "{:?}", prefix);
            assert_eq!(solver.tracker.depth(), 0);
            assert_eq!(solver.stack.depth(), 0);
        }
    }

    #[test]
    fn test_shared_incumbent_is_published() {
        let board = scenario_a();
        let shared = SharedIncumbent::new();
        let mut solver = BranchAndBoundSolver::new();
        let mut estimator = LineRelaxationBound::new();

        let outcome =
            solver.solve_with_incumbent(&board, &mut estimator, NoOperationMonitor::new(), &shared);
        assert_eq!(outcome.best_score(), Some(8));
        assert_eq!(shared.best_score(), Some(8));
        assert_eq!(
            shared.snapshot().map(|p| p.into_cells()),
            Some(vec![c(1, 2), c(3, 3)])
        );
    }

    #[test]
    fn test_optimal_shared_incumbent_prunes_root() {
        let board = scenario_a();
        let shared = SharedIncumbent::new();
        assert!(shared.try_install(&Placement::new(8, vec![c(1, 2), c(3, 3)])));

        let mut solver = BranchAndBoundSolver::new();
        let mut estimator = LineRelaxationBound::new();
        let outcome =
            solver.solve_with_incumbent(&board, &mut estimator, NoOperationMonitor::new(), &shared);

        // Nothing locally better exists, so this run proves nothing by itself.
        assert_eq!(outcome.result(), &SolverResult::Infeasible);
        assert_eq!(outcome.statistics().solutions_found, 0);
        assert_eq!(shared.best_score(), Some(8));
    }

    #[test]
    fn test_worse_shared_incumbent_is_overwritten() {
        let board = scenario_a();
        let shared = SharedIncumbent::new();
        assert!(shared.try_install(&Placement::new(4, vec![c(0, 0), c(1, 2)])));

        let mut solver = BranchAndBoundSolver::new();
        let mut estimator = LineRelaxationBound::new();
        let outcome =
            solver.solve_with_incumbent(&board, &mut estimator, NoOperationMonitor::new(), &shared);

        assert_eq!(outcome.best_score(), Some(8));
        assert_eq!(shared.best_score(), Some(8));
    }

    #[test]
    fn test_monitor_abort_without_solution_is_unknown() {
        let board = scenario_a();
        let mut solver = BranchAndBoundSolver::new();
        let mut estimator = LineRelaxationBound::new();
        let outcome = solver.solve(
            &board,
            &mut estimator,
            AbortAfter { remaining_steps: 0 },
        );

        assert_eq!(outcome.result(), &SolverResult::Unknown);
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::Aborted("step budget exhausted".into())
        );
        assert_eq!(solver.tracker.depth(), 0);
        assert_eq!(solver.stack.depth(), 0);
    }

    #[test]
    fn test_solution_limit_abort_keeps_best_placement_as_feasible() {
        let contributions =
            (0..6).flat_map(|row| (0..6).map(move |col| (c(row, col), (row * 6 + col) as W)));
        let board = WeightedBoard::from_contributions(6, 6, contributions).expect("valid board");
        let counter = AtomicU64::new(0);
        let mut limit = SolutionMonitor::with_limit(&counter, 1);
        let mut solver = BranchAndBoundSolver::new();
        let mut estimator = UncoveredSumBound::new();
        let outcome = solver.solve(&board, &mut estimator, WrapperMonitor::new(&mut limit));

        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::Aborted("global solution limit reached".into())
        );
        match outcome.result() {
            SolverResult::Feasible(p) => {
                assert_eq!(p.len(), 6);
                assert!(p.validate(&board).is_ok());
            }
            other => panic!("expected a feasible placement, got {}", other),
        }
    }

    #[test]
    fn test_end_state_clean_and_re_solve_is_idempotent() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut solver = BranchAndBoundSolver::preallocated(6, 6);
        let mut estimator = LineRelaxationBound::new();

        for _ in 0..10 {
            let size = rng.random_range(2..=6);
            let board = random_board(&mut rng, size, size.min(3));
            let first = solver.solve(&board, &mut estimator, NoOperationMonitor::new());
            assert_eq!(solver.tracker.depth(), 0);
            assert_eq!(solver.tracker.score(), 0);
            assert_eq!(solver.stack.depth(), 0);
            assert_eq!(solver.stack.num_entries(), 0);

            let second = solver.solve(&board, &mut estimator, NoOperationMonitor::new());
            assert_eq!(first.result(), second.result());
            assert_eq!(first.statistics().nodes_explored, second.statistics().nodes_explored);
        }
    }

    #[test]
    fn test_statistics_are_coherent() {
        let board = scenario_a();
        let outcome = solve_default(&board);
        let stats = outcome.statistics();

        assert!(stats.nodes_explored >= 3);
        assert_eq!(stats.max_depth, 2);
        assert!(stats.solutions_found >= 1);
        assert!(stats.root_upper_bound >= 8);
        assert!(stats.candidates_generated + 1 >= stats.nodes_explored);
        assert!(stats.steps > 0);
    }

    #[test]
    fn test_log_monitor_does_not_affect_results() {
        let board = scenario_a();
        let mut solver = BranchAndBoundSolver::new();
        let mut estimator = LineRelaxationBound::new();
        let outcome = solver.solve(
            &board,
            &mut estimator,
            LogTreeSearchMonitor::default(),
        );
        assert_eq!(outcome.best_score(), Some(8));
    }

    #[test]
    fn test_solves_with_small_weight_type() {
        let board = WeightedBoard::<u8>::from_contributions(
            4,
            2,
            [(c(0, 1), 200), (c(2, 0), 200), (c(3, 3), 1)],
        )
        .expect("valid board");
        let mut solver = BranchAndBoundSolver::new();
        let mut estimator = LineRelaxationBound::new();
        let outcome = solver.solve(&board, &mut estimator, NoOperationMonitor::new());
        // 200 + 200 saturates at u8::MAX.
        assert_eq!(outcome.best_score(), Some(u8::MAX));
    }
}
