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

//! # Placement Solver
//!
//! The entry point of the workspace: a configured `Solver` picks an engine,
//! a bound estimator and a monitor stack, runs the search and returns a
//! unified `SolverOutcome<T>`.
//!
//! ## Highlights
//!
//! - Strategies: depth-first branch-and-bound (`placer_bnb`) or best-first
//!   search (`placer_astar`), chosen by `SearchStrategy`.
//! - Parallel branch-and-bound:
//!   - The depth-0 candidates are handed out to scoped worker threads
//!     (`std::thread::scope`) through an atomic cursor.
//!   - Every worker owns its own `BranchAndBoundSolver` and solves each root
//!     below a one-cell fixed prefix against one `SharedIncumbent<T>`.
//!   - An aborting worker raises the shared stop signal so the others
//!     terminate through their `InterruptMonitor`.
//! - Monitors: every run is guarded by an interrupt flag, a global solution
//!   counter with an optional limit and an optional time limit.
//! - Outcome construction: Optimality > Infeasibility > Aborted.
//!
//! ## Usage
//!
//! ```rust
//! use placer_model::{board::WeightedBoard, coord::Coordinate};
//! use placer_solver::{solver::SolverBuilder, strategy::SearchStrategy};
//!
//! let board = WeightedBoard::<u32>::from_contributions(
//!     4,
//!     2,
//!     [
//!         (Coordinate::new(0, 0), 1),
//!         (Coordinate::new(1, 2), 3),
//!         (Coordinate::new(3, 3), 5),
//!     ],
//! )
//! .unwrap();
//!
//! let solver = SolverBuilder::new()
//!     .with_strategy(SearchStrategy::BranchAndBound)
//!     .with_threads(2)
//!     .build()
//!     .unwrap();
//!
//! let outcome = solver.solve(&board);
//! assert!(outcome.is_optimal());
//! assert_eq!(outcome.best_score(), Some(8));
//! ```

use crate::{
    error::SolverError,
    strategy::{BoundKind, SearchStrategy},
};
use placer_astar::astar::BestFirstSolver;
use placer_bnb::{
    bnb::BranchAndBoundSolver,
    monitor::{
        composite::CompositeTreeSearchMonitor, log::LogTreeSearchMonitor, wrapper::WrapperMonitor,
    },
};
use placer_model::{
    board::WeightedBoard, coord::Coordinate, num::SolverWeight, render::BoardSnapshot,
};
use placer_search::{
    eval::estimator::BoundEstimator,
    incumbent::SharedIncumbent,
    monitor::{
        composite::CompositeMonitor,
        interrupt::{INTERRUPT_REASON, InterruptMonitor},
        search_monitor::SearchMonitor,
        solution::SolutionMonitor,
        time_limit::{TIME_LIMIT_REASON, TimeLimitMonitor},
    },
    result::{SolverOutcome, TerminationReason},
    stats::SolverStatisticsBuilder,
};
use std::{
    sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    time::{Duration, Instant},
};

/// A configured solver. Build one with `SolverBuilder`.
///
/// `solve` takes `&self`, so a solver can be shared with another thread that
/// calls `interrupt` to stop a running search.
#[derive(Debug)]
pub struct Solver {
    strategy: SearchStrategy,
    bound_kind: BoundKind,
    threads: usize,
    time_limit: Option<Duration>,
    solution_limit: Option<u64>,
    log_progress: bool,
    /// Raised to stop every running engine (external interrupt or a worker abort).
    stop_signal: AtomicBool,
    global_solution_count: AtomicU64,
}

/// What a parallel worker did before it ran out of roots or was stopped.
#[derive(Debug, Default)]
struct WorkerReport {
    roots_completed: usize,
    nodes_explored: u64,
    max_memory_bytes: usize,
    abort_reason: Option<String>,
}

impl Solver {
    #[inline]
    pub fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    #[inline]
    pub fn bound_kind(&self) -> BoundKind {
        self.bound_kind
    }

    #[inline]
    pub fn threads(&self) -> usize {
        self.threads
    }

    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    #[inline]
    pub fn solution_limit(&self) -> Option<u64> {
        self.solution_limit
    }

    /// Asks a running `solve` to stop. It returns with the best placement
    /// found so far as `Feasible`, or `Unknown`.
    ///
    /// The request stays pending until a `solve` consumes it, so an interrupt
    /// issued just before `solve` starts aborts that run right away.
    #[inline]
    pub fn interrupt(&self) {
        self.stop_signal.store(true, Ordering::Relaxed);
    }

    /// Searches `board` for a maximum-weight placement.
    pub fn solve<T>(&self, board: &WeightedBoard<T>) -> SolverOutcome<T>
    where
        T: SolverWeight,
    {
        let start_time = Instant::now();

        // 1. Reset the counters; a pending interrupt is kept
        self.global_solution_count.store(0, Ordering::Relaxed);

        log::debug!(
            "solving a {}x{} board with {} placers: strategy {}, bound {}, {} thread(s)",
            board.size(),
            board.size(),
            board.num_placers(),
            self.strategy,
            self.bound_kind,
            self.threads
        );

        // 2. Dispatch to the engine
        let outcome = match self.strategy {
            SearchStrategy::BranchAndBound if self.threads > 1 && board.num_placers() > 0 => {
                self.solve_parallel(board, start_time)
            }
            SearchStrategy::BranchAndBound => self.solve_sequential(board, start_time),
            SearchStrategy::BestFirst => self.solve_best_first(board, start_time),
        };

        // 3. Consume the interrupt, whether external or raised by a worker
        self.stop_signal.store(false, Ordering::Relaxed);

        log::info!(
            "{} finished after {:.2?}: {} ({})",
            self.strategy,
            outcome.statistics.solve_duration,
            outcome.result,
            outcome.reason
        );
        outcome
    }

    /// Builds the engine-independent monitor stack of one run.
    fn build_monitor<'m, T>(&'m self, time_limit: Option<Duration>) -> CompositeMonitor<'m, T>
    where
        T: SolverWeight,
    {
        let mut monitor = CompositeMonitor::with_capacity(3);
        monitor.add_monitor(InterruptMonitor::new(&self.stop_signal));
        monitor.add_monitor(SolutionMonitor::new(
            &self.global_solution_count,
            self.solution_limit,
        ));
        if let Some(limit) = time_limit {
            monitor.add_monitor(TimeLimitMonitor::new(limit));
        }
        monitor
    }

    /// Adapts `inner` for the branch-and-bound engine, adding progress
    /// logging when enabled.
    fn tree_monitor<'m, T>(
        &self,
        inner: &'m mut dyn SearchMonitor<T>,
    ) -> CompositeTreeSearchMonitor<'m, T>
    where
        T: SolverWeight,
    {
        let mut monitor = CompositeTreeSearchMonitor::with_capacity(2);
        monitor.add_monitor(WrapperMonitor::new(inner));
        if self.log_progress {
            monitor.add_monitor(LogTreeSearchMonitor::default());
        }
        monitor
    }

    fn solve_sequential<T>(&self, board: &WeightedBoard<T>, start_time: Instant) -> SolverOutcome<T>
    where
        T: SolverWeight,
    {
        let mut solver = BranchAndBoundSolver::preallocated(board.size(), board.num_placers());
        let mut estimator = self.bound_kind.estimator::<T>(board.size());
        let mut monitor = self.build_monitor(self.time_limit);

        let outcome = solver.solve(board, &mut estimator, self.tree_monitor(&mut monitor));
        log::debug!("{}", outcome.statistics());

        let max_memory_bytes = solver.allocated_memory_bytes();
        let mut outcome: SolverOutcome<T> = outcome.into();
        outcome.statistics.max_memory_bytes = max_memory_bytes;
        outcome.statistics.solve_duration = start_time.elapsed();
        outcome
    }

    fn solve_best_first<T>(&self, board: &WeightedBoard<T>, start_time: Instant) -> SolverOutcome<T>
    where
        T: SolverWeight,
    {
        let mut solver = BestFirstSolver::new();
        let mut estimator = self.bound_kind.estimator::<T>(board.size());
        let mut monitor = self.build_monitor(self.time_limit);

        let outcome = solver.solve(board, &mut estimator, &mut monitor);
        if self.log_progress {
            log::info!("{}", outcome.statistics());
        } else {
            log::debug!("{}", outcome.statistics());
        }

        let mut outcome: SolverOutcome<T> = outcome.into();
        outcome.statistics.solve_duration = start_time.elapsed();
        outcome
    }

    fn solve_parallel<T>(&self, board: &WeightedBoard<T>, start_time: Instant) -> SolverOutcome<T>
    where
        T: SolverWeight,
    {
        let roots = root_candidates(board);
        let workers = self.threads.min(roots.len()).max(1);
        let incumbent = SharedIncumbent::new();
        let next_root = AtomicUsize::new(0);

        log::debug!(
            "splitting {} root candidates over {} worker(s)",
            roots.len(),
            workers
        );

        // Capture references for the workers
        let roots = roots.as_slice();
        let incumbent_ref = &incumbent;
        let next_root = &next_root;

        let reports = std::thread::scope(|scope| {
            let mut handles = Vec::with_capacity(workers);
            for _ in 0..workers {
                handles.push(scope.spawn(move || {
                    self.run_worker(board, roots, next_root, incumbent_ref, start_time)
                }));
            }

            handles
                .into_iter()
                .map(|handle| handle.join().expect("branch-and-bound worker thread panicked"))
                .collect::<Vec<_>>()
        });

        self.construct_outcome(&incumbent, &reports, roots.len(), start_time)
    }

    /// Solves roots taken from the shared cursor until none are left, the
    /// stop signal is raised or a run aborts.
    fn run_worker<T>(
        &self,
        board: &WeightedBoard<T>,
        roots: &[Coordinate],
        next_root: &AtomicUsize,
        incumbent: &SharedIncumbent<T>,
        start_time: Instant,
    ) -> WorkerReport
    where
        T: SolverWeight,
    {
        let mut solver = BranchAndBoundSolver::preallocated(board.size(), board.num_placers());
        let mut estimator = self.bound_kind.estimator::<T>(board.size());
        let mut report = WorkerReport::default();

        while !self.stop_signal.load(Ordering::Relaxed) {
            let root = match roots.get(next_root.fetch_add(1, Ordering::Relaxed)) {
                Some(&root) => root,
                None => break,
            };

            // Each run restarts its clock, so hand it what is left of the budget.
            let time_limit = self
                .time_limit
                .map(|limit| limit.saturating_sub(start_time.elapsed()));
            if time_limit.is_some_and(|left| left.is_zero()) {
                report.abort_reason = Some(TIME_LIMIT_REASON.to_string());
                self.stop_signal.store(true, Ordering::Relaxed);
                break;
            }

            let mut monitor = self.build_monitor(time_limit);
            let outcome = solver.solve_with_fixed_and_incumbent(
                board,
                &mut estimator,
                self.tree_monitor(&mut monitor),
                &[root],
                incumbent,
            );
            report.nodes_explored = report
                .nodes_explored
                .saturating_add(outcome.statistics().nodes_explored);

            if let TerminationReason::Aborted(msg) = outcome.termination_reason() {
                report.abort_reason = Some(msg.clone());
                self.stop_signal.store(true, Ordering::Relaxed);
                break;
            }
            report.roots_completed += 1;
        }

        report.max_memory_bytes = solver.allocated_memory_bytes();
        report
    }

    fn construct_outcome<T>(
        &self,
        incumbent: &SharedIncumbent<T>,
        reports: &[WorkerReport],
        num_roots: usize,
        start_time: Instant,
    ) -> SolverOutcome<T>
    where
        T: SolverWeight,
    {
        let stats = SolverStatisticsBuilder::new()
            .solutions_found(self.global_solution_count.load(Ordering::Relaxed))
            .nodes_explored(reports.iter().map(|r| r.nodes_explored).sum())
            .used_threads(reports.len())
            .max_memory_bytes(reports.iter().map(|r| r.max_memory_bytes).sum())
            .solve_duration(start_time.elapsed())
            .build();

        let exhausted = reports.iter().map(|r| r.roots_completed).sum::<usize>() == num_roots;

        // Hierarchy: Optimality > Infeasibility > Aborted
        match (incumbent.snapshot(), exhausted) {
            (Some(placement), true) => SolverOutcome::optimal(placement, stats),
            (None, true) => SolverOutcome::infeasible(stats),
            (Some(placement), false) => {
                SolverOutcome::feasible(placement, self.determine_abort_reason(reports), stats)
            }
            (None, false) => SolverOutcome::unknown(self.determine_abort_reason(reports), stats),
        }
    }

    fn determine_abort_reason(&self, reports: &[WorkerReport]) -> String {
        // 1. Explicit monitor trigger (time or solution limit)
        let explicit = reports
            .iter()
            .filter_map(|r| r.abort_reason.as_deref())
            .find(|msg| *msg != INTERRUPT_REASON);
        if let Some(msg) = explicit {
            return msg.to_string();
        }

        // 2. Stopped by the shared signal, possibly between two roots
        INTERRUPT_REASON.to_string()
    }
}

/// The depth-0 candidates: every cell of the rows a first placer may use.
fn root_candidates<T>(board: &WeightedBoard<T>) -> Vec<Coordinate>
where
    T: SolverWeight,
{
    let size = board.size();
    let last_row = size - board.num_placers();
    (0..=last_row)
        .flat_map(|row| (0..size).map(move |col| Coordinate::new(row, col)))
        .collect()
}

/// Builder for a `Solver`.
#[derive(Debug, Clone)]
pub struct SolverBuilder {
    strategy: SearchStrategy,
    bound_kind: BoundKind,
    threads: usize,
    time_limit: Option<Duration>,
    solution_limit: Option<u64>,
    log_progress: bool,
}

impl Default for SolverBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl SolverBuilder {
    /// Single threaded branch-and-bound with the line relaxation bound and
    /// no limits.
    #[inline]
    pub fn new() -> Self {
        Self {
            strategy: SearchStrategy::default(),
            bound_kind: BoundKind::default(),
            threads: 1,
            time_limit: None,
            solution_limit: None,
            log_progress: false,
        }
    }

    #[inline]
    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[inline]
    pub fn with_bound(mut self, bound_kind: BoundKind) -> Self {
        self.bound_kind = bound_kind;
        self
    }

    /// Sets the number of branch-and-bound workers. Best-first search always
    /// runs on the calling thread.
    #[inline]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    #[inline]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Stops the search once this many improving placements were found.
    #[inline]
    pub fn with_solution_limit(mut self, limit: u64) -> Self {
        self.solution_limit = Some(limit);
        self
    }

    /// Emits periodic progress lines through the `log` facade.
    #[inline]
    pub fn with_progress_logging(mut self, enabled: bool) -> Self {
        self.log_progress = enabled;
        self
    }

    /// # Errors
    ///
    /// Returns `SolverError::InvalidThreadCount` if zero threads were requested.
    pub fn build(self) -> Result<Solver, SolverError> {
        if self.threads == 0 {
            return Err(SolverError::InvalidThreadCount);
        }

        Ok(Solver {
            strategy: self.strategy,
            bound_kind: self.bound_kind,
            threads: self.threads,
            time_limit: self.time_limit,
            solution_limit: self.solution_limit,
            log_progress: self.log_progress,
            stop_signal: AtomicBool::new(false),
            global_solution_count: AtomicU64::new(0),
        })
    }
}

/// Solves `board` with the named strategy and returns the optimal score.
///
/// A board on which the placers do not fit scores zero.
///
/// # Errors
///
/// Returns `SolverError::UnsupportedStrategy` if `strategy` is not a known
/// strategy name.
pub fn solve<T>(board: &WeightedBoard<T>, strategy: &str) -> Result<T, SolverError>
where
    T: SolverWeight,
{
    let strategy: SearchStrategy = strategy.parse()?;
    let solver = SolverBuilder::new().with_strategy(strategy).build()?;
    let outcome = solver.solve(board);
    Ok(outcome.best_score().unwrap_or_else(T::zero))
}

/// Builds a board from `(coordinate, weight)` contributions and solves it.
///
/// # Errors
///
/// Returns `SolverError::Board` if the board is invalid and
/// `SolverError::UnsupportedStrategy` if `strategy` is unknown.
pub fn solve_contributions<T, I>(
    size: usize,
    num_placers: usize,
    contributions: I,
    strategy: &str,
) -> Result<T, SolverError>
where
    T: SolverWeight,
    I: IntoIterator<Item = (Coordinate, T)>,
{
    let board = WeightedBoard::from_contributions(size, num_placers, contributions)?;
    solve(&board, strategy)
}

/// Renders `cells` on `board` together with the estimate of the weight still
/// collectable under `bound_kind`.
///
/// # Errors
///
/// Returns `SolverError::Board` if a cell lies outside the board.
pub fn inspect<'a, T>(
    board: &'a WeightedBoard<T>,
    cells: &'a [Coordinate],
    bound_kind: BoundKind,
) -> Result<BoardSnapshot<'a, T>, SolverError>
where
    T: SolverWeight,
{
    let snapshot = BoardSnapshot::new(board, cells)?;
    let estimate = bound_kind
        .estimator::<T>(board.size())
        .estimate_remaining(board, snapshot.num_left(), snapshot.coverage());
    Ok(snapshot.with_estimate(estimate))
}
