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

use crate::{
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    stats::BnbSolverStatistics,
    tracker::CoverageTracker,
};
use placer_model::{
    board::WeightedBoard, coord::Coordinate, num::SolverWeight, placement::Placement,
};
use std::time::{Duration, Instant};

/// Periodically reports search progress through the `log` facade.
///
/// The clock is only consulted when `nodes_explored & clock_check_mask == 0`.
#[derive(Debug, Clone)]
pub struct LogTreeSearchMonitor<T> {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    best_score: Option<T>,
}

impl<T> LogTreeSearchMonitor<T>
where
    T: SolverWeight,
{
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            last_log_time: Instant::now(),
            log_interval,
            clock_check_mask,
            best_score: None,
        }
    }

    #[inline]
    pub fn log_interval(&self) -> Duration {
        self.log_interval
    }

    #[inline]
    pub fn best_score(&self) -> Option<T> {
        self.best_score
    }

    fn log_header(&self) {
        log::info!(
            "{:<9} | {:<14} | {:<7} | {:<10} | {:<13} | {:<10} | {:<13}",
            "Elapsed",
            "Nodes",
            "Depth",
            "Best",
            "Current Score",
            "Backtracks",
            "Pruned (Bound)"
        );
    }

    fn log_line(&mut self, tracker: &CoverageTracker<T>, stats: &BnbSolverStatistics<T>) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.start_time).as_secs_f32();

        let best = match self.best_score {
            Some(score) => score.to_string(),
            None => "-".to_string(),
        };

        log::info!(
            "{:<9} | {:<14} | {:<7} | {:<10} | {:<13} | {:<10} | {:<13}",
            format!("{:.1}s", elapsed),
            stats.nodes_explored,
            tracker.depth(),
            best,
            tracker.score(),
            stats.backtracks,
            stats.prunings_bound
        );

        self.last_log_time = now;
    }
}

impl<T> Default for LogTreeSearchMonitor<T>
where
    T: SolverWeight,
{
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 4095)
    }
}

impl<T> std::fmt::Display for LogTreeSearchMonitor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogTreeSearchMonitor(log_interval: {}s, clock_check_mask: {})",
            self.log_interval.as_secs(),
            self.clock_check_mask
        )
    }
}

impl<T> TreeSearchMonitor<T> for LogTreeSearchMonitor<T>
where
    T: SolverWeight,
{
    fn name(&self) -> &str {
        "LogTreeSearchMonitor"
    }

    fn on_enter_search(&mut self, board: &WeightedBoard<T>, _statistics: &BnbSolverStatistics<T>) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.best_score = None;
        log::info!(
            "placing {} placers on a {}x{} board",
            board.num_placers(),
            board.size(),
            board.size()
        );
        self.log_header();
    }

    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics<T>) {
        log::info!(
            "search finished after {} nodes in {:.2?}",
            statistics.nodes_explored,
            self.start_time.elapsed()
        );
    }

    fn on_step(&mut self, _tracker: &CoverageTracker<T>, _statistics: &BnbSolverStatistics<T>) {}

    fn on_upper_bound_computed(
        &mut self,
        _tracker: &CoverageTracker<T>,
        _upper_bound: T,
        _estimated_remaining: T,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }

    fn on_prune(
        &mut self,
        _tracker: &CoverageTracker<T>,
        _reason: PruneReason,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }

    fn on_candidates_enqueued(
        &mut self,
        _tracker: &CoverageTracker<T>,
        _count: usize,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }

    fn on_descend(
        &mut self,
        tracker: &CoverageTracker<T>,
        _coord: Coordinate,
        statistics: &BnbSolverStatistics<T>,
    ) {
        if (statistics.nodes_explored & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(tracker, statistics);
        }
    }

    fn on_backtrack(&mut self, _tracker: &CoverageTracker<T>, _statistics: &BnbSolverStatistics<T>) {
    }

    fn on_solution_found(&mut self, placement: &Placement<T>, statistics: &BnbSolverStatistics<T>) {
        self.best_score = Some(placement.score());
        log::debug!(
            "improving placement with score {} after {} nodes",
            placement.score(),
            statistics.nodes_explored
        );
    }
}
