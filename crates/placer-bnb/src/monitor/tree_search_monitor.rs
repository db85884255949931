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

//! Tree search monitoring interface
//!
//! Declares the `TreeSearchMonitor` trait and `PruneReason` for observing and
//! controlling branch-and-bound. A monitor sees
//! enter → step → {bound/prune | candidates/descend/backtrack} → solution → exit
//! and can stop the search through `search_command` (default: Continue).
//! `BnbSolverStatistics` is provided to every callback for telemetry.

use crate::{stats::BnbSolverStatistics, tracker::CoverageTracker};
use placer_model::{
    board::WeightedBoard, coord::Coordinate, num::SolverWeight, placement::Placement,
};
use placer_search::monitor::search_monitor::SearchCommand;

/// Reasons for pruning a search node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PruneReason {
    /// No complete placement extends the node.
    Infeasible,
    /// The node's upper bound does not exceed the incumbent.
    BoundDominated,
}

impl std::fmt::Display for PruneReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PruneReason::Infeasible => write!(f, "Infeasible"),
            PruneReason::BoundDominated => write!(f, "BoundDominated"),
        }
    }
}

/// Trait for monitoring and controlling the search process of the solver.
pub trait TreeSearchMonitor<T>
where
    T: SolverWeight,
{
    /// Returns the name of the monitor.
    fn name(&self) -> &str;
    /// Called when the search starts.
    fn on_enter_search(&mut self, board: &WeightedBoard<T>, statistics: &BnbSolverStatistics<T>);
    /// Called when the search ends.
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics<T>);
    /// Called to determine the next action of the search.
    fn search_command(
        &mut self,
        _tracker: &CoverageTracker<T>,
        _statistics: &BnbSolverStatistics<T>,
    ) -> SearchCommand {
        SearchCommand::Continue
    }
    /// Called at each step of the search.
    fn on_step(&mut self, tracker: &CoverageTracker<T>, statistics: &BnbSolverStatistics<T>);
    /// Called when the upper bound of a node is computed.
    /// `upper_bound` is `score + estimated_remaining`.
    fn on_upper_bound_computed(
        &mut self,
        tracker: &CoverageTracker<T>,
        upper_bound: T,
        estimated_remaining: T,
        statistics: &BnbSolverStatistics<T>,
    );
    /// Called when a node is pruned.
    fn on_prune(
        &mut self,
        tracker: &CoverageTracker<T>,
        reason: PruneReason,
        statistics: &BnbSolverStatistics<T>,
    );
    /// Called when candidates are enqueued for exploration.
    fn on_candidates_enqueued(
        &mut self,
        tracker: &CoverageTracker<T>,
        count: usize,
        statistics: &BnbSolverStatistics<T>,
    );
    /// Called after placing `coord` and descending into the child.
    fn on_descend(
        &mut self,
        tracker: &CoverageTracker<T>,
        coord: Coordinate,
        statistics: &BnbSolverStatistics<T>,
    );
    /// Called before backtracking to the parent.
    fn on_backtrack(&mut self, tracker: &CoverageTracker<T>, statistics: &BnbSolverStatistics<T>);
    /// Called when an improving placement is found.
    fn on_solution_found(&mut self, placement: &Placement<T>, statistics: &BnbSolverStatistics<T>);
}

impl<T> std::fmt::Debug for dyn TreeSearchMonitor<T>
where
    T: SolverWeight,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn TreeSearchMonitor<T>
where
    T: SolverWeight,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl<T, M> TreeSearchMonitor<T> for &mut M
where
    T: SolverWeight,
    M: TreeSearchMonitor<T> + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn on_enter_search(&mut self, board: &WeightedBoard<T>, statistics: &BnbSolverStatistics<T>) {
        (**self).on_enter_search(board, statistics)
    }

    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics<T>) {
        (**self).on_exit_search(statistics)
    }

    fn search_command(
        &mut self,
        tracker: &CoverageTracker<T>,
        statistics: &BnbSolverStatistics<T>,
    ) -> SearchCommand {
        (**self).search_command(tracker, statistics)
    }

    fn on_step(&mut self, tracker: &CoverageTracker<T>, statistics: &BnbSolverStatistics<T>) {
        (**self).on_step(tracker, statistics)
    }

    fn on_upper_bound_computed(
        &mut self,
        tracker: &CoverageTracker<T>,
        upper_bound: T,
        estimated_remaining: T,
        statistics: &BnbSolverStatistics<T>,
    ) {
        (**self).on_upper_bound_computed(tracker, upper_bound, estimated_remaining, statistics)
    }

    fn on_prune(
        &mut self,
        tracker: &CoverageTracker<T>,
        reason: PruneReason,
        statistics: &BnbSolverStatistics<T>,
    ) {
        (**self).on_prune(tracker, reason, statistics)
    }

    fn on_candidates_enqueued(
        &mut self,
        tracker: &CoverageTracker<T>,
        count: usize,
        statistics: &BnbSolverStatistics<T>,
    ) {
        (**self).on_candidates_enqueued(tracker, count, statistics)
    }

    fn on_descend(
        &mut self,
        tracker: &CoverageTracker<T>,
        coord: Coordinate,
        statistics: &BnbSolverStatistics<T>,
    ) {
        (**self).on_descend(tracker, coord, statistics)
    }

    fn on_backtrack(&mut self, tracker: &CoverageTracker<T>, statistics: &BnbSolverStatistics<T>) {
        (**self).on_backtrack(tracker, statistics)
    }

    fn on_solution_found(&mut self, placement: &Placement<T>, statistics: &BnbSolverStatistics<T>) {
        (**self).on_solution_found(placement, statistics)
    }
}
