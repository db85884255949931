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

//! Adapter for general search monitors
//!
//! `WrapperMonitor` lets a `placer_search` `SearchMonitor` drive the
//! branch-and-bound solver. Lifecycle events, steps, solutions and
//! `search_command` are forwarded; tree-specific callbacks are ignored.

use crate::{
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    stats::BnbSolverStatistics,
    tracker::CoverageTracker,
};
use placer_model::{
    board::WeightedBoard, coord::Coordinate, num::SolverWeight, placement::Placement,
};
use placer_search::monitor::search_monitor::{SearchCommand, SearchMonitor};

/// A tree search monitor that wraps a general search monitor.
pub struct WrapperMonitor<'a, T> {
    inner: &'a mut dyn SearchMonitor<T>,
    name: String,
}

impl<'a, T> WrapperMonitor<'a, T>
where
    T: SolverWeight,
{
    #[inline]
    pub fn new(inner: &'a mut dyn SearchMonitor<T>) -> Self {
        let name = format!("WrapperMonitor({})", inner.name());
        Self { inner, name }
    }
}

impl<'a, T> TreeSearchMonitor<T> for WrapperMonitor<'a, T>
where
    T: SolverWeight,
{
    #[inline(always)]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    fn on_enter_search(&mut self, board: &WeightedBoard<T>, _statistics: &BnbSolverStatistics<T>) {
        self.inner.on_enter_search(board);
    }

    #[inline(always)]
    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics<T>) {
        self.inner.on_exit_search();
    }

    #[inline(always)]
    fn search_command(
        &mut self,
        _tracker: &CoverageTracker<T>,
        _statistics: &BnbSolverStatistics<T>,
    ) -> SearchCommand {
        self.inner.search_command()
    }

    #[inline(always)]
    fn on_step(&mut self, _tracker: &CoverageTracker<T>, _statistics: &BnbSolverStatistics<T>) {
        self.inner.on_step();
    }

    #[inline(always)]
    fn on_upper_bound_computed(
        &mut self,
        _tracker: &CoverageTracker<T>,
        _upper_bound: T,
        _estimated_remaining: T,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }

    #[inline(always)]
    fn on_prune(
        &mut self,
        _tracker: &CoverageTracker<T>,
        _reason: PruneReason,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }

    #[inline(always)]
    fn on_candidates_enqueued(
        &mut self,
        _tracker: &CoverageTracker<T>,
        _count: usize,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }

    #[inline(always)]
    fn on_descend(
        &mut self,
        _tracker: &CoverageTracker<T>,
        _coord: Coordinate,
        _statistics: &BnbSolverStatistics<T>,
    ) {
    }

    #[inline(always)]
    fn on_backtrack(&mut self, _tracker: &CoverageTracker<T>, _statistics: &BnbSolverStatistics<T>) {
    }

    #[inline(always)]
    fn on_solution_found(&mut self, placement: &Placement<T>, _statistics: &BnbSolverStatistics<T>) {
        self.inner.on_solution_found(placement);
    }
}
