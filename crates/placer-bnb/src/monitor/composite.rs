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

//! Fan-out monitor for tree search
//!
//! `CompositeTreeSearchMonitor` forwards every event to its children in
//! insertion order. `search_command` short-circuits on the first
//! non-`Continue` response.

use crate::{
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    stats::BnbSolverStatistics,
    tracker::CoverageTracker,
};
use placer_model::{
    board::WeightedBoard, coord::Coordinate, num::SolverWeight, placement::Placement,
};
use placer_search::monitor::search_monitor::SearchCommand;

/// A tree search monitor that forwards events to all of its children.
pub struct CompositeTreeSearchMonitor<'a, T> {
    monitors: Vec<Box<dyn TreeSearchMonitor<T> + 'a>>,
}

impl<'a, T> Default for CompositeTreeSearchMonitor<'a, T>
where
    T: SolverWeight,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> CompositeTreeSearchMonitor<'a, T>
where
    T: SolverWeight,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    /// Adds a new monitor to the composite monitor.
    #[inline]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: TreeSearchMonitor<T> + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    /// Adds a boxed monitor to the composite monitor.
    #[inline]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn TreeSearchMonitor<T> + 'a>) {
        self.monitors.push(monitor);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a, T> FromIterator<Box<dyn TreeSearchMonitor<T> + 'a>> for CompositeTreeSearchMonitor<'a, T>
where
    T: SolverWeight,
{
    fn from_iter<I: IntoIterator<Item = Box<dyn TreeSearchMonitor<T> + 'a>>>(iter: I) -> Self {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> TreeSearchMonitor<T> for CompositeTreeSearchMonitor<'a, T>
where
    T: SolverWeight,
{
    fn name(&self) -> &str {
        "CompositeTreeSearchMonitor"
    }

    fn on_enter_search(&mut self, board: &WeightedBoard<T>, statistics: &BnbSolverStatistics<T>) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_enter_search(board, statistics);
        }
    }

    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics<T>) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_exit_search(statistics);
        }
    }

    fn search_command(
        &mut self,
        tracker: &CoverageTracker<T>,
        statistics: &BnbSolverStatistics<T>,
    ) -> SearchCommand {
        for monitor in self.monitors.iter_mut() {
            let command = monitor.search_command(tracker, statistics);
            if command.is_terminate() {
                return command;
            }
        }
        SearchCommand::Continue
    }

    fn on_step(&mut self, tracker: &CoverageTracker<T>, statistics: &BnbSolverStatistics<T>) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_step(tracker, statistics);
        }
    }

    fn on_upper_bound_computed(
        &mut self,
        tracker: &CoverageTracker<T>,
        upper_bound: T,
        estimated_remaining: T,
        statistics: &BnbSolverStatistics<T>,
    ) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_upper_bound_computed(tracker, upper_bound, estimated_remaining, statistics);
        }
    }

    fn on_prune(
        &mut self,
        tracker: &CoverageTracker<T>,
        reason: PruneReason,
        statistics: &BnbSolverStatistics<T>,
    ) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_prune(tracker, reason, statistics);
        }
    }

    fn on_candidates_enqueued(
        &mut self,
        tracker: &CoverageTracker<T>,
        count: usize,
        statistics: &BnbSolverStatistics<T>,
    ) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_candidates_enqueued(tracker, count, statistics);
        }
    }

    fn on_descend(
        &mut self,
        tracker: &CoverageTracker<T>,
        coord: Coordinate,
        statistics: &BnbSolverStatistics<T>,
    ) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_descend(tracker, coord, statistics);
        }
    }

    fn on_backtrack(&mut self, tracker: &CoverageTracker<T>, statistics: &BnbSolverStatistics<T>) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_backtrack(tracker, statistics);
        }
    }

    fn on_solution_found(&mut self, placement: &Placement<T>, statistics: &BnbSolverStatistics<T>) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_solution_found(placement, statistics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::no_op::NoOperationMonitor;
    use std::{cell::Cell, rc::Rc};

    struct Stopper {
        calls: Rc<Cell<usize>>,
        stop: bool,
    }

    impl TreeSearchMonitor<u32> for Stopper {
        fn name(&self) -> &str {
            "Stopper"
        }
        fn on_enter_search(&mut self, _: &WeightedBoard<u32>, _: &BnbSolverStatistics<u32>) {}
        fn on_exit_search(&mut self, _: &BnbSolverStatistics<u32>) {}
        fn search_command(
            &mut self,
            _: &CoverageTracker<u32>,
            _: &BnbSolverStatistics<u32>,
        ) -> SearchCommand {
            self.calls.set(self.calls.get() + 1);
            if self.stop {
                SearchCommand::Terminate("stopper".into())
            } else {
                SearchCommand::Continue
            }
        }
        fn on_step(&mut self, _: &CoverageTracker<u32>, _: &BnbSolverStatistics<u32>) {}
        fn on_upper_bound_computed(
            &mut self,
            _: &CoverageTracker<u32>,
            _: u32,
            _: u32,
            _: &BnbSolverStatistics<u32>,
        ) {
        }
        fn on_prune(&mut self, _: &CoverageTracker<u32>, _: PruneReason, _: &BnbSolverStatistics<u32>) {
        }
        fn on_candidates_enqueued(
            &mut self,
            _: &CoverageTracker<u32>,
            _: usize,
            _: &BnbSolverStatistics<u32>,
        ) {
        }
        fn on_descend(&mut self, _: &CoverageTracker<u32>, _: Coordinate, _: &BnbSolverStatistics<u32>) {
        }
        fn on_backtrack(&mut self, _: &CoverageTracker<u32>, _: &BnbSolverStatistics<u32>) {}
        fn on_solution_found(&mut self, _: &Placement<u32>, _: &BnbSolverStatistics<u32>) {}
    }

    #[test]
    fn test_search_command_short_circuits() {
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let mut composite = CompositeTreeSearchMonitor::<u32>::with_capacity(3);
        composite.add_monitor(NoOperationMonitor::new());
        composite.add_monitor(Stopper {
            calls: first.clone(),
            stop: true,
        });
        composite.add_monitor(Stopper {
            calls: second.clone(),
            stop: false,
        });
        assert_eq!(composite.len(), 3);

        let tracker = CoverageTracker::new();
        let stats = BnbSolverStatistics::default();
        assert_eq!(
            composite.search_command(&tracker, &stats),
            SearchCommand::Terminate("stopper".into())
        );
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 0);
    }

    #[test]
    fn test_collects_boxed_monitors() {
        let calls = Rc::new(Cell::new(0));
        let monitors: Vec<Box<dyn TreeSearchMonitor<u32>>> = vec![
            Box::new(NoOperationMonitor::<u32>::new()),
            Box::new(Stopper {
                calls: calls.clone(),
                stop: false,
            }),
        ];
        let mut composite: CompositeTreeSearchMonitor<'_, u32> = monitors.into_iter().collect();
        assert_eq!(composite.len(), 2);

        let tracker = CoverageTracker::new();
        let stats = BnbSolverStatistics::default();
        assert_eq!(
            composite.search_command(&tracker, &stats),
            SearchCommand::Continue
        );
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_default_composite_is_empty() {
        let composite = CompositeTreeSearchMonitor::<u32>::default();
        assert!(composite.is_empty());
        assert_eq!(composite.len(), 0);
    }

    #[test]
    fn test_empty_composite_continues() {
        let mut composite: CompositeTreeSearchMonitor<'_, u32> = Vec::new().into_iter().collect();
        assert!(composite.is_empty());
        let tracker = CoverageTracker::new();
        let stats = BnbSolverStatistics::default();
        assert_eq!(
            composite.search_command(&tracker, &stats),
            SearchCommand::Continue
        );
    }
}
