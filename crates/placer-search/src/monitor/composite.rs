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

use crate::monitor::search_monitor::{SearchCommand, SearchMonitor};
use placer_model::{board::WeightedBoard, num::SolverWeight, placement::Placement};

/// A composite monitor that forwards every event to all of its children.
/// The first child requesting termination wins.
pub struct CompositeMonitor<'a, T> {
    monitors: Vec<Box<dyn SearchMonitor<T> + 'a>>,
}

impl<'a, T> CompositeMonitor<'a, T> {
    fn names(&self) -> String
    where
        T: SolverWeight,
    {
        self.monitors
            .iter()
            .map(|m| m.name())
            .collect::<Vec<&str>>()
            .join(", ")
    }
}

impl<'a, T> std::fmt::Debug for CompositeMonitor<'a, T>
where
    T: SolverWeight,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeMonitor")
            .field("monitors", &self.names())
            .finish()
    }
}

impl<'a, T> std::fmt::Display for CompositeMonitor<'a, T>
where
    T: SolverWeight,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CompositeMonitor([{}])", self.names())
    }
}

impl<'a, T> Default for CompositeMonitor<'a, T>
where
    T: SolverWeight,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> CompositeMonitor<'a, T>
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

    #[inline]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: SearchMonitor<T> + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    #[inline]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn SearchMonitor<T> + 'a>) {
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

impl<'a, T> FromIterator<Box<dyn SearchMonitor<T> + 'a>> for CompositeMonitor<'a, T>
where
    T: SolverWeight,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn SearchMonitor<T> + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> SearchMonitor<T> for CompositeMonitor<'a, T>
where
    T: SolverWeight,
{
    fn name(&self) -> &str {
        "CompositeMonitor"
    }

    fn on_enter_search(&mut self, board: &WeightedBoard<T>) {
        for monitor in &mut self.monitors {
            monitor.on_enter_search(board);
        }
    }

    fn on_exit_search(&mut self) {
        for monitor in &mut self.monitors {
            monitor.on_exit_search();
        }
    }

    fn on_solution_found(&mut self, placement: &Placement<T>) {
        for monitor in &mut self.monitors {
            monitor.on_solution_found(placement);
        }
    }

    fn on_step(&mut self) {
        for monitor in &mut self.monitors {
            monitor.on_step();
        }
    }

    fn search_command(&self) -> SearchCommand {
        // Plain loop: this runs once per node.
        for monitor in &self.monitors {
            if let SearchCommand::Terminate(reason) = monitor.search_command() {
                return SearchCommand::Terminate(reason);
            }
        }
        SearchCommand::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{interrupt::InterruptMonitor, solution::SolutionMonitor};
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

    #[test]
    fn test_forwards_events_and_first_terminate_wins() {
        let stop = AtomicBool::new(false);
        let count = AtomicU64::new(0);

        let mut composite = CompositeMonitor::<u32>::with_capacity(2);
        assert!(composite.is_empty());
        composite.add_monitor(SolutionMonitor::with_limit(&count, 1));
        composite.add_monitor(InterruptMonitor::new(&stop));
        assert_eq!(composite.len(), 2);
        assert_eq!(
            composite.to_string(),
            "CompositeMonitor([SolutionMonitor, InterruptMonitor])"
        );

        assert_eq!(composite.search_command(), SearchCommand::Continue);

        stop.store(true, Ordering::Relaxed);
        assert_eq!(
            composite.search_command(),
            SearchCommand::Terminate("Interrupt signal received".to_string())
        );

        composite.on_solution_found(&Placement::empty());
        assert_eq!(count.load(Ordering::Relaxed), 1);
        assert_eq!(
            composite.search_command(),
            SearchCommand::Terminate("global solution limit reached".to_string())
        );
    }

    #[test]
    fn test_collects_from_iterator() {
        let stop = AtomicBool::new(false);
        let monitors: Vec<Box<dyn SearchMonitor<u32> + '_>> = vec![
            Box::new(InterruptMonitor::new(&stop)),
            Box::new(InterruptMonitor::new(&stop)),
        ];
        let composite: CompositeMonitor<'_, u32> = monitors.into_iter().collect();
        assert_eq!(composite.len(), 2);
    }
}
