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

//! Cooperative cancellation through a shared flag.
//!
//! Any thread holding the flag can stop every search that watches it. The
//! parallel solver points all workers at one flag and raises it when a
//! single worker aborts.

use crate::monitor::search_monitor::{SearchCommand, SearchMonitor};
use placer_model::{board::WeightedBoard, num::SolverWeight, placement::Placement};
use std::sync::atomic::{AtomicBool, Ordering};

/// Termination reason reported once the flag is raised.
pub const INTERRUPT_REASON: &str = "Interrupt signal received";

#[derive(Debug, Clone)]
pub struct InterruptMonitor<'a, T> {
    stop_flag: &'a AtomicBool,
    _phantom: std::marker::PhantomData<T>,
}

impl<'a, T> InterruptMonitor<'a, T> {
    #[inline(always)]
    pub fn new(stop_flag: &'a AtomicBool) -> Self {
        Self {
            stop_flag,
            _phantom: std::marker::PhantomData,
        }
    }

    #[inline(always)]
    pub fn is_raised(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }
}

impl<'a, T> SearchMonitor<T> for InterruptMonitor<'a, T>
where
    T: SolverWeight,
{
    fn name(&self) -> &str {
        "InterruptMonitor"
    }

    fn on_enter_search(&mut self, _board: &WeightedBoard<T>) {}
    fn on_exit_search(&mut self) {}
    fn on_solution_found(&mut self, _placement: &Placement<T>) {}
    fn on_step(&mut self) {}

    fn search_command(&self) -> SearchCommand {
        match self.is_raised() {
            true => SearchCommand::Terminate(INTERRUPT_REASON.to_string()),
            false => SearchCommand::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;

    #[test]
    fn test_follows_flag() {
        let flag = AtomicBool::new(false);
        let monitor = InterruptMonitor::<u32>::new(&flag);
        assert!(!monitor.is_raised());
        assert_eq!(monitor.search_command(), SearchCommand::Continue);

        flag.store(true, Ordering::Relaxed);
        assert!(monitor.is_raised());
        assert_eq!(
            monitor.search_command(),
            SearchCommand::Terminate(INTERRUPT_REASON.to_string())
        );

        flag.store(false, Ordering::Relaxed);
        assert_eq!(monitor.search_command(), SearchCommand::Continue);
    }

    #[test]
    fn test_one_flag_stops_every_watcher() {
        let flag = AtomicBool::new(false);
        let monitors: Vec<_> = (0..4).map(|_| InterruptMonitor::<u8>::new(&flag)).collect();
        flag.store(true, Ordering::Relaxed);
        assert!(monitors.iter().all(|m| m.search_command().is_terminate()));
    }
}
