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

//! # Time Limit Monitor
//!
//! Enforces a wall-clock budget on the search. The clock is only read when
//! the step counter has all bits of `clock_check_mask` cleared, which keeps
//! the per-step cost to a wrapping increment.
//!
//! ## Usage
//!
//! ```rust
//! use placer_search::monitor::time_limit::TimeLimitMonitor;
//! use placer_search::monitor::search_monitor::{SearchMonitor, SearchCommand};
//! use std::time::Duration;
//!
//! let mut mon = TimeLimitMonitor::<u32>::new(Duration::from_secs(5));
//! mon.on_step();
//! assert_eq!(mon.search_command(), SearchCommand::Continue);
//! ```

use crate::monitor::search_monitor::{SearchCommand, SearchMonitor};
use placer_model::{board::WeightedBoard, num::SolverWeight, placement::Placement};

/// Termination reason reported once the budget is spent.
pub const TIME_LIMIT_REASON: &str = "time limit reached";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLimitMonitor<T> {
    clock_check_mask: u64,
    steps: u64,
    time_limit: std::time::Duration,
    start_time: std::time::Instant,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> TimeLimitMonitor<T> {
    /// Check the clock every 16,384 steps.
    const DEFAULT_STEP_CLOCK_CHECK_MASK: u64 = 0x3FFF;

    #[inline]
    pub fn new(time_limit: std::time::Duration) -> Self {
        Self::with_clock_check_mask(time_limit, Self::DEFAULT_STEP_CLOCK_CHECK_MASK)
    }

    #[inline]
    pub fn with_clock_check_mask(time_limit: std::time::Duration, clock_check_mask: u64) -> Self {
        Self {
            clock_check_mask,
            steps: 0,
            time_limit,
            start_time: std::time::Instant::now(),
            _phantom: std::marker::PhantomData,
        }
    }

    /// Returns the configured time budget.
    #[inline]
    pub fn time_limit(&self) -> std::time::Duration {
        self.time_limit
    }
}

impl<T> SearchMonitor<T> for TimeLimitMonitor<T>
where
    T: SolverWeight,
{
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self, _board: &WeightedBoard<T>) {
        self.start_time = std::time::Instant::now();
        self.steps = 0;
    }

    fn on_exit_search(&mut self) {}

    fn on_solution_found(&mut self, _placement: &Placement<T>) {}

    #[inline(always)]
    fn on_step(&mut self) {
        self.steps = self.steps.wrapping_add(1);
    }

    #[inline(always)]
    fn search_command(&self) -> SearchCommand {
        if (self.steps & self.clock_check_mask) == 0 && self.start_time.elapsed() >= self.time_limit
        {
            return SearchCommand::Terminate(TIME_LIMIT_REASON.to_string());
        }
        SearchCommand::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn monitor_with_limit(ms: u64) -> TimeLimitMonitor<u32> {
        TimeLimitMonitor::<u32>::new(Duration::from_millis(ms))
    }

    #[test]
    fn test_default_mask() {
        assert_eq!(TimeLimitMonitor::<u32>::DEFAULT_STEP_CLOCK_CHECK_MASK, 0x3FFF);
        assert_eq!(monitor_with_limit(5).clock_check_mask, 0x3FFF);
    }

    #[test]
    fn test_terminates_after_limit_on_check_step() {
        let mut mon = monitor_with_limit(10);
        mon.start_time = Instant::now() - Duration::from_millis(50);
        mon.steps = 0;
        match mon.search_command() {
            SearchCommand::Terminate(msg) => assert_eq!(msg, "time limit reached"),
            other => panic!("expected Terminate, got {:?}", other),
        }
    }

    #[test]
    fn test_skips_clock_between_check_steps() {
        let mut mon = monitor_with_limit(1);
        mon.start_time = Instant::now() - Duration::from_millis(50);
        mon.steps = 1;
        assert_eq!(mon.search_command(), SearchCommand::Continue);
    }

    #[test]
    fn test_zero_mask_always_checks() {
        let mut mon = TimeLimitMonitor::<u32>::with_clock_check_mask(Duration::from_millis(1), 0);
        mon.start_time = Instant::now() - Duration::from_millis(50);
        mon.steps = 12345;
        assert!(mon.search_command().is_terminate());
    }

    #[test]
    fn test_continues_before_limit() {
        let mut mon = monitor_with_limit(60_000);
        mon.steps = 0;
        assert_eq!(mon.search_command(), SearchCommand::Continue);
    }

    #[test]
    fn test_on_enter_search_restarts_clock() {
        let mut mon = monitor_with_limit(10);
        mon.start_time = Instant::now() - Duration::from_millis(50);
        mon.steps = 7;
        let board = WeightedBoard::<u32>::from_contributions(2, 1, std::iter::empty()).unwrap();
        mon.on_enter_search(&board);
        assert_eq!(mon.steps, 0);
        assert_eq!(mon.search_command(), SearchCommand::Continue);
    }

    #[test]
    fn test_on_step_wraps() {
        let mut mon = monitor_with_limit(1000);
        mon.steps = u64::MAX;
        mon.on_step();
        assert_eq!(mon.steps, 0);
    }
}
