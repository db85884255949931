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

//! # Solution Count Monitor
//!
//! Counts improving placements in a shared `AtomicU64` and, if a limit is
//! configured, terminates the search once the shared count reaches it. Every
//! worker of a parallel solve holds its own monitor over the same counter, so
//! the limit applies to the whole solve.

use crate::monitor::search_monitor::{SearchCommand, SearchMonitor};
use placer_model::{board::WeightedBoard, num::SolverWeight, placement::Placement};
use std::sync::atomic::{AtomicU64, Ordering};

/// Termination reason reported once the shared count reaches the limit.
pub const SOLUTION_LIMIT_REASON: &str = "global solution limit reached";

#[derive(Debug)]
pub struct SolutionMonitor<'a, T> {
    solutions_found: &'a AtomicU64,
    solution_limit: Option<u64>,
    _phantom: std::marker::PhantomData<T>,
}

impl<'a, T> SolutionMonitor<'a, T>
where
    T: SolverWeight,
{
    #[inline]
    pub fn new(solutions_found: &'a AtomicU64, solution_limit: Option<u64>) -> Self {
        Self {
            solutions_found,
            solution_limit,
            _phantom: std::marker::PhantomData,
        }
    }

    #[inline]
    pub fn with_limit(solutions_found: &'a AtomicU64, limit: u64) -> Self {
        Self::new(solutions_found, Some(limit))
    }

    #[inline]
    pub fn without_limit(solutions_found: &'a AtomicU64) -> Self {
        Self::new(solutions_found, None)
    }

    #[inline]
    fn reached_limit(&self) -> bool {
        self.solution_limit
            .is_some_and(|limit| self.solutions_found.load(Ordering::Relaxed) >= limit)
    }
}

impl<'a, T> SearchMonitor<T> for SolutionMonitor<'a, T>
where
    T: SolverWeight,
{
    fn name(&self) -> &str {
        "SolutionMonitor"
    }

    fn on_enter_search(&mut self, _board: &WeightedBoard<T>) {}

    fn on_exit_search(&mut self) {}

    fn on_solution_found(&mut self, _placement: &Placement<T>) {
        self.solutions_found.fetch_add(1, Ordering::Relaxed);
    }

    fn on_step(&mut self) {}

    fn search_command(&self) -> SearchCommand {
        if self.reached_limit() {
            SearchCommand::Terminate(SOLUTION_LIMIT_REASON.to_string())
        } else {
            SearchCommand::Continue
        }
    }
}
