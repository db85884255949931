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

use std::time::Duration;

/// Statistics collected during a best-first run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AstarSolverStatistics {
    /// States popped from the frontier and expanded.
    pub expansions: u64,
    /// Successors pushed onto the frontier, including the root.
    pub generated: u64,
    /// Successors skipped because they were explored or already queued.
    pub duplicates_skipped: u64,
    /// The largest frontier size observed.
    pub peak_frontier: usize,
    /// Size of the explored set when the search ended.
    pub explored: usize,
    /// Terminal states reached (at most one).
    pub solutions_found: u64,
    /// Total time spent in the solver.
    pub time_total: Duration,
}

impl AstarSolverStatistics {
    #[inline]
    pub fn on_expansion(&mut self) {
        self.expansions = self.expansions.saturating_add(1);
    }

    #[inline]
    pub fn on_generated(&mut self) {
        self.generated = self.generated.saturating_add(1);
    }

    #[inline]
    pub fn on_duplicate(&mut self) {
        self.duplicates_skipped = self.duplicates_skipped.saturating_add(1);
    }

    #[inline]
    pub fn on_frontier_size(&mut self, size: usize) {
        self.peak_frontier = self.peak_frontier.max(size);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }

    #[inline]
    pub fn set_explored(&mut self, explored: usize) {
        self.explored = explored;
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }
}

impl std::fmt::Display for AstarSolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Placer-A* Solver Statistics:")?;
        writeln!(f, "  Expansions:           {}", self.expansions)?;
        writeln!(f, "  Generated:            {}", self.generated)?;
        writeln!(f, "  Duplicates skipped:   {}", self.duplicates_skipped)?;
        writeln!(f, "  Peak frontier:        {}", self.peak_frontier)?;
        writeln!(f, "  Explored states:      {}", self.explored)?;
        writeln!(f, "  Solutions found:      {}", self.solutions_found)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut s = AstarSolverStatistics::default();
        s.on_expansion();
        s.on_generated();
        s.on_generated();
        s.on_duplicate();
        s.on_frontier_size(4);
        s.on_frontier_size(2);
        s.set_explored(3);

        assert_eq!(s.expansions, 1);
        assert_eq!(s.generated, 2);
        assert_eq!(s.duplicates_skipped, 1);
        assert_eq!(s.peak_frontier, 4);
        assert_eq!(s.explored, 3);
        assert!(s.to_string().contains("Peak frontier:        4"));
    }
}
