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

use placer_model::num::SolverWeight;
use std::time::Duration;

/// Statistics collected during a branch-and-bound run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BnbSolverStatistics<T> {
    /// Iterations of the main search loop.
    pub steps: u64,
    /// Total nodes visited, including the root.
    pub nodes_explored: u64,
    /// Number of times a decision level was closed.
    pub backtracks: u64,
    /// Candidates taken off the stack and placed.
    pub candidates_generated: u64,
    /// The deepest level reached in the tree.
    pub max_depth: u64,
    /// Non-terminal nodes whose row window had no uncovered cell.
    pub prunings_infeasible: u64,
    /// Nodes whose upper bound did not exceed the incumbent, and complete
    /// placements that did not improve on it.
    pub prunings_bound: u64,
    /// Decision levels abandoned because the incumbent reached the level's
    /// upper bound.
    pub early_exits: u64,
    /// Improving placements found during the search.
    pub solutions_found: u64,
    /// Total time spent in the solver.
    pub time_total: Duration,
    /// The upper bound at the root node.
    pub root_upper_bound: T,
}

impl<T> Default for BnbSolverStatistics<T>
where
    T: SolverWeight,
{
    fn default() -> Self {
        Self {
            steps: 0,
            nodes_explored: 0,
            backtracks: 0,
            candidates_generated: 0,
            max_depth: 0,
            prunings_infeasible: 0,
            prunings_bound: 0,
            early_exits: 0,
            solutions_found: 0,
            time_total: Duration::ZERO,
            root_upper_bound: T::zero(),
        }
    }
}

impl<T> BnbSolverStatistics<T> {
    #[inline]
    pub fn on_step(&mut self) {
        self.steps = self.steps.saturating_add(1);
    }

    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
    }

    #[inline]
    pub fn on_backtrack(&mut self) {
        self.backtracks = self.backtracks.saturating_add(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_candidate_generated(&mut self) {
        self.candidates_generated = self.candidates_generated.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_infeasible(&mut self) {
        self.prunings_infeasible = self.prunings_infeasible.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    #[inline]
    pub fn on_early_exit(&mut self) {
        self.early_exits = self.early_exits.saturating_add(1);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    #[inline]
    pub fn set_root_upper_bound(&mut self, bound: T) {
        self.root_upper_bound = bound;
    }
}

impl<T> std::fmt::Display for BnbSolverStatistics<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Placer-BnB Solver Statistics:")?;
        writeln!(f, "  Steps:                {}", self.steps)?;
        writeln!(f, "  Nodes explored:       {}", self.nodes_explored)?;
        writeln!(f, "  Backtracks:           {}", self.backtracks)?;
        writeln!(f, "  Max depth reached:    {}", self.max_depth)?;
        writeln!(f, "  Candidates generated: {}", self.candidates_generated)?;
        writeln!(f, "  Prunings (infeasible):{}", self.prunings_infeasible)?;
        writeln!(f, "  Prunings (bound):     {}", self.prunings_bound)?;
        writeln!(f, "  Early exits:          {}", self.early_exits)?;
        writeln!(f, "  Solutions found:      {}", self.solutions_found)?;
        writeln!(f, "  Root upper bound:     {}", self.root_upper_bound)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_and_depth() {
        let mut s = BnbSolverStatistics::<u32>::default();
        s.on_step();
        s.on_node_explored();
        s.on_node_explored();
        s.on_backtrack();
        s.on_candidate_generated();
        s.on_pruning_bound();
        s.on_pruning_infeasible();
        s.on_early_exit();
        s.on_solution_found();
        s.on_depth_update(3);
        s.on_depth_update(2);
        s.set_root_upper_bound(8);

        assert_eq!(s.steps, 1);
        assert_eq!(s.nodes_explored, 2);
        assert_eq!(s.backtracks, 1);
        assert_eq!(s.candidates_generated, 1);
        assert_eq!(s.prunings_bound, 1);
        assert_eq!(s.prunings_infeasible, 1);
        assert_eq!(s.early_exits, 1);
        assert_eq!(s.solutions_found, 1);
        assert_eq!(s.max_depth, 3);
        assert_eq!(s.root_upper_bound, 8);
    }

    #[test]
    fn test_display_lists_fields() {
        let mut s = BnbSolverStatistics::<u32>::default();
        s.set_root_upper_bound(42);
        let rendered = s.to_string();
        assert!(rendered.starts_with("Placer-BnB Solver Statistics:"));
        assert!(rendered.contains("Root upper bound:     42"));
        assert!(rendered.contains("Early exits:          0"));
    }
}
