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

/// Engine-independent statistics of one `solve` call.
///
/// Parallel runs report the sums over their workers, except for the thread
/// count and the duration, which is wall-clock time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverStatistics {
    /// Improving placements, counted across all workers.
    pub solutions_found: u64,
    pub nodes_explored: u64,
    pub used_threads: usize,
    /// Memory held by the engines' reusable buffers at the end of the run.
    pub max_memory_bytes: usize,
    pub solve_duration: Duration,
}

impl Default for SolverStatistics {
    fn default() -> Self {
        SolverStatisticsBuilder::new().build()
    }
}

impl SolverStatistics {
    /// Explored nodes per second of wall-clock time, or zero for a run too
    /// short to measure.
    pub fn nodes_per_second(&self) -> f64 {
        let secs = self.solve_duration.as_secs_f64();
        if secs > 0.0 {
            self.nodes_explored as f64 / secs
        } else {
            0.0
        }
    }
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Placer Solver Statistics:")?;
        writeln!(f, "  Solutions found:  {}", self.solutions_found)?;
        writeln!(f, "  Nodes explored:   {}", self.nodes_explored)?;
        writeln!(f, "  Nodes per second: {:.0}", self.nodes_per_second())?;
        writeln!(f, "  Threads:          {}", self.used_threads)?;
        writeln!(f, "  Memory (bytes):   {}", self.max_memory_bytes)?;
        write!(f, "  Duration:         {:.2?}", self.solve_duration)
    }
}

/// Builder for `SolverStatistics`. Unset fields are zero, except for the
/// thread count, which defaults to one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverStatisticsBuilder {
    stats: SolverStatistics,
}

impl Default for SolverStatisticsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverStatisticsBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            stats: SolverStatistics {
                solutions_found: 0,
                nodes_explored: 0,
                used_threads: 1,
                max_memory_bytes: 0,
                solve_duration: Duration::ZERO,
            },
        }
    }

    #[inline]
    pub fn solutions_found(mut self, solutions_found: u64) -> Self {
        self.stats.solutions_found = solutions_found;
        self
    }

    #[inline]
    pub fn nodes_explored(mut self, nodes_explored: u64) -> Self {
        self.stats.nodes_explored = nodes_explored;
        self
    }

    #[inline]
    pub fn used_threads(mut self, used_threads: usize) -> Self {
        self.stats.used_threads = used_threads;
        self
    }

    #[inline]
    pub fn max_memory_bytes(mut self, max_memory_bytes: usize) -> Self {
        self.stats.max_memory_bytes = max_memory_bytes;
        self
    }

    #[inline]
    pub fn solve_duration(mut self, solve_duration: Duration) -> Self {
        self.stats.solve_duration = solve_duration;
        self
    }

    #[inline]
    pub fn build(self) -> SolverStatistics {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_every_field() {
        let stats = SolverStatisticsBuilder::new()
            .solutions_found(3)
            .nodes_explored(42)
            .used_threads(8)
            .max_memory_bytes(4096)
            .solve_duration(Duration::from_millis(250))
            .build();

        assert_eq!(
            stats,
            SolverStatistics {
                solutions_found: 3,
                nodes_explored: 42,
                used_threads: 8,
                max_memory_bytes: 4096,
                solve_duration: Duration::from_millis(250),
            }
        );
    }

    #[test]
    fn test_default_is_single_threaded_and_empty() {
        let stats = SolverStatistics::default();
        assert_eq!(stats.used_threads, 1);
        assert_eq!(stats.nodes_explored, 0);
        assert_eq!(stats.solve_duration, Duration::ZERO);
        assert_eq!(stats.nodes_per_second(), 0.0);
    }

    #[test]
    fn test_nodes_per_second() {
        let stats = SolverStatisticsBuilder::new()
            .nodes_explored(500)
            .solve_duration(Duration::from_millis(250))
            .build();
        assert_eq!(stats.nodes_per_second(), 2000.0);
    }

    #[test]
    fn test_display() {
        let stats = SolverStatisticsBuilder::new()
            .solutions_found(2)
            .nodes_explored(17)
            .used_threads(4)
            .build();

        let rendered = stats.to_string();
        assert!(rendered.starts_with("Placer Solver Statistics:"));
        assert!(rendered.contains("Solutions found:  2"));
        assert!(rendered.contains("Nodes explored:   17"));
        assert!(rendered.contains("Threads:          4"));
        assert!(rendered.contains("Nodes per second: 0"));
    }
}
