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

use crate::stats::AstarSolverStatistics;
use placer_model::{num::SolverWeight, placement::Placement};
use placer_search::{
    result::{SolverOutcome, SolverResult, TerminationReason},
    stats::SolverStatisticsBuilder,
};

/// Result of a best-first run after termination.
#[derive(Debug, Clone)]
pub struct AstarSolverOutcome<T> {
    result: SolverResult<T>,
    termination_reason: TerminationReason,
    statistics: AstarSolverStatistics,
}

impl<T> AstarSolverOutcome<T>
where
    T: SolverWeight,
{
    #[inline]
    pub fn optimal(placement: Placement<T>, statistics: AstarSolverStatistics) -> Self {
        Self {
            result: SolverResult::Optimal(placement),
            termination_reason: TerminationReason::OptimalityProven,
            statistics,
        }
    }

    #[inline]
    pub fn infeasible(statistics: AstarSolverStatistics) -> Self {
        Self {
            result: SolverResult::Infeasible,
            termination_reason: TerminationReason::InfeasibilityProven,
            statistics,
        }
    }

    /// Best-first search only knows a placement once it is proven optimal,
    /// so an aborted run carries none.
    #[inline]
    pub fn aborted<R>(reason: R, statistics: AstarSolverStatistics) -> Self
    where
        R: Into<String>,
    {
        Self {
            result: SolverResult::Unknown,
            termination_reason: TerminationReason::Aborted(reason.into()),
            statistics,
        }
    }

    #[inline]
    pub fn result(&self) -> &SolverResult<T> {
        &self.result
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    #[inline]
    pub fn statistics(&self) -> &AstarSolverStatistics {
        &self.statistics
    }

    #[inline]
    pub fn placement(&self) -> Option<&Placement<T>> {
        self.result.placement()
    }

    /// Returns the best score. Proven infeasibility reports zero.
    #[inline]
    pub fn best_score(&self) -> Option<T> {
        match self.result {
            SolverResult::Infeasible => Some(T::zero()),
            ref other => other.score(),
        }
    }
}

impl<T> From<AstarSolverOutcome<T>> for SolverOutcome<T>
where
    T: SolverWeight,
{
    fn from(val: AstarSolverOutcome<T>) -> Self {
        let stats = &val.statistics;
        let statistics = SolverStatisticsBuilder::new()
            .solutions_found(stats.solutions_found)
            .nodes_explored(stats.expansions)
            .used_threads(1)
            .solve_duration(stats.time_total)
            .build();
        SolverOutcome::new(val.result, val.termination_reason, statistics)
    }
}

impl<T> std::fmt::Display for AstarSolverOutcome<T>
where
    T: SolverWeight,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Result: {}", self.result)?;
        writeln!(f, "Termination: {}", self.termination_reason)?;
        write!(f, "{}", self.statistics)
    }
}
