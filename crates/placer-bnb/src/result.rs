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

use crate::stats::BnbSolverStatistics;
use placer_model::{num::SolverWeight, placement::Placement};
use placer_search::{
    result::{SolverOutcome, SolverResult, TerminationReason},
    stats::SolverStatisticsBuilder,
};

/// Result of a branch-and-bound run after termination.
#[derive(Debug, Clone)]
pub struct BnbSolverOutcome<T> {
    result: SolverResult<T>,
    termination_reason: TerminationReason,
    statistics: BnbSolverStatistics<T>,
}

impl<T> BnbSolverOutcome<T>
where
    T: SolverWeight,
{
    #[inline]
    pub fn optimal(placement: Placement<T>, statistics: BnbSolverStatistics<T>) -> Self {
        Self {
            result: SolverResult::Optimal(placement),
            termination_reason: TerminationReason::OptimalityProven,
            statistics,
        }
    }

    #[inline]
    pub fn infeasible(statistics: BnbSolverStatistics<T>) -> Self {
        Self {
            result: SolverResult::Infeasible,
            termination_reason: TerminationReason::InfeasibilityProven,
            statistics,
        }
    }

    /// An aborted run keeps its best placement as `Feasible`; without one
    /// nothing is known.
    #[inline]
    pub fn aborted<R>(
        placement: Option<Placement<T>>,
        reason: R,
        statistics: BnbSolverStatistics<T>,
    ) -> Self
    where
        R: Into<String>,
    {
        let result = match placement {
            Some(p) => SolverResult::Feasible(p),
            None => SolverResult::Unknown,
        };

        Self {
            result,
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
    pub fn statistics(&self) -> &BnbSolverStatistics<T> {
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

impl<T> From<BnbSolverOutcome<T>> for SolverOutcome<T>
where
    T: SolverWeight,
{
    fn from(val: BnbSolverOutcome<T>) -> Self {
        let stats = &val.statistics;
        let statistics = SolverStatisticsBuilder::new()
            .solutions_found(stats.solutions_found)
            .nodes_explored(stats.nodes_explored)
            .used_threads(1)
            .solve_duration(stats.time_total)
            .build();
        SolverOutcome::new(val.result, val.termination_reason, statistics)
    }
}

impl<T> std::fmt::Display for BnbSolverOutcome<T>
where
    T: SolverWeight,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Result: {}", self.result)?;
        writeln!(f, "Termination: {}", self.termination_reason)?;
        write!(f, "{}", self.statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use placer_model::coord::Coordinate;
    use std::time::Duration;

    fn stats() -> BnbSolverStatistics<u32> {
        BnbSolverStatistics::default()
    }

    #[test]
    fn test_aborted_without_placement_is_unknown() {
        let outcome = BnbSolverOutcome::<u32>::aborted(None, "time limit reached", stats());
        assert_eq!(outcome.result(), &SolverResult::Unknown);
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::Aborted("time limit reached".into())
        );
        assert_eq!(outcome.best_score(), None);
    }

    #[test]
    fn test_aborted_with_placement_is_feasible() {
        let p = Placement::new(3u32, vec![Coordinate::new(0, 0)]);
        let outcome = BnbSolverOutcome::aborted(Some(p.clone()), "stop", stats());
        assert_eq!(outcome.result(), &SolverResult::Feasible(p));
        assert_eq!(outcome.best_score(), Some(3));
    }

    #[test]
    fn test_infeasible_reports_zero() {
        let outcome = BnbSolverOutcome::<u32>::infeasible(stats());
        assert_eq!(outcome.best_score(), Some(0));
        assert!(outcome.placement().is_none());
    }

    #[test]
    fn test_into_solver_outcome_carries_statistics() {
        let mut s = stats();
        s.solutions_found = 2;
        s.nodes_explored = 11;
        s.set_total_time(Duration::from_millis(5));
        let p = Placement::new(8u32, vec![Coordinate::new(1, 2), Coordinate::new(3, 3)]);
        let outcome: SolverOutcome<u32> = BnbSolverOutcome::optimal(p, s).into();

        assert!(outcome.is_optimal());
        assert_eq!(outcome.reason, TerminationReason::OptimalityProven);
        assert_eq!(outcome.statistics.solutions_found, 2);
        assert_eq!(outcome.statistics.nodes_explored, 11);
        assert_eq!(outcome.statistics.used_threads, 1);
        assert_eq!(outcome.statistics.solve_duration, Duration::from_millis(5));
    }
}
