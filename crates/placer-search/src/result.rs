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

use crate::stats::SolverStatistics;
use placer_model::{num::SolverWeight, placement::Placement};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverResult<T> {
    /// We have proven that no complete placement exists.
    Infeasible,
    /// We have found a placement and proven its optimality.
    Optimal(Placement<T>),
    /// We have found a placement, but not proven its optimality.
    Feasible(Placement<T>),
    /// The solver terminated without finding a placement and
    /// without proving infeasibility.
    Unknown,
}

impl<T> SolverResult<T>
where
    T: SolverWeight,
{
    /// Returns the placement carried by this result, if any.
    #[inline]
    pub fn placement(&self) -> Option<&Placement<T>> {
        match self {
            SolverResult::Optimal(p) | SolverResult::Feasible(p) => Some(p),
            SolverResult::Infeasible | SolverResult::Unknown => None,
        }
    }

    /// Returns the score of the carried placement, if any.
    #[inline]
    pub fn score(&self) -> Option<T> {
        self.placement().map(Placement::score)
    }
}

impl<T> std::fmt::Display for SolverResult<T>
where
    T: SolverWeight,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Infeasible => write!(f, "Infeasible"),
            SolverResult::Optimal(placement) => {
                write!(f, "Optimal(score={})", placement.score())
            }
            SolverResult::Feasible(placement) => {
                write!(f, "Feasible(score={})", placement.score())
            }
            SolverResult::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The solver found and proved optimality of a placement.
    OptimalityProven,
    /// The solver proved that no complete placement exists.
    InfeasibilityProven,
    /// The solver aborted due to a search limit (time, interrupt, etc.).
    /// The string describes the reason for the abort.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::OptimalityProven => write!(f, "Optimality Proven"),
            TerminationReason::InfeasibilityProven => write!(f, "Infeasibility Proven"),
            TerminationReason::Aborted(msg) => write!(f, "Aborted: {}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverOutcome<T>
where
    T: SolverWeight,
{
    pub result: SolverResult<T>,
    pub reason: TerminationReason,
    pub statistics: SolverStatistics,
}

impl<T> SolverOutcome<T>
where
    T: SolverWeight,
{
    #[inline]
    pub fn new(
        result: SolverResult<T>,
        reason: TerminationReason,
        statistics: SolverStatistics,
    ) -> Self {
        Self {
            result,
            reason,
            statistics,
        }
    }

    #[inline]
    pub fn optimal(placement: Placement<T>, statistics: SolverStatistics) -> Self {
        Self::new(
            SolverResult::Optimal(placement),
            TerminationReason::OptimalityProven,
            statistics,
        )
    }

    #[inline]
    pub fn infeasible(statistics: SolverStatistics) -> Self {
        Self::new(
            SolverResult::Infeasible,
            TerminationReason::InfeasibilityProven,
            statistics,
        )
    }

    #[inline]
    pub fn feasible<S>(placement: Placement<T>, reason: S, statistics: SolverStatistics) -> Self
    where
        S: Into<String>,
    {
        Self::new(
            SolverResult::Feasible(placement),
            TerminationReason::Aborted(reason.into()),
            statistics,
        )
    }

    #[inline]
    pub fn unknown<S>(reason: S, statistics: SolverStatistics) -> Self
    where
        S: Into<String>,
    {
        Self::new(
            SolverResult::Unknown,
            TerminationReason::Aborted(reason.into()),
            statistics,
        )
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self.result, SolverResult::Optimal(_))
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        matches!(self.result, SolverResult::Feasible(_))
    }

    #[inline]
    pub fn is_infeasible(&self) -> bool {
        matches!(self.result, SolverResult::Infeasible)
    }

    #[inline]
    pub fn has_solution(&self) -> bool {
        matches!(
            self.result,
            SolverResult::Optimal(_) | SolverResult::Feasible(_)
        )
    }

    /// Returns the reported best score. Proven infeasibility reports zero.
    #[inline]
    pub fn best_score(&self) -> Option<T> {
        match &self.result {
            SolverResult::Infeasible => Some(T::zero()),
            other => other.score(),
        }
    }
}

impl<T> std::fmt::Display for SolverOutcome<T>
where
    T: SolverWeight,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Result: {}", self.result)?;
        writeln!(f, "Termination: {}", self.reason)?;
        if let Some(placement) = self.result.placement() {
            writeln!(f, "{}", placement)?;
        }
        write!(f, "{}", self.statistics)
    }
}
