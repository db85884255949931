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

//! Strategy and bound selection
//!
//! `SearchStrategy` picks the engine and `BoundKind` the estimator. Both are
//! closed enums parsed case-insensitively from text. `SelectedBound` is the
//! estimator a `BoundKind` resolves to; it dispatches statically so the
//! engines stay monomorphic over a single estimator type.

use crate::error::SolverError;
use placer_model::{board::WeightedBoard, coverage::Coverage, num::SolverWeight};
use placer_search::eval::{
    estimator::BoundEstimator, line_relaxation::LineRelaxationBound,
    uncovered_sum::UncoveredSumBound,
};
use std::str::FromStr;

/// The search engine used by the `Solver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchStrategy {
    /// Depth-first branch-and-bound.
    #[default]
    BranchAndBound,
    /// Best-first (A*) search.
    BestFirst,
}

impl SearchStrategy {
    pub const ALL: [SearchStrategy; 2] = [SearchStrategy::BranchAndBound, SearchStrategy::BestFirst];

    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            SearchStrategy::BranchAndBound => "branch-and-bound",
            SearchStrategy::BestFirst => "best-first",
        }
    }
}

impl std::fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SearchStrategy {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dfs" | "bnb" | "branch-and-bound" => Ok(SearchStrategy::BranchAndBound),
            "astar" | "a*" | "best-first" => Ok(SearchStrategy::BestFirst),
            _ => Err(SolverError::UnsupportedStrategy(s.to_string())),
        }
    }
}

/// The bound estimator used by the engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoundKind {
    /// Per-family `k` largest line maxima, minimum over the families.
    #[default]
    LineRelaxation,
    /// Sum of all uncovered weights.
    UncoveredSum,
}

impl BoundKind {
    pub const ALL: [BoundKind; 2] = [BoundKind::LineRelaxation, BoundKind::UncoveredSum];

    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            BoundKind::LineRelaxation => "line-relaxation",
            BoundKind::UncoveredSum => "uncovered-sum",
        }
    }

    /// Creates the estimator, with scratch space for boards of side `size`.
    #[inline]
    pub fn estimator<T>(&self, size: usize) -> SelectedBound<T>
    where
        T: SolverWeight,
    {
        match self {
            BoundKind::LineRelaxation => {
                SelectedBound::LineRelaxation(LineRelaxationBound::preallocated(size))
            }
            BoundKind::UncoveredSum => SelectedBound::UncoveredSum(UncoveredSumBound::new()),
        }
    }
}

impl std::fmt::Display for BoundKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BoundKind {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "line" | "line-relaxation" => Ok(BoundKind::LineRelaxation),
            "uncovered" | "uncovered-sum" => Ok(BoundKind::UncoveredSum),
            _ => Err(SolverError::UnsupportedBound(s.to_string())),
        }
    }
}

/// An estimator chosen at runtime through a `BoundKind`.
#[derive(Debug, Clone)]
pub enum SelectedBound<T> {
    LineRelaxation(LineRelaxationBound<T>),
    UncoveredSum(UncoveredSumBound),
}

impl<T> BoundEstimator<T> for SelectedBound<T>
where
    T: SolverWeight,
{
    fn name(&self) -> &str {
        match self {
            SelectedBound::LineRelaxation(bound) => bound.name(),
            SelectedBound::UncoveredSum(bound) => BoundEstimator::<T>::name(bound),
        }
    }

    #[inline]
    fn estimate_remaining(
        &mut self,
        board: &WeightedBoard<T>,
        remaining: usize,
        coverage: &Coverage,
    ) -> T {
        match self {
            SelectedBound::LineRelaxation(bound) => {
                bound.estimate_remaining(board, remaining, coverage)
            }
            SelectedBound::UncoveredSum(bound) => {
                bound.estimate_remaining(board, remaining, coverage)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use placer_model::coord::Coordinate;

    #[test]
    fn test_parse_strategy_aliases() {
        for text in ["dfs", "BnB", "Branch-And-Bound", " bnb "] {
            assert_eq!(text.parse::<SearchStrategy>(), Ok(SearchStrategy::BranchAndBound), "{}", text);
        }
        for text in ["astar", "A*", "best-first", "AStar"] {
            assert_eq!(text.parse::<SearchStrategy>(), Ok(SearchStrategy::BestFirst), "{}", text);
        }
        assert_eq!(
            "minimax".parse::<SearchStrategy>(),
            Err(SolverError::UnsupportedStrategy("minimax".into()))
        );
    }

    #[test]
    fn test_parse_bound_aliases() {
        for text in ["line", "Line-Relaxation", " LINE "] {
            assert_eq!(text.parse::<BoundKind>(), Ok(BoundKind::LineRelaxation), "{}", text);
        }
        for text in ["uncovered", "Uncovered-Sum"] {
            assert_eq!(text.parse::<BoundKind>(), Ok(BoundKind::UncoveredSum), "{}", text);
        }
        assert_eq!(
            "lagrange".parse::<BoundKind>(),
            Err(SolverError::UnsupportedBound("lagrange".into()))
        );
    }

    #[test]
    fn test_display_round_trips() {
        for strategy in SearchStrategy::ALL {
            assert_eq!(strategy.to_string().parse::<SearchStrategy>(), Ok(strategy));
        }
        for kind in BoundKind::ALL {
            assert_eq!(kind.to_string().parse::<BoundKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_selected_bound_delegates() {
        let board = WeightedBoard::<u32>::from_contributions(
            4,
            2,
            [
                (Coordinate::new(0, 0), 1),
                (Coordinate::new(1, 2), 3),
                (Coordinate::new(3, 3), 5),
            ],
        )
        .expect("valid board");
        let coverage = Coverage::new(4);

        let mut line = BoundKind::LineRelaxation.estimator::<u32>(4);
        let mut uncovered = BoundKind::UncoveredSum.estimator::<u32>(4);
        assert_eq!(line.name(), "LineRelaxationBound");
        assert_eq!(uncovered.name(), "UncoveredSumBound");
        assert_eq!(line.estimate_remaining(&board, 2, &coverage), 8);
        assert_eq!(uncovered.estimate_remaining(&board, 2, &coverage), 9);
    }
}
