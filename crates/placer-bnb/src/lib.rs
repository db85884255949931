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

//! Placer-BnB: depth-first branch-and-bound for weighted placements
//!
//! Finds a maximum-weight placement of `d` mutually non-attacking placers on
//! an `n x n` board by exploring row-ordered partial placements and pruning
//! with an admissible `BoundEstimator` from `placer_search`.
//!
//! Core flow
//! - Build a `placer_model::board::WeightedBoard<T>`.
//! - Pick an estimator (`LineRelaxationBound` or `UncoveredSumBound`).
//! - Optionally set a fixed prefix, a shared incumbent, and monitors.
//! - Run `bnb::BranchAndBoundSolver`.
//!
//! Assumptions and guarantees
//! - Estimators must be admissible (never underestimate); debug builds check
//!   this exhaustively on small boards.
//! - Results are deterministic for a given board and estimator when no
//!   shared incumbent is involved.
//!
//! Module map
//! - `bnb`: the solver engine and session orchestration.
//! - `monitor`: tree-search monitors (log, composite, wrapper).
//! - `result`: solver outcomes with termination reasons.
//! - `stats`: counters and timing.
//! - `tracker`: incremental coverage with an undo trail.

pub mod bnb;
pub mod incumbent;
pub mod monitor;
pub mod result;
mod stack;
pub mod stats;
pub mod tracker;
