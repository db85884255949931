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

//! Placer-A*: best-first search for weighted placements
//!
//! An alternative to the depth-first engine in `placer_bnb`: explicit,
//! immutable states in a priority queue ordered by `g + h`, with the same
//! admissible `BoundEstimator`s from `placer_search`. It trades memory for
//! never expanding a node whose bound is below the optimum.
//!
//! Module map
//! - `astar`: the solver and its frontier ordering.
//! - `state`: shared-slice backed placement states.
//! - `result`: solver outcomes with termination reasons.
//! - `stats`: counters and timing.

pub mod astar;
pub mod result;
pub mod state;
pub mod stats;
