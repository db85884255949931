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

//! # Placer Solver
//!
//! The public face of the workspace. Pick a search strategy and a bound,
//! then solve a weighted board or inspect a partial placement.
//!
//! ## Modules
//!
//! - `solver`: The `Solver` with its builder, the parallel branch-and-bound
//!   root split and the `solve`, `solve_contributions` and `inspect` helpers.
//! - `strategy`: Strategy and bound selection, parsed from their names.
//! - `error`: Errors raised before a search starts.
//!
//! See `solver` for detailed APIs and examples.

pub mod error;
pub mod solver;
pub mod strategy;

pub use error::SolverError;
pub use solver::{Solver, SolverBuilder, inspect, solve, solve_contributions};
pub use strategy::{BoundKind, SearchStrategy};
