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

//! Placer-Model: the weighted non-attacking placement problem
//!
//! A board of `n x n` cells carries a non-negative weight on each cell, and
//! `d` placers must be put on distinct cells such that no two share a row,
//! a column or a diagonal (the queens' attack pattern). The objective is to
//! maximize the total weight of the occupied cells.
//!
//! Module map
//! - `board`: `WeightedBoard` (immutable weights + sparse index) and its builder.
//! - `coord`: `Coordinate` and the four `LineFamily` variants with line ids.
//! - `coverage`: bit-set line occupancy used by every solver.
//! - `num`: the `SolverWeight` numeric trait alias.
//! - `placement`: the solution type and its validation.
//! - `render`: debug snapshot rendering of partial placements.

pub mod board;
pub mod coord;
pub mod coverage;
pub mod num;
pub mod placement;
pub mod render;
