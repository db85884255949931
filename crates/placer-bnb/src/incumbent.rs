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

//! Incumbent management for branch-and-bound
//!
//! `IncumbentStore<T>` abstracts where the best known score comes from:
//!
//! - `NoSharedIncumbent<T>`: local only. No initial bound, `tighten(x) = x`,
//!   and `on_solution_found` is a no-op.
//! - `SharedIncumbentAdapter<'a, T>`: wraps a `SharedIncumbent<T>`;
//!   `tighten(x)` returns the larger of `x` and the shared score, and
//!   `on_solution_found` attempts installation.
//!
//! Scores are maximized, so "no incumbent yet" is `None` rather than a
//! sentinel value.

use placer_model::{num::SolverWeight, placement::Placement};
use placer_search::incumbent::SharedIncumbent;
use std::marker::PhantomData;

/// Source and sink of the best known score during a search.
pub trait IncumbentStore<T>
where
    T: SolverWeight,
{
    /// Returns the best score known before the search starts.
    fn initial_lower_bound(&self) -> Option<T>;
    /// Combines the local best score with the externally known one.
    fn tighten(&self, current_local_best: Option<T>) -> Option<T>;
    /// Publishes an improving placement.
    fn on_solution_found(&self, placement: &Placement<T>);
}

/// An `IncumbentStore` that keeps everything local.
#[repr(transparent)]
#[derive(Debug, Clone, Copy)]
pub struct NoSharedIncumbent<T>(PhantomData<T>);

impl<T> Default for NoSharedIncumbent<T>
where
    T: SolverWeight,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NoSharedIncumbent<T>
where
    T: SolverWeight,
{
    #[inline(always)]
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> IncumbentStore<T> for NoSharedIncumbent<T>
where
    T: SolverWeight,
{
    #[inline(always)]
    fn initial_lower_bound(&self) -> Option<T> {
        None
    }

    #[inline(always)]
    fn tighten(&self, current_local_best: Option<T>) -> Option<T> {
        current_local_best
    }

    #[inline(always)]
    fn on_solution_found(&self, _: &Placement<T>) {}
}

/// An `IncumbentStore` backed by a `SharedIncumbent` that other solver
/// instances read and update concurrently.
#[repr(transparent)]
#[derive(Debug, Clone, Copy)]
pub struct SharedIncumbentAdapter<'a, T> {
    inner: &'a SharedIncumbent<T>,
}

impl<'a, T> SharedIncumbentAdapter<'a, T> {
    #[inline(always)]
    pub fn new(inner: &'a SharedIncumbent<T>) -> Self {
        Self { inner }
    }
}

impl<'a, T> IncumbentStore<T> for SharedIncumbentAdapter<'a, T>
where
    T: SolverWeight,
{
    #[inline(always)]
    fn initial_lower_bound(&self) -> Option<T> {
        self.inner.best_score()
    }

    #[inline(always)]
    fn tighten(&self, current_local_best: Option<T>) -> Option<T> {
        match (self.inner.best_score(), current_local_best) {
            (Some(shared), Some(local)) => Some(shared.max(local)),
            (shared, local) => shared.or(local),
        }
    }

    #[inline(always)]
    fn on_solution_found(&self, placement: &Placement<T>) {
        self.inner.try_install(placement);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use placer_model::coord::Coordinate;

    fn placement(score: u32) -> Placement<u32> {
        Placement::new(score, vec![Coordinate::new(0, 1)])
    }

    #[test]
    fn test_no_shared_incumbent_is_passthrough() {
        let store: NoSharedIncumbent<u32> = NoSharedIncumbent::new();
        assert_eq!(store.initial_lower_bound(), None);
        assert_eq!(store.tighten(None), None);
        assert_eq!(store.tighten(Some(42)), Some(42));
        store.on_solution_found(&placement(7));
        assert_eq!(store.tighten(None), None);
    }

    #[test]
    fn test_adapter_reads_shared_bound() {
        let shared = SharedIncumbent::<u32>::new();
        let adapter = SharedIncumbentAdapter::new(&shared);
        assert_eq!(adapter.initial_lower_bound(), None);

        assert!(shared.try_install(&placement(120)));
        assert_eq!(adapter.initial_lower_bound(), Some(120));
    }

    #[test]
    fn test_adapter_tighten_returns_max() {
        let shared = SharedIncumbent::<u32>::new();
        let adapter = SharedIncumbentAdapter::new(&shared);
        assert_eq!(adapter.tighten(Some(5)), Some(5));

        assert!(shared.try_install(&placement(200)));
        assert_eq!(adapter.tighten(None), Some(200));
        assert_eq!(adapter.tighten(Some(150)), Some(200));
        assert_eq!(adapter.tighten(Some(250)), Some(250));
    }

    #[test]
    fn test_adapter_publishes_solutions() {
        let shared = SharedIncumbent::<u32>::new();
        let adapter = SharedIncumbentAdapter::new(&shared);
        adapter.on_solution_found(&placement(95));
        adapter.on_solution_found(&placement(90));

        let snap = shared.snapshot().expect("snapshot should be Some");
        assert_eq!(snap.score(), 95);
        assert_eq!(snap.cells(), &[Coordinate::new(0, 1)]);
    }
}
