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

//! # Shared Incumbent (Best Placement Holder)
//!
//! A concurrent container for the best placement discovered so far. Workers
//! read a lock-free lower bound through an atomic to prune their subtrees and
//! propose improvements through `try_install`, which rechecks the candidate
//! against the authoritative placement stored behind a `Mutex`.
//!
//! ## Highlights
//!
//! - `try_install(&Placement<T>) -> bool` installs strictly better candidates.
//! - `best_score() -> Option<T>` is a relaxed atomic read suitable for pruning.
//! - `snapshot() -> Option<Placement<T>>` clones the current incumbent.
//!
//! ## Usage
//!
//! ```rust
//! use placer_search::incumbent::SharedIncumbent;
//! use placer_model::placement::Placement;
//!
//! let inc: SharedIncumbent<u32> = SharedIncumbent::new();
//! assert!(inc.try_install(&Placement::new(8, Vec::new())));
//! assert_eq!(inc.best_score(), Some(8));
//! ```

use placer_model::{num::SolverWeight, placement::Placement};
use std::sync::{
    Mutex,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

/// A concurrent holder for the best (incumbent) placement found during search.
///
/// The score is mirrored into an `AtomicU64` for fast reads. Since zero is a
/// legitimate score, a separate flag records whether any placement has been
/// installed. The flag is published with `Release` after the score is stored,
/// so a reader that observes the flag never sees a score older than the first
/// installed one. Later updates may still be observed late, which only makes
/// pruning weaker, never wrong.
#[derive(Debug)]
pub struct SharedIncumbent<T> {
    /// Score of the incumbent widened to `u64`.
    lower_bound: AtomicU64,
    /// Whether `lower_bound` holds a real score.
    installed: AtomicBool,
    /// The incumbent placement; the source of truth.
    placement: Mutex<Option<Placement<T>>>,
}

impl<T> Default for SharedIncumbent<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Display for SharedIncumbent<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.lower_bound() {
            Some(lb) => write!(f, "Incumbent(best_score: {})", lb),
            None => write!(f, "Incumbent(best_score: none)"),
        }
    }
}

impl<T> SharedIncumbent<T> {
    /// Creates a new shared incumbent with no placement installed.
    #[inline]
    pub fn new() -> Self {
        SharedIncumbent {
            lower_bound: AtomicU64::new(0),
            installed: AtomicBool::new(false),
            placement: Mutex::new(None),
        }
    }

    /// Returns the incumbent score widened to `u64`, if any.
    #[inline]
    pub fn lower_bound(&self) -> Option<u64> {
        if self.installed.load(Ordering::Acquire) {
            Some(self.lower_bound.load(Ordering::Relaxed))
        } else {
            None
        }
    }

    /// Returns `true` if a placement has been installed.
    #[inline]
    pub fn has_incumbent(&self) -> bool {
        self.installed.load(Ordering::Acquire)
    }
}

impl<T> SharedIncumbent<T>
where
    T: SolverWeight,
{
    /// Returns the incumbent score, if any.
    #[inline]
    pub fn best_score(&self) -> Option<T> {
        self.lower_bound().map(T::from_u64_saturating)
    }

    /// Returns a snapshot of the current incumbent placement, if any.
    #[inline]
    pub fn snapshot(&self) -> Option<Placement<T>> {
        let guard = self.placement.lock().unwrap();
        guard.clone()
    }

    /// Attempts to install `candidate` as the new incumbent.
    /// Returns `true` if it scored strictly better than the current one.
    pub fn try_install(&self, candidate: &Placement<T>) -> bool {
        let candidate_score = candidate.score().as_u64();
        if self.lower_bound().is_some_and(|lb| candidate_score <= lb) {
            return false;
        }

        let mut guard = self.placement.lock().unwrap();
        // The atomic read above may be stale; compare against the stored placement.
        if let Some(current) = guard.as_ref() {
            if candidate_score <= current.score().as_u64() {
                return false;
            }
        }

        *guard = Some(candidate.clone());
        self.lower_bound.store(candidate_score, Ordering::Relaxed);
        self.installed.store(true, Ordering::Release);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::SharedIncumbent;
    use placer_model::{coord::Coordinate, placement::Placement};
    use std::sync::Arc;
    use std::thread;

    fn make_placement(score: u32, n: usize) -> Placement<u32> {
        let cells = (0..n).map(|i| Coordinate::new(i, (2 * i) % 7)).collect();
        Placement::new(score, cells)
    }

    #[test]
    fn test_initial_state() {
        let inc: SharedIncumbent<u32> = SharedIncumbent::new();
        assert_eq!(inc.lower_bound(), None);
        assert_eq!(inc.best_score(), None);
        assert!(!inc.has_incumbent());
        assert!(inc.snapshot().is_none());
        assert_eq!(inc.to_string(), "Incumbent(best_score: none)");
    }

    #[test]
    fn test_zero_score_is_a_valid_incumbent() {
        let inc: SharedIncumbent<u32> = SharedIncumbent::new();
        assert!(inc.try_install(&Placement::empty()));
        assert_eq!(inc.best_score(), Some(0));
        assert!(!inc.try_install(&Placement::empty()));
    }

    #[test]
    fn test_install_better_and_reject_worse_or_equal() {
        let inc: SharedIncumbent<u32> = SharedIncumbent::new();
        assert!(inc.try_install(&make_placement(10, 2)));
        assert_eq!(inc.best_score(), Some(10));

        assert!(!inc.try_install(&make_placement(7, 2)));
        assert!(!inc.try_install(&make_placement(10, 2)));
        assert_eq!(inc.best_score(), Some(10));

        assert!(inc.try_install(&make_placement(12, 3)));
        let snap = inc.snapshot().expect("snapshot should be Some");
        assert_eq!(snap.score(), 12);
        assert_eq!(snap.len(), 3);
        assert_eq!(inc.to_string(), "Incumbent(best_score: 12)");
    }

    #[test]
    fn test_concurrent_installs_maximum_wins() {
        let inc = Arc::new(SharedIncumbent::<u32>::new());
        let scores = vec![300, 200, 400, 50, 120, 75, 500, 60, 90];

        let handles: Vec<_> = scores
            .iter()
            .copied()
            .map(|score| {
                let inc = Arc::clone(&inc);
                thread::spawn(move || inc.try_install(&make_placement(score, 4)))
            })
            .collect();

        let results = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect::<Vec<_>>();
        assert!(results.iter().any(|&r| r));

        let max = *scores.iter().max().unwrap();
        assert_eq!(inc.best_score(), Some(max));
        assert_eq!(inc.snapshot().unwrap().score(), max);
    }

    #[test]
    fn test_incumbent_with_u8() {
        let inc: SharedIncumbent<u8> = SharedIncumbent::new();
        assert!(inc.try_install(&Placement::new(u8::MAX, Vec::new())));
        assert_eq!(inc.lower_bound(), Some(255));
        assert_eq!(inc.best_score(), Some(u8::MAX));
        assert!(!inc.try_install(&Placement::new(200u8, Vec::new())));
    }
}
