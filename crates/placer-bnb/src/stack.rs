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

use placer_model::coord::Coordinate;

/// A decision level of the search: where its candidates start in the entry
/// stack, and the upper bound of the node that generated them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Frame<T> {
    entry_start_index: usize,
    upper_bound: T,
}

impl<T> Frame<T>
where
    T: Copy,
{
    /// Returns the upper bound of the node owning this frame.
    #[inline]
    pub fn upper_bound(&self) -> T {
        self.upper_bound
    }
}

/// A frame-structured LIFO stack of pending candidate coordinates.
///
/// All candidates live in one linear `entries` vector; `frames` marks where
/// each depth begins. Popping a frame truncates `entries` back to its start.
#[derive(Clone, Debug)]
pub struct SearchStack<T> {
    entries: Vec<Coordinate>,
    frames: Vec<Frame<T>>,
}

impl<T> Default for SearchStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SearchStack<T> {
    /// Creates a new, empty `SearchStack`.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Creates a `SearchStack` preallocated for a board of side `size`
    /// holding `num_placers` placers.
    #[inline]
    pub fn preallocated(size: usize, num_placers: usize) -> Self {
        let (entry_capacity, frame_capacity) = Self::capacities(size, num_placers);
        Self {
            entries: Vec::with_capacity(entry_capacity),
            frames: Vec::with_capacity(frame_capacity),
        }
    }

    /// Reserves one board worth of candidates; deeper levels rarely need more.
    #[inline]
    fn capacities(size: usize, num_placers: usize) -> (usize, usize) {
        let entry_capacity = size.saturating_mul(size);
        let frame_capacity = num_placers.saturating_add(1);
        (entry_capacity, frame_capacity)
    }

    /// Ensures the stack has capacity for the given problem size.
    #[inline]
    pub fn ensure_capacity(&mut self, size: usize, num_placers: usize) {
        let (entry_capacity, frame_capacity) = Self::capacities(size, num_placers);
        if self.entries.capacity() < entry_capacity {
            self.entries
                .reserve(entry_capacity - self.entries.len());
        }
        if self.frames.capacity() < frame_capacity {
            self.frames.reserve(frame_capacity - self.frames.len());
        }
    }

    /// Returns the number of pending candidates over all frames.
    #[inline]
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Returns the current search depth.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Opens a new decision level owned by a node with `upper_bound`.
    #[inline]
    pub fn push_frame(&mut self, upper_bound: T) {
        self.frames.push(Frame {
            entry_start_index: self.entries.len(),
            upper_bound,
        });
    }

    /// Pops the current frame and discards its remaining candidates.
    #[inline]
    pub fn pop_frame(&mut self) -> Option<Frame<T>> {
        let frame = self.frames.pop()?;
        self.entries.truncate(frame.entry_start_index);
        Some(frame)
    }

    /// Discards the remaining candidates of the current frame, keeping the frame.
    /// Returns the number of discarded candidates.
    #[inline]
    pub fn clear_current_level(&mut self) -> usize {
        let start = self.current_level_start().unwrap_or(0);
        let discarded = self.entries.len() - start;
        self.entries.truncate(start);
        discarded
    }

    #[inline]
    pub fn push(&mut self, coord: Coordinate) {
        self.entries.push(coord);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Coordinate> {
        self.entries.pop()
    }

    /// Clears all entries and frames, but keeps allocated capacity.
    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
        self.frames.clear();
    }

    #[inline]
    pub fn current_level_start(&self) -> Option<usize> {
        self.frames.last().map(|f| f.entry_start_index)
    }

    /// Returns the current frame, if any.
    #[inline]
    pub fn current_frame(&self) -> Option<&Frame<T>> {
        self.frames.last()
    }

    /// Returns `true` if the current level has no remaining candidates.
    #[inline]
    pub fn is_current_level_empty(&self) -> bool {
        match self.current_level_start() {
            Some(start) => self.entries.len() == start,
            None => true,
        }
    }

    /// Returns the total allocated memory in bytes.
    #[inline]
    pub fn allocated_memory_bytes(&self) -> usize {
        let entries_size = self.entries.capacity() * std::mem::size_of::<Coordinate>();
        let frames_size = self.frames.capacity() * std::mem::size_of::<Frame<T>>();
        entries_size + frames_size
    }
}

impl<T> std::fmt::Display for SearchStack<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchStack(entries: {}, frames: {})",
            self.entries.len(),
            self.frames.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(row: usize, col: usize) -> Coordinate {
        Coordinate::new(row, col)
    }

    /// Pending candidates of the current frame.
    fn level(s: &SearchStack<u32>) -> &[Coordinate] {
        match s.current_level_start() {
            Some(start) => &s.entries[start..],
            None => &[],
        }
    }

    #[test]
    fn test_new_and_preallocated_basic_props() {
        let s = SearchStack::<u32>::new();
        assert_eq!(s.num_entries(), 0);
        assert_eq!(s.depth(), 0);
        assert_eq!(s.depth(), 0);
        assert!(s.is_current_level_empty());
        assert_eq!(s.current_level_start(), None);
        assert!(s.current_frame().is_none());
        assert!(level(&s).is_empty());
        assert_eq!(s.to_string(), "SearchStack(entries: 0, frames: 0)");

        let s2 = SearchStack::<u32>::preallocated(4, 3);
        assert_eq!(s2.depth(), 0);
        assert!(s2.allocated_memory_bytes() > 0);
    }

    #[test]
    fn test_ensure_capacity_is_monotonic() {
        let mut s = SearchStack::<u32>::preallocated(2, 2);
        let bytes0 = s.allocated_memory_bytes();
        s.ensure_capacity(6, 5);
        let ecap = s.entries.capacity();
        let fcap = s.frames.capacity();
        assert!(ecap >= 36);
        assert!(fcap >= 6);
        assert!(s.allocated_memory_bytes() >= bytes0);

        s.ensure_capacity(1, 1);
        assert_eq!(s.entries.capacity(), ecap);
        assert_eq!(s.frames.capacity(), fcap);
    }

    #[test]
    fn test_frames_hold_upper_bounds_and_entries() {
        let mut s = SearchStack::<u32>::new();
        s.push_frame(10);
        s.push(c(0, 1));
        s.push(c(0, 0));
        assert_eq!(s.current_frame().map(Frame::upper_bound), Some(10));
        assert_eq!(level(&s), &[c(0, 1), c(0, 0)]);

        s.push_frame(7);
        assert!(s.is_current_level_empty());
        s.push(c(2, 3));
        assert_eq!(s.depth(), 2);
        assert_eq!(s.num_entries(), 3);

        assert_eq!(s.pop(), Some(c(2, 3)));
        let frame = s.pop_frame().expect("frame");
        assert_eq!(frame.upper_bound(), 7);
        assert_eq!(frame.entry_start_index, 2);

        assert_eq!(s.pop(), Some(c(0, 0)));
        assert_eq!(level(&s), &[c(0, 1)]);
    }

    #[test]
    fn test_pop_frame_discards_pending_candidates() {
        let mut s = SearchStack::<u32>::new();
        s.push_frame(5);
        s.push(c(0, 0));
        s.push_frame(4);
        s.push(c(1, 2));
        s.push(c(1, 3));
        assert!(s.pop_frame().is_some());
        assert_eq!(s.num_entries(), 1);
        assert_eq!(s.depth(), 1);
        assert!(s.pop_frame().is_some());
        assert_eq!(s.depth(), 0);
        assert_eq!(s.pop_frame(), None);
    }

    #[test]
    fn test_clear_current_level_keeps_frame() {
        let mut s = SearchStack::<u32>::new();
        s.push_frame(5);
        s.push(c(0, 0));
        s.push_frame(4);
        s.push(c(1, 2));
        s.push(c(1, 3));

        assert_eq!(s.clear_current_level(), 2);
        assert_eq!(s.depth(), 2);
        assert!(s.is_current_level_empty());
        assert_eq!(s.num_entries(), 1);
        assert_eq!(s.clear_current_level(), 0);
    }

    #[test]
    fn test_reset_clears_but_keeps_capacity() {
        let mut s = SearchStack::<u32>::preallocated(3, 3);
        let ecap = s.entries.capacity();
        let fcap = s.frames.capacity();
        s.push_frame(1);
        s.push(c(0, 0));
        s.reset();
        assert_eq!(s.depth(), 0);
        assert_eq!(s.num_entries(), 0);
        assert_eq!(s.entries.capacity(), ecap);
        assert_eq!(s.frames.capacity(), fcap);
    }
}
