//! Double-ended queue for 0/1-weighted breadth-first search.
//!
//! Items reached over a free (weight 0) edge go to the front, items reached
//! over a unit (weight 1) edge go to the back.  Popping from the front then
//! yields items in non-decreasing cost order, which is all Dijkstra needs
//! when edge weights are restricted to {0, 1}.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct WeightedDeque<T> {
    inner: VecDeque<T>,
}

impl<T> Default for WeightedDeque<T> {
    fn default() -> Self {
        Self { inner: VecDeque::new() }
    }
}

impl<T> WeightedDeque<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { inner: VecDeque::with_capacity(capacity) }
    }

    /// Enqueue `item` reached over an edge of `weight` (0 or 1).
    #[inline]
    pub fn push(&mut self, item: T, weight: u32) {
        debug_assert!(weight <= 1, "0/1 BFS edge weight must be 0 or 1, got {weight}");
        if weight == 0 {
            self.inner.push_front(item);
        } else {
            self.inner.push_back(item);
        }
    }

    #[inline]
    pub fn push_front(&mut self, item: T) {
        self.inner.push_front(item);
    }

    #[inline]
    pub fn push_back(&mut self, item: T) {
        self.inner.push_back(item);
    }

    /// Pop the cheapest item.
    #[inline]
    pub fn pop_next(&mut self) -> Option<T> {
        self.inner.pop_front()
    }

    #[inline]
    pub fn pop_back(&mut self) -> Option<T> {
        self.inner.pop_back()
    }

    pub fn peek(&self) -> Option<&T> {
        self.inner.front()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}
