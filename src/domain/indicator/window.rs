//! Bounded most-recent-first buffer backing every indicator.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingWindow<T> {
    /// # Panics
    /// If `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "rolling window capacity must be non-zero");
        Self {
            items: VecDeque::new(),
            capacity,
        }
    }

    /// Pushes `item` as the newest entry, evicting the oldest past capacity.
    pub fn push(&mut self, item: T) {
        self.items.push_front(item);
        if self.items.len() > self.capacity {
            self.items.pop_back();
        }
    }

    /// `index` 0 is the newest entry.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn newest(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn oldest(&self) -> Option<&T> {
        self.items.back()
    }

    /// Newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
