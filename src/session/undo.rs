//! Bounded history of closed tabs.

use super::tab::Tab;
use std::collections::VecDeque;

/// Default number of closed tabs that can be restored.
pub const DEFAULT_CAPACITY: usize = 20;

/// A closed tab and the index it occupied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedTab {
    pub tab: Tab,
    pub index: usize,
}

/// LIFO stack of closed tabs. Pushing past capacity evicts the oldest entry.
///
/// Lives only in memory: it is not persisted and does not survive the
/// editor being locked or closed.
#[derive(Debug, Clone)]
pub struct ClosedTabStack {
    entries: VecDeque<ClosedTab>,
    capacity: usize,
}

impl ClosedTabStack {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, tab: Tab, index: usize) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(ClosedTab { tab, index });
    }

    pub fn pop(&mut self) -> Option<ClosedTab> {
        self.entries.pop_back()
    }

    pub fn peek(&self) -> Option<&ClosedTab> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ClosedTabStack {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_is_lifo() {
        let mut stack = ClosedTabStack::default();
        stack.push(Tab::new(1, "f"), 0);
        stack.push(Tab::new(2, "f"), 3);

        let top = stack.pop().unwrap();
        assert_eq!(top.tab.id, 2);
        assert_eq!(top.index, 3);
        assert_eq!(stack.pop().unwrap().tab.id, 1);
        assert!(stack.pop().is_none());
    }

    #[test]
    fn test_twenty_first_push_evicts_first() {
        let mut stack = ClosedTabStack::default();
        for id in 1..=21 {
            stack.push(Tab::new(id, "f"), 0);
            assert!(stack.len() <= DEFAULT_CAPACITY);
        }
        assert_eq!(stack.len(), 20);

        let mut ids = Vec::new();
        while let Some(entry) = stack.pop() {
            ids.push(entry.tab.id);
        }
        assert_eq!(ids.last(), Some(&2));
        assert!(!ids.contains(&1));
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let mut stack = ClosedTabStack::new(0);
        stack.push(Tab::new(1, "f"), 0);
        stack.push(Tab::new(2, "f"), 0);
        assert_eq!(stack.capacity(), 1);
        assert_eq!(stack.peek().unwrap().tab.id, 2);
    }
}
