//! Access Order Module
//!
//! Tracks key recency for eviction when the in-memory store hits capacity.
//! Front of the queue is most recently used, back is the eviction candidate.

use std::collections::VecDeque;

// == Access Order ==
/// Recency queue over stored keys.
#[derive(Debug, Default)]
pub struct AccessOrder {
    queue: VecDeque<String>,
}

impl AccessOrder {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as just used, inserting it if new.
    pub fn touch(&mut self, key: &str) {
        self.forget(key);
        self.queue.push_front(key.to_string());
    }

    // == Forget ==
    /// Drops a key from the queue, if tracked.
    pub fn forget(&mut self, key: &str) {
        self.queue.retain(|k| k != key);
    }

    // == Pop Oldest ==
    /// Removes and returns the least recently used key.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.queue.pop_back()
    }

    /// Clears all tracked keys.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Number of tracked keys.
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_order_follows_insertion() {
        let mut order = AccessOrder::new();
        order.touch("a");
        order.touch("b");
        order.touch("c");

        assert_eq!(order.pop_oldest(), Some("a".to_string()));
        assert_eq!(order.pop_oldest(), Some("b".to_string()));
        assert_eq!(order.pop_oldest(), Some("c".to_string()));
        assert_eq!(order.pop_oldest(), None);
    }

    #[test]
    fn test_touch_refreshes_recency() {
        let mut order = AccessOrder::new();
        order.touch("a");
        order.touch("b");
        order.touch("a");

        // "b" is now the oldest.
        assert_eq!(order.pop_oldest(), Some("b".to_string()));
        assert_eq!(order.pop_oldest(), Some("a".to_string()));
    }

    #[test]
    fn test_touch_is_idempotent_on_length() {
        let mut order = AccessOrder::new();
        order.touch("a");
        order.touch("a");
        order.touch("a");
        assert_eq!(order.len(), 1);
    }

    #[test]
    fn test_forget_unknown_key_is_a_no_op() {
        let mut order = AccessOrder::new();
        order.touch("a");
        order.forget("b");
        assert_eq!(order.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut order = AccessOrder::new();
        order.touch("a");
        order.touch("b");
        order.clear();
        assert_eq!(order.pop_oldest(), None);
    }
}
