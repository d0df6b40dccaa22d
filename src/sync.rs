//! Synchronization primitives shared between search workers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A shared node counter, bumped on every `do_move`/`do_null_move`.
///
/// Wraps `Arc<AtomicU64>` so the UCI layer can read node totals across
/// threads while each worker owns a clone next to its `Position`.
#[derive(Clone, Debug)]
pub struct NodeCounter(Arc<AtomicU64>);

impl NodeCounter {
    /// Create a new counter starting at zero.
    #[must_use]
    pub fn new() -> Self {
        NodeCounter(Arc::new(AtomicU64::new(0)))
    }

    /// Add one searched node.
    #[inline]
    pub fn increment(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    /// Read the current total.
    #[inline]
    #[must_use]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    /// Reset the counter to zero (between searches).
    #[inline]
    pub fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }
}

impl Default for NodeCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_counter_lifecycle() {
        let counter = NodeCounter::new();
        assert_eq!(counter.get(), 0);

        counter.increment();
        counter.increment();
        assert_eq!(counter.get(), 2);

        counter.reset();
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_node_counter_shared_across_clones() {
        let a = NodeCounter::new();
        let b = a.clone();

        a.increment();
        assert_eq!(b.get(), 1);
    }
}
