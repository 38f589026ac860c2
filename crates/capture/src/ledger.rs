//! Acquire/release accounting for native resources

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counts resources handed out and given back
///
/// Clones share the same counters.
#[derive(Debug, Clone, Default)]
pub struct ResourceLedger {
    counters: Arc<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    acquired: AtomicU64,
    released: AtomicU64,
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an acquisition; the returned lease records the release on drop
    pub fn acquire(&self) -> Lease {
        self.counters.acquired.fetch_add(1, Ordering::SeqCst);
        Lease {
            counters: Arc::clone(&self.counters),
        }
    }

    pub fn acquired(&self) -> u64 {
        self.counters.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> u64 {
        self.counters.released.load(Ordering::SeqCst)
    }

    /// Resources acquired but not yet released
    pub fn outstanding(&self) -> u64 {
        let released = self.released();
        self.acquired() - released
    }
}

/// Proof of one acquisition, released exactly once when dropped
#[derive(Debug)]
pub struct Lease {
    counters: Arc<Counters>,
}

impl Drop for Lease {
    fn drop(&mut self) {
        self.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}
