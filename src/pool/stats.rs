//! Pool usage statistics

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Live counters, updated with relaxed atomics
#[derive(Default)]
pub(crate) struct Counters {
    pub(crate) acquisitions: AtomicUsize,
    pub(crate) hits: AtomicUsize,
    pub(crate) misses: AtomicUsize,
    pub(crate) returns: AtomicUsize,
    pub(crate) discards: AtomicUsize,
}

impl Counters {
    #[inline]
    pub(crate) fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn reset(&self) {
        for c in [
            &self.acquisitions,
            &self.hits,
            &self.misses,
            &self.returns,
            &self.discards,
        ] {
            c.store(0, Ordering::Relaxed);
        }
    }
}

/// Snapshot of a pool's statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolStats {
    /// Total buffers handed out
    pub acquisitions: usize,
    /// Acquisitions satisfied from a free list
    pub hits: usize,
    /// Acquisitions that allocated a fresh buffer
    pub misses: usize,
    /// Buffers returned to a free list
    pub returns: usize,
    /// Returned buffers dropped because their class was full
    pub discards: usize,
    /// Buffers currently cached across all classes
    pub cached_buffers: usize,
    /// Elements of capacity currently cached across all classes
    pub cached_elements: usize,
}

impl PoolStats {
    pub(crate) fn from_counters(
        counters: &Counters,
        cached_buffers: usize,
        cached_elements: usize,
    ) -> Self {
        Self {
            acquisitions: counters.acquisitions.load(Ordering::Relaxed),
            hits: counters.hits.load(Ordering::Relaxed),
            misses: counters.misses.load(Ordering::Relaxed),
            returns: counters.returns.load(Ordering::Relaxed),
            discards: counters.discards.load(Ordering::Relaxed),
            cached_buffers,
            cached_elements,
        }
    }

    /// Fraction of acquisitions served from a free list
    pub fn hit_rate(&self) -> f64 {
        if self.acquisitions == 0 {
            0.0
        } else {
            self.hits as f64 / self.acquisitions as f64
        }
    }
}

impl fmt::Display for PoolStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pool: {} acquisitions ({:.1}% hits), {} returns, {} discards, {} cached ({} elements)",
            self.acquisitions,
            self.hit_rate() * 100.0,
            self.returns,
            self.discards,
            self.cached_buffers,
            self.cached_elements
        )
    }
}
