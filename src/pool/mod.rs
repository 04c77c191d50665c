//! Size-classed buffer pool backing dense matrices
//!
//! Training loops create and discard a matrix for nearly every intermediate
//! result. The pool keeps released buffers in free lists keyed by the
//! bit-length of their element count, so a later request of a similar size
//! reuses the allocation instead of going back to the allocator.
//!
//! # Size classes
//!
//! A request for `n` elements lands in class `bitlen(n)` and receives a buffer
//! of capacity `2^bitlen(n) - 1`:
//!
//! | n      | class | capacity |
//! |--------|-------|----------|
//! | 1      | 1     | 1        |
//! | 2..=3  | 2     | 3        |
//! | 4..=7  | 3     | 7        |
//! | 8..=15 | 4     | 15       |
//!
//! # Ownership
//!
//! Buffers are reference counted together with their views and return to the
//! pool automatically when the last matrix using them is dropped, so a buffer
//! can never be recycled while a view still reads it. [`Pool::release`] is
//! the explicit form: it consumes the matrix and rejects views, matrices from
//! other pools, and matrices that still have live views.
//!
//! # Usage
//!
//! ```
//! use matx::pool::Pool;
//!
//! let pool = Pool::<f32>::new();
//! let m = pool.acquire_empty(3, 4);
//! assert_eq!(m.to_vec(), vec![0.0; 12]);
//! assert_eq!(m.capacity(), 15);
//! pool.release(m)?;
//!
//! // Same size class: the buffer is reused
//! let again = pool.acquire(2, 5);
//! assert_eq!(pool.stats().hits, 1);
//! # drop(again);
//! # Ok::<(), matx::error::Error>(())
//! ```

mod buffer;
mod config;
mod slot;
mod stats;

pub use buffer::PooledBuffer;
pub use config::PoolConfig;
pub use stats::PoolStats;

use crate::dense::DenseMatrix;
use crate::dtype::Element;
use crate::error::{Error, Result};
use slot::{NUM_CLASSES, Slot, class_capacity, size_class};
use stats::Counters;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(1);

/// Shared state behind a [`Pool`] handle
pub(crate) struct PoolInner<T> {
    pub(crate) id: u64,
    slots: Box<[Slot<T>]>,
    config: PoolConfig,
    counters: Counters,
}

impl<T: Element> PoolInner<T> {
    /// Put a buffer back into its size class free list
    pub(crate) fn reclaim(&self, buffer: Vec<T>, class: usize) {
        let slot = &self.slots[class];
        if slot.push(buffer, self.config.max_cached_per_class) {
            Counters::bump(&self.counters.returns);
        } else {
            Counters::bump(&self.counters.discards);
            log::debug!(
                "pool {}: class {} full, dropping buffer of capacity {}",
                self.id,
                class,
                slot.capacity()
            );
        }
    }
}

/// Handle to a size-classed buffer pool
///
/// Cloning the handle is cheap and yields another reference to the same
/// pool. Acquisition and release are safe from any number of threads; each
/// size class is guarded by its own lock.
pub struct Pool<T: Element> {
    inner: Arc<PoolInner<T>>,
}

impl<T: Element> Pool<T> {
    /// Create a pool with the default configuration
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    /// Create a pool with an explicit configuration
    pub fn with_config(config: PoolConfig) -> Self {
        let slots = (0..NUM_CLASSES).map(Slot::new).collect();
        Self {
            inner: Arc::new(PoolInner {
                id: NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed),
                slots,
                config,
                counters: Counters::default(),
            }),
        }
    }

    /// Unique id of this pool
    #[inline]
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Configuration this pool was built with
    #[inline]
    pub fn config(&self) -> PoolConfig {
        self.inner.config
    }

    /// Whether two handles refer to the same pool
    #[inline]
    pub fn same_pool(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Backing capacity handed out for a request of `n` elements
    #[inline]
    pub fn capacity_for(n: usize) -> usize {
        class_capacity(size_class(n))
    }

    /// Acquire a raw buffer of exactly `n` elements
    ///
    /// With `zeroed == false` a reused buffer keeps whatever data its previous
    /// owner left behind. Fresh allocations are always zero.
    pub fn acquire_buffer(&self, n: usize, zeroed: bool) -> PooledBuffer<T> {
        let class = size_class(n);
        let slot = &self.inner.slots[class];
        Counters::bump(&self.inner.counters.acquisitions);

        let data = match slot.pop() {
            Some(mut data) => {
                Counters::bump(&self.inner.counters.hits);
                if zeroed {
                    data.clear();
                    data.resize(n, T::zero());
                } else if data.len() >= n {
                    data.truncate(n);
                } else {
                    data.resize(n, T::zero());
                }
                data
            }
            None => {
                Counters::bump(&self.inner.counters.misses);
                log::trace!(
                    "pool {}: allocating class {} buffer (capacity {}) for {} elements",
                    self.inner.id,
                    class,
                    slot.capacity(),
                    n
                );
                let mut data = Vec::with_capacity(slot.capacity());
                data.resize(n, T::zero());
                data
            }
        };

        PooledBuffer::pooled(data, class, Arc::clone(&self.inner))
    }

    /// Acquire a `rows x cols` matrix whose contents are unspecified
    ///
    /// A reused buffer may carry stale values from an unrelated computation;
    /// use [`acquire_empty`](Self::acquire_empty) when zeros are required.
    ///
    /// # Panics
    ///
    /// If `rows * cols` overflows `usize` or the allocation fails. The
    /// `DenseMatrix` constructors check caller-supplied shapes first.
    pub fn acquire(&self, rows: usize, cols: usize) -> DenseMatrix<T> {
        let buffer = self.acquire_buffer(rows.saturating_mul(cols), false);
        DenseMatrix::from_buffer(self.clone(), rows, cols, buffer)
    }

    /// Acquire a zero-filled `rows x cols` matrix
    ///
    /// Same shape precondition as [`acquire`](Self::acquire).
    pub fn acquire_empty(&self, rows: usize, cols: usize) -> DenseMatrix<T> {
        let buffer = self.acquire_buffer(rows.saturating_mul(cols), true);
        DenseMatrix::from_buffer(self.clone(), rows, cols, buffer)
    }

    /// Return a matrix's buffer to this pool
    ///
    /// # Errors
    ///
    /// Returns `InvalidRelease` if the matrix:
    /// - is a view (it does not own its buffer)
    /// - was not sourced from a pool
    /// - was sourced from a different pool
    /// - still has live views sharing its buffer
    ///
    /// Double release is ruled out by ownership: the matrix is consumed.
    pub fn release(&self, matrix: DenseMatrix<T>) -> Result<()> {
        let reason = if matrix.is_view() {
            Some("matrix is a view and does not own its buffer")
        } else if !matrix.is_pooled() {
            Some("matrix was not acquired from a pool")
        } else if matrix.pool_id() != Some(self.id()) {
            Some("matrix belongs to a different pool")
        } else if matrix.storage_refs() > 1 {
            Some("matrix still has live views")
        } else {
            None
        };

        match reason {
            Some(reason) => {
                log::debug!("pool {}: rejected release: {}", self.id(), reason);
                Err(Error::InvalidRelease { reason })
            }
            None => {
                // The buffer goes back to its class when the storage drops
                drop(matrix);
                Ok(())
            }
        }
    }

    /// Snapshot of usage statistics
    pub fn stats(&self) -> PoolStats {
        let (buffers, elements) = self
            .inner
            .slots
            .iter()
            .map(|slot| {
                let n = slot.cached();
                (n, n.saturating_mul(slot.capacity()))
            })
            .fold((0, 0), |(b, e), (n, c)| (b + n, e + c));
        PoolStats::from_counters(&self.inner.counters, buffers, elements)
    }

    /// Reset statistics counters
    pub fn reset_stats(&self) {
        self.inner.counters.reset();
    }

    /// Drop every cached buffer
    pub fn clear(&self) {
        for slot in self.inner.slots.iter() {
            slot.clear();
        }
    }
}

impl<T: Element> Clone for Pool<T> {
    /// Clone shares the same pool (zero-copy)
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Element> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> std::fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("id", &self.inner.id)
            .field("dtype", &T::DTYPE)
            .field("config", &self.inner.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_exact_len_and_class_capacity() {
        let pool = Pool::<f64>::new();
        for (rows, cols, cap) in [(1, 1, 1), (1, 2, 3), (3, 1, 3), (2, 2, 7), (3, 5, 15), (4, 4, 31)] {
            let m = pool.acquire(rows, cols);
            assert_eq!(m.to_vec().len(), rows * cols);
            assert_eq!(m.capacity(), cap, "{}x{}", rows, cols);
        }
    }

    #[test]
    fn test_zero_sized_acquire() {
        let pool = Pool::<f32>::new();
        let m = pool.acquire_empty(0, 5);
        assert_eq!(m.size(), 0);
        assert_eq!(m.capacity(), 0);
        pool.release(m).unwrap();
    }

    #[test]
    fn test_reuse_is_stale_unless_empty() {
        let pool = Pool::<f32>::new();
        let mut m = pool.acquire_empty(2, 2);
        m.set_data(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        pool.release(m).unwrap();

        // Same class (4..=7), reused without zeroing
        let stale = pool.acquire(1, 4);
        assert_eq!(stale.to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
        pool.release(stale).unwrap();

        let clean = pool.acquire_empty(1, 4);
        assert_eq!(clean.to_vec(), vec![0.0; 4]);

        let stats = pool.stats();
        assert_eq!(stats.acquisitions, 3);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_reuse_grows_within_class() {
        let pool = Pool::<f32>::new();
        let m = pool.acquire_empty(1, 4);
        pool.release(m).unwrap();
        let m = pool.acquire(1, 7);
        assert_eq!(m.to_vec().len(), 7);
        assert_eq!(m.capacity(), 7);
    }

    #[test]
    fn test_drop_returns_buffer() {
        let pool = Pool::<f32>::new();
        {
            let _m = pool.acquire(3, 3);
        }
        assert_eq!(pool.stats().returns, 1);
        assert_eq!(pool.stats().cached_buffers, 1);
        assert_eq!(pool.stats().cached_elements, 15);
    }

    #[test]
    fn test_release_rejects_view() {
        let pool = Pool::<f32>::new();
        let m = pool.acquire_empty(2, 3);
        let v = m.view(3, 2).unwrap();
        assert!(matches!(pool.release(v), Err(Error::InvalidRelease { .. })));
    }

    #[test]
    fn test_release_rejects_live_views() {
        let pool = Pool::<f32>::new();
        let m = pool.acquire_empty(2, 3);
        let _v = m.view(6, 1).unwrap();
        assert!(matches!(pool.release(m), Err(Error::InvalidRelease { .. })));
    }

    #[test]
    fn test_release_rejects_foreign_and_detached() {
        let pool = Pool::<f32>::new();
        let other = Pool::<f32>::new();
        let m = other.acquire(2, 2);
        assert!(matches!(pool.release(m), Err(Error::InvalidRelease { .. })));

        let detached = DenseMatrix::from_vec(&pool, 1, 2, vec![1.0, 2.0]).unwrap();
        assert!(matches!(
            pool.release(detached),
            Err(Error::InvalidRelease { .. })
        ));
    }

    #[test]
    fn test_view_keeps_buffer_alive() {
        let pool = Pool::<f32>::new();
        let m = pool.acquire_empty(2, 2);
        let v = m.view(4, 1).unwrap();
        drop(m);
        assert_eq!(pool.stats().returns, 0);
        drop(v);
        assert_eq!(pool.stats().returns, 1);
    }

    #[test]
    fn test_max_cached_per_class() {
        let pool = Pool::<f32>::with_config(PoolConfig::default().max_cached_per_class(1));
        let a = pool.acquire(2, 2);
        let b = pool.acquire(2, 2);
        pool.release(a).unwrap();
        pool.release(b).unwrap();
        let stats = pool.stats();
        assert_eq!(stats.returns, 1);
        assert_eq!(stats.discards, 1);
        assert_eq!(stats.cached_buffers, 1);
    }

    #[test]
    fn test_clear_and_reset() {
        let pool = Pool::<f64>::new();
        drop(pool.acquire(8, 8));
        pool.clear();
        pool.reset_stats();
        assert_eq!(pool.stats(), PoolStats::default());
    }

    #[test]
    fn test_concurrent_acquire_release() {
        let pool = Pool::<f32>::new();
        std::thread::scope(|s| {
            for t in 0..8 {
                let pool = pool.clone();
                s.spawn(move || {
                    for i in 0..200 {
                        let n = 1 + (t * 7 + i) % 40;
                        let m = pool.acquire_empty(1, n);
                        assert_eq!(m.to_vec(), vec![0.0; n]);
                        pool.release(m).unwrap();
                    }
                });
            }
        });
        let stats = pool.stats();
        assert_eq!(stats.acquisitions, 1600);
        assert_eq!(stats.returns, 1600);
        assert_eq!(stats.hits + stats.misses, 1600);
    }
}
