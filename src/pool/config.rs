//! Pool configuration

/// Configuration for a [`Pool`](super::Pool)
///
/// # Example
///
/// ```
/// use matx::pool::{Pool, PoolConfig};
///
/// let pool = Pool::<f32>::with_config(PoolConfig::default().max_cached_per_class(8));
/// assert_eq!(pool.config().max_cached_per_class, Some(8));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolConfig {
    /// Upper bound on buffers kept in each size class free list.
    ///
    /// Buffers released into a full class are dropped. `None` keeps every
    /// released buffer.
    pub max_cached_per_class: Option<usize>,
}

impl PoolConfig {
    /// Bound the number of cached buffers per size class
    pub fn max_cached_per_class(mut self, max: usize) -> Self {
        self.max_cached_per_class = Some(max);
        self
    }
}
