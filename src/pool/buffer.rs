//! RAII buffer that returns itself to its pool on drop

use super::PoolInner;
use super::slot::{class_capacity, size_class};
use crate::dtype::Element;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// A numeric buffer, optionally borrowed from a [`Pool`](super::Pool)
///
/// Pool-sourced buffers go back to the free list of their size class when
/// dropped; detached buffers (adopted from a caller's `Vec`) are simply freed.
/// The length always equals the element count of the matrix using it, while
/// the capacity of a pool-sourced buffer is the `2^k - 1` capacity of its
/// size class.
pub struct PooledBuffer<T: Element> {
    data: Vec<T>,
    class: usize,
    home: Option<Arc<PoolInner<T>>>,
}

impl<T: Element> PooledBuffer<T> {
    pub(crate) fn pooled(data: Vec<T>, class: usize, home: Arc<PoolInner<T>>) -> Self {
        Self {
            data,
            class,
            home: Some(home),
        }
    }

    /// Wrap a caller-owned vector; it never enters a pool
    pub fn detached(data: Vec<T>) -> Self {
        Self {
            class: size_class(data.capacity()),
            data,
            home: None,
        }
    }

    /// Number of elements in use
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer holds no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Backing capacity in elements
    #[inline]
    pub fn capacity(&self) -> usize {
        if self.home.is_some() {
            class_capacity(self.class)
        } else {
            self.data.capacity()
        }
    }

    /// Whether this buffer will be returned to a pool on drop
    #[inline]
    pub fn is_pooled(&self) -> bool {
        self.home.is_some()
    }

    /// Id of the owning pool, if any
    #[inline]
    pub fn pool_id(&self) -> Option<u64> {
        self.home.as_ref().map(|home| home.id)
    }
}

impl<T: Element> Drop for PooledBuffer<T> {
    fn drop(&mut self) {
        if let Some(home) = self.home.take() {
            // Keyed by the capacity's bit-length, which is the class it came from
            let class = size_class(class_capacity(self.class));
            home.reclaim(std::mem::take(&mut self.data), class);
        }
    }
}

impl<T: Element> Deref for PooledBuffer<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        &self.data
    }
}

impl<T: Element> DerefMut for PooledBuffer<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T: Element> std::fmt::Debug for PooledBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledBuffer")
            .field("len", &self.data.len())
            .field("capacity", &self.capacity())
            .field("pool", &self.pool_id())
            .finish()
    }
}
