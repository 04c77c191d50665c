//! Size classes and per-class free lists

use parking_lot::Mutex;

/// Number of size classes: one per possible bit-length of a `usize`, plus zero
pub(crate) const NUM_CLASSES: usize = usize::BITS as usize + 1;

/// Size class of a requested element count: its bit-length
///
/// `0 -> 0`, `1 -> 1`, `2..=3 -> 2`, `4..=7 -> 3`, ...
#[inline]
pub(crate) const fn size_class(n: usize) -> usize {
    (usize::BITS - n.leading_zeros()) as usize
}

/// Buffer capacity handed out by a size class: `2^class - 1`
#[inline]
pub(crate) const fn class_capacity(class: usize) -> usize {
    if class >= usize::BITS as usize {
        usize::MAX
    } else {
        (1usize << class) - 1
    }
}

/// Free list for one size class
///
/// Every buffer stored here was allocated with `class_capacity(class)`
/// elements of capacity. Each slot carries its own lock so acquisitions of
/// different sizes never contend.
pub(crate) struct Slot<T> {
    capacity: usize,
    free: Mutex<Vec<Vec<T>>>,
}

impl<T> Slot<T> {
    pub(crate) fn new(class: usize) -> Self {
        Self {
            capacity: class_capacity(class),
            free: Mutex::new(Vec::new()),
        }
    }

    /// Capacity of the buffers this slot produces
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn pop(&self) -> Option<Vec<T>> {
        self.free.lock().pop()
    }

    /// Push a buffer back; returns false if the slot is at `limit` and the
    /// buffer was dropped instead.
    pub(crate) fn push(&self, buffer: Vec<T>, limit: Option<usize>) -> bool {
        let mut free = self.free.lock();
        if limit.is_some_and(|max| free.len() >= max) {
            return false;
        }
        free.push(buffer);
        true
    }

    pub(crate) fn cached(&self) -> usize {
        self.free.lock().len()
    }

    pub(crate) fn clear(&self) {
        self.free.lock().clear();
    }
}
