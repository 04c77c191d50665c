//! Core dense implementation: struct, creation, accessors, views

use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::pool::{Pool, PooledBuffer};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use rand::Rng;
use std::sync::Arc;

/// Element count of a `rows x cols` shape
///
/// A product that overflows `usize` is reported as `SizeMismatch` with
/// `expected == usize::MAX`; `got` is what the caller supplied.
pub(crate) fn element_count(rows: usize, cols: usize, got: usize) -> Result<usize> {
    rows.checked_mul(cols).ok_or(Error::size_mismatch(usize::MAX, got))
}

/// Dense row-major matrix
///
/// # Invariants
///
/// - The buffer length is exactly `rows * cols`; its capacity may be larger
///   when it came from a pool.
/// - A view shares its origin's buffer; both must be treated as one object
///   for the purpose of mutation.
pub struct DenseMatrix<T: Element> {
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) storage: Arc<RwLock<PooledBuffer<T>>>,
    pub(crate) view: bool,
    pub(crate) pool: Pool<T>,
}

impl<T: Element> DenseMatrix<T> {
    pub(crate) fn from_buffer(pool: Pool<T>, rows: usize, cols: usize, buffer: PooledBuffer<T>) -> Self {
        debug_assert_eq!(buffer.len(), rows * cols);
        Self {
            rows,
            cols,
            storage: Arc::new(RwLock::new(buffer)),
            view: false,
            pool,
        }
    }

    /// Create a matrix by copying `data` into a pool buffer
    ///
    /// # Errors
    ///
    /// - `DataNil` if `data` is `None`; use [`new_empty`](Self::new_empty)
    /// - `SizeMismatch` if `data.len() != rows * cols`
    pub fn new(pool: &Pool<T>, rows: usize, cols: usize, data: Option<&[T]>) -> Result<Self> {
        let data = data.ok_or(Error::DataNil)?;
        let len = element_count(rows, cols, data.len())?;
        if data.len() != len {
            return Err(Error::size_mismatch(len, data.len()));
        }
        let out = pool.acquire(rows, cols);
        out.write().copy_from_slice(data);
        Ok(out)
    }

    /// Create a matrix by copying a row-major slice into a pool buffer
    pub fn from_slice(pool: &Pool<T>, rows: usize, cols: usize, data: &[T]) -> Result<Self> {
        Self::new(pool, rows, cols, Some(data))
    }

    /// Adopt a caller-owned vector without copying
    ///
    /// The buffer is not pool-sourced and is freed normally on drop;
    /// results of arithmetic on the matrix still come from `pool`.
    pub fn from_vec(pool: &Pool<T>, rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        let len = element_count(rows, cols, data.len())?;
        if data.len() != len {
            return Err(Error::size_mismatch(len, data.len()));
        }
        Ok(Self::from_buffer(pool.clone(), rows, cols, PooledBuffer::detached(data)))
    }

    /// Create a zero-filled matrix
    ///
    /// # Errors
    ///
    /// `SizeMismatch` if `rows * cols` overflows `usize`
    pub fn new_empty(pool: &Pool<T>, rows: usize, cols: usize) -> Result<Self> {
        element_count(rows, cols, 0)?;
        Ok(pool.acquire_empty(rows, cols))
    }

    /// Create a matrix with every element set to `value`
    pub fn filled(pool: &Pool<T>, rows: usize, cols: usize, value: T) -> Result<Self> {
        element_count(rows, cols, 0)?;
        let out = pool.acquire(rows, cols);
        out.write().fill(value);
        Ok(out)
    }

    /// Create an `n x n` identity matrix
    pub fn identity(pool: &Pool<T>, n: usize) -> Result<Self> {
        element_count(n, n, 0)?;
        let out = pool.acquire_empty(n, n);
        {
            let mut data = out.write();
            for i in 0..n {
                data[i * n + i] = T::one();
            }
        }
        Ok(out)
    }

    /// Create a matrix with elements drawn uniformly from `[low, high)`
    pub fn random_uniform<R: Rng + ?Sized>(
        pool: &Pool<T>,
        rows: usize,
        cols: usize,
        low: T,
        high: T,
        rng: &mut R,
    ) -> Result<Self> {
        element_count(rows, cols, 0)?;
        let out = pool.acquire(rows, cols);
        let (low, span) = (low.to_f64(), high.to_f64() - low.to_f64());
        for v in out.write().iter_mut() {
            let u: f64 = rng.random();
            *v = T::from_f64(low + span * u);
        }
        Ok(out)
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of elements (rows * cols)
    #[inline]
    pub fn size(&self) -> usize {
        self.rows * self.cols
    }

    /// Shape as [rows, cols]
    #[inline]
    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    /// True for row vectors (1 x n) and column vectors (n x 1)
    #[inline]
    pub fn is_vector(&self) -> bool {
        self.rows == 1 || self.cols == 1
    }

    /// True if rows == cols
    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Whether this matrix aliases another matrix's buffer
    #[inline]
    pub fn is_view(&self) -> bool {
        self.view
    }

    /// Whether this matrix owns a pool-sourced buffer and may be released
    pub fn is_pooled(&self) -> bool {
        !self.view && self.read().is_pooled()
    }

    /// Id of the pool the buffer came from, if any
    pub fn pool_id(&self) -> Option<u64> {
        self.read().pool_id()
    }

    /// Backing capacity of the buffer in elements
    pub fn capacity(&self) -> usize {
        self.read().capacity()
    }

    /// Number of live handles (origin plus views) sharing the buffer
    #[inline]
    pub fn storage_refs(&self) -> usize {
        Arc::strong_count(&self.storage)
    }

    /// The pool results are allocated from
    #[inline]
    pub fn pool(&self) -> &Pool<T> {
        &self.pool
    }

    /// Read access to the buffer.
    ///
    /// Recursive so that an operand aliasing the receiver can be read twice.
    #[inline]
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, PooledBuffer<T>> {
        self.storage.read_recursive()
    }

    #[inline]
    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, PooledBuffer<T>> {
        self.storage.write()
    }

    /// Whether two matrices share one buffer (one is a view of the other)
    #[inline]
    pub fn shares_storage(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.storage, &other.storage)
    }

    /// Reinterpret the buffer with new dimensions, without copying
    ///
    /// The view is never poolable; the buffer returns to the pool once the
    /// origin and every view have been dropped.
    ///
    /// # Errors
    ///
    /// `SizeMismatch` if `rows * cols != self.size()`
    pub fn view(&self, rows: usize, cols: usize) -> Result<Self> {
        if rows.checked_mul(cols) != Some(self.size()) {
            return Err(Error::size_mismatch(self.size(), rows.saturating_mul(cols)));
        }
        Ok(Self {
            rows,
            cols,
            storage: Arc::clone(&self.storage),
            view: true,
            pool: self.pool.clone(),
        })
    }

    /// Change this matrix's dimensions in place, keeping its data
    ///
    /// # Errors
    ///
    /// `SizeMismatch` if `rows * cols != self.size()`
    pub fn reshape(&mut self, rows: usize, cols: usize) -> Result<()> {
        if rows.checked_mul(cols) != Some(self.size()) {
            return Err(Error::size_mismatch(self.size(), rows.saturating_mul(cols)));
        }
        self.rows = rows;
        self.cols = cols;
        Ok(())
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows {
            return Err(Error::IndexOutOfRange {
                index: row,
                size: self.rows,
            });
        }
        if col >= self.cols {
            return Err(Error::IndexOutOfRange {
                index: col,
                size: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    /// Element at (row, col)
    pub fn at(&self, row: usize, col: usize) -> Result<T> {
        let idx = self.index(row, col)?;
        Ok(self.read()[idx])
    }

    /// Set the element at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let idx = self.index(row, col)?;
        self.write()[idx] = value;
        Ok(())
    }

    /// Element at a row-major linear index
    pub fn at_linear(&self, index: usize) -> Result<T> {
        self.read().get(index).copied().ok_or(Error::IndexOutOfRange {
            index,
            size: self.size(),
        })
    }

    /// Set the element at a row-major linear index
    pub fn set_linear(&mut self, index: usize, value: T) -> Result<()> {
        let size = self.size();
        match self.write().get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::IndexOutOfRange { index, size }),
        }
    }

    /// Copy of row `row` as a 1 x cols matrix
    pub fn row(&self, row: usize) -> Result<Self> {
        if row >= self.rows {
            return Err(Error::IndexOutOfRange {
                index: row,
                size: self.rows,
            });
        }
        let out = self.pool.acquire(1, self.cols);
        let start = row * self.cols;
        out.write()
            .copy_from_slice(&self.read()[start..start + self.cols]);
        Ok(out)
    }

    /// Copy of column `col` as a rows x 1 matrix
    pub fn col(&self, col: usize) -> Result<Self> {
        if col >= self.cols {
            return Err(Error::IndexOutOfRange {
                index: col,
                size: self.cols,
            });
        }
        let out = self.pool.acquire(self.rows, 1);
        {
            let src = self.read();
            let mut dst = out.write();
            for (i, v) in dst.iter_mut().enumerate() {
                *v = src[i * self.cols + col];
            }
        }
        Ok(out)
    }

    /// Row-major copy of the elements
    pub fn to_vec(&self) -> Vec<T> {
        self.read().to_vec()
    }

    /// Run `f` over the row-major elements without copying
    pub fn with_data<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.read())
    }

    /// Row-major elements as native-endian bytes, for serializers
    pub fn data_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice::<T, u8>(&self.read()).to_vec()
    }

    /// Overwrite every element from a row-major slice
    ///
    /// # Errors
    ///
    /// `SizeMismatch` if `data.len() != self.size()`
    pub fn set_data(&mut self, data: &[T]) -> Result<()> {
        if data.len() != self.size() {
            return Err(Error::size_mismatch(self.size(), data.len()));
        }
        self.write().copy_from_slice(data);
        Ok(())
    }
}

impl<T: Element> Clone for DenseMatrix<T> {
    /// Deep copy into a fresh buffer from the same pool
    fn clone(&self) -> Self {
        let out = self.pool.acquire(self.rows, self.cols);
        out.write().copy_from_slice(&self.read());
        out
    }
}

impl<T: Element> PartialEq for DenseMatrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && self.read()[..] == other.read()[..]
    }
}

impl<T: Element> std::fmt::Debug for DenseMatrix<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DenseMatrix")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("view", &self.view)
            .field("data", &&self.read()[..])
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> Pool<f64> {
        Pool::new()
    }

    #[test]
    fn test_new_requires_data() {
        let pool = pool();
        assert_eq!(
            DenseMatrix::new(&pool, 2, 2, None).unwrap_err(),
            Error::DataNil
        );
        assert!(matches!(
            DenseMatrix::new(&pool, 2, 2, Some(&[1.0, 2.0, 3.0][..])),
            Err(Error::SizeMismatch {
                expected: 4,
                got: 3
            })
        ));

        let m = DenseMatrix::new(&pool, 2, 2, Some(&[1.0, 2.0, 3.0, 4.0][..])).unwrap();
        assert_eq!(m.shape(), [2, 2]);
        assert_eq!(m.at(1, 0).unwrap(), 3.0);
        assert!(m.is_pooled());
        assert!(!m.is_view());
    }

    #[test]
    fn test_at_set_bounds() {
        let pool = pool();
        let mut m = DenseMatrix::new_empty(&pool, 2, 3).unwrap();
        m.set(1, 2, 5.0).unwrap();
        assert_eq!(m.at(1, 2).unwrap(), 5.0);
        assert_eq!(m.at_linear(5).unwrap(), 5.0);
        assert!(matches!(m.at(2, 0), Err(Error::IndexOutOfRange { index: 2, size: 2 })));
        assert!(matches!(m.set(0, 3, 1.0), Err(Error::IndexOutOfRange { index: 3, size: 3 })));
        assert!(m.set_linear(6, 1.0).is_err());
        assert!(m.at_linear(6).is_err());
    }

    #[test]
    fn test_view_aliases_buffer() {
        let pool = pool();
        let mut m = DenseMatrix::from_slice(&pool, 2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let mut v = m.view(3, 2).unwrap();
        assert!(v.is_view());
        assert!(!v.is_pooled());
        assert!(v.shares_storage(&m));
        assert_eq!(v.at(2, 1).unwrap(), 6.0);

        v.set(0, 1, 20.0).unwrap();
        assert_eq!(m.at(0, 1).unwrap(), 20.0);
        m.set(1, 0, 40.0).unwrap();
        assert_eq!(v.at(1, 1).unwrap(), 40.0);

        assert!(matches!(m.view(4, 2), Err(Error::SizeMismatch { .. })));
    }

    #[test]
    fn test_reshape() {
        let pool = pool();
        let mut m = DenseMatrix::from_slice(&pool, 2, 2, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        m.reshape(4, 1).unwrap();
        assert_eq!(m.shape(), [4, 1]);
        assert_eq!(m.at(3, 0).unwrap(), 4.0);
        assert!(m.reshape(3, 1).is_err());
        assert_eq!(m.shape(), [4, 1]);
    }

    #[test]
    fn test_overflowing_shape_is_rejected() {
        let pool = pool();
        assert!(matches!(
            DenseMatrix::new(&pool, usize::MAX, 2, Some(&[1.0][..])),
            Err(Error::SizeMismatch { expected: usize::MAX, got: 1 })
        ));
        assert!(DenseMatrix::from_vec(&pool, 2, usize::MAX, vec![1.0]).is_err());
        assert!(DenseMatrix::<f64>::new_empty(&pool, usize::MAX, usize::MAX).is_err());
        assert!(DenseMatrix::filled(&pool, usize::MAX, 3, 1.0).is_err());
        assert!(DenseMatrix::<f64>::identity(&pool, usize::MAX).is_err());

        let mut m = DenseMatrix::from_slice(&pool, 1, 2, &[1.0, 2.0]).unwrap();
        assert!(matches!(
            m.view(usize::MAX, 2),
            Err(Error::SizeMismatch { expected: 2, got: usize::MAX })
        ));
        assert!(m.reshape(2, usize::MAX).is_err());
        assert_eq!(m.shape(), [1, 2]);
    }

    #[test]
    fn test_row_col() {
        let pool = pool();
        let m = DenseMatrix::from_slice(&pool, 2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m.row(1).unwrap().to_vec(), vec![4.0, 5.0, 6.0]);
        assert_eq!(m.col(2).unwrap().to_vec(), vec![3.0, 6.0]);
        assert_eq!(m.col(2).unwrap().shape(), [2, 1]);
        assert!(m.row(2).is_err());
        assert!(m.col(3).is_err());
    }

    #[test]
    fn test_clone_is_deep() {
        let pool = pool();
        let m = DenseMatrix::from_slice(&pool, 1, 2, &[1.0, 2.0]).unwrap();
        let mut c = m.clone();
        c.set(0, 0, 9.0).unwrap();
        assert_eq!(m.at(0, 0).unwrap(), 1.0);
        assert!(!c.shares_storage(&m));
    }

    #[test]
    fn test_set_data_and_bytes() {
        let pool = Pool::<f32>::new();
        let mut m = DenseMatrix::new_empty(&pool, 1, 2).unwrap();
        m.set_data(&[1.0, -2.0]).unwrap();
        assert!(matches!(m.set_data(&[1.0]), Err(Error::SizeMismatch { .. })));
        let bytes = m.data_bytes();
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[..4], &1.0f32.to_ne_bytes());
    }

    #[test]
    fn test_identity_and_filled() {
        let pool = pool();
        let eye = DenseMatrix::identity(&pool, 3).unwrap();
        assert_eq!(eye.to_vec(), vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
        let f = DenseMatrix::filled(&pool, 2, 2, 7.0).unwrap();
        assert_eq!(f.to_vec(), vec![7.0; 4]);
    }

    #[test]
    fn test_random_uniform_range() {
        use rand::SeedableRng;
        let pool = pool();
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let m = DenseMatrix::random_uniform(&pool, 10, 10, -2.0, 3.0, &mut rng).unwrap();
        assert!(m.to_vec().iter().all(|&v| (-2.0..3.0).contains(&v)));
    }
}
