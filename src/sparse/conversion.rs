//! Conversions between CSR, dense matrices, slices and coordinate lists

use super::core::{CsrBuilder, SparseMatrix};
use crate::dense::{DenseMatrix, element_count};
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::pool::Pool;
use rand::Rng;

/// Compress a row-major slice, skipping zeros
fn compress<T: Element>(pool: &Pool<T>, rows: usize, cols: usize, data: &[T]) -> SparseMatrix<T> {
    let nnz = data.iter().filter(|&&v| v != T::zero()).count();
    let mut out = CsrBuilder::with_capacity(rows, nnz);
    if cols > 0 {
        for row in data.chunks_exact(cols) {
            for (col, &v) in row.iter().enumerate() {
                out.push(col, v);
            }
            out.finish_row();
        }
    } else {
        for _ in 0..rows {
            out.finish_row();
        }
    }
    out.build(pool, rows, cols)
}

impl<T: Element> SparseMatrix<T> {
    /// Build a CSR matrix from a row-major dense slice
    ///
    /// # Errors
    ///
    /// `SizeMismatch` if `data.len() != rows * cols`
    pub fn from_slice(pool: &Pool<T>, rows: usize, cols: usize, data: &[T]) -> Result<Self> {
        let len = element_count(rows, cols, data.len())?;
        if data.len() != len {
            return Err(Error::size_mismatch(len, data.len()));
        }
        Ok(compress(pool, rows, cols, data))
    }

    /// Build a CSR matrix holding the non-zeros of a dense matrix
    pub fn from_dense(dense: &DenseMatrix<T>) -> Self {
        dense.with_data(|data| compress(dense.pool(), dense.rows(), dense.cols(), data))
    }

    /// Build a CSR matrix from (row, col, value) triplets in any order
    ///
    /// A later triplet for the same position overwrites an earlier one, and
    /// zero values are not stored.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if any row or column index is outside the shape
    pub fn from_coords<I>(pool: &Pool<T>, rows: usize, cols: usize, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, T)>,
    {
        let mut entries: Vec<(usize, usize, T)> = entries.into_iter().collect();
        for &(r, c, _) in &entries {
            if r >= rows {
                return Err(Error::IndexOutOfRange { index: r, size: rows });
            }
            if c >= cols {
                return Err(Error::IndexOutOfRange { index: c, size: cols });
            }
        }

        // Stable, so duplicates stay in insertion order and the last one wins
        entries.sort_by_key(|&(r, c, _)| (r, c));
        entries.dedup_by(|later, earlier| {
            if (later.0, later.1) == (earlier.0, earlier.1) {
                earlier.2 = later.2;
                true
            } else {
                false
            }
        });

        let mut out = CsrBuilder::with_capacity(rows, entries.len());
        let mut next = entries.iter().peekable();
        for row in 0..rows {
            while let Some(&(_, c, v)) = next.next_if(|e| e.0 == row) {
                out.push(c, v);
            }
            out.finish_row();
        }
        Ok(out.build(pool, rows, cols))
    }

    /// Random sparse matrix
    ///
    /// Each position is stored with probability `density`, holding a value
    /// drawn uniformly from `[-1, 1)`.
    pub fn random<R: Rng + ?Sized>(
        pool: &Pool<T>,
        rows: usize,
        cols: usize,
        density: f64,
        rng: &mut R,
    ) -> Self {
        let density = density.clamp(0.0, 1.0);
        let expected = rows as f64 * cols as f64 * density;
        let mut out = CsrBuilder::with_capacity(rows, expected as usize);
        for _ in 0..rows {
            for col in 0..cols {
                if rng.random::<f64>() < density {
                    let v: f64 = rng.random_range(-1.0..1.0);
                    out.push(col, T::from_f64(v));
                }
            }
            out.finish_row();
        }
        out.build(pool, rows, cols)
    }

    /// Expand into a dense matrix acquired from the pool
    pub fn to_dense(&self) -> DenseMatrix<T> {
        let out = self.pool.acquire_empty(self.rows, self.cols);
        {
            let mut data = out.write();
            for (row, col, v) in self.iter() {
                data[row * self.cols + col] = v;
            }
        }
        out
    }

    /// Row-major dense copy of all elements, zeros included
    pub fn to_vec(&self) -> Vec<T> {
        let mut data = vec![T::zero(); self.size()];
        for (row, col, v) in self.iter() {
            data[row * self.cols + col] = v;
        }
        data
    }

    /// Replace the whole contents from a row-major dense slice
    ///
    /// # Errors
    ///
    /// `SizeMismatch` if `data.len() != rows * cols`
    pub fn set_data(&mut self, data: &[T]) -> Result<()> {
        *self = Self::from_slice(&self.pool, self.rows, self.cols, data)?;
        Ok(())
    }
}
