//! Products involving CSR matrices
//!
//! All products are returned dense: the product of two sparse matrices is
//! generally much denser than either factor.

use super::core::SparseMatrix;
use crate::dense::DenseMatrix;
#[cfg(feature = "rayon")]
use crate::dense::PARALLEL_THRESHOLD;
use crate::dtype::Element;
use crate::error::{Error, Result};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// c_row += A[row, :] @ B for a dense row-major B with `n` columns
#[inline]
fn spmm_row<T: Element>(a: &SparseMatrix<T>, row: usize, b: &[T], c_row: &mut [T], n: usize) {
    for idx in a.row_range(row) {
        let (p, aip) = (a.col_indices[idx], a.values[idx]);
        let b_row = &b[p * n..(p + 1) * n];
        for (c, &bpj) in c_row.iter_mut().zip(b_row) {
            *c = *c + aip * bpj;
        }
    }
}

/// C = A @ B for sparse A and dense B, C zero-initialised
fn spmm<T: Element>(a: &SparseMatrix<T>, b: &[T], c: &mut [T], n: usize) {
    #[cfg(feature = "rayon")]
    {
        if a.rows > 1 && a.nnz() * n >= PARALLEL_THRESHOLD {
            c.par_chunks_mut(n)
                .enumerate()
                .for_each(|(row, c_row)| spmm_row(a, row, b, c_row, n));
            return;
        }
    }

    for (row, c_row) in c.chunks_mut(n).enumerate() {
        spmm_row(a, row, b, c_row, n);
    }
}

impl<T: Element> SparseMatrix<T> {
    /// Sparse-sparse product, returned dense
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if `self.cols() != other.rows()`
    pub fn mul(&self, other: &Self) -> Result<DenseMatrix<T>> {
        if self.cols != other.rows {
            return Err(Error::dimension_mismatch("mul", self.shape(), other.shape()));
        }
        let n = other.cols;
        let out = self.pool.acquire_empty(self.rows, n);
        if n == 0 {
            return Ok(out);
        }
        {
            let mut c = out.write();
            for (row, c_row) in c.chunks_exact_mut(n).enumerate() {
                for idx in self.row_range(row) {
                    let (p, aip) = (self.col_indices[idx], self.values[idx]);
                    for jdx in other.row_range(p) {
                        let j = other.col_indices[jdx];
                        c_row[j] = c_row[j] + aip * other.values[jdx];
                    }
                }
            }
        }
        Ok(out)
    }

    /// Sparse-dense product, returned dense
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if `self.cols() != other.rows()`
    pub fn mul_dense(&self, other: &DenseMatrix<T>) -> Result<DenseMatrix<T>> {
        if self.cols != other.rows() {
            return Err(Error::dimension_mismatch("mul", self.shape(), other.shape()));
        }
        let n = other.cols();
        let out = self.pool.acquire_empty(self.rows, n);
        if n == 0 || self.rows == 0 {
            return Ok(out);
        }
        spmm(self, &other.read(), &mut out.write(), n);
        Ok(out)
    }

    /// Transposed-operand product Aᵀ @ x for a single-column dense `x`
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if `self.rows() != x.rows()` or `x` has more than
    /// one column
    pub fn mul_t(&self, x: &DenseMatrix<T>) -> Result<DenseMatrix<T>> {
        if self.rows != x.rows() || x.cols() != 1 {
            return Err(Error::dimension_mismatch("mul_t", self.shape(), x.shape()));
        }
        let out = self.pool.acquire_empty(self.cols, 1);
        {
            let xs = x.read();
            let mut y = out.write();
            for (row, &xi) in xs.iter().enumerate() {
                for idx in self.row_range(row) {
                    let j = self.col_indices[idx];
                    y[j] = y[j] + self.values[idx] * xi;
                }
            }
        }
        Ok(out)
    }
}

impl<T: Element> DenseMatrix<T> {
    /// Dense-sparse product, returned dense
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if `self.cols() != other.rows()`
    pub fn mul_sparse(&self, other: &SparseMatrix<T>) -> Result<DenseMatrix<T>> {
        if self.cols() != other.rows {
            return Err(Error::dimension_mismatch("mul", self.shape(), other.shape()));
        }
        let (k, n) = (self.cols(), other.cols);
        let out = self.pool().acquire_empty(self.rows(), n);
        if n == 0 || k == 0 {
            return Ok(out);
        }
        {
            let a = self.read();
            let mut c = out.write();
            for (a_row, c_row) in a.chunks_exact(k).zip(c.chunks_exact_mut(n)) {
                for (p, &aip) in a_row.iter().enumerate() {
                    if aip == T::zero() {
                        continue;
                    }
                    for idx in other.row_range(p) {
                        let j = other.col_indices[idx];
                        c_row[j] = c_row[j] + aip * other.values[idx];
                    }
                }
            }
        }
        Ok(out)
    }
}
