//! Dense matrix multiplication: general product, matrix-vector, transposed operand
//!
//! The general kernel walks `i -> p -> j` so that both the right operand and
//! the output are read row by row, which keeps the inner loop contiguous.
//! With the `rayon` feature, products above [`PARALLEL_THRESHOLD`] multiply-adds
//! are split across threads by output row.

use super::DenseMatrix;
use crate::dtype::Element;
use crate::error::{Error, Result};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Multiply-add count (m * n * k) above which the general kernel runs in parallel
pub const PARALLEL_THRESHOLD: usize = 1 << 18;

/// y = A @ x for a row-major m x k matrix and a length-k vector
#[inline]
fn matvec<T: Element>(a: &[T], x: &[T], y: &mut [T], k: usize) {
    for (yi, a_row) in y.iter_mut().zip(a.chunks_exact(k)) {
        *yi = a_row
            .iter()
            .zip(x)
            .fold(T::zero(), |acc, (&aij, &xj)| acc + aij * xj);
    }
}

/// c_row += a_row @ B for one output row
#[inline]
fn gemm_row<T: Element>(a_row: &[T], b: &[T], c_row: &mut [T], n: usize) {
    for (&aip, b_row) in a_row.iter().zip(b.chunks_exact(n)) {
        for (c, &bpj) in c_row.iter_mut().zip(b_row) {
            *c = *c + aip * bpj;
        }
    }
}

/// C = A @ B, C zero-initialised, all dimensions non-zero
fn gemm<T: Element>(a: &[T], b: &[T], c: &mut [T], m: usize, n: usize, k: usize) {
    #[cfg(feature = "rayon")]
    {
        if m > 1 && m * n * k >= PARALLEL_THRESHOLD {
            c.par_chunks_mut(n)
                .zip(a.par_chunks(k))
                .for_each(|(c_row, a_row)| gemm_row(a_row, b, c_row, n));
            return;
        }
    }

    for (c_row, a_row) in c.chunks_mut(n).zip(a.chunks(k)).take(m) {
        gemm_row(a_row, b, c_row, n);
    }
}

impl<T: Element> DenseMatrix<T> {
    /// Matrix multiplication: C = A @ B
    ///
    /// A single-column right operand takes the matrix-vector path.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if `self.cols() != other.rows()`
    pub fn mul(&self, other: &Self) -> Result<Self> {
        if self.cols != other.rows {
            return Err(Error::dimension_mismatch("mul", self.shape(), other.shape()));
        }
        let (m, k, n) = (self.rows, self.cols, other.cols);
        let out = self.pool.acquire_empty(m, n);
        if m == 0 || n == 0 || k == 0 {
            return Ok(out);
        }
        {
            let a = self.read();
            let b = other.read();
            let mut c = out.write();
            if n == 1 {
                matvec(&a, &b, &mut c, k);
            } else {
                gemm(&a, &b, &mut c, m, n, k);
            }
        }
        Ok(out)
    }

    /// Transposed-operand product: C = Aᵀ @ x, without materialising Aᵀ
    ///
    /// Only a single-column right operand is supported.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if `self.rows() != other.rows()` or `other` has
    /// more than one column
    pub fn mul_t(&self, other: &Self) -> Result<Self> {
        if self.rows != other.rows || other.cols != 1 {
            return Err(Error::dimension_mismatch("mul_t", self.shape(), other.shape()));
        }
        let out = self.pool.acquire_empty(self.cols, 1);
        if self.cols == 0 {
            return Ok(out);
        }
        {
            let a = self.read();
            let x = other.read();
            let mut y = out.write();
            for (a_row, &xi) in a.chunks_exact(self.cols).zip(x.iter()) {
                for (yj, &aij) in y.iter_mut().zip(a_row) {
                    *yj = *yj + aij * xi;
                }
            }
        }
        Ok(out)
    }
}
