//! Elementwise operations between a dense and a sparse operand
//!
//! Mixed operands must have identical shapes. Sums and differences come out
//! dense; products and sparse-by-dense quotients keep the sparse structure.

use super::core::{CsrBuilder, SparseMatrix};
use crate::dense::DenseMatrix;
use crate::dtype::Element;
use crate::error::{Error, Result};

fn check_shapes(op: &'static str, lhs: [usize; 2], rhs: [usize; 2]) -> Result<()> {
    if lhs != rhs {
        return Err(Error::dimension_mismatch(op, lhs, rhs));
    }
    Ok(())
}

/// dense[i, j] = f(dense[i, j], s) for every stored entry s of `sparse`
fn scatter<T: Element>(dense: &mut [T], sparse: &SparseMatrix<T>, f: impl Fn(T, T) -> T) {
    for (row, col, v) in sparse.iter() {
        let idx = row * sparse.cols + col;
        dense[idx] = f(dense[idx], v);
    }
}

/// Sparse result over `sparse`'s stored positions: f(s, dense[i, j])
fn gather<T: Element>(
    sparse: &SparseMatrix<T>,
    dense: &[T],
    f: impl Fn(T, T) -> T,
) -> SparseMatrix<T> {
    let mut out = CsrBuilder::with_capacity(sparse.rows, sparse.nnz());
    for row in 0..sparse.rows {
        for idx in sparse.row_range(row) {
            let col = sparse.col_indices[idx];
            out.push(col, f(sparse.values[idx], dense[row * sparse.cols + col]));
        }
        out.finish_row();
    }
    out.build(&sparse.pool, sparse.rows, sparse.cols)
}

/// dense[i, j] = f(dense[i, j], sparse[i, j]) for every position, zeros included
fn zip_all<T: Element>(dense: &mut [T], sparse: &SparseMatrix<T>, f: impl Fn(T, T) -> T) {
    if sparse.cols == 0 {
        return;
    }
    for (row, d_row) in dense.chunks_exact_mut(sparse.cols).enumerate() {
        let mut stored = sparse.row_range(row).peekable();
        for (col, d) in d_row.iter_mut().enumerate() {
            let s = match stored.next_if(|&idx| sparse.col_indices[idx] == col) {
                Some(idx) => sparse.values[idx],
                None => T::zero(),
            };
            *d = f(*d, s);
        }
    }
}

impl<T: Element> DenseMatrix<T> {
    /// Dense + sparse, returned dense
    pub fn add_sparse(&self, other: &SparseMatrix<T>) -> Result<Self> {
        check_shapes("add", self.shape(), other.shape())?;
        let out = self.clone();
        scatter(&mut out.write(), other, |a, b| a + b);
        Ok(out)
    }

    /// Dense - sparse, returned dense
    pub fn sub_sparse(&self, other: &SparseMatrix<T>) -> Result<Self> {
        check_shapes("sub", self.shape(), other.shape())?;
        let out = self.clone();
        scatter(&mut out.write(), other, |a, b| a - b);
        Ok(out)
    }

    /// Dense ⊙ sparse, returned sparse
    pub fn prod_sparse(&self, other: &SparseMatrix<T>) -> Result<SparseMatrix<T>> {
        check_shapes("prod", self.shape(), other.shape())?;
        Ok(gather(other, &self.read(), |s, d| d * s))
    }

    /// Dense / sparse, returned dense; positions where the divisor is an
    /// implicit zero divide by zero
    pub fn div_sparse(&self, other: &SparseMatrix<T>) -> Result<Self> {
        check_shapes("div", self.shape(), other.shape())?;
        let out = self.clone();
        zip_all(&mut out.write(), other, |a, b| a / b);
        Ok(out)
    }

    /// In-place form of [`add_sparse`](Self::add_sparse)
    pub fn add_sparse_in_place(&mut self, other: &SparseMatrix<T>) -> Result<()> {
        check_shapes("add", self.shape(), other.shape())?;
        scatter(&mut self.write(), other, |a, b| a + b);
        Ok(())
    }

    /// In-place form of [`sub_sparse`](Self::sub_sparse)
    pub fn sub_sparse_in_place(&mut self, other: &SparseMatrix<T>) -> Result<()> {
        check_shapes("sub", self.shape(), other.shape())?;
        scatter(&mut self.write(), other, |a, b| a - b);
        Ok(())
    }

    /// Elementwise product with a sparse operand, keeping the dense storage
    pub fn prod_sparse_in_place(&mut self, other: &SparseMatrix<T>) -> Result<()> {
        check_shapes("prod", self.shape(), other.shape())?;
        zip_all(&mut self.write(), other, |a, b| a * b);
        Ok(())
    }

    /// In-place form of [`div_sparse`](Self::div_sparse)
    pub fn div_sparse_in_place(&mut self, other: &SparseMatrix<T>) -> Result<()> {
        check_shapes("div", self.shape(), other.shape())?;
        zip_all(&mut self.write(), other, |a, b| a / b);
        Ok(())
    }
}

impl<T: Element> SparseMatrix<T> {
    /// Sparse + dense, returned dense
    pub fn add_dense(&self, other: &DenseMatrix<T>) -> Result<DenseMatrix<T>> {
        check_shapes("add", self.shape(), other.shape())?;
        let out = other.clone();
        scatter(&mut out.write(), self, |d, s| s + d);
        Ok(out)
    }

    /// Sparse - dense, returned dense
    pub fn sub_dense(&self, other: &DenseMatrix<T>) -> Result<DenseMatrix<T>> {
        check_shapes("sub", self.shape(), other.shape())?;
        let out = other.clone();
        {
            let mut data = out.write();
            data.iter_mut().for_each(|v| *v = -*v);
            scatter(&mut data, self, |d, s| d + s);
        }
        Ok(out)
    }

    /// Sparse ⊙ dense, returned sparse
    pub fn prod_dense(&self, other: &DenseMatrix<T>) -> Result<Self> {
        check_shapes("prod", self.shape(), other.shape())?;
        Ok(gather(self, &other.read(), |s, d| s * d))
    }

    /// Sparse / dense over the stored entries, returned sparse
    pub fn div_dense(&self, other: &DenseMatrix<T>) -> Result<Self> {
        check_shapes("div", self.shape(), other.shape())?;
        Ok(gather(self, &other.read(), |s, d| s / d))
    }

    /// In-place form of [`prod_dense`](Self::prod_dense)
    pub fn prod_dense_in_place(&mut self, other: &DenseMatrix<T>) -> Result<()> {
        *self = self.prod_dense(other)?;
        Ok(())
    }
}
