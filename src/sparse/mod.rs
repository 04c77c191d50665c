//! Sparse matrices in CSR (Compressed Sparse Row) format
//!
//! ```text
//! Matrix:          CSR:
//! [1, 0, 2]        row_ptrs:    [0, 2, 3, 5]
//! [0, 0, 3]   →    col_indices: [0, 2, 2, 0, 1]
//! [4, 5, 0]        values:      [1, 2, 3, 4, 5]
//! ```
//!
//! Row `i` occupies `col_indices[row_ptrs[i]..row_ptrs[i + 1]]`, sorted by
//! column. Zeros are never stored: every operation that could produce one
//! drops it from the result.
//!
//! Operations that would have to densify every position (adding a scalar,
//! single-element writes, views) either return a [`DenseMatrix`](crate::dense::DenseMatrix)
//! or fail with [`Error::UnsupportedOperation`](crate::error::Error::UnsupportedOperation).

mod conversion;
mod core;
mod elementwise;
mod matmul;
mod merge;
mod mixed;
mod transpose;

pub use core::SparseMatrix;
