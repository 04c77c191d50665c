//! # matx
//!
//! **Dense and sparse matrices backed by a size-classed buffer pool.**
//!
//! matx is the numeric core of a machine-learning stack: row-major dense
//! matrices with aliasing views, CSR sparse matrices with merge-join
//! arithmetic, and the linear algebra both share (LU with partial pivoting,
//! inversion). Dense buffers come from a [`Pool`](pool::Pool) that recycles
//! allocations by size class, so the intermediate results of a training
//! step do not each hit the allocator.
//!
//! ## Features
//!
//! - **Dense**: elementwise arithmetic with vector broadcasting, scalar ops,
//!   matrix and matrix-vector products, transpose, views, reductions
//! - **Sparse**: CSR storage, merge-join elementwise ops with zero
//!   suppression, counting-sort transpose, sparse-dense interop
//! - **Pool**: per-size-class free lists, RAII buffer return, statistics
//! - **Linear algebra**: LU decomposition, determinant, inverse
//! - **Element types**: f32, f64
//!
//! ## Quick Start
//!
//! ```rust
//! use matx::prelude::*;
//!
//! # fn main() -> matx::error::Result<()> {
//! let pool = Pool::<f64>::new();
//! let a = DenseMatrix::from_slice(&pool, 2, 2, &[1.0, 2.0, 3.0, 4.0])?;
//! let b = DenseMatrix::from_slice(&pool, 2, 2, &[5.0, 6.0, 7.0, 8.0])?;
//!
//! let c = a.add(&b)?;
//! let d = a.mul(&b)?;
//! assert_eq!(c.to_vec(), vec![6.0, 8.0, 10.0, 12.0]);
//! assert_eq!(d.to_vec(), vec![19.0, 22.0, 43.0, 50.0]);
//!
//! let s = SparseMatrix::from_dense(&a.prod_scalar(0.0));
//! assert_eq!(s.nnz(), 0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): multi-threaded dense and sparse-dense products

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dense;
pub mod dtype;
pub mod error;
mod format;
pub mod linalg;
pub mod matrix;
pub mod pool;
pub mod sparse;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dense::DenseMatrix;
    pub use crate::dtype::{DType, Element};
    pub use crate::error::{Error, Result};
    pub use crate::linalg::LuDecomposition;
    pub use crate::matrix::Matrix;
    pub use crate::pool::{Pool, PoolConfig, PoolStats};
    pub use crate::sparse::SparseMatrix;
}
