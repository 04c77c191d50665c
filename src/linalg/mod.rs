//! Square-matrix algorithms shared by both representations
//!
//! Everything here works on row-major dense data; sparse inputs are expanded
//! with [`SparseMatrix::to_dense`](crate::sparse::SparseMatrix::to_dense) first.
//!
//! - `lu`: LU decomposition with partial pivoting (Doolittle) and determinant
//! - `inverse`: inversion by forward and back substitution over the LU factors
//! - `pivot`: permutation and augmented-matrix helpers

mod inverse;
mod lu;
mod pivot;

pub use lu::LuDecomposition;

use crate::error::{Error, Result};

/// Validate that a shape is square, returning its order
#[inline]
pub(crate) fn validate_square(shape: [usize; 2]) -> Result<usize> {
    let [rows, cols] = shape;
    if rows != cols {
        return Err(Error::NonSquareMatrix { rows, cols });
    }
    Ok(rows)
}
