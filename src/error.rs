//! Error types for matx

use thiserror::Error;

/// Result type alias using matx's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in matx operations
///
/// Every operation validates its inputs before writing anything, so an `Err`
/// always leaves the receiver untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Operand shapes are incompatible for the requested operation
    #[error("Dimension mismatch in '{op}': {lhs:?} vs {rhs:?}")]
    DimensionMismatch {
        /// The operation name
        op: &'static str,
        /// Receiver shape [rows, cols]
        lhs: [usize; 2],
        /// Operand shape [rows, cols]
        rhs: [usize; 2],
    },

    /// Row, column or linear index outside the matrix bounds
    #[error("Index {index} out of range for dimension of size {size}")]
    IndexOutOfRange {
        /// The invalid index
        index: usize,
        /// Size of the indexed dimension
        size: usize,
    },

    /// Raw data length does not equal rows * cols
    #[error("Size mismatch: expected {expected} elements, got {got}")]
    SizeMismatch {
        /// Expected number of elements
        expected: usize,
        /// Supplied number of elements
        got: usize,
    },

    /// Explicit-data constructor called without data
    #[error("No data supplied; use the empty constructor instead")]
    DataNil,

    /// Operation requires a square matrix
    #[error("Operation requires a square matrix, got {rows}x{cols}")]
    NonSquareMatrix {
        /// Row count
        rows: usize,
        /// Column count
        cols: usize,
    },

    /// Operation is not meaningful or not implemented for this representation
    #[error("Unsupported operation '{op}' for {format} matrix")]
    UnsupportedOperation {
        /// The operation name
        op: &'static str,
        /// Representation name ("dense" or "sparse")
        format: &'static str,
    },

    /// CSR arrays violate the compressed-row invariants
    #[error("Invalid sparse structure: {reason}")]
    InvalidSparseStructure {
        /// Which invariant was violated
        reason: &'static str,
    },

    /// Matrix cannot be returned to the pool
    #[error("Invalid release: {reason}")]
    InvalidRelease {
        /// Why the release was rejected
        reason: &'static str,
    },
}

impl Error {
    /// Create a dimension mismatch error
    pub fn dimension_mismatch(op: &'static str, lhs: [usize; 2], rhs: [usize; 2]) -> Self {
        Self::DimensionMismatch { op, lhs, rhs }
    }

    /// Create an unsupported operation error
    pub fn unsupported(op: &'static str, format: &'static str) -> Self {
        Self::UnsupportedOperation { op, format }
    }

    /// Create a size mismatch error
    pub fn size_mismatch(expected: usize, got: usize) -> Self {
        Self::SizeMismatch { expected, got }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::dimension_mismatch("add", [2, 3], [3, 2]);
        assert_eq!(
            err.to_string(),
            "Dimension mismatch in 'add': [2, 3] vs [3, 2]"
        );

        let err = Error::unsupported("set", "sparse");
        assert_eq!(err.to_string(), "Unsupported operation 'set' for sparse matrix");

        let err = Error::size_mismatch(6, 5);
        assert_eq!(err.to_string(), "Size mismatch: expected 6 elements, got 5");
    }
}
