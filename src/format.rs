//! Stable string rendering for dense and sparse matrices
//!
//! ```text
//! Dense 2x3 [f64]
//! [1.0000, 0.0000, 2.0000]
//! [0.0000, 3.0000, 0.0000]
//! ```
//!
//! Sparse matrices render the same way with `nnz=<count>` appended to the
//! header, implicit zeros included. The formatter's precision overrides the
//! default of four decimals.

use crate::dense::DenseMatrix;
use crate::dtype::Element;
use crate::matrix::Matrix;
use crate::sparse::SparseMatrix;
use std::fmt;

const DEFAULT_PRECISION: usize = 4;

fn write_rows<T: Element>(
    f: &mut fmt::Formatter<'_>,
    data: &[T],
    rows: usize,
    cols: usize,
) -> fmt::Result {
    let precision = f.precision().unwrap_or(DEFAULT_PRECISION);
    for row in 0..rows {
        f.write_str("\n[")?;
        for (j, v) in data[row * cols..(row + 1) * cols].iter().enumerate() {
            if j > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:.*}", precision, v)?;
        }
        f.write_str("]")?;
    }
    Ok(())
}

impl<T: Element> fmt::Display for DenseMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dense {}x{} [{}]", self.rows(), self.cols(), T::DTYPE)?;
        self.with_data(|data| write_rows(f, data, self.rows(), self.cols()))
    }
}

impl<T: Element> fmt::Display for SparseMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sparse {}x{} [{}] nnz={}",
            self.rows(),
            self.cols(),
            T::DTYPE,
            self.nnz()
        )?;
        write_rows(f, &self.to_vec(), self.rows(), self.cols())
    }
}

impl<T: Element> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matrix::Dense(d) => fmt::Display::fmt(d, f),
            Matrix::Sparse(s) => fmt::Display::fmt(s, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Pool;

    #[test]
    fn test_dense_display() {
        let pool = Pool::<f64>::new();
        let m = DenseMatrix::from_slice(&pool, 2, 2, &[1.0, -0.5, 0.0, 2.125]).unwrap();
        assert_eq!(
            m.to_string(),
            "Dense 2x2 [f64]\n[1.0000, -0.5000]\n[0.0000, 2.1250]"
        );
        assert_eq!(format!("{:.1}", m), "Dense 2x2 [f64]\n[1.0, -0.5]\n[0.0, 2.1]");
    }

    #[test]
    fn test_sparse_display() {
        let pool = Pool::<f32>::new();
        let s = SparseMatrix::from_slice(&pool, 1, 3, &[0.0, 3.0, 0.0]).unwrap();
        assert_eq!(s.to_string(), "Sparse 1x3 [f32] nnz=1\n[0.0000, 3.0000, 0.0000]");
        let m: Matrix<f32> = s.into();
        assert!(m.to_string().starts_with("Sparse 1x3"));
    }

    #[test]
    fn test_empty_display() {
        let pool = Pool::<f64>::new();
        let m = DenseMatrix::<f64>::new_empty(&pool, 0, 3).unwrap();
        assert_eq!(m.to_string(), "Dense 0x3 [f64]");
    }
}
