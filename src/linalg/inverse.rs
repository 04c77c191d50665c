//! Matrix inversion through the LU factors

use super::lu::lu_factor;
use super::validate_square;
use crate::dense::DenseMatrix;
use crate::dtype::Element;
use crate::error::Result;
use crate::sparse::SparseMatrix;

/// Solve A x = e_b for every column b, given P A = L U
///
/// Column b of P is the unit vector at row i where perm[i] == b. A zero on
/// U's diagonal divides by zero, so a singular input yields non-finite values.
fn invert<T: Element>(a: &[T], n: usize) -> Vec<T> {
    let factors = lu_factor(a, n);
    let (l, u) = (&factors.l, &factors.u);
    let mut inv = vec![T::zero(); n * n];
    let mut y = vec![T::zero(); n];

    for b in 0..n {
        // Forward substitution: L y = P[:, b], L has a unit diagonal
        for i in 0..n {
            let rhs = if factors.perm[i] == b { T::one() } else { T::zero() };
            let sum = (0..i).fold(T::zero(), |acc, k| acc + l[i * n + k] * y[k]);
            y[i] = rhs - sum;
        }

        // Back substitution: U x = y, written straight into column b
        for i in (0..n).rev() {
            let sum = ((i + 1)..n).fold(T::zero(), |acc, k| acc + u[i * n + k] * inv[k * n + b]);
            inv[i * n + b] = (y[i] - sum) / u[i * n + i];
        }
    }

    inv
}

impl<T: Element> DenseMatrix<T> {
    /// Matrix inverse via LU decomposition
    ///
    /// Singular inputs are not detected; they produce infinities or NaNs.
    ///
    /// # Errors
    ///
    /// `NonSquareMatrix` if the receiver is not square
    pub fn inverse(&self) -> Result<Self> {
        let n = validate_square(self.shape())?;
        let inv = self.with_data(|a| invert(a, n));
        let out = self.pool().acquire(n, n);
        out.write().copy_from_slice(&inv);
        Ok(out)
    }
}

impl<T: Element> SparseMatrix<T> {
    /// Inverse of the dense expansion, returned dense
    pub fn inverse(&self) -> Result<DenseMatrix<T>> {
        validate_square(self.shape())?;
        self.to_dense().inverse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Pool;

    #[test]
    fn test_inverse_2x2() {
        let pool = Pool::<f64>::new();
        let a = DenseMatrix::from_slice(&pool, 2, 2, &[4.0, 7.0, 2.0, 6.0]).unwrap();
        let inv = a.inverse().unwrap();
        let expected = [0.6, -0.7, -0.2, 0.4];
        for (got, want) in inv.to_vec().iter().zip(expected) {
            assert!((got - want).abs() < 1e-12, "{got} vs {want}");
        }
    }

    #[test]
    fn test_inverse_with_pivoting() {
        let pool = Pool::<f64>::new();
        let a = DenseMatrix::from_slice(
            &pool,
            3,
            3,
            &[0.0, 2.0, 1.0, 1.0, 0.0, 0.0, 3.0, 0.0, 1.0],
        )
        .unwrap();
        let product = a.mul(&a.inverse().unwrap()).unwrap();
        let identity = DenseMatrix::identity(&pool, 3).unwrap();
        for (got, want) in product.to_vec().iter().zip(identity.to_vec()) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    fn test_singular_gives_non_finite() {
        let pool = Pool::<f64>::new();
        let a = DenseMatrix::from_slice(&pool, 2, 2, &[1.0, 2.0, 2.0, 4.0]).unwrap();
        let inv = a.inverse().unwrap();
        assert!(inv.to_vec().iter().any(|v| !v.is_finite()));
    }

    #[test]
    fn test_sparse_inverse() {
        let pool = Pool::<f64>::new();
        let s = SparseMatrix::from_slice(&pool, 2, 2, &[2.0, 0.0, 0.0, 4.0]).unwrap();
        assert_eq!(s.inverse().unwrap().to_vec(), vec![0.5, 0.0, 0.0, 0.25]);
        assert!(SparseMatrix::<f64>::empty(&pool, 1, 2).inverse().is_err());
    }
}
