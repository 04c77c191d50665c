//! The matrix capability set over both representations
//!
//! [`Matrix`] wraps either a [`DenseMatrix`] or a [`SparseMatrix`] and
//! dispatches every operation on the pair of variants involved. Result
//! representations follow these rules:
//!
//! | operation            | dense, dense | dense, sparse | sparse, dense | sparse, sparse |
//! |----------------------|--------------|---------------|---------------|----------------|
//! | add, sub             | dense        | dense         | dense         | sparse         |
//! | prod                 | dense        | sparse        | sparse        | sparse         |
//! | div                  | dense        | dense         | sparse        | sparse         |
//! | maximum, minimum     | dense        | dense         | dense         | sparse         |
//! | mul, mul_t           | dense        | dense         | dense         | dense          |
//!
//! In-place operations never change the receiver's representation; where
//! that is impossible they fail with `UnsupportedOperation`.

use crate::dense::DenseMatrix;
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::linalg::LuDecomposition;
use crate::sparse::SparseMatrix;

/// A dense or sparse matrix
#[derive(Debug, Clone, PartialEq)]
pub enum Matrix<T: Element> {
    /// Row-major dense storage
    Dense(DenseMatrix<T>),
    /// Compressed sparse row storage
    Sparse(SparseMatrix<T>),
}

impl<T: Element> From<DenseMatrix<T>> for Matrix<T> {
    fn from(m: DenseMatrix<T>) -> Self {
        Self::Dense(m)
    }
}

impl<T: Element> From<SparseMatrix<T>> for Matrix<T> {
    fn from(m: SparseMatrix<T>) -> Self {
        Self::Sparse(m)
    }
}

/// Dispatch a read-only call to whichever variant is present
macro_rules! either {
    ($self:expr, $m:ident => $body:expr) => {
        match $self {
            Matrix::Dense($m) => $body,
            Matrix::Sparse($m) => $body,
        }
    };
}

impl<T: Element> Matrix<T> {
    /// Number of rows
    pub fn rows(&self) -> usize {
        either!(self, m => m.rows())
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        either!(self, m => m.cols())
    }

    /// rows * cols
    pub fn size(&self) -> usize {
        either!(self, m => m.size())
    }

    /// Shape as [rows, cols]
    pub fn shape(&self) -> [usize; 2] {
        either!(self, m => m.shape())
    }

    /// Whether this is the dense variant
    pub fn is_dense(&self) -> bool {
        matches!(self, Self::Dense(_))
    }

    /// Whether this is the sparse variant
    pub fn is_sparse(&self) -> bool {
        matches!(self, Self::Sparse(_))
    }

    /// Borrow the dense variant
    pub fn as_dense(&self) -> Option<&DenseMatrix<T>> {
        match self {
            Self::Dense(d) => Some(d),
            Self::Sparse(_) => None,
        }
    }

    /// Borrow the sparse variant
    pub fn as_sparse(&self) -> Option<&SparseMatrix<T>> {
        match self {
            Self::Sparse(s) => Some(s),
            Self::Dense(_) => None,
        }
    }

    /// Element at (row, col)
    pub fn at(&self, row: usize, col: usize) -> Result<T> {
        either!(self, m => m.at(row, col))
    }

    /// Set the element at (row, col); unsupported for sparse
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        either!(self, m => m.set(row, col, value))
    }

    /// Aliasing view with new dimensions; unsupported for sparse
    pub fn view(&self, rows: usize, cols: usize) -> Result<Self> {
        match self {
            Self::Dense(d) => d.view(rows, cols).map(Self::Dense),
            Self::Sparse(s) => s.view(rows, cols).map(Self::Sparse),
        }
    }

    /// Change dimensions in place; unsupported for sparse
    pub fn reshape(&mut self, rows: usize, cols: usize) -> Result<()> {
        either!(self, m => m.reshape(rows, cols))
    }

    /// Row-major copy of every element
    pub fn to_vec(&self) -> Vec<T> {
        either!(self, m => m.to_vec())
    }

    /// Replace the contents from a row-major slice of length rows * cols
    pub fn set_data(&mut self, data: &[T]) -> Result<()> {
        either!(self, m => m.set_data(data))
    }

    /// Dense copy of this matrix
    pub fn to_dense(&self) -> DenseMatrix<T> {
        match self {
            Self::Dense(d) => d.clone(),
            Self::Sparse(s) => s.to_dense(),
        }
    }

    /// Convert into the dense variant, copying only when sparse
    pub fn into_dense(self) -> DenseMatrix<T> {
        match self {
            Self::Dense(d) => d,
            Self::Sparse(s) => s.to_dense(),
        }
    }

    // ------------------------------------------------------------------
    // Elementwise
    // ------------------------------------------------------------------

    /// Elementwise sum
    pub fn add(&self, other: &Self) -> Result<Self> {
        Ok(match (self, other) {
            (Self::Dense(a), Self::Dense(b)) => Self::Dense(a.add(b)?),
            (Self::Dense(a), Self::Sparse(b)) => Self::Dense(a.add_sparse(b)?),
            (Self::Sparse(a), Self::Dense(b)) => Self::Dense(a.add_dense(b)?),
            (Self::Sparse(a), Self::Sparse(b)) => Self::Sparse(a.add(b)?),
        })
    }

    /// Elementwise difference
    pub fn sub(&self, other: &Self) -> Result<Self> {
        Ok(match (self, other) {
            (Self::Dense(a), Self::Dense(b)) => Self::Dense(a.sub(b)?),
            (Self::Dense(a), Self::Sparse(b)) => Self::Dense(a.sub_sparse(b)?),
            (Self::Sparse(a), Self::Dense(b)) => Self::Dense(a.sub_dense(b)?),
            (Self::Sparse(a), Self::Sparse(b)) => Self::Sparse(a.sub(b)?),
        })
    }

    /// Elementwise product
    pub fn prod(&self, other: &Self) -> Result<Self> {
        Ok(match (self, other) {
            (Self::Dense(a), Self::Dense(b)) => Self::Dense(a.prod(b)?),
            (Self::Dense(a), Self::Sparse(b)) => Self::Sparse(a.prod_sparse(b)?),
            (Self::Sparse(a), Self::Dense(b)) => Self::Sparse(a.prod_dense(b)?),
            (Self::Sparse(a), Self::Sparse(b)) => Self::Sparse(a.prod(b)?),
        })
    }

    /// Elementwise quotient
    pub fn div(&self, other: &Self) -> Result<Self> {
        Ok(match (self, other) {
            (Self::Dense(a), Self::Dense(b)) => Self::Dense(a.div(b)?),
            (Self::Dense(a), Self::Sparse(b)) => Self::Dense(a.div_sparse(b)?),
            (Self::Sparse(a), Self::Dense(b)) => Self::Sparse(a.div_dense(b)?),
            (Self::Sparse(a), Self::Sparse(b)) => Self::Sparse(a.div(b)?),
        })
    }

    /// Elementwise maximum
    pub fn maximum(&self, other: &Self) -> Result<Self> {
        Ok(match (self, other) {
            (Self::Sparse(a), Self::Sparse(b)) => Self::Sparse(a.maximum(b)?),
            (Self::Dense(a), b) => Self::Dense(a.maximum(&b.to_dense())?),
            (a, b) => Self::Dense(a.to_dense().maximum(&b.to_dense())?),
        })
    }

    /// Elementwise minimum
    pub fn minimum(&self, other: &Self) -> Result<Self> {
        Ok(match (self, other) {
            (Self::Sparse(a), Self::Sparse(b)) => Self::Sparse(a.minimum(b)?),
            (Self::Dense(a), b) => Self::Dense(a.minimum(&b.to_dense())?),
            (a, b) => Self::Dense(a.to_dense().minimum(&b.to_dense())?),
        })
    }

    /// In-place elementwise sum
    pub fn add_in_place(&mut self, other: &Self) -> Result<()> {
        match (self, other) {
            (Self::Dense(a), Self::Dense(b)) => a.add_in_place(b),
            (Self::Dense(a), Self::Sparse(b)) => a.add_sparse_in_place(b),
            (Self::Sparse(a), Self::Sparse(b)) => a.add_in_place(b),
            (Self::Sparse(_), Self::Dense(_)) => Err(Error::unsupported("add_in_place", "sparse")),
        }
    }

    /// In-place elementwise difference
    pub fn sub_in_place(&mut self, other: &Self) -> Result<()> {
        match (self, other) {
            (Self::Dense(a), Self::Dense(b)) => a.sub_in_place(b),
            (Self::Dense(a), Self::Sparse(b)) => a.sub_sparse_in_place(b),
            (Self::Sparse(a), Self::Sparse(b)) => a.sub_in_place(b),
            (Self::Sparse(_), Self::Dense(_)) => Err(Error::unsupported("sub_in_place", "sparse")),
        }
    }

    /// In-place elementwise product
    pub fn prod_in_place(&mut self, other: &Self) -> Result<()> {
        match (self, other) {
            (Self::Dense(a), Self::Dense(b)) => a.prod_in_place(b),
            (Self::Dense(a), Self::Sparse(b)) => a.prod_sparse_in_place(b),
            (Self::Sparse(a), Self::Dense(b)) => a.prod_dense_in_place(b),
            (Self::Sparse(a), Self::Sparse(b)) => a.prod_in_place(b),
        }
    }

    /// In-place elementwise quotient; unsupported for a sparse receiver
    pub fn div_in_place(&mut self, other: &Self) -> Result<()> {
        match (self, other) {
            (Self::Dense(a), Self::Dense(b)) => a.div_in_place(b),
            (Self::Dense(a), Self::Sparse(b)) => a.div_sparse_in_place(b),
            (Self::Sparse(_), _) => Err(Error::unsupported("div_in_place", "sparse")),
        }
    }

    // ------------------------------------------------------------------
    // Scalar
    // ------------------------------------------------------------------

    /// Add `n` to every element; a sparse receiver yields a dense result
    pub fn add_scalar(&self, n: T) -> Self {
        match self {
            Self::Dense(d) => Self::Dense(d.add_scalar(n)),
            Self::Sparse(s) => Self::Dense(s.add_scalar(n)),
        }
    }

    /// Subtract `n` from every element; a sparse receiver yields a dense result
    pub fn sub_scalar(&self, n: T) -> Self {
        match self {
            Self::Dense(d) => Self::Dense(d.sub_scalar(n)),
            Self::Sparse(s) => Self::Dense(s.sub_scalar(n)),
        }
    }

    /// Multiply every element by `n`
    pub fn prod_scalar(&self, n: T) -> Self {
        match self {
            Self::Dense(d) => Self::Dense(d.prod_scalar(n)),
            Self::Sparse(s) => Self::Sparse(s.prod_scalar(n)),
        }
    }

    /// Divide every element by `n`
    pub fn div_scalar(&self, n: T) -> Self {
        match self {
            Self::Dense(d) => Self::Dense(d.div_scalar(n)),
            Self::Sparse(s) => Self::Sparse(s.div_scalar(n)),
        }
    }

    /// In-place [`add_scalar`](Self::add_scalar); unsupported for sparse
    pub fn add_scalar_in_place(&mut self, n: T) -> Result<()> {
        match self {
            Self::Dense(d) => {
                d.add_scalar_in_place(n);
                Ok(())
            }
            Self::Sparse(s) => s.add_scalar_in_place(n),
        }
    }

    /// In-place [`sub_scalar`](Self::sub_scalar); unsupported for sparse
    pub fn sub_scalar_in_place(&mut self, n: T) -> Result<()> {
        match self {
            Self::Dense(d) => {
                d.sub_scalar_in_place(n);
                Ok(())
            }
            Self::Sparse(s) => s.sub_scalar_in_place(n),
        }
    }

    /// In-place [`prod_scalar`](Self::prod_scalar)
    pub fn prod_scalar_in_place(&mut self, n: T) {
        either!(self, m => m.prod_scalar_in_place(n))
    }

    /// In-place [`div_scalar`](Self::div_scalar)
    pub fn div_scalar_in_place(&mut self, n: T) {
        either!(self, m => m.div_scalar_in_place(n))
    }

    /// Apply `f` to every element (stored elements only when sparse)
    pub fn apply(&self, f: impl Fn(T) -> T) -> Self {
        match self {
            Self::Dense(d) => Self::Dense(d.apply(f)),
            Self::Sparse(s) => Self::Sparse(s.apply(f)),
        }
    }

    /// Apply `f(x, alpha)` to every element; unsupported for sparse
    pub fn apply_with_alpha(&self, f: impl Fn(T, T) -> T, alpha: T) -> Result<Self> {
        match self {
            Self::Dense(d) => Ok(Self::Dense(d.apply_with_alpha(f, alpha))),
            Self::Sparse(s) => s.apply_with_alpha(f, alpha).map(Self::Sparse),
        }
    }

    // ------------------------------------------------------------------
    // Products and transpose
    // ------------------------------------------------------------------

    /// Matrix product; always dense
    pub fn mul(&self, other: &Self) -> Result<DenseMatrix<T>> {
        match (self, other) {
            (Self::Dense(a), Self::Dense(b)) => a.mul(b),
            (Self::Dense(a), Self::Sparse(b)) => a.mul_sparse(b),
            (Self::Sparse(a), Self::Dense(b)) => a.mul_dense(b),
            (Self::Sparse(a), Self::Sparse(b)) => a.mul(b),
        }
    }

    /// Transposed-operand product selfᵀ @ x for a single-column `x`; always dense
    pub fn mul_t(&self, x: &Self) -> Result<DenseMatrix<T>> {
        match (self, x) {
            (Self::Dense(a), Self::Dense(b)) => a.mul_t(b),
            (Self::Dense(a), Self::Sparse(b)) => a.mul_t(&b.to_dense()),
            (Self::Sparse(a), Self::Dense(b)) => a.mul_t(b),
            (Self::Sparse(a), Self::Sparse(b)) => a.mul_t(&b.to_dense()),
        }
    }

    /// Transpose, keeping the representation
    pub fn t(&self) -> Self {
        match self {
            Self::Dense(d) => Self::Dense(d.t()),
            Self::Sparse(s) => Self::Sparse(s.t()),
        }
    }

    // ------------------------------------------------------------------
    // Reductions
    // ------------------------------------------------------------------

    /// Frobenius norm
    pub fn norm(&self) -> T {
        either!(self, m => m.norm())
    }

    /// Sum of all elements
    pub fn sum(&self) -> T {
        either!(self, m => m.sum())
    }

    /// Mean of all elements
    pub fn mean(&self) -> T {
        either!(self, m => m.mean())
    }

    /// Largest element; `None` for an empty shape
    pub fn max(&self) -> Option<T> {
        either!(self, m => m.max())
    }

    /// Smallest element; `None` for an empty shape
    pub fn min(&self) -> Option<T> {
        either!(self, m => m.min())
    }

    /// Clamp every element (stored elements only when sparse) into `[min, max]`
    pub fn clip(&self, min: T, max: T) -> Self {
        match self {
            Self::Dense(d) => Self::Dense(d.clip(min, max)),
            Self::Sparse(s) => Self::Sparse(s.clip(min, max)),
        }
    }

    /// In-place [`clip`](Self::clip)
    pub fn clip_in_place(&mut self, min: T, max: T) {
        either!(self, m => m.clip_in_place(min, max))
    }

    // ------------------------------------------------------------------
    // Linear algebra
    // ------------------------------------------------------------------

    /// LU decomposition with partial pivoting; the factors are dense
    pub fn lu(&self) -> Result<LuDecomposition<T>> {
        either!(self, m => m.lu())
    }

    /// Matrix inverse; always dense
    pub fn inverse(&self) -> Result<DenseMatrix<T>> {
        either!(self, m => m.inverse())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Pool;

    fn pair(pool: &Pool<f64>) -> (Matrix<f64>, Matrix<f64>) {
        let d = DenseMatrix::from_slice(pool, 2, 2, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        let s = SparseMatrix::from_slice(pool, 2, 2, &[0.0, 5.0, 0.0, -1.0]).unwrap();
        (d.into(), s.into())
    }

    #[test]
    fn test_result_representations() {
        let pool = Pool::new();
        let (d, s) = pair(&pool);
        assert!(d.add(&s).unwrap().is_dense());
        assert!(s.add(&d).unwrap().is_dense());
        assert!(s.add(&s).unwrap().is_sparse());
        assert!(d.prod(&s).unwrap().is_sparse());
        assert!(s.prod(&d).unwrap().is_sparse());
        assert!(d.div(&s).unwrap().is_dense());
        assert!(s.div(&d).unwrap().is_sparse());
        assert!(s.maximum(&d).unwrap().is_dense());
        assert!(s.maximum(&s).unwrap().is_sparse());
        assert!(s.add_scalar(1.0).is_dense());
        assert!(s.prod_scalar(2.0).is_sparse());
        assert!(s.t().is_sparse());
    }

    #[test]
    fn test_mixed_values_match_dense() {
        let pool = Pool::new();
        let (d, s) = pair(&pool);
        let sd: Matrix<f64> = s.to_dense().into();
        assert_eq!(d.add(&s).unwrap().to_vec(), d.add(&sd).unwrap().to_vec());
        assert_eq!(s.sub(&d).unwrap().to_vec(), sd.sub(&d).unwrap().to_vec());
        assert_eq!(d.prod(&s).unwrap().to_vec(), d.prod(&sd).unwrap().to_vec());
        assert_eq!(d.mul(&s).unwrap(), d.mul(&sd).unwrap());
        assert_eq!(s.mul(&s).unwrap(), sd.mul(&sd).unwrap());
        assert_eq!(s.minimum(&d).unwrap().to_vec(), vec![0.0, 2.0, 0.0, -1.0]);
    }

    #[test]
    fn test_in_place_rules() {
        let pool = Pool::new();
        let (mut d, mut s) = pair(&pool);
        d.add_in_place(&s).unwrap();
        assert_eq!(d.to_vec(), vec![1.0, 7.0, 3.0, 3.0]);
        assert!(d.is_dense());

        assert!(matches!(
            s.add_in_place(&d),
            Err(Error::UnsupportedOperation { .. })
        ));
        assert!(s.div_in_place(&d).is_err());
        assert!(s.add_scalar_in_place(1.0).is_err());
        assert!(s.set(0, 0, 1.0).is_err());
        assert!(s.reshape(4, 1).is_err());
        assert!(s.view(4, 1).is_err());
        assert!(s.apply_with_alpha(|x, a| x * a, 2.0).is_err());

        s.prod_in_place(&d).unwrap();
        assert!(s.is_sparse());
        assert_eq!(s.to_vec(), vec![0.0, 35.0, 0.0, -3.0]);
    }

    #[test]
    fn test_mul_t_and_reductions() {
        let pool = Pool::new();
        let (d, s) = pair(&pool);
        let x: Matrix<f64> = DenseMatrix::from_slice(&pool, 2, 1, &[1.0, 1.0]).unwrap().into();
        assert_eq!(d.mul_t(&x).unwrap().to_vec(), vec![4.0, 6.0]);
        assert_eq!(s.mul_t(&x).unwrap().to_vec(), vec![0.0, 4.0]);

        assert_eq!(s.max(), Some(5.0));
        assert_eq!(s.min(), Some(-1.0));
        assert_eq!(d.sum(), 10.0);
        assert!((s.norm() - 26.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(s.clip(0.0, 2.0).to_vec(), vec![0.0, 2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_linalg_dispatch() {
        let pool = Pool::new();
        let (d, s) = pair(&pool);
        let inv = d.inverse().unwrap();
        let product = d.mul(&inv.into()).unwrap();
        for (got, want) in product.to_vec().iter().zip([1.0, 0.0, 0.0, 1.0]) {
            assert!((got - want).abs() < 1e-12);
        }
        // [0 5; 0 -1] is singular
        assert_eq!(s.lu().unwrap().det(), 0.0);
    }
}
