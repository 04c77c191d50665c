//! Sparse-sparse elementwise operations, scalar operations and reductions

use super::core::SparseMatrix;
use super::merge::{MergeStrategy, map_csr, merge_csr};
use crate::dense::DenseMatrix;
use crate::dtype::Element;
use crate::error::{Error, Result};

macro_rules! sparse_binary {
    ($($(#[$doc:meta])* $name:ident => $strategy:ident, $op:expr;)*) => {
        paste::paste! {
            impl<T: Element> SparseMatrix<T> {
                $(
                    $(#[$doc])*
                    ///
                    /// # Errors
                    ///
                    /// `DimensionMismatch` unless both shapes are identical
                    pub fn $name(&self, other: &Self) -> Result<Self> {
                        merge_csr(stringify!($name), self, other, MergeStrategy::$strategy, $op)
                    }

                    #[doc = concat!("In-place form of [`", stringify!($name), "`](Self::", stringify!($name), ")")]
                    pub fn [<$name _in_place>](&mut self, other: &Self) -> Result<()> {
                        *self = self.$name(other)?;
                        Ok(())
                    }
                )*
            }
        }
    };
}

sparse_binary! {
    /// Elementwise sum
    add => Union, |a: T, b: T| a + b;
    /// Elementwise difference
    sub => Union, |a: T, b: T| a - b;
    /// Elementwise (Hadamard) product
    prod => Intersection, |a: T, b: T| a * b;
    /// Elementwise maximum, with absent entries read as zero
    maximum => Union, |a: T, b: T| a.max(b);
    /// Elementwise minimum, with absent entries read as zero
    minimum => Union, |a: T, b: T| a.min(b);
}

impl<T: Element> SparseMatrix<T> {
    /// Elementwise quotient over the receiver's stored entries
    ///
    /// Positions where the receiver is zero stay zero, including those where
    /// the divisor is also zero.
    pub fn div(&self, other: &Self) -> Result<Self> {
        merge_csr("div", self, other, MergeStrategy::Left, |a, b| a / b)
    }

    /// In-place division is not supported on CSR storage
    pub fn div_in_place(&mut self, _other: &Self) -> Result<()> {
        Err(Error::unsupported("div_in_place", "sparse"))
    }

    /// Apply `f` to every stored value; results equal to zero are dropped
    ///
    /// Implicit zeros are not visited, so `f` should map zero to zero for the
    /// result to match the dense equivalent.
    pub fn apply(&self, f: impl Fn(T) -> T) -> Self {
        map_csr(self, f)
    }

    /// In-place form of [`apply`](Self::apply)
    pub fn apply_in_place(&mut self, f: impl Fn(T) -> T) {
        *self = map_csr(self, f);
    }

    /// Not supported on CSR storage
    pub fn apply_with_alpha(&self, _f: impl Fn(T, T) -> T, _alpha: T) -> Result<Self> {
        Err(Error::unsupported("apply_with_alpha", "sparse"))
    }

    /// Multiply every element by `n`; `n == 0` gives an empty matrix
    pub fn prod_scalar(&self, n: T) -> Self {
        if n == T::zero() {
            return Self::empty(&self.pool, self.rows, self.cols);
        }
        map_csr(self, |a| a * n)
    }

    /// In-place form of [`prod_scalar`](Self::prod_scalar)
    pub fn prod_scalar_in_place(&mut self, n: T) {
        *self = self.prod_scalar(n);
    }

    /// Divide every stored element by `n`
    pub fn div_scalar(&self, n: T) -> Self {
        map_csr(self, |a| a / n)
    }

    /// In-place form of [`div_scalar`](Self::div_scalar)
    pub fn div_scalar_in_place(&mut self, n: T) {
        *self = self.div_scalar(n);
    }

    /// Add `n` to every element, zeros included
    ///
    /// The result is dense since a non-zero shift fills every position.
    pub fn add_scalar(&self, n: T) -> DenseMatrix<T> {
        let out = self.to_dense();
        out.write().iter_mut().for_each(|v| *v = *v + n);
        out
    }

    /// Subtract `n` from every element, zeros included; the result is dense
    pub fn sub_scalar(&self, n: T) -> DenseMatrix<T> {
        let out = self.to_dense();
        out.write().iter_mut().for_each(|v| *v = *v - n);
        out
    }

    /// Not supported: the result would no longer be sparse
    pub fn add_scalar_in_place(&mut self, _n: T) -> Result<()> {
        Err(Error::unsupported("add_scalar_in_place", "sparse"))
    }

    /// Not supported: the result would no longer be sparse
    pub fn sub_scalar_in_place(&mut self, _n: T) -> Result<()> {
        Err(Error::unsupported("sub_scalar_in_place", "sparse"))
    }

    /// Clamp the stored values into `[min, max]`
    pub fn clip(&self, min: T, max: T) -> Self {
        map_csr(self, |v| v.max(min).min(max))
    }

    /// In-place form of [`clip`](Self::clip)
    pub fn clip_in_place(&mut self, min: T, max: T) {
        *self = self.clip(min, max);
    }

    /// Sum of all elements
    pub fn sum(&self) -> T {
        self.values.iter().fold(T::zero(), |acc, &v| acc + v)
    }

    /// Mean of all elements, implicit zeros included (NaN when empty)
    pub fn mean(&self) -> T {
        self.sum() / T::from_f64(self.size() as f64)
    }

    /// Frobenius norm
    pub fn norm(&self) -> T {
        self.values
            .iter()
            .fold(T::zero(), |acc, &v| acc + v * v)
            .sqrt()
    }

    /// Whether some position holds an implicit zero
    #[inline]
    fn has_implicit_zero(&self) -> bool {
        self.nnz() < self.size()
    }

    /// Largest element, implicit zeros included; `None` for an empty shape
    pub fn max(&self) -> Option<T> {
        let stored = self.values.iter().copied().reduce(T::max);
        if self.has_implicit_zero() {
            Some(stored.map_or(T::zero(), |m| m.max(T::zero())))
        } else {
            stored
        }
    }

    /// Smallest element, implicit zeros included; `None` for an empty shape
    pub fn min(&self) -> Option<T> {
        let stored = self.values.iter().copied().reduce(T::min);
        if self.has_implicit_zero() {
            Some(stored.map_or(T::zero(), |m| m.min(T::zero())))
        } else {
            stored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Pool;

    fn csr(pool: &Pool<f64>, data: &[f64]) -> SparseMatrix<f64> {
        SparseMatrix::from_slice(pool, 2, 3, data).unwrap()
    }

    #[test]
    fn test_add_sub() {
        let pool = Pool::new();
        let a = csr(&pool, &[1.0, 0.0, 2.0, 0.0, 3.0, 0.0]);
        let b = csr(&pool, &[0.0, 4.0, -2.0, 0.0, 0.0, 5.0]);
        let sum = a.add(&b).unwrap();
        assert_eq!(sum.to_vec(), vec![1.0, 4.0, 0.0, 0.0, 3.0, 5.0]);
        assert_eq!(sum.nnz(), 4);
        let diff = a.sub(&b).unwrap();
        assert_eq!(diff.to_vec(), vec![1.0, -4.0, 4.0, 0.0, 3.0, -5.0]);
    }

    #[test]
    fn test_in_place_leaves_receiver_on_error() {
        let pool = Pool::new();
        let mut a = csr(&pool, &[1.0, 0.0, 2.0, 0.0, 3.0, 0.0]);
        let before = a.clone();
        let b = SparseMatrix::empty(&pool, 3, 2);
        assert!(a.add_in_place(&b).is_err());
        assert_eq!(a, before);

        let c = csr(&pool, &[1.0; 6]);
        a.prod_in_place(&c).unwrap();
        assert_eq!(a, before);
        assert!(a.div_in_place(&c).is_err());
    }

    #[test]
    fn test_maximum_minimum_against_zero() {
        let pool = Pool::new();
        let a = csr(&pool, &[-1.0, 0.0, 2.0, 0.0, 0.0, 0.0]);
        let b = csr(&pool, &[0.0, -3.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(a.maximum(&b).unwrap().to_vec(), vec![0.0, 0.0, 2.0, 0.0, 0.0, 0.0]);
        assert_eq!(a.minimum(&b).unwrap().to_vec(), vec![-1.0, -3.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(a.maximum(&b).unwrap().nnz(), 1);
    }

    #[test]
    fn test_scalar_ops() {
        let pool = Pool::new();
        let a = csr(&pool, &[1.0, 0.0, 2.0, 0.0, 3.0, 0.0]);
        assert_eq!(a.prod_scalar(2.0).values(), &[2.0, 4.0, 6.0]);
        assert_eq!(a.prod_scalar(0.0).nnz(), 0);
        assert_eq!(a.div_scalar(2.0).values(), &[0.5, 1.0, 1.5]);

        let shifted = a.add_scalar(1.0);
        assert_eq!(shifted.to_vec(), vec![2.0, 1.0, 3.0, 1.0, 4.0, 1.0]);
        assert_eq!(a.sub_scalar(1.0).at(0, 1).unwrap(), -1.0);

        let mut b = a.clone();
        assert!(matches!(
            b.add_scalar_in_place(1.0),
            Err(Error::UnsupportedOperation { .. })
        ));
        assert!(b.apply_with_alpha(|x, y| x * y, 2.0).is_err());
    }

    #[test]
    fn test_prod_scalar_zero_drops_non_finite() {
        let pool = Pool::new();
        let mut a = SparseMatrix::from_slice(&pool, 1, 3, &[f64::INFINITY, 0.0, f64::NAN]).unwrap();
        assert_eq!(a.nnz(), 2);

        let zeroed = a.prod_scalar(0.0);
        assert_eq!(zeroed.nnz(), 0);
        assert_eq!(zeroed.shape(), [1, 3]);
        assert_eq!(zeroed.to_vec(), vec![0.0; 3]);

        a.prod_scalar_in_place(0.0);
        assert_eq!(a.nnz(), 0);
    }

    #[test]
    fn test_apply_and_clip() {
        let pool = Pool::new();
        let a = csr(&pool, &[1.0, 0.0, -2.0, 0.0, 3.0, 0.0]);
        let squared = a.apply(|v| v * v);
        assert_eq!(squared.values(), &[1.0, 4.0, 9.0]);
        let clipped = a.clip(-1.0, 2.0);
        assert_eq!(clipped.values(), &[1.0, -1.0, 2.0]);
        // Mapping to zero drops the entry
        assert_eq!(a.apply(|v| if v > 0.0 { v } else { 0.0 }).nnz(), 2);
    }

    #[test]
    fn test_reductions() {
        let pool = Pool::new();
        let a = csr(&pool, &[1.0, 0.0, -2.0, 0.0, 3.0, 0.0]);
        assert_eq!(a.sum(), 2.0);
        assert!((a.mean() - 2.0 / 6.0).abs() < 1e-12);
        assert!((a.norm() - 14.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(a.max(), Some(3.0));
        assert_eq!(a.min(), Some(-2.0));

        let positive = SparseMatrix::from_slice(&pool, 1, 2, &[1.0, 2.0]).unwrap();
        assert_eq!(positive.min(), Some(1.0));
        let sparse_positive = SparseMatrix::from_slice(&pool, 1, 2, &[0.0, 2.0]).unwrap();
        assert_eq!(sparse_positive.min(), Some(0.0));

        let empty = SparseMatrix::<f64>::empty(&pool, 0, 3);
        assert_eq!(empty.max(), None);
        assert!(empty.mean().is_nan());
    }
}
