//! LU decomposition with partial pivoting

use super::validate_square;
use crate::dense::DenseMatrix;
use crate::dtype::Element;
use crate::error::Result;
use crate::pool::Pool;
use crate::sparse::SparseMatrix;

/// LU decomposition result: P @ A = L @ U
///
/// All three factors are dense `n x n` matrices from the input's pool.
#[derive(Debug, Clone)]
pub struct LuDecomposition<T: Element> {
    /// Unit lower triangular factor
    pub l: DenseMatrix<T>,
    /// Upper triangular factor
    pub u: DenseMatrix<T>,
    /// Row permutation applied to the input
    pub p: DenseMatrix<T>,
    /// Number of row swaps (for determinant sign)
    pub num_swaps: usize,
}

impl<T: Element> LuDecomposition<T> {
    /// det(A) = (-1)^num_swaps * prod(U[i, i])
    pub fn det(&self) -> T {
        let n = self.u.rows();
        let sign = if self.num_swaps % 2 == 0 { T::one() } else { -T::one() };
        self.u
            .with_data(|u| (0..n).fold(sign, |acc, i| acc * u[i * n + i]))
    }
}

/// Raw factors of an `n x n` row-major matrix
pub(crate) struct LuFactors<T> {
    pub(crate) l: Vec<T>,
    pub(crate) u: Vec<T>,
    /// perm[i] is the input row that ended up in row i
    pub(crate) perm: Vec<usize>,
    pub(crate) num_swaps: usize,
}

/// Doolittle elimination with partial pivoting
///
/// A column whose entries at and below the diagonal are all zero gets zero
/// multipliers, so a singular input still factors; its `U` has a zero on the
/// diagonal.
pub(crate) fn lu_factor<T: Element>(a: &[T], n: usize) -> LuFactors<T> {
    let mut u = a.to_vec();
    let mut l = vec![T::zero(); n * n];
    let mut perm: Vec<usize> = (0..n).collect();
    let mut num_swaps = 0usize;

    for col in 0..n {
        // Find pivot: max absolute value in column col, rows col..n
        let mut pivot_row = col;
        let mut max_val = u[col * n + col].abs();
        for row in (col + 1)..n {
            let val = u[row * n + col].abs();
            if val > max_val {
                max_val = val;
                pivot_row = row;
            }
        }

        if pivot_row != col {
            for j in 0..n {
                u.swap(col * n + j, pivot_row * n + j);
            }
            // Only the already computed columns of L move with the rows
            for j in 0..col {
                l.swap(col * n + j, pivot_row * n + j);
            }
            perm.swap(col, pivot_row);
            num_swaps += 1;
        }

        let pivot = u[col * n + col];
        if pivot == T::zero() {
            continue;
        }

        for row in (col + 1)..n {
            let multiplier = u[row * n + col] / pivot;
            l[row * n + col] = multiplier;
            u[row * n + col] = T::zero();
            for j in (col + 1)..n {
                u[row * n + j] = u[row * n + j] - multiplier * u[col * n + j];
            }
        }
    }

    for i in 0..n {
        l[i * n + i] = T::one();
    }

    LuFactors {
        l,
        u,
        perm,
        num_swaps,
    }
}

/// Permutation matrix with P[i, perm[i]] = 1
pub(crate) fn permutation_matrix<T: Element>(pool: &Pool<T>, perm: &[usize]) -> DenseMatrix<T> {
    let n = perm.len();
    let p = pool.acquire_empty(n, n);
    {
        let mut data = p.write();
        for (i, &src) in perm.iter().enumerate() {
            data[i * n + src] = T::one();
        }
    }
    p
}

fn to_matrix<T: Element>(pool: &Pool<T>, n: usize, data: &[T]) -> DenseMatrix<T> {
    let out = pool.acquire(n, n);
    out.write().copy_from_slice(data);
    out
}

impl<T: Element> DenseMatrix<T> {
    /// LU decomposition with partial pivoting
    ///
    /// Returns factors satisfying `P @ A ≈ L @ U`. The receiver is not
    /// modified.
    ///
    /// # Errors
    ///
    /// `NonSquareMatrix` if the receiver is not square
    pub fn lu(&self) -> Result<LuDecomposition<T>> {
        let n = validate_square(self.shape())?;
        let factors = self.with_data(|a| lu_factor(a, n));
        let pool = self.pool();
        Ok(LuDecomposition {
            l: to_matrix(pool, n, &factors.l),
            u: to_matrix(pool, n, &factors.u),
            p: permutation_matrix(pool, &factors.perm),
            num_swaps: factors.num_swaps,
        })
    }

    /// Determinant via LU decomposition (1 for a 0 x 0 matrix)
    pub fn det(&self) -> Result<T> {
        Ok(self.lu()?.det())
    }
}

impl<T: Element> SparseMatrix<T> {
    /// LU decomposition of the dense expansion; the factors are dense
    pub fn lu(&self) -> Result<LuDecomposition<T>> {
        validate_square(self.shape())?;
        self.to_dense().lu()
    }
}
