//! Pivot permutation and augmented matrices

use super::lu::{lu_factor, permutation_matrix};
use super::validate_square;
use crate::dense::DenseMatrix;
use crate::dtype::Element;
use crate::error::Result;

impl<T: Element> DenseMatrix<T> {
    /// Row permutation chosen by partial pivoting
    ///
    /// This is the `P` of [`lu`](Self::lu): `P @ A` has the pivot rows on
    /// the diagonal in elimination order.
    pub fn pivoting(&self) -> Result<Self> {
        let n = validate_square(self.shape())?;
        let perm = self.with_data(|a| lu_factor(a, n).perm);
        Ok(permutation_matrix(self.pool(), &perm))
    }

    /// The `n x 2n` matrix `[A | I]`
    pub fn augment(&self) -> Result<Self> {
        let n = validate_square(self.shape())?;
        let out = self.pool().acquire_empty(n, 2 * n);
        if n == 0 {
            return Ok(out);
        }
        {
            let src = self.read();
            let mut dst = out.write();
            for (i, (dst_row, src_row)) in dst.chunks_exact_mut(2 * n).zip(src.chunks_exact(n)).enumerate() {
                dst_row[..n].copy_from_slice(src_row);
                dst_row[n + i] = T::one();
            }
        }
        Ok(out)
    }
}
