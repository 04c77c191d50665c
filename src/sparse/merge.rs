//! Sparse matrix merge algorithms
//!
//! Every sparse-sparse elementwise operation is one two-pointer walk over the
//! operands' rows, parameterized by which positions to visit and a closure
//! computing the output value. Results equal to zero are never stored.

use super::core::{CsrBuilder, SparseMatrix};
use crate::dtype::Element;
use crate::error::{Error, Result};

/// Which positions of the two operands produce output entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MergeStrategy {
    /// Positions stored in either operand; the missing side reads as zero.
    /// Used by add, sub, maximum and minimum.
    Union,
    /// Positions stored in both operands. Used by prod, where a missing side
    /// always yields zero.
    Intersection,
    /// Positions stored in the left operand. Used by div, where a missing
    /// left side yields zero and a missing right side still matters.
    Left,
}

/// Merge two CSR matrices of identical shape
///
/// `op` is called as `op(a, b)` with zero substituted for a missing entry.
pub(crate) fn merge_csr<T, F>(
    op_name: &'static str,
    a: &SparseMatrix<T>,
    b: &SparseMatrix<T>,
    strategy: MergeStrategy,
    op: F,
) -> Result<SparseMatrix<T>>
where
    T: Element,
    F: Fn(T, T) -> T,
{
    if a.shape() != b.shape() {
        return Err(Error::dimension_mismatch(op_name, a.shape(), b.shape()));
    }

    let zero = T::zero();
    let keep_left = strategy != MergeStrategy::Intersection;
    let keep_right = strategy == MergeStrategy::Union;
    let capacity = match strategy {
        MergeStrategy::Union => a.nnz() + b.nnz(),
        MergeStrategy::Intersection => a.nnz().min(b.nnz()),
        MergeStrategy::Left => a.nnz(),
    };
    let mut out = CsrBuilder::with_capacity(a.rows, capacity);

    for row in 0..a.rows {
        let (mut i, a_end) = (a.row_ptrs[row], a.row_ptrs[row + 1]);
        let (mut j, b_end) = (b.row_ptrs[row], b.row_ptrs[row + 1]);

        while i < a_end && j < b_end {
            let (ca, cb) = (a.col_indices[i], b.col_indices[j]);
            if ca < cb {
                if keep_left {
                    out.push(ca, op(a.values[i], zero));
                }
                i += 1;
            } else if cb < ca {
                if keep_right {
                    out.push(cb, op(zero, b.values[j]));
                }
                j += 1;
            } else {
                out.push(ca, op(a.values[i], b.values[j]));
                i += 1;
                j += 1;
            }
        }

        if keep_left {
            for idx in i..a_end {
                out.push(a.col_indices[idx], op(a.values[idx], zero));
            }
        }
        if keep_right {
            for idx in j..b_end {
                out.push(b.col_indices[idx], op(zero, b.values[idx]));
            }
        }

        out.finish_row();
    }

    Ok(out.build(&a.pool, a.rows, a.cols))
}

/// Map the stored values of a CSR matrix, dropping results equal to zero
pub(crate) fn map_csr<T, F>(a: &SparseMatrix<T>, f: F) -> SparseMatrix<T>
where
    T: Element,
    F: Fn(T) -> T,
{
    let mut out = CsrBuilder::with_capacity(a.rows, a.nnz());
    for row in 0..a.rows {
        for idx in a.row_range(row) {
            out.push(a.col_indices[idx], f(a.values[idx]));
        }
        out.finish_row();
    }
    out.build(&a.pool, a.rows, a.cols)
}
