//! Core CSR implementation: struct, creation, getters

use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::pool::Pool;

/// CSR (Compressed Sparse Row) matrix
///
/// # Invariants
///
/// - `row_ptrs.len() == rows + 1`, `row_ptrs[0] == 0`, non-decreasing,
///   `row_ptrs[rows] == nnz`
/// - within each row, `col_indices` are strictly increasing
/// - no stored value is zero
#[derive(Clone)]
pub struct SparseMatrix<T: Element> {
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) row_ptrs: Vec<usize>,
    pub(crate) col_indices: Vec<usize>,
    pub(crate) values: Vec<T>,
    pub(crate) pool: Pool<T>,
}

/// Row-by-row CSR assembly
///
/// Entries must be pushed in ascending column order within a row, and rows
/// closed in order with [`finish_row`](Self::finish_row). Zero values are
/// dropped on push.
pub(crate) struct CsrBuilder<T> {
    row_ptrs: Vec<usize>,
    col_indices: Vec<usize>,
    values: Vec<T>,
}

impl<T: Element> CsrBuilder<T> {
    pub(crate) fn with_capacity(rows: usize, nnz: usize) -> Self {
        let mut row_ptrs = Vec::with_capacity(rows + 1);
        row_ptrs.push(0);
        Self {
            row_ptrs,
            col_indices: Vec::with_capacity(nnz),
            values: Vec::with_capacity(nnz),
        }
    }

    /// Append an entry to the current row unless it is zero
    #[inline]
    pub(crate) fn push(&mut self, col: usize, value: T) {
        if value != T::zero() {
            self.col_indices.push(col);
            self.values.push(value);
        }
    }

    #[inline]
    pub(crate) fn finish_row(&mut self) {
        self.row_ptrs.push(self.values.len());
    }

    pub(crate) fn build(self, pool: &Pool<T>, rows: usize, cols: usize) -> SparseMatrix<T> {
        debug_assert_eq!(self.row_ptrs.len(), rows + 1);
        SparseMatrix {
            rows,
            cols,
            row_ptrs: self.row_ptrs,
            col_indices: self.col_indices,
            values: self.values,
            pool: pool.clone(),
        }
    }
}

impl<T: Element> SparseMatrix<T> {
    /// Create an all-zero sparse matrix
    pub fn empty(pool: &Pool<T>, rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            row_ptrs: vec![0; rows + 1],
            col_indices: Vec::new(),
            values: Vec::new(),
            pool: pool.clone(),
        }
    }

    /// Create a CSR matrix from its three arrays
    ///
    /// # Arguments
    ///
    /// * `row_ptrs` - Row pointers (length: rows + 1)
    /// * `col_indices` - Column index of each non-zero
    /// * `values` - Non-zero values
    ///
    /// # Errors
    ///
    /// - `SizeMismatch` if `row_ptrs.len() != rows + 1` or the index and value
    ///   arrays differ in length
    /// - `IndexOutOfRange` if a column index is `>= cols`
    /// - `InvalidSparseStructure` if the row pointers are not a valid prefix
    ///   sum, a row's columns are not strictly increasing, or a value is zero
    pub fn from_parts(
        pool: &Pool<T>,
        rows: usize,
        cols: usize,
        row_ptrs: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        if row_ptrs.len() != rows + 1 {
            return Err(Error::size_mismatch(rows + 1, row_ptrs.len()));
        }
        if col_indices.len() != values.len() {
            return Err(Error::size_mismatch(values.len(), col_indices.len()));
        }
        if row_ptrs[0] != 0 || row_ptrs[rows] != values.len() {
            return Err(Error::InvalidSparseStructure {
                reason: "row pointers must start at 0 and end at nnz",
            });
        }
        if row_ptrs.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::InvalidSparseStructure {
                reason: "row pointers must be non-decreasing",
            });
        }
        if let Some(&c) = col_indices.iter().find(|&&c| c >= cols) {
            return Err(Error::IndexOutOfRange {
                index: c,
                size: cols,
            });
        }
        for w in row_ptrs.windows(2) {
            if col_indices[w[0]..w[1]].windows(2).any(|p| p[0] >= p[1]) {
                return Err(Error::InvalidSparseStructure {
                    reason: "column indices must be strictly increasing within a row",
                });
            }
        }
        if values.iter().any(|&v| v == T::zero()) {
            return Err(Error::InvalidSparseStructure {
                reason: "stored values must be non-zero",
            });
        }

        Ok(Self {
            rows,
            cols,
            row_ptrs,
            col_indices,
            values,
            pool: pool.clone(),
        })
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of positions (rows * cols)
    #[inline]
    pub fn size(&self) -> usize {
        self.rows * self.cols
    }

    /// Shape as [rows, cols]
    #[inline]
    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    /// Number of stored non-zeros
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Row pointers (length rows + 1)
    #[inline]
    pub fn row_ptrs(&self) -> &[usize] {
        &self.row_ptrs
    }

    /// Column index of each non-zero
    #[inline]
    pub fn col_indices(&self) -> &[usize] {
        &self.col_indices
    }

    /// Non-zero values in row-major visiting order
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// The pool dense results are allocated from
    #[inline]
    pub fn pool(&self) -> &Pool<T> {
        &self.pool
    }

    /// Index range of row `row` into `col_indices` / `values`
    #[inline]
    pub(crate) fn row_range(&self, row: usize) -> std::ops::Range<usize> {
        self.row_ptrs[row]..self.row_ptrs[row + 1]
    }

    /// Number of non-zeros in a row
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if `row >= rows`
    pub fn row_nnz(&self, row: usize) -> Result<usize> {
        if row >= self.rows {
            return Err(Error::IndexOutOfRange {
                index: row,
                size: self.rows,
            });
        }
        Ok(self.row_ptrs[row + 1] - self.row_ptrs[row])
    }

    /// Fraction of positions that are zero (1 for an empty shape)
    pub fn sparsity(&self) -> f64 {
        if self.size() == 0 {
            return 1.0;
        }
        1.0 - self.nnz() as f64 / self.size() as f64
    }

    /// Iterate the stored entries as (row, col, value) in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        (0..self.rows).flat_map(move |row| {
            self.row_range(row)
                .map(move |idx| (row, self.col_indices[idx], self.values[idx]))
        })
    }

    /// Element at (row, col)
    ///
    /// Scans the stored entries of `row`, so the cost grows with the row's
    /// density rather than being constant.
    pub fn at(&self, row: usize, col: usize) -> Result<T> {
        if row >= self.rows {
            return Err(Error::IndexOutOfRange {
                index: row,
                size: self.rows,
            });
        }
        if col >= self.cols {
            return Err(Error::IndexOutOfRange {
                index: col,
                size: self.cols,
            });
        }
        let range = self.row_range(row);
        Ok(self.col_indices[range.clone()]
            .iter()
            .position(|&c| c == col)
            .map_or(T::zero(), |pos| self.values[range.start + pos]))
    }

    /// Single-element writes are not supported on CSR storage
    ///
    /// # Errors
    ///
    /// Always `UnsupportedOperation`; rebuild a row with
    /// [`set_row`](Self::set_row) or the whole matrix with
    /// [`set_data`](Self::set_data) instead.
    pub fn set(&mut self, _row: usize, _col: usize, _value: T) -> Result<()> {
        Err(Error::unsupported("set", "sparse"))
    }

    /// Reshaping is not supported on CSR storage
    pub fn reshape(&mut self, _rows: usize, _cols: usize) -> Result<()> {
        Err(Error::unsupported("reshape", "sparse"))
    }

    /// Aliasing views are not supported on CSR storage
    pub fn view(&self, _rows: usize, _cols: usize) -> Result<Self> {
        Err(Error::unsupported("view", "sparse"))
    }

    /// Replace one row from its dense representation
    ///
    /// # Errors
    ///
    /// - `IndexOutOfRange` if `row >= rows`
    /// - `SizeMismatch` if `dense_row.len() != cols`
    pub fn set_row(&mut self, row: usize, dense_row: &[T]) -> Result<()> {
        if row >= self.rows {
            return Err(Error::IndexOutOfRange {
                index: row,
                size: self.rows,
            });
        }
        if dense_row.len() != self.cols {
            return Err(Error::size_mismatch(self.cols, dense_row.len()));
        }

        let (new_cols, new_vals): (Vec<usize>, Vec<T>) = dense_row
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != T::zero())
            .map(|(c, &v)| (c, v))
            .unzip();

        let range = self.row_range(row);
        let old_len = range.len();
        let new_len = new_vals.len();
        self.col_indices.splice(range.clone(), new_cols);
        self.values.splice(range, new_vals);
        for ptr in &mut self.row_ptrs[row + 1..] {
            *ptr = *ptr + new_len - old_len;
        }
        Ok(())
    }

    /// Diagonal entries, `min(rows, cols)` long; missing entries are zero
    pub fn diagonal(&self) -> Vec<T> {
        (0..self.rows.min(self.cols))
            .map(|i| {
                let range = self.row_range(i);
                self.col_indices[range.clone()]
                    .binary_search(&i)
                    .map_or(T::zero(), |pos| self.values[range.start + pos])
            })
            .collect()
    }
}

impl<T: Element> PartialEq for SparseMatrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape()
            && self.row_ptrs == other.row_ptrs
            && self.col_indices == other.col_indices
            && self.values == other.values
    }
}

impl<T: Element> std::fmt::Debug for SparseMatrix<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparseMatrix")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("row_ptrs", &self.row_ptrs)
            .field("col_indices", &self.col_indices)
            .field("values", &self.values)
            .finish()
    }
}
