//! CSR transpose by counting sort over column indices

use super::core::SparseMatrix;
use crate::dtype::Element;

impl<T: Element> SparseMatrix<T> {
    /// Transpose, returning a new CSR matrix of shape (cols, rows)
    ///
    /// Rows are visited in order, so column indices within each output row
    /// come out sorted without a separate sort pass.
    pub fn t(&self) -> Self {
        let nnz = self.nnz();

        let mut col_counts = vec![0usize; self.cols];
        for &col in &self.col_indices {
            col_counts[col] += 1;
        }

        let mut row_ptrs = vec![0usize; self.cols + 1];
        for col in 0..self.cols {
            row_ptrs[col + 1] = row_ptrs[col] + col_counts[col];
        }

        let mut col_indices = vec![0usize; nnz];
        let mut values = vec![T::zero(); nnz];
        let mut positions = row_ptrs[..self.cols].to_vec();

        for row in 0..self.rows {
            for idx in self.row_range(row) {
                let col = self.col_indices[idx];
                let pos = positions[col];
                col_indices[pos] = row;
                values[pos] = self.values[idx];
                positions[col] += 1;
            }
        }

        Self {
            rows: self.cols,
            cols: self.rows,
            row_ptrs,
            col_indices,
            values,
            pool: self.pool.clone(),
        }
    }
}
