//! Dense transpose

use super::DenseMatrix;
use crate::dtype::Element;

impl<T: Element> DenseMatrix<T> {
    /// Transpose into a new cols x rows matrix
    ///
    /// The source is walked in row-major order while the destination index
    /// advances by the destination row length (the source row count),
    /// wrapping back by `len - 1` whenever it runs past the end.
    pub fn t(&self) -> Self {
        let out = self.pool.acquire(self.cols, self.rows);
        {
            let src = self.read();
            let mut dst = out.write();
            let len = src.len();
            let stride = self.rows;
            let mut idx = 0;
            for &v in src.iter() {
                dst[idx] = v;
                idx += stride;
                if idx >= len {
                    idx -= len - 1;
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Pool;

    #[test]
    fn test_transpose_rect() {
        let pool = Pool::<f32>::new();
        let a = DenseMatrix::from_slice(&pool, 2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let t = a.t();
        assert_eq!(t.shape(), [3, 2]);
        assert_eq!(t.to_vec(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        assert_eq!(t.t(), a);
    }

    #[test]
    fn test_transpose_vectors_and_empty() {
        let pool = Pool::<f32>::new();
        let row = DenseMatrix::from_slice(&pool, 1, 3, &[1.0, 2.0, 3.0]).unwrap();
        let col = row.t();
        assert_eq!(col.shape(), [3, 1]);
        assert_eq!(col.to_vec(), vec![1.0, 2.0, 3.0]);

        let single = DenseMatrix::from_slice(&pool, 1, 1, &[5.0]).unwrap();
        assert_eq!(single.t().to_vec(), vec![5.0]);

        let empty = pool.acquire(0, 4);
        assert_eq!(empty.t().shape(), [4, 0]);
        assert_eq!(empty.t().t().shape(), [0, 4]);
    }

    #[test]
    fn test_transpose_square() {
        let pool = Pool::<f32>::new();
        let data: Vec<f32> = (0..16).map(|i| i as f32).collect();
        let a = DenseMatrix::from_slice(&pool, 4, 4, &data).unwrap();
        let t = a.t();
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(t.at(j, i).unwrap(), a.at(i, j).unwrap());
            }
        }
    }
}
