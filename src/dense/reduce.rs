//! Dense reductions and clipping

use super::DenseMatrix;
use crate::dtype::Element;

impl<T: Element> DenseMatrix<T> {
    /// Sum of all elements
    pub fn sum(&self) -> T {
        self.read().iter().fold(T::zero(), |acc, &v| acc + v)
    }

    /// Mean of all elements (NaN for an empty matrix)
    pub fn mean(&self) -> T {
        self.sum() / T::from_f64(self.size() as f64)
    }

    /// Frobenius norm: sqrt(sum of squares)
    pub fn norm(&self) -> T {
        self.read()
            .iter()
            .fold(T::zero(), |acc, &v| acc + v * v)
            .sqrt()
    }

    /// Largest element, `None` for an empty matrix
    pub fn max(&self) -> Option<T> {
        self.read().iter().copied().reduce(T::max)
    }

    /// Smallest element, `None` for an empty matrix
    pub fn min(&self) -> Option<T> {
        self.read().iter().copied().reduce(T::min)
    }

    /// (row, col) of the first largest element, `None` for an empty matrix
    pub fn argmax(&self) -> Option<(usize, usize)> {
        let data = self.read();
        let mut best: Option<(usize, T)> = None;
        for (i, &v) in data.iter().enumerate() {
            match best {
                Some((_, b)) if v <= b => {}
                _ => best = Some((i, v)),
            }
        }
        best.map(|(i, _)| (i / self.cols, i % self.cols))
    }

    /// Clamp every element into `[min, max]`
    pub fn clip(&self, min: T, max: T) -> Self {
        self.apply(|v| v.max(min).min(max))
    }

    /// In-place variant of [`clip`](Self::clip)
    pub fn clip_in_place(&mut self, min: T, max: T) {
        self.apply_in_place(|v| v.max(min).min(max));
    }
}
