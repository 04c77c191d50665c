//! Dense scalar operations and element-wise maps

use super::DenseMatrix;
use crate::dtype::Element;

impl<T: Element> DenseMatrix<T> {
    /// Apply `f` to every element, returning a new matrix
    pub fn apply(&self, f: impl Fn(T) -> T) -> Self {
        let out = self.pool.acquire(self.rows, self.cols);
        for (o, &a) in out.write().iter_mut().zip(self.read().iter()) {
            *o = f(a);
        }
        out
    }

    /// Apply `f` to every element in place
    pub fn apply_in_place(&mut self, f: impl Fn(T) -> T) {
        for a in self.write().iter_mut() {
            *a = f(*a);
        }
    }

    /// Apply a parameterised function `f(x, alpha)` to every element
    ///
    /// Used for activations such as leaky ReLU or ELU that take a slope.
    pub fn apply_with_alpha(&self, f: impl Fn(T, T) -> T, alpha: T) -> Self {
        self.apply(|a| f(a, alpha))
    }
}

macro_rules! scalar_ops {
    ($($(#[$doc:meta])* $name:ident => $op:tt;)*) => {
        paste::paste! {
            impl<T: Element> DenseMatrix<T> {
                $(
                    $(#[$doc])*
                    pub fn $name(&self, n: T) -> Self {
                        self.apply(|a| a $op n)
                    }

                    #[doc = concat!("In-place variant of [`", stringify!($name), "`](Self::", stringify!($name), ").")]
                    pub fn [<$name _in_place>](&mut self, n: T) {
                        self.apply_in_place(|a| a $op n)
                    }
                )*
            }
        }
    };
}

scalar_ops! {
    /// Add `n` to every element
    add_scalar => +;
    /// Subtract `n` from every element
    sub_scalar => -;
    /// Multiply every element by `n`
    prod_scalar => *;
    /// Divide every element by `n`
    div_scalar => /;
}
