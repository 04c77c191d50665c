//! Dense element-wise binary operations: add, sub, prod, div, maximum, minimum

use super::DenseMatrix;
use crate::dtype::Element;
use crate::error::{Error, Result};

/// Which shape compatibility rule admitted an elementwise operand
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Broadcast {
    /// Identical shapes
    Exact,
    /// Operand is a column vector matching the receiver's row count
    Column,
    /// Both are vectors with the same number of elements
    Vector,
}

impl Broadcast {
    /// Resolve the rule for `lhs op rhs`, checking the rules in order
    pub(crate) fn resolve(op: &'static str, lhs: [usize; 2], rhs: [usize; 2]) -> Result<Self> {
        let is_vector = |s: [usize; 2]| s[0] == 1 || s[1] == 1;
        if lhs == rhs {
            Ok(Self::Exact)
        } else if rhs[1] == 1 && rhs[0] == lhs[0] {
            Ok(Self::Column)
        } else if is_vector(lhs) && is_vector(rhs) && lhs[0] * lhs[1] == rhs[0] * rhs[1] {
            Ok(Self::Vector)
        } else {
            Err(Error::dimension_mismatch(op, lhs, rhs))
        }
    }
}

/// out[i] = f(lhs[i], rhs[...]) under the given rule
#[inline]
fn zip_into<T: Element>(
    rule: Broadcast,
    cols: usize,
    lhs: &[T],
    rhs: &[T],
    out: &mut [T],
    f: impl Fn(T, T) -> T,
) {
    match rule {
        Broadcast::Exact | Broadcast::Vector => {
            for ((o, &a), &b) in out.iter_mut().zip(lhs).zip(rhs) {
                *o = f(a, b);
            }
        }
        Broadcast::Column => {
            if cols == 0 {
                return;
            }
            for ((out_row, lhs_row), &b) in out.chunks_mut(cols).zip(lhs.chunks(cols)).zip(rhs) {
                for (o, &a) in out_row.iter_mut().zip(lhs_row) {
                    *o = f(a, b);
                }
            }
        }
    }
}

/// lhs[i] = f(lhs[i], rhs[...]) under the given rule
#[inline]
fn zip_in_place<T: Element>(
    rule: Broadcast,
    cols: usize,
    lhs: &mut [T],
    rhs: &[T],
    f: impl Fn(T, T) -> T,
) {
    match rule {
        Broadcast::Exact | Broadcast::Vector => {
            for (a, &b) in lhs.iter_mut().zip(rhs) {
                *a = f(*a, b);
            }
        }
        Broadcast::Column => {
            if cols == 0 {
                return;
            }
            for (row, &b) in lhs.chunks_mut(cols).zip(rhs) {
                for a in row {
                    *a = f(*a, b);
                }
            }
        }
    }
}

impl<T: Element> DenseMatrix<T> {
    pub(crate) fn zip_with(
        &self,
        other: &Self,
        op: &'static str,
        f: impl Fn(T, T) -> T,
    ) -> Result<Self> {
        let rule = Broadcast::resolve(op, self.shape(), other.shape())?;
        let out = self.pool.acquire(self.rows, self.cols);
        zip_into(rule, self.cols, &self.read(), &other.read(), &mut out.write(), f);
        Ok(out)
    }

    pub(crate) fn zip_with_in_place(
        &mut self,
        other: &Self,
        op: &'static str,
        f: impl Fn(T, T) -> T,
    ) -> Result<()> {
        let rule = Broadcast::resolve(op, self.shape(), other.shape())?;
        if self.shares_storage(other) {
            // Cannot hold a read guard on the buffer we are about to write
            let rhs = other.to_vec();
            zip_in_place(rule, self.cols, &mut self.write(), &rhs, f);
        } else {
            zip_in_place(rule, self.cols, &mut self.write(), &other.read(), f);
        }
        Ok(())
    }
}

macro_rules! elementwise_binary {
    ($($(#[$doc:meta])* $name:ident => $f:expr;)*) => {
        paste::paste! {
            impl<T: Element> DenseMatrix<T> {
                $(
                    $(#[$doc])*
                    ///
                    /// # Errors
                    ///
                    /// `DimensionMismatch` if no elementwise shape rule admits `other`
                    pub fn $name(&self, other: &Self) -> Result<Self> {
                        self.zip_with(other, stringify!($name), $f)
                    }

                    #[doc = concat!("In-place variant of [`", stringify!($name), "`](Self::", stringify!($name), ").")]
                    ///
                    /// The shape check happens before any element is written.
                    pub fn [<$name _in_place>](&mut self, other: &Self) -> Result<()> {
                        self.zip_with_in_place(other, stringify!($name), $f)
                    }
                )*
            }
        }
    };
}

elementwise_binary! {
    /// Element-wise addition: C = A + B
    add => |a, b| a + b;
    /// Element-wise subtraction: C = A - B
    sub => |a, b| a - b;
    /// Element-wise (Hadamard) product: C = A .* B
    prod => |a, b| a * b;
    /// Element-wise division: C = A ./ B
    ///
    /// Division by zero follows IEEE 754 and yields infinities or NaN.
    div => |a, b| a / b;
    /// Element-wise maximum
    maximum => |a, b| a.max(b);
    /// Element-wise minimum
    minimum => |a, b| a.min(b);
}
