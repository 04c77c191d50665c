//! Dense row-major matrices
//!
//! A [`DenseMatrix`] stores `rows * cols` elements contiguously in row-major
//! order. Storage is reference counted: [`DenseMatrix::view`] hands out a
//! matrix with different dimensions over the same buffer, and writes through
//! either handle are visible through the other.
//!
//! Results of arithmetic are acquired from the receiver's [`Pool`](crate::pool::Pool),
//! and the buffers go back to it when the last handle is dropped.
//!
//! # Elementwise shape rules
//!
//! Binary elementwise operations accept an operand when, checked in order:
//!
//! 1. both shapes are identical
//! 2. the operand is a column vector with as many rows as the receiver
//!    (broadcast across the receiver's columns)
//! 3. both are vectors (row or column, orientation may differ) with the same
//!    element count
//!
//! The result always has the receiver's shape.

mod core;
mod elementwise;
mod matmul;
mod reduce;
mod scalar;
mod transpose;

pub use core::DenseMatrix;
pub(crate) use core::element_count;
pub use matmul::PARALLEL_THRESHOLD;
