//! Element trait for mapping Rust types to DType

use super::DType;
use bytemuck::{Pod, Zeroable};
use num_traits::Float;
use std::fmt::{Debug, Display};

/// Trait for types that can be elements of a matrix
///
/// This trait connects Rust's type system to matx's runtime dtype tag.
/// It's implemented for `f32` and `f64`.
///
/// # Bounds
/// - `Copy + Send + Sync + 'static` - Basic trait requirements; pools hand
///   buffers across threads
/// - `Pod + Zeroable` - Safe byte views of raw payloads (bytemuck)
/// - `Float` - Arithmetic, `abs`, `sqrt`, `max`/`min` (num-traits)
/// - `Debug + Display` - String rendering
pub trait Element:
    Float + Pod + Zeroable + Send + Sync + Debug + Display + Default + 'static
{
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Convert to f64 for generic numeric operations
    fn to_f64(self) -> f64;

    /// Convert from f64 to this type
    fn from_f64(v: f64) -> Self;
}

impl Element for f64 {
    const DTYPE: DType = DType::F64;

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }
}
