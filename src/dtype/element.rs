//! Element trait for mapping Rust types to DType

use super::DType;
use bytemuck::{Pod, Zeroable};
use std::fmt::Debug;
use std::ops::{Add, Sub};

/// Trait for types that can be samples, edges, weights or histogram cells
///
/// # Bounds
/// - `Copy + Send + Sync + 'static` - values are shared by every work-item
/// - `Pod + Zeroable` - device buffers are plain memory (bytemuck)
/// - `Add + Sub` - accumulation and bin arithmetic (Output = Self)
/// - `PartialOrd` - the strict less-than comparator used for bounds checks
pub trait Element:
    Copy
    + Clone
    + Debug
    + Send
    + Sync
    + Pod
    + Zeroable
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + PartialOrd
{
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Convert to f64 for generic numeric operations
    fn to_f64(self) -> f64;

    /// Convert from f64 to this type (saturating for integers)
    fn from_f64(v: f64) -> Self;

    /// Exact widening for integers; floats truncate toward zero and saturate
    fn to_i128(self) -> i128;

    /// Zero value
    fn zero() -> Self;

    /// One value
    fn one() -> Self;

    /// True if the value is NaN. Integers are never NaN.
    #[inline]
    fn is_nan(self) -> bool {
        false
    }
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

    #[inline]
    fn to_i128(self) -> i128 {
        self as i128
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }

    #[inline]
    fn is_nan(self) -> bool {
        f64::is_nan(self)
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

    #[inline]
    fn to_i128(self) -> i128 {
        self as i128
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }

    #[inline]
    fn is_nan(self) -> bool {
        f32::is_nan(self)
    }
}

macro_rules! impl_int_element {
    ($($t:ty => $dtype:ident),* $(,)?) => {
        $(
            impl Element for $t {
                const DTYPE: DType = DType::$dtype;

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn from_f64(v: f64) -> Self {
                    v as $t
                }

                #[inline]
                fn to_i128(self) -> i128 {
                    self as i128
                }

                #[inline]
                fn zero() -> Self {
                    0
                }

                #[inline]
                fn one() -> Self {
                    1
                }
            }
        )*
    };
}

impl_int_element!(i64 => I64, i32 => I32, u64 => U64, u32 => U32);
