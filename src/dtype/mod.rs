//! Data type system for histogram samples and accumulator cells
//!
//! `DType` is the runtime tag used by the validation layer; `Element`,
//! `AtomicElement` and `HistElement` connect it to Rust's type system for the
//! kernels.

mod atomic;
mod element;
mod hist;

pub use atomic::{AtomicElement, MemoryScope};
pub use element::Element;
pub use hist::HistElement;

use std::fmt;

/// Element types that samples, edges, weights and histogram cells may have.
///
/// Discriminants are stable and never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum DType {
    // Floating point types
    /// 64-bit floating point
    F64 = 0,
    /// 32-bit floating point
    F32 = 1,

    // Integer types
    /// 64-bit signed integer
    I64 = 10,
    /// 32-bit signed integer
    I32 = 11,

    // Unsigned integer types
    /// 64-bit unsigned integer
    U64 = 20,
    /// 32-bit unsigned integer
    U32 = 21,
}

impl DType {
    /// Size of one element in bytes
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Self::F64 | Self::I64 | Self::U64 => 8,
            Self::F32 | Self::I32 | Self::U32 => 4,
        }
    }

    /// Returns true if this is a floating point type
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F64 | Self::F32)
    }

    /// Returns true if this is a signed integer type
    #[inline]
    pub const fn is_signed_int(self) -> bool {
        matches!(self, Self::I64 | Self::I32)
    }

    /// Returns true if this is an unsigned integer type
    #[inline]
    pub const fn is_unsigned_int(self) -> bool {
        matches!(self, Self::U64 | Self::U32)
    }

    /// Returns true if this is any integer type (signed or unsigned)
    #[inline]
    pub const fn is_int(self) -> bool {
        self.is_signed_int() || self.is_unsigned_int()
    }

    /// Returns true if this type can represent negative values
    #[inline]
    pub const fn is_signed(self) -> bool {
        self.is_float() || self.is_signed_int()
    }

    /// Dtype of the per-work-group local replica for a histogram of this dtype.
    ///
    /// Mirrors [`HistElement::Local`]: 64-bit integer cells are accumulated
    /// in 32-bit local cells, everything else keeps its own type.
    #[inline]
    pub const fn hist_local_dtype(self) -> Self {
        match self {
            Self::U64 => Self::U32,
            Self::I64 => Self::I32,
            other => other,
        }
    }

    /// Short name for display (e.g., "f32", "i64")
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::F64 => "f64",
            Self::F32 => "f32",
            Self::I64 => "i64",
            Self::I32 => "i32",
            Self::U64 => "u64",
            Self::U32 => "u32",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}
