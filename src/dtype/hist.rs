//! Histogram cell types and their local-replica accumulator types

use super::AtomicElement;

/// Types that can be histogram cells.
///
/// `Local` is the element type of the per-work-group replicas. Some device
/// atomic instruction sets have no efficient 64-bit add, so 64-bit integer
/// histograms accumulate in 32-bit local cells and are widened once, when the
/// work-group flushes its replicas to device memory:
///
/// | Histogram cell | Local replica cell |
/// |----------------|--------------------|
/// | `u64`          | `u32`              |
/// | `i64`          | `i32`              |
/// | anything else  | same type          |
///
/// This is an atomic-width workaround, not a precision choice. The partial
/// sum of one bin within one work-group must fit the narrow cell, so narrowed
/// replicas only ever hold unweighted counts of at most `i32::MAX` samples.
pub trait HistElement: AtomicElement {
    /// Element type of local histogram replicas
    type Local: AtomicElement;

    /// Whether `Local` is narrower than the histogram cell
    const NARROWS: bool = std::mem::size_of::<Self::Local>() < std::mem::size_of::<Self>();

    /// Convert a per-sample value to the local accumulator type
    fn narrow(self) -> Self::Local;

    /// Lossless conversion of a local partial sum back to the cell type
    fn widen(local: Self::Local) -> Self;
}

macro_rules! impl_hist_element {
    ($($t:ty => $local:ty),* $(,)?) => {
        $(
            impl HistElement for $t {
                type Local = $local;

                #[inline]
                fn narrow(self) -> Self::Local {
                    self as $local
                }

                #[inline]
                fn widen(local: Self::Local) -> Self {
                    local as $t
                }
            }
        )*
    };
}

impl_hist_element!(
    u64 => u32,
    i64 => i32,
    u32 => u32,
    i32 => i32,
    f32 => f32,
    f64 => f64,
);
