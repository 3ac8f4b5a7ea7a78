//! Bounds check and the bin-lookup contract

use crate::dtype::Element;
use crate::runtime::{LocalScope, NdItem};

/// True iff `val` lies in `[min, max]` and is not NaN.
///
/// Both ends are inclusive: the comparisons are `!(val < min)` and
/// `!(max < val)`. NaN fails no ordering comparison, so it is rejected
/// explicitly.
#[inline]
pub fn check_in_bounds<T: Element>(val: T, min: T, max: T) -> bool {
    !(val < min) && !(max < val) && !val.is_nan()
}

/// Maps samples to bins.
///
/// A lookup may stage data in local memory; it follows the same
/// `alloc_local` / `init` protocol as the other strategies, and its bounds are
/// fetched once per work-item after the init barrier.
pub trait BinLookup<T: Element>: Sync {
    /// Whether a work-group barrier is required after `init`
    const SYNC_AFTER_INIT: bool;

    /// Work-group local state
    type Local;

    /// Bounds object handed back to `in_bounds` and `get_bin`
    type Bounds<'l>
    where
        Self: 'l;

    /// Bytes of local memory `alloc_local` takes per work-group
    fn local_mem_bytes(&self) -> usize;

    /// Allocate this policy's local memory when a work-group starts
    fn alloc_local(&self, scope: &mut LocalScope) -> Self::Local;

    /// Per-work-group preparation, executed by every work-item
    fn init(&self, item: &NdItem<'_>, local: &Self::Local);

    /// Fetch the bounds
    fn get_bounds<'l>(&'l self, local: &'l Self::Local) -> Self::Bounds<'l>;

    /// Whether every coordinate of `sample` is in bounds, per [`check_in_bounds`]
    fn in_bounds<'l>(&'l self, sample: &[T], bounds: &Self::Bounds<'l>) -> bool;

    /// Bin of an in-bounds `sample`, in `[0, bins_count())`
    fn get_bin<'l>(&'l self, item: &NdItem<'_>, sample: &[T], bounds: &Self::Bounds<'l>) -> usize;

    /// Number of bins
    fn bins_count(&self) -> usize;

    /// Number of coordinates per sample
    fn dims(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inclusive_bounds() {
        assert!(check_in_bounds(0.0f64, 0.0, 1.0));
        assert!(check_in_bounds(1.0f64, 0.0, 1.0));
        assert!(!check_in_bounds(1.0000001f64, 0.0, 1.0));
        assert!(!check_in_bounds(-0.5f32, 0.0, 1.0));
        assert!(check_in_bounds(5u32, 5, 5));
        assert!(!check_in_bounds(-3i64, -2, 2));
    }

    #[test]
    fn test_nan_never_in_bounds() {
        assert!(!check_in_bounds(f64::NAN, f64::NEG_INFINITY, f64::INFINITY));
        assert!(!check_in_bounds(f32::NAN, 0.0, 1.0));
    }
}
