//! Histogram accumulator strategies
//!
//! Per work-group protocol: `init` → barrier if `SYNC_AFTER_INIT` → any number
//! of `add` → barrier if `SYNC_BEFORE_FINALIZE` → `finalize`.

use crate::dtype::{HistElement, MemoryScope};
use crate::error::{Error, Result};
use crate::runtime::{AtomicBuffer, Handler, LocalArray, LocalScope, NdItem};

/// Accumulation target of a histogram kernel.
pub trait HistogramAccumulator<T: HistElement>: Sync {
    /// Whether a work-group barrier is required after `init`
    const SYNC_AFTER_INIT: bool;

    /// Whether a work-group barrier is required before `finalize`
    const SYNC_BEFORE_FINALIZE: bool;

    /// Work-group local state
    type Local;

    /// Bytes of local memory `alloc_local` takes per work-group
    fn local_mem_bytes(&self) -> usize;

    /// Allocate this strategy's local memory when a work-group starts
    fn alloc_local(&self, scope: &mut LocalScope) -> Self::Local;

    /// Per-work-group preparation, executed by every work-item
    fn init(&self, item: &NdItem<'_>, local: &Self::Local);

    /// Add `value` to bin `bin`
    fn add(&self, item: &NdItem<'_>, local: &Self::Local, bin: usize, value: T);

    /// Publish the work-group's contribution, executed by every work-item
    fn finalize(&self, item: &NdItem<'_>, local: &Self::Local);
}

/// Accumulate straight into device memory with device-scope atomics.
///
/// Cheapest when bins are many and collisions rare, or when the histogram
/// does not fit local memory at all.
#[derive(Debug)]
pub struct HistGlobalMemory<'a, T: HistElement> {
    global: &'a [T::Atomic],
}

impl<'a, T: HistElement> HistGlobalMemory<'a, T> {
    /// Accumulate into `global`
    pub fn new(global: &'a AtomicBuffer<T>) -> Self {
        Self {
            global: global.cells(),
        }
    }
}

impl<T: HistElement> HistogramAccumulator<T> for HistGlobalMemory<'_, T> {
    const SYNC_AFTER_INIT: bool = false;
    const SYNC_BEFORE_FINALIZE: bool = false;

    type Local = ();

    fn local_mem_bytes(&self) -> usize {
        0
    }

    fn alloc_local(&self, _scope: &mut LocalScope) -> Self::Local {}

    fn init(&self, _item: &NdItem<'_>, _local: &Self::Local) {}

    #[inline]
    fn add(&self, item: &NdItem<'_>, _local: &Self::Local, bin: usize, value: T) {
        item.atomic_add::<T>(&self.global[bin], value, MemoryScope::Device);
    }

    fn finalize(&self, _item: &NdItem<'_>, _local: &Self::Local) {}
}

/// Accumulate into `copies_count` replicas of the histogram in local memory,
/// then flush each non-zero bin to device memory once per work-group.
///
/// Work-item `l` adds into replica `l % copies_count`, spreading contention
/// over the replicas. Replicas use [`HistElement::Local`] cells, narrower
/// than `T` for 64-bit integer histograms, and are widened at the flush.
#[derive(Debug)]
pub struct HistWithLocalCopies<'a, T: HistElement> {
    global: &'a [T::Atomic],
    copies_count: usize,
}

impl<'a, T: HistElement> HistWithLocalCopies<'a, T> {
    /// Accumulate into `global` through `copies_count` local replicas,
    /// declaring their local memory on `handler`
    pub fn new(global: &'a AtomicBuffer<T>, copies_count: u32, handler: &mut Handler) -> Result<Self> {
        if copies_count == 0 {
            return Err(Error::invalid_argument(
                "copies_count",
                "at least one local histogram copy is required",
            ));
        }
        let copies_count = copies_count as usize;
        handler.request_local::<T::Local>(copies_count * global.len());
        Ok(Self {
            global: global.cells(),
            copies_count,
        })
    }

    /// Number of local replicas
    #[inline]
    pub fn copies_count(&self) -> usize {
        self.copies_count
    }

    /// Number of bins
    #[inline]
    pub fn bins_count(&self) -> usize {
        self.global.len()
    }
}

impl<T: HistElement> HistogramAccumulator<T> for HistWithLocalCopies<'_, T> {
    const SYNC_AFTER_INIT: bool = true;
    const SYNC_BEFORE_FINALIZE: bool = true;

    type Local = LocalArray<T::Local>;

    fn local_mem_bytes(&self) -> usize {
        self.copies_count * self.bins_count() * std::mem::size_of::<T::Local>()
    }

    fn alloc_local(&self, scope: &mut LocalScope) -> Self::Local {
        scope.alloc::<T::Local>(self.copies_count, self.bins_count())
    }

    fn init(&self, item: &NdItem<'_>, local: &Self::Local) {
        for i in (item.local_id()..local.len()).step_by(item.local_range()) {
            local.store(i, <T::Local as crate::dtype::Element>::zero());
        }
    }

    #[inline]
    fn add(&self, item: &NdItem<'_>, local: &Self::Local, bin: usize, value: T) {
        let copy = if self.copies_count == 1 {
            0
        } else {
            item.local_id() % self.copies_count
        };
        item.atomic_add::<T::Local>(
            local.cell_at(copy, bin),
            value.narrow(),
            MemoryScope::WorkGroup,
        );
    }

    fn finalize(&self, item: &NdItem<'_>, local: &Self::Local) {
        for bin in (item.local_id()..self.bins_count()).step_by(item.local_range()) {
            let mut value = T::widen(local.load_at(0, bin));
            for copy in 1..self.copies_count {
                value = value + T::widen(local.load_at(copy, bin));
            }
            if value != T::zero() {
                item.atomic_add::<T>(&self.global[bin], value, MemoryScope::Device);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_copies_declare_narrow_cells() {
        let out = AtomicBuffer::<u64>::zeros(10);
        let mut handler = Handler::new("t");
        let hist = HistWithLocalCopies::new(&out, 4, &mut handler).unwrap();
        assert_eq!(hist.copies_count(), 4);
        // 4 copies x 10 bins x 4-byte u32 local cells
        assert_eq!(handler.local_mem_bytes(), 160);
        assert_eq!(hist.local_mem_bytes(), 160);
        assert_eq!(HistGlobalMemory::new(&out).local_mem_bytes(), 0);
    }

    #[test]
    fn test_zero_copies_rejected() {
        let out = AtomicBuffer::<f32>::zeros(3);
        let mut handler = Handler::new("t");
        assert!(HistWithLocalCopies::new(&out, 0, &mut handler).is_err());
        assert_eq!(handler.local_mem_bytes(), 0);
    }

    #[test]
    fn test_capability_flags() {
        assert!(!<HistGlobalMemory<'_, u64> as HistogramAccumulator<u64>>::SYNC_AFTER_INIT);
        assert!(!<HistGlobalMemory<'_, u64> as HistogramAccumulator<u64>>::SYNC_BEFORE_FINALIZE);
        assert!(<HistWithLocalCopies<'_, u64> as HistogramAccumulator<u64>>::SYNC_AFTER_INIT);
        assert!(<HistWithLocalCopies<'_, u64> as HistogramAccumulator<u64>>::SYNC_BEFORE_FINALIZE);
    }
}
