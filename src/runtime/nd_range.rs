//! Launch geometry and the per-work-item execution context

use crate::dtype::{AtomicElement, MemoryScope};
use crate::error::{Error, Result};
use std::cell::Cell;

/// One-dimensional launch geometry: `global` work-items split into
/// work-groups of `local` work-items each.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NdRange {
    global: usize,
    local: usize,
}

impl NdRange {
    /// Create a geometry. `global` must be a non-zero multiple of `local`.
    pub fn new(global: usize, local: usize) -> Result<Self> {
        if local == 0 {
            return Err(Error::invalid_argument(
                "nd_range",
                "work-group size must be positive",
            ));
        }
        if global == 0 || global % local != 0 {
            return Err(Error::invalid_argument(
                "nd_range",
                format!(
                    "global size {} must be a non-zero multiple of work-group size {}",
                    global, local
                ),
            ));
        }
        Ok(Self { global, local })
    }

    /// Geometry covering `size` samples when every work-item processes
    /// `work_per_item` of them and work-groups hold `local` work-items.
    ///
    /// Always launches at least one work-group, so an empty sample still runs
    /// the kernel's init/finalize protocol.
    pub fn for_samples(size: usize, work_per_item: u32, local: usize) -> Result<Self> {
        if work_per_item == 0 {
            return Err(Error::invalid_argument(
                "work_per_item",
                "each work-item must process at least one sample",
            ));
        }
        if local == 0 {
            return Err(Error::invalid_argument(
                "nd_range",
                "work-group size must be positive",
            ));
        }
        let samples_per_group = work_per_item as usize * local;
        let groups = size.div_ceil(samples_per_group).max(1);
        Self::new(groups * local, local)
    }

    /// Total number of work-items
    #[inline]
    pub fn global(&self) -> usize {
        self.global
    }

    /// Work-items per work-group
    #[inline]
    pub fn local(&self) -> usize {
        self.local
    }

    /// Number of work-groups
    #[inline]
    pub fn groups(&self) -> usize {
        self.global / self.local
    }
}

/// Atomic traffic issued by the work-items of one work-group.
#[derive(Debug, Default)]
pub(crate) struct GroupCounters {
    device_atomics: Cell<u64>,
    local_atomics: Cell<u64>,
}

impl GroupCounters {
    pub(crate) fn device_atomics(&self) -> u64 {
        self.device_atomics.get()
    }

    pub(crate) fn local_atomics(&self) -> u64 {
        self.local_atomics.get()
    }
}

/// Execution context of one work-item.
///
/// Handed to every step of a kernel. It identifies the work-item inside the
/// launch and is the only way strategies issue atomic operations.
pub struct NdItem<'g> {
    group_id: usize,
    local_id: usize,
    local_range: usize,
    group_range: usize,
    counters: &'g GroupCounters,
}

impl<'g> NdItem<'g> {
    pub(crate) fn new(
        group_id: usize,
        local_id: usize,
        local_range: usize,
        group_range: usize,
        counters: &'g GroupCounters,
    ) -> Self {
        debug_assert!(local_id < local_range);
        debug_assert!(group_id < group_range);
        Self {
            group_id,
            local_id,
            local_range,
            group_range,
            counters,
        }
    }

    /// Linear id of this work-item's work-group
    #[inline]
    pub fn group_id(&self) -> usize {
        self.group_id
    }

    /// Linear id of this work-item inside its work-group
    #[inline]
    pub fn local_id(&self) -> usize {
        self.local_id
    }

    /// Number of work-items in a work-group
    #[inline]
    pub fn local_range(&self) -> usize {
        self.local_range
    }

    /// Number of work-groups in the launch
    #[inline]
    pub fn group_range(&self) -> usize {
        self.group_range
    }

    /// Linear id of this work-item in the whole launch
    #[inline]
    pub fn global_id(&self) -> usize {
        self.group_id * self.local_range + self.local_id
    }

    /// Relaxed atomic add of `value` into `cell` at the given scope.
    ///
    /// Returns the previous value of the cell.
    #[inline]
    pub fn atomic_add<T: AtomicElement>(
        &self,
        cell: &T::Atomic,
        value: T,
        scope: MemoryScope,
    ) -> T {
        let counter = match scope {
            MemoryScope::Device => &self.counters.device_atomics,
            MemoryScope::WorkGroup => &self.counters.local_atomics,
        };
        counter.set(counter.get() + 1);
        T::atomic_add(cell, value)
    }
}
