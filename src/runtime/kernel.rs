//! Kernel construction: build-time handle, steps, barriers
//!
//! A kernel body is a sequence of steps. Barriers split the steps into
//! regions, and a backend must guarantee that every work-item of a work-group
//! has finished region `r` before any of them starts region `r + 1`:
//!
//! ```text
//! step(init) ── barrier ── step(process) ── step(flush)
//! └ region 0 ┘            └──────── region 1 ────────┘
//! ```
//!
//! Whether a barrier exists is decided while the kernel is built
//! ([`KernelBuilder::barrier_if`]), typically from associated `const`
//! capability flags of the strategies composed into it. Nothing about
//! synchronization is decided per work-item at run time.

use super::NdItem;
use super::local::LocalScope;
use crate::dtype::AtomicElement;

/// Build-time handle on which strategies declare their local memory needs.
///
/// The declared total becomes the kernel's local memory footprint and is
/// checked against the device before launch.
#[derive(Debug)]
pub struct Handler {
    name: &'static str,
    local_mem_bytes: usize,
}

impl Handler {
    /// Create a handle for a kernel named `name`
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            local_mem_bytes: 0,
        }
    }

    /// Declare `len` local cells of type `T`, returning the bytes reserved
    pub fn request_local<T: AtomicElement>(&mut self, len: usize) -> usize {
        let bytes = len * std::mem::size_of::<T>();
        self.local_mem_bytes += bytes;
        bytes
    }

    /// Total bytes of local memory declared so far
    #[inline]
    pub fn local_mem_bytes(&self) -> usize {
        self.local_mem_bytes
    }

    /// Kernel name
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

type Setup<'k, S> = Box<dyn Fn(&mut LocalScope) -> S + Sync + 'k>;
type Step<'k, S> = Box<dyn Fn(&NdItem<'_>, &S) + Sync + 'k>;

/// Builder assembling a [`Kernel`] from steps and barriers.
///
/// `S` is the work-group state created by `setup` when a work-group starts
/// (its local memory) and dropped when it ends.
pub struct KernelBuilder<'k, S> {
    handler: Handler,
    setup: Setup<'k, S>,
    regions: Vec<Vec<Step<'k, S>>>,
}

impl<'k, S> KernelBuilder<'k, S> {
    /// Start a kernel whose work-groups initialize their state with `setup`
    pub fn new(handler: Handler, setup: impl Fn(&mut LocalScope) -> S + Sync + 'k) -> Self {
        Self {
            handler,
            setup: Box::new(setup),
            regions: vec![Vec::new()],
        }
    }

    /// Append a step to the current region
    pub fn step(mut self, f: impl Fn(&NdItem<'_>, &S) + Sync + 'k) -> Self {
        if let Some(region) = self.regions.last_mut() {
            region.push(Box::new(f));
        }
        self
    }

    /// Emit a work-group barrier.
    ///
    /// Barriers with no step before them, or directly following another
    /// barrier, synchronize nothing and are dropped.
    pub fn barrier(mut self) -> Self {
        if self.regions.last().is_some_and(|r| !r.is_empty()) {
            self.regions.push(Vec::new());
        }
        self
    }

    /// Emit a barrier only if `sync` is true
    pub fn barrier_if(self, sync: bool) -> Self {
        if sync { self.barrier() } else { self }
    }

    /// Finish the kernel
    pub fn build(mut self) -> Kernel<'k, S> {
        if self.regions.len() > 1 && self.regions.last().is_some_and(|r| r.is_empty()) {
            self.regions.pop();
        }
        Kernel {
            name: self.handler.name,
            local_mem_bytes: self.handler.local_mem_bytes,
            setup: self.setup,
            regions: self.regions,
        }
    }
}

/// A compiled kernel body, ready for [`RuntimeClient::submit`](crate::runtime::RuntimeClient::submit).
pub struct Kernel<'k, S> {
    name: &'static str,
    local_mem_bytes: usize,
    setup: Setup<'k, S>,
    regions: Vec<Vec<Step<'k, S>>>,
}

impl<'k, S> Kernel<'k, S> {
    /// Kernel name, used in diagnostics
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Local memory one work-group of this kernel needs, in bytes
    #[inline]
    pub fn local_mem_bytes(&self) -> usize {
        self.local_mem_bytes
    }

    /// Number of barriers every work-group executes
    #[inline]
    pub fn barrier_count(&self) -> usize {
        self.regions.len().saturating_sub(1)
    }

    pub(crate) fn setup(&self, scope: &mut LocalScope) -> S {
        (self.setup)(scope)
    }

    pub(crate) fn regions(&self) -> impl Iterator<Item = &[Step<'k, S>]> + '_ {
        self.regions.iter().map(Vec::as_slice)
    }
}

/// What a completed launch did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LaunchReport {
    /// Work-groups executed
    pub groups: usize,
    /// Work-items executed
    pub work_items: usize,
    /// Barriers executed by each work-group
    pub barriers_per_group: usize,
    /// Device-scope atomic operations issued
    pub device_atomics: u64,
    /// Work-group-scope atomic operations issued
    pub local_atomics: u64,
}

impl LaunchReport {
    /// Combine the reports of two disjoint sets of work-groups
    pub fn merge(self, other: Self) -> Self {
        Self {
            groups: self.groups + other.groups,
            work_items: self.work_items + other.work_items,
            barriers_per_group: self.barriers_per_group.max(other.barriers_per_group),
            device_atomics: self.device_atomics + other.device_atomics,
            local_atomics: self.local_atomics + other.local_atomics,
        }
    }
}
