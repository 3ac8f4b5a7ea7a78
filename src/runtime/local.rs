//! Work-group local memory
//!
//! Local memory is handed out by the runtime when a work-group starts and is
//! released when it ends. Strategies never own it beyond that: the arrays are
//! created from a `LocalScope` that only exists inside one work-group's frame.

use crate::dtype::AtomicElement;

/// Per-work-group local memory arena.
///
/// Its capacity is the byte footprint the kernel declared on its
/// [`Handler`](crate::runtime::Handler); allocating beyond it is a defect in
/// the strategy that did not declare its usage.
#[derive(Debug)]
pub struct LocalScope {
    capacity: usize,
    used: usize,
}

impl LocalScope {
    pub(crate) fn new(capacity: usize) -> Self {
        Self { capacity, used: 0 }
    }

    /// Allocate a zeroed `[rows][cols]` block of atomic cells.
    ///
    /// # Panics
    ///
    /// If the allocation exceeds what the kernel declared at build time.
    pub fn alloc<T: AtomicElement>(&mut self, rows: usize, cols: usize) -> LocalArray<T> {
        let len = rows * cols;
        let bytes = len * std::mem::size_of::<T>();
        assert!(
            self.used + bytes <= self.capacity,
            "local allocation of {} bytes exceeds declared capacity ({} of {} used)",
            bytes,
            self.used,
            self.capacity
        );
        self.used += bytes;
        LocalArray {
            cells: (0..len).map(|_| T::new_atomic(T::zero())).collect(),
            rows,
            cols,
        }
    }

    /// Bytes allocated so far by this work-group
    #[inline]
    pub fn used(&self) -> usize {
        self.used
    }

    /// Bytes this work-group may allocate
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// A row-major `[rows][cols]` block of local memory cells.
///
/// Shared by all work-items of a work-group; every access is atomic because
/// work-items of the same group may race on one cell.
#[derive(Debug)]
pub struct LocalArray<T: AtomicElement> {
    cells: Box<[T::Atomic]>,
    rows: usize,
    cols: usize,
}

impl<T: AtomicElement> LocalArray<T> {
    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if the array has no cells
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at flat index `i`
    #[inline]
    pub fn cell(&self, i: usize) -> &T::Atomic {
        &self.cells[i]
    }

    /// Cell at `[row][col]`
    #[inline]
    pub fn cell_at(&self, row: usize, col: usize) -> &T::Atomic {
        debug_assert!(row < self.rows && col < self.cols);
        &self.cells[row * self.cols + col]
    }

    /// Relaxed load of flat index `i`
    #[inline]
    pub fn load(&self, i: usize) -> T {
        T::atomic_load(&self.cells[i])
    }

    /// Relaxed load of `[row][col]`
    #[inline]
    pub fn load_at(&self, row: usize, col: usize) -> T {
        T::atomic_load(self.cell_at(row, col))
    }

    /// Relaxed store to flat index `i`
    #[inline]
    pub fn store(&self, i: usize, v: T) {
        T::atomic_store(&self.cells[i], v)
    }
}
