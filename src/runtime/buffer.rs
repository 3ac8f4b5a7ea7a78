//! Device-resident buffers of atomic cells

use crate::dtype::AtomicElement;

/// A device global memory array whose cells are only mutated atomically.
///
/// Used as the output histogram: zero-initialized before the launch, updated
/// with relaxed device-scope atomics by every work-group, read back with
/// [`AtomicBuffer::to_vec`] once the launch has completed.
#[derive(Debug)]
pub struct AtomicBuffer<T: AtomicElement> {
    cells: Box<[T::Atomic]>,
}

impl<T: AtomicElement> AtomicBuffer<T> {
    /// Allocate `len` cells initialized to zero
    pub fn zeros(len: usize) -> Self {
        Self {
            cells: (0..len).map(|_| T::new_atomic(T::zero())).collect(),
        }
    }

    /// Allocate a buffer holding a copy of `data`
    pub fn from_slice(data: &[T]) -> Self {
        Self {
            cells: data.iter().map(|&v| T::new_atomic(v)).collect(),
        }
    }

    /// Number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if the buffer has no cells
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The atomic cells, for strategies that accumulate into this buffer
    #[inline]
    pub fn cells(&self) -> &[T::Atomic] {
        &self.cells
    }

    /// Copy the current contents to host memory
    pub fn to_vec(&self) -> Vec<T> {
        self.cells.iter().map(T::atomic_load).collect()
    }
}
