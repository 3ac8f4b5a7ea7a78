//! Data source strategies: read-only auxiliary arrays, staged or not
//!
//! Bin edges are read by every work-item for every sample. When they are small
//! enough, [`CachedData`] copies them into work-group local memory once per
//! work-group; otherwise [`UncachedData`] reads device memory directly. Both
//! produce identical values for identical indices.

use crate::dtype::AtomicElement;
use crate::error::{Error, Result};
use crate::runtime::{Handler, LocalArray, LocalScope, NdItem};

/// A uniform read-only view over an auxiliary per-element array.
pub trait DataSource<T: AtomicElement>: Sync {
    /// Whether a work-group barrier is required between `init` and the first read
    const SYNC_AFTER_INIT: bool;

    /// Work-group local state
    type Local;

    /// Bytes of local memory `alloc_local` takes per work-group
    fn local_mem_bytes(&self) -> usize;

    /// Allocate this strategy's local memory when a work-group starts
    fn alloc_local(&self, scope: &mut LocalScope) -> Self::Local;

    /// Per-work-group preparation, executed by every work-item before use
    fn init(&self, item: &NdItem<'_>, local: &Self::Local);

    /// View through which the data is read
    fn view<'a>(&'a self, local: &'a Self::Local) -> DataView<'a, T>;

    /// Number of elements
    fn size(&self) -> usize;

    /// Logical shape of the data
    fn shape(&self) -> &[usize];
}

/// Where a [`DataSource`] reads from.
#[derive(Debug, Clone, Copy)]
pub enum DataView<'a, T: AtomicElement> {
    /// Device global memory
    Global(&'a [T]),
    /// Work-group local memory
    Local(&'a LocalArray<T>),
}

impl<T: AtomicElement> DataView<'_, T> {
    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Self::Global(data) => data.len(),
            Self::Local(data) => data.len(),
        }
    }

    /// True if the view has no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at index `i`
    #[inline]
    pub fn get(&self, i: usize) -> T {
        match self {
            Self::Global(data) => data[i],
            Self::Local(data) => data.load(i),
        }
    }

    /// First index in `[start, end)` whose element is greater than `value`,
    /// relative to `start`. Returns `end - start` if there is none.
    ///
    /// The range must be sorted in increasing order.
    pub fn upper_bound_in(&self, start: usize, end: usize, value: T) -> usize {
        let (mut lo, mut hi) = (start, end);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if value < self.get(mid) {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        lo - start
    }

    /// [`upper_bound_in`](Self::upper_bound_in) over the whole view
    #[inline]
    pub fn upper_bound(&self, value: T) -> usize {
        self.upper_bound_in(0, self.len(), value)
    }
}

fn checked_len(data_len: usize, shape: &[usize]) -> Result<usize> {
    let len: usize = shape.iter().product();
    if shape.is_empty() || len > data_len {
        return Err(Error::shape_mismatch(&[data_len], shape));
    }
    Ok(len)
}

/// Data staged into local memory by every work-group before use.
///
/// `init` copies the array with a striped loop (work-item `l` copies indices
/// `l, l + local_range, ...`), so a barrier must follow it.
#[derive(Debug)]
pub struct CachedData<'a, T: AtomicElement> {
    global: &'a [T],
    shape: Vec<usize>,
}

impl<'a, T: AtomicElement> CachedData<'a, T> {
    /// Stage the first `product(shape)` elements of `global`, declaring the
    /// local memory on `handler`
    pub fn new(global: &'a [T], shape: &[usize], handler: &mut Handler) -> Result<Self> {
        let len = checked_len(global.len(), shape)?;
        handler.request_local::<T>(len);
        Ok(Self {
            global: &global[..len],
            shape: shape.to_vec(),
        })
    }
}

impl<T: AtomicElement> DataSource<T> for CachedData<'_, T> {
    const SYNC_AFTER_INIT: bool = true;

    type Local = LocalArray<T>;

    fn local_mem_bytes(&self) -> usize {
        std::mem::size_of_val(self.global)
    }

    fn alloc_local(&self, scope: &mut LocalScope) -> Self::Local {
        scope.alloc::<T>(1, self.global.len())
    }

    fn init(&self, item: &NdItem<'_>, local: &Self::Local) {
        for i in (item.local_id()..self.global.len()).step_by(item.local_range()) {
            local.store(i, self.global[i]);
        }
    }

    #[inline]
    fn view<'v>(&'v self, local: &'v Self::Local) -> DataView<'v, T> {
        DataView::Local(local)
    }

    fn size(&self) -> usize {
        self.global.len()
    }

    fn shape(&self) -> &[usize] {
        &self.shape
    }
}

/// Data read straight from device memory on every access.
#[derive(Debug)]
pub struct UncachedData<'a, T: AtomicElement> {
    global: &'a [T],
    shape: Vec<usize>,
}

impl<'a, T: AtomicElement> UncachedData<'a, T> {
    /// Read the first `product(shape)` elements of `global`
    pub fn new(global: &'a [T], shape: &[usize]) -> Result<Self> {
        let len = checked_len(global.len(), shape)?;
        Ok(Self {
            global: &global[..len],
            shape: shape.to_vec(),
        })
    }
}

impl<T: AtomicElement> DataSource<T> for UncachedData<'_, T> {
    const SYNC_AFTER_INIT: bool = false;

    type Local = ();

    fn local_mem_bytes(&self) -> usize {
        0
    }

    fn alloc_local(&self, _scope: &mut LocalScope) -> Self::Local {}

    fn init(&self, _item: &NdItem<'_>, _local: &Self::Local) {}

    #[inline]
    fn view<'v>(&'v self, _local: &'v Self::Local) -> DataView<'v, T> {
        DataView::Global(self.global)
    }

    fn size(&self) -> usize {
        self.global.len()
    }

    fn shape(&self) -> &[usize] {
        &self.shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_bound() {
        let edges = [0.0f64, 1.0, 2.0, 3.0];
        let view = DataView::Global(&edges);
        assert_eq!(view.upper_bound(-1.0), 0);
        assert_eq!(view.upper_bound(0.0), 1);
        assert_eq!(view.upper_bound(1.5), 2);
        assert_eq!(view.upper_bound(3.0), 4);
        assert_eq!(view.upper_bound_in(2, 4, 2.5), 1);
    }

    #[test]
    fn test_shape_checks() {
        let data = [1u32, 2, 3, 4];
        let mut handler = Handler::new("t");
        assert!(CachedData::new(&data, &[5], &mut handler).is_err());
        assert!(UncachedData::new(&data, &[]).is_err());
        let cached = CachedData::new(&data, &[2, 2], &mut handler).unwrap();
        assert_eq!(cached.size(), 4);
        assert_eq!(cached.shape(), &[2, 2]);
        assert_eq!(handler.local_mem_bytes(), 16);
        assert_eq!(cached.local_mem_bytes(), 16);
    }

    #[test]
    fn test_uncached_needs_no_local_memory() {
        let data = [5i64, 6, 7];
        let uncached = UncachedData::new(&data, &[3]).unwrap();
        let mut scope = LocalScope::new(0);
        let local = uncached.alloc_local(&mut scope);
        let view = uncached.view(&local);
        assert_eq!(view.len(), 3);
        assert!(!view.is_empty());
        assert_eq!(uncached.local_mem_bytes(), 0);
        assert_eq!(view.get(2), 7);
        assert_eq!(scope.used(), 0);
    }
}
