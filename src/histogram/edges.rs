//! Bin-lookup policies

use super::bounds::{BinLookup, check_in_bounds};
use super::data::{DataSource, DataView};
use crate::dtype::{AtomicElement, Element};
use crate::error::{Error, Result};
use crate::runtime::{LocalScope, NdItem};
use std::marker::PhantomData;

/// `bins` equal-width bins over `[min, max]`.
///
/// The bin is computed arithmetically, so no edges are read and no local
/// memory is used.
#[derive(Debug, Clone, Copy)]
pub struct UniformEdges<T> {
    min: T,
    max: T,
    bins: usize,
}

impl<T: Element> UniformEdges<T> {
    /// Create the policy; `min < max` must hold and both must be finite
    pub fn new(min: T, max: T, bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(Error::invalid_argument("bins", "must be positive"));
        }
        if !(min < max) || !min.to_f64().is_finite() || !max.to_f64().is_finite() {
            return Err(Error::invalid_argument(
                "range",
                format!("expected finite min < max, got [{:?}, {:?}]", min, max),
            ));
        }
        Ok(Self { min, max, bins })
    }

    /// The `(min, max)` range covered by the bins
    pub fn range(&self) -> (T, T) {
        (self.min, self.max)
    }
}

impl<T: Element> BinLookup<T> for UniformEdges<T> {
    const SYNC_AFTER_INIT: bool = false;

    type Local = ();
    type Bounds<'l>
        = (T, T)
    where
        Self: 'l;

    fn local_mem_bytes(&self) -> usize {
        0
    }

    fn alloc_local(&self, _scope: &mut LocalScope) -> Self::Local {}

    fn init(&self, _item: &NdItem<'_>, _local: &Self::Local) {}

    fn get_bounds<'l>(&'l self, _local: &'l Self::Local) -> Self::Bounds<'l> {
        (self.min, self.max)
    }

    #[inline]
    fn in_bounds<'l>(&'l self, sample: &[T], bounds: &Self::Bounds<'l>) -> bool {
        check_in_bounds(sample[0], bounds.0, bounds.1)
    }

    #[inline]
    fn get_bin<'l>(&'l self, _item: &NdItem<'_>, sample: &[T], bounds: &Self::Bounds<'l>) -> usize {
        let (min, max) = (bounds.0.to_f64(), bounds.1.to_f64());
        let scaled = (sample[0].to_f64() - min) / (max - min) * self.bins as f64;
        (scaled as usize).min(self.bins - 1)
    }

    fn bins_count(&self) -> usize {
        self.bins
    }

    fn dims(&self) -> usize {
        1
    }
}

/// Bounds of an edges array: its first and last edge, plus the edges.
#[derive(Debug, Clone, Copy)]
pub struct EdgeBounds<'l, T: AtomicElement> {
    /// First edge
    pub min: T,
    /// Last edge
    pub max: T,
    edges: DataView<'l, T>,
}

/// Arbitrary increasing edges, searched by bisection.
///
/// Bins are half-open `[e[i], e[i+1])` except the last, which also holds a
/// sample equal to the last edge.
#[derive(Debug)]
pub struct BisectionEdges<T, D> {
    data: D,
    _marker: PhantomData<T>,
}

impl<T: AtomicElement, D: DataSource<T>> BisectionEdges<T, D> {
    /// Search the edges read through `data`; at least two edges are required
    pub fn new(data: D) -> Result<Self> {
        if data.size() < 2 {
            return Err(Error::invalid_argument(
                "bins",
                format!("at least 2 edges are required, got {}", data.size()),
            ));
        }
        Ok(Self {
            data,
            _marker: PhantomData,
        })
    }
}

impl<T: AtomicElement, D: DataSource<T>> BinLookup<T> for BisectionEdges<T, D> {
    const SYNC_AFTER_INIT: bool = D::SYNC_AFTER_INIT;

    type Local = D::Local;
    type Bounds<'l>
        = EdgeBounds<'l, T>
    where
        Self: 'l;

    fn local_mem_bytes(&self) -> usize {
        self.data.local_mem_bytes()
    }

    fn alloc_local(&self, scope: &mut LocalScope) -> Self::Local {
        self.data.alloc_local(scope)
    }

    fn init(&self, item: &NdItem<'_>, local: &Self::Local) {
        self.data.init(item, local);
    }

    fn get_bounds<'l>(&'l self, local: &'l Self::Local) -> Self::Bounds<'l> {
        let edges = self.data.view(local);
        debug_assert!(!edges.is_empty());
        EdgeBounds {
            min: edges.get(0),
            max: edges.get(edges.len() - 1),
            edges,
        }
    }

    #[inline]
    fn in_bounds<'l>(&'l self, sample: &[T], bounds: &Self::Bounds<'l>) -> bool {
        check_in_bounds(sample[0], bounds.min, bounds.max)
    }

    #[inline]
    fn get_bin<'l>(&'l self, _item: &NdItem<'_>, sample: &[T], bounds: &Self::Bounds<'l>) -> usize {
        let pos = bounds.edges.upper_bound(sample[0]);
        pos.saturating_sub(1).min(self.bins_count() - 1)
    }

    fn bins_count(&self) -> usize {
        self.data.size() - 1
    }

    fn dims(&self) -> usize {
        1
    }
}

/// Per-dimension increasing edges for N-dimensional samples.
///
/// All dimensions' edges are stored back to back in one array; dimension `d`
/// owns `edge_counts[d]` of them. The bin of a sample is the row-major linear
/// index of its per-dimension bisection bins.
#[derive(Debug)]
pub struct MultiDimEdges<T, D> {
    data: D,
    edge_counts: Vec<usize>,
    offsets: Vec<usize>,
    bins_count: usize,
    _marker: PhantomData<T>,
}

impl<T: AtomicElement, D: DataSource<T>> MultiDimEdges<T, D> {
    /// Search the concatenated edges read through `data`, `edge_counts[d]`
    /// of them for dimension `d`
    pub fn new(data: D, edge_counts: &[usize]) -> Result<Self> {
        if edge_counts.is_empty() {
            return Err(Error::invalid_argument(
                "bins",
                "at least one dimension is required",
            ));
        }
        if let Some(d) = edge_counts.iter().position(|&c| c < 2) {
            return Err(Error::invalid_argument(
                "bins",
                format!("dimension {} needs at least 2 edges, got {}", d, edge_counts[d]),
            ));
        }
        let total: usize = edge_counts.iter().sum();
        if total != data.size() {
            return Err(Error::shape_mismatch(&[total], &[data.size()]));
        }
        let offsets = edge_counts
            .iter()
            .scan(0, |acc, &c| {
                let off = *acc;
                *acc += c;
                Some(off)
            })
            .collect();
        let bins_count = edge_counts.iter().map(|c| c - 1).product();
        Ok(Self {
            data,
            edge_counts: edge_counts.to_vec(),
            offsets,
            bins_count,
            _marker: PhantomData,
        })
    }

    /// Number of bins along each dimension
    pub fn bins_per_dim(&self) -> Vec<usize> {
        self.edge_counts.iter().map(|c| c - 1).collect()
    }
}

impl<T: AtomicElement, D: DataSource<T>> BinLookup<T> for MultiDimEdges<T, D> {
    const SYNC_AFTER_INIT: bool = D::SYNC_AFTER_INIT;

    type Local = D::Local;
    type Bounds<'l>
        = DataView<'l, T>
    where
        Self: 'l;

    fn local_mem_bytes(&self) -> usize {
        self.data.local_mem_bytes()
    }

    fn alloc_local(&self, scope: &mut LocalScope) -> Self::Local {
        self.data.alloc_local(scope)
    }

    fn init(&self, item: &NdItem<'_>, local: &Self::Local) {
        self.data.init(item, local);
    }

    fn get_bounds<'l>(&'l self, local: &'l Self::Local) -> Self::Bounds<'l> {
        self.data.view(local)
    }

    fn in_bounds<'l>(&'l self, sample: &[T], bounds: &Self::Bounds<'l>) -> bool {
        self.edge_counts
            .iter()
            .zip(&self.offsets)
            .zip(sample)
            .all(|((&count, &off), &v)| check_in_bounds(v, bounds.get(off), bounds.get(off + count - 1)))
    }

    fn get_bin<'l>(&'l self, _item: &NdItem<'_>, sample: &[T], bounds: &Self::Bounds<'l>) -> usize {
        self.edge_counts
            .iter()
            .zip(&self.offsets)
            .zip(sample)
            .fold(0, |linear, ((&count, &off), &v)| {
                let bins = count - 1;
                let pos = bounds.upper_bound_in(off, off + count, v);
                linear * bins + pos.saturating_sub(1).min(bins - 1)
            })
    }

    fn bins_count(&self) -> usize {
        self.bins_count
    }

    fn dims(&self) -> usize {
        self.edge_counts.len()
    }
}

/// One bin per integer value in `[min, max]`.
#[derive(Debug, Clone, Copy)]
pub struct BincountEdges<T> {
    min: T,
    max: T,
    bins: usize,
}

impl<T: Element> BincountEdges<T> {
    /// Count integer samples in `[min, max]`
    pub fn new(min: T, max: T) -> Result<Self> {
        if T::DTYPE.is_float() {
            return Err(Error::unsupported_dtype(T::DTYPE, "bincount"));
        }
        if max < min {
            return Err(Error::invalid_argument(
                "range",
                format!("expected min <= max, got [{:?}, {:?}]", min, max),
            ));
        }
        let bins = usize::try_from(max.to_i128() - min.to_i128())
            .ok()
            .and_then(|width| width.checked_add(1))
            .ok_or_else(|| {
                Error::invalid_argument(
                    "range",
                    format!("[{:?}, {:?}] holds more bins than fit in usize", min, max),
                )
            })?;
        Ok(Self { min, max, bins })
    }
}

impl<T: Element> BinLookup<T> for BincountEdges<T> {
    const SYNC_AFTER_INIT: bool = false;

    type Local = ();
    type Bounds<'l>
        = (T, T)
    where
        Self: 'l;

    fn local_mem_bytes(&self) -> usize {
        0
    }

    fn alloc_local(&self, _scope: &mut LocalScope) -> Self::Local {}

    fn init(&self, _item: &NdItem<'_>, _local: &Self::Local) {}

    fn get_bounds<'l>(&'l self, _local: &'l Self::Local) -> Self::Bounds<'l> {
        (self.min, self.max)
    }

    #[inline]
    fn in_bounds<'l>(&'l self, sample: &[T], bounds: &Self::Bounds<'l>) -> bool {
        check_in_bounds(sample[0], bounds.0, bounds.1)
    }

    #[inline]
    fn get_bin<'l>(&'l self, _item: &NdItem<'_>, sample: &[T], bounds: &Self::Bounds<'l>) -> usize {
        (sample[0].to_i128() - bounds.0.to_i128()) as usize
    }

    fn bins_count(&self) -> usize {
        self.bins
    }

    fn dims(&self) -> usize {
        1
    }
}
