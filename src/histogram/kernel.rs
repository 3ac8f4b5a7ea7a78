//! The histogram kernel and its launcher
//!
//! Every work-item runs:
//!
//! ```text
//! hist.init, edges.init
//! barrier                     if hist or edges sync after init
//! bounds = edges.get_bounds
//! for i in 0..work_per_item:
//!     idx = group * work_per_item * local_size + i * local_size + local_id
//!     if idx < size and edges.in_bounds(sample[idx]):
//!         hist.add(edges.get_bin(sample[idx]), weights.get(idx))
//! barrier                     if hist syncs before finalize
//! hist.finalize
//! ```
//!
//! Both barriers are emitted or omitted while the kernel is built.

use super::accumulator::HistogramAccumulator;
use super::bounds::BinLookup;
use super::weights::WeightSource;
use crate::dtype::{Element, HistElement};
use crate::error::{Error, Result};
use crate::runtime::{Handler, Kernel, KernelBuilder, LaunchReport, NdRange, Runtime, RuntimeClient};

/// Compose the strategies into one kernel body.
///
/// `handler` must carry the local memory the strategies declared.
/// `input` holds `size * dims` row-major sample coordinates.
#[allow(clippy::too_many_arguments)]
pub fn histogram_kernel<'k, T, H, A, E, W>(
    input: &'k [T],
    size: usize,
    dims: usize,
    work_per_item: usize,
    hist: &'k A,
    edges: &'k E,
    weights: &'k W,
    handler: Handler,
) -> Kernel<'k, (A::Local, E::Local)>
where
    T: Element,
    H: HistElement,
    A: HistogramAccumulator<H>,
    E: BinLookup<T>,
    W: WeightSource<H>,
{
    KernelBuilder::new(handler, move |scope| {
        (hist.alloc_local(scope), edges.alloc_local(scope))
    })
    .step(move |item, (hist_local, edges_local)| {
        hist.init(item, hist_local);
        edges.init(item, edges_local);
    })
    .barrier_if(A::SYNC_AFTER_INIT || E::SYNC_AFTER_INIT)
    .step(move |item, (hist_local, edges_local)| {
        let bounds = edges.get_bounds(edges_local);
        let local_size = item.local_range();
        let base = item.group_id() * work_per_item * local_size + item.local_id();
        for i in 0..work_per_item {
            let idx = base + i * local_size;
            if idx >= size {
                break;
            }
            let sample = &input[idx * dims..(idx + 1) * dims];
            if edges.in_bounds(sample, &bounds) {
                let bin = edges.get_bin(item, sample, &bounds);
                hist.add(item, hist_local, bin, weights.get(idx));
            }
        }
    })
    .barrier_if(A::SYNC_BEFORE_FINALIZE)
    .step(move |item, (hist_local, _)| hist.finalize(item, hist_local))
    .build()
}

/// Build the histogram kernel and launch it on `client`.
///
/// Accumulates the `size` samples of `input` into the histogram behind
/// `hist`. Out-of-bounds and NaN samples are skipped without notice.
///
/// `handler` must declare at least the local memory of `hist` and `edges`,
/// as it does when it is the handle they were created with.
#[allow(clippy::too_many_arguments)]
pub fn submit_histogram<R, C, T, H, A, E, W>(
    client: &C,
    input: &[T],
    size: usize,
    dims: usize,
    work_per_item: u32,
    hist: &A,
    edges: &E,
    weights: &W,
    nd_range: NdRange,
    handler: Handler,
) -> Result<LaunchReport>
where
    R: Runtime,
    C: RuntimeClient<R>,
    T: Element,
    H: HistElement,
    A: HistogramAccumulator<H>,
    E: BinLookup<T>,
    W: WeightSource<H>,
{
    if dims == 0 {
        return Err(Error::invalid_argument("dims", "must be positive"));
    }
    if dims != edges.dims() {
        return Err(Error::shape_mismatch(&[edges.dims()], &[dims]));
    }
    if work_per_item == 0 {
        return Err(Error::invalid_argument(
            "work_per_item",
            "each work-item must process at least one sample",
        ));
    }
    let needed = size
        .checked_mul(dims)
        .ok_or_else(|| Error::invalid_argument("size", "sample length overflows"))?;
    if input.len() < needed {
        return Err(Error::shape_mismatch(&[size, dims], &[input.len()]));
    }
    let footprint = hist.local_mem_bytes() + edges.local_mem_bytes();
    if handler.local_mem_bytes() < footprint {
        return Err(Error::invalid_argument(
            "handler",
            format!(
                "declares {} bytes of local memory, the strategies use {}",
                handler.local_mem_bytes(),
                footprint
            ),
        ));
    }
    let covered = nd_range.global() * work_per_item as usize;
    if covered < size {
        return Err(Error::invalid_argument(
            "nd_range",
            format!(
                "{} work-items x {} samples each cannot cover {} samples",
                nd_range.global(),
                work_per_item,
                size
            ),
        ));
    }

    let kernel = histogram_kernel::<T, H, A, E, W>(
        input,
        size,
        dims,
        work_per_item as usize,
        hist,
        edges,
        weights,
        handler,
    );
    client.submit(&kernel, nd_range)
}
