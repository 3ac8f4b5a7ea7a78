//! Histogram operations trait and the generic driver behind it
//!
//! Every operation follows the same path: validate the arguments, read the
//! device limits, choose the edge caching and accumulator strategies, size
//! the local replicas, then compose and launch one kernel.

use super::accumulator::{HistGlobalMemory, HistWithLocalCopies, HistogramAccumulator};
use super::bounds::BinLookup;
use super::config::{AccumulatorPolicy, CachePolicy, HistogramConfig};
use super::data::{CachedData, UncachedData};
use super::edges::{BincountEdges, BisectionEdges, MultiDimEdges, UniformEdges};
use super::kernel::submit_histogram;
use super::sizing::get_local_hist_copies_count;
use super::validate::{ArrayMeta, validate};
use super::weights::{NoWeights, Weights};
use crate::dtype::{AtomicElement, Element, HistElement};
use crate::error::{Error, Result};
use crate::runtime::{
    AtomicBuffer, Device, DeviceLimits, Handler, LaunchReport, NdRange, Runtime, RuntimeClient,
};

// ============================================================================
// Launch Plan and Result
// ============================================================================

/// Strategies and geometry chosen for one histogram launch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchPlan {
    /// Work-items per work-group
    pub local_size: u32,
    /// Samples processed by each work-item
    pub work_per_item: u32,
    /// Whether the bin edges were staged into local memory
    pub edges_cached: bool,
    /// Local histogram replicas, or `None` for global memory accumulation
    pub local_copies: Option<u32>,
    /// Launch geometry
    pub nd_range: NdRange,
}

/// Output of a histogram operation
#[derive(Debug, Clone)]
pub struct HistogramResult<H> {
    /// One value per bin
    pub values: Vec<H>,
    /// What was launched
    pub plan: LaunchPlan,
    /// What the launch did
    pub report: LaunchReport,
}

/// Choose strategies for `size` samples, `bins` histogram cells and
/// `edge_items` bin edges of type `T`.
///
/// Local replicas narrower than `H` are only used for unweighted counts whose
/// per-group total fits an `i32`; otherwise `Auto` accumulates in global
/// memory and a forced `LocalCopies` is rejected.
pub fn plan_launch<T: Element, H: HistElement>(
    limits: &DeviceLimits,
    config: &HistogramConfig,
    size: usize,
    bins: usize,
    edge_items: usize,
    weighted: bool,
) -> Result<LaunchPlan> {
    config.validate(limits.max_work_group_size)?;
    let local_size = config.resolve_local_size(limits.max_work_group_size);

    let edge_bytes = edge_items * std::mem::size_of::<T>();
    let edges_cached = edge_items > 0
        && match config.edges_cache {
            CachePolicy::Auto => edge_bytes <= limits.local_mem_size / 2,
            CachePolicy::Cached => true,
            CachePolicy::Uncached => false,
        };

    let reserved = if edges_cached { edge_bytes } else { 0 };
    let remaining = limits.local_mem_size.saturating_sub(reserved);
    let loc_mem_items =
        u32::try_from(remaining / std::mem::size_of::<H::Local>()).unwrap_or(u32::MAX);
    let fitted = u32::try_from(bins)
        .ok()
        .and_then(|hist_items| get_local_hist_copies_count(loc_mem_items, local_size, hist_items));

    let group_samples = u64::from(config.work_per_item) * u64::from(local_size);
    let narrow_fits = !H::NARROWS || (!weighted && group_samples <= i32::MAX as u64);

    let local_copies = match config.accumulator {
        AccumulatorPolicy::Auto => fitted.filter(|_| narrow_fits),
        AccumulatorPolicy::GlobalMemory => None,
        AccumulatorPolicy::LocalCopies => {
            if !narrow_fits {
                return Err(Error::invalid_argument(
                    "accumulator",
                    format!(
                        "{} local copies of a {} histogram cannot hold {}",
                        <H::Local as Element>::DTYPE,
                        H::DTYPE,
                        if weighted {
                            "weighted partial sums".to_string()
                        } else {
                            format!("{} samples per work-group", group_samples)
                        }
                    ),
                ));
            }
            Some(fitted.ok_or(Error::LocalMemoryExceeded {
                requested: reserved + bins * std::mem::size_of::<H::Local>(),
                available: limits.local_mem_size,
            })?)
        }
    };

    let nd_range = NdRange::for_samples(size, config.work_per_item, local_size as usize)?;

    log::debug!(
        "histogram plan: {} samples, {} bins, edges {}, {}, {} work-groups of {}",
        size,
        bins,
        if edges_cached { "cached" } else { "uncached" },
        match local_copies {
            Some(c) => format!("{} local copies ({})", c, H::DTYPE),
            None => format!("global memory ({})", H::DTYPE),
        },
        nd_range.groups(),
        local_size
    );

    Ok(LaunchPlan {
        local_size,
        work_per_item: config.work_per_item,
        edges_cached,
        local_copies,
        nd_range,
    })
}

// ============================================================================
// Strategy dispatch
// ============================================================================

#[allow(clippy::too_many_arguments)]
fn submit_weighted<R, C, T, H, A, E>(
    client: &C,
    sample: &[T],
    size: usize,
    dims: usize,
    hist: &A,
    edges: &E,
    weights: Option<&[H]>,
    plan: &LaunchPlan,
    handler: Handler,
) -> Result<LaunchReport>
where
    R: Runtime,
    C: RuntimeClient<R>,
    T: Element,
    H: HistElement,
    A: HistogramAccumulator<H>,
    E: BinLookup<T>,
{
    match weights {
        Some(w) => submit_histogram::<R, C, T, H, A, E, _>(
            client,
            sample,
            size,
            dims,
            plan.work_per_item,
            hist,
            edges,
            &Weights::new(w),
            plan.nd_range,
            handler,
        ),
        None => submit_histogram::<R, C, T, H, A, E, _>(
            client,
            sample,
            size,
            dims,
            plan.work_per_item,
            hist,
            edges,
            &NoWeights::<H>::new(),
            plan.nd_range,
            handler,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn accumulate<R, C, T, H, E>(
    client: &C,
    sample: &[T],
    size: usize,
    dims: usize,
    edges: &E,
    weights: Option<&[H]>,
    plan: LaunchPlan,
    mut handler: Handler,
) -> Result<HistogramResult<H>>
where
    R: Runtime,
    C: RuntimeClient<R>,
    T: Element,
    H: HistElement,
    E: BinLookup<T>,
{
    let out = AtomicBuffer::<H>::zeros(edges.bins_count());
    let report = match plan.local_copies {
        Some(copies) => {
            let hist = HistWithLocalCopies::new(&out, copies, &mut handler)?;
            submit_weighted::<R, C, T, H, _, E>(
                client, sample, size, dims, &hist, edges, weights, &plan, handler,
            )?
        }
        None => {
            let hist = HistGlobalMemory::new(&out);
            submit_weighted::<R, C, T, H, _, E>(
                client, sample, size, dims, &hist, edges, weights, &plan, handler,
            )?
        }
    };
    Ok(HistogramResult {
        values: out.to_vec(),
        plan,
        report,
    })
}

fn weights_meta<H: Element>(weights: Option<&[H]>, device: usize) -> Option<ArrayMeta> {
    weights.map(|w| ArrayMeta::new(&[w.len()], H::DTYPE, device))
}

fn check_increasing<T: Element>(edges: &[T]) -> Result<()> {
    if edges.windows(2).all(|w| w[0] <= w[1]) {
        Ok(())
    } else {
        Err(Error::invalid_argument(
            "bins",
            "edges must increase monotonically",
        ))
    }
}

// ============================================================================
// Operation implementations
// ============================================================================

fn histogram_impl<R, C, T, H>(
    client: &C,
    sample: &[T],
    edges: &[T],
    weights: Option<&[H]>,
    config: &HistogramConfig,
) -> Result<HistogramResult<H>>
where
    R: Runtime,
    C: RuntimeClient<R>,
    T: AtomicElement,
    H: HistElement,
{
    let device = client.device();
    let id = device.id();
    let bins = edges.len().saturating_sub(1);
    validate(
        &ArrayMeta::new(&[sample.len()], T::DTYPE, id),
        Some(&ArrayMeta::new(&[edges.len()], T::DTYPE, id)),
        weights_meta(weights, id).as_ref(),
        &ArrayMeta::new(&[bins], H::DTYPE, id),
    )?;
    check_increasing(edges)?;

    let plan = plan_launch::<T, H>(
        &device.limits(),
        config,
        sample.len(),
        bins,
        edges.len(),
        weights.is_some(),
    )?;
    let mut handler = Handler::new("histogram");
    if plan.edges_cached {
        let lookup = BisectionEdges::<T, _>::new(CachedData::new(edges, &[edges.len()], &mut handler)?)?;
        accumulate::<R, C, T, H, _>(client, sample, sample.len(), 1, &lookup, weights, plan, handler)
    } else {
        let lookup = BisectionEdges::<T, _>::new(UncachedData::new(edges, &[edges.len()])?)?;
        accumulate::<R, C, T, H, _>(client, sample, sample.len(), 1, &lookup, weights, plan, handler)
    }
}

fn histogram_uniform_impl<R, C, T, H>(
    client: &C,
    sample: &[T],
    bins: usize,
    range: (T, T),
    weights: Option<&[H]>,
    config: &HistogramConfig,
) -> Result<HistogramResult<H>>
where
    R: Runtime,
    C: RuntimeClient<R>,
    T: Element,
    H: HistElement,
{
    let device = client.device();
    let id = device.id();
    validate(
        &ArrayMeta::new(&[sample.len()], T::DTYPE, id),
        None,
        weights_meta(weights, id).as_ref(),
        &ArrayMeta::new(&[bins], H::DTYPE, id),
    )?;
    let lookup = UniformEdges::new(range.0, range.1, bins)?;

    let plan = plan_launch::<T, H>(
        &device.limits(),
        config,
        sample.len(),
        bins,
        0,
        weights.is_some(),
    )?;
    let handler = Handler::new("histogram_uniform");
    accumulate::<R, C, T, H, _>(client, sample, sample.len(), 1, &lookup, weights, plan, handler)
}

fn histogramdd_impl<R, C, T, H>(
    client: &C,
    sample: &[T],
    dims: usize,
    edges: &[&[T]],
    weights: Option<&[H]>,
    config: &HistogramConfig,
) -> Result<HistogramResult<H>>
where
    R: Runtime,
    C: RuntimeClient<R>,
    T: AtomicElement,
    H: HistElement,
{
    if dims == 0 {
        return Err(Error::invalid_argument("dims", "must be positive"));
    }
    if sample.len() % dims != 0 {
        return Err(Error::invalid_argument(
            "sample",
            format!("length {} is not a multiple of {} dimensions", sample.len(), dims),
        ));
    }
    if edges.len() != dims {
        return Err(Error::shape_mismatch(&[dims], &[edges.len()]));
    }
    let size = sample.len() / dims;

    let device = client.device();
    let id = device.id();
    let sample_meta = ArrayMeta::new(&[size, dims], T::DTYPE, id);
    let weights_meta = weights_meta(weights, id);
    let edge_counts: Vec<usize> = edges.iter().map(|e| e.len()).collect();
    let bins: usize = edge_counts.iter().map(|c| c.saturating_sub(1)).product();
    let hist_meta = ArrayMeta::new(&[bins], H::DTYPE, id);
    for dim_edges in edges {
        validate(
            &sample_meta,
            Some(&ArrayMeta::new(&[dim_edges.len()], T::DTYPE, id)),
            weights_meta.as_ref(),
            &hist_meta,
        )?;
        check_increasing(dim_edges)?;
    }

    let flat: Vec<T> = edges.iter().flat_map(|e| e.iter().copied()).collect();
    let plan = plan_launch::<T, H>(
        &device.limits(),
        config,
        size,
        bins,
        flat.len(),
        weights.is_some(),
    )?;
    let mut handler = Handler::new("histogramdd");
    if plan.edges_cached {
        let data = CachedData::new(&flat, &[flat.len()], &mut handler)?;
        let lookup = MultiDimEdges::<T, _>::new(data, &edge_counts)?;
        accumulate::<R, C, T, H, _>(client, sample, size, dims, &lookup, weights, plan, handler)
    } else {
        let lookup = MultiDimEdges::<T, _>::new(UncachedData::new(&flat, &[flat.len()])?, &edge_counts)?;
        accumulate::<R, C, T, H, _>(client, sample, size, dims, &lookup, weights, plan, handler)
    }
}

fn bincount_impl<R, C, T, H>(
    client: &C,
    sample: &[T],
    range: (T, T),
    weights: Option<&[H]>,
    config: &HistogramConfig,
) -> Result<HistogramResult<H>>
where
    R: Runtime,
    C: RuntimeClient<R>,
    T: Element,
    H: HistElement,
{
    let lookup = BincountEdges::new(range.0, range.1)?;
    let bins = lookup.bins_count();

    let device = client.device();
    let id = device.id();
    validate(
        &ArrayMeta::new(&[sample.len()], T::DTYPE, id),
        None,
        weights_meta(weights, id).as_ref(),
        &ArrayMeta::new(&[bins], H::DTYPE, id),
    )?;

    let plan = plan_launch::<T, H>(
        &device.limits(),
        config,
        sample.len(),
        bins,
        0,
        weights.is_some(),
    )?;
    let handler = Handler::new("bincount");
    accumulate::<R, C, T, H, _>(client, sample, sample.len(), 1, &lookup, weights, plan, handler)
}

// ============================================================================
// HistogramOps
// ============================================================================

/// Histogram operations
///
/// Implemented by every runtime client. Samples outside the bins, and samples
/// with a NaN coordinate, are dropped without notice.
pub trait HistogramOps<R: Runtime>: RuntimeClient<R> {
    /// Histogram of 1-D `sample` over increasing `edges`.
    ///
    /// Bin `i` holds samples in `[edges[i], edges[i+1])`; the last bin also
    /// holds samples equal to the last edge.
    ///
    /// # Arguments
    ///
    /// * `sample` - Sample values
    /// * `edges` - Bin edges, at least 2, increasing
    /// * `weights` - Optional weight per sample; counts when `None`
    /// * `config` - Launch configuration
    fn histogram<T: AtomicElement, H: HistElement>(
        &self,
        sample: &[T],
        edges: &[T],
        weights: Option<&[H]>,
        config: &HistogramConfig,
    ) -> Result<HistogramResult<H>> {
        histogram_impl::<R, Self, T, H>(self, sample, edges, weights, config)
    }

    /// Histogram of 1-D `sample` over `bins` equal-width bins spanning `range`
    fn histogram_uniform<T: Element, H: HistElement>(
        &self,
        sample: &[T],
        bins: usize,
        range: (T, T),
        weights: Option<&[H]>,
        config: &HistogramConfig,
    ) -> Result<HistogramResult<H>> {
        histogram_uniform_impl::<R, Self, T, H>(self, sample, bins, range, weights, config)
    }

    /// Histogram of `dims`-dimensional samples stored row-major in `sample`.
    ///
    /// `edges[d]` are the increasing edges of dimension `d`. The result is
    /// the flattened row-major histogram, of `prod(edges[d].len() - 1)` bins.
    fn histogramdd<T: AtomicElement, H: HistElement>(
        &self,
        sample: &[T],
        dims: usize,
        edges: &[&[T]],
        weights: Option<&[H]>,
        config: &HistogramConfig,
    ) -> Result<HistogramResult<H>> {
        histogramdd_impl::<R, Self, T, H>(self, sample, dims, edges, weights, config)
    }

    /// Count occurrences of each integer value in `range` (inclusive)
    fn bincount<T: Element, H: HistElement>(
        &self,
        sample: &[T],
        range: (T, T),
        weights: Option<&[H]>,
        config: &HistogramConfig,
    ) -> Result<HistogramResult<H>> {
        bincount_impl::<R, Self, T, H>(self, sample, range, weights, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(local_mem_size: usize) -> DeviceLimits {
        DeviceLimits {
            max_work_group_size: 64,
            local_mem_size,
            compute_units: 1,
        }
    }

    #[test]
    fn test_plan_caches_small_edges() {
        let plan =
            plan_launch::<f64, u64>(&limits(4096), &HistogramConfig::default(), 1000, 10, 11, false)
                .unwrap();
        assert!(plan.edges_cached);
        assert!(plan.local_copies.is_some());
        assert_eq!(plan.local_size, 64);
        assert_eq!(plan.nd_range.local(), 64);
    }

    #[test]
    fn test_plan_sizes_copies_against_remaining_memory() {
        // 1024 bytes: 88 for the edges leaves 936 bytes, 234 u32 cells,
        // room for 2 replicas of 100 bins
        let plan =
            plan_launch::<f64, u64>(&limits(1024), &HistogramConfig::default(), 10, 100, 11, false)
                .unwrap();
        assert!(plan.edges_cached);
        let copies = plan.local_copies.unwrap();
        assert!(copies >= 1 && copies * 100 * 4 <= 1024 - 88);
    }

    #[test]
    fn test_plan_falls_back_to_global_memory() {
        let plan =
            plan_launch::<f32, f32>(&limits(64), &HistogramConfig::default(), 10, 100, 0, false)
                .unwrap();
        assert_eq!(plan.local_copies, None);
        assert!(!plan.edges_cached);
    }

    #[test]
    fn test_plan_forced_local_copies_that_do_not_fit() {
        let config = HistogramConfig::default().with_accumulator(AccumulatorPolicy::LocalCopies);
        let err = plan_launch::<f32, f32>(&limits(64), &config, 10, 100, 0, false).unwrap_err();
        assert!(matches!(err, Error::LocalMemoryExceeded { .. }));
    }

    #[test]
    fn test_plan_respects_forced_policies() {
        let config = HistogramConfig::default()
            .with_accumulator(AccumulatorPolicy::GlobalMemory)
            .with_edges_cache(CachePolicy::Uncached);
        let plan = plan_launch::<f64, u64>(&limits(4096), &config, 10, 10, 11, false).unwrap();
        assert!(!plan.edges_cached);
        assert_eq!(plan.local_copies, None);
    }

    #[test]
    fn test_plan_keeps_weighted_wide_integers_in_global_memory() {
        let auto = HistogramConfig::default();
        let weighted = plan_launch::<f64, u64>(&limits(4096), &auto, 1000, 10, 11, true).unwrap();
        assert_eq!(weighted.local_copies, None);
        let weighted = plan_launch::<f64, f64>(&limits(4096), &auto, 1000, 10, 11, true).unwrap();
        assert!(weighted.local_copies.is_some());
        let weighted = plan_launch::<f64, u32>(&limits(4096), &auto, 1000, 10, 11, true).unwrap();
        assert!(weighted.local_copies.is_some());

        let forced = auto.with_accumulator(AccumulatorPolicy::LocalCopies);
        let err = plan_launch::<f64, i64>(&limits(4096), &forced, 1000, 10, 11, true).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { arg: "accumulator", .. }));
    }

    #[test]
    fn test_plan_rejects_narrow_counts_that_may_overflow() {
        let config = HistogramConfig::default().with_work_per_item(u32::MAX);
        let plan = plan_launch::<f64, u64>(&limits(4096), &config, 1000, 10, 11, false).unwrap();
        assert_eq!(plan.local_copies, None);
        let plan = plan_launch::<f64, u32>(&limits(4096), &config, 1000, 10, 11, false).unwrap();
        assert!(plan.local_copies.is_some());
    }

    #[test]
    fn test_check_increasing() {
        assert!(check_increasing(&[0.0f64, 1.0, 1.0, 2.0]).is_ok());
        assert!(check_increasing(&[0.0f64, 2.0, 1.0]).is_err());
        assert!(check_increasing(&[0.0f64, f64::NAN, 1.0]).is_err());
    }
}
