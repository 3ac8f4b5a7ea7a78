//! Histogram launch configuration

use crate::error::{Error, Result};

/// Samples each work-item processes unless configured otherwise
pub const DEFAULT_WORK_PER_ITEM: u32 = 128;

// ============================================================================
// Strategy Policies
// ============================================================================

/// Where the histogram is accumulated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccumulatorPolicy {
    /// Local replicas when at least one fits the local memory left after the
    /// edges, global memory otherwise
    #[default]
    Auto,

    /// Device-scope atomics straight into the output
    GlobalMemory,

    /// Local replicas; fails with `LocalMemoryExceeded` when none fits
    LocalCopies,
}

/// Whether bin edges are staged into local memory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CachePolicy {
    /// Cache when the edges take at most half of the local memory
    #[default]
    Auto,

    /// Always cache; fails at launch when the edges do not fit
    Cached,

    /// Always read edges from device memory
    Uncached,
}

// ============================================================================
// HistogramConfig
// ============================================================================

/// Configuration of a histogram launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistogramConfig {
    /// Samples processed sequentially by each work-item (default: 128)
    pub work_per_item: u32,

    /// Work-group size (default: the device's maximum work-group size)
    pub local_size: Option<u32>,

    /// Accumulator selection (default: Auto)
    pub accumulator: AccumulatorPolicy,

    /// Edge caching selection (default: Auto)
    pub edges_cache: CachePolicy,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            work_per_item: DEFAULT_WORK_PER_ITEM,
            local_size: None,
            accumulator: AccumulatorPolicy::Auto,
            edges_cache: CachePolicy::Auto,
        }
    }
}

impl HistogramConfig {
    /// Set the samples processed by each work-item
    pub fn with_work_per_item(mut self, work_per_item: u32) -> Self {
        self.work_per_item = work_per_item;
        self
    }

    /// Set the work-group size
    pub fn with_local_size(mut self, local_size: u32) -> Self {
        self.local_size = Some(local_size);
        self
    }

    /// Set the accumulator policy
    pub fn with_accumulator(mut self, accumulator: AccumulatorPolicy) -> Self {
        self.accumulator = accumulator;
        self
    }

    /// Set the edge caching policy
    pub fn with_edges_cache(mut self, edges_cache: CachePolicy) -> Self {
        self.edges_cache = edges_cache;
        self
    }

    /// Check the configuration against the device's maximum work-group size
    pub fn validate(&self, max_work_group_size: u32) -> Result<()> {
        if self.work_per_item == 0 {
            return Err(Error::invalid_argument(
                "work_per_item",
                "each work-item must process at least one sample",
            ));
        }
        match self.local_size {
            Some(0) => Err(Error::invalid_argument("local_size", "must be positive")),
            Some(n) if n > max_work_group_size => Err(Error::backend_limitation(
                "histogram",
                "local_size",
                format!(
                    "work-group size {} exceeds device maximum {}",
                    n, max_work_group_size
                ),
            )),
            _ => Ok(()),
        }
    }

    /// Work-group size to launch with on a device
    pub fn resolve_local_size(&self, max_work_group_size: u32) -> u32 {
        self.local_size.unwrap_or(max_work_group_size)
    }
}
