//! # wghist
//!
//! **Parallel histograms for work-group accelerators.**
//!
//! wghist computes 1-D, N-D, uniform and integer-count histograms with a
//! kernel built from interchangeable strategies: bin edges cached in
//! work-group local memory or read from device memory, and the histogram
//! accumulated straight into device memory or into per-work-group local
//! replicas flushed once per group.
//!
//! ## Features
//!
//! - **Strategy composition**: barriers are emitted while the kernel is built,
//!   from the strategies' `const` capability flags
//! - **Contention control**: local replica count sized from the device's
//!   local memory and work-group size
//! - **Narrow local accumulators**: `u64`/`i64` histograms replicate in
//!   32-bit local cells and widen at the flush
//! - **Weights**: optional per-sample weights of the histogram's type
//! - **Emulated device**: the CPU runtime implements work-groups, barriers
//!   and local memory, in parallel over rayon
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wghist::prelude::*;
//!
//! let client = CpuRuntime::default_client(&CpuRuntime::default_device());
//! let sample = [0.5f64, 1.5, 1.7, 9.0];
//! let edges = [0.0f64, 1.0, 2.0, 10.0];
//!
//! let result = client.histogram::<f64, u64>(&sample, &edges, None, &HistogramConfig::default())?;
//! assert_eq!(result.values, vec![1, 2, 1]);
//! ```
//!
//! ## Feature Flags
//!
//! - `cpu` (default): CPU backend
//! - `rayon` (default): Run work-groups on multiple threads

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dtype;
pub mod error;
pub mod histogram;
pub mod runtime;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::{DType, Element, HistElement};
    pub use crate::error::{Error, Result};
    pub use crate::histogram::{
        AccumulatorPolicy, CachePolicy, HistogramConfig, HistogramOps, HistogramResult,
        LaunchPlan,
    };
    pub use crate::runtime::{Device, DeviceLimits, Runtime, RuntimeClient};

    #[cfg(feature = "cpu")]
    pub use crate::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime};
}

/// Default runtime based on enabled features
#[cfg(feature = "cpu")]
pub type DefaultRuntime = runtime::cpu::CpuRuntime;
