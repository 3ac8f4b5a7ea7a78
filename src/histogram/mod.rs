//! Histogram engine
//!
//! A histogram kernel is composed from three strategies and one lookup
//! policy, all chosen before the kernel is built:
//!
//! | Concern      | Strategies                                   |
//! |--------------|----------------------------------------------|
//! | edges data   | [`CachedData`], [`UncachedData`]             |
//! | weights      | [`NoWeights`], [`Weights`]                   |
//! | accumulation | [`HistGlobalMemory`], [`HistWithLocalCopies`] |
//! | bin lookup   | [`UniformEdges`], [`BisectionEdges`], [`MultiDimEdges`], [`BincountEdges`] |
//!
//! [`submit_histogram`] composes them; [`HistogramOps`] picks them for a call
//! from the device limits and a [`HistogramConfig`].

mod accumulator;
mod bounds;
mod config;
mod data;
mod edges;
mod kernel;
mod ops;
mod sizing;
mod validate;
mod weights;

pub use accumulator::{HistGlobalMemory, HistWithLocalCopies, HistogramAccumulator};
pub use bounds::{BinLookup, check_in_bounds};
pub use config::{AccumulatorPolicy, CachePolicy, DEFAULT_WORK_PER_ITEM, HistogramConfig};
pub use data::{CachedData, DataSource, DataView, UncachedData};
pub use edges::{BincountEdges, BisectionEdges, EdgeBounds, MultiDimEdges, UniformEdges};
pub use kernel::{histogram_kernel, submit_histogram};
pub use ops::{HistogramOps, HistogramResult, LaunchPlan, plan_launch};
pub use sizing::get_local_hist_copies_count;
pub use validate::{ArrayMeta, validate};
pub use weights::{NoWeights, WeightSource, Weights};
