//! Runtime backends for kernel execution
//!
//! This module defines the accelerator abstraction the histogram engine is
//! written against, and ships the CPU backend that emulates it.
//!
//! # Architecture
//!
//! ```text
//! Runtime (backend identity)
//! ├── Device (identifies an accelerator, reports DeviceLimits)
//! └── Client (validates and executes kernel launches)
//!
//! Handler ──► KernelBuilder ──► Kernel ──submit(NdRange)──► LaunchReport
//!  (local memory       (steps and           (one body, run by every
//!   declarations)       barriers)            work-item of every group)
//! ```

mod buffer;
pub mod kernel;
pub(crate) mod local;
pub(crate) mod nd_range;
pub mod traits;

#[cfg(feature = "cpu")]
pub mod cpu;

pub use buffer::AtomicBuffer;
pub use kernel::{Handler, Kernel, KernelBuilder, LaunchReport};
pub use local::{LocalArray, LocalScope};
pub use nd_range::{NdItem, NdRange};
pub use traits::{Device, DeviceLimits, Runtime, RuntimeClient};
