//! Trait for runtime clients that handle kernel dispatch

use super::Runtime;
use crate::error::Result;
use crate::runtime::{Kernel, LaunchReport, NdRange};

/// Trait for runtime clients that handle kernel dispatch
pub trait RuntimeClient<R: Runtime>: Clone + Send + Sync {
    /// Get the device this client operates on
    fn device(&self) -> &R::Device;

    /// Synchronize: wait for all pending launches to complete
    fn synchronize(&self);

    /// Launch `kernel` over `nd_range` and run it to completion.
    ///
    /// Fails before any work-item runs if the geometry or the kernel's
    /// declared local memory exceed the device limits.
    fn submit<S>(&self, kernel: &Kernel<'_, S>, nd_range: NdRange) -> Result<LaunchReport>;
}
