//! CPU client implementation

use super::{CpuDevice, CpuRuntime, kernel};
use crate::error::{Error, Result};
use crate::histogram::HistogramOps;
use crate::runtime::{Device, Kernel, LaunchReport, NdRange, RuntimeClient};

/// CPU client for kernel launches
#[derive(Clone, Debug)]
pub struct CpuClient {
    pub(crate) device: CpuDevice,
}

impl CpuClient {
    /// Create a new CPU client
    pub fn new(device: CpuDevice) -> Self {
        Self { device }
    }
}

impl RuntimeClient<CpuRuntime> for CpuClient {
    fn device(&self) -> &CpuDevice {
        &self.device
    }

    fn synchronize(&self) {
        // Launches run to completion inside submit, nothing to do
    }

    fn submit<S>(&self, kernel: &Kernel<'_, S>, nd_range: NdRange) -> Result<LaunchReport> {
        let limits = self.device.limits();

        if nd_range.local() > limits.max_work_group_size as usize {
            return Err(Error::backend_limitation(
                "cpu",
                "submit",
                format!(
                    "work-group size {} exceeds device maximum {}",
                    nd_range.local(),
                    limits.max_work_group_size
                ),
            ));
        }
        if kernel.local_mem_bytes() > limits.local_mem_size {
            return Err(Error::LocalMemoryExceeded {
                requested: kernel.local_mem_bytes(),
                available: limits.local_mem_size,
            });
        }

        log::debug!(
            "launching kernel '{}': {} work-groups x {} work-items, {} bytes local memory, {} barriers",
            kernel.name(),
            nd_range.groups(),
            nd_range.local(),
            kernel.local_mem_bytes(),
            kernel.barrier_count()
        );

        Ok(kernel::launch(kernel, nd_range))
    }
}

impl HistogramOps<CpuRuntime> for CpuClient {}
