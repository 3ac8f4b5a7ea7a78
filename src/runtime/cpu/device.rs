//! CPU device implementation

use crate::runtime::{Device, DeviceLimits};

/// Work-group size of the emulated device unless configured otherwise
pub const DEFAULT_WORK_GROUP_SIZE: u32 = 256;

/// Local memory per work-group of the emulated device unless configured otherwise
pub const DEFAULT_LOCAL_MEM_SIZE: usize = 64 * 1024;

/// The host CPU, presented as an accelerator with work-groups and local memory
#[derive(Clone, Debug)]
pub struct CpuDevice {
    id: usize,
    limits: DeviceLimits,
}

impl CpuDevice {
    /// Create a new CPU device with default limits
    pub fn new() -> Self {
        Self {
            id: 0,
            limits: DeviceLimits {
                max_work_group_size: DEFAULT_WORK_GROUP_SIZE,
                local_mem_size: DEFAULT_LOCAL_MEM_SIZE,
                compute_units: host_threads(),
            },
        }
    }

    /// Create a CPU device that reports the given limits.
    ///
    /// Useful to reproduce the behaviour of small-local-memory accelerators.
    pub fn with_limits(limits: DeviceLimits) -> Self {
        Self { id: 0, limits }
    }
}

impl Default for CpuDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for CpuDevice {
    fn id(&self) -> usize {
        self.id
    }

    fn name(&self) -> String {
        "cpu".to_string()
    }

    fn limits(&self) -> DeviceLimits {
        self.limits
    }
}

#[cfg(feature = "rayon")]
fn host_threads() -> u32 {
    rayon::current_num_threads() as u32
}

#[cfg(not(feature = "rayon"))]
fn host_threads() -> u32 {
    1
}
