//! CPU runtime implementation

use super::client::CpuClient;
use super::device::CpuDevice;
use crate::runtime::Runtime;

/// CPU compute runtime
///
/// The default runtime; works on any platform. Device memory is host memory
/// and work-groups are scheduled on host threads.
#[derive(Clone, Debug, Default)]
pub struct CpuRuntime;

impl Runtime for CpuRuntime {
    type Device = CpuDevice;
    type Client = CpuClient;

    fn name() -> &'static str {
        "cpu"
    }

    fn default_device() -> Self::Device {
        CpuDevice::new()
    }

    fn default_client(device: &Self::Device) -> Self::Client {
        CpuClient::new(device.clone())
    }
}
