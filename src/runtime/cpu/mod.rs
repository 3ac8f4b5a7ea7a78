//! CPU runtime implementation
//!
//! An emulated accelerator: the host presents itself as a device with
//! work-groups, barriers and per-work-group local memory, so the same kernels
//! that target GPU-class hardware run and can be tested anywhere.
//!
//! Device limits default to a 256 work-item work-group and 64 KiB of local
//! memory; [`CpuDevice::with_limits`] reproduces other devices.

mod client;
mod device;
mod kernel;
mod runtime;

pub use client::CpuClient;
pub use device::{CpuDevice, DEFAULT_LOCAL_MEM_SIZE, DEFAULT_WORK_GROUP_SIZE};
pub use runtime::CpuRuntime;
