//! Trait for device identification and capability queries

/// Hardware limits a kernel launch must respect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceLimits {
    /// Largest work-group (number of work-items) the device can schedule
    pub max_work_group_size: u32,
    /// Bytes of fast local memory available to one work-group
    pub local_mem_size: usize,
    /// Number of work-groups the device can run concurrently
    pub compute_units: u32,
}

/// Trait for device identification
pub trait Device: Clone + Send + Sync + 'static {
    /// Unique identifier for this device
    fn id(&self) -> usize;

    /// Check if two devices are the same
    fn is_same(&self, other: &Self) -> bool {
        self.id() == other.id()
    }

    /// Human-readable name
    fn name(&self) -> String {
        format!("Device({})", self.id())
    }

    /// Launch limits of this device
    fn limits(&self) -> DeviceLimits;
}
