//! Core trait for compute backends

/// Core trait for compute backends
///
/// `Runtime` abstracts over different accelerators. It uses static dispatch
/// via generics, so a histogram kernel is monomorphized per backend and per
/// strategy combination.
///
/// # Associated Types
///
/// - `Device`: Identifies a specific compute unit and its limits
/// - `Client`: Validates and executes kernel launches on the device
pub trait Runtime: Clone + Send + Sync + 'static {
    /// Device identifier type
    type Device: super::Device;

    /// Client for dispatching kernel launches
    type Client: super::RuntimeClient<Self>;

    /// Human-readable name of this runtime
    fn name() -> &'static str;

    /// Get the default device
    fn default_device() -> Self::Device;

    /// Get the default client for a device
    fn default_client(device: &Self::Device) -> Self::Client;
}
