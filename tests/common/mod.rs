//! Common test utilities
#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use wghist::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime};
use wghist::runtime::{DeviceLimits, Runtime};

/// Create a CPU client and device for testing
pub fn create_cpu_client() -> (CpuClient, CpuDevice) {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);
    (client, device)
}

/// Create a CPU client whose device reports the given limits
pub fn create_limited_client(max_work_group_size: u32, local_mem_size: usize) -> CpuClient {
    let device = CpuDevice::with_limits(DeviceLimits {
        max_work_group_size,
        local_mem_size,
        compute_units: 1,
    });
    CpuRuntime::default_client(&device)
}

/// `n` uniformly distributed values in `[lo, hi)` from a fixed seed
pub fn uniform_samples(n: usize, lo: f64, hi: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.random_range(lo..hi)).collect()
}

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Reference histogram over increasing `edges`, last bin closed
pub fn reference_histogram(sample: &[f64], edges: &[f64], weights: Option<&[f64]>) -> Vec<f64> {
    let bins = edges.len() - 1;
    let mut hist = vec![0.0; bins];
    for (i, &v) in sample.iter().enumerate() {
        if v.is_nan() || v < edges[0] || v > edges[bins] {
            continue;
        }
        let bin = edges.partition_point(|&e| e <= v).saturating_sub(1).min(bins - 1);
        hist[bin] += weights.map_or(1.0, |w| w[i]);
    }
    hist
}
