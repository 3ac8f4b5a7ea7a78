//! Tests for the histogram operations exposed by runtime clients

mod common;

use common::{assert_allclose_f64, create_cpu_client, create_limited_client, uniform_samples};
use wghist::error::Error;
use wghist::histogram::{AccumulatorPolicy, CachePolicy, HistogramConfig, HistogramOps};

fn configs() -> Vec<HistogramConfig> {
    let base = HistogramConfig::default();
    vec![
        base.clone(),
        base.clone().with_work_per_item(1).with_local_size(4),
        base.clone()
            .with_accumulator(AccumulatorPolicy::GlobalMemory)
            .with_edges_cache(CachePolicy::Uncached),
        base.clone()
            .with_accumulator(AccumulatorPolicy::LocalCopies)
            .with_edges_cache(CachePolicy::Cached)
            .with_work_per_item(3)
            .with_local_size(8),
        base.with_accumulator(AccumulatorPolicy::GlobalMemory)
            .with_edges_cache(CachePolicy::Cached),
    ]
}

// ============================================================================
// histogram
// ============================================================================

#[test]
fn test_histogram_one_sample_per_bin() {
    let (client, _) = create_cpu_client();
    let sample: Vec<f64> = (0..10).map(f64::from).collect();
    let edges: Vec<f64> = (0..=10).map(f64::from).collect();

    for config in configs() {
        let result = client.histogram::<f64, u64>(&sample, &edges, None, &config).unwrap();
        assert_eq!(result.values, vec![1; 10], "{:?}", config);
    }
}

#[test]
fn test_histogram_uniform_random_sample() {
    let (client, _) = create_cpu_client();
    let sample = uniform_samples(1000, 0.0, 10.0, 42);
    let edges: Vec<f64> = (0..=10).map(f64::from).collect();

    let result = client
        .histogram::<f64, u64>(&sample, &edges, None, &HistogramConfig::default())
        .unwrap();
    assert_eq!(result.values.iter().sum::<u64>(), 1000);
    for (bin, &count) in result.values.iter().enumerate() {
        assert!(
            (50..=150).contains(&count),
            "bin {} holds {} samples",
            bin,
            count
        );
    }
}

#[test]
fn test_histogram_nan_reduces_sum_by_its_weight() {
    let (client, _) = create_cpu_client();
    let mut sample = uniform_samples(1000, 0.0, 10.0, 1);
    let weights = uniform_samples(1000, 0.5, 1.5, 2);
    let edges: Vec<f64> = (0..=10).map(f64::from).collect();
    let config = HistogramConfig::default();

    let full = client.histogram::<f64, f64>(&sample, &edges, Some(&weights[..]), &config).unwrap();
    sample[137] = f64::NAN;
    let dropped = client.histogram::<f64, f64>(&sample, &edges, Some(&weights[..]), &config).unwrap();

    let full_sum: f64 = full.values.iter().sum();
    let dropped_sum: f64 = dropped.values.iter().sum();
    assert_allclose_f64(&[dropped_sum], &[full_sum - weights[137]], 1e-12, 1e-9, "sum");
}

#[test]
fn test_histogram_f32_sample_f32_weights() {
    let (client, _) = create_cpu_client();
    let sample = [0.1f32, 0.2, 0.7, 1.0, 1.5];
    let edges = [0.0f32, 0.5, 1.0];
    let weights = [1.0f32, 0.5, 2.0, 4.0, 8.0];
    let result = client
        .histogram::<f32, f32>(&sample, &edges, Some(&weights[..]), &HistogramConfig::default())
        .unwrap();
    assert_eq!(result.values, vec![1.5, 6.0]);
}

#[test]
fn test_histogram_empty_sample() {
    let (client, _) = create_cpu_client();
    let edges = [0.0f64, 1.0, 2.0];
    let result = client
        .histogram::<f64, u32>(&[], &edges, None, &HistogramConfig::default())
        .unwrap();
    assert_eq!(result.values, vec![0, 0]);
    assert_eq!(result.report.groups, 1);
    assert_eq!(result.report.device_atomics, 0);
}

// ============================================================================
// Strategy selection
// ============================================================================

#[test]
fn test_large_integer_weights_match_across_strategies() {
    let (client, _) = create_cpu_client();
    let sample = uniform_samples(2000, 0.0, 2.0, 17);
    let edges = [0.0f64, 1.0, 2.0];
    let big: Vec<u64> = (0..2000u64).map(|i| 5_000_000_000 + i).collect();
    let signed: Vec<i64> = (0..2000i64).map(|i| -(1i64 << 33) + i).collect();
    let auto = HistogramConfig::default();
    let global = auto.clone().with_accumulator(AccumulatorPolicy::GlobalMemory);

    let a = client.histogram::<f64, u64>(&sample, &edges, Some(&big[..]), &auto).unwrap();
    let g = client.histogram::<f64, u64>(&sample, &edges, Some(&big[..]), &global).unwrap();
    assert_eq!(a.values, g.values);
    assert_eq!(a.plan.local_copies, None);
    assert_eq!(a.values.iter().sum::<u64>(), big.iter().sum::<u64>());

    let a = client.histogram::<f64, i64>(&sample, &edges, Some(&signed[..]), &auto).unwrap();
    let g = client.histogram::<f64, i64>(&sample, &edges, Some(&signed[..]), &global).unwrap();
    assert_eq!(a.values, g.values);
    assert_eq!(a.values.iter().sum::<i64>(), signed.iter().sum::<i64>());

    let unweighted = client.histogram::<f64, u64>(&sample, &edges, None, &auto).unwrap();
    assert!(unweighted.plan.local_copies.is_some());
    assert_eq!(unweighted.values.iter().sum::<u64>(), 2000);
}

#[test]
fn test_forced_local_copies_reject_weighted_wide_integers() {
    let (client, _) = create_cpu_client();
    let config = HistogramConfig::default().with_accumulator(AccumulatorPolicy::LocalCopies);
    let err = client
        .histogram::<f64, u64>(&[0.5, 1.5], &[0.0, 1.0, 2.0], Some(&[5_000_000_000u64, 7][..]), &config)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { arg: "accumulator", .. }));

    let counts = client
        .histogram::<f64, u64>(&[0.5, 1.5], &[0.0, 1.0, 2.0], None, &config)
        .unwrap();
    assert_eq!(counts.values, vec![1, 1]);
}

#[test]
fn test_plan_uses_local_copies_when_they_fit() {
    let (client, _) = create_cpu_client();
    let sample = uniform_samples(5000, 0.0, 10.0, 9);
    let edges: Vec<f64> = (0..=10).map(f64::from).collect();
    let result = client
        .histogram::<f64, u64>(&sample, &edges, None, &HistogramConfig::default())
        .unwrap();

    assert!(result.plan.edges_cached);
    let copies = result.plan.local_copies.unwrap();
    assert!(copies >= 1 && copies <= result.plan.local_size);
    let groups = result.report.groups as u64;
    assert!(result.report.device_atomics <= groups * 10);
}

#[test]
fn test_small_local_memory_falls_back_to_global() {
    let client = create_limited_client(8, 64);
    let sample = uniform_samples(500, 0.0, 100.0, 4);
    let edges: Vec<f64> = (0..=100).map(f64::from).collect();

    let result = client
        .histogram::<f64, u64>(&sample, &edges, None, &HistogramConfig::default())
        .unwrap();
    assert!(!result.plan.edges_cached);
    assert_eq!(result.plan.local_copies, None);
    assert_eq!(result.plan.local_size, 8);
    assert_eq!(result.values.iter().sum::<u64>(), 500);
    assert_eq!(result.report.device_atomics, 500);
}

#[test]
fn test_forced_local_copies_that_do_not_fit() {
    let client = create_limited_client(8, 64);
    let sample = [1.0f64, 2.0];
    let edges: Vec<f64> = (0..=100).map(f64::from).collect();
    let config = HistogramConfig::default().with_accumulator(AccumulatorPolicy::LocalCopies);

    let err = client
        .histogram::<f64, u64>(&sample, &edges, None, &config)
        .unwrap_err();
    assert!(matches!(err, Error::LocalMemoryExceeded { .. }));
}

#[test]
fn test_forced_cached_edges_that_do_not_fit() {
    let client = create_limited_client(8, 64);
    let sample = [1.0f64, 2.0];
    let edges: Vec<f64> = (0..=100).map(f64::from).collect();
    let config = HistogramConfig::default().with_edges_cache(CachePolicy::Cached);

    let err = client
        .histogram::<f64, u64>(&sample, &edges, None, &config)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::LocalMemoryExceeded {
            requested: 808,
            available: 64
        }
    ));
}

// ============================================================================
// histogram_uniform, histogramdd, bincount
// ============================================================================

#[test]
fn test_histogram_uniform_matches_explicit_edges() {
    let (client, _) = create_cpu_client();
    let sample = uniform_samples(3000, -1.0, 9.0, 21);
    let edges = [0.0f64, 2.0, 4.0, 6.0, 8.0];
    let config = HistogramConfig::default();

    let uniform = client
        .histogram_uniform::<f64, u64>(&sample, 4, (0.0, 8.0), None, &config)
        .unwrap();
    let explicit = client.histogram::<f64, u64>(&sample, &edges, None, &config).unwrap();
    assert_eq!(uniform.values, explicit.values);
    assert!(!uniform.plan.edges_cached);
}

#[test]
fn test_histogramdd() {
    let (client, _) = create_cpu_client();
    let x_edges = [0.0f64, 1.0, 2.0];
    let y_edges = [0.0f64, 10.0, 20.0, 30.0];
    let sample = [
        0.5, 5.0, // (0, 0)
        0.5, 25.0, // (0, 2)
        1.5, 15.0, // (1, 1)
        2.0, 30.0, // (1, 2), upper edges inclusive
        1.5, 15.0, // (1, 1)
        3.0, 15.0, // out of bounds
        f64::NAN, 5.0, // dropped
    ];
    let weights = [1u32, 2, 3, 4, 5, 6, 7];

    for config in configs() {
        let result = client
            .histogramdd::<f64, u32>(&sample, 2, &[&x_edges[..], &y_edges[..]], Some(&weights[..]), &config)
            .unwrap();
        assert_eq!(result.values, vec![1, 0, 2, 0, 8, 4], "{:?}", config);
    }
}

#[test]
fn test_bincount() {
    let (client, _) = create_cpu_client();
    let sample = [-1i64, 0, 0, 3, 7, 2];

    let counts = client
        .bincount::<i64, u64>(&sample, (0, 3), None, &HistogramConfig::default())
        .unwrap();
    assert_eq!(counts.values, vec![2, 0, 1, 1]);

    let weights = [1.0f64, 0.5, 0.25, 2.0, 3.0, 4.0];
    let weighted = client
        .bincount::<i64, f64>(&sample, (0, 3), Some(&weights[..]), &HistogramConfig::default())
        .unwrap();
    assert_eq!(weighted.values, vec![0.75, 0.0, 4.0, 2.0]);
}

#[test]
fn test_bincount_large_integers() {
    let (client, _) = create_cpu_client();
    let base = 1i64 << 53;
    let sample = [base + 1, base, base + 1, base + 3];
    let counts = client
        .bincount::<i64, u64>(&sample, (base, base + 2), None, &HistogramConfig::default())
        .unwrap();
    assert_eq!(counts.values, vec![1, 2, 0]);

    let top = [u64::MAX, u64::MAX - 2, 0];
    let counts = client
        .bincount::<u64, u32>(&top, (u64::MAX - 2, u64::MAX), None, &HistogramConfig::default())
        .unwrap();
    assert_eq!(counts.values, vec![1, 0, 1]);

    let err = client
        .bincount::<u64, u64>(&[1], (0, u64::MAX), None, &HistogramConfig::default())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { arg: "range", .. }));
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_validation_errors() {
    let (client, _) = create_cpu_client();
    let config = HistogramConfig::default();
    let sample = [1.0f64, 2.0, 3.0];

    let err = client
        .histogram::<f64, u64>(&sample, &[0.0, 2.0, 1.0], None, &config)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { arg: "bins", .. }));

    let err = client
        .histogram::<f64, u64>(&sample, &[0.0], None, &config)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { arg: "bins", .. }));

    let err = client
        .histogram::<f64, u64>(&sample, &[0.0, 4.0], Some(&[1u64, 2][..]), &config)
        .unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }));

    let err = client
        .histogram::<f64, u64>(&sample, &[0.0, 4.0], None, &config.clone().with_work_per_item(0))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { arg: "work_per_item", .. }));

    let err = client
        .histogram::<f64, u64>(&sample, &[0.0, 4.0], None, &config.clone().with_local_size(4096))
        .unwrap_err();
    assert!(matches!(err, Error::BackendLimitation { .. }));

    let dim_edges: &[f64] = &[0.0, 4.0];
    let err = client
        .histogramdd::<f64, u64>(&[0.0, 1.0, 2.0, 3.0], 2, &[dim_edges], None, &config)
        .unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }));

    let err = client
        .histogramdd::<f64, u64>(&[0.0, 1.0, 2.0], 2, &[dim_edges, dim_edges], None, &config)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { arg: "sample", .. }));

    let err = client
        .histogram_uniform::<f64, u64>(&sample, 4, (1.0, 1.0), None, &config)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { arg: "range", .. }));

    let err = client
        .bincount::<f64, u64>(&sample, (0.0, 3.0), None, &config)
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedDType { .. }));
}
