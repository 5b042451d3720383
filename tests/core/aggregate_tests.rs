//! Tests for time-bucket aggregation
//!
//! Tests cover:
//! - Raw-mode idempotence
//! - Bucket midpoints and means
//! - Output ordering

use streamscope::pipeline::{aggregate, AggregationMode};
use streamscope::stream::Sample;
use strum::IntoEnumIterator;

use crate::common::{sample, series};

// ============================================
// Raw Mode Tests
// ============================================

#[test]
fn test_raw_mode_is_idempotent() {
    let mut samples = series(200, &["alpha", "beta"]);
    samples.reverse();
    let once = aggregate(&samples, 0);
    let twice = aggregate(&once, 0);
    assert_eq!(once, twice, "raw aggregation applied twice equals once");
    assert!(once.windows(2).all(|w| w[0].time <= w[1].time));
}

#[test]
fn test_raw_mode_keeps_every_sample() {
    let samples = series(50, &["alpha"]);
    assert_eq!(aggregate(&samples, 0).len(), 50);
    assert_eq!(aggregate(&samples, -5).len(), 50, "negative widths behave as raw");
}

// ============================================
// Bucketing Tests
// ============================================

#[test]
fn test_one_minute_bucket_midpoints() {
    let samples = vec![sample(30_000, 15.0, "alpha"), sample(90_000, 30.0, "alpha")];
    let out = aggregate(&samples, 60_000);
    assert_eq!(
        out,
        vec![sample(30_000, 15.0, "alpha"), sample(90_000, 30.0, "alpha")],
        "each sample lands in its own minute, emitted at the bucket midpoint"
    );
}

#[test]
fn test_one_minute_buckets_average_shared_samples() {
    let samples = vec![
        sample(0, 10.0, "alpha"),
        sample(30_000, 20.0, "alpha"),
        sample(70_000, 30.0, "alpha"),
    ];
    let out = aggregate(&samples, 60_000);
    assert_eq!(
        out,
        vec![sample(30_000, 15.0, "alpha"), sample(90_000, 30.0, "alpha")],
        "the first two samples share a minute and are averaged"
    );
}

#[test]
fn test_bucket_mean_and_labels_are_separate() {
    let samples = vec![
        sample(0, 10.0, "alpha"),
        sample(59_999, 30.0, "alpha"),
        sample(10, 100.0, "beta"),
        sample(60_000, 50.0, "alpha"),
    ];
    let out = aggregate(&samples, 60_000);
    assert_eq!(
        out,
        vec![
            sample(30_000, 20.0, "alpha"),
            sample(30_000, 100.0, "beta"),
            sample(90_000, 50.0, "alpha"),
        ]
    );
}

#[test]
fn test_output_sorted_by_time() {
    let samples: Vec<Sample> = (0..500)
        .rev()
        .map(|i| sample(i * 7_919, i as f64, if i % 2 == 0 { "alpha" } else { "beta" }))
        .collect();
    let out = aggregate(&samples, AggregationMode::FiveMinutes.bucket_width_ms());
    assert!(out.windows(2).all(|w| w[0].time <= w[1].time));
    assert!(out.iter().all(|s| (s.time - 150_000) % 300_000 == 0));
}

#[test]
fn test_mode_widths() {
    let widths: Vec<i64> = AggregationMode::iter().map(|m| m.bucket_width_ms()).collect();
    assert_eq!(widths, vec![0, 60_000, 300_000, 3_600_000]);
}
