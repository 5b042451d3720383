//! Tests for level-of-detail downsampling
//!
//! Tests cover:
//! - Output bounds for both modes
//! - Time ordering of the output
//! - Pass-through at or under the draw budget
//! - Extrema preservation

use std::borrow::Cow;

use streamscope::pipeline::{downsample, level_of_detail, DownsampleMode, LodBudget};

use crate::common::series;

#[test]
fn test_output_is_bounded_and_sorted() {
    for n in [5_001usize, 12_000, 50_000] {
        let samples = series(n, &["alpha", "beta", "gamma"]);
        let extrema = downsample(&samples, 2000, DownsampleMode::Extrema);
        let mean = downsample(&samples, 2000, DownsampleMode::Mean);

        assert!(extrema.len() <= 4000, "extrema output for {} is {}", n, extrema.len());
        assert!(mean.len() <= 2000, "mean output for {} is {}", n, mean.len());
        assert!(extrema.windows(2).all(|w| w[0].time <= w[1].time));
        assert!(mean.windows(2).all(|w| w[0].time <= w[1].time));
    }
}

#[test]
fn test_within_budget_is_unchanged() {
    let samples = series(5_000, &["alpha"]);
    for mode in [DownsampleMode::Extrema, DownsampleMode::Mean] {
        let out = level_of_detail(&samples, LodBudget::default(), mode);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(&*out, &samples[..]);
    }
}

#[test]
fn test_over_budget_is_reduced() {
    let samples = series(5_001, &["alpha"]);
    let out = level_of_detail(&samples, LodBudget::default(), DownsampleMode::Extrema);
    assert!(out.len() < samples.len());
}

#[test]
fn test_extrema_preserve_global_min_and_max() {
    let mut samples = series(20_000, &["alpha"]);
    samples[12_345].value = 1_000.0;
    samples[777].value = -1_000.0;
    let out = downsample(&samples, 2000, DownsampleMode::Extrema);
    assert!(out.iter().any(|s| s.value == 1_000.0));
    assert!(out.iter().any(|s| s.value == -1_000.0));
}

#[test]
fn test_fewer_points_than_buckets_skips_empty_buckets() {
    let samples = series(10, &["alpha"]);
    let out = downsample(&samples, 2000, DownsampleMode::Mean);
    assert_eq!(out.len(), 10, "each non-empty bucket holds exactly one sample");
}
