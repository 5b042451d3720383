//! Time-bucket aggregation.
//!
//! In raw mode samples pass through (time-sorted). Otherwise every
//! `(label, bucket)` pair collapses to one sample at the bucket midpoint
//! carrying the mean value.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::stream::Sample;

/// Aggregation granularity
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
pub enum AggregationMode {
    #[default]
    #[serde(rename = "raw")]
    #[strum(serialize = "raw")]
    Raw,
    #[serde(rename = "1m")]
    #[strum(serialize = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    #[strum(serialize = "5m")]
    FiveMinutes,
    #[serde(rename = "1h")]
    #[strum(serialize = "1h")]
    OneHour,
}

impl AggregationMode {
    /// Bucket width in milliseconds (0 for raw)
    pub fn bucket_width_ms(&self) -> i64 {
        match self {
            AggregationMode::Raw => 0,
            AggregationMode::OneMinute => 60_000,
            AggregationMode::FiveMinutes => 300_000,
            AggregationMode::OneHour => 3_600_000,
        }
    }
}

#[derive(Default)]
struct BucketAccumulator {
    sum: f64,
    count: u32,
}

/// Group samples into fixed-width time buckets per label.
///
/// `width_ms <= 0` returns a stable time-sorted copy. Bucket starts use floor
/// division, so negative times land in the bucket below zero. The output is
/// sorted by time, with ties ordered by label.
pub fn aggregate(samples: &[Sample], width_ms: i64) -> Vec<Sample> {
    if width_ms <= 0 {
        let mut sorted = samples.to_vec();
        sorted.sort_by_key(|s| s.time);
        return sorted;
    }

    let mut buckets: HashMap<(&str, i64), BucketAccumulator> = HashMap::new();
    for sample in samples {
        let start = sample.time.div_euclid(width_ms) * width_ms;
        let acc = buckets.entry((sample.label.as_str(), start)).or_default();
        acc.sum += sample.value;
        acc.count += 1;
    }

    let half = width_ms / 2;
    let mut out: Vec<Sample> = buckets
        .into_iter()
        .map(|((label, start), acc)| Sample::new(start + half, acc.sum / acc.count as f64, label))
        .collect();
    out.sort_by(|a, b| a.time.cmp(&b.time).then_with(|| a.label.cmp(&b.label)));
    out
}
