//! Level-of-detail downsampling.
//!
//! Series above the draw budget are split into index buckets. Each bucket is
//! reduced either to its extrema (spikes survive, used by line, bar and
//! heatmap) or to a single averaged point (used by scatter).

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::state::{DOWNSAMPLE_BUCKETS, MAX_DRAW_POINTS};
use crate::stream::Sample;

/// How a bucket is reduced
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DownsampleMode {
    /// Keep the min- and max-value samples of each bucket
    Extrema,
    /// One synthetic point: rounded mean time, mean value, most frequent label
    Mean,
}

/// Point budget above which a series is downsampled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LodBudget {
    pub max_points: usize,
    pub buckets: usize,
}

impl Default for LodBudget {
    fn default() -> Self {
        Self {
            max_points: MAX_DRAW_POINTS,
            buckets: DOWNSAMPLE_BUCKETS,
        }
    }
}

/// Reduce `samples` to at most `2 * buckets` (extrema) or `buckets` (mean) points.
///
/// Bucket `b` covers indices `[b*n/K, min(n, (b+1)*n/K))`; empty buckets are
/// skipped. The result is sorted by time ascending.
pub fn downsample(samples: &[Sample], buckets: usize, mode: DownsampleMode) -> Vec<Sample> {
    let n = samples.len();
    if n == 0 || buckets == 0 {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(match mode {
        DownsampleMode::Extrema => buckets * 2,
        DownsampleMode::Mean => buckets,
    });

    for b in 0..buckets {
        let start = b * n / buckets;
        let end = ((b + 1) * n / buckets).min(n);
        if start >= end {
            continue;
        }
        let bucket = &samples[start..end];
        match mode {
            DownsampleMode::Extrema => push_extrema(bucket, &mut out),
            DownsampleMode::Mean => out.push(bucket_mean(bucket)),
        }
    }

    out.sort_by_key(|s| s.time);
    out
}

fn push_extrema(bucket: &[Sample], out: &mut Vec<Sample>) {
    let mut min_idx = 0;
    let mut max_idx = 0;
    for (i, s) in bucket.iter().enumerate().skip(1) {
        if s.value < bucket[min_idx].value {
            min_idx = i;
        }
        if s.value > bucket[max_idx].value {
            max_idx = i;
        }
    }

    if min_idx == max_idx {
        out.push(bucket[min_idx].clone());
        return;
    }

    let (first, second) = {
        let (a, b) = (&bucket[min_idx], &bucket[max_idx]);
        if (b.time, max_idx) < (a.time, min_idx) {
            (b, a)
        } else {
            (a, b)
        }
    };
    out.push(first.clone());
    out.push(second.clone());
}

fn bucket_mean(bucket: &[Sample]) -> Sample {
    let count = bucket.len() as i128;
    let time_sum: i128 = bucket.iter().map(|s| s.time as i128).sum();
    // Round half up, matching the browser's Math.round on the mean time
    let time = (2 * time_sum + count).div_euclid(2 * count) as i64;
    let value = bucket.iter().map(|s| s.value).sum::<f64>() / bucket.len() as f64;

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for s in bucket {
        *counts.entry(s.label.as_str()).or_default() += 1;
    }
    // Ties go to the first label in sorted order
    let mut label = "";
    let mut best = 0;
    for (candidate, c) in counts {
        if c > best {
            best = c;
            label = candidate;
        }
    }

    Sample::new(time, value, label)
}

/// Apply the budget: borrow the input when it fits, downsample otherwise
pub fn level_of_detail<'a>(
    samples: &'a [Sample],
    budget: LodBudget,
    mode: DownsampleMode,
) -> Cow<'a, [Sample]> {
    if samples.len() <= budget.max_points {
        Cow::Borrowed(samples)
    } else {
        Cow::Owned(downsample(samples, budget.buckets, mode))
    }
}
