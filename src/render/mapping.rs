//! Data-space to surface-space mapping shared by the renderers.

use serde::{Deserialize, Serialize};

use crate::stream::Sample;

/// Value domain mapped onto the surface height
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl Default for ValueRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
        }
    }
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Position of `value` in the range, `0` at `min` and `1` at `max`. Not clamped.
    #[inline]
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span.abs() < f64::EPSILON {
            return 0.0;
        }
        (value - self.min) / span
    }
}

/// Maps sample time and value to logical surface coordinates.
///
/// The time axis spans the first to the last point of the (time-sorted)
/// input, with a minimum span of one millisecond.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    min_t: i64,
    span_t: f64,
    width: f32,
    height: f32,
    range: ValueRange,
}

impl Projection {
    /// `None` for an empty input
    pub fn from_points(
        points: &[Sample],
        width: f32,
        height: f32,
        range: ValueRange,
    ) -> Option<Self> {
        let first = points.first()?;
        let last = points.last()?;
        let span_t = (last.time - first.time).max(1) as f64;
        Some(Self {
            min_t: first.time,
            span_t,
            width,
            height,
            range,
        })
    }

    /// Fraction of the time span covered up to `t`
    #[inline]
    pub fn time_fraction(&self, t: i64) -> f64 {
        (t - self.min_t) as f64 / self.span_t
    }

    #[inline]
    pub fn x(&self, t: i64) -> f32 {
        (self.time_fraction(t) * self.width as f64) as f32
    }

    #[inline]
    pub fn y(&self, value: f64) -> f32 {
        self.height - (self.range.normalize(value) * self.height as f64) as f32
    }

    /// Index of the time bucket holding `t` when the span is cut into `n` buckets
    #[inline]
    pub fn bucket_index(&self, t: i64, n: usize) -> usize {
        let idx = (self.time_fraction(t) * n as f64).floor();
        if idx <= 0.0 {
            0
        } else {
            (idx as usize).min(n.saturating_sub(1))
        }
    }

    pub fn range(&self) -> ValueRange {
        self.range
    }
}
