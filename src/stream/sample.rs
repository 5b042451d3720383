//! Sample types: the immutable `Sample` and its lenient wire form `RawSample`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::DEFAULT_LABEL;

/// Accepted keys for each field, in lookup order
const TIME_KEYS: &[&str] = &["t", "time", "timestamp"];
const VALUE_KEYS: &[&str] = &["v", "value", "magnitude"];

/// One labeled scalar observation.
///
/// Serialized with the short field names used on the worker wire
/// (`{"t": .., "v": .., "label": ..}`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Monotonic timestamp in milliseconds
    #[serde(rename = "t")]
    pub time: i64,
    /// Scalar value
    #[serde(rename = "v")]
    pub value: f64,
    /// Category used for grouping, coloring and filtering
    pub label: String,
}

impl Sample {
    pub fn new(time: i64, value: f64, label: impl Into<String>) -> Self {
        Self {
            time,
            value,
            label: label.into(),
        }
    }

    /// Label used for grouping and coloring; empty labels fold into `default`
    #[inline]
    pub fn series_label(&self) -> &str {
        if self.label.is_empty() {
            DEFAULT_LABEL
        } else {
            &self.label
        }
    }
}

/// A sample as it arrives from a feed or over the worker wire.
///
/// Every field is optional; [`RawSample::normalize`] substitutes defaults
/// instead of rejecting incomplete records. Deserialization never fails on
/// a field: a field of the wrong type is read as absent. The demo
/// endpoint's `timestamp`/`magnitude` field names are accepted as aliases.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct RawSample {
    #[serde(rename = "t")]
    pub time: Option<f64>,
    #[serde(rename = "v")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl From<Value> for RawSample {
    fn from(record: Value) -> Self {
        let number = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| record.get(*key))
                .and_then(Value::as_f64)
        };
        Self {
            time: number(TIME_KEYS),
            value: number(VALUE_KEYS),
            label: record
                .get("label")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}

impl RawSample {
    /// Fill in missing fields: `label = "default"`, `value = 0`, `time = fallback_time`
    pub fn normalize(self, fallback_time: i64) -> Sample {
        let time = match self.time {
            Some(t) if t.is_finite() => t.round() as i64,
            _ => fallback_time,
        };
        let value = match self.value {
            Some(v) if v.is_finite() => v,
            _ => 0.0,
        };
        Sample {
            time,
            value,
            label: self.label.unwrap_or_else(|| DEFAULT_LABEL.to_string()),
        }
    }
}

impl From<&Sample> for RawSample {
    fn from(sample: &Sample) -> Self {
        Self {
            time: Some(sample.time as f64),
            value: Some(sample.value),
            label: Some(sample.label.clone()),
        }
    }
}
