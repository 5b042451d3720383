//! Category filter over the active label set.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::state::DEFAULT_CATEGORIES;
use crate::stream::Sample;

/// The set of enabled labels. Iterates in sorted order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveLabels(BTreeSet<String>);

impl ActiveLabels {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(labels.into_iter().map(Into::into).collect())
    }

    /// Every label of the built-in category set
    pub fn all() -> Self {
        Self::new(DEFAULT_CATEGORIES.iter().copied())
    }

    #[inline]
    pub fn contains(&self, label: &str) -> bool {
        self.0.contains(label)
    }

    /// Enable or disable a label. Returns whether the set changed.
    pub fn toggle(&mut self, label: &str, enabled: bool) -> bool {
        if enabled {
            self.0.insert(label.to_string())
        } else {
            self.0.remove(label)
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Keep the samples whose label is enabled, preserving order.
///
/// Membership is exact string equality; an empty label only passes if the
/// empty string itself is enabled.
pub fn filter_by_labels(samples: &[Sample], active: &ActiveLabels) -> Vec<Sample> {
    samples
        .iter()
        .filter(|s| active.contains(&s.label))
        .cloned()
        .collect()
}
