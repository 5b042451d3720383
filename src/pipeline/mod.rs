//! Derivation pipeline: filter → aggregate → (per chart) downsample.
//!
//! [`derive`] turns a buffer snapshot into the points every chart consumes.
//! [`Pipeline`] memoizes the last derivation keyed by the buffer revision and
//! the settings that feed it, so several charts reading the same snapshot in
//! one frame share a single pass.

pub mod aggregate;
pub mod downsample;
pub mod filter;

use std::sync::Arc;

pub use aggregate::{aggregate, AggregationMode};
pub use downsample::{downsample, level_of_detail, DownsampleMode, LodBudget};
pub use filter::{filter_by_labels, ActiveLabels};

use crate::state::DEFAULT_LABEL;
use crate::stream::{Sample, Snapshot};

/// Sizes at each pipeline stage, shown in the debug panel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PipelineCounts {
    pub raw: usize,
    pub filtered: usize,
    pub aggregated: usize,
}

/// Points ready for the renderers, plus where they came from
#[derive(Clone, Debug, Default)]
pub struct DerivedFrame {
    pub points: Vec<Sample>,
    /// Filter output before aggregation, for the data tables
    pub filtered: Vec<Sample>,
    pub counts: PipelineCounts,
    /// Buffer revision the frame was derived from
    pub revision: u64,
}

/// Run filter and aggregation over a snapshot.
///
/// The `default` sentinel is stripped after aggregation so unlabeled samples
/// never reach a chart.
pub fn derive(snapshot: &Snapshot, labels: &ActiveLabels, mode: AggregationMode) -> DerivedFrame {
    let filtered = filter_by_labels(snapshot, labels);
    let mut points = aggregate(&filtered, mode.bucket_width_ms());
    let aggregated = points.len();
    points.retain(|s| s.label != DEFAULT_LABEL);

    DerivedFrame {
        counts: PipelineCounts {
            raw: snapshot.len(),
            filtered: filtered.len(),
            aggregated,
        },
        points,
        filtered,
        revision: snapshot.revision(),
    }
}

/// Memoizing wrapper around [`derive`]
#[derive(Default)]
pub struct Pipeline {
    cached: Option<(u64, ActiveLabels, AggregationMode, Arc<DerivedFrame>)>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derived frame for this snapshot, recomputed only when an input changed
    pub fn derive(
        &mut self,
        snapshot: &Snapshot,
        labels: &ActiveLabels,
        mode: AggregationMode,
    ) -> Arc<DerivedFrame> {
        if let Some((revision, cached_labels, cached_mode, frame)) = &self.cached {
            if *revision == snapshot.revision() && cached_labels == labels && *cached_mode == mode
            {
                return Arc::clone(frame);
            }
        }

        let frame = Arc::new(derive(snapshot, labels, mode));
        self.cached = Some((snapshot.revision(), labels.clone(), mode, Arc::clone(&frame)));
        frame
    }
}
