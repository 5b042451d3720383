//! Core state types and constants.
//!
//! This module contains the fundamental constants shared by the pipeline and
//! the renderers: draw budgets, grid sizes, configuration bounds, the label
//! palette and the chart kind selector.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

// ============================================================================
// Labels
// ============================================================================

/// Reserved sentinel label for samples that arrive without one
pub const DEFAULT_LABEL: &str = "default";

/// Category set produced by the synthetic feed, in legend order
pub const DEFAULT_CATEGORIES: &[&str] = &["alpha", "beta", "gamma"];

/// Label palette (matches the dashboard legend)
pub const SERIES_COLORS: &[(&str, [u8; 3])] = &[
    ("alpha", [37, 99, 235]),         // #2563eb blue
    ("beta", [16, 185, 129]),         // #10b981 green
    ("gamma", [245, 158, 11]),        // #f59e0b amber
    (DEFAULT_LABEL, [107, 114, 128]), // #6b7280 gray
];

/// Fallback color for labels missing from the palette
pub const FALLBACK_COLOR: [u8; 3] = [107, 114, 128];

// ============================================================================
// Draw budgets
// ============================================================================

/// Series longer than this are downsampled before drawing
pub const MAX_DRAW_POINTS: usize = 5000;

/// Number of index buckets used by the downsampler
pub const DOWNSAMPLE_BUCKETS: usize = 2000;

/// Number of time buckets in the bar chart
pub const BAR_BUCKETS: usize = 60;

/// Fraction of the surface height the tallest bar stack may occupy
pub const BAR_HEIGHT_FRACTION: f32 = 0.8;

/// Heatmap grid rows
pub const HEATMAP_ROWS: usize = 20;

/// Heatmap grid columns
pub const HEATMAP_COLS: usize = 80;

/// Stroke width for line series (logical pixels)
pub const LINE_WIDTH: f32 = 1.6;

/// Radius of a scatter point (logical pixels)
pub const SCATTER_RADIUS: f32 = 2.2;

/// Minimum interval between draw requests sent to the render worker
pub const WORKER_DRAW_INTERVAL_MS: u64 = 100;

// ============================================================================
// Configuration bounds
// ============================================================================

/// Poll interval bounds in milliseconds
pub const MIN_POLL_INTERVAL_MS: u64 = 10;
pub const MAX_POLL_INTERVAL_MS: u64 = 500;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Retention capacity bounds in samples
pub const MIN_RETENTION: usize = 500;
pub const MAX_RETENTION: usize = 20_000;
pub const DEFAULT_RETENTION: usize = 1000;

/// Surface size used when a host reports a zero-sized canvas
pub const DEFAULT_SURFACE_WIDTH: u32 = 300;
pub const DEFAULT_SURFACE_HEIGHT: u32 = 150;

// ============================================================================
// Chart selection
// ============================================================================

/// The chart projection currently shown
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChartKind {
    /// Polyline per label, pan/zoom aware, optionally worker-rendered
    #[default]
    Line,
    /// Stacked per-label counts over time buckets
    Bar,
    /// One dot per sample
    Scatter,
    /// Label rows × time columns, colored by mean value
    Heatmap,
}

impl ChartKind {
    /// Whether this chart keeps extrema when downsampling (as opposed to averaging)
    pub fn keeps_extrema(&self) -> bool {
        !matches!(self, ChartKind::Scatter)
    }

    /// Whether this chart honors the pan/zoom view transform
    pub fn uses_view_transform(&self) -> bool {
        matches!(self, ChartKind::Line)
    }
}

/// Look up the palette color for a label, falling back to the default gray
pub fn label_color(label: &str) -> [u8; 3] {
    SERIES_COLORS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_COLOR)
}
