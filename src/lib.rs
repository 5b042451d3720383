//! StreamScope - A real-time telemetry visualization pipeline written in Rust
//!
//! This library ingests a stream of labeled samples into a bounded buffer,
//! filters and time-buckets them, downsamples them to a draw budget and
//! renders them as line, bar, scatter or heatmap charts, optionally on a
//! dedicated render thread.
//!
//! ## Module Structure
//!
//! - [`stream`] - Sample types, feeds, the ingestion buffer and its timer
//! - [`pipeline`] - Category filter, time-bucket aggregator and downsampler
//! - [`render`] - Drawing surfaces, the chart canvas and the renderers
//! - [`worker`] - Offscreen render worker and its message protocol
//! - [`view`] - Pan/zoom view transform and gesture handling
//! - [`chart`] - Per-chart scheduling, pause, worker lifetime and fallback
//! - [`dashboard`] - Wires ingestion, derivation and the active chart
//! - [`diagnostics`] - Draw-info events and FPS measurement
//! - [`settings`] - Dashboard settings persistence
//! - [`table`] - Row windowing and cell formatting for the data tables
//! - [`state`] - Core constants, palettes and the chart selector
//! - [`error`] - Error types
//! - [`app`] - eframe desktop shell

pub mod app;
pub mod chart;
pub mod dashboard;
pub mod diagnostics;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod settings;
pub mod state;
pub mod stream;
pub mod table;
pub mod view;
pub mod worker;
