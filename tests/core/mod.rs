//! Core module tests
//!
//! Tests for:
//! - Bounded retention and snapshots
//! - Sample feeds and batch parsing
//! - Category filtering
//! - Time-bucket aggregation
//! - Level-of-detail downsampling
//! - View transform interaction
//! - Renderers
//! - Settings persistence

pub mod aggregate_tests;
pub mod buffer_tests;
pub mod downsample_tests;
pub mod filter_tests;
pub mod render_tests;
pub mod settings_tests;
pub mod source_tests;
pub mod view_tests;
