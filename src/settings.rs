//! Dashboard settings persistence.
//!
//! This module handles loading and saving the dashboard configuration
//! (poll rate, retention, filters, chart selection) across sessions.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::SettingsError;
use crate::pipeline::{ActiveLabels, AggregationMode};
use crate::render::ValueRange;
use crate::state::{
    ChartKind, DEFAULT_POLL_INTERVAL_MS, DEFAULT_RETENTION, MAX_POLL_INTERVAL_MS, MAX_RETENTION,
    MIN_POLL_INTERVAL_MS, MIN_RETENTION,
};

/// Current settings file version
pub const SETTINGS_VERSION: u32 = 1;

/// Dashboard settings that persist across sessions
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardSettings {
    /// Settings file version for migration support
    #[serde(default = "default_version")]
    pub version: u32,
    /// Ingestion poll interval in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Number of samples retained in the buffer
    #[serde(default = "default_retention")]
    pub retention: usize,
    #[serde(default = "ActiveLabels::all")]
    pub active_labels: ActiveLabels,
    #[serde(default)]
    pub aggregation: AggregationMode,
    #[serde(default)]
    pub chart_kind: ChartKind,
    #[serde(default = "default_true")]
    pub running: bool,
    #[serde(default)]
    pub value_range: ValueRange,
    /// Render the line chart on a worker thread when possible
    #[serde(default = "default_true")]
    pub use_worker: bool,
    /// HTTP batch feed; the synthetic generator is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_url: Option<String>,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_retention() -> usize {
    DEFAULT_RETENTION
}

fn default_true() -> bool {
    true
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            retention: DEFAULT_RETENTION,
            active_labels: ActiveLabels::all(),
            aggregation: AggregationMode::default(),
            chart_kind: ChartKind::default(),
            running: true,
            value_range: ValueRange::default(),
            use_worker: true,
            feed_url: None,
        }
    }
}

impl DashboardSettings {
    /// Get the config directory path for StreamScope
    pub fn get_config_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::data_dir().map(|p| p.join("StreamScope"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|p| p.join("StreamScope"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            dirs::config_dir().map(|p| p.join("streamscope"))
        }
    }

    /// Get the path to the settings JSON file
    pub fn get_settings_path() -> Option<PathBuf> {
        Self::get_config_dir().map(|p| p.join("settings.json"))
    }

    /// Force every bounded field back into range
    pub fn clamped(mut self) -> Self {
        self.poll_interval_ms = self
            .poll_interval_ms
            .clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS);
        self.retention = self.retention.clamp(MIN_RETENTION, MAX_RETENTION);
        let ValueRange { min, max } = self.value_range;
        if !min.is_finite() || !max.is_finite() || max <= min {
            self.value_range = ValueRange::default();
        }
        self
    }

    /// Load settings from disk, falling back to defaults on any failure
    pub fn load() -> Self {
        match Self::get_settings_path() {
            Some(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable settings at {:?}: {}", path, e);
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    /// Load settings from a specific file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&content)?;
        Ok(settings.clamped())
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::get_settings_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save settings to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
