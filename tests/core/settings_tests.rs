//! Tests for settings persistence

use streamscope::error::SettingsError;
use streamscope::pipeline::{ActiveLabels, AggregationMode};
use streamscope::render::ValueRange;
use streamscope::settings::DashboardSettings;
use streamscope::state::ChartKind;

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    let settings = DashboardSettings {
        poll_interval_ms: 250,
        retention: 5_000,
        active_labels: ActiveLabels::new(["alpha", "gamma"]),
        aggregation: AggregationMode::FiveMinutes,
        chart_kind: ChartKind::Heatmap,
        running: false,
        value_range: ValueRange::new(-10.0, 10.0),
        use_worker: false,
        feed_url: Some("http://localhost:8080/samples".to_string()),
        ..Default::default()
    };
    settings.save_to(&path).unwrap();

    let loaded = DashboardSettings::load_from(&path).unwrap();
    assert_eq!(loaded, settings);
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();

    let result = DashboardSettings::load_from(&path);
    assert!(matches!(result, Err(SettingsError::Serde(_))), "got {:?}", result);
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = DashboardSettings::load_from(&dir.path().join("absent.json"));
    assert!(matches!(result, Err(SettingsError::Io(_))));
}

#[test]
fn test_loaded_values_are_clamped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{"poll_interval_ms": 5000, "retention": 3, "aggregation": "1h"}"#,
    )
    .unwrap();

    let loaded = DashboardSettings::load_from(&path).unwrap();
    assert_eq!(loaded.poll_interval_ms, 500);
    assert_eq!(loaded.retention, 500);
    assert_eq!(loaded.aggregation, AggregationMode::OneHour);
    assert_eq!(loaded.chart_kind, ChartKind::Line);
}
