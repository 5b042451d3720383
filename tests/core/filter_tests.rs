//! Tests for the category filter

use streamscope::pipeline::{filter_by_labels, ActiveLabels};

use crate::common::{sample, series};

#[test]
fn test_filter_is_exact_ordered_subsequence() {
    let samples = series(300, &["alpha", "beta", "gamma", ""]);
    let active = ActiveLabels::new(["alpha", "gamma"]);
    let filtered = filter_by_labels(&samples, &active);

    let expected: Vec<_> = samples
        .iter()
        .filter(|s| s.label == "alpha" || s.label == "gamma")
        .cloned()
        .collect();
    assert_eq!(filtered, expected, "filter keeps exactly the enabled labels, in order");
}

#[test]
fn test_filter_does_not_treat_empty_label_as_default() {
    let samples = vec![sample(0, 1.0, ""), sample(1, 1.0, "default")];
    let filtered = filter_by_labels(&samples, &ActiveLabels::new(["default"]));
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].time, 1);
}

#[test]
fn test_active_labels_iterate_sorted() {
    let active = ActiveLabels::new(["gamma", "alpha", "beta"]);
    let labels: Vec<&str> = active.iter().collect();
    assert_eq!(labels, vec!["alpha", "beta", "gamma"]);
}

#[test]
fn test_active_labels_serialize_as_list() {
    let json = serde_json::to_string(&ActiveLabels::new(["beta", "alpha"])).unwrap();
    assert_eq!(json, r#"["alpha","beta"]"#);
}
