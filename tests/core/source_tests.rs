//! Tests for sample feeds and batch parsing

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use serde_json::json;
use streamscope::stream::{parse_batch, HttpBatchSource, Sample, SampleSource, SyntheticSource};

use crate::common::wait_until;

const TIMEOUT: Duration = Duration::from_secs(5);

/// Serve every connection on a local port with a fixed status and body
fn serve(status: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            let mut request = [0u8; 2048];
            let _ = stream.read(&mut request);
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\
                 Connection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });
    format!("http://{}/samples", addr)
}

#[test]
fn test_parse_bare_array() {
    let samples = parse_batch(json!([{"t": 1, "v": 2.0, "label": "beta"}]), 0).unwrap();
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].label, "beta");
}

#[test]
fn test_parse_samples_wrapper() {
    let samples = parse_batch(json!({"samples": [{"v": 7.0}]}), 1234).unwrap();
    assert_eq!(samples[0].time, 1234, "missing time falls back to the ingest clock");
    assert_eq!(samples[0].value, 7.0);
    assert_eq!(samples[0].label, "default");
}

#[test]
fn test_parse_skips_non_object_records() {
    let samples = parse_batch(json!({"result": [1, {"timestamp": 5}, "x"]}), 0).unwrap();
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].time, 5);
    assert_eq!(samples[0].value, 0.0);
}

#[test]
fn test_parse_defaults_mistyped_fields() {
    let body = json!([
        {"timestamp": 1, "magnitude": 10.0, "label": "alpha"},
        {"timestamp": "oops", "magnitude": 20.0, "label": "beta"},
        {"timestamp": 3, "magnitude": "high", "label": 42}
    ]);
    let samples = parse_batch(body, 9_000).unwrap();
    assert_eq!(samples.len(), 3, "no record is rejected for a bad field");
    assert_eq!(samples[0], Sample::new(1, 10.0, "alpha"));
    assert_eq!(samples[1], Sample::new(9_000, 20.0, "beta"));
    assert_eq!(samples[2], Sample::new(3, 0.0, "default"));
}

#[test]
fn test_synthetic_feed_uses_category_set() {
    let mut source = SyntheticSource::seeded(9).with_labels(["x", "y"]);
    for t in 0..100 {
        let label = source.next_sample(t).unwrap().label;
        assert!(label == "x" || label == "y", "unexpected label {}", label);
    }
    assert_eq!(source.name(), "synthetic");
}

// ============================================
// HTTP Feed Tests
// ============================================

#[test]
fn test_http_feed_fetches_in_background() {
    let url = serve(
        "200 OK",
        r#"{"result": [{"timestamp": 1, "magnitude": 5.0, "label": "alpha"}, {"timestamp": 2}]}"#,
    );
    let mut source = HttpBatchSource::new(url);

    assert_eq!(source.next_sample(100), None, "the first tick only starts the request");
    assert!(source.is_fetching());

    let mut received = Vec::new();
    let done = wait_until(TIMEOUT, || {
        received.extend(source.next_sample(100));
        received.len() == 2
    });
    assert!(done, "queued samples are served one per tick");
    assert_eq!(received[0], Sample::new(1, 5.0, "alpha"));
    assert_eq!(received[1], Sample::new(2, 0.0, "default"));
    assert_eq!(source.failures(), 0);
}

#[test]
fn test_http_feed_backs_off_after_failure() {
    let url = serve("500 Internal Server Error", "{}");
    let mut source = HttpBatchSource::new(url);
    source.next_sample(0);

    let failed = wait_until(TIMEOUT, || {
        source.next_sample(0);
        source.failures() == 1
    });
    assert!(failed);
    assert!(!source.is_fetching());

    assert_eq!(source.next_sample(500), None);
    assert!(!source.is_fetching(), "no retry before the backoff delay");
    source.next_sample(1_000);
    assert!(source.is_fetching(), "retry once the delay has passed");
}
