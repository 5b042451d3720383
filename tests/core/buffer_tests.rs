//! Tests for the ingestion buffer
//!
//! Tests cover:
//! - Bounded retention for any capacity and push count
//! - Snapshot isolation from later pushes
//! - Revision counting
//! - Lazy capacity changes and the ingestor's clamping

use std::time::{Duration, Instant};

use streamscope::stream::{IngestionBuffer, Ingestor, SyntheticSource};

use crate::common::sample;

// ============================================
// Retention Tests
// ============================================

#[test]
fn test_buffer_keeps_last_capacity_pushes() {
    for capacity in [1usize, 2, 7, 100] {
        for pushes in [0usize, 1, capacity, capacity + 1, capacity * 3 + 2] {
            let mut buffer = IngestionBuffer::new(capacity);
            for i in 0..pushes {
                buffer.push(sample(i as i64, i as f64, "alpha"));
            }

            let expected: Vec<i64> = (pushes.saturating_sub(capacity)..pushes)
                .map(|i| i as i64)
                .collect();
            let actual: Vec<i64> = buffer.snapshot().iter().map(|s| s.time).collect();
            assert_eq!(
                actual, expected,
                "capacity {} after {} pushes should hold the last min(N, C) samples",
                capacity, pushes
            );
            assert!(buffer.len() <= capacity);
        }
    }
}

#[test]
fn test_buffer_preserves_insertion_order() {
    let mut buffer = IngestionBuffer::new(10);
    buffer.push(sample(5, 1.0, "alpha"));
    buffer.push(sample(3, 2.0, "beta"));
    let times: Vec<i64> = buffer.snapshot().iter().map(|s| s.time).collect();
    assert_eq!(times, vec![5, 3], "the buffer never re-sorts");
}

// ============================================
// Snapshot Tests
// ============================================

#[test]
fn test_snapshot_survives_eviction() {
    let mut buffer = IngestionBuffer::new(3);
    for i in 0..3 {
        buffer.push(sample(i, 0.0, "alpha"));
    }
    let before = buffer.snapshot();
    for i in 3..10 {
        buffer.push(sample(i, 0.0, "alpha"));
    }

    let times: Vec<i64> = before.iter().map(|s| s.time).collect();
    assert_eq!(times, vec![0, 1, 2], "old snapshot must be untouched");
    assert_eq!(before.revision(), 3);
    assert_eq!(buffer.revision(), 10);
}

#[test]
fn test_many_readers_share_one_snapshot() {
    let mut buffer = IngestionBuffer::new(100);
    buffer.extend((0..50).map(|i| sample(i, 1.0, "alpha")));
    let a = buffer.snapshot();
    let b = a.clone();
    assert_eq!(a.len(), b.len());
    assert_eq!(a.revision(), b.revision());
}

// ============================================
// Capacity Tests
// ============================================

#[test]
fn test_capacity_change_applies_on_next_push() {
    let mut buffer = IngestionBuffer::new(20);
    buffer.extend((0..20).map(|i| sample(i, 0.0, "alpha")));
    buffer.set_capacity(5);
    assert_eq!(buffer.len(), 20);

    buffer.push(sample(20, 0.0, "alpha"));
    let times: Vec<i64> = buffer.snapshot().iter().map(|s| s.time).collect();
    assert_eq!(times, vec![16, 17, 18, 19, 20]);
}

#[test]
fn test_ingestor_clamps_retention() {
    let mut ingestor = Ingestor::new(Box::new(SyntheticSource::seeded(1)));
    ingestor.set_capacity(10);
    assert_eq!(ingestor.buffer().capacity(), 500);
    ingestor.set_capacity(1_000_000);
    assert_eq!(ingestor.buffer().capacity(), 20_000);
}

#[test]
fn test_ingestor_pushes_once_per_interval() {
    let mut ingestor = Ingestor::new(Box::new(SyntheticSource::seeded(2))).with_poll_interval(50);
    let start = Instant::now();
    let mut pushed = 0;
    for ms in (0..1000).step_by(10) {
        if ingestor.poll(start + Duration::from_millis(ms), ms as i64) {
            pushed += 1;
        }
    }
    assert_eq!(pushed, 20, "one sample per 50 ms over one second");
    assert_eq!(ingestor.buffer().len(), 20);
}

#[test]
fn test_seed_replaces_contents() {
    let mut ingestor = Ingestor::new(Box::new(SyntheticSource::seeded(3)));
    ingestor.tick(0);
    let batch = SyntheticSource::seeded(4).seed_batch(10_000, 20_000_000);
    ingestor.seed(batch);
    assert_eq!(ingestor.buffer().len(), 10_000);
}

#[test]
fn test_bootstrap_batch_respects_capacity() {
    let mut ingestor = Ingestor::new(Box::new(SyntheticSource::seeded(5))).with_capacity(500);
    ingestor.bootstrap((0..800).map(|i| sample(i, 1.0, "beta")).collect());
    assert_eq!(ingestor.buffer().len(), 500);
    assert_eq!(ingestor.snapshot()[0].time, 300, "oldest bootstrap samples evicted first");
    assert_eq!(ingestor.buffer().revision(), 1);
}
