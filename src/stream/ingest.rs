//! Ingestion timer: pulls one sample per elapsed poll interval into the buffer.
//!
//! The ingestor runs independently of any chart's pause flag. It is driven
//! from the frame loop via [`Ingestor::poll`], which behaves like an interval
//! timer: the first call pushes immediately, and later calls push one sample
//! for every interval that elapsed since the last due time. A slow frame
//! therefore delays samples but never drops them; each catch-up sample is
//! stamped with the time it was due.

use std::time::{Duration, Instant};

use super::buffer::{IngestionBuffer, Snapshot};
use super::sample::Sample;
use super::source::SampleSource;
use crate::state::{
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_RETENTION, MAX_POLL_INTERVAL_MS, MAX_RETENTION,
    MIN_POLL_INTERVAL_MS, MIN_RETENTION,
};

/// Owns the buffer and the feed, and decides when to pull the next sample
pub struct Ingestor {
    source: Box<dyn SampleSource>,
    buffer: IngestionBuffer,
    poll_interval: Duration,
    next_due: Option<Instant>,
    running: bool,
}

impl Ingestor {
    pub fn new(source: Box<dyn SampleSource>) -> Self {
        Self {
            source,
            buffer: IngestionBuffer::new(DEFAULT_RETENTION),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            next_due: None,
            running: true,
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.set_capacity(capacity);
        self
    }

    pub fn with_poll_interval(mut self, interval_ms: u64) -> Self {
        self.set_poll_interval(interval_ms);
        self
    }

    /// Pull one sample from the feed and push it. Returns whether a sample arrived.
    pub fn tick(&mut self, now_ms: i64) -> bool {
        match self.source.next_sample(now_ms) {
            Some(sample) => {
                self.buffer.push(sample);
                true
            }
            None => false,
        }
    }

    /// Timer step. Returns whether any sample arrived.
    ///
    /// `now_ms` is the sample clock handed to the feed; `now` drives the schedule.
    /// Missed intervals are replayed, oldest first, up to the buffer capacity.
    pub fn poll(&mut self, now: Instant, now_ms: i64) -> bool {
        if !self.running {
            return false;
        }
        let due = match self.next_due {
            None => {
                self.next_due = Some(now + self.poll_interval);
                return self.tick(now_ms);
            }
            Some(due) if now < due => return false,
            Some(due) => due,
        };

        let interval_ms = self.poll_interval.as_millis().max(1) as u64;
        let lag_ms = now.duration_since(due).as_millis() as u64;
        let missed = lag_ms / interval_ms + 1;
        let replayed = missed.min(self.buffer.capacity() as u64);
        if replayed < missed {
            tracing::warn!(
                "Ingestion fell {} intervals behind, replaying the last {}",
                missed,
                replayed
            );
        }

        let mut ingested = false;
        for slot in (missed - replayed)..missed {
            let slot_lag = lag_ms - slot * interval_ms;
            ingested |= self.tick(now_ms - slot_lag as i64);
        }
        self.next_due = Some(due + self.poll_interval * missed as u32);
        ingested
    }

    /// Time left before the next sample is due, for repaint scheduling
    pub fn time_until_next(&self, now: Instant) -> Duration {
        match self.next_due {
            Some(due) => due.saturating_duration_since(now),
            None => Duration::ZERO,
        }
    }

    /// Change the poll interval (clamped). The timer restarts on the next poll.
    pub fn set_poll_interval(&mut self, interval_ms: u64) {
        let clamped = interval_ms.clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS);
        self.poll_interval = Duration::from_millis(clamped);
        self.next_due = None;
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Change the retention bound (clamped). Applied lazily by the buffer.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.buffer
            .set_capacity(capacity.clamp(MIN_RETENTION, MAX_RETENTION));
    }

    /// Push an initial batch, e.g. from a bootstrap fetch
    pub fn bootstrap(&mut self, batch: Vec<Sample>) {
        let count = batch.len();
        self.buffer.extend(batch);
        tracing::debug!("Bootstrapped {} samples from {}", count, self.source.name());
    }

    /// Replace the buffer contents with a developer seed batch
    pub fn seed(&mut self, samples: Vec<Sample>) {
        tracing::info!("Seeding buffer with {} samples", samples.len());
        self.buffer.replace_all(samples);
    }

    pub fn reset(&mut self) {
        self.buffer.reset();
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn resume(&mut self) {
        if !self.running {
            self.running = true;
            self.next_due = None;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn snapshot(&self) -> Snapshot {
        self.buffer.snapshot()
    }

    pub fn buffer(&self) -> &IngestionBuffer {
        &self.buffer
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }
}
