//! Sample feeds.
//!
//! A feed is pulled once per ingestion tick and must not block. Two feeds
//! ship with the crate: a seeded synthetic generator and an HTTP batch client.

use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

use super::sample::{RawSample, Sample};
use crate::error::SourceError;
use crate::state::DEFAULT_CATEGORIES;

/// A pluggable producer of samples
pub trait SampleSource: Send {
    /// Short name for logs and the status line
    fn name(&self) -> &str;

    /// Produce the sample for this tick, or `None` if the feed has nothing
    fn next_sample(&mut self, now_ms: i64) -> Option<Sample>;
}

// ============================================================================
// Synthetic feed
// ============================================================================

/// Sine wave plus noise in `[0, 100]`, with a random label per sample
pub struct SyntheticSource {
    rng: StdRng,
    labels: Vec<String>,
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            labels: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SyntheticSource {
    /// Deterministic generator for tests and reproducible demos
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ..Self::default()
        }
    }

    /// Use a custom category set
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if !labels.is_empty() {
            self.labels = labels;
        }
        self
    }

    /// Value of the waveform at `t` with `jitter` in `[-0.5, 0.5)`
    fn waveform(t: i64, jitter: f64) -> f64 {
        let raw = (t as f64 / 500.0).sin() * 40.0 + 50.0 + jitter * 10.0;
        raw.clamp(0.0, 100.0)
    }

    /// A dense historical batch ending at `now_ms`, one sample per second,
    /// labels assigned round-robin. Used by the developer seed action.
    pub fn seed_batch(&mut self, count: usize, now_ms: i64) -> Vec<Sample> {
        (0..count)
            .map(|i| {
                let t = now_ms - (count - i) as i64 * 1000;
                let v = (i as f64 / 30.0).sin() * 50.0 + 50.0 + self.rng.gen::<f64>() * 2.0;
                Sample::new(t, v, self.labels[i % self.labels.len()].clone())
            })
            .collect()
    }
}

impl SampleSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn next_sample(&mut self, now_ms: i64) -> Option<Sample> {
        let jitter = self.rng.gen::<f64>() - 0.5;
        let label = self.labels[self.rng.gen_range(0..self.labels.len())].clone();
        Some(Sample::new(now_ms, Self::waveform(now_ms, jitter), label))
    }
}

// ============================================================================
// HTTP batch feed
// ============================================================================

/// Per-request timeout for batch fetches
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// First retry delay after a failed or empty fetch; doubles per failure
const RETRY_BASE_MS: i64 = 1_000;
const RETRY_MAX_MS: i64 = 30_000;

type FetchResult = Result<Vec<Sample>, SourceError>;

/// Fetches sample batches over HTTP and serves them one per tick.
///
/// Accepts a bare JSON array, `{"result": [...]}` or `{"samples": [...]}`.
/// Records are normalized leniently (see [`RawSample`]). Requests run on a
/// background thread; the tick only drains what has already arrived, so a
/// stalled server never blocks the caller.
pub struct HttpBatchSource {
    url: String,
    agent: ureq::Agent,
    queue: VecDeque<Sample>,
    fetch_receiver: Option<Receiver<FetchResult>>,
    failures: u32,
    retry_at_ms: Option<i64>,
}

impl HttpBatchSource {
    pub fn new(url: impl Into<String>) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(FETCH_TIMEOUT))
            .build();
        Self {
            url: url.into(),
            agent: config.into(),
            queue: VecDeque::new(),
            fetch_receiver: None,
            failures: 0,
            retry_at_ms: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether a background request is outstanding
    pub fn is_fetching(&self) -> bool {
        self.fetch_receiver.is_some()
    }

    /// Consecutive failed fetches since the last success
    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Perform one blocking GET and parse the body into samples
    pub fn fetch_batch(&self, now_ms: i64) -> FetchResult {
        Self::fetch_with(&self.agent, &self.url, now_ms)
    }

    fn fetch_with(agent: &ureq::Agent, url: &str, now_ms: i64) -> FetchResult {
        let mut response = match agent.get(url).header("Accept", "application/json").call() {
            Ok(resp) => resp,
            Err(ureq::Error::StatusCode(status)) => {
                return Err(SourceError::Network(format!(
                    "{} returned status {}",
                    url, status
                )));
            }
            Err(e) => return Err(SourceError::Network(e.to_string())),
        };

        let body: Value = response
            .body_mut()
            .read_json()
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        parse_batch(body, now_ms)
    }

    /// Start a background fetch unless one is running or a retry is pending
    fn start_fetch(&mut self, now_ms: i64) {
        if self.fetch_receiver.is_some() || self.retry_at_ms.is_some_and(|at| now_ms < at) {
            return;
        }

        let (sender, receiver): (Sender<FetchResult>, Receiver<FetchResult>) = channel();
        self.fetch_receiver = Some(receiver);

        let agent = self.agent.clone();
        let url = self.url.clone();
        thread::spawn(move || {
            let result = Self::fetch_with(&agent, &url, now_ms);
            let _ = sender.send(result);
        });
    }

    /// Move a finished fetch into the queue, scheduling a retry on failure
    fn collect_fetch(&mut self, now_ms: i64) {
        let Some(receiver) = &self.fetch_receiver else {
            return;
        };
        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                Err(SourceError::Network("fetch thread exited".to_string()))
            }
        };
        self.fetch_receiver = None;

        match result {
            Ok(batch) if batch.is_empty() => {
                self.failures = 0;
                self.retry_at_ms = Some(now_ms + RETRY_BASE_MS);
            }
            Ok(batch) => {
                tracing::debug!("Fetched {} samples from {}", batch.len(), self.url);
                self.failures = 0;
                self.retry_at_ms = None;
                self.queue.extend(batch);
            }
            Err(e) => {
                self.failures = self.failures.saturating_add(1);
                let delay = RETRY_BASE_MS
                    .saturating_mul(1 << (self.failures - 1).min(5))
                    .min(RETRY_MAX_MS);
                self.retry_at_ms = Some(now_ms + delay);
                tracing::warn!("Sample batch fetch failed, retrying in {} ms: {}", delay, e);
            }
        }
    }
}

impl SampleSource for HttpBatchSource {
    fn name(&self) -> &str {
        "http"
    }

    fn next_sample(&mut self, now_ms: i64) -> Option<Sample> {
        self.collect_fetch(now_ms);
        if self.queue.is_empty() {
            self.start_fetch(now_ms);
        }
        self.queue.pop_front()
    }
}

/// Turn a batch payload into samples.
///
/// Non-object records are skipped. Inside an object, a missing or mistyped
/// field takes its default: the ingest clock for time, `0` for the value and
/// `"default"` for the label.
pub fn parse_batch(body: Value, now_ms: i64) -> Result<Vec<Sample>, SourceError> {
    let records = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("result").or_else(|| map.remove("samples")) {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(SourceError::Parse(
                    "expected an array under \"result\" or \"samples\"".to_string(),
                ))
            }
        },
        _ => return Err(SourceError::Parse("expected a JSON array or object".to_string())),
    };

    Ok(records
        .into_iter()
        .filter(Value::is_object)
        .map(|record| RawSample::from(record).normalize(now_ms))
        .collect())
}
