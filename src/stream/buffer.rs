//! Bounded ingestion buffer with bulk eviction and copy-on-write snapshots.
//!
//! The buffer is the single source of truth for raw samples. It is mutated
//! only by the ingestion component; every consumer works on a [`Snapshot`].
//! Storage lives behind an `Arc`, so taking a snapshot is a reference-count
//! bump and a push that races an outstanding snapshot clones the storage
//! first (`Arc::make_mut`). Readers therefore never observe a partially
//! updated sequence.

use std::ops::Deref;
use std::sync::Arc;

use super::sample::Sample;

/// Append-only bounded sequence of samples, oldest first
#[derive(Debug)]
pub struct IngestionBuffer {
    samples: Arc<Vec<Sample>>,
    capacity: usize,
    revision: u64,
}

/// Immutable view of the buffer taken at one point in time
#[derive(Clone, Debug)]
pub struct Snapshot {
    samples: Arc<Vec<Sample>>,
    revision: u64,
}

impl Snapshot {
    /// Revision of the buffer when this snapshot was taken
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// An empty snapshot at revision 0
    pub fn empty() -> Self {
        Self {
            samples: Arc::new(Vec::new()),
            revision: 0,
        }
    }
}

impl Deref for Snapshot {
    type Target = [Sample];

    fn deref(&self) -> &[Sample] {
        &self.samples
    }
}

impl IngestionBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: Arc::new(Vec::with_capacity(capacity)),
            capacity,
            revision: 0,
        }
    }

    /// Append one sample, evicting the oldest excess in a single removal
    pub fn push(&mut self, sample: Sample) {
        let samples = Arc::make_mut(&mut self.samples);
        samples.push(sample);
        Self::evict_excess(samples, self.capacity);
        self.revision += 1;
    }

    /// Append a batch with a single eviction and a single revision bump
    pub fn extend<I: IntoIterator<Item = Sample>>(&mut self, batch: I) {
        let samples = Arc::make_mut(&mut self.samples);
        let before = samples.len();
        samples.extend(batch);
        if samples.len() == before {
            return;
        }
        Self::evict_excess(samples, self.capacity);
        self.revision += 1;
    }

    /// Replace the whole contents (developer seeding). The capacity bound is
    /// not applied until the next push, the same as for [`Self::set_capacity`].
    pub fn replace_all(&mut self, samples: Vec<Sample>) {
        self.samples = Arc::new(samples);
        self.revision += 1;
    }

    /// Change the retention bound.
    ///
    /// Lazy: an existing overflow is trimmed on the next push, not here.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    /// Drop every sample
    pub fn reset(&mut self) {
        self.samples = Arc::new(Vec::new());
        self.revision += 1;
    }

    /// Read-only view that later pushes cannot mutate
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            samples: Arc::clone(&self.samples),
            revision: self.revision,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Monotonic counter bumped by every mutation ("new data available")
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn evict_excess(samples: &mut Vec<Sample>, capacity: usize) {
        if samples.len() > capacity {
            let excess = samples.len() - capacity;
            samples.drain(..excess);
        }
    }
}
