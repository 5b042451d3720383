//! Sample ingestion: the sample types, pluggable feeds, the bounded buffer
//! and the timer that connects them.

pub mod buffer;
pub mod ingest;
pub mod sample;
pub mod source;

pub use buffer::{IngestionBuffer, Snapshot};
pub use ingest::Ingestor;
pub use sample::{RawSample, Sample};
pub use source::{parse_batch, HttpBatchSource, SampleSource, SyntheticSource};
