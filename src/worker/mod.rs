//! Off-main-thread rendering for the line chart.
//!
//! - [`protocol`] - Command and reply types exchanged with the worker
//! - [`runner`] - The worker itself, run on a dedicated thread
//! - [`host`] - Spawning, throttled draw requests and teardown

pub mod host;
pub mod protocol;
pub mod runner;

pub use host::WorkerHost;
pub use protocol::{WorkerCommand, WorkerMessage, WorkerOutput, WorkerReply, PROTOCOL_VERSION};
pub use runner::RenderWorker;
