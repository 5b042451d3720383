//! Error types shared across the stream, rendering and worker layers.
//!
//! There is no rendering error: a missing or zero-sized surface skips the
//! draw pass.

use thiserror::Error;

/// Errors raised while pulling samples from a feed
#[derive(Debug, Error)]
pub enum SourceError {
    /// The HTTP request failed or returned a non-success status
    #[error("Network error: {0}")]
    Network(String),

    /// The response body was not a recognizable sample batch
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Errors raised when moving a drawing surface to the render worker
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// The host canvas cannot be driven from another thread
    #[error("Offscreen transfer is not supported by this canvas")]
    Unsupported,

    /// A main-thread drawing context was already acquired on the canvas
    #[error("Canvas already has a drawing context")]
    ContextAcquired,

    /// The surface has already been handed to a worker
    #[error("Canvas surface was already transferred")]
    AlreadyTransferred,

    /// The surface could not be allocated at the requested size
    #[error("Failed to allocate a {width}x{height} surface")]
    Allocation { width: u32, height: u32 },
}

/// Errors raised by the render worker host
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The worker thread could not be started
    #[error("Failed to spawn render worker: {0}")]
    Spawn(String),

    /// The worker is gone (terminated, panicked or never started)
    #[error("Render worker disconnected")]
    Disconnected,

    /// The worker replied with an error message
    #[error("Render worker reported: {0}")]
    Reported(String),
}

/// Errors raised while exporting a rendered frame
#[derive(Debug, Error)]
pub enum ExportError {
    /// The pixel buffer does not match the frame dimensions
    #[error("Frame buffer does not match its dimensions")]
    InvalidFrame,

    /// No frame has been drawn yet
    #[error("Nothing has been drawn yet")]
    NoFrame,

    /// PNG encoding or the file write failed
    #[error("Failed to write image: {0}")]
    Encode(#[from] image::ImageError),
}

/// Errors raised while loading or saving dashboard settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The platform config directory could not be determined
    #[error("Could not determine config directory")]
    NoConfigDir,

    /// Reading or writing the settings file failed
    #[error("Settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file could not be (de)serialized
    #[error("Failed to (de)serialize settings: {0}")]
    Serde(#[from] serde_json::Error),
}
