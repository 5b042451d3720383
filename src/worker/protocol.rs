//! Message types for the render worker channel.
//!
//! Commands and replies are closed tagged unions that serialize to the same
//! JSON shapes a browser render worker speaks (`{"cmd": "draw", ...}` in,
//! `{"type": "drawn", ...}` out). The drawing surface and rendered frames are
//! not serializable; they travel beside the message, the way a transferable
//! object accompanies a `postMessage`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::render::{PixmapSurface, RenderedFrame};
use crate::stream::RawSample;
use crate::view::ViewTransform;

/// Bumped whenever a command or reply changes shape
pub const PROTOCOL_VERSION: u32 = 1;

/// Error string sent when a draw arrives before a surface is attached
pub const NO_CONTEXT: &str = "no_ctx";

/// Prefix of the error sent when `init` fails
pub const INIT_FAILED: &str = "init_failed";

fn default_dpr() -> f32 {
    1.0
}

/// Host → worker commands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "lowercase")]
pub enum WorkerCommand {
    /// Attach the transferred surface. Zero sizes fall back to 300x150.
    Init {
        #[serde(default)]
        width: u32,
        #[serde(default)]
        height: u32,
        #[serde(default = "default_dpr")]
        dpr: f32,
    },

    /// Resize the attached surface; missing fields keep their current value
    Resize {
        #[serde(default)]
        width: Option<u32>,
        #[serde(default)]
        height: Option<u32>,
        #[serde(default)]
        dpr: Option<f32>,
    },

    /// Draw one line-chart frame
    Draw {
        #[serde(default)]
        pts: Vec<RawSample>,
        #[serde(default)]
        view: ViewTransform,
        #[serde(default, rename = "colorMap")]
        color_map: BTreeMap<String, String>,
    },

    Pause,
    Resume,

    /// Stop the worker loop and hand the surface back
    Shutdown,
}

impl WorkerCommand {
    /// Parse a JSON command. Unknown or malformed input yields `None`.
    pub fn parse(json: &str) -> Option<Self> {
        match serde_json::from_str(json) {
            Ok(cmd) => Some(cmd),
            Err(e) => {
                tracing::debug!("Ignoring malformed worker command: {}", e);
                None
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WorkerCommand::Init { .. } => "init",
            WorkerCommand::Resize { .. } => "resize",
            WorkerCommand::Draw { .. } => "draw",
            WorkerCommand::Pause => "pause",
            WorkerCommand::Resume => "resume",
            WorkerCommand::Shutdown => "shutdown",
        }
    }
}

/// Worker → host replies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum WorkerReply {
    WorkerReady,
    Resize { width: u32, height: u32, dpr: f32 },
    /// `pts` is the number of points received, `fps` the worker's frame rate
    Drawn { pts: usize, fps: u32 },
    Paused,
    Resumed,
    Error { error: String },
}

impl WorkerReply {
    pub fn error(message: impl Into<String>) -> Self {
        WorkerReply::Error {
            error: message.into(),
        }
    }
}

/// What actually crosses the host → worker channel
#[derive(Debug)]
pub enum WorkerMessage {
    /// A typed command, optionally carrying a transferred surface
    Command {
        command: WorkerCommand,
        transfer: Option<PixmapSurface>,
    },
    /// A raw JSON command
    Json(String),
}

impl From<WorkerCommand> for WorkerMessage {
    fn from(command: WorkerCommand) -> Self {
        WorkerMessage::Command {
            command,
            transfer: None,
        }
    }
}

/// What crosses the worker → host channel
#[derive(Debug, Clone)]
pub struct WorkerOutput {
    pub reply: WorkerReply,
    /// The drawn frame, present on `drawn` replies
    pub frame: Option<RenderedFrame>,
}

impl From<WorkerReply> for WorkerOutput {
    fn from(reply: WorkerReply) -> Self {
        Self { reply, frame: None }
    }
}
