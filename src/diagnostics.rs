//! Draw-info events and frame-rate measurement.
//!
//! Each chart owns a [`Diagnostics`] publisher. Consumers (the debug panel,
//! tests) either read [`Diagnostics::latest`] or subscribe to a channel of
//! [`DrawInfo`] events.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::{Duration, Instant};

/// Width of the FPS measurement window
pub const FPS_WINDOW: Duration = Duration::from_millis(500);

/// What one draw pass did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawInfo {
    /// Points handed to the renderer (before downsampling)
    pub raw: usize,
    /// Points actually drawn
    pub drawn: usize,
    /// Latest frame-rate estimate, once a window has completed
    pub fps: Option<u32>,
    /// Whether the frame came from the render worker
    pub offscreen: bool,
}

#[derive(Default)]
pub struct Diagnostics {
    latest: Option<DrawInfo>,
    subscribers: Vec<Sender<DrawInfo>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, info: DrawInfo) {
        self.latest = Some(info);
        self.subscribers.retain(|tx| tx.send(info).is_ok());
    }

    pub fn subscribe(&mut self) -> Receiver<DrawInfo> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn latest(&self) -> Option<DrawInfo> {
        self.latest
    }
}

/// Counts frames and reports frames-per-second once per window
#[derive(Clone, Debug)]
pub struct FpsCounter {
    window_start: Option<Instant>,
    frames: u32,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            window_start: None,
            frames: 0,
            fps: 0,
        }
    }

    /// Record one frame at `now` and return the current estimate
    pub fn tick(&mut self, now: Instant) -> u32 {
        let start = *self.window_start.get_or_insert(now);
        self.frames += 1;
        let elapsed = now.saturating_duration_since(start);
        if elapsed >= FPS_WINDOW {
            self.fps = (self.frames as f64 * 1000.0 / elapsed.as_millis() as f64).round() as u32;
            self.frames = 0;
            self.window_start = Some(now);
        }
        self.fps
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}
