//! Host side of the render worker.
//!
//! The host owns the sending end of the command channel and the worker's
//! join handle. Draw requests are throttled to one per
//! [`WORKER_DRAW_INTERVAL_MS`] and coalesced so at most one draw is in
//! flight; a forced draw that finds one in flight is remembered and issued
//! as soon as the worker answers.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::protocol::{WorkerCommand, WorkerMessage, WorkerOutput, WorkerReply};
use super::runner::RenderWorker;
use crate::error::WorkerError;
use crate::render::{Palette, PixmapSurface, ValueRange};
use crate::state::WORKER_DRAW_INTERVAL_MS;
use crate::stream::{RawSample, Sample};
use crate::view::ViewTransform;

pub struct WorkerHost {
    tx: Sender<WorkerMessage>,
    rx: Receiver<WorkerOutput>,
    handle: Option<JoinHandle<Option<PixmapSurface>>>,
    in_flight: bool,
    redraw_pending: bool,
    last_draw: Option<Instant>,
    ready: bool,
}

impl WorkerHost {
    /// Start a worker thread and send it `init` with the transferred surface
    pub fn spawn(surface: PixmapSurface, range: ValueRange) -> Result<Self, WorkerError> {
        let (command_tx, command_rx) = mpsc::channel();
        let (output_tx, output_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("render-worker".to_string())
            .spawn(move || RenderWorker::new(range).run(command_rx, output_tx))
            .map_err(|e| WorkerError::Spawn(e.to_string()))?;

        let (width, height) = surface.logical_size();
        let dpr = surface.dpr();
        let host = Self {
            tx: command_tx,
            rx: output_rx,
            handle: Some(handle),
            in_flight: false,
            redraw_pending: false,
            last_draw: None,
            ready: false,
        };
        host.tx
            .send(WorkerMessage::Command {
                command: WorkerCommand::Init { width, height, dpr },
                transfer: Some(surface),
            })
            .map_err(|_| WorkerError::Disconnected)?;

        tracing::debug!("Render worker spawned ({}x{} @ {})", width, height, dpr);
        Ok(host)
    }

    /// Send a control command (pause, resume, resize)
    pub fn send(&self, command: WorkerCommand) -> Result<(), WorkerError> {
        self.tx
            .send(command.into())
            .map_err(|_| WorkerError::Disconnected)
    }

    /// Send a raw JSON command, as an external controller would
    pub fn send_json(&self, json: impl Into<String>) -> Result<(), WorkerError> {
        self.tx
            .send(WorkerMessage::Json(json.into()))
            .map_err(|_| WorkerError::Disconnected)
    }

    /// Ask the worker for a frame.
    ///
    /// Returns `Ok(true)` if a draw was sent. Unforced requests are dropped
    /// while a draw is in flight or within the throttle interval.
    pub fn request_draw(
        &mut self,
        now: Instant,
        force: bool,
        points: &[Sample],
        view: ViewTransform,
        palette: &Palette,
    ) -> Result<bool, WorkerError> {
        if self.in_flight {
            if force {
                self.redraw_pending = true;
            }
            return Ok(false);
        }
        if !force {
            if let Some(last) = self.last_draw {
                let interval = Duration::from_millis(WORKER_DRAW_INTERVAL_MS);
                if now.saturating_duration_since(last) < interval {
                    return Ok(false);
                }
            }
        }

        let command = WorkerCommand::Draw {
            pts: points.iter().map(RawSample::from).collect(),
            view,
            color_map: palette.to_hex_map(),
        };
        self.send(command)?;
        self.in_flight = true;
        self.redraw_pending = false;
        self.last_draw = Some(now);
        Ok(true)
    }

    /// Drain every reply received so far
    pub fn poll(&mut self) -> Result<Vec<WorkerOutput>, WorkerError> {
        let mut outputs = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(output) => {
                    self.track(&output);
                    outputs.push(output);
                }
                Err(TryRecvError::Empty) => return Ok(outputs),
                Err(TryRecvError::Disconnected) => return Err(WorkerError::Disconnected),
            }
        }
    }

    /// Block until the next reply arrives or `timeout` elapses
    pub fn wait(&mut self, timeout: Duration) -> Result<Option<WorkerOutput>, WorkerError> {
        match self.rx.recv_timeout(timeout) {
            Ok(output) => {
                self.track(&output);
                Ok(Some(output))
            }
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(WorkerError::Disconnected),
        }
    }

    fn track(&mut self, output: &WorkerOutput) {
        match &output.reply {
            WorkerReply::WorkerReady => self.ready = true,
            WorkerReply::Drawn { .. } | WorkerReply::Error { .. } => self.in_flight = false,
            _ => {}
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn draw_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Whether a forced draw was deferred; clears the flag
    pub fn take_redraw_pending(&mut self) -> bool {
        std::mem::take(&mut self.redraw_pending)
    }

    /// Stop the worker and wait for it, returning the surface it owned
    pub fn terminate(mut self) -> Option<PixmapSurface> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Option<PixmapSurface> {
        let handle = self.handle.take()?;
        // The worker may already be gone; the join below still reaps it
        let _ = self.tx.send(WorkerCommand::Shutdown.into());
        match handle.join() {
            Ok(surface) => {
                tracing::debug!("Render worker joined");
                surface
            }
            Err(_) => {
                tracing::warn!("Render worker thread panicked; surface lost");
                None
            }
        }
    }
}

impl Drop for WorkerHost {
    fn drop(&mut self) {
        self.shutdown();
    }
}
