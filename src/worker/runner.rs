//! The render worker: a line renderer that owns a transferred surface and
//! runs on its own thread.
//!
//! The worker processes commands strictly in arrival order and answers each
//! with at most one reply. Draw commands are honored even while paused; the
//! host decides when to send them.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{Receiver, Sender};
use std::time::Instant;

use super::protocol::{
    WorkerCommand, WorkerMessage, WorkerOutput, WorkerReply, INIT_FAILED, NO_CONTEXT,
    PROTOCOL_VERSION,
};
use crate::diagnostics::FpsCounter;
use crate::render::{render_frame, DrawContext, Palette, PixmapSurface, ValueRange};
use crate::state::{ChartKind, DEFAULT_SURFACE_HEIGHT, DEFAULT_SURFACE_WIDTH};
use crate::stream::Sample;
use crate::view::ViewTransform;

pub struct RenderWorker {
    surface: Option<PixmapSurface>,
    running: bool,
    fps: FpsCounter,
    range: ValueRange,
}

impl RenderWorker {
    pub fn new(range: ValueRange) -> Self {
        Self {
            surface: None,
            running: true,
            fps: FpsCounter::new(),
            range,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    /// Handle one message. `None` means the message produced no reply.
    ///
    /// A panic while handling is caught and turned into an `error` reply.
    pub fn handle(&mut self, message: WorkerMessage) -> Option<WorkerOutput> {
        let (command, transfer) = match message {
            WorkerMessage::Command { command, transfer } => (command, transfer),
            WorkerMessage::Json(json) => (WorkerCommand::parse(&json)?, None),
        };

        tracing::trace!("Worker command: {}", command.name());
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(command, transfer)));
        match result {
            Ok(output) => output,
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "worker panicked".to_string());
                tracing::error!("Render worker panicked: {}", message);
                Some(WorkerReply::error(message).into())
            }
        }
    }

    fn dispatch(
        &mut self,
        command: WorkerCommand,
        transfer: Option<PixmapSurface>,
    ) -> Option<WorkerOutput> {
        match command {
            WorkerCommand::Init { width, height, dpr } => {
                Some(self.init(transfer, width, height, dpr))
            }
            WorkerCommand::Resize { width, height, dpr } => self.resize(width, height, dpr),
            WorkerCommand::Draw {
                pts,
                view,
                color_map,
            } => {
                let points = pts.into_iter().map(|p| p.normalize(0)).collect();
                Some(self.draw(points, view, &color_map))
            }
            WorkerCommand::Pause => {
                self.running = false;
                Some(WorkerReply::Paused.into())
            }
            WorkerCommand::Resume => {
                self.running = true;
                Some(WorkerReply::Resumed.into())
            }
            // Handled by the run loop
            WorkerCommand::Shutdown => None,
        }
    }

    fn init(
        &mut self,
        transfer: Option<PixmapSurface>,
        width: u32,
        height: u32,
        dpr: f32,
    ) -> WorkerOutput {
        let Some(mut surface) = transfer else {
            return WorkerReply::error(format!("{}: no surface transferred", INIT_FAILED)).into();
        };

        let width = if width == 0 { DEFAULT_SURFACE_WIDTH } else { width };
        let height = if height == 0 { DEFAULT_SURFACE_HEIGHT } else { height };
        let dpr = if dpr > 0.0 { dpr } else { 1.0 };

        if surface.logical_size() != (width, height) || surface.dpr() != dpr {
            if let Err(e) = surface.resize(width, height, dpr) {
                return WorkerReply::error(format!("{}: {}", INIT_FAILED, e)).into();
            }
        }

        self.surface = Some(surface);
        WorkerReply::WorkerReady.into()
    }

    fn resize(
        &mut self,
        width: Option<u32>,
        height: Option<u32>,
        dpr: Option<f32>,
    ) -> Option<WorkerOutput> {
        let surface = self.surface.as_mut()?;
        let (cur_w, cur_h) = surface.logical_size();
        let width = width.unwrap_or(cur_w).max(1);
        let height = height.unwrap_or(cur_h).max(1);
        let dpr = dpr.filter(|d| *d > 0.0).unwrap_or(surface.dpr());

        Some(match surface.resize(width, height, dpr) {
            Ok(()) => WorkerReply::Resize { width, height, dpr }.into(),
            Err(e) => WorkerReply::error(e.to_string()).into(),
        })
    }

    fn draw(
        &mut self,
        points: Vec<Sample>,
        view: ViewTransform,
        color_map: &BTreeMap<String, String>,
    ) -> WorkerOutput {
        let Some(surface) = self.surface.as_mut() else {
            return WorkerReply::error(NO_CONTEXT).into();
        };

        let palette = Palette::from_hex_map(color_map);
        let ctx = DrawContext {
            view,
            palette: &palette,
            range: self.range,
        };
        render_frame(surface, ChartKind::Line, &points, &ctx);
        let fps = self.fps.tick(Instant::now());

        WorkerOutput {
            reply: WorkerReply::Drawn {
                pts: points.len(),
                fps,
            },
            frame: Some(surface.snapshot()),
        }
    }

    /// Serve commands until shutdown or until the host hangs up. Returns the
    /// surface so the host can reclaim it.
    pub fn run(
        mut self,
        rx: Receiver<WorkerMessage>,
        tx: Sender<WorkerOutput>,
    ) -> Option<PixmapSurface> {
        tracing::info!("Render worker started (protocol v{})", PROTOCOL_VERSION);
        while let Ok(message) = rx.recv() {
            if matches!(
                message,
                WorkerMessage::Command {
                    command: WorkerCommand::Shutdown,
                    ..
                }
            ) {
                break;
            }
            if let Some(output) = self.handle(message) {
                if tx.send(output).is_err() {
                    break;
                }
            }
        }
        tracing::info!("Render worker stopped");
        self.surface.take()
    }
}
