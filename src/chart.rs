//! Per-chart controller.
//!
//! A [`ChartController`] owns one canvas and decides, every frame, whether
//! and where to draw: on the UI thread, or through the render worker for the
//! line chart. It also owns the chart's view interaction, its pause flag and
//! its diagnostics publisher.
//!
//! Worker failures of any kind (transfer refused, spawn failure, an `error`
//! reply, a dropped channel) permanently switch this controller to
//! main-thread rendering, and the fallback frame is drawn in the same call
//! that noticed the failure.

use std::sync::Arc;
use std::time::Instant;

use crate::diagnostics::{Diagnostics, DrawInfo, FpsCounter};
use crate::error::WorkerError;
use crate::pipeline::{level_of_detail, DerivedFrame, LodBudget};
use crate::render::{lod_mode, render_frame, ChartCanvas, DrawContext, Palette, ValueRange};
use crate::state::ChartKind;
use crate::view::{Gesture, ViewInteraction, ViewTransform};
use crate::worker::{WorkerCommand, WorkerHost, WorkerReply};

/// Construction options for a chart
#[derive(Clone, Debug)]
pub struct ChartOptions {
    /// Try the offscreen worker (line chart only)
    pub use_worker: bool,
    pub range: ValueRange,
    pub palette: Palette,
    pub running: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            use_worker: true,
            range: ValueRange::default(),
            palette: Palette::default(),
            running: true,
        }
    }
}

pub struct ChartController {
    kind: ChartKind,
    canvas: ChartCanvas,
    view: ViewInteraction,
    palette: Palette,
    range: ValueRange,
    running: bool,
    worker: Option<WorkerHost>,
    latest: Arc<DerivedFrame>,
    diagnostics: Diagnostics,
    fps: FpsCounter,
}

impl ChartController {
    pub fn new(kind: ChartKind, canvas: ChartCanvas, options: ChartOptions) -> Self {
        let mut chart = Self {
            kind,
            canvas,
            view: ViewInteraction::new(),
            palette: options.palette,
            range: options.range,
            running: options.running,
            worker: None,
            latest: Arc::new(DerivedFrame::default()),
            diagnostics: Diagnostics::new(),
            fps: FpsCounter::new(),
        };
        if kind == ChartKind::Line && options.use_worker {
            chart.start_worker();
        }
        chart
    }

    fn start_worker(&mut self) {
        let surface = match self.canvas.transfer_to_offscreen() {
            Ok(surface) => surface,
            Err(e) => {
                tracing::info!(
                    "Offscreen rendering unavailable, drawing on the main thread: {}",
                    e
                );
                return;
            }
        };
        match WorkerHost::spawn(surface, self.range) {
            Ok(host) => {
                tracing::info!("Line chart rendering offscreen");
                self.worker = Some(host);
            }
            Err(e) => {
                tracing::warn!("Worker init failed, falling back to main-thread renderer: {}", e);
                self.canvas.reclaim(None);
            }
        }
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn is_offscreen(&self) -> bool {
        self.worker.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn canvas(&self) -> &ChartCanvas {
        &self.canvas
    }

    pub fn worker(&self) -> Option<&WorkerHost> {
        self.worker.as_ref()
    }

    pub fn view(&self) -> ViewTransform {
        self.view.transform()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// Frame callback. Collects worker replies, then draws unless paused.
    pub fn on_frame(&mut self, now: Instant, frame: Arc<DerivedFrame>) {
        self.latest = frame;
        self.pump_worker(now);
        if !self.running {
            return;
        }
        self.draw(now, false);
    }

    /// Replace the points and draw them at once, even while paused
    pub fn show(&mut self, now: Instant, frame: Arc<DerivedFrame>) {
        self.latest = frame;
        self.draw(now, true);
    }

    /// Feed a gesture; a changed view is redrawn immediately
    pub fn handle_gesture(&mut self, gesture: Gesture, now: Instant) -> bool {
        if !self.kind.uses_view_transform() {
            return false;
        }
        let changed = self.view.handle(gesture);
        if changed {
            self.draw(now, true);
        }
        changed
    }

    /// Pause or resume. Either transition draws one static frame.
    pub fn set_running(&mut self, running: bool, now: Instant) {
        if self.running == running {
            return;
        }
        self.running = running;
        if let Some(host) = &self.worker {
            let command = if running {
                WorkerCommand::Resume
            } else {
                WorkerCommand::Pause
            };
            if let Err(e) = host.send(command) {
                self.fall_back(e, now);
                return;
            }
        }
        self.draw(now, true);
    }

    pub fn resize(&mut self, width: u32, height: u32, dpr: f32, now: Instant) {
        if self.canvas.size() == (width.max(1), height.max(1)) && self.canvas.dpr() == dpr {
            return;
        }
        if let Err(e) = self.canvas.resize(width, height, dpr) {
            tracing::warn!("Canvas resize failed: {}", e);
            return;
        }
        if let Some(host) = &self.worker {
            let (width, height) = self.canvas.size();
            let command = WorkerCommand::Resize {
                width: Some(width),
                height: Some(height),
                dpr: Some(dpr),
            };
            if let Err(e) = host.send(command) {
                self.fall_back(e, now);
                return;
            }
        }
        self.draw(now, true);
    }

    /// Draw the latest frame now, regardless of the pause flag
    pub fn redraw(&mut self, now: Instant) {
        self.draw(now, true);
    }

    fn draw(&mut self, now: Instant, force: bool) {
        if self.worker.is_some() {
            self.request_worker_draw(now, force);
        } else {
            self.draw_main_thread(now);
        }
    }

    fn view_for_kind(&self) -> ViewTransform {
        if self.kind.uses_view_transform() {
            self.view.transform()
        } else {
            ViewTransform::default()
        }
    }

    fn draw_main_thread(&mut self, now: Instant) {
        let ctx = DrawContext {
            view: self.view_for_kind(),
            palette: &self.palette,
            range: self.range,
        };
        let kind = self.kind;
        let points = &self.latest.points;
        let info = self
            .canvas
            .draw_with(|surface| render_frame(surface, kind, points, &ctx))
            .flatten();

        if let Some(info) = info {
            let fps = self.fps.tick(now);
            self.diagnostics.publish(DrawInfo {
                fps: Some(fps),
                ..info
            });
        }
    }

    fn request_worker_draw(&mut self, now: Instant, force: bool) {
        let view = self.view.transform();
        let Some(host) = self.worker.as_mut() else {
            return;
        };
        let result = {
            let points =
                level_of_detail(&self.latest.points, LodBudget::default(), lod_mode(self.kind));
            host.request_draw(now, force, &points, view, &self.palette)
        };
        if let Err(e) = result {
            self.fall_back(e, now);
        }
    }

    /// Present worker frames and react to worker errors
    fn pump_worker(&mut self, now: Instant) {
        let Some(host) = self.worker.as_mut() else {
            return;
        };
        let outputs = match host.poll() {
            Ok(outputs) => outputs,
            Err(e) => {
                self.fall_back(e, now);
                return;
            }
        };

        for output in outputs {
            match output.reply {
                WorkerReply::Drawn { pts, fps } => {
                    if let Some(frame) = output.frame {
                        self.canvas.present(frame);
                    }
                    self.diagnostics.publish(DrawInfo {
                        raw: self.latest.points.len(),
                        drawn: pts,
                        fps: Some(fps),
                        offscreen: true,
                    });
                }
                WorkerReply::Error { error } => {
                    self.fall_back(WorkerError::Reported(error), now);
                    return;
                }
                WorkerReply::WorkerReady => tracing::debug!("Render worker ready"),
                other => tracing::debug!("Render worker: {:?}", other),
            }
        }

        let deferred = self.worker.as_mut().is_some_and(WorkerHost::take_redraw_pending);
        if deferred {
            self.draw(now, true);
        }
    }

    /// Stop using the worker for the rest of this controller's life
    fn fall_back(&mut self, reason: WorkerError, now: Instant) {
        tracing::warn!("Render worker failed, falling back to main-thread renderer: {}", reason);
        if let Some(host) = self.worker.take() {
            let surface = host.terminate();
            self.canvas.reclaim(surface);
        }
        self.draw_main_thread(now);
    }

    /// Stop the worker and reclaim the surface. Also runs on drop.
    pub fn teardown(&mut self) {
        if let Some(host) = self.worker.take() {
            let surface = host.terminate();
            self.canvas.reclaim(surface);
            tracing::debug!("{} chart torn down", self.kind);
        }
    }
}

impl Drop for ChartController {
    fn drop(&mut self) {
        self.teardown();
    }
}
