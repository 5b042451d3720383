//! The dashboard: one ingestor, one derivation pipeline and the active chart.
//!
//! [`Dashboard::step`] is the whole per-frame pipeline, run sequentially on
//! the UI thread: ingest tick, derive, render.

use std::path::Path;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::chart::{ChartController, ChartOptions};
use crate::error::ExportError;
use crate::pipeline::{AggregationMode, DerivedFrame, Pipeline, PipelineCounts};
use crate::render::{ChartCanvas, Palette};
use crate::settings::DashboardSettings;
use crate::state::ChartKind;
use crate::stream::{HttpBatchSource, Ingestor, SampleSource, SyntheticSource};
use crate::view::Gesture;

/// Wall-clock milliseconds since the Unix epoch, used as the sample clock
pub fn epoch_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Logical canvas size plus device pixel ratio
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
    pub dpr: f32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32, dpr: f32) -> Self {
        Self { width, height, dpr }
    }
}

pub struct Dashboard {
    ingestor: Ingestor,
    pipeline: Pipeline,
    settings: DashboardSettings,
    chart: ChartController,
    size: CanvasSize,
    frame: Arc<DerivedFrame>,
    seeder: SyntheticSource,
    offscreen_supported: bool,
}

impl Dashboard {
    /// Build from settings, picking the HTTP feed when a URL is configured
    pub fn from_settings(settings: DashboardSettings, size: CanvasSize) -> Self {
        let source: Box<dyn SampleSource> = match &settings.feed_url {
            Some(url) => Box::new(HttpBatchSource::new(url.clone())),
            None => Box::new(SyntheticSource::default()),
        };
        Self::new(settings, source, size)
    }

    pub fn new(
        settings: DashboardSettings,
        source: Box<dyn SampleSource>,
        size: CanvasSize,
    ) -> Self {
        Self::build(settings, source, size, true)
    }

    /// A dashboard whose canvases can never be handed to a worker
    pub fn without_offscreen(
        settings: DashboardSettings,
        source: Box<dyn SampleSource>,
        size: CanvasSize,
    ) -> Self {
        Self::build(settings, source, size, false)
    }

    fn build(
        settings: DashboardSettings,
        source: Box<dyn SampleSource>,
        size: CanvasSize,
        offscreen_supported: bool,
    ) -> Self {
        let settings = settings.clamped();
        let ingestor = Ingestor::new(source)
            .with_capacity(settings.retention)
            .with_poll_interval(settings.poll_interval_ms);
        let chart = Self::make_chart(&settings, size, offscreen_supported);
        tracing::info!(
            "Dashboard ready: {} chart, {} feed",
            settings.chart_kind,
            ingestor.source_name()
        );
        Self {
            ingestor,
            pipeline: Pipeline::new(),
            settings,
            chart,
            size,
            frame: Arc::default(),
            seeder: SyntheticSource::default(),
            offscreen_supported,
        }
    }

    fn make_chart(
        settings: &DashboardSettings,
        size: CanvasSize,
        offscreen: bool,
    ) -> ChartController {
        let canvas = if offscreen {
            ChartCanvas::new(size.width, size.height, size.dpr)
        } else {
            ChartCanvas::without_offscreen(size.width, size.height, size.dpr)
        };
        let options = ChartOptions {
            use_worker: settings.use_worker,
            range: settings.value_range,
            palette: Palette::default(),
            running: settings.running,
        };
        ChartController::new(settings.chart_kind, canvas, options)
    }

    /// One frame: ingest tick, derive, render. Returns whether a sample arrived.
    pub fn step(&mut self, now: Instant, now_ms: i64) -> bool {
        let ingested = self.ingestor.poll(now, now_ms);
        let snapshot = self.ingestor.snapshot();
        let frame = self
            .pipeline
            .derive(&snapshot, &self.settings.active_labels, self.settings.aggregation);
        self.frame = Arc::clone(&frame);
        self.chart.on_frame(now, frame);
        ingested
    }

    pub fn toggle_label(&mut self, label: &str, enabled: bool) -> bool {
        self.settings.active_labels.toggle(label, enabled)
    }

    pub fn set_aggregation(&mut self, mode: AggregationMode) {
        self.settings.aggregation = mode;
    }

    /// Switch chart projection. The old chart is torn down first.
    pub fn set_chart_kind(&mut self, kind: ChartKind, now: Instant) {
        if self.settings.chart_kind == kind {
            return;
        }
        self.chart.teardown();
        self.settings.chart_kind = kind;
        self.chart = Self::make_chart(&self.settings, self.size, self.offscreen_supported);

        let snapshot = self.ingestor.snapshot();
        let frame = self
            .pipeline
            .derive(&snapshot, &self.settings.active_labels, self.settings.aggregation);
        self.frame = Arc::clone(&frame);
        self.chart.show(now, frame);
    }

    /// Pause or resume rendering. Ingestion is unaffected.
    pub fn set_running(&mut self, running: bool, now: Instant) {
        self.settings.running = running;
        self.chart.set_running(running, now);
    }

    pub fn set_poll_interval(&mut self, interval_ms: u64) {
        self.ingestor.set_poll_interval(interval_ms);
        self.settings.poll_interval_ms = self.ingestor.poll_interval().as_millis() as u64;
    }

    pub fn set_retention(&mut self, retention: usize) {
        self.ingestor.set_capacity(retention);
        self.settings.retention = self.ingestor.buffer().capacity();
    }

    /// Replace the buffer with `count` synthetic samples ending at `now_ms`
    pub fn seed_synthetic(&mut self, count: usize, now_ms: i64) {
        let batch = self.seeder.seed_batch(count, now_ms);
        self.ingestor.seed(batch);
    }

    pub fn resize(&mut self, size: CanvasSize, now: Instant) {
        if size == self.size {
            return;
        }
        self.size = size;
        self.chart.resize(size.width, size.height, size.dpr, now);
    }

    pub fn handle_gesture(&mut self, gesture: Gesture, now: Instant) -> bool {
        self.chart.handle_gesture(gesture, now)
    }

    /// Write the frame currently on screen as a PNG
    pub fn export_png(&self, path: &Path) -> Result<(), ExportError> {
        self.chart
            .canvas()
            .visible_frame()
            .ok_or(ExportError::NoFrame)?
            .save_png(path)
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    pub fn counts(&self) -> PipelineCounts {
        self.frame.counts
    }

    /// The frame derived on the last step, backing the data tables
    pub fn frame(&self) -> &DerivedFrame {
        &self.frame
    }

    pub fn chart(&self) -> &ChartController {
        &self.chart
    }

    pub fn ingestor(&self) -> &Ingestor {
        &self.ingestor
    }
}
