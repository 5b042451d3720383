//! Desktop shell: an eframe app that drives the dashboard once per frame
//! and shows the chart canvas as a texture.

use eframe::egui;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use strum::IntoEnumIterator;

use crate::dashboard::{epoch_millis, CanvasSize, Dashboard};
use crate::pipeline::AggregationMode;
use crate::settings::DashboardSettings;
use crate::state::{
    label_color, ChartKind, DEFAULT_CATEGORIES, MAX_POLL_INTERVAL_MS, MAX_RETENTION,
    MIN_POLL_INTERVAL_MS, MIN_RETENTION,
};
use crate::stream::Sample;
use crate::table::{format_row, row_window, OVERSCAN, ROW_HEIGHT, TABLE_HEIGHT};
use crate::view::{Gesture, RESET_KEY};

/// Seed sizes offered in the debug panel
const SEED_SIZES: &[usize] = &[10_000, 50_000];

pub struct StreamScopeApp {
    dashboard: Dashboard,
    texture: Option<egui::TextureHandle>,
    shown_generation: Option<u64>,
    status: Option<String>,
    settings_dirty: bool,
}

impl StreamScopeApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let settings = DashboardSettings::load();
        let size = CanvasSize::new(800, 400, 1.0);
        Self {
            dashboard: Dashboard::from_settings(settings, size),
            texture: None,
            shown_generation: None,
            status: None,
            settings_dirty: false,
        }
    }

    /// Top bar: filters, aggregation, chart type, pause and rates
    fn render_controls(&mut self, ui: &mut egui::Ui, now: Instant) {
        ui.horizontal_wrapped(|ui| {
            for label in DEFAULT_CATEGORIES {
                let mut enabled = self.dashboard.settings().active_labels.contains(label);
                let [r, g, b] = label_color(label);
                let text = egui::RichText::new(*label).color(egui::Color32::from_rgb(r, g, b));
                if ui.checkbox(&mut enabled, text).changed() {
                    self.dashboard.toggle_label(label, enabled);
                    self.settings_dirty = true;
                }
            }

            ui.separator();

            let mut aggregation = self.dashboard.settings().aggregation;
            egui::ComboBox::from_label("Aggregation")
                .selected_text(aggregation.to_string())
                .show_ui(ui, |ui| {
                    for mode in AggregationMode::iter() {
                        ui.selectable_value(&mut aggregation, mode, mode.to_string());
                    }
                });
            if aggregation != self.dashboard.settings().aggregation {
                self.dashboard.set_aggregation(aggregation);
                self.settings_dirty = true;
            }

            let mut kind = self.dashboard.settings().chart_kind;
            egui::ComboBox::from_label("Chart")
                .selected_text(kind.to_string())
                .show_ui(ui, |ui| {
                    for k in ChartKind::iter() {
                        ui.selectable_value(&mut kind, k, k.to_string());
                    }
                });
            if kind != self.dashboard.settings().chart_kind {
                self.dashboard.set_chart_kind(kind, now);
                self.shown_generation = None;
                self.settings_dirty = true;
            }

            ui.separator();

            let running = self.dashboard.settings().running;
            if ui.button(if running { "Pause" } else { "Resume" }).clicked() {
                self.dashboard.set_running(!running, now);
                self.settings_dirty = true;
            }

            let mut poll = self.dashboard.settings().poll_interval_ms;
            let poll_slider =
                egui::Slider::new(&mut poll, MIN_POLL_INTERVAL_MS..=MAX_POLL_INTERVAL_MS)
                    .text("Poll (ms)");
            if ui.add(poll_slider).changed() {
                self.dashboard.set_poll_interval(poll);
                self.settings_dirty = true;
            }

            let mut retention = self.dashboard.settings().retention;
            let retention_slider =
                egui::Slider::new(&mut retention, MIN_RETENTION..=MAX_RETENTION).text("Retention");
            if ui.add(retention_slider).changed() {
                self.dashboard.set_retention(retention);
                self.settings_dirty = true;
            }
        });
    }

    /// Bottom bar: pipeline counters, draw info and developer actions
    fn render_debug_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let counts = self.dashboard.counts();
            ui.label(format!(
                "raw {} | filtered {} | aggregated {}",
                counts.raw, counts.filtered, counts.aggregated
            ));

            if let Some(info) = self.dashboard.chart().diagnostics().latest() {
                ui.separator();
                ui.label(format!(
                    "drawn {}/{} | {} fps | {}",
                    info.drawn,
                    info.raw,
                    info.fps.unwrap_or(0),
                    if info.offscreen { "offscreen" } else { "main thread" }
                ));
            }

            ui.separator();
            for &count in SEED_SIZES {
                if ui.button(format!("Seed {}k", count / 1000)).clicked() {
                    self.dashboard.seed_synthetic(count, epoch_millis());
                }
            }
            if ui.button("Export PNG").clicked() {
                self.export_png();
            }
            if let Some(status) = &self.status {
                ui.separator();
                ui.label(status);
            }
        });
    }

    /// Side-by-side filtered and aggregated tables
    fn render_tables(&self, ui: &mut egui::Ui) {
        let frame = self.dashboard.frame();
        ui.columns(2, |columns| {
            render_table(&mut columns[0], "Filtered Data", &frame.filtered);
            render_table(&mut columns[1], "Aggregated Data", &frame.points);
        });
    }

    fn export_png(&mut self) {
        let dir = dirs::download_dir().unwrap_or_else(|| PathBuf::from("."));
        let path = dir.join(format!("streamscope-{}.png", epoch_millis()));
        self.status = Some(match self.dashboard.export_png(&path) {
            Ok(()) => format!("Saved {}", path.display()),
            Err(e) => {
                tracing::error!("PNG export failed: {}", e);
                format!("Export failed: {}", e)
            }
        });
    }

    /// Chart area: forward input, then show the latest frame
    fn render_chart(&mut self, ui: &mut egui::Ui, now: Instant) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
        let size = CanvasSize::new(
            rect.width().max(1.0) as u32,
            rect.height().max(1.0) as u32,
            ui.ctx().pixels_per_point(),
        );
        self.dashboard.resize(size, now);

        let local_x = |pos: egui::Pos2| pos.x - rect.min.x;
        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.dashboard
                    .handle_gesture(Gesture::PointerDown { x: local_x(pos) }, now);
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.dashboard
                    .handle_gesture(Gesture::PointerMove { x: local_x(pos) }, now);
            }
        }
        if response.drag_stopped() {
            self.dashboard.handle_gesture(Gesture::PointerUp, now);
        }
        if response.hovered() {
            let (scroll, hover) = ui.input(|i| (i.raw_scroll_delta.y, i.pointer.hover_pos()));
            if scroll != 0.0 {
                if let Some(pos) = hover {
                    // egui scrolls up with positive y; wheel deltas are the opposite
                    self.dashboard.handle_gesture(
                        Gesture::Wheel {
                            cursor_x: local_x(pos),
                            delta_y: -scroll,
                        },
                        now,
                    );
                }
            }
        }
        if ui.input(|i| i.key_pressed(egui::Key::Num0)) {
            self.dashboard.handle_gesture(Gesture::Key(RESET_KEY), now);
        }

        self.upload_frame(ui.ctx());
        if let Some(texture) = &self.texture {
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            ui.painter().image(texture.id(), rect, uv, egui::Color32::WHITE);
        }
    }

    fn upload_frame(&mut self, ctx: &egui::Context) {
        let canvas = self.dashboard.chart().canvas();
        let generation = canvas.generation();
        if self.shown_generation == Some(generation) {
            return;
        }
        let Some(frame) = canvas.visible_frame() else {
            return;
        };
        let image = egui::ColorImage::from_rgba_premultiplied(
            [frame.width as usize, frame.height as usize],
            &frame.data,
        );
        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture = Some(ctx.load_texture("chart", image, egui::TextureOptions::LINEAR))
            }
        }
        self.shown_generation = Some(generation);
    }

    fn save_settings_if_dirty(&mut self) {
        if !self.settings_dirty {
            return;
        }
        self.settings_dirty = false;
        if let Err(e) = self.dashboard.settings().save() {
            tracing::warn!("Failed to save settings: {}", e);
        }
    }
}

/// One virtualized table: header, then only the rows in view
fn render_table(ui: &mut egui::Ui, title: &str, rows: &[Sample]) {
    ui.horizontal(|ui| {
        ui.strong(title);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(format!("{} rows", rows.len()));
        });
    });
    ui.horizontal(|ui| {
        let width = ui.available_width() / 3.0;
        for heading in ["Time", "Value", "Label"] {
            let label = egui::Label::new(egui::RichText::new(heading).small());
            ui.add_sized([width, 18.0], label);
        }
    });

    egui::ScrollArea::vertical()
        .id_salt(title)
        .max_height(TABLE_HEIGHT)
        .auto_shrink([false, false])
        .show_viewport(ui, |ui, viewport| {
            ui.set_height(ROW_HEIGHT * rows.len() as f32);
            let window = row_window(
                viewport.min.y,
                viewport.height(),
                ROW_HEIGHT,
                OVERSCAN,
                rows.len(),
            );
            let left = ui.max_rect().left();
            let cell_width = ui.max_rect().width() / 3.0;
            let top = ui.max_rect().top() + window.top_padding(ROW_HEIGHT);

            for (i, sample) in rows[window.start..window.end].iter().enumerate() {
                let y = top + i as f32 * ROW_HEIGHT;
                for (col, cell) in format_row(sample).into_iter().enumerate() {
                    let rect = egui::Rect::from_min_size(
                        egui::pos2(left + col as f32 * cell_width, y),
                        egui::vec2(cell_width, ROW_HEIGHT),
                    );
                    ui.put(rect, egui::Label::new(egui::RichText::new(cell).monospace()));
                }
            }
        });
}

impl eframe::App for StreamScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.dashboard.step(now, epoch_millis());

        egui::TopBottomPanel::top("controls_panel").show(ctx, |ui| {
            ui.add_space(4.0);
            self.render_controls(ui, now);
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("debug_panel").show(ctx, |ui| {
            self.render_debug_bar(ui);
        });

        egui::TopBottomPanel::bottom("tables_panel").show(ctx, |ui| {
            ui.add_space(4.0);
            self.render_tables(ui);
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_chart(ui, now);
        });

        self.save_settings_if_dirty();

        // Keep the frame loop alive for ingestion and worker replies
        let next_sample = self.dashboard.ingestor().time_until_next(Instant::now());
        ctx.request_repaint_after(next_sample.min(Duration::from_millis(16)));
    }
}
