//! StreamScope - a real-time telemetry dashboard written in Rust
//!
//! Streams labeled samples through a bounded buffer, filters and aggregates
//! them, and renders line, bar, scatter or heatmap charts at interactive
//! frame rates.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use streamscope::app::StreamScopeApp;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Configure native options
    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([640.0, 400.0])
            .with_title("StreamScope")
            .with_app_id("StreamScope"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "StreamScope",
        native_options,
        Box::new(|cc| Ok(Box::new(StreamScopeApp::new(cc)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to start StreamScope: {}", e))
}
