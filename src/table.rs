//! Virtualized data tables: only the rows inside the scroll viewport, plus
//! an overscan margin, are laid out each frame.

use crate::stream::Sample;

/// Table panel height in logical pixels
pub const TABLE_HEIGHT: f32 = 320.0;
/// Row height in logical pixels
pub const ROW_HEIGHT: f32 = 30.0;
/// Extra rows laid out above and below the viewport
pub const OVERSCAN: usize = 5;

/// Half-open range of rows to lay out
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RowWindow {
    pub start: usize,
    pub end: usize,
}

impl RowWindow {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Blank space above the first laid-out row
    pub fn top_padding(&self, row_height: f32) -> f32 {
        self.start as f32 * row_height
    }

    /// Blank space below the last laid-out row
    pub fn bottom_padding(&self, total: usize, row_height: f32) -> f32 {
        total.saturating_sub(self.end) as f32 * row_height
    }
}

/// Rows to lay out for a viewport scrolled to `scroll_top`.
///
/// `start = floor(scroll_top / row_height) - overscan`, clamped at 0, and
/// `end = min(total, start + visible + 2 * overscan)` where `visible` is the
/// number of rows the viewport can hold.
pub fn row_window(
    scroll_top: f32,
    viewport_height: f32,
    row_height: f32,
    overscan: usize,
    total: usize,
) -> RowWindow {
    if total == 0 || row_height.is_nan() || row_height <= 0.0 {
        return RowWindow::default();
    }
    let first = (scroll_top.max(0.0) / row_height).floor() as usize;
    let start = first.saturating_sub(overscan).min(total);
    let visible = (viewport_height.max(0.0) / row_height).ceil() as usize;
    let end = start.saturating_add(visible + 2 * overscan).min(total);
    RowWindow { start, end }
}

/// Millisecond timestamp as a UTC wall-clock time, `HH:MM:SS.mmm`
pub fn format_time(time_ms: i64) -> String {
    let millis = time_ms.rem_euclid(1000);
    let secs_of_day = time_ms.div_euclid(1000).rem_euclid(86_400);
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        secs_of_day / 3600,
        (secs_of_day / 60) % 60,
        secs_of_day % 60,
        millis
    )
}

/// The three table cells for one sample: time, value, label
pub fn format_row(sample: &Sample) -> [String; 3] {
    [
        format_time(sample.time),
        format!("{:.2}", sample.value),
        sample.label.clone(),
    ]
}
