//! Chart renderers.
//!
//! Every renderer follows the same pass: apply the level-of-detail budget,
//! clear the surface, then map and draw. A zero-sized surface skips the pass
//! entirely, and an empty input leaves only the center gridline.

pub mod bar;
pub mod canvas;
pub mod color;
pub mod heatmap;
pub mod line;
pub mod mapping;
pub mod scatter;
pub mod surface;

pub use canvas::ChartCanvas;
pub use color::{heat_color, Palette, GRID_COLOR};
pub use mapping::{Projection, ValueRange};
pub use surface::{PixmapSurface, RenderedFrame, Rgba, Surface};

use crate::diagnostics::DrawInfo;
use crate::pipeline::{level_of_detail, DownsampleMode, LodBudget};
use crate::state::ChartKind;
use crate::stream::Sample;
use crate::view::ViewTransform;

/// Everything a renderer reads besides the points
#[derive(Clone, Copy, Debug)]
pub struct DrawContext<'a> {
    pub view: ViewTransform,
    pub palette: &'a Palette,
    pub range: ValueRange,
}

/// One chart projection
pub trait ChartRenderer: Send + Sync {
    fn kind(&self) -> ChartKind;

    /// Draw a non-empty, time-sorted, within-budget series onto a cleared surface
    fn draw(&self, surface: &mut dyn Surface, points: &[Sample], ctx: &DrawContext<'_>);
}

/// The renderer for a chart kind
pub fn renderer_for(kind: ChartKind) -> &'static dyn ChartRenderer {
    match kind {
        ChartKind::Line => &line::LineRenderer,
        ChartKind::Bar => &bar::BarRenderer,
        ChartKind::Scatter => &scatter::ScatterRenderer,
        ChartKind::Heatmap => &heatmap::HeatmapRenderer,
    }
}

/// Downsampling mode a chart kind uses above the draw budget
pub fn lod_mode(kind: ChartKind) -> DownsampleMode {
    if kind.keeps_extrema() {
        DownsampleMode::Extrema
    } else {
        DownsampleMode::Mean
    }
}

/// Faint horizontal line across the middle of the surface
pub fn draw_center_gridline(surface: &mut dyn Surface) {
    let (w, h) = (surface.width(), surface.height());
    surface.stroke_polyline(&[(0.0, h * 0.5), (w, h * 0.5)], GRID_COLOR, 1.0);
}

/// Run one full draw pass. Returns `None` when the pass was skipped.
pub fn render_frame(
    surface: &mut dyn Surface,
    kind: ChartKind,
    points: &[Sample],
    ctx: &DrawContext<'_>,
) -> Option<DrawInfo> {
    if surface.width() <= 0.0 || surface.height() <= 0.0 {
        return None;
    }

    let draw_points = level_of_detail(points, LodBudget::default(), lod_mode(kind));

    surface.clear();
    if draw_points.is_empty() {
        draw_center_gridline(surface);
    } else {
        renderer_for(kind).draw(surface, &draw_points, ctx);
    }

    Some(DrawInfo {
        raw: points.len(),
        drawn: draw_points.len(),
        fps: None,
        offscreen: false,
    })
}
