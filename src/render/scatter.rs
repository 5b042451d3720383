//! Scatter plot: one dot per point, colored by label.

use super::mapping::Projection;
use super::{draw_center_gridline, ChartRenderer, DrawContext, Surface};
use crate::state::{ChartKind, SCATTER_RADIUS};
use crate::stream::Sample;

pub struct ScatterRenderer;

impl ChartRenderer for ScatterRenderer {
    fn kind(&self) -> ChartKind {
        ChartKind::Scatter
    }

    fn draw(&self, surface: &mut dyn Surface, points: &[Sample], ctx: &DrawContext<'_>) {
        let Some(projection) =
            Projection::from_points(points, surface.width(), surface.height(), ctx.range)
        else {
            return;
        };

        for p in points {
            let color = ctx.palette.color_for(p.series_label());
            surface.fill_circle(projection.x(p.time), projection.y(p.value), SCATTER_RADIUS, color);
        }
        draw_center_gridline(surface);
    }
}
