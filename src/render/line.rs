//! Line chart: one polyline per label, honoring the pan/zoom transform.

use super::mapping::Projection;
use super::{draw_center_gridline, ChartRenderer, DrawContext, Surface};
use crate::state::{ChartKind, LINE_WIDTH};
use crate::stream::Sample;

pub struct LineRenderer;

/// Split into per-label polylines in first-seen label order
pub fn polylines<'a>(
    points: &'a [Sample],
    projection: &Projection,
    ctx: &DrawContext<'_>,
) -> Vec<(&'a str, Vec<(f32, f32)>)> {
    let mut groups: Vec<(&str, Vec<(f32, f32)>)> = Vec::new();
    for p in points {
        let label = p.series_label();
        let x = ctx.view.apply(projection.x(p.time));
        let y = projection.y(p.value);
        match groups.iter_mut().find(|(l, _)| *l == label) {
            Some((_, line)) => line.push((x, y)),
            None => groups.push((label, vec![(x, y)])),
        }
    }
    groups
}

impl ChartRenderer for LineRenderer {
    fn kind(&self) -> ChartKind {
        ChartKind::Line
    }

    fn draw(&self, surface: &mut dyn Surface, points: &[Sample], ctx: &DrawContext<'_>) {
        let Some(projection) =
            Projection::from_points(points, surface.width(), surface.height(), ctx.range)
        else {
            return;
        };

        for (label, line) in polylines(points, &projection, ctx) {
            surface.stroke_polyline(&line, ctx.palette.color_for(label), LINE_WIDTH);
        }
        draw_center_gridline(surface);
    }
}
