//! Heatmap: label rows by time columns, each cell colored by its mean
//! normalized value.
//!
//! Rows are assigned by label discovery order modulo the row count, so with
//! more labels than rows two labels share a row and their values are mixed.

use super::color::{heat_color, HEATMAP_SEPARATOR_COLOR};
use super::mapping::Projection;
use super::{ChartRenderer, DrawContext, Surface};
use crate::state::{ChartKind, HEATMAP_COLS, HEATMAP_ROWS};
use crate::stream::Sample;

pub struct HeatmapRenderer;

/// Mean normalized value per cell, `rows x cols`, `0` for empty cells
pub fn cell_means(
    points: &[Sample],
    projection: &Projection,
    rows: usize,
    cols: usize,
) -> Vec<Vec<f64>> {
    let mut labels: Vec<&str> = Vec::new();
    let mut sum = vec![vec![0.0f64; cols]; rows];
    let mut count = vec![vec![0u32; cols]; rows];

    for p in points {
        let label = p.series_label();
        let discovery = match labels.iter().position(|l| *l == label) {
            Some(i) => i,
            None => {
                labels.push(label);
                labels.len() - 1
            }
        };
        let row = discovery % rows;
        let col = projection.bucket_index(p.time, cols);
        sum[row][col] += projection.range().normalize(p.value);
        count[row][col] += 1;
    }

    sum.into_iter()
        .zip(count)
        .map(|(sums, counts)| {
            sums.into_iter()
                .zip(counts)
                .map(|(s, c)| if c > 0 { s / c as f64 } else { 0.0 })
                .collect()
        })
        .collect()
}

impl ChartRenderer for HeatmapRenderer {
    fn kind(&self) -> ChartKind {
        ChartKind::Heatmap
    }

    fn draw(&self, surface: &mut dyn Surface, points: &[Sample], ctx: &DrawContext<'_>) {
        let (width, height) = (surface.width(), surface.height());
        let Some(projection) = Projection::from_points(points, width, height, ctx.range) else {
            return;
        };

        let cell_w = width / HEATMAP_COLS as f32;
        let cell_h = height / HEATMAP_ROWS as f32;
        let means = cell_means(points, &projection, HEATMAP_ROWS, HEATMAP_COLS);

        for (r, row) in means.iter().enumerate() {
            for (c, mean) in row.iter().enumerate() {
                // Overlap by half a pixel to avoid seams between cells
                surface.fill_rect(
                    c as f32 * cell_w,
                    r as f32 * cell_h,
                    cell_w + 0.5,
                    cell_h + 0.5,
                    heat_color(*mean as f32),
                );
            }
        }

        for r in 1..HEATMAP_ROWS {
            let y = r as f32 * cell_h;
            surface.stroke_polyline(&[(0.0, y), (width, y)], HEATMAP_SEPARATOR_COLOR, 1.0);
        }
    }
}
