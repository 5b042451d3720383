//! Bar chart: per-label sample counts over time buckets, stacked per bucket.

use super::mapping::Projection;
use super::{draw_center_gridline, ChartRenderer, DrawContext, Surface};
use crate::state::{ChartKind, BAR_BUCKETS, BAR_HEIGHT_FRACTION};
use crate::stream::Sample;

pub struct BarRenderer;

/// Counts per label (first-seen order) and bucket
pub fn bucket_counts<'a>(
    points: &'a [Sample],
    projection: &Projection,
    buckets: usize,
) -> Vec<(&'a str, Vec<u32>)> {
    let mut counts: Vec<(&str, Vec<u32>)> = Vec::new();
    for p in points {
        let label = p.series_label();
        let bucket = projection.bucket_index(p.time, buckets);
        let idx = match counts.iter().position(|(l, _)| *l == label) {
            Some(idx) => idx,
            None => {
                counts.push((label, vec![0; buckets]));
                counts.len() - 1
            }
        };
        counts[idx].1[bucket] += 1;
    }
    counts
}

impl ChartRenderer for BarRenderer {
    fn kind(&self) -> ChartKind {
        ChartKind::Bar
    }

    fn draw(&self, surface: &mut dyn Surface, points: &[Sample], ctx: &DrawContext<'_>) {
        let (width, height) = (surface.width(), surface.height());
        let Some(projection) = Projection::from_points(points, width, height, ctx.range) else {
            return;
        };

        let counts = bucket_counts(points, &projection, BAR_BUCKETS);
        let max_count = counts
            .iter()
            .flat_map(|(_, c)| c.iter().copied())
            .max()
            .unwrap_or(0)
            .max(1);
        let bucket_width = width / BAR_BUCKETS as f32;

        for b in 0..BAR_BUCKETS {
            let x = b as f32 * bucket_width;
            let mut y_base = height;
            for (label, per_bucket) in &counts {
                let count = per_bucket[b];
                if count == 0 {
                    continue;
                }
                let h = count as f32 / max_count as f32 * (height * BAR_HEIGHT_FRACTION);
                let color = ctx.palette.color_for(label);
                surface.fill_rect(x, y_base - h, bucket_width - 1.0, h, color);
                y_base -= h;
            }
        }
        draw_center_gridline(surface);
    }
}
