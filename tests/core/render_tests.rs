//! Tests for the chart renderers
//!
//! Drawing calls are captured with `RecordingSurface`, so these tests check
//! geometry and call order without rasterizing anything.

use streamscope::render::{
    heat_color, render_frame, DrawContext, Palette, PixmapSurface, Surface, ValueRange, GRID_COLOR,
};
use streamscope::state::{ChartKind, HEATMAP_COLS, HEATMAP_ROWS};
use streamscope::view::ViewTransform;
use strum::IntoEnumIterator;

use crate::common::{sample, series, DrawOp, RecordingSurface};

fn context(palette: &Palette) -> DrawContext<'_> {
    DrawContext {
        view: ViewTransform::default(),
        palette,
        range: ValueRange::default(),
    }
}

fn is_gridline(op: &DrawOp, width: f32, height: f32) -> bool {
    match op {
        DrawOp::Polyline { points, color, .. } => {
            *color == GRID_COLOR && points == &vec![(0.0, height * 0.5), (width, height * 0.5)]
        }
        _ => false,
    }
}

// ============================================
// Shared Pass Tests
// ============================================

#[test]
fn test_empty_input_draws_only_gridline() {
    let palette = Palette::default();
    for kind in ChartKind::iter() {
        let mut surface = RecordingSurface::new(400.0, 200.0);
        let info = render_frame(&mut surface, kind, &[], &context(&palette)).unwrap();

        assert_eq!(surface.ops.len(), 2, "{} should clear then draw the gridline", kind);
        assert_eq!(surface.ops[0], DrawOp::Clear);
        assert!(is_gridline(&surface.ops[1], 400.0, 200.0));
        assert_eq!(info.raw, 0);
        assert_eq!(info.drawn, 0);
    }
}

#[test]
fn test_zero_sized_surface_is_skipped() {
    let palette = Palette::default();
    let points = series(10, &["alpha"]);
    for (w, h) in [(0.0, 100.0), (100.0, 0.0)] {
        let mut surface = RecordingSurface::new(w, h);
        assert!(render_frame(&mut surface, ChartKind::Line, &points, &context(&palette)).is_none());
        assert!(surface.ops.is_empty(), "no clear on a zero-sized surface");
    }
}

#[test]
fn test_large_input_is_downsampled_before_drawing() {
    let palette = Palette::default();
    let points = series(12_000, &["alpha"]);

    let mut surface = RecordingSurface::new(800.0, 300.0);
    let info = render_frame(&mut surface, ChartKind::Line, &points, &context(&palette)).unwrap();
    assert_eq!(info.raw, 12_000);
    assert!(info.drawn <= 4_000, "extrema mode keeps at most two points per bucket");

    let mut surface = RecordingSurface::new(800.0, 300.0);
    let info = render_frame(&mut surface, ChartKind::Scatter, &points, &context(&palette)).unwrap();
    assert!(info.drawn <= 2_000, "mean mode keeps at most one point per bucket");
    assert_eq!(surface.circles(), info.drawn);
}

// ============================================
// Line Tests
// ============================================

#[test]
fn test_line_draws_one_polyline_per_label_then_gridline() {
    let palette = Palette::default();
    let points = series(90, &["alpha", "beta", "gamma"]);
    let mut surface = RecordingSurface::new(300.0, 150.0);
    render_frame(&mut surface, ChartKind::Line, &points, &context(&palette)).unwrap();

    let lines = surface.polylines();
    assert_eq!(lines.len(), 4, "three series and the gridline");
    assert!(is_gridline(lines[3], 300.0, 150.0), "gridline is drawn last");
    match lines[0] {
        DrawOp::Polyline { points, color, .. } => {
            assert_eq!(points.len(), 30);
            assert_eq!(*color, palette.color_for("alpha"));
            assert_eq!(points[0].0, 0.0);
        }
        other => panic!("unexpected op {:?}", other),
    }
}

#[test]
fn test_line_applies_view_transform_to_x() {
    let palette = Palette::default();
    let points = vec![sample(0, 0.0, "alpha"), sample(100, 100.0, "alpha")];
    let ctx = DrawContext {
        view: ViewTransform {
            scale: 2.0,
            offset: 10.0,
        },
        palette: &palette,
        range: ValueRange::default(),
    };
    let mut surface = RecordingSurface::new(200.0, 100.0);
    render_frame(&mut surface, ChartKind::Line, &points, &ctx).unwrap();

    match surface.polylines()[0] {
        DrawOp::Polyline { points, .. } => {
            assert_eq!(points, &vec![(10.0, 100.0), (410.0, 0.0)]);
        }
        other => panic!("unexpected op {:?}", other),
    }
}

// ============================================
// Bar Tests
// ============================================

#[test]
fn test_bar_width_leaves_one_pixel_gap() {
    let palette = Palette::default();
    let points = series(120, &["alpha"]);
    let mut surface = RecordingSurface::new(600.0, 100.0);
    render_frame(&mut surface, ChartKind::Bar, &points, &context(&palette)).unwrap();

    let rects = surface.rects();
    assert!(!rects.is_empty());
    for rect in rects {
        if let DrawOp::Rect { w, .. } = rect {
            assert_eq!(*w, 9.0, "60 buckets over 600 px, minus one");
        }
    }
    assert!(is_gridline(surface.ops.last().unwrap(), 600.0, 100.0));
}

#[test]
fn test_bar_stacks_labels_in_a_bucket() {
    let palette = Palette::default();
    let points = vec![
        sample(0, 1.0, "alpha"),
        sample(0, 1.0, "beta"),
        sample(1_000, 1.0, "alpha"),
    ];
    let mut surface = RecordingSurface::new(600.0, 100.0);
    render_frame(&mut surface, ChartKind::Bar, &points, &context(&palette)).unwrap();

    let rects: Vec<(f32, f32, f32)> = surface
        .rects()
        .into_iter()
        .filter_map(|op| match op {
            DrawOp::Rect { x, y, h, .. } if *x == 0.0 => Some((*x, *y, *h)),
            _ => None,
        })
        .collect();
    assert_eq!(rects.len(), 2, "alpha and beta share the first bucket");
    let (_, first_y, first_h) = rects[0];
    let (_, second_y, second_h) = rects[1];
    assert!((first_y + first_h - 100.0).abs() < 1e-4, "first bar sits on the bottom");
    assert!((second_y + second_h - first_y).abs() < 1e-4, "second bar stacks on the first");
}

// ============================================
// Scatter Tests
// ============================================

#[test]
fn test_scatter_draws_one_circle_per_point() {
    let palette = Palette::default();
    let points = series(257, &["alpha", "beta"]);
    let mut surface = RecordingSurface::new(300.0, 150.0);
    render_frame(&mut surface, ChartKind::Scatter, &points, &context(&palette)).unwrap();
    assert_eq!(surface.circles(), 257);
    assert!(is_gridline(surface.ops.last().unwrap(), 300.0, 150.0));
}

// ============================================
// Heatmap Tests
// ============================================

#[test]
fn test_heatmap_fills_every_cell_and_separators() {
    let palette = Palette::default();
    let points = series(500, &["alpha", "beta"]);
    let mut surface = RecordingSurface::new(800.0, 200.0);
    render_frame(&mut surface, ChartKind::Heatmap, &points, &context(&palette)).unwrap();

    assert_eq!(surface.rects().len(), HEATMAP_ROWS * HEATMAP_COLS);
    assert_eq!(surface.polylines().len(), HEATMAP_ROWS - 1, "separators only, no gridline");

    let cold = heat_color(0.0);
    let last_row_cell = surface.rects().last().map(|op| (*op).clone());
    match last_row_cell {
        Some(DrawOp::Rect { w, h, color, .. }) => {
            assert_eq!(w, 800.0 / HEATMAP_COLS as f32 + 0.5);
            assert_eq!(h, 200.0 / HEATMAP_ROWS as f32 + 0.5);
            assert_eq!(color, cold, "rows without a label use the cold color");
        }
        other => panic!("unexpected op {:?}", other),
    }
}

// ============================================
// Pixmap Tests
// ============================================

#[test]
fn test_pixmap_line_leaves_ink() {
    let palette = Palette::default();
    let points = series(200, &["alpha"]);
    let mut surface = PixmapSurface::new(120, 80, 2.0).unwrap();
    render_frame(&mut surface, ChartKind::Line, &points, &context(&palette)).unwrap();

    let frame = surface.snapshot();
    assert_eq!((frame.width, frame.height), (240, 160), "backing store is scaled by dpr");
    assert!(frame.has_ink());
    assert_eq!(surface.width(), 120.0);
}
