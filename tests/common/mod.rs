//! Common test utilities shared across all test modules
//!
//! This module provides sample builders, a surface that records drawing
//! calls instead of rasterizing them, and a polling helper for tests that
//! wait on the render worker thread.

#![allow(dead_code)]

use std::time::{Duration, Instant};

use streamscope::render::{Rgba, Surface};
use streamscope::stream::Sample;

/// Build a sample
pub fn sample(time: i64, value: f64, label: &str) -> Sample {
    Sample::new(time, value, label)
}

/// `n` samples one millisecond apart, cycling through `labels`
pub fn series(n: usize, labels: &[&str]) -> Vec<Sample> {
    (0..n)
        .map(|i| {
            let value = ((i as f64) / 25.0).sin() * 40.0 + 50.0;
            Sample::new(i as i64, value, labels[i % labels.len()])
        })
        .collect()
}

/// Poll `check` until it returns true or `timeout` elapses
pub fn wait_until(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    check()
}

/// One recorded drawing call
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear,
    Polyline {
        points: Vec<(f32, f32)>,
        color: Rgba,
        width: f32,
    },
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Rgba,
    },
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
        color: Rgba,
    },
}

/// A surface that records calls for inspection
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub width: f32,
    pub height: f32,
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn polylines(&self) -> Vec<&DrawOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Polyline { .. }))
            .collect()
    }

    pub fn rects(&self) -> Vec<&DrawOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Rect { .. }))
            .collect()
    }

    pub fn circles(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Circle { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn stroke_polyline(&mut self, points: &[(f32, f32)], color: Rgba, width: f32) {
        self.ops.push(DrawOp::Polyline {
            points: points.to_vec(),
            color,
            width,
        });
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        self.ops.push(DrawOp::Rect { x, y, w, h, color });
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Rgba) {
        self.ops.push(DrawOp::Circle { cx, cy, r, color });
    }
}
