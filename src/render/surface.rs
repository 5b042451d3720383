//! Drawing surfaces.
//!
//! Renderers draw through the [`Surface`] trait in logical pixels. The
//! production surface is a `tiny_skia` pixmap scaled by the device pixel
//! ratio; tests substitute a recording surface.

use std::path::Path;

use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::error::{ExportError, TransferError};

/// Straight (non-premultiplied) RGBA color
pub type Rgba = [u8; 4];

/// Minimal 2D drawing API used by every renderer
pub trait Surface {
    /// Logical width
    fn width(&self) -> f32;
    /// Logical height
    fn height(&self) -> f32;
    /// Reset every pixel to transparent
    fn clear(&mut self);
    fn stroke_polyline(&mut self, points: &[(f32, f32)], color: Rgba, width: f32);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba);
    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Rgba);
}

fn paint(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = true;
    paint
}

/// A raster surface backed by a `tiny_skia::Pixmap`.
///
/// The pixmap holds `round(width * dpr) x round(height * dpr)` physical
/// pixels; every drawing call is scaled by `dpr` so callers work in logical
/// units.
pub struct PixmapSurface {
    pixmap: Pixmap,
    width: u32,
    height: u32,
    dpr: f32,
}

impl std::fmt::Debug for PixmapSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixmapSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("dpr", &self.dpr)
            .finish()
    }
}

impl PixmapSurface {
    pub fn new(width: u32, height: u32, dpr: f32) -> Result<Self, TransferError> {
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        let physical_w = (width as f32 * dpr).round() as u32;
        let physical_h = (height as f32 * dpr).round() as u32;
        let pixmap =
            Pixmap::new(physical_w, physical_h).ok_or(TransferError::Allocation { width, height })?;
        Ok(Self {
            pixmap,
            width,
            height,
            dpr,
        })
    }

    /// Reallocate at a new size. The old pixels are dropped; on failure the
    /// surface is left unchanged.
    pub fn resize(&mut self, width: u32, height: u32, dpr: f32) -> Result<(), TransferError> {
        *self = Self::new(width, height, dpr)?;
        Ok(())
    }

    pub fn logical_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn dpr(&self) -> f32 {
        self.dpr
    }

    fn transform(&self) -> Transform {
        Transform::from_scale(self.dpr, self.dpr)
    }

    /// Copy the current pixels out
    pub fn snapshot(&self) -> RenderedFrame {
        RenderedFrame {
            width: self.pixmap.width(),
            height: self.pixmap.height(),
            data: self.pixmap.data().to_vec(),
        }
    }
}

impl Surface for PixmapSurface {
    fn width(&self) -> f32 {
        self.width as f32
    }

    fn height(&self) -> f32 {
        self.height as f32
    }

    fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    fn stroke_polyline(&mut self, points: &[(f32, f32)], color: Rgba, width: f32) {
        let Some((&(x0, y0), rest)) = points.split_first() else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(x0, y0);
        if rest.is_empty() {
            // A single point still leaves a visible dot like a canvas stroke would
            pb.line_to(x0 + 0.01, y0);
        }
        for &(x, y) in rest {
            pb.line_to(x, y);
        }
        let Some(path) = pb.finish() else {
            return;
        };
        let stroke = Stroke {
            width,
            ..Default::default()
        };
        let transform = self.transform();
        self.pixmap
            .stroke_path(&path, &paint(color), &stroke, transform, None);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        if let Some(rect) = Rect::from_xywh(x, y, w, h) {
            let transform = self.transform();
            self.pixmap.fill_rect(rect, &paint(color), transform, None);
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Rgba) {
        if let Some(path) = PathBuilder::from_circle(cx, cy, r) {
            let transform = self.transform();
            self.pixmap
                .fill_path(&path, &paint(color), FillRule::Winding, transform, None);
        }
    }
}

/// A finished frame in physical pixels, premultiplied RGBA
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RenderedFrame {
    /// Straight RGBA of one pixel, or `None` outside the frame
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let px = &self.data[i..i + 4];
        Some(demultiply([px[0], px[1], px[2], px[3]]))
    }

    /// Whether any pixel has non-zero alpha
    pub fn has_ink(&self) -> bool {
        self.data.chunks_exact(4).any(|px| px[3] != 0)
    }

    /// Write the frame as a PNG
    pub fn save_png(&self, path: &Path) -> Result<(), ExportError> {
        let straight: Vec<u8> = self
            .data
            .chunks_exact(4)
            .flat_map(|px| demultiply([px[0], px[1], px[2], px[3]]))
            .collect();
        let image = image::RgbaImage::from_raw(self.width, self.height, straight)
            .ok_or(ExportError::InvalidFrame)?;
        image.save_with_format(path, image::ImageFormat::Png)?;
        tracing::info!("Exported {}x{} frame to {:?}", self.width, self.height, path);
        Ok(())
    }
}

fn demultiply(px: Rgba) -> Rgba {
    let a = px[3];
    if a == 0 || a == 255 {
        return px;
    }
    let un = |c: u8| ((c as u16 * 255 + a as u16 / 2) / a as u16).min(255) as u8;
    [un(px[0]), un(px[1]), un(px[2]), a]
}
