//! The host-side chart canvas.
//!
//! A canvas owns one drawing surface that can either be drawn on directly
//! from the UI thread or transferred, once, to a render worker. Transfer is
//! refused after the UI thread has acquired a drawing context, the same
//! constraint a browser canvas imposes. Frames produced by a worker are
//! handed back through [`ChartCanvas::present`].

use super::surface::{PixmapSurface, RenderedFrame, Surface};
use crate::error::TransferError;
use crate::state::{DEFAULT_SURFACE_HEIGHT, DEFAULT_SURFACE_WIDTH};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CanvasState {
    /// No context acquired yet; the surface may still be transferred
    Fresh,
    /// The UI thread has drawn on the surface
    ContextAcquired,
    /// The surface lives in a render worker
    Transferred,
}

pub struct ChartCanvas {
    surface: Option<PixmapSurface>,
    state: CanvasState,
    offscreen_supported: bool,
    size: (u32, u32),
    dpr: f32,
    presented: Option<RenderedFrame>,
    generation: u64,
}

impl ChartCanvas {
    /// A canvas that supports offscreen transfer. Zero dimensions fall back
    /// to the default canvas size.
    pub fn new(width: u32, height: u32, dpr: f32) -> Self {
        let width = if width == 0 { DEFAULT_SURFACE_WIDTH } else { width };
        let height = if height == 0 { DEFAULT_SURFACE_HEIGHT } else { height };
        let surface = match PixmapSurface::new(width, height, dpr) {
            Ok(surface) => Some(surface),
            Err(e) => {
                tracing::warn!("Canvas surface unavailable: {}", e);
                None
            }
        };
        Self {
            surface,
            state: CanvasState::Fresh,
            offscreen_supported: true,
            size: (width, height),
            dpr,
            presented: None,
            generation: 0,
        }
    }

    /// A canvas whose surface can never leave the UI thread
    pub fn without_offscreen(width: u32, height: u32, dpr: f32) -> Self {
        Self {
            offscreen_supported: false,
            ..Self::new(width, height, dpr)
        }
    }

    pub fn state(&self) -> CanvasState {
        self.state
    }

    pub fn supports_offscreen(&self) -> bool {
        self.offscreen_supported
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn dpr(&self) -> f32 {
        self.dpr
    }

    /// Incremented every time the visible content changes
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Draw on the surface from the UI thread.
    ///
    /// Returns `None` (and draws nothing) when the surface is missing or
    /// has been transferred.
    pub fn draw_with<R>(&mut self, f: impl FnOnce(&mut PixmapSurface) -> R) -> Option<R> {
        if self.state == CanvasState::Transferred {
            return None;
        }
        let surface = self.surface.as_mut()?;
        self.state = CanvasState::ContextAcquired;
        let out = f(surface);
        self.generation += 1;
        Some(out)
    }

    /// Move the surface out for a render worker
    pub fn transfer_to_offscreen(&mut self) -> Result<PixmapSurface, TransferError> {
        if !self.offscreen_supported {
            return Err(TransferError::Unsupported);
        }
        match self.state {
            CanvasState::ContextAcquired => return Err(TransferError::ContextAcquired),
            CanvasState::Transferred => return Err(TransferError::AlreadyTransferred),
            CanvasState::Fresh => {}
        }
        let surface = self.surface.take().ok_or(TransferError::Allocation {
            width: self.size.0,
            height: self.size.1,
        })?;
        self.state = CanvasState::Transferred;
        Ok(surface)
    }

    /// Take the surface back after the worker is gone. A lost surface is
    /// reallocated at the current size.
    pub fn reclaim(&mut self, surface: Option<PixmapSurface>) {
        let (width, height) = self.size;
        self.surface = match surface {
            Some(mut surface)
                if surface.logical_size() == self.size && surface.dpr() == self.dpr =>
            {
                surface.clear();
                Some(surface)
            }
            _ => PixmapSurface::new(width, height, self.dpr).ok(),
        };
        self.state = CanvasState::Fresh;
        self.presented = None;
    }

    /// Record a new size. The local surface is reallocated; a transferred
    /// surface must be resized by its owner.
    pub fn resize(&mut self, width: u32, height: u32, dpr: f32) -> Result<(), TransferError> {
        self.size = (width.max(1), height.max(1));
        self.dpr = dpr;
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(self.size.0, self.size.1, dpr)?;
        }
        Ok(())
    }

    /// Show a frame produced elsewhere (by the render worker)
    pub fn present(&mut self, frame: RenderedFrame) {
        self.presented = Some(frame);
        self.generation += 1;
    }

    /// The pixels currently on screen
    pub fn visible_frame(&self) -> Option<RenderedFrame> {
        match self.state {
            CanvasState::Transferred => self.presented.clone(),
            _ => self.surface.as_ref().map(PixmapSurface::snapshot),
        }
    }
}
