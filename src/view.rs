//! View transform and the gesture state machine that drives it.
//!
//! The transform is an affine `(scale, offset)` applied to x only, after the
//! time-to-pixel mapping. It is mutated only here and read by the renderers.

use serde::{Deserialize, Serialize};

/// Wheel sensitivity: one wheel unit scales by `exp(-0.0011)`
pub const ZOOM_SENSITIVITY: f32 = 0.0011;
pub const MIN_SCALE: f32 = 0.25;
pub const MAX_SCALE: f32 = 8.0;
/// Key that restores the identity transform
pub const RESET_KEY: char = '0';

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub scale: f32,
    pub offset: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: 0.0,
        }
    }
}

impl ViewTransform {
    #[inline]
    pub fn apply(&self, x: f32) -> f32 {
        x * self.scale + self.offset
    }

    /// Zoom about `cursor_x` so the content under the cursor stays put
    pub fn zoom_at(&mut self, cursor_x: f32, delta_y: f32) {
        let factor = (-delta_y * ZOOM_SENSITIVITY).exp();
        let next_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        let content_x = (cursor_x - self.offset) / self.scale;
        self.offset = cursor_x - content_x * next_scale;
        self.scale = next_scale;
    }

    pub fn pan(&mut self, dx: f32) {
        self.offset += dx;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Pointer input in surface coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    PointerDown { x: f32 },
    PointerMove { x: f32 },
    PointerUp,
    Wheel { cursor_x: f32, delta_y: f32 },
    Key(char),
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        last_x: f32,
    },
}

/// Gesture state machine owning the chart's view transform
#[derive(Clone, Debug, Default)]
pub struct ViewInteraction {
    transform: ViewTransform,
    drag: DragState,
}

impl ViewInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// Feed one gesture. Returns true when the transform changed and the
    /// chart should redraw immediately.
    pub fn handle(&mut self, gesture: Gesture) -> bool {
        match (gesture, self.drag) {
            (Gesture::PointerDown { x }, _) => {
                self.drag = DragState::Dragging { last_x: x };
                false
            }
            (Gesture::PointerMove { x }, DragState::Dragging { last_x }) => {
                self.drag = DragState::Dragging { last_x: x };
                let dx = x - last_x;
                if dx == 0.0 {
                    return false;
                }
                self.transform.pan(dx);
                true
            }
            (Gesture::PointerMove { .. }, DragState::Idle) => false,
            (Gesture::PointerUp, _) => {
                self.drag = DragState::Idle;
                false
            }
            (Gesture::Wheel { cursor_x, delta_y }, _) => {
                let before = self.transform;
                self.transform.zoom_at(cursor_x, delta_y);
                self.transform != before
            }
            (Gesture::Key(RESET_KEY), _) => {
                let changed = self.transform != ViewTransform::default();
                self.transform.reset();
                changed
            }
            (Gesture::Key(_), _) => false,
        }
    }
}
