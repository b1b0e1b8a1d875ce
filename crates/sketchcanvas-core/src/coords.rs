//! Conversion between screen pixels and percentage space.
//!
//! Element geometry lives in a 0–100 space on each axis, relative to the
//! canvas's bounding box. Pointer positions are clamped into that range: a
//! captured drag can report points far outside the canvas.

use crate::input::PointerInput;
use kurbo::{Point, Rect};

/// A pointer position in percentage space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedPoint {
    pub point: Point,
    pub shift_key: bool,
}

impl NormalizedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            point: Point::new(x, y),
            shift_key: false,
        }
    }

    pub fn with_shift(mut self, shift_key: bool) -> Self {
        self.shift_key = shift_key;
        self
    }
}

/// Map one screen coordinate into 0–100 along an axis of the given extent.
fn normalize_axis(value: f64, origin: f64, extent: f64) -> f64 {
    if extent <= 0.0 {
        return 0.0;
    }
    ((value - origin) / extent * 100.0).clamp(0.0, 100.0)
}

/// Normalize a screen point against the canvas bounds (screen pixels).
pub fn normalize_point(screen: Point, canvas_bounds: Rect) -> Point {
    Point::new(
        normalize_axis(screen.x, canvas_bounds.x0, canvas_bounds.width()),
        normalize_axis(screen.y, canvas_bounds.y0, canvas_bounds.height()),
    )
}

/// Normalize a pointer event. Returns `None` only for a touch event carrying no touches.
pub fn to_normalized(event: &PointerInput, canvas_bounds: Rect) -> Option<NormalizedPoint> {
    let screen = event.position()?;
    Some(NormalizedPoint {
        point: normalize_point(screen, canvas_bounds),
        shift_key: event.modifiers().shift,
    })
}

/// Percentage to pixels along the x axis.
pub fn to_pixel_x(pct: f64, width: f64) -> f64 {
    pct / 100.0 * width
}

/// Percentage to pixels along the y axis.
pub fn to_pixel_y(pct: f64, height: f64) -> f64 {
    pct / 100.0 * height
}

/// Percentage point to a pixel point on a canvas of the given pixel size.
pub fn to_pixel_point(point: Point, width: f64, height: f64) -> Point {
    Point::new(to_pixel_x(point.x, width), to_pixel_y(point.y, height))
}
