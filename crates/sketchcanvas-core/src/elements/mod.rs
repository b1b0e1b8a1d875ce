//! Element definitions for the sketch canvas.
//!
//! All geometry is stored in percentage space (0–100 on each axis). Only the
//! coordinate mapper and the renderer translate it to pixels.

mod circle;
mod freehand;
mod image;
mod line;
mod rectangle;
mod sticker;
mod text;

pub use circle::Circle;
pub use freehand::Freehand;
pub use image::Image;
pub use line::Segment;
pub use rectangle::Rectangle;
pub use sticker::{Sticker, StickerKind};
pub use text::Text;

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for committed elements.
///
/// Elements still being drawn carry [`Uuid::nil`] until the store commits them.
pub type ElementId = Uuid;

/// Errors produced when parsing a hex color string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("color must start with '#': {0:?}")]
    MissingHash(String),
    #[error("color must have 3, 6 or 8 hex digits, got {0}")]
    InvalidLength(usize),
    #[error("invalid hex digit in color {0:?}")]
    InvalidDigit(String),
}

/// RGBA8 color, serialized as `#RRGGBB` (or `#RRGGBBAA` when translucent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl HexColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self::black()
    }
}

impl FromStr for HexColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(s.to_string()))?;
        if !digits.is_ascii() {
            return Err(ColorParseError::InvalidDigit(s.to_string()));
        }
        let byte = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| ColorParseError::InvalidDigit(s.to_string()))
        };
        match digits.len() {
            3 => {
                let mut channels = [0u8; 3];
                for (i, c) in digits.chars().enumerate() {
                    let v = c
                        .to_digit(16)
                        .ok_or_else(|| ColorParseError::InvalidDigit(s.to_string()))?
                        as u8;
                    channels[i] = v * 17;
                }
                Ok(Self::rgb(channels[0], channels[1], channels[2]))
            }
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            n => Err(ColorParseError::InvalidLength(n)),
        }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for HexColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

/// Dash style for outlines, lines and freehand strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    /// Cycle to the next line style.
    pub fn next(self) -> Self {
        match self {
            LineStyle::Solid => LineStyle::Dashed,
            LineStyle::Dashed => LineStyle::Dotted,
            LineStyle::Dotted => LineStyle::Solid,
        }
    }
}

/// Style fields shared by every element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementStyle {
    /// Stroke (and fill, for filled shapes) color.
    pub color: HexColor,
    /// Stroke width in percentage units.
    pub stroke_width: f64,
    /// Opacity from 0 (invisible) to 100 (opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    100.0
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            color: HexColor::black(),
            stroke_width: 0.5,
            opacity: default_opacity(),
        }
    }
}

/// Axis used when flipping an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipAxis {
    Horizontal,
    Vertical,
}

/// Mirror a point about a center along the given axis.
pub(crate) fn mirror_point(point: Point, center: Point, axis: FlipAxis) -> Point {
    match axis {
        FlipAxis::Horizontal => Point::new(2.0 * center.x - point.x, point.y),
        FlipAxis::Vertical => Point::new(point.x, 2.0 * center.y - point.y),
    }
}

/// A drawable element on the canvas.
///
/// Serialized as a record internally tagged by `"type"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SketchElement {
    Freehand(Freehand),
    Rectangle(Rectangle),
    Circle(Circle),
    Line(Segment),
    Arrow(Segment),
    Text(Text),
    Sticker(Sticker),
    Image(Image),
}

impl SketchElement {
    pub fn id(&self) -> ElementId {
        match self {
            SketchElement::Freehand(e) => e.id,
            SketchElement::Rectangle(e) => e.id,
            SketchElement::Circle(e) => e.id,
            SketchElement::Line(e) | SketchElement::Arrow(e) => e.id,
            SketchElement::Text(e) => e.id,
            SketchElement::Sticker(e) => e.id,
            SketchElement::Image(e) => e.id,
        }
    }

    pub(crate) fn set_id(&mut self, id: ElementId) {
        match self {
            SketchElement::Freehand(e) => e.id = id,
            SketchElement::Rectangle(e) => e.id = id,
            SketchElement::Circle(e) => e.id = id,
            SketchElement::Line(e) | SketchElement::Arrow(e) => e.id = id,
            SketchElement::Text(e) => e.id = id,
            SketchElement::Sticker(e) => e.id = id,
            SketchElement::Image(e) => e.id = id,
        }
    }

    /// Whether the element has been committed to a store.
    pub fn is_committed(&self) -> bool {
        !self.id().is_nil()
    }

    pub fn z_index(&self) -> i64 {
        match self {
            SketchElement::Freehand(e) => e.z_index,
            SketchElement::Rectangle(e) => e.z_index,
            SketchElement::Circle(e) => e.z_index,
            SketchElement::Line(e) | SketchElement::Arrow(e) => e.z_index,
            SketchElement::Text(e) => e.z_index,
            SketchElement::Sticker(e) => e.z_index,
            SketchElement::Image(e) => e.z_index,
        }
    }

    pub fn set_z_index(&mut self, z_index: i64) {
        match self {
            SketchElement::Freehand(e) => e.z_index = z_index,
            SketchElement::Rectangle(e) => e.z_index = z_index,
            SketchElement::Circle(e) => e.z_index = z_index,
            SketchElement::Line(e) | SketchElement::Arrow(e) => e.z_index = z_index,
            SketchElement::Text(e) => e.z_index = z_index,
            SketchElement::Sticker(e) => e.z_index = z_index,
            SketchElement::Image(e) => e.z_index = z_index,
        }
    }

    pub fn style(&self) -> &ElementStyle {
        match self {
            SketchElement::Freehand(e) => &e.style,
            SketchElement::Rectangle(e) => &e.style,
            SketchElement::Circle(e) => &e.style,
            SketchElement::Line(e) | SketchElement::Arrow(e) => &e.style,
            SketchElement::Text(e) => &e.style,
            SketchElement::Sticker(e) => &e.style,
            SketchElement::Image(e) => &e.style,
        }
    }

    pub fn style_mut(&mut self) -> &mut ElementStyle {
        match self {
            SketchElement::Freehand(e) => &mut e.style,
            SketchElement::Rectangle(e) => &mut e.style,
            SketchElement::Circle(e) => &mut e.style,
            SketchElement::Line(e) | SketchElement::Arrow(e) => &mut e.style,
            SketchElement::Text(e) => &mut e.style,
            SketchElement::Sticker(e) => &mut e.style,
            SketchElement::Image(e) => &mut e.style,
        }
    }

    /// The record tag used when serializing this element.
    pub fn type_name(&self) -> &'static str {
        match self {
            SketchElement::Freehand(_) => "freehand",
            SketchElement::Rectangle(_) => "rectangle",
            SketchElement::Circle(_) => "circle",
            SketchElement::Line(_) => "line",
            SketchElement::Arrow(_) => "arrow",
            SketchElement::Text(_) => "text",
            SketchElement::Sticker(_) => "sticker",
            SketchElement::Image(_) => "image",
        }
    }

    /// Axis-aligned bounding box in percentage space.
    pub fn bounds(&self) -> Rect {
        match self {
            SketchElement::Freehand(e) => e.bounds(),
            SketchElement::Rectangle(e) => e.as_rect(),
            SketchElement::Circle(e) => e.bounds(),
            SketchElement::Line(e) | SketchElement::Arrow(e) => e.bounds(),
            SketchElement::Text(e) => e.bounds(),
            SketchElement::Sticker(e) => e.bounds(),
            SketchElement::Image(e) => e.bounds(),
        }
    }

    /// Whether `point` lies on this element, using the per-shape policy.
    /// Degenerate elements are never hit.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if self.is_degenerate() {
            return false;
        }
        match self {
            SketchElement::Freehand(e) => e.hit_test(point, tolerance),
            SketchElement::Rectangle(e) => e.hit_test(point, tolerance),
            SketchElement::Circle(e) => e.hit_test(point, tolerance),
            SketchElement::Line(e) | SketchElement::Arrow(e) => e.hit_test(point, tolerance),
            SketchElement::Text(e) => e.hit_test(point),
            SketchElement::Sticker(e) => e.hit_test(point),
            SketchElement::Image(e) => e.hit_test(point),
        }
    }

    /// Move the element by `delta` percentage units.
    pub fn translate(&mut self, delta: Vec2) {
        match self {
            SketchElement::Freehand(e) => e.translate(delta),
            SketchElement::Rectangle(e) => {
                e.x += delta.x;
                e.y += delta.y;
            }
            SketchElement::Circle(e) => {
                e.cx += delta.x;
                e.cy += delta.y;
            }
            SketchElement::Line(e) | SketchElement::Arrow(e) => e.translate(delta),
            SketchElement::Text(e) => {
                e.x += delta.x;
                e.y += delta.y;
            }
            SketchElement::Sticker(e) => {
                e.x += delta.x;
                e.y += delta.y;
            }
            SketchElement::Image(e) => {
                e.x += delta.x;
                e.y += delta.y;
            }
        }
    }

    /// Flip the element. Returns false for elements that cannot be flipped.
    pub fn flip(&mut self, axis: FlipAxis) -> bool {
        match self {
            SketchElement::Rectangle(e) => {
                match axis {
                    FlipAxis::Horizontal => e.flip_x = !e.flip_x,
                    FlipAxis::Vertical => e.flip_y = !e.flip_y,
                }
                true
            }
            SketchElement::Circle(e) => {
                match axis {
                    FlipAxis::Horizontal => e.flip_x = !e.flip_x,
                    FlipAxis::Vertical => e.flip_y = !e.flip_y,
                }
                true
            }
            SketchElement::Freehand(e) => {
                e.mirror(axis);
                true
            }
            SketchElement::Line(e) | SketchElement::Arrow(e) => {
                e.mirror(axis);
                true
            }
            SketchElement::Text(_) | SketchElement::Sticker(_) | SketchElement::Image(_) => false,
        }
    }

    /// Degenerate elements render nothing and are never hit.
    pub fn is_degenerate(&self) -> bool {
        match self {
            SketchElement::Freehand(e) => e.points.len() < 2,
            SketchElement::Rectangle(e) => e.width <= 0.0 || e.height <= 0.0,
            SketchElement::Circle(e) => e.rx <= 0.0 || e.ry <= 0.0,
            SketchElement::Line(e) | SketchElement::Arrow(e) => e.length() < f64::EPSILON,
            SketchElement::Text(e) => e.text.is_empty() || e.font_size <= 0.0,
            SketchElement::Sticker(e) => e.width <= 0.0 || e.height <= 0.0,
            SketchElement::Image(e) => e.width <= 0.0 || e.height <= 0.0,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, SketchElement::Image(_))
    }

    pub fn as_image(&self) -> Option<&Image> {
        match self {
            SketchElement::Image(img) => Some(img),
            _ => None,
        }
    }

    pub fn as_image_mut(&mut self) -> Option<&mut Image> {
        match self {
            SketchElement::Image(img) => Some(img),
            _ => None,
        }
    }
}
