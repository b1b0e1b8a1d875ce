//! Image element.
//!
//! Images are drawn by an external placement layer; this crate only handles
//! their hit-testing and resize geometry.

use super::{ElementId, ElementStyle};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An image centered on `(x, y)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: ElementId,
    pub z_index: i64,
    #[serde(flatten)]
    pub style: ElementStyle,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub maintain_aspect_ratio: bool,
    /// Source reference (URL or asset key) resolved by the placement layer.
    pub src: String,
}

impl Image {
    pub fn new(style: ElementStyle, z_index: i64, center: Point, size: Size, src: String) -> Self {
        Self {
            id: Uuid::nil(),
            z_index,
            style,
            x: center.x,
            y: center.y,
            width: size.width,
            height: size.height,
            rotation: 0.0,
            maintain_aspect_ratio: true,
            src,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center(), self.size())
    }

    /// Width over height, or 1.0 for a degenerate image.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height > 0.0 && self.width > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    pub fn hit_test(&self, point: Point) -> bool {
        if self.width <= 0.0 || self.height <= 0.0 {
            return false;
        }
        (point.x - self.x).abs() <= self.width / 2.0 && (point.y - self.y).abs() <= self.height / 2.0
    }
}
