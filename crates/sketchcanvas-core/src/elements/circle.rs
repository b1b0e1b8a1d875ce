//! Circle (ellipse) element.

use super::{ElementId, ElementStyle};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An axis-aligned ellipse given by center and radii.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circle {
    pub id: ElementId,
    pub z_index: i64,
    #[serde(flatten)]
    pub style: ElementStyle,
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
    #[serde(default)]
    pub filled: bool,
    #[serde(default)]
    pub flip_x: bool,
    #[serde(default)]
    pub flip_y: bool,
}

impl Circle {
    /// Create an uncommitted ellipse.
    pub fn new(style: ElementStyle, z_index: i64, center: Point, rx: f64, ry: f64) -> Self {
        Self {
            id: Uuid::nil(),
            z_index,
            style,
            cx: center.x,
            cy: center.y,
            rx,
            ry,
            filled: false,
            flip_x: false,
            flip_y: false,
        }
    }

    /// Reshape to fit the box spanned by two opposite corners.
    pub fn set_corners(&mut self, p1: Point, p2: Point) {
        let rect = Rect::from_points(p1, p2);
        let center = rect.center();
        self.cx = center.x;
        self.cy = center.y;
        self.rx = rect.width() / 2.0;
        self.ry = rect.height() / 2.0;
    }

    pub fn center(&self) -> Point {
        Point::new(self.cx, self.cy)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.cx - self.rx,
            self.cy - self.ry,
            self.cx + self.rx,
            self.cy + self.ry,
        )
    }

    /// Distance in units of the radii: 1.0 lies exactly on the outline.
    fn normalized_distance(&self, point: Point) -> f64 {
        let dx = (point.x - self.cx) / self.rx;
        let dy = (point.y - self.cy) / self.ry;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if self.rx <= 0.0 || self.ry <= 0.0 {
            return false;
        }
        let distance = self.normalized_distance(point);
        if self.filled {
            distance <= 1.0
        } else {
            (distance - 1.0).abs() < tolerance / self.rx.min(self.ry)
        }
    }
}
