//! Rectangle element.

use super::{ElementId, ElementStyle, LineStyle};
use crate::hit_test::point_to_segment_dist;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    pub id: ElementId,
    pub z_index: i64,
    #[serde(flatten)]
    pub style: ElementStyle,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub filled: bool,
    #[serde(default)]
    pub flip_x: bool,
    #[serde(default)]
    pub flip_y: bool,
    #[serde(default)]
    pub line_style: LineStyle,
}

impl Rectangle {
    /// Create an uncommitted rectangle.
    pub fn new(style: ElementStyle, z_index: i64, origin: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::nil(),
            z_index,
            style,
            x: origin.x,
            y: origin.y,
            width,
            height,
            filled: false,
            flip_x: false,
            flip_y: false,
            line_style: LineStyle::default(),
        }
    }

    /// Reshape from two opposite corners, normalizing to a positive box.
    pub fn set_corners(&mut self, p1: Point, p2: Point) {
        self.x = p1.x.min(p2.x);
        self.y = p1.y.min(p2.y);
        self.width = (p2.x - p1.x).abs();
        self.height = (p2.y - p1.y).abs();
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    fn edges(&self) -> [(Point, Point); 4] {
        let r = self.as_rect();
        let tl = Point::new(r.x0, r.y0);
        let tr = Point::new(r.x1, r.y0);
        let br = Point::new(r.x1, r.y1);
        let bl = Point::new(r.x0, r.y1);
        [(tl, tr), (tr, br), (br, bl), (bl, tl)]
    }

    /// Filled: anywhere inside the box. Outline: within `tolerance` of an edge.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if self.width <= 0.0 || self.height <= 0.0 {
            return false;
        }
        if self.filled {
            let r = self.as_rect();
            return point.x >= r.x0 && point.x <= r.x1 && point.y >= r.y0 && point.y <= r.y1;
        }
        self.edges()
            .iter()
            .any(|&(a, b)| point_to_segment_dist(point, a, b) <= tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(filled: bool) -> Rectangle {
        let mut r = Rectangle::new(ElementStyle::default(), 1, Point::new(20.0, 20.0), 40.0, 30.0);
        r.filled = filled;
        r
    }

    #[test]
    fn test_set_corners_normalizes() {
        let mut r = rect(false);
        r.set_corners(Point::new(60.0, 60.0), Point::new(10.0, 40.0));
        assert!((r.x - 10.0).abs() < f64::EPSILON);
        assert!((r.y - 40.0).abs() < f64::EPSILON);
        assert!((r.width - 50.0).abs() < f64::EPSILON);
        assert!((r.height - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_filled_hit_inside() {
        let r = rect(true);
        assert!(r.hit_test(Point::new(40.0, 35.0), 1.0));
        assert!(r.hit_test(Point::new(60.0, 50.0), 0.0));
        assert!(!r.hit_test(Point::new(61.0, 35.0), 0.0));
    }

    #[test]
    fn test_outline_interior_misses() {
        let r = rect(false);
        assert!(!r.hit_test(Point::new(40.0, 35.0), 1.0));
    }

    #[test]
    fn test_zero_width_never_hits() {
        let mut r = rect(false);
        r.width = 0.0;
        assert!(!r.hit_test(Point::new(20.0, 35.0), 1.0));
        r.filled = true;
        assert!(!r.hit_test(Point::new(20.0, 35.0), 1.0));
    }

    #[test]
    fn test_outline_edge_hits() {
        let r = rect(false);
        assert!(r.hit_test(Point::new(20.0, 35.0), 0.0));
        assert!(r.hit_test(Point::new(40.0, 50.0), 0.0));
        assert!(r.hit_test(Point::new(40.0, 20.5), 1.0));
        assert!(!r.hit_test(Point::new(40.0, 18.0), 1.0));
    }

    #[test]
    fn test_zero_size_never_hits() {
        let r = Rectangle::new(ElementStyle::default(), 1, Point::new(5.0, 5.0), 0.0, 0.0);
        assert!(!r.hit_test(Point::new(5.0, 5.0), 1.0));
    }
}
