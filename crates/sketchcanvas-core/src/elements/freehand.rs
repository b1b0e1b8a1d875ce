//! Freehand stroke element.

use super::{ElementId, ElementStyle, FlipAxis, LineStyle, mirror_point};
use crate::hit_test::point_to_polyline_dist;
use crate::stabilizer;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A freehand stroke (ordered series of points).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Freehand {
    pub id: ElementId,
    pub z_index: i64,
    #[serde(flatten)]
    pub style: ElementStyle,
    /// Points in the stroke, in drawing order.
    pub points: Vec<Point>,
    #[serde(default)]
    pub line_style: LineStyle,
}

impl Freehand {
    /// Start an uncommitted stroke at `start`.
    pub fn new(style: ElementStyle, z_index: i64, start: Point) -> Self {
        Self::from_points(style, z_index, vec![start])
    }

    /// Create an uncommitted stroke from existing points.
    pub fn from_points(style: ElementStyle, z_index: i64, points: Vec<Point>) -> Self {
        Self {
            id: Uuid::nil(),
            z_index,
            style,
            points,
            line_style: LineStyle::default(),
        }
    }

    /// Add a point to the stroke.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Reduce the point count with Ramer-Douglas-Peucker.
    pub fn simplify(&mut self, tolerance: f64) {
        if self.points.len() < 3 {
            return;
        }
        self.points = stabilizer::simplify(&self.points, tolerance);
    }

    pub fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        self.points
            .iter()
            .skip(1)
            .fold(Rect::from_points(*first, *first), |rect, p| {
                rect.union_pt(*p)
            })
    }

    /// Hit when the point is within `tolerance + strokeWidth / 2` of any segment.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if self.points.len() < 2 {
            return false;
        }
        point_to_polyline_dist(point, &self.points) < tolerance + self.style.stroke_width / 2.0
    }

    pub fn translate(&mut self, delta: Vec2) {
        for point in &mut self.points {
            *point += delta;
        }
    }

    pub(crate) fn mirror(&mut self, axis: FlipAxis) {
        let center = self.bounds().center();
        for point in &mut self.points {
            *point = mirror_point(*point, center, axis);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(points: Vec<Point>) -> Freehand {
        Freehand::from_points(ElementStyle::default(), 1, points)
    }

    #[test]
    fn test_add_points() {
        let mut freehand = Freehand::new(ElementStyle::default(), 1, Point::new(0.0, 0.0));
        freehand.add_point(Point::new(10.0, 10.0));
        assert_eq!(freehand.len(), 2);
        assert!(freehand.id.is_nil());
    }

    #[test]
    fn test_bounds() {
        let freehand = stroke(vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 50.0),
            Point::new(50.0, 100.0),
        ]);
        let bounds = freehand.bounds();
        assert!((bounds.x0).abs() < f64::EPSILON);
        assert!((bounds.y0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 100.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_simplify() {
        let mut freehand = stroke(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.1),
            Point::new(2.0, 0.0),
            Point::new(3.0, 0.1),
            Point::new(4.0, 0.0),
        ]);
        freehand.simplify(0.5);
        assert_eq!(freehand.len(), 2);
    }

    #[test]
    fn test_hit_test() {
        let freehand = stroke(vec![Point::new(0.0, 0.0), Point::new(50.0, 0.0)]);
        assert!(freehand.hit_test(Point::new(25.0, 0.5), 1.0));
        assert!(!freehand.hit_test(Point::new(25.0, 5.0), 1.0));
    }

    #[test]
    fn test_single_point_never_hits() {
        let freehand = stroke(vec![Point::new(10.0, 10.0)]);
        assert!(!freehand.hit_test(Point::new(10.0, 10.0), 5.0));
    }

    #[test]
    fn test_mirror_horizontal() {
        let mut freehand = stroke(vec![Point::new(0.0, 0.0), Point::new(10.0, 5.0)]);
        freehand.mirror(FlipAxis::Horizontal);
        assert_eq!(freehand.points[0], Point::new(10.0, 0.0));
        assert_eq!(freehand.points[1], Point::new(0.0, 5.0));
    }
}
