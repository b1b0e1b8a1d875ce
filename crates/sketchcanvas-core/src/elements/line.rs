//! Straight segment shared by line and arrow elements.

use super::{ElementId, ElementStyle, FlipAxis, LineStyle, mirror_point};
use crate::hit_test::point_to_segment_dist;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A line segment. Arrows use the same geometry and add a head at the end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: ElementId,
    pub z_index: i64,
    #[serde(flatten)]
    pub style: ElementStyle,
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    #[serde(default)]
    pub line_style: LineStyle,
}

impl Segment {
    /// Create an uncommitted segment.
    pub fn new(style: ElementStyle, z_index: i64, start: Point, end: Point) -> Self {
        Self {
            id: Uuid::nil(),
            z_index,
            style,
            start_x: start.x,
            start_y: start.y,
            end_x: end.x,
            end_y: end.y,
            line_style: LineStyle::default(),
        }
    }

    pub fn start(&self) -> Point {
        Point::new(self.start_x, self.start_y)
    }

    pub fn end(&self) -> Point {
        Point::new(self.end_x, self.end_y)
    }

    pub fn set_end(&mut self, end: Point) {
        self.end_x = end.x;
        self.end_y = end.y;
    }

    pub fn length(&self) -> f64 {
        (self.end() - self.start()).hypot()
    }

    pub fn midpoint(&self) -> Point {
        self.start().midpoint(self.end())
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.start(), self.end())
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if self.length() < f64::EPSILON {
            return false;
        }
        point_to_segment_dist(point, self.start(), self.end())
            < tolerance + self.style.stroke_width / 2.0
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.start_x += delta.x;
        self.start_y += delta.y;
        self.end_x += delta.x;
        self.end_y += delta.y;
    }

    pub(crate) fn mirror(&mut self, axis: FlipAxis) {
        let center = self.midpoint();
        let start = mirror_point(self.start(), center, axis);
        let end = mirror_point(self.end(), center, axis);
        self.start_x = start.x;
        self.start_y = start.y;
        self.set_end(end);
    }
}
