//! Text element.

use super::{ElementId, ElementStyle};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Average glyph advance as a fraction of the font size.
///
/// There are no font metrics in the core, so text width is estimated from the
/// character count. Selection near the end of long proportional strings is
/// approximate.
pub const GLYPH_WIDTH_FACTOR: f64 = 0.6;

/// A single line of text anchored at its baseline start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub id: ElementId,
    pub z_index: i64,
    #[serde(flatten)]
    pub style: ElementStyle,
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub font_size: f64,
    pub font_family: String,
}

impl Text {
    /// Create an uncommitted text element.
    pub fn new(
        style: ElementStyle,
        z_index: i64,
        anchor: Point,
        text: String,
        font_size: f64,
        font_family: String,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            z_index,
            style,
            x: anchor.x,
            y: anchor.y,
            text,
            font_size,
            font_family,
        }
    }

    pub fn estimated_width(&self) -> f64 {
        self.text.chars().count() as f64 * self.font_size * GLYPH_WIDTH_FACTOR
    }

    /// Box from the baseline up one font size, as wide as the estimate.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.x,
            self.y - self.font_size,
            self.x + self.estimated_width(),
            self.y,
        )
    }

    pub fn hit_test(&self, point: Point) -> bool {
        if self.text.is_empty() {
            return false;
        }
        let b = self.bounds();
        point.x >= b.x0 && point.x <= b.x1 && point.y >= b.y0 && point.y <= b.y1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Text {
        Text::new(
            ElementStyle::default(),
            1,
            Point::new(10.0, 50.0),
            s.to_string(),
            5.0,
            "sans-serif".to_string(),
        )
    }

    #[test]
    fn test_estimated_width() {
        assert!((text("hello").estimated_width() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_hit_test_box() {
        let t = text("hello");
        assert!(t.hit_test(Point::new(12.0, 48.0)));
        assert!(t.hit_test(Point::new(25.0, 45.0)));
        assert!(!t.hit_test(Point::new(26.0, 48.0)));
        assert!(!t.hit_test(Point::new(12.0, 51.0)));
        assert!(!t.hit_test(Point::new(12.0, 44.0)));
    }

    #[test]
    fn test_empty_text_never_hits() {
        assert!(!text("").hit_test(Point::new(10.0, 50.0)));
    }
}
