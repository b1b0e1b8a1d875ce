//! Sticker element.

use super::{ElementId, ElementStyle};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a sticker's `content` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StickerKind {
    /// A single emoji grapheme.
    #[default]
    Emoji,
    /// Inline SVG markup.
    Svg,
    /// An image URL.
    Image,
}

/// A sticker centered on `(x, y)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sticker {
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
    pub sticker_type: StickerKind,
    pub content: String,
}

impl Sticker {
    pub fn new(
        style: ElementStyle,
        z_index: i64,
        center: Point,
        size: Size,
        sticker_type: StickerKind,
        content: String,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            z_index,
            style,
            x: center.x,
            y: center.y,
            width: size.width,
            height: size.height,
            rotation: 0.0,
            sticker_type,
            content,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center(), Size::new(self.width, self.height))
    }

    /// Rotation is ignored; the unrotated box is tested.
    pub fn hit_test(&self, point: Point) -> bool {
        if self.width <= 0.0 || self.height <= 0.0 {
            return false;
        }
        (point.x - self.x).abs() <= self.width / 2.0 && (point.y - self.y).abs() <= self.height / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_hit_box() {
        let sticker = Sticker::new(
            ElementStyle::default(),
            1,
            Point::new(50.0, 50.0),
            Size::new(10.0, 6.0),
            StickerKind::Emoji,
            "🎉".to_string(),
        );
        assert!(sticker.hit_test(Point::new(55.0, 53.0)));
        assert!(!sticker.hit_test(Point::new(56.0, 50.0)));
        assert!(!sticker.hit_test(Point::new(50.0, 54.0)));
        assert_eq!(sticker.bounds(), Rect::new(45.0, 47.0, 55.0, 53.0));
    }

    #[test]
    fn test_sticker_type_serializes_lowercase() {
        let json = serde_json::to_string(&StickerKind::Svg).unwrap();
        assert_eq!(json, "\"svg\"");
    }
}
