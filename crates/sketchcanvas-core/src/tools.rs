//! Tools and the active brush.

use crate::elements::{ElementStyle, HexColor, LineStyle};
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Select,
    Pen,
    Rectangle,
    Circle,
    Line,
    Arrow,
    Text,
    Eraser,
    Eyedropper,
}

impl Tool {
    /// Tools that build a temp element between pointer-down and pointer-up.
    pub fn is_shape_tool(self) -> bool {
        matches!(
            self,
            Tool::Pen | Tool::Rectangle | Tool::Circle | Tool::Line | Tool::Arrow
        )
    }
}

/// Settings applied to newly created elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Brush {
    /// Stroke color.
    pub color: HexColor,
    /// Secondary color, exchanged with `color` by [`Brush::swap_colors`].
    pub fill_color: HexColor,
    pub stroke_width: f64,
    /// 0–100.
    pub opacity: f64,
    pub line_style: LineStyle,
    /// Fill rectangles and circles.
    pub filled: bool,
    /// Pen stabilization strength, 0–100.
    pub stabilization: f64,
    pub font_size: f64,
    pub font_family: String,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: HexColor::black(),
            fill_color: HexColor::white(),
            stroke_width: 0.5,
            opacity: 100.0,
            line_style: LineStyle::Solid,
            filled: false,
            stabilization: 50.0,
            font_size: 4.0,
            font_family: "sans-serif".to_string(),
        }
    }
}

impl Brush {
    /// Exchange the stroke and fill colors.
    pub fn swap_colors(&mut self) {
        std::mem::swap(&mut self.color, &mut self.fill_color);
    }

    /// Element style seeded from the brush.
    pub fn element_style(&self) -> ElementStyle {
        ElementStyle {
            color: self.color,
            stroke_width: self.stroke_width,
            opacity: self.opacity.clamp(0.0, 100.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_colors() {
        let mut brush = Brush {
            color: HexColor::rgb(255, 0, 0),
            fill_color: HexColor::rgb(0, 0, 255),
            ..Brush::default()
        };
        brush.swap_colors();
        assert_eq!(brush.color, HexColor::rgb(0, 0, 255));
        assert_eq!(brush.fill_color, HexColor::rgb(255, 0, 0));
    }

    #[test]
    fn test_element_style_clamps_opacity() {
        let brush = Brush {
            opacity: 140.0,
            ..Brush::default()
        };
        assert!((brush.element_style().opacity - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shape_tools() {
        assert!(Tool::Pen.is_shape_tool());
        assert!(Tool::Arrow.is_shape_tool());
        assert!(!Tool::Text.is_shape_tool());
        assert!(!Tool::Eyedropper.is_shape_tool());
    }
}
