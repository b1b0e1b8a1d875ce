//! SVG generation

use crate::renderer::{Drawing, Primitive, RenderResult, Renderer, SceneContext};
use kurbo::{Rect, Stroke};
use peniko::Color;
use sketchcanvas_core::elements::StickerKind;
use std::fmt::Write;

/// Outline color for selected elements.
const HIGHLIGHT_COLOR: &str = "#3B82F6";

/// `#RRGGBB` plus an opacity in 0.0–1.0.
fn svg_color(color: Color) -> (String, f64) {
    let rgba = color.to_rgba8();
    (
        format!("#{:02X}{:02X}{:02X}", rgba.r, rgba.g, rgba.b),
        f64::from(rgba.a) / 255.0,
    )
}

/// Escape text for use in element content and attribute values.
fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn stroke_attrs(out: &mut String, color: Color, stroke: &Stroke) -> std::fmt::Result {
    let (hex, opacity) = svg_color(color);
    write!(
        out,
        r#" stroke="{hex}" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round""#,
        stroke.width
    )?;
    if opacity < 1.0 {
        write!(out, r#" stroke-opacity="{opacity:.3}""#)?;
    }
    if !stroke.dash_pattern.is_empty() {
        let dashes: Vec<String> = stroke.dash_pattern.iter().map(|d| d.to_string()).collect();
        write!(out, r#" stroke-dasharray="{}""#, dashes.join(" "))?;
    }
    Ok(())
}

fn write_primitive(out: &mut String, primitive: &Primitive) -> std::fmt::Result {
    match primitive {
        Primitive::Path { path, stroke, fill } => {
            write!(out, r#"<path d="{}""#, path.to_svg())?;
            match fill {
                Some(color) => {
                    let (hex, opacity) = svg_color(*color);
                    write!(out, r#" fill="{hex}""#)?;
                    if opacity < 1.0 {
                        write!(out, r#" fill-opacity="{opacity:.3}""#)?;
                    }
                }
                None => out.push_str(r#" fill="none""#),
            }
            if let Some((color, stroke)) = stroke {
                stroke_attrs(out, *color, stroke)?;
            }
            out.push_str("/>");
        }
        Primitive::Text {
            origin,
            text,
            font_size,
            font_family,
            bold,
            color,
        } => {
            let (hex, opacity) = svg_color(*color);
            write!(
                out,
                r#"<text x="{}" y="{}" font-size="{}" font-family="{}" fill="{hex}""#,
                origin.x,
                origin.y,
                font_size,
                escape_xml(font_family)
            )?;
            if *bold {
                out.push_str(r#" font-weight="bold""#);
            }
            if opacity < 1.0 {
                write!(out, r#" fill-opacity="{opacity:.3}""#)?;
            }
            write!(out, ">{}</text>", escape_xml(text))?;
        }
        Primitive::Sticker {
            frame,
            rotation,
            kind,
            content,
            opacity,
        } => {
            let center = frame.center();
            write!(
                out,
                r#"<g transform="rotate({rotation} {} {})" opacity="{opacity:.3}">"#,
                center.x, center.y
            )?;
            match kind {
                StickerKind::Emoji => write!(
                    out,
                    r#"<text x="{}" y="{}" font-size="{}" text-anchor="middle" dominant-baseline="central">{}</text>"#,
                    center.x,
                    center.y,
                    frame.height(),
                    escape_xml(content)
                )?,
                StickerKind::Svg | StickerKind::Image => write!(
                    out,
                    r#"<image href="{}" x="{}" y="{}" width="{}" height="{}"/>"#,
                    escape_xml(content),
                    frame.x0,
                    frame.y0,
                    frame.width(),
                    frame.height()
                )?,
            }
            out.push_str("</g>");
        }
    }
    Ok(())
}

fn write_highlight(out: &mut String, rect: Rect) -> std::fmt::Result {
    write!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{HIGHLIGHT_COLOR}" stroke-width="1.5" stroke-dasharray="4 4"/>"#,
        rect.x0,
        rect.y0,
        rect.width(),
        rect.height()
    )
}

fn write_drawing(out: &mut String, drawing: &Drawing) -> std::fmt::Result {
    write!(out, r#"<g data-element-id="{}">"#, drawing.element_id)?;
    for primitive in &drawing.primitives {
        write_primitive(out, primitive)?;
    }
    if let Some(rect) = drawing.highlight {
        write_highlight(out, rect)?;
    }
    out.push_str("</g>\n");
    Ok(())
}

/// Renders a scene to an SVG document string.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    document: String,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last built document.
    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn take_document(&mut self) -> String {
        std::mem::take(&mut self.document)
    }
}

impl Renderer for SvgRenderer {
    fn build_scene(&mut self, ctx: &SceneContext) -> RenderResult<()> {
        ctx.validate()?;
        let width = ctx.viewport_size.width;
        let height = ctx.viewport_size.height;
        let drawings = ctx.drawings();

        let mut out = String::new();
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        )?;
        if let Some(background) = ctx.background_color {
            let (hex, _) = svg_color(background);
            writeln!(out, r#"<rect width="100%" height="100%" fill="{hex}"/>"#)?;
        }
        for drawing in &drawings {
            write_drawing(&mut out, drawing)?;
        }
        out.push_str("</svg>\n");

        log::debug!("Built SVG scene with {} drawings", drawings.len());
        self.document = out;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Size};
    use sketchcanvas_core::elements::{
        ElementStyle, HexColor, LineStyle, Rectangle, Segment, SketchElement, Text,
    };
    use sketchcanvas_core::store::ElementStore;

    fn render(store: &ElementStore) -> String {
        let mut renderer = SvgRenderer::new();
        renderer
            .build_scene(&SceneContext::new(store, Size::new(800.0, 600.0)))
            .unwrap();
        renderer.take_document()
    }

    #[test]
    fn test_empty_scene() {
        let svg = render(&ElementStore::new());
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 800 600""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_dashed_arrow_output() {
        let mut store = ElementStore::new();
        let mut seg = Segment::new(
            ElementStyle::default(),
            1,
            Point::new(10.0, 10.0),
            Point::new(50.0, 10.0),
        );
        seg.line_style = LineStyle::Dashed;
        store.commit(SketchElement::Arrow(seg));
        let svg = render(&store);
        assert_eq!(svg.matches("<path").count(), 2);
        assert_eq!(svg.matches("stroke-dasharray").count(), 1);
        assert!(svg.contains(r#"stroke-dasharray="9 6""#));
    }

    #[test]
    fn test_filled_translucent_rect() {
        let mut store = ElementStore::new();
        let mut style = ElementStyle::default();
        style.color = HexColor::rgb(0xFF, 0x00, 0x00);
        style.opacity = 50.0;
        let mut rect = Rectangle::new(style, 1, Point::new(0.0, 0.0), 10.0, 10.0);
        rect.filled = true;
        store.commit(SketchElement::Rectangle(rect));
        let svg = render(&store);
        assert!(svg.contains(r##"fill="#FF0000""##));
        assert!(svg.contains("fill-opacity"));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut store = ElementStore::new();
        store.commit(SketchElement::Text(Text::new(
            ElementStyle::default(),
            1,
            Point::new(10.0, 10.0),
            "a < b & c".to_string(),
            4.0,
            "sans-serif".to_string(),
        )));
        let svg = render(&store);
        assert!(svg.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn test_selected_element_gets_highlight() {
        let mut store = ElementStore::new();
        let id = store.commit(SketchElement::Rectangle(Rectangle::new(
            ElementStyle::default(),
            1,
            Point::new(10.0, 10.0),
            10.0,
            10.0,
        )));
        assert!(!render(&store).contains(HIGHLIGHT_COLOR));
        store.select_element(Some(id));
        assert!(render(&store).contains(HIGHLIGHT_COLOR));
    }

    #[test]
    fn test_invalid_viewport_is_an_error() {
        let store = ElementStore::new();
        let mut renderer = SvgRenderer::new();
        assert!(
            renderer
                .build_scene(&SceneContext::new(&store, Size::new(-1.0, 10.0)))
                .is_err()
        );
    }
}
