//! Element-to-primitive mapping and the renderer trait.

use kurbo::{Affine, BezPath, Ellipse, Point, Rect, Shape, Size, Stroke, Vec2};
use peniko::Color;
use sketchcanvas_core::coords::{to_pixel_point, to_pixel_x, to_pixel_y};
use sketchcanvas_core::elements::{
    ElementId, ElementStyle, HexColor, LineStyle, Segment, SketchElement, StickerKind,
};
use sketchcanvas_core::store::ElementStore;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid viewport: {0}x{1}")]
    InvalidViewport(f64, f64),
    #[error("Failed to write output: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Flattening tolerance for curves, in pixels.
const PATH_TOLERANCE: f64 = 0.1;

/// Padding around the selection highlight, in pixels.
const HIGHLIGHT_PADDING: f64 = 4.0;

/// Arrowhead length relative to the scaled stroke width.
const ARROW_HEAD_FACTOR: f64 = 4.0;
const MIN_ARROW_HEAD: f64 = 6.0;

/// Per-element rendering parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderContext {
    pub pixel_width: f64,
    pub pixel_height: f64,
    pub is_selected: bool,
    pub text_bold: bool,
}

impl RenderContext {
    pub fn new(pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            pixel_width,
            pixel_height,
            is_selected: false,
            text_bold: false,
        }
    }

    pub fn with_selected(mut self, is_selected: bool) -> Self {
        self.is_selected = is_selected;
        self
    }

    pub fn with_text_bold(mut self, text_bold: bool) -> Self {
        self.text_bold = text_bold;
        self
    }

    /// Pixels per percentage unit for lengths that must not stretch
    /// (stroke widths, font sizes).
    pub fn length_scale(&self) -> f64 {
        self.pixel_width.min(self.pixel_height) / 100.0
    }

    fn point(&self, p: Point) -> Point {
        to_pixel_point(p, self.pixel_width, self.pixel_height)
    }
}

/// A vector drawing instruction in pixel space.
#[derive(Debug, Clone)]
pub enum Primitive {
    Path {
        path: BezPath,
        /// Stroke paint and geometry, if stroked.
        stroke: Option<(Color, Stroke)>,
        fill: Option<Color>,
    },
    Text {
        /// Baseline anchor.
        origin: Point,
        text: String,
        font_size: f64,
        font_family: String,
        bold: bool,
        color: Color,
    },
    Sticker {
        frame: Rect,
        /// Degrees, clockwise about the frame center.
        rotation: f64,
        kind: StickerKind,
        content: String,
        /// 0.0–1.0.
        opacity: f64,
    },
}

/// Rendered output for one element.
#[derive(Debug, Clone)]
pub struct Drawing {
    pub element_id: ElementId,
    pub primitives: Vec<Primitive>,
    /// Selection highlight box, drawn on top. Never affects `primitives`.
    pub highlight: Option<Rect>,
}

/// Convert an element color, folding `opacity` (0–100) into alpha.
pub fn paint(color: HexColor, opacity: f64) -> Color {
    let alpha = f64::from(color.a) * (opacity / 100.0).clamp(0.0, 1.0);
    Color::from_rgba8(color.r, color.g, color.b, alpha.round() as u8)
}

/// Stroke for a style at this context's scale, dashed per `line_style`.
pub fn scaled_stroke(style: &ElementStyle, line_style: LineStyle, ctx: &RenderContext) -> Stroke {
    let width = style.stroke_width * ctx.length_scale();
    let stroke = Stroke::new(width)
        .with_caps(kurbo::Cap::Round)
        .with_join(kurbo::Join::Round);
    match line_style {
        LineStyle::Solid => stroke,
        LineStyle::Dashed => stroke.with_dashes(0.0, [3.0 * width, 2.0 * width]),
        LineStyle::Dotted => stroke.with_dashes(0.0, [width, 2.0 * width]),
    }
}

fn polyline(points: impl IntoIterator<Item = Point>) -> BezPath {
    let mut path = BezPath::new();
    for (i, p) in points.into_iter().enumerate() {
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path
}

/// Mirror about `center` for the set flip flags.
fn flip_transform(center: Point, flip_x: bool, flip_y: bool) -> Affine {
    let sx = if flip_x { -1.0 } else { 1.0 };
    let sy = if flip_y { -1.0 } else { 1.0 };
    Affine::translate(center.to_vec2())
        * Affine::scale_non_uniform(sx, sy)
        * Affine::translate(-center.to_vec2())
}

/// Open arrowhead at `end`, pointing away from `start`.
fn arrow_head(start: Point, end: Point, size: f64) -> BezPath {
    let d = end - start;
    let len = d.hypot();
    let mut path = BezPath::new();
    if len < f64::EPSILON {
        return path;
    }
    let dir = d / len;
    let perp = Vec2::new(-dir.y, dir.x);
    let back = end - dir * size;
    path.move_to(back + perp * (size * 0.5));
    path.line_to(end);
    path.line_to(back - perp * (size * 0.5));
    path
}

fn render_segment(seg: &Segment, is_arrow: bool, ctx: &RenderContext) -> Vec<Primitive> {
    let start = ctx.point(seg.start());
    let end = ctx.point(seg.end());
    let color = paint(seg.style.color, seg.style.opacity);
    let stroke = scaled_stroke(&seg.style, seg.line_style, ctx);
    let mut primitives = vec![Primitive::Path {
        path: polyline([start, end]),
        stroke: Some((color, stroke.clone())),
        fill: None,
    }];
    if is_arrow {
        let head_size = (stroke.width * ARROW_HEAD_FACTOR).max(MIN_ARROW_HEAD);
        // The head keeps the shaft's width but never its dashes.
        let solid = scaled_stroke(&seg.style, LineStyle::Solid, ctx);
        primitives.push(Primitive::Path {
            path: arrow_head(start, end, head_size),
            stroke: Some((color, solid)),
            fill: None,
        });
    }
    primitives
}

/// Pixel-space bounds of a rendered element.
fn pixel_bounds(element: &SketchElement, ctx: &RenderContext) -> Rect {
    let b = element.bounds();
    Rect::from_points(
        ctx.point(Point::new(b.x0, b.y0)),
        ctx.point(Point::new(b.x1, b.y1)),
    )
}

/// Map one element to drawing primitives.
///
/// Returns `None` for images, which belong to the external placement layer,
/// and for degenerate elements. Selection only adds `highlight`.
pub fn render_element(element: &SketchElement, ctx: &RenderContext) -> Option<Drawing> {
    if element.is_image() || element.is_degenerate() {
        return None;
    }
    let primitives = match element {
        SketchElement::Freehand(stroke) => {
            let color = paint(stroke.style.color, stroke.style.opacity);
            vec![Primitive::Path {
                path: polyline(stroke.points.iter().map(|p| ctx.point(*p))),
                stroke: Some((color, scaled_stroke(&stroke.style, stroke.line_style, ctx))),
                fill: None,
            }]
        }
        SketchElement::Rectangle(rect) => {
            let r = rect.as_rect();
            let frame = Rect::from_points(
                ctx.point(Point::new(r.x0, r.y0)),
                ctx.point(Point::new(r.x1, r.y1)),
            );
            let mut path = frame.to_path(PATH_TOLERANCE);
            path.apply_affine(flip_transform(frame.center(), rect.flip_x, rect.flip_y));
            let color = paint(rect.style.color, rect.style.opacity);
            vec![Primitive::Path {
                path,
                stroke: Some((color, scaled_stroke(&rect.style, rect.line_style, ctx))),
                fill: rect.filled.then_some(color),
            }]
        }
        SketchElement::Circle(circle) => {
            let center = ctx.point(circle.center());
            let radii = Vec2::new(
                to_pixel_x(circle.rx, ctx.pixel_width),
                to_pixel_y(circle.ry, ctx.pixel_height),
            );
            let mut path = Ellipse::new(center, radii, 0.0).to_path(PATH_TOLERANCE);
            path.apply_affine(flip_transform(center, circle.flip_x, circle.flip_y));
            let color = paint(circle.style.color, circle.style.opacity);
            vec![Primitive::Path {
                path,
                stroke: Some((color, scaled_stroke(&circle.style, LineStyle::Solid, ctx))),
                fill: circle.filled.then_some(color),
            }]
        }
        SketchElement::Line(seg) => render_segment(seg, false, ctx),
        SketchElement::Arrow(seg) => render_segment(seg, true, ctx),
        SketchElement::Text(text) => vec![Primitive::Text {
            origin: ctx.point(Point::new(text.x, text.y)),
            text: text.text.clone(),
            font_size: text.font_size * ctx.length_scale(),
            font_family: text.font_family.clone(),
            bold: ctx.text_bold,
            color: paint(text.style.color, text.style.opacity),
        }],
        SketchElement::Sticker(sticker) => vec![Primitive::Sticker {
            frame: pixel_bounds(element, ctx),
            rotation: sticker.rotation,
            kind: sticker.sticker_type,
            content: sticker.content.clone(),
            opacity: (sticker.style.opacity / 100.0).clamp(0.0, 1.0),
        }],
        SketchElement::Image(_) => return None,
    };
    let highlight = ctx
        .is_selected
        .then(|| pixel_bounds(element, ctx).inflate(HIGHLIGHT_PADDING, HIGHLIGHT_PADDING));
    Some(Drawing {
        element_id: element.id(),
        primitives,
        highlight,
    })
}

/// Everything needed to draw one frame.
pub struct SceneContext<'a> {
    pub store: &'a ElementStore,
    /// The element being drawn, if any. Rendered last and never highlighted.
    pub temp: Option<&'a SketchElement>,
    /// Canvas size in pixels.
    pub viewport_size: Size,
    pub text_bold: bool,
    /// Clear color; `None` leaves the background transparent.
    pub background_color: Option<Color>,
}

impl<'a> SceneContext<'a> {
    pub fn new(store: &'a ElementStore, viewport_size: Size) -> Self {
        Self {
            store,
            temp: None,
            viewport_size,
            text_bold: false,
            background_color: None,
        }
    }

    pub fn with_temp(mut self, temp: Option<&'a SketchElement>) -> Self {
        self.temp = temp;
        self
    }

    pub fn with_text_bold(mut self, text_bold: bool) -> Self {
        self.text_bold = text_bold;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }

    fn element_context(&self, is_selected: bool) -> RenderContext {
        RenderContext::new(self.viewport_size.width, self.viewport_size.height)
            .with_selected(is_selected)
            .with_text_bold(self.text_bold)
    }

    /// Drawings for the committed non-image elements bottom to top, then the
    /// temp element.
    pub fn drawings(&self) -> Vec<Drawing> {
        let committed = self.store.non_image_elements().into_iter().filter_map(|e| {
            render_element(e, &self.element_context(self.store.is_selected(e.id())))
        });
        let temp = self
            .temp
            .and_then(|e| render_element(e, &self.element_context(false)));
        committed.chain(temp).collect()
    }

    pub fn validate(&self) -> RenderResult<()> {
        let Size { width, height } = self.viewport_size;
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(RendererError::InvalidViewport(width, height));
        }
        Ok(())
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Build the output for a frame, replacing any previous one.
    fn build_scene(&mut self, ctx: &SceneContext) -> RenderResult<()>;
}
