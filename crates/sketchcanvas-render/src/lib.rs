//! SketchCanvas Render Library
//!
//! Maps sketch elements to pixel-space vector primitives, plus an SVG backend.
//! Image elements are left to the host's placement layer.

mod renderer;
pub mod svg;

pub use renderer::{
    Drawing, Primitive, RenderContext, RenderResult, Renderer, RendererError, SceneContext, paint,
    render_element, scaled_stroke,
};
pub use svg::SvgRenderer;
