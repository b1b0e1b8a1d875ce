//! Pointer and keyboard state machine.
//!
//! [`InteractionController`] routes normalized pointer events by the active
//! [`Tool`] and owns the in-progress gesture: the temp element while
//! drawing, or the drag/resize bookkeeping for the selected element. It never
//! holds committed elements; every mutation goes through the [`ElementStore`]
//! passed to each handler.

use crate::config::CanvasConfig;
use crate::coords::NormalizedPoint;
use crate::elements::{
    Circle, ElementId, FlipAxis, Freehand, HexColor, Image, Rectangle, Segment, SketchElement,
    Sticker, StickerKind, Text,
};
use crate::hit_test::{ResizeHandle, hit_test_resize_handle};
use crate::input::KeyInput;
use crate::shortcuts::ShortcutAction;
use crate::snap::{constrain_square, snap_line_endpoint_in_canvas};
use crate::stabilizer::LineStabilizer;
use crate::store::{ElementStore, StoreSnapshot};
use crate::tools::{Brush, Tool};
use kurbo::{Point, Rect, Size};

/// Color picked by the eyedropper when nothing is under the pointer.
pub const EYEDROPPER_FALLBACK: HexColor = HexColor::white();

/// Something the host should react to.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    /// Show the text-entry overlay at this percentage-space point.
    OpenTextEntry(Point),
    /// The eyedropper set the brush color.
    ColorPicked(HexColor),
    Committed(ElementId),
    Selected(Option<ElementId>),
    Deleted(ElementId),
    Duplicated(ElementId),
    /// Geometry, ordering or brush state changed; redraw.
    Changed,
    /// The in-progress draw was discarded.
    Cancelled,
}

/// The single active gesture.
#[derive(Debug, Clone, Default)]
pub enum Mode {
    #[default]
    Idle,
    /// A temp element is being built.
    Drawing { start: Point, temp: SketchElement },
    /// The selected element follows the pointer.
    Dragging {
        id: ElementId,
        origin: Point,
        last: Point,
        before: StoreSnapshot,
    },
    /// A selected image is being resized from a corner.
    Resizing {
        id: ElementId,
        handle: ResizeHandle,
        origin: Point,
        last: Point,
        /// Bounds when the resize started.
        frame: Rect,
        /// Width / height to hold, if the image keeps its aspect ratio.
        aspect: Option<f64>,
        before: StoreSnapshot,
    },
}

impl Mode {
    pub fn is_idle(&self) -> bool {
        matches!(self, Mode::Idle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Idle => "idle",
            Mode::Drawing { .. } => "drawing",
            Mode::Dragging { .. } => "dragging",
            Mode::Resizing { .. } => "resizing",
        }
    }
}

/// Turns pointer and key input into element store mutations.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    tool: Tool,
    pub brush: Brush,
    pub config: CanvasConfig,
    mode: Mode,
    stabilizer: Option<LineStabilizer>,
}

impl InteractionController {
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch tools, discarding any in-progress draw.
    pub fn set_tool(&mut self, tool: Tool) {
        if self.tool == tool {
            return;
        }
        if matches!(self.mode, Mode::Drawing { .. }) {
            self.discard_drawing();
        }
        log::debug!("Tool changed: {:?} -> {:?}", self.tool, tool);
        self.tool = tool;
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// The uncommitted element being drawn, if any.
    pub fn temp_element(&self) -> Option<&SketchElement> {
        match &self.mode {
            Mode::Drawing { temp, .. } => Some(temp),
            _ => None,
        }
    }

    pub fn pointer_down(
        &mut self,
        store: &mut ElementStore,
        input: NormalizedPoint,
    ) -> Option<CanvasEvent> {
        if !self.mode.is_idle() {
            log::warn!("Pointer down during {}, ignoring", self.mode.name());
            return None;
        }
        let point = input.point;
        match self.tool {
            Tool::Select => self.begin_select(store, point),
            Tool::Eraser => {
                let id = store.topmost_at(point, self.config.hit_tolerance)?.id();
                store.delete_element(id)?;
                Some(CanvasEvent::Deleted(id))
            }
            Tool::Eyedropper => {
                let color = store
                    .topmost_at(point, self.config.hit_tolerance)
                    .map_or(EYEDROPPER_FALLBACK, |e| e.style().color);
                self.brush.color = color;
                log::debug!("Eyedropper picked {}", color);
                Some(CanvasEvent::ColorPicked(color))
            }
            Tool::Text => Some(CanvasEvent::OpenTextEntry(point)),
            Tool::Pen | Tool::Rectangle | Tool::Circle | Tool::Line | Tool::Arrow => {
                self.begin_drawing(store, point);
                Some(CanvasEvent::Changed)
            }
        }
    }

    fn begin_select(&mut self, store: &mut ElementStore, point: Point) -> Option<CanvasEvent> {
        if let Some(selected) = store.selected() {
            let handle = hit_test_resize_handle(point, selected, self.config.handle_radius);
            if let (Some(handle), Some(image)) = (handle, selected.as_image()) {
                let aspect = image
                    .maintain_aspect_ratio
                    .then(|| image.aspect_ratio());
                self.mode = Mode::Resizing {
                    id: image.id,
                    handle,
                    origin: point,
                    last: point,
                    frame: image.bounds(),
                    aspect,
                    before: store.snapshot(),
                };
                log::debug!("Resizing {} from {}", image.id, handle.name());
                return None;
            }
        }
        match store.topmost_at(point, self.config.hit_tolerance).map(|e| e.id()) {
            Some(id) => {
                store.select_element(Some(id));
                self.mode = Mode::Dragging {
                    id,
                    origin: point,
                    last: point,
                    before: store.snapshot(),
                };
                Some(CanvasEvent::Selected(Some(id)))
            }
            None => {
                store.select_element(None);
                Some(CanvasEvent::Selected(None))
            }
        }
    }

    fn begin_drawing(&mut self, store: &ElementStore, start: Point) {
        let style = self.brush.element_style();
        let z = store.next_z_index();
        let temp = match self.tool {
            Tool::Pen => {
                let mut stroke = Freehand::new(style, z, start);
                stroke.line_style = self.brush.line_style;
                if self.config.stabilize {
                    let mut stabilizer = LineStabilizer::new(self.brush.stabilization);
                    stabilizer.start_stroke(start);
                    self.stabilizer = Some(stabilizer);
                } else {
                    self.stabilizer = None;
                }
                SketchElement::Freehand(stroke)
            }
            Tool::Rectangle => {
                let mut rect = Rectangle::new(style, z, start, 0.0, 0.0);
                rect.filled = self.brush.filled;
                rect.line_style = self.brush.line_style;
                SketchElement::Rectangle(rect)
            }
            Tool::Circle => {
                let mut circle = Circle::new(style, z, start, 0.0, 0.0);
                circle.filled = self.brush.filled;
                SketchElement::Circle(circle)
            }
            Tool::Arrow => {
                let mut seg = Segment::new(style, z, start, start);
                seg.line_style = self.brush.line_style;
                SketchElement::Arrow(seg)
            }
            _ => {
                let mut seg = Segment::new(style, z, start, start);
                seg.line_style = self.brush.line_style;
                SketchElement::Line(seg)
            }
        };
        log::debug!("Drawing {} from ({:.2}, {:.2})", temp.type_name(), start.x, start.y);
        self.mode = Mode::Drawing { start, temp };
    }

    pub fn pointer_move(
        &mut self,
        store: &mut ElementStore,
        input: NormalizedPoint,
    ) -> Option<CanvasEvent> {
        let point = input.point;
        match &mut self.mode {
            Mode::Idle => None,
            Mode::Drawing { start, temp } => {
                let start = *start;
                match temp {
                    SketchElement::Freehand(stroke) => {
                        let accepted = match &mut self.stabilizer {
                            Some(stabilizer) => stabilizer.add_point(point),
                            None => {
                                let far_enough = stroke.points.last().is_none_or(|last| {
                                    (point - *last).hypot() >= self.config.raw_min_distance
                                });
                                far_enough.then_some(point)
                            }
                        };
                        let p = accepted?;
                        log::trace!("Stroke point ({:.2}, {:.2})", p.x, p.y);
                        stroke.add_point(p);
                    }
                    SketchElement::Rectangle(rect) => {
                        let corner = if input.shift_key {
                            constrain_square(start, point)
                        } else {
                            point
                        };
                        rect.set_corners(start, corner);
                    }
                    SketchElement::Circle(circle) => {
                        let corner = if input.shift_key {
                            constrain_square(start, point)
                        } else {
                            point
                        };
                        circle.set_corners(start, corner);
                    }
                    SketchElement::Line(seg) | SketchElement::Arrow(seg) => {
                        let end = if input.shift_key {
                            snap_line_endpoint_in_canvas(start, point)
                        } else {
                            point
                        };
                        seg.set_end(end);
                    }
                    SketchElement::Text(_) | SketchElement::Sticker(_) | SketchElement::Image(_) => {
                        return None;
                    }
                }
                Some(CanvasEvent::Changed)
            }
            Mode::Dragging { id, last, .. } => {
                let delta = point - *last;
                *last = point;
                store.translate_element(*id, delta).then_some(CanvasEvent::Changed)
            }
            Mode::Resizing {
                id,
                handle,
                origin,
                last,
                frame,
                aspect,
                ..
            } => {
                *last = point;
                let (center, size) =
                    resize_frame(*frame, *handle, point - *origin, *aspect, self.config.min_resize);
                log::trace!("Resize {} to {:.2}x{:.2}", id, size.width, size.height);
                store.resize_element(*id, center, size).then_some(CanvasEvent::Changed)
            }
        }
    }

    pub fn pointer_up(&mut self, store: &mut ElementStore) -> Option<CanvasEvent> {
        match std::mem::take(&mut self.mode) {
            Mode::Idle => None,
            Mode::Drawing { temp, .. } => self.finish_drawing(store, temp),
            Mode::Dragging {
                origin,
                last,
                before,
                ..
            }
            | Mode::Resizing {
                origin,
                last,
                before,
                ..
            } => {
                if (last - origin).hypot() > self.config.move_epsilon {
                    store.record_undo(before);
                    Some(CanvasEvent::Changed)
                } else {
                    None
                }
            }
        }
    }

    fn finish_drawing(
        &mut self,
        store: &mut ElementStore,
        mut temp: SketchElement,
    ) -> Option<CanvasEvent> {
        if let SketchElement::Freehand(stroke) = &mut temp {
            if let Some(mut stabilizer) = self.stabilizer.take() {
                stroke.points = stabilizer.end_stroke().to_vec();
            }
        } else if temp.is_degenerate() {
            log::warn!("Discarding empty {}", temp.type_name());
            return Some(CanvasEvent::Cancelled);
        }
        Some(CanvasEvent::Committed(store.commit(temp)))
    }

    fn discard_drawing(&mut self) {
        self.mode = Mode::Idle;
        self.stabilizer = None;
    }

    /// Escape: discard an in-progress draw, otherwise clear the selection.
    pub fn cancel(&mut self, store: &mut ElementStore) -> Option<CanvasEvent> {
        if matches!(self.mode, Mode::Drawing { .. }) {
            self.discard_drawing();
            log::debug!("Drawing cancelled");
            return Some(CanvasEvent::Cancelled);
        }
        // Ends a drag or resize in place.
        self.pointer_up(store);
        store.select_element(None);
        Some(CanvasEvent::Selected(None))
    }

    pub fn key_down(&mut self, store: &mut ElementStore, input: KeyInput) -> Option<CanvasEvent> {
        let action = ShortcutAction::from_key(&input)?;
        if action == ShortcutAction::Cancel {
            return self.cancel(store);
        }
        if !self.mode.is_idle() {
            log::warn!("Ignoring {:?} during {}", action, self.mode.name());
            return None;
        }
        match action {
            ShortcutAction::DeleteSelection => self.delete_selection(store),
            ShortcutAction::SwapColors => {
                self.brush.swap_colors();
                Some(CanvasEvent::Changed)
            }
            ShortcutAction::DuplicateSelection => self.duplicate_selection(store),
            ShortcutAction::BringForward => {
                let id = store.selected_id()?;
                store.bring_forward(id).then_some(CanvasEvent::Changed)
            }
            ShortcutAction::SendBackward => {
                let id = store.selected_id()?;
                store.send_backward(id).then_some(CanvasEvent::Changed)
            }
            ShortcutAction::Undo => store.undo().then_some(CanvasEvent::Changed),
            ShortcutAction::Redo => store.redo().then_some(CanvasEvent::Changed),
            ShortcutAction::Cancel => None,
        }
    }

    pub fn delete_selection(&mut self, store: &mut ElementStore) -> Option<CanvasEvent> {
        let id = store.selected_id()?;
        store.delete_element(id)?;
        Some(CanvasEvent::Deleted(id))
    }

    pub fn duplicate_selection(&mut self, store: &mut ElementStore) -> Option<CanvasEvent> {
        let id = store.selected_id()?;
        let copy = store.duplicate_element(id, self.config.duplicate_offset)?;
        Some(CanvasEvent::Duplicated(copy))
    }

    pub fn flip_selection(
        &mut self,
        store: &mut ElementStore,
        axis: FlipAxis,
    ) -> Option<CanvasEvent> {
        let id = store.selected_id()?;
        store.flip_element(id, axis).then_some(CanvasEvent::Changed)
    }

    /// Create a text element from the overlay's submitted string.
    /// Blank strings create nothing.
    pub fn submit_text(
        &mut self,
        store: &mut ElementStore,
        anchor: Point,
        text: &str,
    ) -> Option<CanvasEvent> {
        if text.trim().is_empty() {
            return None;
        }
        let element = Text::new(
            self.brush.element_style(),
            store.next_z_index(),
            anchor,
            text.to_string(),
            self.brush.font_size,
            self.brush.font_family.clone(),
        );
        Some(CanvasEvent::Committed(store.commit(SketchElement::Text(element))))
    }

    /// Place a square sticker of the configured size centered on `center`.
    pub fn place_sticker(
        &mut self,
        store: &mut ElementStore,
        center: Point,
        kind: StickerKind,
        content: String,
    ) -> Option<CanvasEvent> {
        let side = self.config.sticker_size;
        let sticker = Sticker::new(
            self.brush.element_style(),
            store.next_z_index(),
            center,
            Size::new(side, side),
            kind,
            content,
        );
        Some(CanvasEvent::Committed(store.commit(SketchElement::Sticker(sticker))))
    }

    /// Place an image for the external placement layer.
    pub fn place_image(
        &mut self,
        store: &mut ElementStore,
        center: Point,
        size: Size,
        src: String,
    ) -> Option<CanvasEvent> {
        if size.width <= 0.0 || size.height <= 0.0 {
            log::warn!("Refusing to place image {} with empty size", src);
            return None;
        }
        let image = Image::new(
            self.brush.element_style(),
            store.next_z_index(),
            center,
            size,
            src,
        );
        Some(CanvasEvent::Committed(store.commit(SketchElement::Image(image))))
    }
}

/// New center and size for a corner resize.
///
/// `delta` is the total pointer movement since the resize started. The
/// corner opposite `handle` stays fixed. Neither side drops below `min_size`;
/// with `aspect`, the axis with the larger movement drives the other and the
/// ratio survives the floor.
pub fn resize_frame(
    frame: Rect,
    handle: ResizeHandle,
    delta: kurbo::Vec2,
    aspect: Option<f64>,
    min_size: f64,
) -> (Point, Size) {
    let dx = if handle.moves_east() { delta.x } else { -delta.x };
    let dy = if handle.moves_south() { delta.y } else { -delta.y };
    let mut width = (frame.width() + dx).max(min_size);
    let mut height = (frame.height() + dy).max(min_size);

    if let Some(ratio) = aspect.filter(|r| r.is_finite() && *r > 0.0) {
        if dx.abs() >= dy.abs() {
            height = width / ratio;
        } else {
            width = height * ratio;
        }
        if width < min_size || height < min_size {
            width = width.max(min_size).max(min_size * ratio);
            height = width / ratio;
        }
    }

    let x0 = if handle.moves_east() {
        frame.x0
    } else {
        frame.x1 - width
    };
    let y0 = if handle.moves_south() {
        frame.y0
    } else {
        frame.y1 - height
    };
    (
        Point::new(x0 + width / 2.0, y0 + height / 2.0),
        Size::new(width, height),
    )
}
