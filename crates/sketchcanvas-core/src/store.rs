//! The element store: committed elements, selection and undo history.
//!
//! Operations on ids that are not in the store are no-ops.

use crate::elements::{ElementId, FlipAxis, SketchElement};
use crate::hit_test::topmost_hit;
use kurbo::{Point, Size, Vec2};
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

/// Maximum number of undo states to keep.
const MAX_UNDO_HISTORY: usize = 50;

/// Store import/export errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A snapshot of the element list for undo/redo.
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    elements: Vec<SketchElement>,
}

/// Owns the committed elements and the current selection.
#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    /// Elements in insertion order.
    elements: Vec<SketchElement>,
    selected: Option<ElementId>,
    undo_stack: Vec<StoreSnapshot>,
    redo_stack: Vec<StoreSnapshot>,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already-committed elements (e.g. loaded from disk).
    /// Missing and repeated ids are replaced with fresh ones.
    pub fn from_elements(elements: Vec<SketchElement>) -> Self {
        let mut store = Self::new();
        let mut seen = HashSet::with_capacity(elements.len());
        for mut element in elements {
            if !element.is_committed() || !seen.insert(element.id()) {
                let id = Uuid::new_v4();
                log::warn!("Reassigned id of loaded {} to {}", element.type_name(), id);
                element.set_id(id);
                seen.insert(id);
            }
            store.elements.push(element);
        }
        store
    }

    /// Elements in insertion order.
    pub fn elements(&self) -> &[SketchElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&SketchElement> {
        self.elements.iter().find(|e| e.id() == id)
    }

    fn position(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id() == id)
    }

    /// `max(zIndex) + 1`, or 1 for an empty store.
    pub fn next_z_index(&self) -> i64 {
        self.elements
            .iter()
            .map(SketchElement::z_index)
            .max()
            .map_or(1, |z| z + 1)
    }

    /// Indices into `elements`, bottom to top. Ties keep insertion order.
    fn render_indices(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.elements.len()).collect();
        order.sort_by_key(|&i| self.elements[i].z_index());
        order
    }

    /// Elements bottom to top.
    pub fn render_order(&self) -> Vec<&SketchElement> {
        self.render_indices()
            .into_iter()
            .map(|i| &self.elements[i])
            .collect()
    }

    /// Elements this canvas draws itself, bottom to top.
    pub fn non_image_elements(&self) -> Vec<&SketchElement> {
        self.render_order()
            .into_iter()
            .filter(|e| !e.is_image())
            .collect()
    }

    /// Image elements, bottom to top, for the external placement layer.
    pub fn image_elements(&self) -> Vec<&SketchElement> {
        self.render_order()
            .into_iter()
            .filter(|e| e.is_image())
            .collect()
    }

    /// The topmost committed element at `point`.
    pub fn topmost_at(&self, point: Point, tolerance: f64) -> Option<&SketchElement> {
        topmost_hit(&self.elements, point, tolerance)
    }

    /// Commit an element, assigning a fresh id if it has none.
    pub fn commit(&mut self, mut element: SketchElement) -> ElementId {
        if !element.is_committed() {
            element.set_id(Uuid::new_v4());
        }
        let id = element.id();
        self.push_undo();
        log::debug!(
            "Committed {} {} at z {}",
            element.type_name(),
            id,
            element.z_index()
        );
        self.elements.push(element);
        id
    }

    /// Remove an element, clearing the selection if it was selected.
    pub fn delete_element(&mut self, id: ElementId) -> Option<SketchElement> {
        let index = self.position(id)?;
        self.push_undo();
        if self.selected == Some(id) {
            self.selected = None;
        }
        log::debug!("Deleted element {}", id);
        Some(self.elements.remove(index))
    }

    /// Clone an element with a new id, offset by `offset` on both axes and
    /// placed on top. The copy becomes the selection.
    pub fn duplicate_element(&mut self, id: ElementId, offset: f64) -> Option<ElementId> {
        let mut copy = self.get(id)?.clone();
        copy.set_id(Uuid::new_v4());
        copy.translate(Vec2::new(offset, offset));
        copy.set_z_index(self.next_z_index());
        let new_id = self.commit(copy);
        self.selected = Some(new_id);
        Some(new_id)
    }

    pub fn selected_id(&self) -> Option<ElementId> {
        self.selected
    }

    pub fn selected(&self) -> Option<&SketchElement> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selected == Some(id)
    }

    /// Select an element, or clear the selection with `None`.
    /// Returns false (and changes nothing) for an unknown id.
    pub fn select_element(&mut self, id: Option<ElementId>) -> bool {
        match id {
            Some(id) if self.get(id).is_none() => false,
            _ => {
                self.selected = id;
                true
            }
        }
    }

    /// Move an element by `delta`. Not recorded for undo; see [`Self::record_undo`].
    pub fn translate_element(&mut self, id: ElementId, delta: Vec2) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.elements[index].translate(delta);
        true
    }

    /// Set the frame of a center-anchored element (image or sticker).
    /// Not recorded for undo; see [`Self::record_undo`].
    pub fn resize_element(&mut self, id: ElementId, center: Point, size: Size) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        match &mut self.elements[index] {
            SketchElement::Image(img) => {
                img.x = center.x;
                img.y = center.y;
                img.width = size.width;
                img.height = size.height;
                true
            }
            SketchElement::Sticker(sticker) => {
                sticker.x = center.x;
                sticker.y = center.y;
                sticker.width = size.width;
                sticker.height = size.height;
                true
            }
            _ => false,
        }
    }

    /// Flip an element horizontally or vertically.
    pub fn flip_element(&mut self, id: ElementId, axis: FlipAxis) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let before = self.snapshot();
        if self.elements[index].flip(axis) {
            self.record_undo(before);
            true
        } else {
            false
        }
    }

    /// Move an element one position toward the top of the render order.
    pub fn bring_forward(&mut self, id: ElementId) -> bool {
        self.reorder(id, true)
    }

    /// Move an element one position toward the bottom of the render order.
    pub fn send_backward(&mut self, id: ElementId) -> bool {
        self.reorder(id, false)
    }

    /// Swap with the neighbour in render order, then renumber zIndex to 1..n.
    fn reorder(&mut self, id: ElementId, forward: bool) -> bool {
        let mut order = self.render_indices();
        let Some(pos) = order.iter().position(|&i| self.elements[i].id() == id) else {
            return false;
        };
        let target = if forward {
            pos + 1
        } else {
            match pos.checked_sub(1) {
                Some(t) => t,
                None => return false,
            }
        };
        if target >= order.len() {
            return false;
        }
        self.push_undo();
        order.swap(pos, target);
        for (rank, &i) in order.iter().enumerate() {
            self.elements[i].set_z_index(rank as i64 + 1);
        }
        true
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        if self.elements.is_empty() {
            return;
        }
        self.push_undo();
        self.elements.clear();
        self.selected = None;
    }

    /// Capture the element list, to be recorded later with [`Self::record_undo`].
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            elements: self.elements.clone(),
        }
    }

    /// Push a previously taken snapshot as one undoable step.
    pub fn record_undo(&mut self, snapshot: StoreSnapshot) {
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Push the current state to the undo stack (call before making changes).
    fn push_undo(&mut self) {
        let snapshot = self.snapshot();
        self.record_undo(snapshot);
    }

    fn restore(&mut self, snapshot: StoreSnapshot) {
        self.elements = snapshot.elements;
        if let Some(id) = self.selected {
            if self.get(id).is_none() {
                self.selected = None;
            }
        }
    }

    /// Undo the last change. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo_stack.pop() else {
            return false;
        };
        let current = self.snapshot();
        self.redo_stack.push(current);
        self.restore(snapshot);
        true
    }

    /// Redo the last undone change. Returns false if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        let current = self.snapshot();
        self.undo_stack.push(current);
        self.restore(snapshot);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Serialize the element list as a JSON array of typed records.
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(&self.elements)?)
    }

    /// Load a store from a JSON array of typed records.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let elements: Vec<SketchElement> = serde_json::from_str(json)?;
        Ok(Self::from_elements(elements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ElementStyle, Freehand, Image, Rectangle, Segment};

    fn rect_at(z: i64, origin: Point) -> SketchElement {
        SketchElement::Rectangle(Rectangle::new(ElementStyle::default(), z, origin, 10.0, 10.0))
    }

    fn store_with(n: usize) -> (ElementStore, Vec<ElementId>) {
        let mut store = ElementStore::new();
        let ids = (0..n)
            .map(|i| {
                let z = store.next_z_index();
                store.commit(rect_at(z, Point::new(i as f64 * 5.0, 0.0)))
            })
            .collect();
        (store, ids)
    }

    fn render_ids(store: &ElementStore) -> Vec<ElementId> {
        store.render_order().iter().map(|e| e.id()).collect()
    }

    #[test]
    fn test_next_z_index() {
        let mut store = ElementStore::new();
        assert_eq!(store.next_z_index(), 1);
        store.commit(rect_at(7, Point::ZERO));
        store.commit(rect_at(3, Point::ZERO));
        assert_eq!(store.next_z_index(), 8);
    }

    #[test]
    fn test_commit_assigns_id() {
        let mut store = ElementStore::new();
        let id = store.commit(rect_at(1, Point::ZERO));
        assert!(!id.is_nil());
        assert_eq!(store.get(id).unwrap().id(), id);
    }

    #[test]
    fn test_delete_clears_selection() {
        let (mut store, ids) = store_with(2);
        assert!(store.select_element(Some(ids[0])));
        assert!(store.delete_element(ids[0]).is_some());
        assert_eq!(store.selected_id(), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let (mut store, ids) = store_with(1);
        store.delete_element(ids[0]);
        let undo_depth = store.undo_stack.len();
        assert!(store.delete_element(ids[0]).is_none());
        assert_eq!(store.undo_stack.len(), undo_depth);
    }

    #[test]
    fn test_select_unknown_id_is_noop() {
        let (mut store, ids) = store_with(1);
        store.select_element(Some(ids[0]));
        assert!(!store.select_element(Some(Uuid::new_v4())));
        assert_eq!(store.selected_id(), Some(ids[0]));
        assert!(store.select_element(None));
        assert_eq!(store.selected_id(), None);
    }

    #[test]
    fn test_duplicate() {
        let (mut store, ids) = store_with(2);
        let copy = store.duplicate_element(ids[0], 2.0).unwrap();
        assert_ne!(copy, ids[0]);
        assert_eq!(store.selected_id(), Some(copy));
        let copied = store.get(copy).unwrap();
        assert_eq!(copied.z_index(), 3);
        assert!((copied.bounds().x0 - 2.0).abs() < f64::EPSILON);
        assert!((copied.bounds().y0 - 2.0).abs() < f64::EPSILON);
        assert_eq!(*render_ids(&store).last().unwrap(), copy);
    }

    #[test]
    fn test_bring_forward_moves_one_position() {
        let (mut store, ids) = store_with(3);
        assert!(store.bring_forward(ids[0]));
        assert_eq!(render_ids(&store), vec![ids[1], ids[0], ids[2]]);
        assert!(store.bring_forward(ids[0]));
        assert_eq!(render_ids(&store), vec![ids[1], ids[2], ids[0]]);
        assert!(!store.bring_forward(ids[0]));
    }

    #[test]
    fn test_send_backward_moves_one_position() {
        let (mut store, ids) = store_with(3);
        assert!(store.send_backward(ids[2]));
        assert_eq!(render_ids(&store), vec![ids[0], ids[2], ids[1]]);
        assert!(!store.send_backward(ids[0]));
    }

    #[test]
    fn test_reorder_with_duplicate_z_values() {
        let mut store = ElementStore::new();
        let a = store.commit(rect_at(5, Point::ZERO));
        let b = store.commit(rect_at(5, Point::ZERO));
        let c = store.commit(rect_at(5, Point::ZERO));
        assert!(store.bring_forward(a));
        assert_eq!(render_ids(&store), vec![b, a, c]);
    }

    #[test]
    fn test_image_partition() {
        let mut store = ElementStore::new();
        store.commit(rect_at(1, Point::ZERO));
        store.commit(SketchElement::Image(Image::new(
            ElementStyle::default(),
            2,
            Point::new(50.0, 50.0),
            Size::new(10.0, 10.0),
            "a.png".to_string(),
        )));
        assert_eq!(store.non_image_elements().len(), 1);
        assert_eq!(store.image_elements().len(), 1);
        assert!(store.image_elements()[0].is_image());
    }

    #[test]
    fn test_resize_only_center_anchored() {
        let (mut store, ids) = store_with(1);
        assert!(!store.resize_element(ids[0], Point::new(5.0, 5.0), Size::new(1.0, 1.0)));
    }

    #[test]
    fn test_undo_redo_commit() {
        let mut store = ElementStore::new();
        store.commit(rect_at(1, Point::ZERO));
        assert!(store.can_undo());
        assert!(store.undo());
        assert!(store.is_empty());
        assert!(store.redo());
        assert_eq!(store.len(), 1);
        assert!(!store.redo());
    }

    #[test]
    fn test_new_change_clears_redo() {
        let mut store = ElementStore::new();
        store.commit(rect_at(1, Point::ZERO));
        store.undo();
        assert!(store.can_redo());
        store.commit(rect_at(1, Point::ZERO));
        assert!(!store.can_redo());
    }

    #[test]
    fn test_undo_history_is_bounded() {
        let mut store = ElementStore::new();
        for _ in 0..(MAX_UNDO_HISTORY + 10) {
            store.commit(rect_at(1, Point::ZERO));
        }
        assert_eq!(store.undo_stack.len(), MAX_UNDO_HISTORY);
    }

    #[test]
    fn test_undo_drops_stale_selection() {
        let mut store = ElementStore::new();
        let id = store.commit(rect_at(1, Point::ZERO));
        store.select_element(Some(id));
        store.undo();
        assert_eq!(store.selected_id(), None);
    }

    #[test]
    fn test_flip_records_undo() {
        let mut store = ElementStore::new();
        let id = store.commit(SketchElement::Line(Segment::new(
            ElementStyle::default(),
            1,
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        )));
        assert!(store.flip_element(id, FlipAxis::Horizontal));
        match store.get(id).unwrap() {
            SketchElement::Line(seg) => assert_eq!(seg.start(), Point::new(10.0, 0.0)),
            other => panic!("Expected line, got {}", other.type_name()),
        }
        store.undo();
        match store.get(id).unwrap() {
            SketchElement::Line(seg) => assert_eq!(seg.start(), Point::new(0.0, 0.0)),
            other => panic!("Expected line, got {}", other.type_name()),
        }
    }

    #[test]
    fn test_json_round_trip_preserves_ids_and_order() {
        let mut store = ElementStore::new();
        let a = store.commit(rect_at(2, Point::new(1.0, 2.0)));
        let b = store.commit(SketchElement::Freehand(Freehand::from_points(
            ElementStyle::default(),
            1,
            vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0)],
        )));
        let json = store.to_json().unwrap();
        let loaded = ElementStore::from_json(&json).unwrap();
        assert_eq!(loaded.elements(), store.elements());
        assert_eq!(render_ids(&loaded), vec![b, a]);
        assert!(!loaded.can_undo());
    }

    #[test]
    fn test_load_reassigns_repeated_ids() {
        let id = Uuid::new_v4();
        let mut first = rect_at(1, Point::new(0.0, 0.0));
        let mut second = rect_at(2, Point::new(50.0, 50.0));
        first.set_id(id);
        second.set_id(id);
        let mut store = ElementStore::from_elements(vec![first, second]);
        assert_eq!(store.elements()[0].id(), id);
        let other = store.elements()[1].id();
        assert_ne!(other, id);
        assert!(!other.is_nil());
        assert!(store.delete_element(other).is_some());
        assert_eq!(store.len(), 1);
        assert!(store.get(id).is_some());
    }

    #[test]
    fn test_loaded_zero_width_rectangle_is_not_hit() {
        let store = ElementStore::from_json(
            r##"[{"type": "rectangle", "id": "6f1c9a52-7d0e-4b8e-9a57-3f2f6b1d2c11", "zIndex": 1,
                  "color": "#000000", "strokeWidth": 0.5, "opacity": 100,
                  "x": 10, "y": 10, "width": 0, "height": 20}]"##,
        )
        .unwrap();
        assert!(store.elements()[0].is_degenerate());
        assert!(store.topmost_at(Point::new(10.0, 20.0), 1.0).is_none());
    }

    #[test]
    fn test_from_json_rejects_unknown_type() {
        let err = ElementStore::from_json(r#"[{"type": "hexagon"}]"#).unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
