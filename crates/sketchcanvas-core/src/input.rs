//! Raw input events delivered by the host surface.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A pointer event in screen pixels, from either a mouse or a touch surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerInput {
    Mouse {
        position: Point,
        modifiers: Modifiers,
    },
    Touch {
        /// Touches still in contact with the surface.
        touches: Vec<Point>,
        /// Touches that changed in this event (the lifted ones on touch-end).
        changed_touches: Vec<Point>,
        modifiers: Modifiers,
    },
}

impl PointerInput {
    pub fn mouse(position: Point) -> Self {
        PointerInput::Mouse {
            position,
            modifiers: Modifiers::default(),
        }
    }

    /// The screen position this event refers to.
    ///
    /// Touch events use the first active touch, falling back to the first
    /// changed touch. A touch event with neither has no position.
    pub fn position(&self) -> Option<Point> {
        match self {
            PointerInput::Mouse { position, .. } => Some(*position),
            PointerInput::Touch {
                touches,
                changed_touches,
                ..
            } => touches.first().or(changed_touches.first()).copied(),
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self {
            PointerInput::Mouse { modifiers, .. } | PointerInput::Touch { modifiers, .. } => {
                *modifiers
            }
        }
    }
}

/// Keys the canvas reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    Character(char),
}

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_prefers_active_touch() {
        let input = PointerInput::Touch {
            touches: vec![Point::new(1.0, 2.0), Point::new(9.0, 9.0)],
            changed_touches: vec![Point::new(5.0, 5.0)],
            modifiers: Modifiers::default(),
        };
        assert_eq!(input.position(), Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn test_touch_end_falls_back_to_changed() {
        let input = PointerInput::Touch {
            touches: Vec::new(),
            changed_touches: vec![Point::new(5.0, 5.0)],
            modifiers: Modifiers::default(),
        };
        assert_eq!(input.position(), Some(Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_touch_without_points() {
        let input = PointerInput::Touch {
            touches: Vec::new(),
            changed_touches: Vec::new(),
            modifiers: Modifiers::default(),
        };
        assert_eq!(input.position(), None);
    }

    #[test]
    fn test_command_modifier() {
        let mac = Modifiers {
            meta: true,
            ..Modifiers::default()
        };
        assert!(mac.command());
        assert!(!Modifiers::default().command());
    }
}
