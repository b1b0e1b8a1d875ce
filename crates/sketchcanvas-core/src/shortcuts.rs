//! Keyboard shortcut registry and key-to-action mapping.

use crate::input::{Key, KeyInput};

/// Actions triggered from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutAction {
    DeleteSelection,
    /// Discard an in-progress draw, or clear the selection.
    Cancel,
    SwapColors,
    DuplicateSelection,
    BringForward,
    SendBackward,
    Undo,
    Redo,
}

impl ShortcutAction {
    /// Resolve a key press. Cmd and Ctrl are interchangeable.
    pub fn from_key(input: &KeyInput) -> Option<Self> {
        let command = input.modifiers.command();
        let shift = input.modifiers.shift;
        match input.key {
            Key::Delete | Key::Backspace => Some(Self::DeleteSelection),
            Key::Escape => Some(Self::Cancel),
            Key::Character(c) => match (c.to_ascii_lowercase(), command, shift) {
                ('z', true, false) => Some(Self::Undo),
                ('z', true, true) | ('y', true, _) => Some(Self::Redo),
                ('d', true, _) => Some(Self::DuplicateSelection),
                ('x', false, _) => Some(Self::SwapColors),
                (']', false, _) => Some(Self::BringForward),
                ('[', false, _) => Some(Self::SendBackward),
                _ => None,
            },
        }
    }
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub command: bool,
    pub shift: bool,
    pub action: ShortcutAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        command: bool,
        shift: bool,
        action: ShortcutAction,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            command,
            shift,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Cmd/Ctrl+Shift+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.command {
            parts.push("Cmd/Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        use ShortcutAction::*;
        vec![
            Shortcut::new("Delete", false, false, DeleteSelection, "Delete selected element"),
            Shortcut::new("Backspace", false, false, DeleteSelection, "Delete selected element"),
            Shortcut::new("Escape", false, false, Cancel, "Cancel drawing or clear selection"),
            Shortcut::new("X", false, false, SwapColors, "Swap stroke and fill colors"),
            Shortcut::new("D", true, false, DuplicateSelection, "Duplicate selected element"),
            Shortcut::new("]", false, false, BringForward, "Bring selection forward"),
            Shortcut::new("[", false, false, SendBackward, "Send selection backward"),
            Shortcut::new("Z", true, false, Undo, "Undo"),
            Shortcut::new("Z", true, true, Redo, "Redo"),
            Shortcut::new("Y", true, false, Redo, "Redo"),
        ]
    }

    /// One line per shortcut, for help output.
    pub fn describe() -> String {
        Self::all()
            .iter()
            .map(|s| format!("  {:20} {}", s.format(), s.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
