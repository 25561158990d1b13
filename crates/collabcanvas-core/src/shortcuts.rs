//! Keyboard shortcut actions and the shortcut table.

use crate::tools::Mode;
use serde::{Deserialize, Serialize};

/// What a key press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "mode", rename_all = "snake_case")]
pub enum ShortcutAction {
    /// Switched tool via a shortcut letter.
    SwitchMode(Mode),
    SelectAll,
    Copy,
    Paste,
    /// Deleted the selection as one batch.
    DeleteSelection,
    /// Escape cancelled an active marquee and nothing else.
    CancelMarquee,
    /// Escape reset to select mode with an empty selection.
    Reset,
}

/// Result of dispatching a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyOutcome {
    /// Host should suppress its default action for the key.
    pub prevent_default: bool,
    pub action: Option<ShortcutAction>,
}

impl KeyOutcome {
    /// The key was not handled; the host keeps its default behaviour.
    pub fn ignored() -> Self {
        Self::default()
    }

    /// A shortcut fired.
    pub fn fired(action: ShortcutAction) -> Self {
        Self {
            prevent_default: true,
            action: Some(action),
        }
    }

    pub fn is_handled(&self) -> bool {
        self.action.is_some()
    }
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, ctrl: bool, shift: bool, description: &'static str) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+A").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
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
        vec![
            Shortcut::new("V", false, false, "Select tool"),
            Shortcut::new("H", false, false, "Pan tool"),
            Shortcut::new("R", false, false, "Draw rectangle"),
            Shortcut::new("C", false, false, "Draw circle"),
            Shortcut::new("T", false, false, "Draw text"),
            Shortcut::new("A", true, false, "Select all shapes"),
            Shortcut::new("C", true, false, "Copy shapes"),
            Shortcut::new("V", true, false, "Paste shapes"),
            Shortcut::new("Delete", false, false, "Delete selected shapes"),
            Shortcut::new("Backspace", false, false, "Delete selected shapes"),
            Shortcut::new("Escape", false, false, "Cancel marquee, or reset to select"),
            Shortcut::new("Drag", false, true, "Add marquee hits to the selection"),
        ]
    }

    /// Shortcut table as aligned text, one shortcut per line.
    pub fn table() -> String {
        Self::all()
            .iter()
            .map(|s| format!("  {:20} {}\n", s.format(), s.description))
            .collect()
    }
}
