//! Pointer, keyboard and focus inputs delivered by the host layer.

use crate::handles::ResizeHandle;
use crate::shapes::ShapeId;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { shift: false, ctrl: false, alt: false, meta: false };
    pub const SHIFT: Self = Self { shift: true, ctrl: false, alt: false, meta: false };
    pub const CTRL: Self = Self { shift: false, ctrl: true, alt: false, meta: false };
    pub const META: Self = Self { shift: false, ctrl: false, alt: false, meta: true };
    pub const ALT: Self = Self { shift: false, ctrl: false, alt: true, meta: false };

    /// Modifiers that turn a marquee or click into an additive selection.
    pub fn additive(&self) -> bool {
        self.shift || self.ctrl || self.meta
    }

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Any modifier that hands a letter key to the host instead of a tool.
    pub fn any_command(&self) -> bool {
        self.ctrl || self.meta || self.alt
    }
}

/// What the pointer was over when the event fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum PointerTarget {
    /// Empty canvas.
    #[default]
    Background,
    /// The body of a shape.
    Shape(ShapeId),
    /// A resize handle of a selected shape.
    Handle(ShapeId, ResizeHandle),
}

impl PointerTarget {
    pub fn is_background(&self) -> bool {
        matches!(self, PointerTarget::Background)
    }
}

/// Pointer event in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub position: Point,
    #[serde(default)]
    pub target: PointerTarget,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(position: Point, target: PointerTarget, modifiers: Modifiers) -> Self {
        Self { position, target, modifiers }
    }

    /// Unmodified pointer event over empty canvas.
    pub fn background(position: Point) -> Self {
        Self::new(position, PointerTarget::Background, Modifiers::NONE)
    }
}

/// Key identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Key {
    Character(String),
    Escape,
    Backspace,
    Delete,
    Other(String),
}

impl Key {
    pub fn char(c: &str) -> Self {
        Key::Character(c.to_string())
    }

    /// Lowercased single-character key, if this is one.
    pub fn letter(&self) -> Option<char> {
        match self {
            Key::Character(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c.to_ascii_lowercase()),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

/// Key-down event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Unmodified key press.
    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }
}

/// Focus queries and control offered by the host.
pub trait FocusTarget {
    /// Whether keyboard focus is inside a text-entry control.
    fn is_text_entry_focused(&self) -> bool;

    /// Remove focus from whatever control holds it.
    fn blur(&mut self);
}

/// Plain focus tracker for hosts without a native focus system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusState {
    /// Name of the focused control, if any.
    pub focused: Option<String>,
    /// Whether the focused control accepts text.
    pub text_entry: bool,
}

impl FocusState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Focus a control.
    pub fn focus(&mut self, control: impl Into<String>, text_entry: bool) {
        self.focused = Some(control.into());
        self.text_entry = text_entry;
    }

    pub fn has_focus(&self) -> bool {
        self.focused.is_some()
    }
}

impl FocusTarget for FocusState {
    fn is_text_entry_focused(&self) -> bool {
        self.focused.is_some() && self.text_entry
    }

    fn blur(&mut self) {
        self.focused = None;
        self.text_entry = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_groups() {
        assert!(Modifiers::SHIFT.additive());
        assert!(Modifiers::META.additive());
        assert!(!Modifiers::ALT.additive());
        assert!(Modifiers::ALT.any_command());
        assert!(!Modifiers::SHIFT.any_command());
        assert!(Modifiers::META.command());
    }

    #[test]
    fn test_key_letter() {
        assert_eq!(Key::char("R").letter(), Some('r'));
        assert_eq!(Key::char("ab").letter(), None);
        assert_eq!(Key::Escape.letter(), None);
    }

    #[test]
    fn test_focus_state() {
        let mut focus = FocusState::new();
        assert!(!focus.is_text_entry_focused());

        focus.focus("toolbar-button", false);
        assert!(focus.has_focus());
        assert!(!focus.is_text_entry_focused());

        focus.focus("chat-input", true);
        assert!(focus.is_text_entry_focused());

        focus.blur();
        assert!(!focus.has_focus());
        assert!(!focus.is_text_entry_focused());
    }

    #[test]
    fn test_pointer_event_deserialize() {
        let json = r#"{"position":{"x":5.0,"y":6.0},"target":{"kind":"background"}}"#;
        let event: PointerEvent = serde_json::from_str(json).unwrap();
        assert!(event.target.is_background());
        assert_eq!(event.modifiers, Modifiers::NONE);
    }
}
