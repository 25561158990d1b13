//! Canvas tool modes and the draw-session state they carry.

use crate::listeners::{ListenerGuard, ListenerRegistry, ListenerScope};
use crate::shapes::ShapeKind;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape a draw mode creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawKind {
    Rectangle,
    Circle,
    Text,
}

impl DrawKind {
    pub fn shape_kind(self) -> ShapeKind {
        match self {
            DrawKind::Rectangle => ShapeKind::Rectangle,
            DrawKind::Circle => ShapeKind::Circle,
            DrawKind::Text => ShapeKind::Text,
        }
    }
}

/// Active canvas tool. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "mode", content = "shape", rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Select,
    Pan,
    Draw(DrawKind),
    /// No tool; pointer input is ignored.
    None,
}

impl Mode {
    /// Tool shortcut letter for this mode, if it has one.
    pub fn shortcut(&self) -> Option<char> {
        match self {
            Mode::Select => Some('v'),
            Mode::Pan => Some('h'),
            Mode::Draw(DrawKind::Rectangle) => Some('r'),
            Mode::Draw(DrawKind::Circle) => Some('c'),
            Mode::Draw(DrawKind::Text) => Some('t'),
            Mode::None => None,
        }
    }

    /// Mode selected by a tool shortcut letter.
    pub fn from_shortcut(letter: char) -> Option<Mode> {
        match letter.to_ascii_lowercase() {
            'v' => Some(Mode::Select),
            'h' => Some(Mode::Pan),
            'r' => Some(Mode::Draw(DrawKind::Rectangle)),
            'c' => Some(Mode::Draw(DrawKind::Circle)),
            't' => Some(Mode::Draw(DrawKind::Text)),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Select => write!(f, "select"),
            Mode::Pan => write!(f, "pan"),
            Mode::Draw(kind) => write!(f, "draw:{}", format!("{kind:?}").to_lowercase()),
            Mode::None => write!(f, "none"),
        }
    }
}

/// State of a draw interaction.
#[derive(Debug, Default)]
pub enum DrawState {
    /// Waiting for a press.
    #[default]
    Idle,
    /// Pointer is down and dragging out a shape.
    Active {
        kind: DrawKind,
        start: Point,
        current: Point,
        _listeners: ListenerGuard,
    },
}

/// A finished draw gesture, for the shape manager to turn into a shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawnShape {
    pub kind: DrawKind,
    pub rect: Rect,
}

/// Tracks the current mode and its transient draw state.
#[derive(Debug, Default)]
pub struct ToolManager {
    mode: Mode,
    state: DrawState,
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch mode, discarding any in-progress draw.
    /// Returns the previous mode.
    pub fn set_mode(&mut self, mode: Mode) -> Mode {
        let previous = self.mode;
        self.cancel();
        self.mode = mode;
        if previous != mode {
            log::info!("Mode {} -> {}", previous, mode);
        }
        previous
    }

    /// Begin a draw gesture if a draw mode is active.
    pub fn begin(&mut self, point: Point, listeners: &ListenerRegistry) -> bool {
        let Mode::Draw(kind) = self.mode else {
            return false;
        };
        self.state = DrawState::Active {
            kind,
            start: point,
            current: point,
            _listeners: listeners.acquire(ListenerScope::Draw),
        };
        log::debug!("Draw started: {:?} at ({:.1}, {:.1})", kind, point.x, point.y);
        true
    }

    /// Update the current draw gesture.
    pub fn update(&mut self, point: Point) -> Option<Rect> {
        if let DrawState::Active { start, current, .. } = &mut self.state {
            *current = point;
            Some(Rect::from_points(*start, point))
        } else {
            None
        }
    }

    /// Finish the current gesture.
    pub fn end(&mut self, point: Point) -> Option<DrawnShape> {
        match std::mem::take(&mut self.state) {
            DrawState::Active { kind, start, .. } => {
                let rect = Rect::from_points(start, point);
                log::debug!("Draw finished: {:?} {:.1}x{:.1}", kind, rect.width(), rect.height());
                Some(DrawnShape { kind, rect })
            }
            DrawState::Idle => None,
        }
    }

    /// Drop any in-progress draw.
    pub fn cancel(&mut self) {
        self.state = DrawState::Idle;
    }

    /// Check if a draw gesture is in progress.
    pub fn is_active(&self) -> bool {
        matches!(self.state, DrawState::Active { .. })
    }

    /// Rectangle of the in-progress draw (for preview).
    pub fn preview_rect(&self) -> Option<Rect> {
        match &self.state {
            DrawState::Active { start, current, .. } => Some(Rect::from_points(*start, *current)),
            DrawState::Idle => None,
        }
    }
}
