//! CollabCanvas Core Library
//!
//! Interaction core for a collaborative diagramming canvas: marquee selection,
//! rotation-aware resize, tool modes and keyboard shortcuts, and connection
//! status reconciliation. Rendering, persistence and transport live elsewhere;
//! they reach this crate through the [`ShapeStore`], [`FocusTarget`] and
//! [`StreamSource`] traits.

pub mod canvas;
pub mod config;
pub mod connection;
pub mod geometry;
pub mod handles;
pub mod input;
pub mod listeners;
pub mod selection;
pub mod shapes;
pub mod shortcuts;
pub mod store;
pub mod tools;
pub mod transform;

pub use canvas::{Canvas, CanvasEvent};
pub use config::{ConfigError, InteractionConfig};
pub use connection::{ConnectionReconciler, ConnectionStatus, StreamEvent, StreamSource};
pub use geometry::{intersecting_ids, rects_intersect, rotated_intersect};
pub use handles::{Handle, ResizeHandle, handle_position, handles, hit_test_handles};
pub use input::{FocusState, FocusTarget, Key, KeyEvent, Modifiers, PointerEvent, PointerTarget};
pub use listeners::{ListenerGuard, ListenerRegistry, ListenerScope};
pub use selection::SelectionController;
pub use shapes::{Shape, ShapeId, ShapeKind};
pub use shortcuts::{KeyOutcome, ShortcutAction, ShortcutRegistry};
pub use store::{MemoryShapeStore, ShapeStore};
pub use tools::{DrawKind, Mode, ToolManager};
pub use transform::{MIN_SHAPE_SIZE, ResizeProposal, ResizeSession};
