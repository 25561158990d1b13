//! Capability interface to the external shape manager.

mod memory;

pub use memory::{DEFAULT_PASTE_OFFSET, MemoryShapeStore};

use crate::shapes::{Shape, ShapeId};

/// What the interaction core needs from the shape manager.
///
/// The core reads snapshots and issues id-based requests; it never mutates
/// shapes or the selection set directly. Requests that make no sense for the
/// current state (empty batch, unknown ids) must be no-ops, not failures.
pub trait ShapeStore {
    /// Current shape snapshot in z-order (back to front).
    fn shapes(&self) -> &[Shape];

    /// Committed selection, in selection order.
    fn selected_ids(&self) -> &[ShapeId];

    /// Replace the selection with `ids`, or union them in when `additive`.
    fn select_shapes(&mut self, ids: &[ShapeId], additive: bool);

    /// Drop the whole selection.
    fn clear_selection(&mut self);

    /// Copy the current selection to the internal clipboard.
    fn copy_selected(&mut self);

    /// Whether the clipboard holds anything to paste.
    fn has_clipboard(&self) -> bool;

    /// Paste the clipboard contents.
    fn paste(&mut self);

    /// Delete shapes in one batch operation.
    fn delete_batch(&mut self, ids: &[ShapeId]);

    /// Ids of every shape, in z-order.
    fn all_shape_ids(&self) -> Vec<ShapeId> {
        self.shapes().iter().map(|s| s.id).collect()
    }

    /// Look up a shape in the snapshot.
    fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes().iter().find(|s| s.id == id)
    }

    fn has_selection(&self) -> bool {
        !self.selected_ids().is_empty()
    }

    fn is_selected(&self, id: ShapeId) -> bool {
        self.selected_ids().contains(&id)
    }
}
