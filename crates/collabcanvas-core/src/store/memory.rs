//! In-memory shape store for tests, headless sessions and ephemeral use.

use super::ShapeStore;
use crate::shapes::{Shape, ShapeId};
use crate::transform::ResizeProposal;

/// Default offset applied to pasted copies.
pub const DEFAULT_PASTE_OFFSET: f64 = 20.0;

/// Ordered shape list with a selection and a JSON clipboard.
#[derive(Debug, Clone)]
pub struct MemoryShapeStore {
    shapes: Vec<Shape>,
    selection: Vec<ShapeId>,
    /// Copied shapes as JSON.
    clipboard: Option<String>,
    paste_offset: f64,
    /// Number of batch deletions that removed at least one shape.
    delete_batches: usize,
}

impl Default for MemoryShapeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryShapeStore {
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            selection: Vec::new(),
            clipboard: None,
            paste_offset: DEFAULT_PASTE_OFFSET,
            delete_batches: 0,
        }
    }

    /// Create a store holding `shapes` in the given order.
    pub fn with_shapes(shapes: impl IntoIterator<Item = Shape>) -> Self {
        let mut store = Self::new();
        store.shapes.extend(shapes);
        store
    }

    pub fn set_paste_offset(&mut self, offset: f64) {
        self.paste_offset = offset;
    }

    /// Insert a shape, or replace the one with the same id (remote change).
    pub fn upsert(&mut self, shape: Shape) {
        match self.shapes.iter_mut().find(|s| s.id == shape.id) {
            Some(existing) => *existing = shape,
            None => self.shapes.push(shape),
        }
    }

    /// Remove a shape (remote change). Also drops it from the selection.
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.shapes.iter().position(|s| s.id == id)?;
        self.selection.retain(|&sel| sel != id);
        Some(self.shapes.remove(index))
    }

    /// Commit a resize proposal. Unknown ids are ignored.
    pub fn apply_resize(&mut self, proposal: &ResizeProposal) -> bool {
        let Some(shape) = self.shapes.iter_mut().find(|s| s.id == proposal.shape_id) else {
            log::debug!("Ignoring resize for missing shape {}", proposal.shape_id);
            return false;
        };
        shape.x = proposal.x;
        shape.y = proposal.y;
        shape.width = proposal.width;
        shape.height = proposal.height;
        shape.rotation = proposal.rotation;
        true
    }

    /// Raw clipboard contents.
    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    pub fn delete_batches(&self) -> usize {
        self.delete_batches
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl ShapeStore for MemoryShapeStore {
    fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    fn selected_ids(&self) -> &[ShapeId] {
        &self.selection
    }

    fn select_shapes(&mut self, ids: &[ShapeId], additive: bool) {
        if !additive {
            self.selection.clear();
        }
        for &id in ids {
            if self.shape(id).is_some() && !self.selection.contains(&id) {
                self.selection.push(id);
            }
        }
    }

    fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn copy_selected(&mut self) {
        let shapes: Vec<&Shape> = self
            .selection
            .iter()
            .filter_map(|&id| self.shapes.iter().find(|s| s.id == id))
            .collect();
        if shapes.is_empty() {
            return;
        }
        match serde_json::to_string(&shapes) {
            Ok(json) => {
                log::info!("Copied {} shapes", shapes.len());
                self.clipboard = Some(json);
            }
            Err(e) => log::warn!("Failed to serialize clipboard: {}", e),
        }
    }

    fn has_clipboard(&self) -> bool {
        self.clipboard.is_some()
    }

    fn paste(&mut self) {
        let Some(json) = self.clipboard.as_deref() else {
            return;
        };
        let copies: Vec<Shape> = match serde_json::from_str(json) {
            Ok(shapes) => shapes,
            Err(e) => {
                log::warn!("Clipboard contents are not shapes: {}", e);
                return;
            }
        };
        self.selection.clear();
        for mut shape in copies {
            shape.regenerate_id();
            shape.x += self.paste_offset;
            shape.y += self.paste_offset;
            self.selection.push(shape.id);
            self.shapes.push(shape);
        }
        log::info!("Pasted {} shapes", self.selection.len());
    }

    fn delete_batch(&mut self, ids: &[ShapeId]) {
        let before = self.shapes.len();
        self.shapes.retain(|s| !ids.contains(&s.id));
        self.selection.retain(|id| !ids.contains(id));
        if self.shapes.len() != before {
            self.delete_batches += 1;
            log::info!("Deleted {} shapes", before - self.shapes.len());
        }
    }
}
