//! Rotation-aware resize of a shape from one of its eight handles.

use crate::handles::{ResizeHandle, handle_position};
use crate::listeners::{ListenerGuard, ListenerRegistry, ListenerScope};
use crate::shapes::{Shape, ShapeId, rotate_vec};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest width or height a resize may produce.
pub const MIN_SHAPE_SIZE: f64 = 10.0;

/// Shape geometry captured when a resize starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees.
    pub rotation: f64,
}

impl ResizeBounds {
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

impl From<&Shape> for ResizeBounds {
    fn from(shape: &Shape) -> Self {
        Self {
            x: shape.x,
            y: shape.y,
            width: shape.width,
            height: shape.height,
            rotation: shape.rotation,
        }
    }
}

/// Proposed geometry for the shape manager to persist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeProposal {
    pub shape_id: ShapeId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Unchanged from the original shape (degrees).
    pub rotation: f64,
}

/// Compute the resized box for a drag of `handle` to `pointer`.
///
/// The pointer offset from the original center is taken into the shape's
/// local frame, the dragged edges follow it (clamped to `min_size`), and the
/// opposite edges stay where they were in world space.
pub fn resize_bounds(
    original: &ResizeBounds,
    handle: ResizeHandle,
    pointer: Point,
    min_size: f64,
) -> ResizeBounds {
    let (x_dir, y_dir) = handle.direction();
    let (x_dir, y_dir) = (f64::from(x_dir), f64::from(y_dir));
    let radians = original.rotation.to_radians();
    let center = original.center();

    let local = rotate_vec(pointer - center, -radians);

    let width = if x_dir != 0.0 {
        (x_dir * local.x + original.width / 2.0).max(min_size)
    } else {
        original.width
    };
    let height = if y_dir != 0.0 {
        (y_dir * local.y + original.height / 2.0).max(min_size)
    } else {
        original.height
    };

    // The center moves half the size change toward the dragged edge.
    let local_shift = Vec2::new(
        x_dir * (width - original.width) / 2.0,
        y_dir * (height - original.height) / 2.0,
    );
    let new_center = center + rotate_vec(local_shift, radians);

    ResizeBounds {
        x: new_center.x - width / 2.0,
        y: new_center.y - height / 2.0,
        width,
        height,
        rotation: original.rotation,
    }
}

/// An in-progress handle drag.
///
/// Owns the global pointer listeners for its lifetime. While it exists, its
/// latest proposal is the source of truth for the shape's visual bounds.
#[derive(Debug)]
pub struct ResizeSession {
    shape_id: ShapeId,
    handle: ResizeHandle,
    original: ResizeBounds,
    /// Handle position minus the press position.
    grab_offset: Vec2,
    min_size: f64,
    proposal: ResizeProposal,
    _listeners: ListenerGuard,
}

impl ResizeSession {
    /// Start a resize from a handle press at `press`.
    ///
    /// The handle keeps its offset from the pointer, so a press that lands
    /// beside the handle and releases without moving leaves the shape as is.
    pub fn begin(
        shape: &Shape,
        handle: ResizeHandle,
        press: Point,
        min_size: f64,
        listeners: &ListenerRegistry,
    ) -> Self {
        let original = ResizeBounds::from(shape);
        log::debug!("Resize started on {} via {:?}", shape.id, handle);
        Self {
            shape_id: shape.id,
            handle,
            original,
            grab_offset: handle_position(shape, handle) - press,
            min_size,
            proposal: proposal_from(shape.id, &original),
            _listeners: listeners.acquire(ListenerScope::Resize),
        }
    }

    pub fn shape_id(&self) -> ShapeId {
        self.shape_id
    }

    pub fn handle(&self) -> ResizeHandle {
        self.handle
    }

    pub fn original(&self) -> &ResizeBounds {
        &self.original
    }

    /// Latest proposed bounds.
    pub fn proposal(&self) -> ResizeProposal {
        self.proposal
    }

    /// Recompute from the latest pointer position. Depends only on the session
    /// origin and `pointer`, so dropped or repeated moves are harmless.
    pub fn update(&mut self, pointer: Point) -> ResizeProposal {
        let target = pointer + self.grab_offset;
        let bounds = resize_bounds(&self.original, self.handle, target, self.min_size);
        self.proposal = proposal_from(self.shape_id, &bounds);
        log::trace!("Resize proposal {:?}", self.proposal);
        self.proposal
    }

    /// Finish on pointer release; listeners are released with the session.
    pub fn finish(mut self, pointer: Point) -> ResizeProposal {
        let proposal = self.update(pointer);
        log::debug!(
            "Resize finished on {}: {:.1}x{:.1} at ({:.1}, {:.1})",
            proposal.shape_id,
            proposal.width,
            proposal.height,
            proposal.x,
            proposal.y
        );
        proposal
    }
}

fn proposal_from(shape_id: ShapeId, bounds: &ResizeBounds) -> ResizeProposal {
    ResizeProposal {
        shape_id,
        x: bounds.x,
        y: bounds.y,
        width: bounds.width,
        height: bounds.height,
        rotation: bounds.rotation,
    }
}
