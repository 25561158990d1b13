//! Resize handles on a selected shape's bounding box.

use crate::shapes::{Shape, rotate_vec};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// One of the eight resize handles: four corners and four edge midpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeHandle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl ResizeHandle {
    /// All handles, clockwise from top-left.
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::TopLeft,
        ResizeHandle::Top,
        ResizeHandle::TopRight,
        ResizeHandle::Right,
        ResizeHandle::BottomRight,
        ResizeHandle::Bottom,
        ResizeHandle::BottomLeft,
        ResizeHandle::Left,
    ];

    /// Which edges move: `-1` for left/top, `1` for right/bottom, `0` for fixed.
    pub fn direction(self) -> (i8, i8) {
        match self {
            ResizeHandle::TopLeft => (-1, -1),
            ResizeHandle::Top => (0, -1),
            ResizeHandle::TopRight => (1, -1),
            ResizeHandle::Right => (1, 0),
            ResizeHandle::BottomRight => (1, 1),
            ResizeHandle::Bottom => (0, 1),
            ResizeHandle::BottomLeft => (-1, 1),
            ResizeHandle::Left => (-1, 0),
        }
    }

    pub fn is_corner(self) -> bool {
        let (x, y) = self.direction();
        x != 0 && y != 0
    }
}

/// A handle with its world-space position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub handle: ResizeHandle,
    pub position: Point,
}

impl Handle {
    /// Check if a point (in world coordinates) hits this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point - self.position).hypot2() <= tolerance * tolerance
    }
}

/// World-space position of one handle, rotated with the shape.
pub fn handle_position(shape: &Shape, handle: ResizeHandle) -> Point {
    let (x_dir, y_dir) = handle.direction();
    let local = Vec2::new(f64::from(x_dir) * shape.width / 2.0, f64::from(y_dir) * shape.height / 2.0);
    shape.center() + rotate_vec(local, shape.normalized_rotation().to_radians())
}

/// Handle positions for a shape, rotated with it.
pub fn handles(shape: &Shape) -> [Handle; 8] {
    ResizeHandle::ALL.map(|handle| Handle {
        handle,
        position: handle_position(shape, handle),
    })
}

/// Find which handle (if any) is hit at the given point. Corners win over edges.
pub fn hit_test_handles(shape: &Shape, point: Point, tolerance: f64) -> Option<ResizeHandle> {
    let all = handles(shape);
    all.iter()
        .filter(|h| h.handle.is_corner())
        .chain(all.iter().filter(|h| !h.handle.is_corner()))
        .find(|h| h.hit_test(point, tolerance))
        .map(|h| h.handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_positions() {
        let shape = Shape::rect(0.0, 0.0, 100.0, 50.0);
        let hs = handles(&shape);
        assert_eq!(hs[0].handle, ResizeHandle::TopLeft);
        assert!((hs[0].position - Point::new(0.0, 0.0)).hypot() < 1e-9);
        assert!((hs[3].position - Point::new(100.0, 25.0)).hypot() < 1e-9);
        assert!((hs[5].position - Point::new(50.0, 50.0)).hypot() < 1e-9);
    }

    #[test]
    fn test_handles_follow_rotation() {
        let shape = Shape::rect(0.0, 0.0, 100.0, 50.0).with_rotation(90.0);
        let right = handles(&shape)[3];
        assert_eq!(right.handle, ResizeHandle::Right);
        // Local +x maps to world +y under a 90° rotation.
        assert!((right.position - Point::new(50.0, 75.0)).hypot() < 1e-6);
    }

    #[test]
    fn test_hit_test_handles() {
        let shape = Shape::rect(0.0, 0.0, 100.0, 100.0);
        assert_eq!(hit_test_handles(&shape, Point::new(101.0, 99.0), 4.0), Some(ResizeHandle::BottomRight));
        assert_eq!(hit_test_handles(&shape, Point::new(50.0, -2.0), 4.0), Some(ResizeHandle::Top));
        assert_eq!(hit_test_handles(&shape, Point::new(50.0, 50.0), 4.0), None);
    }

    #[test]
    fn test_corner_wins_on_tiny_shape() {
        let shape = Shape::rect(0.0, 0.0, 2.0, 2.0);
        let hit = hit_test_handles(&shape, Point::new(1.0, 0.0), 5.0);
        assert!(hit.is_some_and(ResizeHandle::is_corner));
    }

    #[test]
    fn test_direction_table() {
        assert_eq!(ResizeHandle::Left.direction(), (-1, 0));
        assert_eq!(ResizeHandle::BottomLeft.direction(), (-1, 1));
        assert_eq!(ResizeHandle::ALL.iter().filter(|h| h.is_corner()).count(), 4);
    }
}
