//! Shape snapshot model shared with the document store.
//!
//! Shapes are owned by the external shape manager. The interaction core only
//! reads snapshots of them and issues id-based requests back.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Default stroke width for new shapes.
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

/// Kind of shape, matching the draw tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Circle,
    Text,
}

/// A shape as seen by the interaction core.
///
/// `x`/`y` is the top-left corner of the unrotated box; rotation is applied
/// around the box center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub id: ShapeId,
    #[serde(rename = "type", default)]
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation angle in degrees (clockwise in canvas space).
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
}

fn default_stroke_width() -> f64 {
    DEFAULT_STROKE_WIDTH
}

impl Shape {
    /// Create a new unrotated shape with a fresh id.
    pub fn new(kind: ShapeKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            x,
            y,
            width,
            height,
            rotation: 0.0,
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }

    /// Shorthand for a rectangle shape.
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(ShapeKind::Rectangle, x, y, width, height)
    }

    /// Builder-style rotation setter (degrees).
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    /// Unrotated bounding box, normalised so `x0 <= x1` and `y0 <= y1`.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height).abs()
    }

    /// Center of the box, which is also the rotation pivot.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Rotation in degrees folded into `[0, 360)`.
    pub fn normalized_rotation(&self) -> f64 {
        let r = self.rotation.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs
        if r >= 360.0 { 0.0 } else { r }
    }

    /// Whether the shape is effectively unrotated.
    pub fn is_axis_aligned(&self) -> bool {
        self.normalized_rotation() == 0.0
    }

    /// World-space corners in top-left, top-right, bottom-right, bottom-left order.
    pub fn corners(&self) -> [Point; 4] {
        let center = self.center();
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        let radians = self.normalized_rotation().to_radians();
        [
            Vec2::new(-half_w, -half_h),
            Vec2::new(half_w, -half_h),
            Vec2::new(half_w, half_h),
            Vec2::new(-half_w, half_h),
        ]
        .map(|local| center + rotate_vec(local, radians))
    }

    /// Give the shape a fresh id (used when pasting copies).
    pub fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
    }
}

/// Rotate a vector by `radians` using the standard rotation matrix.
pub fn rotate_vec(v: Vec2, radians: f64) -> Vec2 {
    let (sin, cos) = radians.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}
