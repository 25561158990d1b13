//! Intersection tests between marquee rectangles and (possibly rotated) shapes.
//!
//! Everything here is pure. Contact counts as intersection: a shape touching
//! the marquee along an edge or at a single point is selected. Rotated
//! contact is decided within [`CONTACT_EPSILON`], relative to segment length.
//! Degenerate inputs (zero width or height) are handled like any other box.

use crate::shapes::Shape;
use kurbo::{Point, Rect};

/// Axis-aligned overlap test. Touching edges intersect.
pub fn rects_intersect(a: Rect, b: Rect) -> bool {
    let (a, b) = (a.abs(), b.abs());
    !(a.x1 < b.x0 || b.x1 < a.x0 || a.y1 < b.y0 || b.y1 < a.y0)
}

/// Inclusive point-in-rectangle test.
///
/// `kurbo::Rect::contains` is half-open, which would drop shapes touching the
/// right or bottom marquee edge.
pub fn rect_contains_inclusive(rect: Rect, point: Point) -> bool {
    let rect = rect.abs();
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Corners of a rectangle in top-left, top-right, bottom-right, bottom-left order.
pub fn rect_corners(rect: Rect) -> [Point; 4] {
    let rect = rect.abs();
    [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ]
}

/// Ray-casting point-in-polygon test.
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Relative tolerance for collinearity in the rotated tests.
pub const CONTACT_EPSILON: f64 = 1e-9;

/// Turn direction of `a`, `b`, `c`: `1` counter-clockwise, `-1` clockwise,
/// `0` collinear within [`CONTACT_EPSILON`].
fn orientation(a: Point, b: Point, c: Point) -> i8 {
    let (ab, ac) = (b - a, c - a);
    let cross = ab.cross(ac);
    let scale = (ab.hypot() * ac.hypot()).max(1.0);
    if cross.abs() <= CONTACT_EPSILON * scale {
        0
    } else if cross > 0.0 {
        1
    } else {
        -1
    }
}

/// Whether `p`, already known collinear with `a-b`, lies within its extent.
fn within_segment(a: Point, b: Point, p: Point) -> bool {
    let slack = CONTACT_EPSILON * (b - a).hypot().max(1.0);
    p.x >= a.x.min(b.x) - slack
        && p.x <= a.x.max(b.x) + slack
        && p.y >= a.y.min(b.y) - slack
        && p.y <= a.y.max(b.y) + slack
}

/// Whether segments `a-b` and `c-d` cross or touch.
///
/// A proper crossing is decided by orientation signs; an endpoint lying on
/// the other segment (including collinear overlap) also counts.
pub fn segments_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    let (o1, o2) = (orientation(c, d, a), orientation(c, d, b));
    let (o3, o4) = (orientation(a, b, c), orientation(a, b, d));
    if o1 * o2 < 0 && o3 * o4 < 0 {
        return true;
    }
    (o1 == 0 && within_segment(c, d, a))
        || (o2 == 0 && within_segment(c, d, b))
        || (o3 == 0 && within_segment(a, b, c))
        || (o4 == 0 && within_segment(a, b, d))
}

/// Iterate the closed edge loop of a polygon.
fn edges(polygon: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    polygon
        .iter()
        .enumerate()
        .map(move |(i, &p)| (p, polygon[(i + 1) % polygon.len()]))
}

/// Whether a marquee rectangle intersects a shape, honoring its rotation.
///
/// Unrotated shapes (including multiples of 360°) use the AABB test. Rotated
/// shapes are tested as a convex polygon: a shape corner inside the marquee,
/// then a marquee corner inside the shape, then any edge crossing or touching.
/// The order only affects how early the test returns.
pub fn rotated_intersect(marquee: Rect, shape: &Shape) -> bool {
    if shape.is_axis_aligned() {
        return rects_intersect(marquee, shape.bounds());
    }

    let polygon = shape.corners();
    if polygon.iter().any(|&p| rect_contains_inclusive(marquee, p)) {
        return true;
    }

    let marquee_corners = rect_corners(marquee);
    if marquee_corners.iter().any(|&p| point_in_polygon(p, &polygon)) {
        return true;
    }

    edges(&polygon).any(|(a, b)| {
        edges(&marquee_corners).any(|(c, d)| segments_intersect(a, b, c, d))
    })
}

/// Ids of all shapes the marquee touches, in snapshot order.
pub fn intersecting_ids<'a>(
    marquee: Rect,
    shapes: impl IntoIterator<Item = &'a Shape>,
) -> Vec<crate::shapes::ShapeId> {
    shapes
        .into_iter()
        .filter(|shape| rotated_intersect(marquee, shape))
        .map(|shape| shape.id)
        .collect()
}
