//! Marquee (rubber-band) multi-selection.
//!
//! A marquee session starts on a background press in select mode, publishes a
//! live preview of intersecting shapes on every move, and commits a replace or
//! additive selection on release. The additive flag is captured at press time
//! and read at commit time.

use crate::geometry::intersecting_ids;
use crate::input::Modifiers;
use crate::listeners::{ListenerGuard, ListenerRegistry, ListenerScope};
use crate::shapes::ShapeId;
use crate::store::ShapeStore;
use kurbo::{Point, Rect};

/// An in-progress marquee drag.
#[derive(Debug)]
pub struct MarqueeSession {
    start: Point,
    end: Point,
    additive: bool,
    dragged: bool,
    _listeners: ListenerGuard,
}

impl MarqueeSession {
    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    /// Whether the session unions into the selection on commit.
    pub fn is_additive(&self) -> bool {
        self.additive
    }

    /// Whether the pointer moved away from the press point.
    pub fn was_dragged(&self) -> bool {
        self.dragged
    }

    /// Normalized marquee rectangle.
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }
}

/// Drives marquee sessions against a shape store.
#[derive(Debug, Default)]
pub struct SelectionController {
    session: Option<MarqueeSession>,
    /// Candidate ids under the current marquee; separate from the committed selection.
    preview: Vec<ShapeId>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a marquee at `point`.
    ///
    /// Without an additive modifier an existing selection is cleared right
    /// away. Any previous session is replaced.
    pub fn begin(
        &mut self,
        store: &mut impl ShapeStore,
        point: Point,
        modifiers: Modifiers,
        listeners: &ListenerRegistry,
    ) {
        let additive = modifiers.additive();
        if !additive && store.has_selection() {
            store.clear_selection();
        }
        self.preview.clear();
        self.session = Some(MarqueeSession {
            start: point,
            end: point,
            additive,
            dragged: false,
            _listeners: listeners.acquire(ListenerScope::Marquee),
        });
        log::debug!(
            "Marquee started at ({:.1}, {:.1}){}",
            point.x,
            point.y,
            if additive { " (additive)" } else { "" }
        );
    }

    /// Move the marquee's free corner and recompute the preview from the
    /// latest snapshot.
    pub fn update(&mut self, store: &impl ShapeStore, point: Point) -> Option<&[ShapeId]> {
        let session = self.session.as_mut()?;
        session.end = point;
        if point != session.start {
            session.dragged = true;
        }
        self.preview = intersecting_ids(session.rect(), store.shapes());
        log::trace!("Marquee preview: {} shapes", self.preview.len());
        Some(self.preview.as_slice())
    }

    /// Finish the session on release.
    ///
    /// Returns the committed ids, or `None` if there was no session or it was
    /// never dragged. An undragged session is dropped without touching the
    /// selection.
    pub fn commit(&mut self, store: &mut impl ShapeStore, point: Point) -> Option<Vec<ShapeId>> {
        let mut session = self.session.take()?;
        self.preview.clear();
        session.end = point;
        if point != session.start {
            session.dragged = true;
        }
        if !session.dragged {
            log::debug!("Marquee released without drag");
            return None;
        }

        let ids = intersecting_ids(session.rect(), store.shapes());
        store.select_shapes(&ids, session.additive);
        log::debug!(
            "Marquee committed {} shapes{}",
            ids.len(),
            if session.additive { " (additive)" } else { "" }
        );
        Some(ids)
    }

    /// Drop the session without committing. Returns whether one was active.
    pub fn cancel(&mut self) -> bool {
        self.preview.clear();
        let cancelled = self.session.take().is_some();
        if cancelled {
            log::debug!("Marquee cancelled");
        }
        cancelled
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&MarqueeSession> {
        self.session.as_ref()
    }

    /// Live preview ids (empty when idle).
    pub fn preview(&self) -> &[ShapeId] {
        &self.preview
    }

    pub fn marquee_rect(&self) -> Option<Rect> {
        self.session.as_ref().map(MarqueeSession::rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Shape;
    use crate::store::MemoryShapeStore;
    use std::collections::BTreeSet;

    fn marquee(
        controller: &mut SelectionController,
        store: &mut MemoryShapeStore,
        listeners: &ListenerRegistry,
        from: (f64, f64),
        to: (f64, f64),
        modifiers: Modifiers,
    ) -> Option<Vec<ShapeId>> {
        controller.begin(store, Point::new(from.0, from.1), modifiers, listeners);
        controller.update(&*store, Point::new(to.0, to.1));
        controller.commit(store, Point::new(to.0, to.1))
    }

    #[test]
    fn test_contained_shape_selected() {
        let shape = Shape::rect(50.0, 50.0, 20.0, 20.0);
        let id = shape.id;
        let mut store = MemoryShapeStore::with_shapes([shape]);
        let listeners = ListenerRegistry::new();
        let mut controller = SelectionController::new();

        let committed = marquee(&mut controller, &mut store, &listeners, (0.0, 0.0), (100.0, 100.0), Modifiers::NONE);
        assert_eq!(committed, Some(vec![id]));
        assert_eq!(store.selected_ids(), &[id]);
        assert!(controller.preview().is_empty());
        assert!(!listeners.is_listening());
    }

    #[test]
    fn test_rotated_straddling_shape_selected() {
        let shape = Shape::rect(90.0, 90.0, 20.0, 20.0).with_rotation(45.0);
        let id = shape.id;
        let mut store = MemoryShapeStore::with_shapes([shape]);
        let listeners = ListenerRegistry::new();
        let mut controller = SelectionController::new();

        marquee(&mut controller, &mut store, &listeners, (0.0, 0.0), (100.0, 100.0), Modifiers::NONE);
        assert_eq!(store.selected_ids(), &[id]);
    }

    #[test]
    fn test_preview_is_separate_from_selection() {
        let a = Shape::rect(10.0, 10.0, 10.0, 10.0);
        let b = Shape::rect(200.0, 200.0, 10.0, 10.0);
        let (a_id, b_id) = (a.id, b.id);
        let mut store = MemoryShapeStore::with_shapes([a, b]);
        store.select_shapes(&[b_id], false);
        let listeners = ListenerRegistry::new();
        let mut controller = SelectionController::new();

        controller.begin(&mut store, Point::ZERO, Modifiers::SHIFT, &listeners);
        let preview = controller.update(&store, Point::new(50.0, 50.0)).map(<[ShapeId]>::to_vec);
        assert_eq!(preview, Some(vec![a_id]));
        // Additive session keeps the committed selection untouched until release.
        assert_eq!(store.selected_ids(), &[b_id]);
        assert!(controller.marquee_rect().is_some());
        let session = controller.session().unwrap();
        assert_eq!(session.start(), Point::ZERO);
        assert_eq!(session.end(), Point::new(50.0, 50.0));
    }

    #[test]
    fn test_begin_clears_selection_without_modifier() {
        let shape = Shape::rect(10.0, 10.0, 10.0, 10.0);
        let id = shape.id;
        let mut store = MemoryShapeStore::with_shapes([shape]);
        store.select_shapes(&[id], false);
        let listeners = ListenerRegistry::new();
        let mut controller = SelectionController::new();

        controller.begin(&mut store, Point::new(500.0, 500.0), Modifiers::NONE, &listeners);
        assert!(!store.has_selection());
        assert!(controller.is_active());
        assert!(listeners.is_listening());
    }

    #[test]
    fn test_additive_commit_unions() {
        let a = Shape::rect(0.0, 0.0, 10.0, 10.0);
        let b = Shape::rect(100.0, 0.0, 10.0, 10.0);
        let (a_id, b_id) = (a.id, b.id);
        let mut store = MemoryShapeStore::with_shapes([a, b]);
        let listeners = ListenerRegistry::new();
        let mut controller = SelectionController::new();

        marquee(&mut controller, &mut store, &listeners, (-5.0, -5.0), (20.0, 20.0), Modifiers::NONE);
        marquee(&mut controller, &mut store, &listeners, (95.0, -5.0), (120.0, 20.0), Modifiers::CTRL);
        assert_eq!(store.selected_ids(), &[a_id, b_id]);

        // A replace marquee drops the earlier selection.
        marquee(&mut controller, &mut store, &listeners, (95.0, -5.0), (120.0, 20.0), Modifiers::NONE);
        assert_eq!(store.selected_ids(), &[b_id]);
    }

    #[test]
    fn test_additive_selection_is_commutative() {
        let a = Shape::rect(0.0, 0.0, 10.0, 10.0);
        let b = Shape::rect(100.0, 0.0, 10.0, 10.0).with_rotation(30.0);
        let shapes = [a, b];
        let over_a = ((-5.0, -5.0), (20.0, 20.0));
        let over_b = ((95.0, -5.0), (120.0, 20.0));
        let listeners = ListenerRegistry::new();

        let run = |first: ((f64, f64), (f64, f64)), second: ((f64, f64), (f64, f64))| {
            let mut store = MemoryShapeStore::with_shapes(shapes.clone());
            let mut controller = SelectionController::new();
            marquee(&mut controller, &mut store, &listeners, first.0, first.1, Modifiers::SHIFT);
            marquee(&mut controller, &mut store, &listeners, second.0, second.1, Modifiers::SHIFT);
            store.selected_ids().iter().copied().collect::<BTreeSet<_>>()
        };

        let ab = run(over_a, over_b);
        let ba = run(over_b, over_a);
        assert_eq!(ab, ba);
        assert_eq!(ab.len(), 2);
    }

    #[test]
    fn test_undragged_release_leaves_selection() {
        let shape = Shape::rect(0.0, 0.0, 10.0, 10.0);
        let id = shape.id;
        let mut store = MemoryShapeStore::with_shapes([shape]);
        store.select_shapes(&[id], false);
        let listeners = ListenerRegistry::new();
        let mut controller = SelectionController::new();

        controller.begin(&mut store, Point::new(5.0, 5.0), Modifiers::META, &listeners);
        assert_eq!(controller.commit(&mut store, Point::new(5.0, 5.0)), None);
        assert_eq!(store.selected_ids(), &[id]);
        assert!(!controller.is_active());
        assert!(!listeners.is_listening());
    }

    #[test]
    fn test_remote_changes_reflected_on_next_move() {
        let mut store = MemoryShapeStore::new();
        let listeners = ListenerRegistry::new();
        let mut controller = SelectionController::new();

        controller.begin(&mut store, Point::ZERO, Modifiers::NONE, &listeners);
        assert_eq!(controller.update(&store, Point::new(100.0, 100.0)).map(<[ShapeId]>::len), Some(0));

        let remote = Shape::rect(40.0, 40.0, 10.0, 10.0);
        let remote_id = remote.id;
        store.upsert(remote);
        assert!(controller.preview().is_empty());

        // Duplicate move recomputes from the new snapshot.
        controller.update(&store, Point::new(100.0, 100.0));
        assert_eq!(controller.preview(), &[remote_id]);

        store.remove(remote_id);
        controller.update(&store, Point::new(100.0, 100.0));
        assert!(controller.preview().is_empty());
    }

    #[test]
    fn test_cancel_releases_listeners() {
        let mut store = MemoryShapeStore::new();
        let listeners = ListenerRegistry::new();
        let mut controller = SelectionController::new();

        assert!(!controller.cancel());
        controller.begin(&mut store, Point::ZERO, Modifiers::NONE, &listeners);
        controller.update(&store, Point::new(10.0, 10.0));
        assert!(controller.cancel());
        assert!(!listeners.is_listening());
        assert!(controller.marquee_rect().is_none());
        assert!(controller.update(&store, Point::new(20.0, 20.0)).is_none());
    }
}
