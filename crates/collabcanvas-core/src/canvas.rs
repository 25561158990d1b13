//! Canvas interaction state and event dispatch.
//!
//! [`Canvas`] owns the transient interaction state (tool mode, marquee, resize
//! and draw sessions, global listener registrations) and borrows the shape
//! store and focus state per call. Every entry point runs to completion on the
//! caller's thread.

use crate::config::InteractionConfig;
use crate::handles::{ResizeHandle, hit_test_handles};
use crate::input::{FocusTarget, Key, KeyEvent, PointerEvent, PointerTarget};
use crate::listeners::ListenerRegistry;
use crate::selection::SelectionController;
use crate::shapes::ShapeId;
use crate::shortcuts::{KeyOutcome, ShortcutAction};
use crate::store::ShapeStore;
use crate::tools::{DrawKind, DrawnShape, Mode, ToolManager};
use crate::transform::{ResizeProposal, ResizeSession};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Observable result of a pointer event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CanvasEvent {
    ResizeStarted { shape_id: ShapeId, handle: ResizeHandle },
    ResizeProposed { proposal: ResizeProposal },
    /// Final bounds for the shape manager to persist.
    ResizeCommitted { proposal: ResizeProposal },
    MarqueeStarted { origin: Point },
    PreviewChanged { ids: Vec<ShapeId> },
    SelectionCommitted { ids: Vec<ShapeId>, additive: bool },
    ShapeSelected { shape_id: ShapeId, additive: bool },
    SelectionCleared,
    DrawStarted { kind: DrawKind, origin: Point },
    DrawUpdated { kind: DrawKind, rect: Rect },
    DrawCompleted { kind: DrawKind, rect: Rect },
}

/// Interaction state machine for one canvas.
#[derive(Debug, Default)]
pub struct Canvas {
    config: InteractionConfig,
    tools: ToolManager,
    selection: SelectionController,
    resize: Option<ResizeSession>,
    listeners: ListenerRegistry,
    /// Set when a gesture finished that the trailing click must not undo.
    suppress_click: bool,
}

impl Canvas {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.tools.mode()
    }

    /// Ids under the active marquee, separate from the committed selection.
    pub fn preview_ids(&self) -> &[ShapeId] {
        self.selection.preview()
    }

    pub fn marquee_rect(&self) -> Option<Rect> {
        self.selection.marquee_rect()
    }

    /// Latest proposal of the active resize session.
    pub fn resize_proposal(&self) -> Option<ResizeProposal> {
        self.resize.as_ref().map(ResizeSession::proposal)
    }

    /// Rectangle of the in-progress draw.
    pub fn draw_rect(&self) -> Option<Rect> {
        self.tools.preview_rect()
    }

    pub fn is_marqueeing(&self) -> bool {
        self.selection.is_active()
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_some()
    }

    pub fn is_drawing(&self) -> bool {
        self.tools.is_active()
    }

    /// Registry the host consults to route window-level pointer events.
    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    // --- Pointer input ---

    /// Handle a pointer press.
    pub fn pointer_down(&mut self, store: &mut impl ShapeStore, event: &PointerEvent) -> Option<CanvasEvent> {
        self.suppress_click = false;
        // Only one session at a time; a press without a matching release ends the old one.
        self.end_sessions();

        let additive = event.modifiers.additive();
        match self.mode() {
            Mode::Select => {
                let target = self.resolve_target(&*store, event);
                match target {
                    PointerTarget::Handle(shape_id, handle) => {
                        let shape = store.shape(shape_id)?;
                        self.resize = Some(ResizeSession::begin(
                            shape,
                            handle,
                            event.position,
                            self.config.min_shape_size,
                            &self.listeners,
                        ));
                        Some(CanvasEvent::ResizeStarted { shape_id, handle })
                    }
                    PointerTarget::Background => {
                        self.selection.begin(store, event.position, event.modifiers, &self.listeners);
                        Some(CanvasEvent::MarqueeStarted { origin: event.position })
                    }
                    PointerTarget::Shape(shape_id) => {
                        if store.shape(shape_id).is_none() || store.is_selected(shape_id) {
                            return None;
                        }
                        store.select_shapes(&[shape_id], additive);
                        Some(CanvasEvent::ShapeSelected { shape_id, additive })
                    }
                }
            }
            Mode::Draw(kind) => {
                if matches!(event.target, PointerTarget::Handle(..)) {
                    return None;
                }
                self.tools.begin(event.position, &self.listeners);
                Some(CanvasEvent::DrawStarted {
                    kind,
                    origin: event.position,
                })
            }
            Mode::Pan | Mode::None => None,
        }
    }

    /// Handle a pointer move. Depends only on the session origin and
    /// `position`, so repeated or dropped moves are harmless.
    pub fn pointer_move(&mut self, store: &impl ShapeStore, position: Point) -> Option<CanvasEvent> {
        if let Some(session) = self.resize.as_mut() {
            return Some(CanvasEvent::ResizeProposed {
                proposal: session.update(position),
            });
        }
        if let Some(ids) = self.selection.update(store, position) {
            return Some(CanvasEvent::PreviewChanged { ids: ids.to_vec() });
        }
        let rect = self.tools.update(position)?;
        let Mode::Draw(kind) = self.mode() else {
            return None;
        };
        Some(CanvasEvent::DrawUpdated { kind, rect })
    }

    /// Handle a pointer release, wherever it happened.
    pub fn pointer_up(&mut self, store: &mut impl ShapeStore, position: Point) -> Option<CanvasEvent> {
        if let Some(session) = self.resize.take() {
            return Some(CanvasEvent::ResizeCommitted {
                proposal: session.finish(position),
            });
        }
        if let Some(session) = self.selection.session() {
            let additive = session.is_additive();
            let ids = self.selection.commit(store, position)?;
            self.suppress_click = true;
            return Some(CanvasEvent::SelectionCommitted { ids, additive });
        }
        let DrawnShape { kind, rect } = self.tools.end(position)?;
        self.suppress_click = true;
        log::info!("Drew {:?} {:.1}x{:.1}", kind, rect.width(), rect.height());
        Some(CanvasEvent::DrawCompleted { kind, rect })
    }

    /// Handle a click (press and release without drag).
    ///
    /// A plain click on the background in select mode clears the selection,
    /// unless it trails a marquee drag or a draw gesture.
    pub fn click(&mut self, store: &mut impl ShapeStore, event: &PointerEvent) -> Option<CanvasEvent> {
        if std::mem::take(&mut self.suppress_click) {
            log::debug!("Click suppressed after gesture");
            return None;
        }
        if self.mode() != Mode::Select
            || !event.target.is_background()
            || event.modifiers.additive()
            || self.tools.is_active()
            || !store.has_selection()
        {
            return None;
        }
        store.clear_selection();
        log::debug!("Selection cleared by click");
        Some(CanvasEvent::SelectionCleared)
    }

    /// Switch tool mode. Returns whether the mode changed.
    pub fn set_mode(&mut self, store: &mut impl ShapeStore, mode: Mode) -> bool {
        if mode != Mode::Select {
            self.selection.cancel();
            self.resize = None;
        }
        if matches!(mode, Mode::Pan | Mode::Draw(_)) && store.has_selection() {
            store.clear_selection();
        }
        self.tools.set_mode(mode) != mode
    }

    // --- Keyboard input ---

    /// Dispatch a key press.
    pub fn handle_key(
        &mut self,
        store: &mut impl ShapeStore,
        focus: &mut impl FocusTarget,
        event: &KeyEvent,
    ) -> KeyOutcome {
        let outcome = match &event.key {
            Key::Escape => self.escape(store, focus),
            Key::Backspace | Key::Delete => {
                if focus.is_text_entry_focused() {
                    return KeyOutcome::ignored();
                }
                delete_selection(store)
            }
            Key::Character(_) => {
                let Some(letter) = event.key.letter() else {
                    return KeyOutcome::ignored();
                };
                if focus.is_text_entry_focused() {
                    return KeyOutcome::ignored();
                }
                if event.modifiers.command() {
                    match letter {
                        'a' => select_all(store),
                        'c' => copy(store),
                        'v' => paste(store),
                        _ => KeyOutcome::ignored(),
                    }
                } else if event.modifiers.any_command() {
                    KeyOutcome::ignored()
                } else {
                    match Mode::from_shortcut(letter) {
                        Some(mode) => {
                            self.set_mode(store, mode);
                            KeyOutcome::fired(ShortcutAction::SwitchMode(mode))
                        }
                        None => KeyOutcome::ignored(),
                    }
                }
            }
            Key::Other(_) => KeyOutcome::ignored(),
        };
        if let Some(action) = outcome.action {
            log::info!("Shortcut fired: {:?}", action);
        }
        outcome
    }

    fn escape(&mut self, store: &mut impl ShapeStore, focus: &mut impl FocusTarget) -> KeyOutcome {
        focus.blur();
        if self.selection.cancel() {
            return KeyOutcome::fired(ShortcutAction::CancelMarquee);
        }
        let had_selection = store.has_selection();
        let was_drawing = self.tools.is_active();
        let was_resizing = self.resize.take().is_some();
        let mode_changed = self.set_mode(store, Mode::Select);
        store.clear_selection();
        if had_selection || was_drawing || was_resizing || mode_changed {
            KeyOutcome::fired(ShortcutAction::Reset)
        } else {
            KeyOutcome::ignored()
        }
    }

    // --- Lifecycle ---

    /// Drop every session and its listener registrations.
    pub fn teardown(&mut self) {
        self.end_sessions();
        self.suppress_click = false;
        log::debug!("Canvas interaction state torn down");
    }

    fn end_sessions(&mut self) {
        self.resize = None;
        self.selection.cancel();
        self.tools.cancel();
    }

    /// Promote a background press near a selected shape's handle to a handle
    /// target. Presses the host reported on a shape or handle pass through.
    fn resolve_target(&self, store: &impl ShapeStore, event: &PointerEvent) -> PointerTarget {
        if !event.target.is_background() {
            return event.target;
        }
        let tolerance = self.config.handle_hit_tolerance;
        store
            .selected_ids()
            .iter()
            .rev()
            .filter_map(|&id| store.shape(id))
            .find_map(|shape| {
                hit_test_handles(shape, event.position, tolerance)
                    .map(|handle| PointerTarget::Handle(shape.id, handle))
            })
            .unwrap_or(event.target)
    }
}

fn select_all(store: &mut impl ShapeStore) -> KeyOutcome {
    let ids = store.all_shape_ids();
    if ids.is_empty() {
        return KeyOutcome::ignored();
    }
    store.select_shapes(&ids, false);
    KeyOutcome::fired(ShortcutAction::SelectAll)
}

fn copy(store: &mut impl ShapeStore) -> KeyOutcome {
    if !store.has_selection() {
        return KeyOutcome::ignored();
    }
    store.copy_selected();
    KeyOutcome::fired(ShortcutAction::Copy)
}

fn paste(store: &mut impl ShapeStore) -> KeyOutcome {
    if !store.has_clipboard() {
        return KeyOutcome::ignored();
    }
    store.paste();
    KeyOutcome::fired(ShortcutAction::Paste)
}

fn delete_selection(store: &mut impl ShapeStore) -> KeyOutcome {
    let ids = store.selected_ids().to_vec();
    if ids.is_empty() {
        return KeyOutcome::ignored();
    }
    store.delete_batch(&ids);
    KeyOutcome::fired(ShortcutAction::DeleteSelection)
}
