//! Replays a [`Script`] through the interaction core.
//!
//! The session plays the host's part: it owns the in-memory shape store and
//! focus state, forwards stream events through a channel, persists committed
//! resizes and turns completed draws into shapes.

use crate::script::{Script, ScriptEvent};
use collabcanvas_core::{
    Canvas, CanvasEvent, ConnectionReconciler, ConnectionStatus, FocusState, FocusTarget, KeyOutcome,
    MemoryShapeStore, Mode, ResizeProposal, Shape, ShapeId, ShapeStore, StreamEvent,
};
use serde::Serialize;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

/// What one script event produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepRecord {
    Canvas { event: CanvasEvent },
    Key { outcome: KeyOutcome },
    Mode { mode: Mode },
    Connection { status: ConnectionStatus },
}

/// Final state after a session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub mode: Mode,
    pub selection: Vec<ShapeId>,
    pub preview: Vec<ShapeId>,
    pub connection: ConnectionStatus,
    pub last_resize: Option<ResizeProposal>,
    pub shapes: Vec<Shape>,
    pub delete_batches: usize,
    pub elapsed_ms: u64,
    pub steps: Vec<StepRecord>,
}

/// Host-side state for replaying a script.
pub struct Session {
    canvas: Canvas,
    store: MemoryShapeStore,
    focus: FocusState,
    reconciler: ConnectionReconciler,
    stream_tx: Sender<StreamEvent>,
    stream_rx: Receiver<StreamEvent>,
    start: Instant,
    elapsed: Duration,
    last_resize: Option<ResizeProposal>,
    steps: Vec<StepRecord>,
}

impl Session {
    pub fn new(script: &Script) -> Self {
        let start = Instant::now();
        let mut store = MemoryShapeStore::with_shapes(script.shapes.iter().cloned());
        store.set_paste_offset(script.config.paste_offset);
        let (stream_tx, stream_rx) = mpsc::channel();
        Self {
            canvas: Canvas::new(script.config.clone()),
            store,
            focus: FocusState::new(),
            reconciler: ConnectionReconciler::new(script.config.liveness_window(), start),
            stream_tx,
            stream_rx,
            start,
            elapsed: Duration::ZERO,
            last_resize: None,
            steps: Vec::new(),
        }
    }

    fn now(&self) -> Instant {
        self.start + self.elapsed
    }

    /// Apply one event.
    pub fn apply(&mut self, event: &ScriptEvent) {
        log::debug!("Script event: {:?}", event);
        match event {
            ScriptEvent::PointerDown(pointer) => {
                let result = self.canvas.pointer_down(&mut self.store, pointer);
                self.record_canvas(result);
            }
            ScriptEvent::PointerMove { position } => {
                let result = self.canvas.pointer_move(&self.store, *position);
                self.record_canvas(result);
            }
            ScriptEvent::PointerUp { position } => {
                let result = self.canvas.pointer_up(&mut self.store, *position);
                self.record_canvas(result);
            }
            ScriptEvent::Click(pointer) => {
                let result = self.canvas.click(&mut self.store, pointer);
                self.record_canvas(result);
            }
            ScriptEvent::Key(key) => {
                let before = self.canvas.mode();
                let outcome = self.canvas.handle_key(&mut self.store, &mut self.focus, key);
                self.steps.push(StepRecord::Key { outcome });
                self.record_mode(before);
            }
            ScriptEvent::SetMode { mode } => {
                let before = self.canvas.mode();
                self.canvas.set_mode(&mut self.store, *mode);
                self.record_mode(before);
            }
            ScriptEvent::Focus { control, text_entry } => self.focus.focus(control.clone(), *text_entry),
            ScriptEvent::Blur => self.focus.blur(),
            ScriptEvent::Online | ScriptEvent::Offline => {
                let now = self.now();
                let status = self.reconciler.set_reachable(matches!(event, ScriptEvent::Online), now);
                self.record_connection(status);
            }
            ScriptEvent::StreamUpdate => self.send_stream(StreamEvent::Update),
            ScriptEvent::StreamError { message } => self.send_stream(StreamEvent::Error {
                message: message.clone(),
            }),
            ScriptEvent::Advance { ms } => {
                self.elapsed += Duration::from_millis(*ms);
                let now = self.now();
                let status = self.reconciler.tick(now);
                self.record_connection(status);
            }
            ScriptEvent::RemoteUpsert { shape } => self.store.upsert(shape.clone()),
            ScriptEvent::RemoteRemove { id } => {
                if self.store.remove(*id).is_none() {
                    log::debug!("Remote removal of unknown shape {}", id);
                }
            }
            ScriptEvent::Teardown => self.canvas.teardown(),
        }
    }

    /// Replay every event and summarize.
    pub fn run(mut self, script: &Script) -> Summary {
        for event in &script.events {
            self.apply(event);
        }
        self.finish()
    }

    pub fn finish(self) -> Summary {
        Summary {
            mode: self.canvas.mode(),
            selection: self.store.selected_ids().to_vec(),
            preview: self.canvas.preview_ids().to_vec(),
            connection: self.reconciler.status(),
            last_resize: self.last_resize,
            shapes: self.store.shapes().to_vec(),
            delete_batches: self.store.delete_batches(),
            elapsed_ms: u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX),
            steps: self.steps,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn store(&self) -> &MemoryShapeStore {
        &self.store
    }

    pub fn status(&self) -> ConnectionStatus {
        self.reconciler.status()
    }

    fn send_stream(&mut self, event: StreamEvent) {
        if self.stream_tx.send(event).is_err() {
            log::warn!("Stream channel closed");
            return;
        }
        let now = self.now();
        let status = self.reconciler.poll(&mut self.stream_rx, now);
        self.record_connection(status);
    }

    fn record_canvas(&mut self, event: Option<CanvasEvent>) {
        let Some(event) = event else {
            return;
        };
        match &event {
            CanvasEvent::ResizeProposed { proposal } => self.last_resize = Some(*proposal),
            CanvasEvent::ResizeCommitted { proposal } => {
                self.last_resize = Some(*proposal);
                self.store.apply_resize(proposal);
            }
            CanvasEvent::DrawCompleted { kind, rect } => {
                if rect.width() > 0.0 && rect.height() > 0.0 {
                    let shape = Shape::new(kind.shape_kind(), rect.x0, rect.y0, rect.width(), rect.height());
                    log::info!("Created {:?} {}", shape.kind, shape.id);
                    self.store.upsert(shape);
                } else {
                    log::debug!("Ignoring empty {:?} draw", kind);
                }
            }
            _ => {}
        }
        self.steps.push(StepRecord::Canvas { event });
    }

    fn record_mode(&mut self, before: Mode) {
        let mode = self.canvas.mode();
        if mode != before {
            self.steps.push(StepRecord::Mode { mode });
        }
    }

    fn record_connection(&mut self, status: Option<ConnectionStatus>) {
        if let Some(status) = status {
            self.steps.push(StepRecord::Connection { status });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collabcanvas_core::{DrawKind, ResizeHandle};

    fn run(json: &str) -> Summary {
        let script = Script::from_json_str(json).unwrap();
        Session::new(&script).run(&script)
    }

    #[test]
    fn test_marquee_session() {
        let summary = run(r#"{
            "shapes": [
                {"id": "00000000-0000-4000-8000-000000000001", "x": 50, "y": 50, "width": 20, "height": 20},
                {"id": "00000000-0000-4000-8000-000000000002", "x": 90, "y": 90, "width": 20, "height": 20, "rotation": 45}
            ],
            "events": [
                {"type": "pointer_down", "position": {"x": 0, "y": 0}},
                {"type": "pointer_move", "position": {"x": 100, "y": 100}},
                {"type": "pointer_up", "position": {"x": 100, "y": 100}},
                {"type": "click", "position": {"x": 100, "y": 100}}
            ]
        }"#);
        assert_eq!(summary.selection.len(), 2);
        assert!(summary.preview.is_empty());
        assert_eq!(summary.mode, Mode::Select);
        assert!(matches!(
            summary.steps.last(),
            Some(StepRecord::Canvas { event: CanvasEvent::SelectionCommitted { .. } })
        ));
    }

    #[test]
    fn test_resize_is_persisted() {
        let summary = run(r#"{
            "shapes": [{"id": "00000000-0000-4000-8000-000000000001", "x": 0, "y": 0, "width": 100, "height": 100}],
            "events": [
                {"type": "pointer_down", "position": {"x": 100, "y": 100},
                 "target": {"kind": "handle", "id": ["00000000-0000-4000-8000-000000000001", "bottom_right"]}},
                {"type": "pointer_move", "position": {"x": 130, "y": 160}},
                {"type": "pointer_up", "position": {"x": 130, "y": 160}}
            ]
        }"#);
        let proposal = summary.last_resize.unwrap();
        assert!((proposal.width - 130.0).abs() < 1e-9);
        assert!((summary.shapes[0].height - 160.0).abs() < 1e-9);
        assert!(matches!(
            summary.steps[0],
            StepRecord::Canvas { event: CanvasEvent::ResizeStarted { handle: ResizeHandle::BottomRight, .. } }
        ));
    }

    #[test]
    fn test_draw_creates_shape() {
        let summary = run(r#"{
            "events": [
                {"type": "key", "key": {"kind": "character", "value": "c"}},
                {"type": "pointer_down", "position": {"x": 10, "y": 10}},
                {"type": "pointer_move", "position": {"x": 40, "y": 30}},
                {"type": "pointer_up", "position": {"x": 40, "y": 30}},
                {"type": "click", "position": {"x": 40, "y": 30}}
            ]
        }"#);
        assert_eq!(summary.mode, Mode::Draw(DrawKind::Circle));
        assert_eq!(summary.shapes.len(), 1);
        assert!((summary.shapes[0].width - 30.0).abs() < f64::EPSILON);
        assert!(summary.steps.contains(&StepRecord::Mode { mode: Mode::Draw(DrawKind::Circle) }));
    }

    #[test]
    fn test_keyboard_session() {
        let summary = run(r#"{
            "shapes": [
                {"id": "00000000-0000-4000-8000-000000000001", "x": 0, "y": 0, "width": 10, "height": 10},
                {"id": "00000000-0000-4000-8000-000000000002", "x": 20, "y": 0, "width": 10, "height": 10}
            ],
            "events": [
                {"type": "focus", "control": "title", "text_entry": true},
                {"type": "key", "key": {"kind": "character", "value": "r"}},
                {"type": "blur"},
                {"type": "key", "key": {"kind": "character", "value": "a"}, "modifiers": {"meta": true}},
                {"type": "key", "key": {"kind": "delete"}}
            ]
        }"#);
        assert_eq!(summary.mode, Mode::Select);
        assert!(summary.shapes.is_empty());
        assert_eq!(summary.delete_batches, 1);
        assert_eq!(summary.steps[0], StepRecord::Key { outcome: KeyOutcome::ignored() });
    }

    #[test]
    fn test_connection_timeline() {
        let summary = run(r#"{
            "config": {"livenessWindowSecs": 30},
            "events": [
                {"type": "stream_update"},
                {"type": "advance", "ms": 31000},
                {"type": "stream_update"},
                {"type": "offline"},
                {"type": "stream_update"},
                {"type": "online"},
                {"type": "stream_error", "message": "permission denied"}
            ]
        }"#);
        let statuses: Vec<ConnectionStatus> = summary
            .steps
            .iter()
            .filter_map(|step| match step {
                StepRecord::Connection { status } => Some(*status),
                _ => None,
            })
            .collect();
        assert_eq!(
            statuses,
            vec![
                ConnectionStatus::Connected,
                ConnectionStatus::Connecting,
                ConnectionStatus::Connected,
                ConnectionStatus::Disconnected,
                ConnectionStatus::Connecting,
                ConnectionStatus::Disconnected,
            ]
        );
        assert_eq!(summary.connection, ConnectionStatus::Disconnected);
        assert_eq!(summary.elapsed_ms, 31000);
    }

    #[test]
    fn test_remote_changes_and_teardown() {
        let summary = run(r#"{
            "events": [
                {"type": "pointer_down", "position": {"x": 0, "y": 0}},
                {"type": "pointer_move", "position": {"x": 50, "y": 50}},
                {"type": "remote_upsert", "shape": {"id": "00000000-0000-4000-8000-000000000009", "x": 10, "y": 10, "width": 5, "height": 5}},
                {"type": "pointer_move", "position": {"x": 50, "y": 50}},
                {"type": "teardown"},
                {"type": "pointer_up", "position": {"x": 50, "y": 50}},
                {"type": "remote_remove", "id": "00000000-0000-4000-8000-000000000009"}
            ]
        }"#);
        assert!(summary.selection.is_empty());
        assert!(summary.preview.is_empty());
        assert!(summary.shapes.is_empty());
        assert!(matches!(
            &summary.steps[2],
            StepRecord::Canvas { event: CanvasEvent::PreviewChanged { ids } } if ids.len() == 1
        ));
    }

    #[test]
    fn test_summary_serializes() {
        let summary = run(r#"{"events": [{"type": "offline"}]}"#);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["connection"], "disconnected");
        assert_eq!(json["mode"]["mode"], "select");
        assert!(json["lastResize"].is_null());
    }
}
