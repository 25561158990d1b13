//! Session scripts: initial state plus a timeline of host events.

use collabcanvas_core::{ConfigError, InteractionConfig, KeyEvent, Mode, PointerEvent, Shape, ShapeId};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Script loading errors.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// A recorded or hand-written interaction session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Script {
    pub config: InteractionConfig,
    /// Initial shapes, back to front.
    pub shapes: Vec<Shape>,
    pub events: Vec<ScriptEvent>,
}

/// One host event in a session timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    PointerDown(PointerEvent),
    PointerMove { position: Point },
    PointerUp { position: Point },
    Click(PointerEvent),
    Key(KeyEvent),
    SetMode { mode: Mode },
    /// Focus a host control.
    Focus {
        control: String,
        #[serde(default)]
        text_entry: bool,
    },
    Blur,
    Online,
    Offline,
    StreamUpdate,
    StreamError { message: String },
    /// Advance the session clock and run the liveness watchdog.
    Advance { ms: u64 },
    /// A shape inserted or changed by another collaborator.
    RemoteUpsert { shape: Shape },
    RemoteRemove { id: ShapeId },
    Teardown,
}

impl Script {
    pub fn from_json_str(json: &str) -> Result<Self, ScriptError> {
        let script: Self = serde_json::from_str(json)?;
        script.config.validate()?;
        Ok(script)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let script = Self::from_json_str(&json)?;
        log::info!("Loaded script {} ({} events)", path.display(), script.events.len());
        Ok(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collabcanvas_core::{Key, PointerTarget};
    use std::io::Write;

    #[test]
    fn test_parse_events() {
        let json = r#"{
            "shapes": [{"id": "6f0c8f65-4b0e-4a55-9a4b-3d1f2f0a9e11", "type": "rectangle",
                        "x": 0, "y": 0, "width": 10, "height": 10}],
            "events": [
                {"type": "pointer_down", "position": {"x": 1, "y": 2}, "modifiers": {"shift": true}},
                {"type": "pointer_move", "position": {"x": 5, "y": 6}},
                {"type": "key", "key": {"kind": "character", "value": "c"}, "modifiers": {"ctrl": true}},
                {"type": "set_mode", "mode": {"mode": "draw", "shape": "circle"}},
                {"type": "focus", "control": "title", "text_entry": true},
                {"type": "advance", "ms": 1500},
                {"type": "stream_error", "message": "denied"}
            ]
        }"#;
        let script = Script::from_json_str(json).unwrap();
        assert_eq!(script.shapes.len(), 1);
        assert_eq!(script.events.len(), 7);

        let ScriptEvent::PointerDown(down) = &script.events[0] else {
            panic!("expected pointer_down");
        };
        assert_eq!(down.target, PointerTarget::Background);
        assert!(down.modifiers.shift);

        let ScriptEvent::Key(key) = &script.events[2] else {
            panic!("expected key");
        };
        assert_eq!(key.key, Key::char("c"));
        assert!(key.modifiers.ctrl);

        assert_eq!(script.events[5], ScriptEvent::Advance { ms: 1500 });
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = Script::from_json_str(r#"{"config": {"minShapeSize": -1}}"#).unwrap_err();
        assert!(matches!(err, ScriptError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"events": [{{"type": "offline"}}, {{"type": "teardown"}}]}}"#).unwrap();
        let script = Script::load(file.path()).unwrap();
        assert_eq!(script.events, vec![ScriptEvent::Offline, ScriptEvent::Teardown]);
        assert!(script.shapes.is_empty());
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(Script::load(dir.path().join("none.json")), Err(ScriptError::Io(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(Script::load(file.path()), Err(ScriptError::Parse(_))));
    }
}
