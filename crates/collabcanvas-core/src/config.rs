//! Tunable interaction settings.

use crate::store::DEFAULT_PASTE_OFFSET;
use crate::transform::MIN_SHAPE_SIZE;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default handle hit radius in canvas units.
pub const DEFAULT_HANDLE_HIT_TOLERANCE: f64 = 8.0;
/// Default stream liveness window in seconds.
pub const DEFAULT_LIVENESS_WINDOW_SECS: u64 = 30;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Interaction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionConfig {
    /// Smallest width or height a resize may produce.
    pub min_shape_size: f64,
    /// Hit radius for resize handles.
    pub handle_hit_tolerance: f64,
    /// Stream watchdog window; `None` disables the watchdog.
    pub liveness_window_secs: Option<u64>,
    /// Offset applied to pasted copies.
    pub paste_offset: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            min_shape_size: MIN_SHAPE_SIZE,
            handle_hit_tolerance: DEFAULT_HANDLE_HIT_TOLERANCE,
            liveness_window_secs: Some(DEFAULT_LIVENESS_WINDOW_SECS),
            paste_offset: DEFAULT_PASTE_OFFSET,
        }
    }
}

impl InteractionConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_shape_size.is_finite() && self.min_shape_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "minShapeSize must be positive, got {}",
                self.min_shape_size
            )));
        }
        if !(self.handle_hit_tolerance.is_finite() && self.handle_hit_tolerance >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "handleHitTolerance must be non-negative, got {}",
                self.handle_hit_tolerance
            )));
        }
        if !self.paste_offset.is_finite() {
            return Err(ConfigError::Invalid("pasteOffset must be finite".to_string()));
        }
        if self.liveness_window_secs == Some(0) {
            return Err(ConfigError::Invalid("livenessWindowSecs must be positive".to_string()));
        }
        Ok(())
    }

    pub fn liveness_window(&self) -> Option<Duration> {
        self.liveness_window_secs.map(Duration::from_secs)
    }
}
