//! Connection status reconciliation.
//!
//! Merges local network reachability with the health of the live document
//! stream into a single tri-state status. Time is always passed in, so the
//! liveness watchdog is driven by the caller's clock.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::mpsc::Receiver;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Default liveness window for the stream watchdog.
pub const DEFAULT_LIVENESS_WINDOW: Duration = Duration::from_secs(30);

/// Derived connection status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Connecting,
    Disconnected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Disconnected => "disconnected",
        };
        f.write_str(label)
    }
}

/// Events from the live document subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// The stream delivered data.
    Update,
    /// The subscription failed.
    Error { message: String },
}

/// Source of stream events that can be drained without blocking.
pub trait StreamSource {
    fn poll_events(&mut self) -> Vec<StreamEvent>;
}

impl StreamSource for Receiver<StreamEvent> {
    fn poll_events(&mut self) -> Vec<StreamEvent> {
        self.try_iter().collect()
    }
}

/// Tracks reachability and stream health and derives [`ConnectionStatus`].
#[derive(Debug, Clone)]
pub struct ConnectionReconciler {
    reachable: bool,
    stream_healthy: bool,
    has_errored: bool,
    last_update: Instant,
    liveness_window: Option<Duration>,
}

impl ConnectionReconciler {
    /// Start reachable, waiting for the first stream update.
    pub fn new(liveness_window: Option<Duration>, now: Instant) -> Self {
        Self {
            reachable: true,
            stream_healthy: false,
            has_errored: false,
            last_update: now,
            liveness_window,
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        if self.is_connected() {
            ConnectionStatus::Connected
        } else if self.is_connecting() {
            ConnectionStatus::Connecting
        } else {
            ConnectionStatus::Disconnected
        }
    }

    pub fn is_connected(&self) -> bool {
        self.reachable && self.stream_healthy
    }

    pub fn is_connecting(&self) -> bool {
        self.reachable && !self.stream_healthy && !self.has_errored
    }

    pub fn is_reachable(&self) -> bool {
        self.reachable
    }

    pub fn liveness_window(&self) -> Option<Duration> {
        self.liveness_window
    }

    /// Apply a reachability change from the host.
    ///
    /// Losing reachability is authoritative immediately. Regaining it resets
    /// stream health, so the status reads connecting until the stream delivers.
    pub fn set_reachable(&mut self, reachable: bool, now: Instant) -> Option<ConnectionStatus> {
        if reachable == self.reachable {
            return None;
        }
        let before = self.status();
        self.reachable = reachable;
        if reachable {
            self.stream_healthy = false;
            self.has_errored = false;
            self.last_update = now;
        }
        self.transition(before)
    }

    /// Apply one event from the stream subscription.
    pub fn on_stream_event(&mut self, event: &StreamEvent, now: Instant) -> Option<ConnectionStatus> {
        let before = self.status();
        match event {
            StreamEvent::Update => {
                self.last_update = now;
                if self.reachable {
                    self.stream_healthy = true;
                    self.has_errored = false;
                }
            }
            StreamEvent::Error { message } => {
                log::warn!("Document stream error: {}", message);
                self.stream_healthy = false;
                self.has_errored = true;
            }
        }
        self.transition(before)
    }

    /// Drain a stream source and apply its events in order.
    pub fn poll(&mut self, source: &mut impl StreamSource, now: Instant) -> Option<ConnectionStatus> {
        let before = self.status();
        for event in source.poll_events() {
            self.on_stream_event(&event, now);
        }
        let after = self.status();
        (after != before).then_some(after)
    }

    /// Run the liveness watchdog.
    ///
    /// A healthy stream that has been silent for longer than the window drops
    /// to connecting. It is never declared disconnected by the watchdog.
    pub fn tick(&mut self, now: Instant) -> Option<ConnectionStatus> {
        let window = self.liveness_window?;
        if !(self.reachable && self.stream_healthy) {
            return None;
        }
        let silent = now.saturating_duration_since(self.last_update);
        if silent < window {
            return None;
        }
        let before = self.status();
        log::debug!("No stream update for {:?}; marking stale", silent);
        self.stream_healthy = false;
        self.transition(before)
    }

    fn transition(&self, before: ConnectionStatus) -> Option<ConnectionStatus> {
        let after = self.status();
        if after == before {
            return None;
        }
        log::info!("Connection status: {} -> {}", before, after);
        Some(after)
    }
}
