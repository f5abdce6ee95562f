//! Player event types and the event bus
//!
//! Every externally visible state change is published as a [`PlayerEvent`];
//! state setters fire an event only when the value actually changed, so
//! subscribers can treat each event as a real transition.

use crate::quran::AyahRef;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Application-visible playback state.
///
/// Owned by the orchestrator and set only by the state reconciler;
/// playback-initiating calls never write it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioState {
    Stopped,
    Playing,
    Paused,
}

impl std::fmt::Display for AudioState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioState::Stopped => write!(f, "stopped"),
            AudioState::Playing => write!(f, "playing"),
            AudioState::Paused => write!(f, "paused"),
        }
    }
}

/// Change notifications produced by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerEvent {
    /// Application playback state changed
    AudioStateChanged {
        old_state: AudioState,
        new_state: AudioState,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// An audio download began or finished
    DownloadingChanged {
        downloading: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Download progress update (percent, 0-100)
    DownloadProgress {
        percent: u8,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// User-facing repeat flag changed (tri-state: on / off / unset)
    RepeatChanged {
        repeat: Option<bool>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Current page changed
    PageChanged {
        old_page: u16,
        new_page: u16,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Selected ayah changed
    SelectionChanged {
        ayah: Option<AyahRef>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl PlayerEvent {
    /// Get event type as string for filtering
    pub fn event_type(&self) -> &str {
        match self {
            PlayerEvent::AudioStateChanged { .. } => "AudioStateChanged",
            PlayerEvent::DownloadingChanged { .. } => "DownloadingChanged",
            PlayerEvent::DownloadProgress { .. } => "DownloadProgress",
            PlayerEvent::RepeatChanged { .. } => "RepeatChanged",
            PlayerEvent::PageChanged { .. } => "PageChanged",
            PlayerEvent::SelectionChanged { .. } => "SelectionChanged",
        }
    }
}

/// Central event distribution bus.
///
/// Backed by `tokio::broadcast`: non-blocking publish, multiple concurrent
/// subscribers, automatic cleanup when subscribers drop.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<PlayerEvent>,
    capacity: usize,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening.
    pub fn emit_lossy(&self, event: PlayerEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(100)
    }
}
