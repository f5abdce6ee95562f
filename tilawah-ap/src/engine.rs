//! Native audio engine boundary
//!
//! The orchestrator never talks to a platform media engine directly; it is
//! handed an [`AudioEngine`] implementation at construction time. That keeps
//! the control flow testable with a fake engine and the platform glue out of
//! this crate.

use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tracing::info;

/// Raw playback state as reported by the native engine.
///
/// Richer than the application-visible [`tilawah_common::AudioState`]:
/// engines emit transient `Unknown`/`Error` pulses between tracks, which the
/// reconciler debounces before trusting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Stopped,
    Playing,
    Paused,
    Unknown,
    Error,
}

impl EngineState {
    /// States the reconciler treats as "possibly stopped" and re-confirms.
    pub fn is_stop_like(&self) -> bool {
        matches!(
            self,
            EngineState::Stopped | EngineState::Unknown | EngineState::Error
        )
    }
}

/// A track as handed to the native engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineTrack {
    pub path: PathBuf,
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Opaque per-track metadata slot; carries the serialized audio request
    pub tag: Option<String>,
}

/// Abstract contract for the native media engine.
///
/// Commands are asynchronous and acknowledged through the notification
/// stream, not through return values: `play()` returning `Ok` means the
/// command was accepted, not that audio is flowing.
#[async_trait]
pub trait AudioEngine: Send + Sync {
    async fn play(&self) -> Result<()>;
    async fn pause(&self) -> Result<()>;
    async fn stop(&self) -> Result<()>;

    /// Current playback position within the active track.
    async fn position(&self) -> Duration;
    async fn set_position(&self, position: Duration) -> Result<()>;

    /// Engine-reported state, read on demand (used by the debounce re-check).
    async fn state(&self) -> EngineState;

    async fn current_track(&self) -> Option<EngineTrack>;
    async fn set_track(&self, track: EngineTrack) -> Result<()>;

    /// State-change notification stream. Notifications may arrive out of
    /// order or duplicated; consumers must tolerate both.
    fn subscribe(&self) -> broadcast::Receiver<EngineState>;
}

/// Engine implementation that only logs commands and tracks state in memory.
///
/// Used by the CLI (which has no platform media engine) and handy as a
/// starting point for platform integrations.
pub struct LoggingEngine {
    state: RwLock<EngineState>,
    track: RwLock<Option<EngineTrack>>,
    position: RwLock<Duration>,
    notifications: broadcast::Sender<EngineState>,
}

impl LoggingEngine {
    pub fn new() -> Self {
        let (notifications, _) = broadcast::channel(16);
        Self {
            state: RwLock::new(EngineState::Stopped),
            track: RwLock::new(None),
            position: RwLock::new(Duration::ZERO),
            notifications,
        }
    }

    async fn transition(&self, state: EngineState) {
        *self.state.write().await = state;
        let _ = self.notifications.send(state);
    }
}

impl Default for LoggingEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioEngine for LoggingEngine {
    async fn play(&self) -> Result<()> {
        info!("engine: play");
        self.transition(EngineState::Playing).await;
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        info!("engine: pause");
        self.transition(EngineState::Paused).await;
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        info!("engine: stop");
        *self.position.write().await = Duration::ZERO;
        self.transition(EngineState::Stopped).await;
        Ok(())
    }

    async fn position(&self) -> Duration {
        *self.position.read().await
    }

    async fn set_position(&self, position: Duration) -> Result<()> {
        *self.position.write().await = position;
        Ok(())
    }

    async fn state(&self) -> EngineState {
        *self.state.read().await
    }

    async fn current_track(&self) -> Option<EngineTrack> {
        self.track.read().await.clone()
    }

    async fn set_track(&self, track: EngineTrack) -> Result<()> {
        info!("engine: set track '{}' ({})", track.title, track.path.display());
        *self.track.write().await = Some(track);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<EngineState> {
        self.notifications.subscribe()
    }
}
