//! Playback control surface
//!
//! [`AudioController`] is the single entry point the surrounding application
//! drives: play, pause, stop, track stepping, and the repeat toggle. It wires
//! the request builder, download coordinator, track handoff, and reconciler
//! together over a shared [`PlayerState`].

use crate::builder::{BuiltRequest, RequestBuilder};
use crate::download::{DownloadCoordinator, FetchOutcome};
use crate::engine::{AudioEngine, EngineState};
use crate::error::Result;
use crate::handoff::{ResolveOutcome, TrackHandoff};
use crate::media::MediaIo;
use crate::paths::{AssetLayout, DEFAULT_TIMING_INDEX_URL};
use crate::reconciler::StateReconciler;
use crate::settings::SettingsStore;
use crate::state::PlayerState;
use std::sync::Arc;
use std::time::Duration;
use tilawah_common::{AudioState, AyahRef, PageTable, ReciterCatalog};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Shown when a download fails for any reason; the specific cause only goes
/// to the log.
pub const DOWNLOAD_FAILED_MESSAGE: &str = "Something went wrong. Unable to download audio.";

/// User-visible error reporting boundary. The application supplies whatever
/// surfaces messages to the user; the CLI just logs them.
pub trait ErrorSink: Send + Sync {
    fn report(&self, message: &str);
}

pub struct LogErrorSink;

impl ErrorSink for LogErrorSink {
    fn report(&self, message: &str) {
        error!("{message}");
    }
}

/// Timing knobs, injectable so tests do not sit through real debounces.
#[derive(Debug, Clone, Copy)]
pub struct ControllerConfig {
    /// How long a stop-like engine report must persist before it is believed
    pub stop_debounce: Duration,
    /// Pause before following playback onto a different page
    pub page_change_delay: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            stop_debounce: Duration::from_millis(500),
            page_change_delay: Duration::from_millis(500),
        }
    }
}

pub struct AudioController {
    engine: Arc<dyn AudioEngine>,
    state: Arc<PlayerState>,
    settings: Arc<dyn SettingsStore>,
    pages: Arc<PageTable>,
    builder: RequestBuilder,
    downloads: DownloadCoordinator,
    handoff: TrackHandoff,
    errors: Arc<dyn ErrorSink>,
    config: ControllerConfig,
}

impl AudioController {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        engine: Arc<dyn AudioEngine>,
        state: Arc<PlayerState>,
        settings: Arc<dyn SettingsStore>,
        media: Arc<dyn MediaIo>,
        catalog: ReciterCatalog,
        pages: Arc<PageTable>,
        layout: AssetLayout,
        errors: Arc<dyn ErrorSink>,
        config: ControllerConfig,
    ) -> Self {
        let builder = RequestBuilder::new(Arc::clone(&state), catalog, Arc::clone(&pages));
        let downloads = DownloadCoordinator::new(
            layout.clone(),
            media,
            Arc::clone(&state),
            Arc::clone(&pages),
            DEFAULT_TIMING_INDEX_URL.to_string(),
        );
        let handoff = TrackHandoff::new(layout);
        Self {
            engine,
            state,
            settings,
            pages,
            builder,
            downloads,
            handoff,
            errors,
            config,
        }
    }

    /// Start the background reconciler. Call once after construction.
    pub fn start(&self) -> JoinHandle<()> {
        StateReconciler::new(
            Arc::clone(&self.engine),
            Arc::clone(&self.state),
            Arc::clone(&self.pages),
            self.config.stop_debounce,
            self.config.page_change_delay,
        )
        .spawn()
    }

    pub fn state(&self) -> Arc<PlayerState> {
        Arc::clone(&self.state)
    }

    /// Resume if the engine is merely paused; otherwise start fresh from the
    /// current selection (or page).
    pub async fn play(&self) -> Result<()> {
        if self.engine.state().await == EngineState::Paused {
            return self.engine.play().await;
        }
        match self.builder.build(None, self.settings.as_ref()).await? {
            Some(built) => self.play_request(built).await,
            None => Ok(()),
        }
    }

    /// Start playback from a specific ayah, regardless of selection.
    pub async fn play_from(&self, ayah: AyahRef) -> Result<()> {
        match self.builder.build(Some(ayah), self.settings.as_ref()).await? {
            Some(built) => self.play_request(built).await,
            None => Ok(()),
        }
    }

    pub async fn pause(&self) -> Result<()> {
        self.engine.pause().await
    }

    pub async fn stop(&self) -> Result<()> {
        self.engine.stop().await
    }

    /// Advance the selection one ayah; if audio is playing, restart it there.
    pub async fn next_track(&self) -> Result<()> {
        self.step(|ayah| ayah.next()).await
    }

    /// Move the selection back one ayah; if audio is playing, restart it
    /// there.
    pub async fn previous_track(&self) -> Result<()> {
        self.step(|ayah| ayah.previous()).await
    }

    /// Set the tri-state repeat flag (on / off / unset). Only a definite
    /// on/off is persisted; clearing to unset leaves the stored setting
    /// alone. When audio is playing, the active request is rebuilt with the
    /// new policy and playback resumes at the captured position.
    pub async fn set_repeat(&self, repeat: Option<bool>) -> Result<()> {
        if let Some(enabled) = repeat {
            self.settings.set_repeat_enabled(enabled).await?;
        }
        self.state.set_repeat(repeat).await;

        if self.state.audio_state().await != AudioState::Playing {
            return Ok(());
        }
        let position = self.engine.position().await;
        self.engine.stop().await?;
        match self.builder.build(None, self.settings.as_ref()).await? {
            Some(built) => {
                self.play_request(built).await?;
                self.engine.set_position(position).await
            }
            None => Ok(()),
        }
    }

    async fn step(&self, advance: impl Fn(AyahRef) -> Option<AyahRef>) -> Result<()> {
        let Some(current) = self.state.selected_ayah().await else {
            return Ok(());
        };
        let Some(target) = advance(current.normalized()) else {
            // Already at an edge of the text
            return Ok(());
        };
        self.state.set_selected_ayah(Some(target)).await;
        self.state.set_current_page(self.pages.page_for(target)).await;

        if self.state.audio_state().await == AudioState::Playing {
            self.engine.stop().await?;
            return self.play_from(target).await;
        }
        Ok(())
    }

    /// Fetch, resolve, and hand the request's track to the engine.
    async fn play_request(&self, built: BuiltRequest) -> Result<()> {
        if self.settings.prefer_streaming().await {
            // resolve() logs the unimplemented-streaming case
            self.handoff.resolve(&built.request, &built.reciter, true);
            return Ok(());
        }

        match self.downloads.ensure_available(&built.request, &built.reciter).await {
            FetchOutcome::Busy => return Ok(()),
            FetchOutcome::Failed => {
                self.errors.report(DOWNLOAD_FAILED_MESSAGE);
                return Ok(());
            }
            FetchOutcome::Ready => {}
        }

        match self.handoff.resolve(&built.request, &built.reciter, false) {
            ResolveOutcome::Track(track) => {
                info!("playing {} ({})", track.title, built.request);
                self.engine.set_track(track.engine_track()).await?;
                self.engine.play().await
            }
            ResolveOutcome::Streaming => Ok(()),
        }
    }
}
