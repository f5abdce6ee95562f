//! Playback state reconciliation
//!
//! Listens to the engine's raw notification stream and folds it into the
//! application-visible [`AudioState`]. Engines emit transient stop-like
//! pulses between tracks, so a stop is only committed after a debounce
//! window in which the engine still reports itself stopped.
//!
//! While a track is playing, the serialized request in its tag drives the
//! displayed selection and page. An unreadable tag is logged and ignored;
//! display sync is best-effort and must never take playback down.

use crate::engine::{AudioEngine, EngineState};
use crate::state::PlayerState;
use std::sync::Arc;
use std::time::Duration;
use tilawah_common::{AudioRequest, AudioState, PageTable};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub struct StateReconciler {
    engine: Arc<dyn AudioEngine>,
    state: Arc<PlayerState>,
    pages: Arc<PageTable>,
    stop_debounce: Duration,
    page_change_delay: Duration,
}

impl StateReconciler {
    pub fn new(
        engine: Arc<dyn AudioEngine>,
        state: Arc<PlayerState>,
        pages: Arc<PageTable>,
        stop_debounce: Duration,
        page_change_delay: Duration,
    ) -> Self {
        Self {
            engine,
            state,
            pages,
            stop_debounce,
            page_change_delay,
        }
    }

    /// Run until the engine's notification stream closes.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    async fn run(self) {
        let mut notifications = self.engine.subscribe();
        loop {
            match notifications.recv().await {
                Ok(engine_state) => self.reconcile(engine_state).await,
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    // Stale transitions are worthless; the next notification
                    // carries the current truth.
                    warn!("dropped {missed} engine notifications");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    async fn reconcile(&self, engine_state: EngineState) {
        match engine_state {
            EngineState::Playing => {
                self.state.set_audio_state(AudioState::Playing).await;
                self.sync_display().await;
            }
            EngineState::Paused => {
                self.state.set_audio_state(AudioState::Paused).await;
            }
            EngineState::Stopped | EngineState::Unknown | EngineState::Error => {
                self.confirm_stop().await;
            }
        }
    }

    /// Commit a stop only if the engine still looks stopped after the
    /// debounce window; otherwise it was a between-tracks pulse.
    async fn confirm_stop(&self) {
        tokio::time::sleep(self.stop_debounce).await;
        let current = self.engine.state().await;
        if current.is_stop_like() {
            self.state.set_audio_state(AudioState::Stopped).await;
        } else {
            debug!("ignoring transient stop; engine is {current:?}");
        }
    }

    /// Move the displayed selection (and page, after a beat) to whatever
    /// the engine says it is playing.
    async fn sync_display(&self) {
        let Some(track) = self.engine.current_track().await else {
            return;
        };
        let Some(tag) = track.tag else {
            return;
        };
        let request: AudioRequest = match tag.parse() {
            Ok(request) => request,
            Err(e) => {
                debug!("unreadable track tag '{tag}': {e}");
                return;
            }
        };

        let ayah = request.current.normalized();
        self.state.set_selected_ayah(Some(ayah)).await;

        let page = self.pages.page_for(ayah);
        if page != self.state.current_page().await {
            // Give the just-started audio a moment before yanking the view.
            tokio::time::sleep(self.page_change_delay).await;
            self.state.set_current_page(page).await;
        }
    }
}
