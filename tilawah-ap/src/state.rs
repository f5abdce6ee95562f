//! Shared observable state
//!
//! Thread-safe shared state for coordination between the controller, the
//! download coordinator, and the reconciler. Every setter is a no-op when
//! the value is unchanged, and publishes a [`PlayerEvent`] before returning
//! when it is not, so subscribers only ever see real transitions.

use chrono::Utc;
use tilawah_common::{AudioState, AyahRef, EventBus, PlayerEvent};
use tokio::sync::{broadcast, RwLock};

/// State shared by all orchestrator components.
pub struct PlayerState {
    /// Application playback state; written only by the reconciler
    audio_state: RwLock<AudioState>,

    /// Whether an audio download is in flight (the concurrency guard)
    downloading: RwLock<bool>,

    /// Download progress percentage (0-100)
    download_progress: RwLock<u8>,

    /// User-facing repeat flag; `None` until the user touches it
    repeat: RwLock<Option<bool>>,

    /// Currently displayed page (1-based)
    current_page: RwLock<u16>,

    /// Currently selected ayah, if any
    selected_ayah: RwLock<Option<AyahRef>>,

    /// Event broadcaster for change notifications
    events: EventBus,
}

impl PlayerState {
    pub fn new() -> Self {
        Self {
            audio_state: RwLock::new(AudioState::Stopped),
            downloading: RwLock::new(false),
            download_progress: RwLock::new(0),
            repeat: RwLock::new(None),
            current_page: RwLock::new(1),
            selected_ayah: RwLock::new(None),
            events: EventBus::new(100),
        }
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events.subscribe()
    }

    pub async fn audio_state(&self) -> AudioState {
        *self.audio_state.read().await
    }

    pub async fn set_audio_state(&self, new_state: AudioState) {
        let mut guard = self.audio_state.write().await;
        let old_state = *guard;
        if old_state == new_state {
            return;
        }
        *guard = new_state;
        drop(guard);
        self.events.emit_lossy(PlayerEvent::AudioStateChanged {
            old_state,
            new_state,
            timestamp: Utc::now(),
        });
    }

    pub async fn is_downloading(&self) -> bool {
        *self.downloading.read().await
    }

    /// Atomically claim the download guard. Returns `false` when a download
    /// is already in flight, without mutating anything.
    pub async fn begin_download(&self) -> bool {
        let mut guard = self.downloading.write().await;
        if *guard {
            return false;
        }
        *guard = true;
        drop(guard);
        self.events.emit_lossy(PlayerEvent::DownloadingChanged {
            downloading: true,
            timestamp: Utc::now(),
        });
        true
    }

    pub async fn end_download(&self) {
        let mut guard = self.downloading.write().await;
        if !*guard {
            return;
        }
        *guard = false;
        drop(guard);
        self.events.emit_lossy(PlayerEvent::DownloadingChanged {
            downloading: false,
            timestamp: Utc::now(),
        });
    }

    pub async fn download_progress(&self) -> u8 {
        *self.download_progress.read().await
    }

    pub async fn set_download_progress(&self, percent: u8) {
        let percent = percent.min(100);
        let mut guard = self.download_progress.write().await;
        if *guard == percent {
            return;
        }
        *guard = percent;
        drop(guard);
        self.events.emit_lossy(PlayerEvent::DownloadProgress {
            percent,
            timestamp: Utc::now(),
        });
    }

    pub async fn repeat(&self) -> Option<bool> {
        *self.repeat.read().await
    }

    pub async fn set_repeat(&self, repeat: Option<bool>) {
        let mut guard = self.repeat.write().await;
        if *guard == repeat {
            return;
        }
        *guard = repeat;
        drop(guard);
        self.events.emit_lossy(PlayerEvent::RepeatChanged {
            repeat,
            timestamp: Utc::now(),
        });
    }

    pub async fn current_page(&self) -> u16 {
        *self.current_page.read().await
    }

    pub async fn set_current_page(&self, new_page: u16) {
        let mut guard = self.current_page.write().await;
        let old_page = *guard;
        if old_page == new_page {
            return;
        }
        *guard = new_page;
        drop(guard);
        self.events.emit_lossy(PlayerEvent::PageChanged {
            old_page,
            new_page,
            timestamp: Utc::now(),
        });
    }

    pub async fn selected_ayah(&self) -> Option<AyahRef> {
        *self.selected_ayah.read().await
    }

    pub async fn set_selected_ayah(&self, ayah: Option<AyahRef>) {
        let mut guard = self.selected_ayah.write().await;
        if *guard == ayah {
            return;
        }
        *guard = ayah;
        drop(guard);
        self.events.emit_lossy(PlayerEvent::SelectionChanged {
            ayah,
            timestamp: Utc::now(),
        });
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}
