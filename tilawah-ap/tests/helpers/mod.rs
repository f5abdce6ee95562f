//! Shared test doubles for the orchestration tests: a scriptable engine, an
//! in-memory media layer, and a recording error sink.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tilawah_ap::controller::{AudioController, ControllerConfig, ErrorSink};
use tilawah_ap::engine::{AudioEngine, EngineState, EngineTrack};
use tilawah_ap::error::{Error, Result};
use tilawah_ap::media::{MediaIo, ProgressFn, TransferProgress};
use tilawah_ap::paths::AssetLayout;
use tilawah_ap::settings::{SettingsStore, TomlSettings};
use tilawah_ap::state::PlayerState;
use tokio::sync::broadcast;
use tokio::sync::RwLock;

/// Short debounce so tests do not sit through real half-second waits.
pub const TICK: Duration = Duration::from_millis(10);

/// Long enough for every debounce and delay in a test to have elapsed.
pub async fn settle() {
    tokio::time::sleep(TICK * 10).await;
}

/// Engine double whose notification stream is decoupled from its reported
/// state, so tests can emit the spurious pulses real engines produce.
pub struct FakeEngine {
    state: RwLock<EngineState>,
    track: RwLock<Option<EngineTrack>>,
    position: RwLock<Duration>,
    notifications: broadcast::Sender<EngineState>,
    commands: Mutex<Vec<String>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        let (notifications, _) = broadcast::channel(32);
        Self {
            state: RwLock::new(EngineState::Stopped),
            track: RwLock::new(None),
            position: RwLock::new(Duration::ZERO),
            notifications,
            commands: Mutex::new(Vec::new()),
        }
    }

    fn log(&self, command: &str) {
        self.commands.lock().unwrap().push(command.to_string());
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    /// Send a notification without touching the reported state.
    pub fn notify(&self, state: EngineState) {
        let _ = self.notifications.send(state);
    }

    /// Change the reported state without notifying.
    pub async fn force_state(&self, state: EngineState) {
        *self.state.write().await = state;
    }
}

#[async_trait]
impl AudioEngine for FakeEngine {
    async fn play(&self) -> Result<()> {
        self.log("play");
        *self.state.write().await = EngineState::Playing;
        self.notify(EngineState::Playing);
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        self.log("pause");
        *self.state.write().await = EngineState::Paused;
        self.notify(EngineState::Paused);
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.log("stop");
        *self.state.write().await = EngineState::Stopped;
        self.notify(EngineState::Stopped);
        Ok(())
    }

    async fn position(&self) -> Duration {
        *self.position.read().await
    }

    async fn set_position(&self, position: Duration) -> Result<()> {
        self.log("set_position");
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
        self.log("set_track");
        *self.track.write().await = Some(track);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<EngineState> {
        self.notifications.subscribe()
    }
}

/// Media double backed by an in-memory file set; downloads append to a log
/// and can be failed by URL substring.
pub struct FakeMediaIo {
    files: Mutex<HashSet<PathBuf>>,
    downloaded: Mutex<Vec<String>>,
    ensured: Mutex<Vec<PathBuf>>,
    fail_matching: Mutex<Option<String>>,
}

impl FakeMediaIo {
    pub fn new() -> Self {
        Self {
            files: Mutex::new(HashSet::new()),
            downloaded: Mutex::new(Vec::new()),
            ensured: Mutex::new(Vec::new()),
            fail_matching: Mutex::new(None),
        }
    }

    /// Mark a local file as already present and complete.
    pub fn seed(&self, path: PathBuf) {
        self.files.lock().unwrap().insert(path);
    }

    /// Make every download whose URL contains `fragment` fail.
    pub fn fail_urls_containing(&self, fragment: &str) {
        *self.fail_matching.lock().unwrap() = Some(fragment.to_string());
    }

    pub fn downloaded(&self) -> Vec<String> {
        self.downloaded.lock().unwrap().clone()
    }

    /// Directories whose creation was requested, in order.
    pub fn ensured_dirs(&self) -> Vec<PathBuf> {
        self.ensured.lock().unwrap().clone()
    }

    fn try_fetch(&self, url: &str, dest: &Path) -> Result<()> {
        if let Some(fragment) = self.fail_matching.lock().unwrap().as_deref() {
            if url.contains(fragment) {
                return Err(Error::Download(format!("injected failure for {url}")));
            }
        }
        self.downloaded.lock().unwrap().push(url.to_string());
        self.files.lock().unwrap().insert(dest.to_path_buf());
        Ok(())
    }
}

#[async_trait]
impl MediaIo for FakeMediaIo {
    async fn file_size(&self, path: &Path) -> Option<u64> {
        self.files.lock().unwrap().contains(path).then_some(1)
    }

    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        self.ensured.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    async fn remove_file(&self, path: &Path) -> Result<()> {
        self.files.lock().unwrap().remove(path);
        Ok(())
    }

    async fn download(&self, url: &str, dest: &Path, progress: &ProgressFn) -> Result<()> {
        self.try_fetch(url, dest)?;
        progress(TransferProgress {
            received: 1,
            total: Some(1),
        });
        Ok(())
    }

    async fn download_batch(
        &self,
        items: &[(String, PathBuf)],
        progress: &ProgressFn,
    ) -> Result<()> {
        let total = items.len() as u64;
        for (done, (url, dest)) in items.iter().enumerate() {
            if !self.files.lock().unwrap().contains(dest) {
                self.try_fetch(url, dest)?;
            }
            progress(TransferProgress {
                received: done as u64 + 1,
                total: Some(total),
            });
        }
        Ok(())
    }
}

/// Error sink that records every reported message.
#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl ErrorSink for RecordingSink {
    fn report(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

pub const AUDIO_ROOT: &str = "/test/tilawah";

pub fn layout() -> AssetLayout {
    AssetLayout::new(AUDIO_ROOT)
}

/// Small page table: page 1 = Al-Fatiha, page 2 = 2:1-2:5, page 3 = rest.
pub fn page_table() -> Arc<tilawah_common::PageTable> {
    Arc::new(
        tilawah_common::PageTable::from_starts(vec![
            tilawah_common::AyahRef::new(1, 1),
            tilawah_common::AyahRef::new(2, 1),
            tilawah_common::AyahRef::new(2, 6),
        ])
        .unwrap(),
    )
}

pub struct Harness {
    pub controller: AudioController,
    pub engine: Arc<FakeEngine>,
    pub media: Arc<FakeMediaIo>,
    pub settings: Arc<TomlSettings>,
    pub state: Arc<PlayerState>,
    pub errors: Arc<RecordingSink>,
}

/// Controller wired to the fakes, with a reciter already selected and fast
/// debounce timings. The reconciler is running.
pub async fn harness() -> Harness {
    let settings = Arc::new(TomlSettings::in_memory());
    settings
        .set_active_reciter("Abdul Basit (Murattal)")
        .await
        .unwrap();
    harness_with_settings(settings)
}

/// Like [`harness`] but over caller-provided settings (e.g. no reciter).
pub fn harness_with_settings(settings: Arc<TomlSettings>) -> Harness {
    let engine = Arc::new(FakeEngine::new());
    let media = Arc::new(FakeMediaIo::new());
    let state = Arc::new(PlayerState::new());
    let errors = Arc::new(RecordingSink::default());

    let controller = AudioController::new(
        Arc::clone(&engine) as Arc<dyn AudioEngine>,
        Arc::clone(&state),
        Arc::clone(&settings) as Arc<dyn SettingsStore>,
        Arc::clone(&media) as Arc<dyn MediaIo>,
        tilawah_common::ReciterCatalog::bundled(),
        page_table(),
        layout(),
        Arc::clone(&errors) as Arc<dyn ErrorSink>,
        ControllerConfig {
            stop_debounce: TICK,
            page_change_delay: TICK,
        },
    );
    let _ = controller.start();

    Harness {
        controller,
        engine,
        media,
        settings,
        state,
        errors,
    }
}
