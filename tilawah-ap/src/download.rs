//! Download coordination
//!
//! Sequences the minimal set of fetches needed to satisfy a playback
//! request: verse-timing index, then (for gapless reciters) the timing
//! database, then the audio files themselves. Steps are strictly ordered
//! and short-circuit on the first failure.
//!
//! Only one download runs at a time; a request arriving while another is in
//! flight is refused outright, not queued. There is no cancellation for an
//! in-flight download: it runs to completion or failure, and a new request
//! is refused until it does.

use crate::availability::AvailabilityChecker;
use crate::error::Result;
use crate::media::{MediaIo, TransferProgress};
use crate::paths::AssetLayout;
use crate::state::PlayerState;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tilawah_common::{AudioRequest, AyahRef, PageTable, Reciter};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Result of asking the coordinator to make a request playable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Everything the request needs is now locally available
    Ready,
    /// Another download is in flight; nothing was started (silent refusal)
    Busy,
    /// A fetch failed; the operation was aborted and cleaned up
    Failed,
}

pub struct DownloadCoordinator {
    layout: AssetLayout,
    media: Arc<dyn MediaIo>,
    checker: AvailabilityChecker,
    state: Arc<PlayerState>,
    pages: Arc<PageTable>,
    timing_index_url: String,
}

impl DownloadCoordinator {
    pub fn new(
        layout: AssetLayout,
        media: Arc<dyn MediaIo>,
        state: Arc<PlayerState>,
        pages: Arc<PageTable>,
        timing_index_url: String,
    ) -> Self {
        let checker = AvailabilityChecker::new(layout.clone(), Arc::clone(&media));
        Self {
            layout,
            media,
            checker,
            state,
            pages,
            timing_index_url,
        }
    }

    /// Fetch whatever the request is missing, gating each step on the one
    /// before it. Failures are logged here and reported as
    /// [`FetchOutcome::Failed`]; the caller owns user-facing presentation.
    pub async fn ensure_available(
        &self,
        request: &AudioRequest,
        reciter: &Reciter,
    ) -> FetchOutcome {
        if !self.state.begin_download().await {
            // Taxonomy (d): concurrent request, silently ignored.
            return FetchOutcome::Busy;
        }

        let outcome = match self.run(request, reciter).await {
            Ok(()) => FetchOutcome::Ready,
            Err(e) => {
                error!("audio download failed for {}: {e}", request.current);
                FetchOutcome::Failed
            }
        };

        self.state.end_download().await;
        outcome
    }

    async fn run(&self, request: &AudioRequest, reciter: &Reciter) -> Result<()> {
        self.state.set_download_progress(0).await;
        let availability = self.checker.check(request, reciter, &self.pages).await;

        if !availability.timing_index {
            info!("fetching verse-timing index");
            // The index lives at the storage root, which may not exist yet
            // on a fresh install.
            self.media.ensure_dir(self.layout.root()).await?;
            self.fetch_single(&self.timing_index_url, &self.layout.timing_index_path())
                .await?;
        }

        // Only ever false for a gapless reciter with a database URL, so
        // both lookups below are Some.
        if !availability.gapless_database {
            if let (Some(url), Some(dest)) = (
                reciter.gapless_database_url.as_deref(),
                self.layout.gapless_db_path(reciter),
            ) {
                info!("fetching gapless database for {}", reciter.name);
                self.media.ensure_dir(&self.layout.reciter_dir(reciter)).await?;
                self.fetch_single(url, &dest).await?;
            }
        }

        if !availability.audio_files {
            let (from, to) = request.range(&self.pages);
            info!(
                "fetching audio for {} ({from} through {to})",
                reciter.name
            );
            self.media.ensure_dir(&self.layout.reciter_dir(reciter)).await?;
            let items = self.audio_items(request, reciter);
            self.fetch_batch(&items).await?;
        }

        self.state.set_download_progress(100).await;
        Ok(())
    }

    /// Remote/local pairs covering the request's range, in playback order.
    fn audio_items(&self, request: &AudioRequest, reciter: &Reciter) -> Vec<(String, PathBuf)> {
        let (from, to) = request.range(&self.pages);
        let mut items = Vec::new();

        if reciter.is_gapless {
            for surah in from.surah..=to.surah {
                items.push((
                    self.surah_url(reciter, surah),
                    self.layout.surah_file(reciter, surah),
                ));
            }
        } else {
            // The invocation plays the basmala audio (1:1) first
            if request.current.is_invocation() {
                let basmala = AyahRef::new(1, 1);
                items.push((
                    self.layout.ayah_url(reciter, basmala),
                    self.layout.ayah_file(reciter, basmala),
                ));
            }
            let mut cursor = Some(from);
            while let Some(ayah) = cursor {
                if ayah > to {
                    break;
                }
                items.push((
                    self.layout.ayah_url(reciter, ayah),
                    self.layout.ayah_file(reciter, ayah),
                ));
                cursor = ayah.next();
            }
        }
        items
    }

    fn surah_url(&self, reciter: &Reciter, surah: u16) -> String {
        self.layout.surah_url(reciter, surah)
    }

    async fn fetch_single(&self, url: &str, dest: &Path) -> Result<()> {
        let (tx, rx) = mpsc::unbounded_channel();
        let forwarder = self.spawn_progress_forwarder(rx);
        let report = move |p: TransferProgress| {
            let _ = tx.send(p);
        };

        let result = self.media.download(url, dest, &report).await;

        drop(report);
        let _ = forwarder.await;
        result
    }

    async fn fetch_batch(&self, items: &[(String, PathBuf)]) -> Result<()> {
        let (tx, rx) = mpsc::unbounded_channel();
        let forwarder = self.spawn_progress_forwarder(rx);
        let report = move |p: TransferProgress| {
            let _ = tx.send(p);
        };

        let result = self.media.download_batch(items, &report).await;

        drop(report);
        let _ = forwarder.await;
        result
    }

    /// Bridge sync progress callbacks into the async observable state.
    fn spawn_progress_forwarder(
        &self,
        mut rx: mpsc::UnboundedReceiver<TransferProgress>,
    ) -> JoinHandle<()> {
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            while let Some(progress) = rx.recv().await {
                if let Some(percent) = progress.percent() {
                    state.set_download_progress(percent).await;
                }
            }
        })
    }
}
