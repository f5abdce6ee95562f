//! File and network primitives
//!
//! The [`MediaIo`] trait is the orchestrator's only view of local storage
//! and the remote file source: existence/size checks, directory creation,
//! and single or batch downloads with incremental progress.
//!
//! [`HttpMediaIo`] is the production implementation over reqwest. Downloads
//! stream through a `.part` temp file and are renamed into place only once
//! complete, so a partially written file is never mistaken for a finished
//! one by later availability checks.

use crate::error::{Error, Result};
use async_trait::async_trait;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

const HTTP_TIMEOUT: Duration = Duration::from_secs(120);
const USER_AGENT: &str = concat!("tilawah/", env!("CARGO_PKG_VERSION"));

/// Incremental transfer progress.
///
/// Units are bytes for single transfers and completed items for batch
/// transfers; `total` is `None` when the remote does not report a length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    pub received: u64,
    pub total: Option<u64>,
}

impl TransferProgress {
    /// Progress as a 0-100 percentage, when the total is known.
    pub fn percent(&self) -> Option<u8> {
        let total = self.total.filter(|&t| t > 0)?;
        Some(((self.received * 100) / total).min(100) as u8)
    }
}

/// Progress callback invoked on every chunk/item.
pub type ProgressFn = dyn Fn(TransferProgress) + Send + Sync;

/// File-system and download contract consumed by the availability checker
/// and the download coordinator.
#[async_trait]
pub trait MediaIo: Send + Sync {
    /// Size of a local file in bytes, or `None` if it does not exist.
    /// Absence is a normal result, never an error.
    async fn file_size(&self, path: &Path) -> Option<u64>;

    async fn ensure_dir(&self, path: &Path) -> Result<()>;

    /// Best-effort removal; missing files are not an error.
    async fn remove_file(&self, path: &Path) -> Result<()>;

    /// Download a single remote file to `dest`, reporting byte progress.
    async fn download(&self, url: &str, dest: &Path, progress: &ProgressFn) -> Result<()>;

    /// Download several files in order, reporting item progress. Stops at
    /// the first failure; already-complete destinations are skipped.
    async fn download_batch(
        &self,
        items: &[(String, PathBuf)],
        progress: &ProgressFn,
    ) -> Result<()>;
}

/// Production [`MediaIo`] over reqwest and tokio::fs.
pub struct HttpMediaIo {
    client: reqwest::Client,
}

impl HttpMediaIo {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(HTTP_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    async fn fetch_to_part_file(
        &self,
        url: &str,
        part: &Path,
        progress: &ProgressFn,
    ) -> Result<()> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let total = response.content_length();

        let mut file = tokio::fs::File::create(part).await?;
        let mut received: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            received += chunk.len() as u64;
            progress(TransferProgress { received, total });
        }
        file.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl MediaIo for HttpMediaIo {
    async fn file_size(&self, path: &Path) -> Option<u64> {
        tokio::fs::metadata(path).await.ok().map(|m| m.len())
    }

    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        tokio::fs::create_dir_all(path).await?;
        Ok(())
    }

    async fn remove_file(&self, path: &Path) -> Result<()> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn download(&self, url: &str, dest: &Path, progress: &ProgressFn) -> Result<()> {
        debug!("downloading {url} -> {}", dest.display());
        let part = dest.with_extension("part");

        let result = self.fetch_to_part_file(url, &part, progress).await;
        if let Err(e) = result {
            // Never leave a partial file where an availability check could
            // find it.
            if let Err(cleanup) = self.remove_file(&part).await {
                warn!("could not remove partial file {}: {cleanup}", part.display());
            }
            return Err(e);
        }

        tokio::fs::rename(&part, dest).await?;
        Ok(())
    }

    async fn download_batch(
        &self,
        items: &[(String, PathBuf)],
        progress: &ProgressFn,
    ) -> Result<()> {
        let total = items.len() as u64;
        for (done, (url, dest)) in items.iter().enumerate() {
            let already = self.file_size(dest).await.unwrap_or(0) > 0;
            if !already {
                self.download(url, dest, &|_| {}).await.map_err(|e| {
                    Error::Download(format!("{url}: {e}"))
                })?;
            }
            progress(TransferProgress {
                received: done as u64 + 1,
                total: Some(total),
            });
        }
        Ok(())
    }
}
