//! Persistent playback settings
//!
//! Typed access to the handful of keys the orchestrator reads at
//! request-build time. Settings are snapshotted into each request; they are
//! never re-read mid-playback.
//!
//! The default store persists to a TOML file with built-in defaults for
//! missing keys. Constructed without a path it is purely in-memory, which is
//! what the tests use.

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tilawah_common::{LookaheadAmount, RepeatAmount};
use tokio::sync::RwLock;
use tracing::debug;

/// Typed get/set contract for the settings the orchestrator consumes.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Display name of the active reciter, if one is selected.
    async fn active_reciter(&self) -> Option<String>;
    async fn set_active_reciter(&self, name: &str) -> Result<()>;

    async fn repeat_enabled(&self) -> bool;
    async fn set_repeat_enabled(&self, enabled: bool) -> Result<()>;

    async fn repeat_amount(&self) -> RepeatAmount;
    async fn set_repeat_amount(&self, amount: RepeatAmount) -> Result<()>;

    /// How many times to repeat before advancing; `0` means unbounded.
    async fn repeat_times(&self) -> u32;
    async fn set_repeat_times(&self, times: u32) -> Result<()>;

    async fn lookahead(&self) -> LookaheadAmount;
    async fn set_lookahead(&self, amount: LookaheadAmount) -> Result<()>;

    /// Prefer streaming a remote database over downloading audio locally.
    async fn prefer_streaming(&self) -> bool;
    async fn set_prefer_streaming(&self, prefer: bool) -> Result<()>;
}

/// On-disk settings document. Missing keys fall back to built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SettingsData {
    #[serde(default)]
    active_reciter: Option<String>,

    #[serde(default)]
    repeat_enabled: bool,

    #[serde(default)]
    repeat_amount: RepeatAmount,

    #[serde(default = "default_repeat_times")]
    repeat_times: u32,

    #[serde(default)]
    lookahead: LookaheadAmount,

    #[serde(default)]
    prefer_streaming: bool,
}

fn default_repeat_times() -> u32 {
    1
}

impl Default for SettingsData {
    fn default() -> Self {
        Self {
            active_reciter: None,
            repeat_enabled: false,
            repeat_amount: RepeatAmount::default(),
            repeat_times: default_repeat_times(),
            lookahead: LookaheadAmount::default(),
            prefer_streaming: false,
        }
    }
}

/// TOML-file-backed settings store.
pub struct TomlSettings {
    data: RwLock<SettingsData>,
    path: Option<PathBuf>,
}

impl TomlSettings {
    /// Load settings from `path`, falling back to defaults when the file
    /// does not exist yet. Writes go back to the same file.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = match tokio::fs::read_to_string(&path).await {
            Ok(text) => toml::from_str(&text)
                .map_err(|e| Error::Settings(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no settings file at {}, using defaults", path.display());
                SettingsData::default()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            data: RwLock::new(data),
            path: Some(path),
        })
    }

    /// Purely in-memory store with default values; nothing is persisted.
    pub fn in_memory() -> Self {
        Self {
            data: RwLock::new(SettingsData::default()),
            path: None,
        }
    }

    async fn persist(&self, data: &SettingsData) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let text = toml::to_string_pretty(data)
            .map_err(|e| Error::Settings(format!("serialize settings: {e}")))?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, text).await?;
        Ok(())
    }

    async fn update<F>(&self, apply: F) -> Result<()>
    where
        F: FnOnce(&mut SettingsData),
    {
        let mut data = self.data.write().await;
        apply(&mut data);
        self.persist(&data).await
    }
}

#[async_trait]
impl SettingsStore for TomlSettings {
    async fn active_reciter(&self) -> Option<String> {
        self.data.read().await.active_reciter.clone()
    }

    async fn set_active_reciter(&self, name: &str) -> Result<()> {
        self.update(|d| d.active_reciter = Some(name.to_string())).await
    }

    async fn repeat_enabled(&self) -> bool {
        self.data.read().await.repeat_enabled
    }

    async fn set_repeat_enabled(&self, enabled: bool) -> Result<()> {
        self.update(|d| d.repeat_enabled = enabled).await
    }

    async fn repeat_amount(&self) -> RepeatAmount {
        self.data.read().await.repeat_amount
    }

    async fn set_repeat_amount(&self, amount: RepeatAmount) -> Result<()> {
        self.update(|d| d.repeat_amount = amount).await
    }

    async fn repeat_times(&self) -> u32 {
        self.data.read().await.repeat_times
    }

    async fn set_repeat_times(&self, times: u32) -> Result<()> {
        self.update(|d| d.repeat_times = times).await
    }

    async fn lookahead(&self) -> LookaheadAmount {
        self.data.read().await.lookahead
    }

    async fn set_lookahead(&self, amount: LookaheadAmount) -> Result<()> {
        self.update(|d| d.lookahead = amount).await
    }

    async fn prefer_streaming(&self) -> bool {
        self.data.read().await.prefer_streaming
    }

    async fn set_prefer_streaming(&self, prefer: bool) -> Result<()> {
        self.update(|d| d.prefer_streaming = prefer).await
    }
}
