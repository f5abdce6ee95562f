//! Local paths and remote URLs for audio assets
//!
//! Per-ayah reciters store one file per ayah named `SSSAAA.mp3` (zero-padded
//! surah then ayah); gapless reciters store one file per surah named
//! `SSS.mp3` plus a timing database next to them. The verse-timing index is
//! shared across reciters and lives at the storage root.

use std::path::{Path, PathBuf};
use tilawah_common::{AyahRef, Reciter};

/// Default remote source for the verse-timing index.
pub const DEFAULT_TIMING_INDEX_URL: &str =
    "https://android.quran.com/data/databases/ayahinfo.db";

const TIMING_INDEX_FILE: &str = "ayahinfo.db";
const AUDIO_DIR: &str = "audio";

/// Resolves where every asset lives, locally and remotely.
#[derive(Debug, Clone)]
pub struct AssetLayout {
    root: PathBuf,
}

impl AssetLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Local path of the shared verse-timing index.
    pub fn timing_index_path(&self) -> PathBuf {
        self.root.join(TIMING_INDEX_FILE)
    }

    /// Local storage root for one reciter's audio.
    pub fn reciter_dir(&self, reciter: &Reciter) -> PathBuf {
        self.root.join(AUDIO_DIR).join(&reciter.subfolder)
    }

    /// Local path of a gapless reciter's timing database, named after the
    /// last segment of its remote URL.
    pub fn gapless_db_path(&self, reciter: &Reciter) -> Option<PathBuf> {
        let url = reciter.gapless_database_url.as_deref()?;
        let file = url.rsplit('/').next().unwrap_or(url);
        Some(self.reciter_dir(reciter).join(file))
    }

    /// Local path of a single-ayah audio file (`SSSAAA.mp3`).
    pub fn ayah_file(&self, reciter: &Reciter, ayah: AyahRef) -> PathBuf {
        self.reciter_dir(reciter)
            .join(format!("{:03}{:03}.mp3", ayah.surah, ayah.ayah))
    }

    /// Local path of a gapless per-surah file (`SSS.mp3`).
    pub fn surah_file(&self, reciter: &Reciter, surah: u16) -> PathBuf {
        self.reciter_dir(reciter).join(format!("{surah:03}.mp3"))
    }

    /// Remote URL of a single-ayah audio file.
    pub fn ayah_url(&self, reciter: &Reciter, ayah: AyahRef) -> String {
        format!(
            "{}/{:03}{:03}.mp3",
            reciter.server_url.trim_end_matches('/'),
            ayah.surah,
            ayah.ayah
        )
    }

    /// Remote URL of a gapless per-surah file.
    pub fn surah_url(&self, reciter: &Reciter, surah: u16) -> String {
        format!("{}/{surah:03}.mp3", reciter.server_url.trim_end_matches('/'))
    }

    /// Local path the engine should play for a request's starting ayah.
    ///
    /// The invocation sentinel maps to 1:1 (the basmala audio); gapless
    /// reciters play from the surah file.
    pub fn track_path(&self, reciter: &Reciter, ayah: AyahRef) -> PathBuf {
        let effective = if ayah.is_invocation() {
            AyahRef::new(1, 1)
        } else {
            ayah
        };
        if reciter.is_gapless {
            self.surah_file(reciter, effective.surah)
        } else {
            self.ayah_file(reciter, effective)
        }
    }
}
