//! Asset availability checks
//!
//! Reports which of the assets a request needs are already complete on
//! local storage. Side-effect-free apart from file-system reads; a missing
//! file is a normal result, not an error. Completeness is judged by
//! non-zero size so an empty or partially written file never counts.

use crate::media::MediaIo;
use crate::paths::AssetLayout;
use std::path::Path;
use std::sync::Arc;
use tilawah_common::{AudioRequest, AyahRef, PageTable, Reciter};

/// The three independent availability facts for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetAvailability {
    /// The shared verse-timing index is present
    pub timing_index: bool,
    /// The reciter's gapless database is present; vacuously true for
    /// per-ayah reciters (nothing to fetch)
    pub gapless_database: bool,
    /// Every audio file in the request's range is present and non-empty
    pub audio_files: bool,
}

pub struct AvailabilityChecker {
    layout: AssetLayout,
    media: Arc<dyn MediaIo>,
}

impl AvailabilityChecker {
    pub fn new(layout: AssetLayout, media: Arc<dyn MediaIo>) -> Self {
        Self { layout, media }
    }

    async fn complete(&self, path: &Path) -> bool {
        self.media.file_size(path).await.unwrap_or(0) > 0
    }

    pub async fn check(
        &self,
        request: &AudioRequest,
        reciter: &Reciter,
        pages: &PageTable,
    ) -> AssetAvailability {
        let timing_index = self.complete(&self.layout.timing_index_path()).await;

        let gapless_database = match self.layout.gapless_db_path(reciter) {
            Some(path) => self.complete(&path).await,
            None => true,
        };

        let audio_files = self.have_audio_range(request, reciter, pages).await;

        AssetAvailability {
            timing_index,
            gapless_database,
            audio_files,
        }
    }

    async fn have_audio_range(
        &self,
        request: &AudioRequest,
        reciter: &Reciter,
        pages: &PageTable,
    ) -> bool {
        let (from, to) = request.range(pages);

        if reciter.is_gapless {
            for surah in from.surah..=to.surah {
                if !self.complete(&self.layout.surah_file(reciter, surah)).await {
                    return false;
                }
            }
            return true;
        }

        // A request starting at the invocation plays the basmala audio
        // (1:1) before the range proper.
        if request.current.is_invocation()
            && !self
                .complete(&self.layout.ayah_file(reciter, AyahRef::new(1, 1)))
                .await
        {
            return false;
        }

        let mut cursor = Some(from);
        while let Some(ayah) = cursor {
            if ayah > to {
                break;
            }
            if !self.complete(&self.layout.ayah_file(reciter, ayah)).await {
                return false;
            }
            cursor = ayah.next();
        }
        true
    }
}
