//! Playback request construction
//!
//! Builds a fresh [`AudioRequest`] from the current selection, page, and a
//! snapshot of the persisted settings. Settings are read exactly once here;
//! changing them afterwards never affects a request already built.

use crate::settings::SettingsStore;
use crate::state::PlayerState;
use std::sync::Arc;
use tilawah_common::{
    AudioRequest, AyahRef, Error, PageTable, Reciter, ReciterCatalog, RepeatCount, RepeatInfo,
    Result,
};
use tracing::{debug, warn};

/// A request paired with the reciter it was built for.
#[derive(Debug, Clone)]
pub struct BuiltRequest {
    pub request: AudioRequest,
    pub reciter: Reciter,
}

pub struct RequestBuilder {
    state: Arc<PlayerState>,
    catalog: ReciterCatalog,
    pages: Arc<PageTable>,
}

impl RequestBuilder {
    pub fn new(state: Arc<PlayerState>, catalog: ReciterCatalog, pages: Arc<PageTable>) -> Self {
        Self {
            state,
            catalog,
            pages,
        }
    }

    /// Build a request starting at `explicit`, or at the current selection,
    /// or failing that at the first ayah of the current page.
    ///
    /// Returns `Ok(None)` when no reciter is selected; playback simply
    /// cannot start until the user picks one.
    pub async fn build(
        &self,
        explicit: Option<AyahRef>,
        settings: &dyn SettingsStore,
    ) -> Result<Option<BuiltRequest>> {
        let Some(name) = settings.active_reciter().await else {
            warn!("no reciter selected, not starting playback");
            return Ok(None);
        };
        let reciter = self
            .catalog
            .by_name(&name)
            .ok_or_else(|| Error::UnknownReciter(name.clone()))?
            .clone();

        let start = match explicit {
            Some(ayah) => ayah,
            None => match self.state.selected_ayah().await {
                Some(ayah) => ayah,
                None => self.pages.bounds(self.state.current_page().await).0,
            },
        };
        if !start.is_valid() {
            return Err(Error::InvalidAyah(start.to_string()));
        }
        let start = with_invocation_sentinel(start);

        let repeat = if settings.repeat_enabled().await {
            let count = match settings.repeat_times().await {
                0 => RepeatCount::Unbounded,
                n => RepeatCount::Times(n),
            };
            Some(RepeatInfo {
                amount: settings.repeat_amount().await,
                count,
            })
        } else {
            None
        };

        let request = AudioRequest::new(reciter.id, start, repeat, settings.lookahead().await);
        debug!("built request {request} for {}", reciter.name);
        Ok(Some(BuiltRequest { request, reciter }))
    }
}

/// Starting at the first ayah of a surah that opens with the basmala means
/// starting at the basmala itself, encoded as ayah 0. Al-Fatiha counts the
/// basmala as its first ayah and At-Tawbah has none, so both keep ayah 1.
fn with_invocation_sentinel(ayah: AyahRef) -> AyahRef {
    if ayah.ayah == 1 && tilawah_common::quran::has_basmala(ayah.surah) {
        AyahRef::new(ayah.surah, 0)
    } else {
        ayah
    }
}
