//! Reciter reference data
//!
//! A reciter describes where its audio lives remotely, where it is cached
//! locally, and whether it is stored gapless (one file per surah, seekable
//! only through a timing database) or as one file per ayah.

use serde::{Deserialize, Serialize};

/// Reference data for a single reciter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reciter {
    /// Stable numeric id, embedded in serialized audio requests
    pub id: u32,
    /// Display name, also the settings key value for the active reciter
    pub name: String,
    /// Directory name under the local audio root
    pub subfolder: String,
    /// Remote base URL the audio files are fetched from
    pub server_url: String,
    /// Remote URL of the gapless timing database, when the reciter is gapless
    pub gapless_database_url: Option<String>,
    /// One file per surah (true) versus one file per ayah (false)
    pub is_gapless: bool,
}

/// The set of reciters known to the application.
#[derive(Debug, Clone, Default)]
pub struct ReciterCatalog {
    reciters: Vec<Reciter>,
}

impl ReciterCatalog {
    pub fn new(reciters: Vec<Reciter>) -> Self {
        Self { reciters }
    }

    /// Bundled catalog used when the application ships no custom list.
    pub fn bundled() -> Self {
        Self::new(vec![
            Reciter {
                id: 0,
                name: "Abdul Basit (Murattal)".into(),
                subfolder: "abdul_basit_murattal".into(),
                server_url: "https://everyayah.com/data/Abdul_Basit_Murattal_64kbps".into(),
                gapless_database_url: None,
                is_gapless: false,
            },
            Reciter {
                id: 1,
                name: "Mishary Alafasy".into(),
                subfolder: "mishary_alafasy".into(),
                server_url: "https://everyayah.com/data/Alafasy_64kbps".into(),
                gapless_database_url: None,
                is_gapless: false,
            },
            Reciter {
                id: 2,
                name: "Husary".into(),
                subfolder: "husary".into(),
                server_url: "https://everyayah.com/data/Husary_64kbps".into(),
                gapless_database_url: None,
                is_gapless: false,
            },
            Reciter {
                id: 3,
                name: "Minshawi (Murattal, gapless)".into(),
                subfolder: "minshawi_murattal_gapless".into(),
                server_url: "https://download.quranicaudio.com/quran/muhammad_siddeeq_al-minshaawee".into(),
                gapless_database_url: Some(
                    "https://android.quran.com/data/databases/audio/minshawi_murattal.db".into(),
                ),
                is_gapless: true,
            },
        ])
    }

    pub fn by_name(&self, name: &str) -> Option<&Reciter> {
        self.reciters.iter().find(|r| r.name == name)
    }

    pub fn by_id(&self, id: u32) -> Option<&Reciter> {
        self.reciters.iter().find(|r| r.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reciter> {
        self.reciters.iter()
    }
}
