//! # Tilawah shared types (tilawah-common)
//!
//! Value types and the event system shared between the audio-player crate
//! and the surrounding application: ayah references and lookup tables,
//! reciter reference data, serializable playback requests, and the
//! change-notification bus.

pub mod error;
pub mod events;
pub mod quran;
pub mod reciter;
pub mod request;

pub use error::{Error, Result};
pub use events::{AudioState, EventBus, PlayerEvent};
pub use quran::{AyahRef, PageTable};
pub use reciter::{Reciter, ReciterCatalog};
pub use request::{AudioRequest, LookaheadAmount, RepeatAmount, RepeatCount, RepeatInfo};
