//! Error types shared across the workspace
//!
//! Defines value-level errors using thiserror for clear error propagation.

use thiserror::Error;

/// Error type for shared value types
#[derive(Error, Debug)]
pub enum Error {
    /// Verse reference outside the valid surah/ayah ranges
    #[error("invalid ayah reference: {0}")]
    InvalidAyah(String),

    /// Track tag that does not parse as an audio request
    #[error("malformed audio request tag: {0}")]
    MalformedTag(String),

    /// Inconsistent mushaf geometry supplied for the page table
    #[error("page table error: {0}")]
    PageTable(String),

    /// Unknown reciter name or id
    #[error("unknown reciter: {0}")]
    UnknownReciter(String),
}

/// Convenience Result type using the shared Error
pub type Result<T> = std::result::Result<T, Error>;
