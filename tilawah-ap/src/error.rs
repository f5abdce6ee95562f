//! Error types for tilawah-ap
//!
//! Defines module-specific error types using thiserror for clear error
//! propagation. Nothing here is fatal to the process; see the controller for
//! how failures degrade.

use thiserror::Error;

/// Main error type for the tilawah-ap crate
#[derive(Error, Debug)]
pub enum Error {
    /// Settings load/store errors
    #[error("settings error: {0}")]
    Settings(String),

    /// HTTP transfer errors
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// File I/O errors
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Native engine command errors
    #[error("engine error: {0}")]
    Engine(String),

    /// Remote resource missing or truncated
    #[error("download error: {0}")]
    Download(String),

    /// Shared value-type errors (malformed tags, bad references)
    #[error(transparent)]
    Common(#[from] tilawah_common::Error),
}

/// Convenience Result type using the tilawah-ap Error
pub type Result<T> = std::result::Result<T, Error>;
