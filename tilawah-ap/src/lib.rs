//! # Tilawah Audio Player (tilawah-ap)
//!
//! Playback orchestration for Quran recitation audio: decides what to play,
//! makes sure the files are local, hands tracks to a native audio engine,
//! and keeps the application's view of playback state honest against the
//! engine's noisy notifications.
//!
//! The engine itself is abstract ([`engine::AudioEngine`]); this crate ships
//! only a logging implementation and expects platform glue to supply a real
//! one.

pub mod availability;
pub mod builder;
pub mod controller;
pub mod download;
pub mod engine;
pub mod error;
pub mod handoff;
pub mod media;
pub mod paths;
pub mod reconciler;
pub mod settings;
pub mod state;

pub use controller::{
    AudioController, ControllerConfig, ErrorSink, LogErrorSink, DOWNLOAD_FAILED_MESSAGE,
};
pub use error::{Error, Result};
pub use state::PlayerState;
