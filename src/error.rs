//! Error types shared by the playlist core.

use std::path::PathBuf;

use thiserror::Error;

/// Contract violations on the Track Store and Playback Controller.
///
/// These are returned to the caller rather than surfaced as notifications:
/// correct UI wiring never produces them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaylistError {
    /// Index is not a valid position in the playlist
    #[error("index {index} out of range for playlist of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Seek requested while nothing is loaded
    #[error("no active track")]
    NoActiveTrack,
}

/// Failures reported by a media engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The playable URL was never issued or has already been revoked
    #[error("playable url {0} is not live")]
    RevokedUrl(String),

    /// The underlying file could not be opened
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was opened but could not be decoded
    #[error("failed to decode {path:?}: {message}")]
    Decode { path: PathBuf, message: String },

    /// The engine does not support seeking in the current source
    #[error("seek failed: {0}")]
    Seek(String),

    /// An operation needed a loaded source
    #[error("no source loaded")]
    NothingLoaded,
}

pub type Result<T> = std::result::Result<T, PlaylistError>;
