//! The seam between the playback controller and whatever actually makes sound.

use std::time::Duration;

use crate::error::EngineError;

/// Minimal contract the controller needs from a media engine.
///
/// Sources are addressed by playable URL; the engine resolves them itself.
pub trait MediaEngine {
    /// Replace the current source with the file behind `url`. The new source
    /// starts paused at position zero.
    fn load(&mut self, url: &str) -> Result<(), EngineError>;

    /// Start or resume the loaded source.
    fn play(&mut self) -> Result<(), EngineError>;

    fn pause(&mut self);

    /// Stop and forget the current source.
    fn unload(&mut self);

    fn seek(&mut self, position: Duration) -> Result<(), EngineError>;

    /// Total length of the loaded source, once known.
    fn duration(&self) -> Option<Duration>;

    fn is_loaded(&self) -> bool;
}

/// Notifications a media engine raises on its own clock.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineSignal {
    /// Periodic playback clock tick.
    TimeUpdate {
        position: Duration,
        duration: Option<Duration>,
    },
    /// The duration of a freshly loaded source became known (or is unknown).
    MetadataLoaded { duration: Option<Duration> },
    /// The source played to its natural end.
    Ended,
    /// Playback failed after it had started.
    Error(String),
}
