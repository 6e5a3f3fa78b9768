use std::time::Duration;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Something the user should be told about. Expected conditions, never
/// faults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    TracksAdded(usize),
    SkippedInvalid(usize),
    Unreadable(usize),
    EmptyPlaylist,
    SeekUnavailable,
    PlaybackError(String),
}

impl Notice {
    pub fn severity(&self) -> Severity {
        match self {
            Notice::TracksAdded(_) => Severity::Info,
            Notice::SkippedInvalid(_)
            | Notice::Unreadable(_)
            | Notice::EmptyPlaylist
            | Notice::SeekUnavailable => Severity::Warning,
            Notice::PlaybackError(_) => Severity::Error,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notice::TracksAdded(n) => format!("Added {n} track(s)"),
            Notice::SkippedInvalid(n) => format!("Skipped {n} invalid file(s)"),
            Notice::Unreadable(n) => format!("Could not read {n} path(s)"),
            Notice::EmptyPlaylist => "Playlist is empty. Add some audio files first".to_string(),
            Notice::SeekUnavailable => "Seeking is not available for this track".to_string(),
            Notice::PlaybackError(msg) => format!("Playback error: {msg}"),
        }
    }
}

/// A toast to show for `ttl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub ttl: Duration,
}

impl Notification {
    pub fn from_notice(notice: &Notice, ttl: Duration) -> Self {
        Self {
            message: notice.message(),
            severity: notice.severity(),
            ttl,
        }
    }
}
