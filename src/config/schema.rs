use std::path::PathBuf;

use serde::Deserialize;

/// Top-level widget settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/droplist/config.toml` or `~/.config/droplist/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `DROPLIST__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub validator: ValidatorSettings,
    pub library: LibrarySettings,
    pub ui: UiSettings,
    pub audio: AudioSettings,
    pub logging: LoggingSettings,
}

/// 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidatorSettings {
    /// Largest accepted file, in bytes. Files of exactly this size pass.
    pub max_file_size: u64,
    /// Declared media types accepted outright (case-insensitive).
    pub media_types: Vec<String>,
    /// Filename extensions accepted when the declared type does not match
    /// (case-insensitive, with or without the leading dot).
    pub extensions: Vec<String>,
}

impl Default for ValidatorSettings {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            media_types: [
                "audio/mpeg",
                "audio/mp3",
                "audio/mpeg3",
                "audio/x-mpeg",
                "audio/x-mpeg-3",
                "audio/x-mp3",
                "audio/mpg",
                "audio/mpa",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            extensions: ["mp3", "mp2", "mpga", "mpg", "mpeg"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Whether picked/dropped directories are walked recursively.
    pub recursive: bool,
    /// Whether to follow symlinks while walking a directory.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            recursive: true,
            follow_links: true,
            include_hidden: false,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// How long a notification toast stays on screen (milliseconds).
    pub notification_ms: u64,
    /// Whether mouse capture is enabled (row clicks, remove column, seek bar).
    pub mouse: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ drop audio files here ~ ".to_string(),
            notification_ms: 3000,
            mouse: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
    /// Output volume, 0.0 to 1.0.
    pub volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            quit_fade_out_ms: 300,
            volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log file. The terminal belongs to the UI, so logs never go to stderr.
    pub file: PathBuf,
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: std::env::temp_dir().join("droplist.log"),
            level: "info".to_string(),
        }
    }
}
