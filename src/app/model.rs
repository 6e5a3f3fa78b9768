//! Application model types: `App`, `InputMode` and `Toast`.

use std::time::Instant;

use crate::player::{Progress, Severity, WidgetEvent};
use crate::playlist::PlaylistSnapshot;

/// Toasts kept on screen at once; older ones are dropped first.
pub const MAX_TOASTS: usize = 4;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a file or directory path to add.
    PathPrompt,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
    pub expires_at: Instant,
}

/// The main application model.
#[derive(Debug, Default)]
pub struct App {
    pub playlist: PlaylistSnapshot,
    pub cursor: usize,
    /// Cursor jumps to the active track whenever it changes.
    pub follow_playback: bool,
    pub playing: bool,
    pub now_playing: Option<String>,
    pub progress: Progress,
    pub mode: InputMode,
    pub prompt: String,
    toasts: Vec<Toast>,
}

impl App {
    pub fn new() -> Self {
        Self {
            follow_playback: true,
            ..Self::default()
        }
    }

    /// Fold one controller event into the view model.
    pub fn apply(&mut self, event: WidgetEvent, now: Instant) {
        match event {
            WidgetEvent::PlaylistChanged(snapshot) => {
                self.playlist = snapshot;
                if self.follow_playback {
                    if let Some(active) = self.playlist.active {
                        self.cursor = active;
                    }
                }
                self.clamp_cursor();
            }
            WidgetEvent::PlayStateChanged(playing) => self.playing = playing,
            WidgetEvent::NowPlaying(name) => self.now_playing = name,
            WidgetEvent::Progress(progress) => self.progress = progress,
            WidgetEvent::Notify(n) => {
                self.toasts.push(Toast {
                    message: n.message,
                    severity: n.severity,
                    expires_at: now + n.ttl,
                });
                if self.toasts.len() > MAX_TOASTS {
                    let excess = self.toasts.len() - MAX_TOASTS;
                    self.toasts.drain(..excess);
                }
            }
        }
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Drop expired toasts. Returns true if any were removed.
    pub fn prune_toasts(&mut self, now: Instant) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.expires_at > now);
        self.toasts.len() != before
    }

    pub fn has_tracks(&self) -> bool {
        !self.playlist.names.is_empty()
    }

    /// Index under the cursor, if the playlist is not empty.
    pub fn cursor_index(&self) -> Option<usize> {
        self.has_tracks().then_some(self.cursor)
    }

    /// Move the cursor down, wrapping to the top.
    pub fn next(&mut self) {
        let len = self.playlist.names.len();
        if len > 0 {
            self.cursor = (self.cursor + 1) % len;
        }
    }

    /// Move the cursor up, wrapping to the bottom.
    pub fn prev(&mut self) {
        let len = self.playlist.names.len();
        if len > 0 {
            self.cursor = (self.cursor + len - 1) % len;
        }
    }

    pub fn first(&mut self) {
        self.cursor = 0;
    }

    pub fn last(&mut self) {
        self.cursor = self.playlist.names.len().saturating_sub(1);
    }

    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }

    pub fn open_prompt(&mut self) {
        self.mode = InputMode::PathPrompt;
        self.prompt.clear();
    }

    pub fn cancel_prompt(&mut self) {
        self.mode = InputMode::Normal;
        self.prompt.clear();
    }

    pub fn push_prompt_char(&mut self, c: char) {
        self.prompt.push(c);
    }

    pub fn push_prompt_str(&mut self, s: &str) {
        self.prompt.extend(s.chars().filter(|c| !c.is_control()));
    }

    pub fn pop_prompt_char(&mut self) {
        self.prompt.pop();
    }

    /// Close the prompt and hand back what was typed, if anything.
    pub fn submit_prompt(&mut self) -> Option<String> {
        self.mode = InputMode::Normal;
        let text = std::mem::take(&mut self.prompt);
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    fn clamp_cursor(&mut self) {
        let len = self.playlist.names.len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }
}
