//! The Playback Controller: the only code that talks to the media engine.
//!
//! States are `Idle` (nothing selected), `Loaded+Paused` and
//! `Loaded+Playing`. Every public method leaves the state consistent before
//! it returns, so engine signals handled afterwards always see a settled
//! state.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use crate::audio::{EngineSignal, MediaEngine};
use crate::error::{EngineError, PlaylistError, Result};
use crate::library::{FileCandidate, Track, Validator};
use crate::playlist::{Playlist, Removal};

use super::events::WidgetEvent;
use super::notice::{Notice, Notification, Severity};
use super::progress::Progress;

pub struct Controller<E: MediaEngine> {
    playlist: Playlist,
    validator: Validator,
    engine: E,
    is_playing: bool,
    position: Duration,
    duration: Option<Duration>,
    notification_ttl: Duration,
    subscribers: Vec<Sender<WidgetEvent>>,
}

impl<E: MediaEngine> Controller<E> {
    pub fn new(validator: Validator, engine: E, notification_ttl: Duration) -> Self {
        Self {
            playlist: Playlist::new(),
            validator,
            engine,
            is_playing: false,
            position: Duration::ZERO,
            duration: None,
            notification_ttl,
            subscribers: Vec::new(),
        }
    }

    /// Receive every `WidgetEvent` raised from now on.
    pub fn subscribe(&mut self) -> Receiver<WidgetEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    #[cfg(test)]
    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    #[cfg(test)]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn current(&self) -> Option<usize> {
        self.playlist.current()
    }

    pub fn progress(&self) -> Progress {
        Progress::compute(self.position, self.duration)
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn now_playing(&self) -> Option<&Track> {
        self.playlist.current_track()
    }

    /// Extensions the validator accepts, used to filter directory walks.
    pub fn accepted_extensions(&self) -> &[String] {
        self.validator.extensions()
    }

    // ----- inputs from the presentation layer -----

    /// Validate and queue picked or dropped files. Returns how many were
    /// accepted.
    pub fn add_files(&mut self, files: Vec<FileCandidate>) -> usize {
        let report = self.validator.validate_all(files);
        for rejected in &report.rejected {
            log::info!("rejected {}: {}", rejected.name, rejected.reason);
        }

        if report.rejected_count() > 0 {
            self.notify(Notice::SkippedInvalid(report.rejected_count()));
        }

        let accepted = report.accepted_count();
        if accepted > 0 {
            self.notify(Notice::TracksAdded(accepted));
            self.add_tracks(report.accepted);
        }
        accepted
    }

    /// Append already-validated tracks. Playback starts at the first track
    /// when the playlist was empty before.
    pub fn add_tracks(&mut self, tracks: Vec<Track>) {
        let was_empty = self.playlist.is_empty();
        let len = self.playlist.add(tracks);
        log::debug!("playlist now has {len} track(s)");
        self.emit_playlist();

        if was_empty && len > 0 {
            if let Err(e) = self.load_track(0) {
                log::error!("autoplay after first add failed: {e}");
            }
        }
    }

    /// Select `index`, hand it to the engine and start playing.
    pub fn load_track(&mut self, index: usize) -> Result<()> {
        let track = self.playlist.select(index)?;
        let name = track.display_name().to_string();
        log::info!("loading #{index} {name} ({} bytes)", track.size());

        self.position = Duration::ZERO;
        self.duration = None;

        if let Err(e) = self.engine.load(track.url().as_str()) {
            log::error!("engine refused {name}: {e}");
            self.go_idle();
            self.notify(Notice::PlaybackError(format!("cannot play {name}")));
            return Ok(());
        }
        self.duration = self.engine.duration();

        match self.engine.play() {
            Ok(()) => self.is_playing = true,
            Err(e) => self.playback_failed(&e),
        }

        self.emit_playlist();
        self.emit_now_playing();
        self.emit_play_state();
        self.emit_progress();
        Ok(())
    }

    pub fn toggle_play(&mut self) -> Result<()> {
        let Some(cur) = self.playlist.current() else {
            if self.playlist.is_empty() {
                self.notify(Notice::EmptyPlaylist);
                return Ok(());
            }
            return self.load_track(0);
        };

        if self.is_playing {
            self.engine.pause();
            self.is_playing = false;
            self.emit_play_state();
            return Ok(());
        }

        if !self.engine.is_loaded() {
            // The engine dropped the source after an error; start it again.
            return self.load_track(cur);
        }
        match self.engine.play() {
            Ok(()) => self.is_playing = true,
            Err(e) => self.playback_failed(&e),
        }
        self.emit_play_state();
        Ok(())
    }

    /// Previous track, wrapping from the first (or from `Idle`) to the last.
    pub fn play_prev(&mut self) -> Result<()> {
        let len = self.playlist.len();
        if len == 0 {
            self.notify(Notice::EmptyPlaylist);
            return Ok(());
        }
        let target = match self.playlist.current() {
            Some(cur) if cur > 0 => cur - 1,
            _ => len - 1,
        };
        self.load_track(target)
    }

    /// Next track, wrapping from the last to the first. From `Idle` this is
    /// the first track.
    pub fn play_next(&mut self) -> Result<()> {
        let len = self.playlist.len();
        if len == 0 {
            self.notify(Notice::EmptyPlaylist);
            return Ok(());
        }
        let target = match self.playlist.current() {
            Some(cur) if cur + 1 < len => cur + 1,
            _ => 0,
        };
        self.load_track(target)
    }

    /// Detach the engine and return to `Idle`, keeping the playlist.
    pub fn stop(&mut self) {
        self.go_idle();
    }

    /// Seek to `fraction` (0 to 1) of the loaded track.
    ///
    /// With no known duration yet this does nothing.
    pub fn seek_to(&mut self, fraction: f64) -> Result<()> {
        if self.playlist.current().is_none() {
            return Err(PlaylistError::NoActiveTrack);
        }

        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let Some(duration) = self
            .duration
            .or_else(|| self.engine.duration())
            .filter(|d| !d.is_zero())
        else {
            log::debug!("seek ignored, duration unknown");
            return Ok(());
        };

        let target = duration.mul_f64(fraction);
        match self.engine.seek(target) {
            Ok(()) => {
                self.position = target;
                self.emit_progress();
            }
            Err(e) => {
                log::warn!("seek to {target:?} failed: {e}");
                self.notify(Notice::SeekUnavailable);
            }
        }
        Ok(())
    }

    /// Remove the track at `index`, keeping playback consistent.
    pub fn remove_track(&mut self, index: usize) -> Result<()> {
        let (removed, removal) = self.playlist.remove_at(index)?;
        log::info!("removed #{index} {} ({removal:?})", removed.display_name());

        match removal {
            Removal::WasCurrent { next: Some(next) } => self.load_track(next)?,
            Removal::WasCurrent { next: None } => self.go_idle(),
            Removal::BeforeCurrent | Removal::AfterCurrent | Removal::NoSelection => {
                self.emit_playlist()
            }
        }

        // The engine has been detached or moved on; now the URL can go.
        drop(removed);
        Ok(())
    }

    /// Raise a user-facing notification.
    pub fn notify(&mut self, notice: Notice) {
        let notification = Notification::from_notice(&notice, self.notification_ttl);
        match notification.severity {
            Severity::Info => log::info!("{}", notification.message),
            Severity::Warning => log::warn!("{}", notification.message),
            Severity::Error => log::error!("{}", notification.message),
        }
        self.emit(WidgetEvent::Notify(notification));
    }

    // ----- inbound engine notifications -----

    pub fn handle_signal(&mut self, signal: EngineSignal) {
        match signal {
            EngineSignal::TimeUpdate { position, duration } => {
                self.on_time_update(position, duration)
            }
            EngineSignal::MetadataLoaded { duration } => self.on_metadata_loaded(duration),
            EngineSignal::Ended => self.on_ended(),
            EngineSignal::Error(msg) => self.on_error(&msg),
        }
    }

    pub fn on_time_update(&mut self, position: Duration, duration: Option<Duration>) {
        if self.playlist.current().is_none() {
            return;
        }
        self.position = position;
        if duration.is_some() {
            self.duration = duration;
        }
        self.emit_progress();
    }

    pub fn on_metadata_loaded(&mut self, duration: Option<Duration>) {
        if self.playlist.current().is_none() {
            return;
        }
        self.duration = duration;
        self.emit_progress();
    }

    /// Natural end of track: advance, wrapping to the start.
    pub fn on_ended(&mut self) {
        if self.playlist.current().is_none() {
            return;
        }
        if let Err(e) = self.play_next() {
            log::error!("auto-advance failed: {e}");
        }
    }

    pub fn on_error(&mut self, message: &str) {
        log::error!("engine error: {message}");
        if self.playlist.current().is_some() {
            self.engine.pause();
            self.is_playing = false;
            self.emit_play_state();
        } else {
            self.go_idle();
        }
        self.notify(Notice::PlaybackError(message.to_string()));
    }

    // ----- internals -----

    fn playback_failed(&mut self, err: &EngineError) {
        log::error!("engine failed to play: {err}");
        self.engine.pause();
        self.is_playing = false;
        self.notify(Notice::PlaybackError(err.to_string()));
    }

    fn go_idle(&mut self) {
        self.engine.unload();
        self.playlist.clear_selection();
        self.is_playing = false;
        self.position = Duration::ZERO;
        self.duration = None;

        self.emit_playlist();
        self.emit_now_playing();
        self.emit_play_state();
        self.emit_progress();
    }

    fn emit(&mut self, event: WidgetEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn emit_playlist(&mut self) {
        let snapshot = self.playlist.snapshot();
        self.emit(WidgetEvent::PlaylistChanged(snapshot));
    }

    fn emit_play_state(&mut self) {
        self.emit(WidgetEvent::PlayStateChanged(self.is_playing));
    }

    fn emit_now_playing(&mut self) {
        let name = self
            .playlist
            .current_track()
            .map(|t| t.display_name().to_string());
        self.emit(WidgetEvent::NowPlaying(name));
    }

    fn emit_progress(&mut self) {
        let progress = self.progress();
        self.emit(WidgetEvent::Progress(progress));
    }
}
