//! `rodio`-backed media engine.
//!
//! rodio mixes on its own thread; this type only issues commands to the
//! `Sink` and turns what it observes into `EngineSignal`s when polled.

use std::collections::VecDeque;
use std::fs::File;
use std::io::BufReader;
use std::thread;
use std::time::Duration;

use lofty::prelude::AudioFile;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::config::AudioSettings;
use crate::error::EngineError;
use crate::library::UrlRegistry;

use super::engine::{EngineSignal, MediaEngine};

pub struct RodioEngine {
    stream: OutputStream,
    urls: UrlRegistry,
    volume: f32,
    sink: Option<Sink>,
    loaded_url: Option<String>,
    duration: Option<Duration>,
    pending: VecDeque<EngineSignal>,
    ended_reported: bool,
}

impl RodioEngine {
    /// Open the default output device.
    pub fn open(
        urls: UrlRegistry,
        settings: &AudioSettings,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut stream = OutputStreamBuilder::open_default_stream()?;
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            urls,
            volume: settings.volume,
            sink: None,
            loaded_url: None,
            duration: None,
            pending: VecDeque::new(),
            ended_reported: false,
        })
    }

    /// Collect what happened since the last poll.
    pub fn poll(&mut self) -> Vec<EngineSignal> {
        let mut out: Vec<EngineSignal> = self.pending.drain(..).collect();

        let revoked = self
            .loaded_url
            .as_deref()
            .is_some_and(|url| !self.urls.is_live(url));
        if revoked {
            log::error!("loaded source was revoked while still attached");
            self.unload();
            out.push(EngineSignal::Error("source was removed".to_string()));
            return out;
        }

        let Some(sink) = self.sink.as_ref() else {
            return out;
        };

        if !sink.is_paused() && sink.empty() {
            if !self.ended_reported {
                self.ended_reported = true;
                out.push(EngineSignal::Ended);
            }
        } else {
            out.push(EngineSignal::TimeUpdate {
                position: sink.get_pos(),
                duration: self.duration,
            });
        }
        out
    }

    /// Fade the current source out, blocking for `fade`.
    pub fn fade_out(&mut self, fade: Duration) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        if sink.is_paused() || fade.is_zero() {
            sink.set_volume(0.0);
            return;
        }
        let steps: u32 = 20;
        let step = (fade / steps).max(Duration::from_millis(1));
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            sink.set_volume(self.volume * (1.0 - t));
            thread::sleep(step);
        }
        sink.set_volume(0.0);
    }
}

pub(super) fn probe_duration(path: &std::path::Path) -> Option<Duration> {
    let tagged = lofty::read_from_path(path).ok()?;
    let d = tagged.properties().duration();
    (!d.is_zero()).then_some(d)
}

impl MediaEngine for RodioEngine {
    fn load(&mut self, url: &str) -> Result<(), EngineError> {
        // Whatever happens below, the old source is gone.
        self.unload();

        let path = self
            .urls
            .resolve(url)
            .ok_or_else(|| EngineError::RevokedUrl(url.to_string()))?;

        let file = File::open(&path).map_err(|source| EngineError::Open {
            path: path.clone(),
            source,
        })?;
        let source = Decoder::new(BufReader::new(file)).map_err(|e| EngineError::Decode {
            path: path.clone(),
            message: e.to_string(),
        })?;

        let duration = probe_duration(&path).or_else(|| source.total_duration());

        let sink = Sink::connect_new(self.stream.mixer());
        sink.set_volume(self.volume);
        sink.append(source);
        sink.pause();

        log::debug!("loaded {} ({duration:?})", path.display());
        self.sink = Some(sink);
        self.loaded_url = Some(url.to_string());
        self.duration = duration;
        self.ended_reported = false;
        self.pending
            .push_back(EngineSignal::MetadataLoaded { duration });
        Ok(())
    }

    fn play(&mut self) -> Result<(), EngineError> {
        let sink = self.sink.as_ref().ok_or(EngineError::NothingLoaded)?;
        sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
        }
    }

    fn unload(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.loaded_url = None;
        self.duration = None;
        self.ended_reported = false;
        self.pending.clear();
    }

    fn seek(&mut self, position: Duration) -> Result<(), EngineError> {
        let sink = self.sink.as_ref().ok_or(EngineError::NothingLoaded)?;
        sink.try_seek(position)
            .map_err(|e| EngineError::Seek(e.to_string()))?;
        self.ended_reported = false;
        Ok(())
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn is_loaded(&self) -> bool {
        self.sink.is_some()
    }
}
