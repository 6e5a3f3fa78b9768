//! Scripted engine for driving the controller without an audio device.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::EngineError;
use crate::library::UrlRegistry;

use super::MediaEngine;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load(String),
    Play,
    Pause,
    Unload,
    Seek(Duration),
}

/// Records every command and checks it never touches a revoked URL.
pub struct FakeEngine {
    pub urls: UrlRegistry,
    pub calls: Vec<Call>,
    pub loaded: Option<String>,
    pub duration: Option<Duration>,
    pub fail_load: bool,
    pub fail_play: bool,
    pub fail_seek: bool,
}

impl FakeEngine {
    pub fn new(urls: UrlRegistry) -> Self {
        Self {
            urls,
            calls: Vec::new(),
            loaded: None,
            duration: Some(Duration::from_secs(200)),
            fail_load: false,
            fail_play: false,
            fail_seek: false,
        }
    }

    pub fn loads(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Load(_)))
            .count()
    }
}

impl MediaEngine for FakeEngine {
    fn load(&mut self, url: &str) -> Result<(), EngineError> {
        self.calls.push(Call::Load(url.to_string()));
        self.loaded = None;
        assert!(self.urls.is_live(url), "engine asked to load revoked {url}");
        if self.fail_load {
            return Err(EngineError::Decode {
                path: PathBuf::from("/fake"),
                message: "bad frame".into(),
            });
        }
        self.loaded = Some(url.to_string());
        Ok(())
    }

    fn play(&mut self) -> Result<(), EngineError> {
        self.calls.push(Call::Play);
        if self.loaded.is_none() {
            return Err(EngineError::NothingLoaded);
        }
        if self.fail_play {
            return Err(EngineError::Seek("device busy".into()));
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
    }

    fn unload(&mut self) {
        self.calls.push(Call::Unload);
        self.loaded = None;
    }

    fn seek(&mut self, position: Duration) -> Result<(), EngineError> {
        self.calls.push(Call::Seek(position));
        if self.fail_seek {
            return Err(EngineError::Seek("not seekable".into()));
        }
        Ok(())
    }

    fn duration(&self) -> Option<Duration> {
        self.loaded.as_ref().and(self.duration)
    }

    fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }
}
