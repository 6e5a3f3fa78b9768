//! Revocable playable URLs.
//!
//! Accepted files get a `blob:`-style URL that the media engine resolves back
//! to the file. A `PlayableUrl` is a lease: it cannot be cloned, and dropping
//! it revokes the URL, so every issued URL is released exactly once.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use uuid::Uuid;

const SCHEME_PREFIX: &str = "blob:droplist/";

/// Shared table of live URLs.
#[derive(Clone, Default)]
pub struct UrlRegistry {
    live: Arc<Mutex<HashMap<String, PathBuf>>>,
}

impl UrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh URL for `source`.
    pub fn create(&self, source: &Path) -> PlayableUrl {
        let url = format!("{SCHEME_PREFIX}{}", Uuid::new_v4());
        if let Ok(mut live) = self.live.lock() {
            live.insert(url.clone(), source.to_path_buf());
        }
        log::debug!("issued {url} for {}", source.display());
        PlayableUrl {
            url,
            registry: self.clone(),
        }
    }

    /// Map a live URL back to its file. `None` once revoked.
    pub fn resolve(&self, url: &str) -> Option<PathBuf> {
        self.live.lock().ok().and_then(|live| live.get(url).cloned())
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.live
            .lock()
            .map(|live| live.contains_key(url))
            .unwrap_or(false)
    }

    /// Number of URLs issued and not yet revoked.
    pub fn live_count(&self) -> usize {
        self.live.lock().map(|live| live.len()).unwrap_or(0)
    }

    fn revoke(&self, url: &str) {
        let removed = self
            .live
            .lock()
            .map(|mut live| live.remove(url).is_some())
            .unwrap_or(false);
        if removed {
            log::debug!("revoked {url}");
        } else {
            log::warn!("revoke of unknown url {url}");
        }
    }
}

impl fmt::Debug for UrlRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlRegistry")
            .field("live", &self.live_count())
            .finish()
    }
}

/// A live URL. Revoked when dropped.
pub struct PlayableUrl {
    url: String,
    registry: UrlRegistry,
}

impl PlayableUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl Drop for PlayableUrl {
    fn drop(&mut self) {
        self.registry.revoke(&self.url);
    }
}

impl fmt::Debug for PlayableUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PlayableUrl").field(&self.url).finish()
    }
}
