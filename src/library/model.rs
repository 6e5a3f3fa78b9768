use std::path::{Path, PathBuf};

use super::display::strip_extension;
use super::url::PlayableUrl;

/// One queued audio item.
///
/// A `Track` owns its playable URL: dropping the track revokes the URL.
#[derive(Debug)]
pub struct Track {
    display_name: String,
    source: PathBuf,
    size: u64,
    url: PlayableUrl,
}

impl Track {
    pub(super) fn new(name: &str, source: PathBuf, size: u64, url: PlayableUrl) -> Self {
        Self {
            display_name: strip_extension(name).to_string(),
            source,
            size,
            url,
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn url(&self) -> &PlayableUrl {
        &self.url
    }
}

/// A file offered to the validator by a pick or a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// File name including extension, as shown to the user.
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    /// Media type declared for the file, when anything declared one.
    pub declared_type: Option<String>,
}
