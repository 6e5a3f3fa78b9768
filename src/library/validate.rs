//! File validation: decides whether an offered file becomes a `Track`.

use std::path::Path;

use thiserror::Error;

use crate::config::ValidatorSettings;

use super::display::{extension_lower, normalize_extensions};
use super::model::{FileCandidate, Track};
use super::url::UrlRegistry;

/// Why a file was not queued.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("file is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },
    #[error("not a supported audio type")]
    UnsupportedType,
}

/// A rejected file together with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub name: String,
    pub reason: Rejection,
}

/// Outcome of validating a batch of files.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub accepted: Vec<Track>,
    pub rejected: Vec<Rejected>,
}

impl BatchReport {
    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}

pub struct Validator {
    max_size: u64,
    media_types: Vec<String>,
    extensions: Vec<String>,
    urls: UrlRegistry,
}

impl Validator {
    pub fn new(settings: &ValidatorSettings, urls: UrlRegistry) -> Self {
        Self {
            max_size: settings.max_file_size,
            media_types: settings
                .media_types
                .iter()
                .map(|t| t.trim().to_ascii_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
            extensions: normalize_extensions(&settings.extensions),
            urls,
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Classify `file` without side effects.
    pub fn check(&self, file: &FileCandidate) -> Result<(), Rejection> {
        if file.size > self.max_size {
            return Err(Rejection::TooLarge {
                size: file.size,
                limit: self.max_size,
            });
        }
        if self.type_matches(file.declared_type.as_deref()) || self.extension_matches(&file.name)
        {
            Ok(())
        } else {
            Err(Rejection::UnsupportedType)
        }
    }

    /// Validate `file`; on acceptance a playable URL is issued for it.
    pub fn validate(&self, file: FileCandidate) -> Result<Track, Rejected> {
        match self.check(&file) {
            Ok(()) => {
                let url = self.urls.create(&file.path);
                Ok(Track::new(&file.name, file.path, file.size, url))
            }
            Err(reason) => Err(Rejected {
                name: file.name,
                reason,
            }),
        }
    }

    pub fn validate_all(&self, files: impl IntoIterator<Item = FileCandidate>) -> BatchReport {
        let mut report = BatchReport::default();
        for file in files {
            match self.validate(file) {
                Ok(track) => report.accepted.push(track),
                Err(rejected) => report.rejected.push(rejected),
            }
        }
        report
    }

    fn type_matches(&self, declared: Option<&str>) -> bool {
        let Some(declared) = declared else {
            return false;
        };
        // Ignore parameters such as `; codecs=...`.
        let essence = declared
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        !essence.is_empty() && self.media_types.iter().any(|t| *t == essence)
    }

    fn extension_matches(&self, name: &str) -> bool {
        extension_lower(Path::new(name))
            .map(|ext| self.extensions.iter().any(|e| *e == ext))
            .unwrap_or(false)
    }
}
