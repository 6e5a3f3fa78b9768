//! Turning picked and dropped paths into validator candidates.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use lofty::file::FileType;
use lofty::probe::Probe;
use url::Url;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::display::extension_lower;
use super::model::FileCandidate;

/// Candidates gathered from a set of paths.
#[derive(Debug, Default)]
pub struct Collected {
    pub candidates: Vec<FileCandidate>,
    /// Paths that could not be read at all (missing, permission denied, ...).
    pub unreadable: Vec<PathBuf>,
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Media type of `path` as detected from its content, if recognised.
pub fn sniff_media_type(path: &Path) -> Option<String> {
    let file_type = Probe::open(path).ok()?.guess_file_type().ok()?.file_type()?;
    let mime = match file_type {
        FileType::Mpeg => "audio/mpeg",
        FileType::Flac => "audio/flac",
        FileType::Wav => "audio/wav",
        FileType::Aiff => "audio/aiff",
        FileType::Aac => "audio/aac",
        FileType::Mp4 => "audio/mp4",
        FileType::Vorbis | FileType::Opus | FileType::Speex => "audio/ogg",
        FileType::Ape => "audio/ape",
        FileType::WavPack => "audio/wavpack",
        FileType::Mpc => "audio/musepack",
        _ => return None,
    };
    Some(mime.to_string())
}

/// Build a candidate for a single regular file.
pub fn candidate_from_path(path: &Path) -> io::Result<FileCandidate> {
    let meta = fs::metadata(path)?;
    if !meta.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        ));
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(FileCandidate {
        name,
        path: path.to_path_buf(),
        size: meta.len(),
        declared_type: sniff_media_type(path),
    })
}

fn walk_dir(
    dir: &Path,
    settings: &LibrarySettings,
    extensions: &[String],
    out: &mut Collected,
) {
    let mut walker = WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .sort_by_file_name();

    // Non-recursive = only the directory itself.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("skipping unreadable entry under {}: {e}", dir.display());
                if let Some(p) = e.path() {
                    out.unreadable.push(p.to_path_buf());
                }
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file() && !path.is_file() {
            continue;
        }
        let wanted = extension_lower(path)
            .map(|ext| extensions.iter().any(|e| *e == ext))
            .unwrap_or(false);
        if !wanted {
            continue;
        }

        match candidate_from_path(path) {
            Ok(c) => out.candidates.push(c),
            Err(e) => {
                log::warn!("cannot read {}: {e}", path.display());
                out.unreadable.push(path.to_path_buf());
            }
        }
    }
}

/// Expand `paths` into candidates.
///
/// Files are offered as-is (the validator decides). Directories are walked
/// and only files carrying one of `extensions` are offered, so cover art and
/// playlists inside an album folder do not count as invalid drops.
pub fn collect(paths: &[PathBuf], settings: &LibrarySettings, extensions: &[String]) -> Collected {
    let mut out = Collected::default();
    for path in paths {
        if path.is_dir() {
            walk_dir(path, settings, extensions, &mut out);
            continue;
        }
        match candidate_from_path(path) {
            Ok(c) => out.candidates.push(c),
            Err(e) => {
                log::warn!("cannot read {}: {e}", path.display());
                out.unreadable.push(path.clone());
            }
        }
    }
    out
}

/// Parse text pasted into the terminal by a file drop.
///
/// Terminals differ: some paste `file://` URIs one per line, some paste
/// shell-quoted paths separated by spaces, some paste the raw path. A line
/// that names an existing path verbatim wins over tokenising it.
pub fn parse_dropped(text: &str, exists: impl Fn(&Path) -> bool) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if exists(Path::new(line)) {
            out.push(PathBuf::from(line));
            continue;
        }
        out.extend(split_shell_words(line).iter().filter_map(|t| decode_file_uri(t)));
    }
    out
}

fn split_shell_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut cur = String::new();
    let mut in_word = false;
    let mut single = false;
    let mut double = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' if !double => {
                single = !single;
                in_word = true;
            }
            '"' if !single => {
                double = !double;
                in_word = true;
            }
            '\\' if !single => {
                if let Some(next) = chars.next() {
                    cur.push(next);
                    in_word = true;
                }
            }
            c if c.is_whitespace() && !single && !double => {
                if in_word {
                    words.push(std::mem::take(&mut cur));
                    in_word = false;
                }
            }
            c => {
                cur.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(cur);
    }
    words
}

/// Turn a dropped `file://` URI into a local path. Anything else is taken as
/// a path verbatim. URIs naming a remote host have no local path.
fn decode_file_uri(token: &str) -> Option<PathBuf> {
    if !token.starts_with("file:") {
        return Some(PathBuf::from(token));
    }
    match Url::parse(token).map(|url| url.to_file_path()) {
        Ok(Ok(path)) => Some(path),
        _ => {
            log::warn!("ignoring dropped URI without a local path: {token}");
            None
        }
    }
}
