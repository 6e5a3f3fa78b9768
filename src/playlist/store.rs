use crate::error::{PlaylistError, Result};
use crate::library::Track;

/// What `remove_at` did to the selection.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Removal {
    /// The selected track was removed. The selection is now cleared; `next`
    /// is where it should move to, if any tracks remain.
    WasCurrent { next: Option<usize> },
    /// A track before the selection was removed; the selection moved down by
    /// one and still points at the same track.
    BeforeCurrent,
    /// A track after the selection was removed.
    AfterCurrent,
    /// Nothing was selected.
    NoSelection,
}

/// Ordered display names plus the active row, for re-rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistSnapshot {
    pub names: Vec<String>,
    pub active: Option<usize>,
}

/// Where the selection goes after removing the selected track at `removed`,
/// given the length after removal.
pub fn clamp_index(removed: usize, len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(removed.min(len - 1))
    }
}

/// The Track Store: owns the tracks and the current selection.
///
/// Invariant: `current`, when set, is a valid index.
#[derive(Debug, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
    current: Option<usize>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    /// Append `tracks` in order and return the new length.
    pub fn add(&mut self, tracks: impl IntoIterator<Item = Track>) -> usize {
        self.tracks.extend(tracks);
        self.tracks.len()
    }

    pub fn select(&mut self, index: usize) -> Result<&Track> {
        self.check_index(index)?;
        self.current = Some(index);
        Ok(&self.tracks[index])
    }

    pub fn clear_selection(&mut self) {
        self.current = None;
    }

    /// Remove the track at `index` and hand it back.
    ///
    /// The caller decides when to drop the returned track (which revokes its
    /// URL), so a media engine still reading it can be detached first.
    pub fn remove_at(&mut self, index: usize) -> Result<(Track, Removal)> {
        self.check_index(index)?;
        let track = self.tracks.remove(index);

        let removal = match self.current {
            None => Removal::NoSelection,
            Some(cur) if cur == index => {
                self.current = None;
                Removal::WasCurrent {
                    next: clamp_index(index, self.tracks.len()),
                }
            }
            Some(cur) if index < cur => {
                self.current = Some(cur - 1);
                Removal::BeforeCurrent
            }
            Some(_) => Removal::AfterCurrent,
        };

        Ok((track, removal))
    }

    pub fn snapshot(&self) -> PlaylistSnapshot {
        PlaylistSnapshot {
            names: self
                .tracks
                .iter()
                .map(|t| t.display_name().to_string())
                .collect(),
            active: self.current,
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.tracks.len() {
            Ok(())
        } else {
            Err(PlaylistError::IndexOutOfRange {
                index,
                len: self.tracks.len(),
            })
        }
    }
}
