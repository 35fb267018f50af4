use serde::Deserialize;
use thiserror::Error;

/// One playable item. Identity is its position in the `Catalog`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Track {
    pub title: String,
    pub artist: String,
    /// Where the audio lives: `https://`, `http://`, `file://` or a plain path.
    pub audio_source: String,
    /// Locator of the cover art.
    #[serde(default)]
    pub cover_image: String,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog has no tracks")]
    Empty,
    #[error("invalid catalog: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A non-empty, immutable sequence of tracks.
#[derive(Debug, Clone)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    /// Build a catalog, rejecting an empty track list.
    pub fn new(tracks: Vec<Track>) -> Result<Self, CatalogError> {
        if tracks.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { tracks })
    }

    /// Return the track at `index`.
    ///
    /// Panics when `index >= len()`; callers keep indices in range through
    /// `next_index` / `prev_index`.
    pub fn get(&self, index: usize) -> &Track {
        &self.tracks[index]
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// The index after `index`, wrapping from the last track to the first.
    pub fn next_index(&self, index: usize) -> usize {
        if index + 1 >= self.tracks.len() {
            0
        } else {
            index + 1
        }
    }

    /// The index before `index`, wrapping from the first track to the last.
    pub fn prev_index(&self, index: usize) -> usize {
        if index == 0 || index >= self.tracks.len() {
            self.tracks.len() - 1
        } else {
            index - 1
        }
    }
}
