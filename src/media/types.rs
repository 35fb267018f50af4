//! Media commands, events, errors and shared playback info.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;

/// Lifecycle and timing events emitted by the media element.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Periodic position tick while a source is loaded.
    TimeUpdate,
    /// The duration of the current source became known (or was found unknowable).
    LoadedMetadata,
    /// Playback reached the end of the current source.
    Ended,
    /// Sound actually started.
    Playing,
    /// Sound actually stopped because of a pause.
    Paused,
    /// The current source could not be fetched or decoded.
    Error { source: String, message: String },
}

/// A `MediaEvent` stamped with the load generation it belongs to.
///
/// Every `MediaElement::set_source` starts a new generation; updates from an
/// earlier one describe a source that is no longer loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaUpdate {
    pub generation: u64,
    pub event: MediaEvent,
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("fetching {uri} failed: {reason}")]
    Fetch { uri: String, reason: String },
    #[error("reading {path} failed: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode {uri}: {reason}")]
    Decode { uri: String, reason: String },
    #[error("unsupported audio source: {0}")]
    UnsupportedSource(String),
    #[error("audio thread is gone")]
    Disconnected,
}

/// An audio source fetched into memory, ready to be decoded.
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub uri: String,
    pub bytes: Arc<[u8]>,
    /// Duration read from container metadata, used when the decoder cannot tell.
    pub tagged_duration: Option<Duration>,
}

#[derive(Debug)]
pub enum AudioCmd {
    /// Start loading `source`; supersedes any load still in flight.
    Load { generation: u64, source: String },
    /// Result of a background load for `generation`.
    Loaded {
        generation: u64,
        result: Result<LoadedSource, MediaError>,
    },
    Play,
    Pause,
    /// Move the playback position of the current source.
    Seek(Duration),
    SetVolume(f32),
    /// Quit the audio thread, fading out over `fade_out` first.
    Quit { fade_out: Duration },
}

#[derive(Debug, Clone, Default)]
/// Runtime playback information shared with the player.
pub struct PlaybackInfo {
    /// Load generation this info describes; stale writers leave it alone.
    pub generation: u64,
    /// Position within the current source.
    pub position: Duration,
    /// Length of the current source, once known.
    pub duration: Option<Duration>,
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
