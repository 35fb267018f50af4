//! Utilities for creating `rodio` sinks from fetched sources, and the output
//! seam the audio thread plays through.

use std::io::Cursor;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use super::types::{LoadedSource, MediaError};

/// Where decoded sources end up.
pub(super) trait Output {
    type Track: TrackSink;

    /// Prepare a paused track for `loaded` at `volume`, together with its
    /// duration when known.
    fn open(
        &self,
        loaded: &LoadedSource,
        volume: f32,
    ) -> Result<(Self::Track, Option<Duration>), MediaError>;
}

/// Controls for one opened source.
pub(super) trait TrackSink {
    fn play(&self);
    fn pause(&self);
    fn stop(&self);
    fn set_volume(&self, volume: f32);
    fn seek(&self, to: Duration) -> Result<(), String>;
    fn position(&self) -> Duration;
    /// Everything queued has been played.
    fn is_drained(&self) -> bool;
}

/// The default audio device.
pub(super) struct RodioOutput {
    stream: OutputStream,
}

impl RodioOutput {
    pub(super) fn new(mut stream: OutputStream) -> Self {
        // rodio logs to stderr when OutputStream is dropped, which corrupts the TUI.
        stream.log_on_drop(false);
        Self { stream }
    }
}

impl Output for RodioOutput {
    type Track = Sink;

    fn open(
        &self,
        loaded: &LoadedSource,
        volume: f32,
    ) -> Result<(Sink, Option<Duration>), MediaError> {
        create_sink(&self.stream, loaded, volume)
    }
}

impl TrackSink for Sink {
    fn play(&self) {
        Sink::play(self);
    }

    fn pause(&self) {
        Sink::pause(self);
    }

    fn stop(&self) {
        Sink::stop(self);
    }

    fn set_volume(&self, volume: f32) {
        Sink::set_volume(self, volume);
    }

    fn seek(&self, to: Duration) -> Result<(), String> {
        self.try_seek(to).map_err(|e| e.to_string())
    }

    fn position(&self) -> Duration {
        self.get_pos()
    }

    fn is_drained(&self) -> bool {
        self.empty()
    }
}

/// Create a paused `Sink` for `loaded` at `volume`, together with the
/// source's duration when either the decoder or the tags know it.
pub(super) fn create_sink(
    stream: &OutputStream,
    loaded: &LoadedSource,
    volume: f32,
) -> Result<(Sink, Option<Duration>), MediaError> {
    let decoder = Decoder::new(Cursor::new(loaded.bytes.clone())).map_err(|e| {
        MediaError::Decode {
            uri: loaded.uri.clone(),
            reason: e.to_string(),
        }
    })?;

    let duration = decoder
        .total_duration()
        .filter(|d| !d.is_zero())
        .or(loaded.tagged_duration);

    let sink = Sink::connect_new(stream.mixer());
    sink.pause();
    sink.set_volume(volume);
    sink.append(decoder);
    Ok((sink, duration))
}
