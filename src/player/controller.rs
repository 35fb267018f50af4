use thiserror::Error;

use crate::catalog::Catalog;
use crate::config::Settings;
use crate::media::{MediaElement, MediaEvent, MediaUpdate};

use super::time::format_time;
use super::view::{PlaylistRow, StatusKind, UNKNOWN_TIME, View};

#[derive(Debug, Error, PartialEq)]
pub enum PlayerError {
    #[error("track length is not known yet")]
    NotSeekable,
}

/// The player controller.
///
/// Holds the only mutable playback state and is driven one event at a time
/// by the runtime's event loop.
pub struct Player<M: MediaElement> {
    catalog: Catalog,
    media: M,
    view: View,

    current_index: usize,
    is_playing: bool,
    initialized: bool,

    /// Per-track load failures seen this session.
    failed: Vec<bool>,
    volume_step: f32,
    skip_unplayable: bool,
}

impl<M: MediaElement> Player<M> {
    pub fn new(catalog: Catalog, media: M, settings: &Settings) -> Self {
        let failed = vec![false; catalog.len()];
        Self {
            catalog,
            media,
            view: View::new(settings.audio.initial_volume),
            current_index: 0,
            is_playing: false,
            initialized: false,
            failed,
            volume_step: settings.audio.volume_step,
            skip_unplayable: settings.playback.skip_unplayable,
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    #[cfg(test)]
    pub(crate) fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    /// Load the first track, build the playlist and apply the slider volume.
    ///
    /// Runs once; later calls are ignored.
    pub fn initialize(&mut self) {
        if self.initialized {
            tracing::warn!("player already initialized");
            return;
        }
        self.initialized = true;

        self.load_track(self.current_index);
        self.render_playlist();
        self.media.set_volume(self.view.volume);
        tracing::info!(tracks = self.catalog.len(), "player initialized");
    }

    /// Point the media element at track `index` and show it as now playing.
    ///
    /// Playback is neither started nor stopped here.
    pub fn load_track(&mut self, index: usize) {
        let track = self.catalog.get(index);
        self.media.set_source(&track.audio_source);

        self.view.title = track.title.clone();
        self.view.artist = track.artist.clone();
        self.view.cover = track.cover_image.clone();
        self.view.elapsed = format_time(0.0);
        self.view.total = format_time(0.0);
        self.view.progress_percent = 0.0;
        self.view.cursor = index;
        self.view.status = None;
        self.view.set_active_row(index);

        tracing::info!(index, title = %track.title, "track loaded");
    }

    pub fn toggle_playback(&mut self) {
        if self.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn play(&mut self) {
        self.is_playing = true;
        self.media.play();
        self.view.playing = true;
    }

    pub fn pause(&mut self) {
        self.is_playing = false;
        self.media.pause();
        self.view.playing = false;
    }

    /// Step back one track, wrapping to the last. Keeps playing if it was.
    pub fn previous(&mut self) {
        self.current_index = self.catalog.prev_index(self.current_index);
        self.load_track(self.current_index);
        if self.is_playing {
            self.play();
        }
    }

    /// Step forward one track, wrapping to the first. Keeps playing if it was.
    pub fn next(&mut self) {
        self.current_index = self.catalog.next_index(self.current_index);
        self.load_track(self.current_index);
        if self.is_playing {
            self.play();
        }
    }

    pub fn set_volume(&mut self, value: f32) {
        self.view.volume = value;
        self.media.set_volume(value);
    }

    /// Move the volume slider by `delta`, stopping at its ends.
    pub fn nudge_volume(&mut self, delta: f32) {
        let value = (self.view.volume + delta).clamp(0.0, 1.0);
        self.set_volume(value);
    }

    pub fn volume_up(&mut self) {
        self.nudge_volume(self.volume_step);
    }

    pub fn volume_down(&mut self) {
        self.nudge_volume(-self.volume_step);
    }

    /// Jump to `fraction` (0.0 - 1.0) of the current track.
    pub fn seek(&mut self, fraction: f64) -> Result<(), PlayerError> {
        let Some(duration) = self.known_duration() else {
            self.view
                .set_status(StatusKind::Info, "Cannot seek until the track length is known");
            return Err(PlayerError::NotSeekable);
        };

        let target = fraction.clamp(0.0, 1.0) * duration;
        tracing::debug!(fraction, target, "seek");
        self.media.set_current_time(target);
        Ok(())
    }

    /// Refresh the progress bar and elapsed label from the media position.
    pub fn on_time_update(&mut self) {
        let current = self.media.current_time();
        self.view.progress_percent = match self.known_duration() {
            Some(duration) => current / duration * 100.0,
            None => 0.0,
        };
        self.view.elapsed = format_time(current);
    }

    pub fn on_metadata_loaded(&mut self) {
        self.view.total = match self.known_duration() {
            Some(duration) => format_time(duration),
            None => UNKNOWN_TIME.to_string(),
        };
        self.mark_failed(self.current_index, false);
    }

    /// Rebuild the playlist rows from the catalog.
    ///
    /// The first row starts out active regardless of the current index.
    pub fn render_playlist(&mut self) {
        self.view.rows = self
            .catalog
            .tracks()
            .iter()
            .enumerate()
            .map(|(i, track)| PlaylistRow {
                number: i + 1,
                title: track.title.clone(),
                artist: track.artist.clone(),
                active: i == 0,
                failed: self.failed[i],
            })
            .collect();
    }

    /// Playlist row activation: load row `index` and always start playing.
    pub fn select_row(&mut self, index: usize) {
        if index >= self.catalog.len() {
            tracing::warn!(index, "ignoring activation of a row that does not exist");
            return;
        }
        self.current_index = index;
        self.load_track(index);
        self.play();
    }

    pub fn cursor_down(&mut self) {
        self.view.cursor = self.catalog.next_index(self.view.cursor);
    }

    pub fn cursor_up(&mut self) {
        self.view.cursor = self.catalog.prev_index(self.view.cursor);
    }

    pub fn activate_cursor(&mut self) {
        self.select_row(self.view.cursor);
    }

    /// Dispatch a lifecycle or timing event from the media element.
    ///
    /// Updates stamped with an earlier load generation describe a source
    /// that has since been replaced and are dropped.
    pub fn handle_media_event(&mut self, update: MediaUpdate) {
        let current = self.media.generation();
        if update.generation != current {
            tracing::debug!(
                generation = update.generation,
                current,
                event = ?update.event,
                "ignoring event for a source no longer loaded"
            );
            return;
        }

        match update.event {
            MediaEvent::TimeUpdate => self.on_time_update(),
            MediaEvent::LoadedMetadata => self.on_metadata_loaded(),
            MediaEvent::Ended => {
                tracing::debug!(index = self.current_index, "track ended");
                self.next();
            }
            MediaEvent::Playing => {
                self.is_playing = true;
                self.view.playing = true;
            }
            MediaEvent::Paused => {
                self.is_playing = false;
                self.view.playing = false;
            }
            MediaEvent::Error { source, message } => self.on_media_error(&source, &message),
        }
    }

    fn on_media_error(&mut self, source: &str, message: &str) {
        let index = self.current_index;
        let track = self.catalog.get(index);
        tracing::warn!(index, title = %track.title, source, error = message, "track unplayable");
        let text = format!("Cannot play \"{}\": {message}", track.title);
        let was_playing = self.is_playing;

        self.is_playing = false;
        self.view.playing = false;
        self.mark_failed(index, true);

        if self.skip_unplayable && was_playing && !self.failed.iter().all(|f| *f) {
            self.current_index = self.catalog.next_index(index);
            self.load_track(self.current_index);
            self.play();
        }
        self.view.set_status(StatusKind::Error, text);
    }

    fn mark_failed(&mut self, index: usize, failed: bool) {
        self.failed[index] = failed;
        if let Some(row) = self.view.rows.get_mut(index) {
            row.failed = failed;
        }
    }

    fn known_duration(&self) -> Option<f64> {
        self.media
            .duration()
            .filter(|d| d.is_finite() && *d > 0.0)
    }
}
