use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::AudioSettings;

use super::element::MediaElement;
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, MediaError, MediaUpdate, PlaybackHandle, PlaybackInfo};

/// `MediaElement` backed by a `rodio` audio thread.
pub struct AudioElement {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
    generation: u64,
}

impl AudioElement {
    /// Spawn the audio thread. Lifecycle events are delivered on `events`.
    pub fn new(audio_settings: &AudioSettings, events: Sender<MediaUpdate>) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let audio_handle = spawn_audio_thread(
            rx,
            tx.clone(),
            events,
            playback_info.clone(),
            audio_settings.clone(),
        );

        Self {
            tx,
            playback: playback_info,
            join: Mutex::new(Some(audio_handle)),
            generation: 0,
        }
    }

    fn send(&self, cmd: AudioCmd) -> Result<(), MediaError> {
        self.tx.send(cmd).map_err(|_| MediaError::Disconnected)
    }

    fn send_or_warn(&self, cmd: AudioCmd) {
        if let Err(e) = self.send(cmd) {
            tracing::warn!(error = %e, "media command dropped");
        }
    }

    /// Stop playback after fading out and wait for the audio thread to finish.
    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit { fade_out });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl Drop for AudioElement {
    fn drop(&mut self) {
        // The audio thread holds its own sender for loader results, so it
        // never sees a disconnect; tell it to stop.
        let _ = self.send(AudioCmd::Quit {
            fade_out: Duration::ZERO,
        });
    }
}

impl MediaElement for AudioElement {
    fn set_source(&mut self, uri: &str) {
        self.generation += 1;
        if let Ok(mut info) = self.playback.lock() {
            *info = PlaybackInfo {
                generation: self.generation,
                ..PlaybackInfo::default()
            };
        }
        self.send_or_warn(AudioCmd::Load {
            generation: self.generation,
            source: uri.to_string(),
        });
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn play(&mut self) {
        self.send_or_warn(AudioCmd::Play);
    }

    fn pause(&mut self) {
        self.send_or_warn(AudioCmd::Pause);
    }

    fn current_time(&self) -> f64 {
        self.playback
            .lock()
            .map(|info| info.position.as_secs_f64())
            .unwrap_or(0.0)
    }

    fn set_current_time(&mut self, seconds: f64) {
        if !seconds.is_finite() || seconds < 0.0 {
            tracing::warn!(seconds, "ignoring invalid seek target");
            return;
        }
        self.send_or_warn(AudioCmd::Seek(Duration::from_secs_f64(seconds)));
    }

    fn duration(&self) -> Option<f64> {
        self.playback
            .lock()
            .ok()
            .and_then(|info| info.duration)
            .map(|d| d.as_secs_f64())
    }

    fn set_volume(&mut self, volume: f32) {
        self.send_or_warn(AudioCmd::SetVolume(volume));
    }
}
