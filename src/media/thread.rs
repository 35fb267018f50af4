use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::OutputStreamBuilder;

use crate::config::AudioSettings;

use super::sink::{Output, RodioOutput, TrackSink};
use super::source;
use super::types::{
    AudioCmd, LoadedSource, MediaError, MediaEvent, MediaUpdate, PlaybackHandle, PlaybackInfo,
};

/// Resolves a source locator into bytes; runs on a loader thread.
pub(super) type Fetch = fn(&str, Duration) -> Result<LoadedSource, MediaError>;

/// State owned by the audio thread.
pub(super) struct Playback<O: Output> {
    output: O,
    fetch: Fetch,
    events: Sender<MediaUpdate>,
    loader_tx: Sender<AudioCmd>,
    playback_info: PlaybackHandle,
    fetch_timeout: Duration,

    generation: u64,
    source: Option<String>,
    sink: Option<O::Track>,
    /// A play request that arrived before the source finished loading.
    want_play: bool,
    playing: bool,
    /// Last load error for the current source, replayed on `Play`.
    failed: Option<String>,
    volume: f32,
}

impl<O: Output> Playback<O> {
    pub(super) fn new(
        output: O,
        fetch: Fetch,
        events: Sender<MediaUpdate>,
        loader_tx: Sender<AudioCmd>,
        playback_info: PlaybackHandle,
        audio_settings: &AudioSettings,
    ) -> Self {
        Self {
            output,
            fetch,
            events,
            loader_tx,
            playback_info,
            fetch_timeout: Duration::from_secs(audio_settings.fetch_timeout_secs),
            generation: 0,
            source: None,
            sink: None,
            want_play: false,
            playing: false,
            failed: None,
            volume: audio_settings.initial_volume,
        }
    }

    /// Apply one command. Returns `false` once the thread should stop.
    pub(super) fn handle(&mut self, cmd: AudioCmd) -> bool {
        match cmd {
            AudioCmd::Load { generation, source } => self.load(generation, source),
            AudioCmd::Loaded { generation, result } => self.loaded(generation, result),
            AudioCmd::Play => self.play(),
            AudioCmd::Pause => self.pause(),
            AudioCmd::Seek(to) => self.seek(to),
            AudioCmd::SetVolume(v) => self.set_volume(v),
            AudioCmd::Quit { fade_out } => {
                self.quit(fade_out);
                return false;
            }
        }
        true
    }

    fn emit(&self, event: MediaEvent) {
        let _ = self.events.send(MediaUpdate {
            generation: self.generation,
            event,
        });
    }

    /// Run `f` on the shared info if it still describes our generation.
    fn with_info(&self, f: impl FnOnce(&mut PlaybackInfo)) {
        if let Ok(mut info) = self.playback_info.lock() {
            if info.generation == self.generation {
                f(&mut info);
            }
        }
    }

    fn load(&mut self, generation: u64, uri: String) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.generation = generation;
        self.source = Some(uri.clone());
        self.want_play = false;
        self.playing = false;
        self.failed = None;
        self.with_info(|info| {
            info.position = Duration::ZERO;
            info.duration = None;
        });

        tracing::debug!(generation, uri, "loading source");
        let tx = self.loader_tx.clone();
        let timeout = self.fetch_timeout;
        let fetch = self.fetch;
        thread::spawn(move || {
            let result = fetch(&uri, timeout);
            let _ = tx.send(AudioCmd::Loaded { generation, result });
        });
    }

    fn loaded(&mut self, generation: u64, result: Result<LoadedSource, MediaError>) {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "dropping superseded load");
            return;
        }

        let created = result.and_then(|loaded| self.output.open(&loaded, self.volume));
        match created {
            Ok((sink, duration)) => {
                self.with_info(|info| info.duration = duration);
                tracing::info!(
                    source = self.source.as_deref().unwrap_or_default(),
                    ?duration,
                    "source ready"
                );
                self.sink = Some(sink);
                self.emit(MediaEvent::LoadedMetadata);
                if self.want_play {
                    self.start();
                }
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(error = %message, "source failed to load");
                self.failed = Some(message.clone());
                self.emit(MediaEvent::Error {
                    source: self.source.clone().unwrap_or_default(),
                    message,
                });
            }
        }
    }

    fn start(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.play();
            if !self.playing {
                self.playing = true;
                self.emit(MediaEvent::Playing);
            }
        }
    }

    fn play(&mut self) {
        self.want_play = true;
        if let Some(message) = self.failed.clone() {
            // Mirror a rejected play: nothing to play for this source.
            self.emit(MediaEvent::Error {
                source: self.source.clone().unwrap_or_default(),
                message,
            });
            return;
        }
        self.start();
    }

    fn pause(&mut self) {
        self.want_play = false;
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
        if self.playing {
            self.playing = false;
            self.emit(MediaEvent::Paused);
        }
    }

    fn seek(&mut self, to: Duration) {
        let Some(s) = self.sink.as_ref() else {
            return;
        };
        match s.seek(to) {
            Ok(()) => self.with_info(|info| info.position = to),
            Err(e) => tracing::warn!(error = %e, ?to, "seek failed"),
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(volume);
        }
    }

    /// Publish the position and detect the end of the current source.
    pub(super) fn tick(&mut self) {
        let Some(s) = self.sink.as_ref() else {
            return;
        };
        let position = s.position();
        let ended = self.playing && s.is_drained();
        self.with_info(|info| info.position = position);
        self.emit(MediaEvent::TimeUpdate);

        if ended {
            self.playing = false;
            self.want_play = false;
            tracing::debug!(source = self.source.as_deref().unwrap_or_default(), "source ended");
            self.emit(MediaEvent::Ended);
        }
    }

    fn quit(&mut self, fade_out: Duration) {
        if let Some(s) = self.sink.take() {
            if self.playing {
                // Fade out gently before stopping.
                fade_out_sink(&s, self.volume, fade_out);
            }
            s.stop();
        }
        self.playing = false;
    }
}

fn fade_out_sink(sink: &impl TrackSink, from: f32, fade_out: Duration) {
    if fade_out.is_zero() {
        sink.set_volume(0.0);
        return;
    }
    let steps: u32 = 20;
    let step = (fade_out / steps).max(Duration::from_millis(1));
    for i in 1..=steps {
        let t = i as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(step);
    }
    sink.set_volume(0.0);
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    loader_tx: Sender<AudioCmd>,
    events: Sender<MediaUpdate>,
    playback_info: PlaybackHandle,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                tracing::error!(error = %e, "no audio output device");
                run_without_output(rx, events, e.to_string());
                return;
            }
        };

        let tick = Duration::from_millis(audio_settings.tick_ms.max(1));
        let mut playback = Playback::new(
            RodioOutput::new(stream),
            source::fetch,
            events,
            loader_tx,
            playback_info,
            &audio_settings,
        );
        let mut last_tick = Instant::now();

        loop {
            let wait = tick.saturating_sub(last_tick.elapsed());
            match rx.recv_timeout(wait) {
                Ok(cmd) => {
                    if !playback.handle(cmd) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if last_tick.elapsed() >= tick {
                playback.tick();
                last_tick = Instant::now();
            }
        }
        tracing::debug!("audio thread stopped");
    })
}

/// Without an output device every play request is rejected.
fn run_without_output(rx: Receiver<AudioCmd>, events: Sender<MediaUpdate>, reason: String) {
    let mut generation = 0;
    let mut source = String::new();
    for cmd in rx {
        match cmd {
            AudioCmd::Load {
                generation: g,
                source: s,
            } => {
                generation = g;
                source = s;
            }
            AudioCmd::Play => {
                let _ = events.send(MediaUpdate {
                    generation,
                    event: MediaEvent::Error {
                        source: source.clone(),
                        message: format!("no audio output device: {reason}"),
                    },
                });
            }
            AudioCmd::Quit { .. } => break,
            _ => {}
        }
    }
}
