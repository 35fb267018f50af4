use super::*;
use crate::catalog::{Catalog, Track};
use crate::config::Settings;
use crate::media::{MediaElement, MediaEvent, MediaUpdate};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    SetSource(String),
    Play,
    Pause,
    SetTime(f64),
    SetVolume(f32),
}

#[derive(Default)]
struct FakeMedia {
    calls: Vec<Call>,
    generation: u64,
    current_time: f64,
    duration: Option<f64>,
}

impl MediaElement for FakeMedia {
    fn set_source(&mut self, uri: &str) {
        self.generation += 1;
        self.calls.push(Call::SetSource(uri.to_string()));
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn play(&mut self) {
        self.calls.push(Call::Play);
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.current_time = seconds;
        self.calls.push(Call::SetTime(seconds));
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn set_volume(&mut self, volume: f32) {
        self.calls.push(Call::SetVolume(volume));
    }
}

fn t(i: usize) -> Track {
    Track {
        title: format!("Title {i}"),
        artist: format!("Artist {i}"),
        audio_source: format!("https://example.com/{i}.mp3"),
        cover_image: format!("https://example.com/{i}.png"),
    }
}

fn player_with(len: usize, settings: &Settings) -> Player<FakeMedia> {
    let catalog = Catalog::new((0..len).map(t).collect()).unwrap();
    let mut p = Player::new(catalog, FakeMedia::default(), settings);
    p.initialize();
    p
}

fn player(len: usize) -> Player<FakeMedia> {
    player_with(len, &Settings::default())
}

fn active_rows(view: &View) -> Vec<usize> {
    view.rows
        .iter()
        .enumerate()
        .filter(|(_, r)| r.active)
        .map(|(i, _)| i)
        .collect()
}

/// Deliver `event` as the media element would for the source loaded now.
fn deliver(p: &mut Player<FakeMedia>, event: MediaEvent) {
    let generation = p.media().generation();
    p.handle_media_event(MediaUpdate { generation, event });
}

fn last_source(p: &Player<FakeMedia>) -> Option<String> {
    p.media().calls.iter().rev().find_map(|c| match c {
        Call::SetSource(s) => Some(s.clone()),
        _ => None,
    })
}

#[test]
fn format_time_truncates_to_minutes_and_padded_seconds() {
    assert_eq!(format_time(0.0), "0:00");
    assert_eq!(format_time(65.0), "1:05");
    assert_eq!(format_time(599.0), "9:59");
    assert_eq!(format_time(3600.0), "60:00");
    assert_eq!(format_time(59.999), "0:59");
    assert_eq!(format_time(f64::NAN), "0:00");
    assert_eq!(format_time(-3.0), "0:00");
}

#[test]
fn initialize_loads_first_track_renders_playlist_and_sets_volume() {
    let p = player(3);
    assert_eq!(p.current_index(), 0);
    assert!(!p.is_playing());
    assert_eq!(
        p.media().calls,
        vec![
            Call::SetSource("https://example.com/0.mp3".into()),
            Call::SetVolume(0.7),
        ]
    );
    let v = p.view();
    assert_eq!(v.title, "Title 0");
    assert_eq!(v.artist, "Artist 0");
    assert_eq!(v.cover, "https://example.com/0.png");
    assert_eq!(v.rows.len(), 3);
    assert_eq!(v.rows[2].number, 3);
    assert_eq!(active_rows(v), vec![0]);
}

#[test]
fn initialize_runs_only_once() {
    let mut p = player(2);
    let before = p.media().calls.len();
    p.initialize();
    assert_eq!(p.media().calls.len(), before);
}

#[test]
fn load_track_marks_exactly_one_row_active_and_keeps_playing_flag() {
    let mut p = player(5);
    p.play();
    p.load_track(3);
    assert_eq!(active_rows(p.view()), vec![3]);
    assert_eq!(p.view().title, "Title 3");
    assert_eq!(last_source(&p).as_deref(), Some("https://example.com/3.mp3"));
    assert!(p.is_playing());
    // Loading alone does not issue a play.
    assert_eq!(
        p.media().calls.last(),
        Some(&Call::SetSource("https://example.com/3.mp3".into()))
    );
}

#[test]
fn play_then_pause_clears_markers_and_inverse_sets_them() {
    let mut p = player(2);
    p.play();
    p.pause();
    assert!(!p.is_playing());
    assert!(!p.view().playing);

    p.pause();
    p.play();
    assert!(p.is_playing());
    assert!(p.view().playing);
}

#[test]
fn toggle_alternates_between_play_and_pause() {
    let mut p = player(2);
    p.toggle_playback();
    assert!(p.is_playing());
    assert_eq!(p.media().calls.last(), Some(&Call::Play));
    p.toggle_playback();
    assert!(!p.is_playing());
    assert_eq!(p.media().calls.last(), Some(&Call::Pause));
}

#[test]
fn next_and_previous_wrap_and_only_resume_when_playing() {
    let mut p = player(3);
    p.previous();
    assert_eq!(p.current_index(), 2);
    assert_eq!(
        p.media().calls.last(),
        Some(&Call::SetSource("https://example.com/2.mp3".into()))
    );

    p.next();
    assert_eq!(p.current_index(), 0);
    assert!(!p.is_playing());

    p.play();
    p.next();
    assert_eq!(p.current_index(), 1);
    assert_eq!(p.media().calls.last(), Some(&Call::Play));
}

#[test]
fn next_then_previous_returns_to_start_for_any_length() {
    for len in 1..=6 {
        let mut p = player(len);
        for start in 0..len {
            p.select_row(start);
            p.next();
            p.previous();
            assert_eq!(p.current_index(), start);
            p.previous();
            p.next();
            assert_eq!(p.current_index(), start);
        }
    }
}

#[test]
fn five_ended_events_cycle_through_the_catalog_and_keep_playing() {
    let mut p = player(5);
    p.play();

    let mut visited = vec![p.current_index()];
    for _ in 0..5 {
        deliver(&mut p, MediaEvent::Ended);
        visited.push(p.current_index());
        let i = p.current_index();
        assert_eq!(p.view().title, format!("Title {i}"));
        assert_eq!(p.view().artist, format!("Artist {i}"));
        assert_eq!(p.view().cover, format!("https://example.com/{i}.png"));
        assert_eq!(p.media().calls.last(), Some(&Call::Play));
        assert!(p.is_playing());
    }
    assert_eq!(visited, vec![0, 1, 2, 3, 4, 0]);
}

#[test]
fn seek_half_of_two_hundred_seconds_lands_on_one_hundred() {
    let mut p = player(1);
    p.media_mut().duration = Some(200.0);
    assert_eq!(p.seek(0.5), Ok(()));
    assert_eq!(p.media().calls.last(), Some(&Call::SetTime(100.0)));
}

#[test]
fn seek_without_known_duration_is_refused() {
    let mut p = player(1);
    assert_eq!(p.seek(0.5), Err(PlayerError::NotSeekable));
    p.media_mut().duration = Some(f64::NAN);
    assert_eq!(p.seek(0.5), Err(PlayerError::NotSeekable));
    assert!(!p.media().calls.iter().any(|c| matches!(c, Call::SetTime(_))));
    assert_eq!(p.view().status.as_ref().map(|s| s.kind), Some(StatusKind::Info));
}

#[test]
fn time_update_sets_progress_and_elapsed() {
    let mut p = player(1);
    p.media_mut().duration = Some(200.0);
    p.media_mut().current_time = 50.0;
    deliver(&mut p, MediaEvent::TimeUpdate);
    assert_eq!(p.view().progress_percent, 25.0);
    assert_eq!(p.view().elapsed, "0:50");

    p.media_mut().duration = None;
    p.on_time_update();
    assert_eq!(p.view().progress_percent, 0.0);
}

#[test]
fn metadata_loaded_sets_total_or_unknown_marker() {
    let mut p = player(1);
    p.media_mut().duration = Some(185.9);
    deliver(&mut p, MediaEvent::LoadedMetadata);
    assert_eq!(p.view().total, "3:05");

    p.media_mut().duration = None;
    p.on_metadata_loaded();
    assert_eq!(p.view().total, UNKNOWN_TIME);
}

#[test]
fn select_row_always_starts_playback() {
    let mut p = player(4);
    assert!(!p.is_playing());
    p.select_row(2);
    assert_eq!(p.current_index(), 2);
    assert!(p.is_playing());
    assert_eq!(active_rows(p.view()), vec![2]);
    assert_eq!(p.media().calls.last(), Some(&Call::Play));

    let calls = p.media().calls.len();
    p.select_row(9);
    assert_eq!(p.media().calls.len(), calls);
    assert_eq!(p.current_index(), 2);
}

#[test]
fn cursor_moves_wrap_and_activation_plays_cursor_row() {
    let mut p = player(3);
    p.cursor_up();
    assert_eq!(p.view().cursor, 2);
    p.cursor_down();
    p.cursor_down();
    assert_eq!(p.view().cursor, 1);
    p.activate_cursor();
    assert_eq!(p.current_index(), 1);
    assert!(p.is_playing());
}

#[test]
fn volume_is_forwarded_and_nudges_clamp() {
    let mut p = player(1);
    p.set_volume(0.3);
    assert_eq!(p.media().calls.last(), Some(&Call::SetVolume(0.3)));
    assert_eq!(p.view().volume, 0.3);

    p.nudge_volume(5.0);
    assert_eq!(p.view().volume, 1.0);
    p.nudge_volume(-5.0);
    assert_eq!(p.view().volume, 0.0);
    p.volume_down();
    assert_eq!(p.view().volume, 0.0);
}

#[test]
fn media_state_events_reconcile_the_playing_flag() {
    let mut p = player(2);
    p.play();
    deliver(&mut p, MediaEvent::Paused);
    assert!(!p.is_playing());
    assert!(!p.view().playing);

    deliver(&mut p, MediaEvent::Playing);
    assert!(p.is_playing());
    assert!(p.view().playing);
}

#[test]
fn load_error_stops_playing_marks_row_and_reports() {
    let mut p = player(3);
    p.play();
    deliver(&mut p, MediaEvent::Error {
        source: "https://example.com/0.mp3".into(),
        message: "404".into(),
    });
    assert!(!p.is_playing());
    assert!(!p.view().playing);
    assert!(p.view().rows[0].failed);
    let status = p.view().status.clone().unwrap();
    assert_eq!(status.kind, StatusKind::Error);
    assert!(status.text.contains("Title 0"));
    assert_eq!(p.current_index(), 0);

    // A successful load of the same track clears the failure.
    p.media_mut().duration = Some(10.0);
    deliver(&mut p, MediaEvent::LoadedMetadata);
    assert!(!p.view().rows[0].failed);
}

#[test]
fn errors_for_superseded_loads_are_ignored() {
    let mut p = player(3);
    p.play();
    let first = p.media().generation();
    p.next();
    p.handle_media_event(MediaUpdate {
        generation: first,
        event: MediaEvent::Error {
            source: "https://example.com/0.mp3".into(),
            message: "timeout".into(),
        },
    });
    assert!(p.is_playing());
    assert!(p.view().rows.iter().all(|r| !r.failed));
    assert_eq!(p.view().status, None);
}

#[test]
fn ended_from_a_replaced_track_does_not_skip_the_new_one() {
    let mut p = player(5);
    p.play();
    let first = p.media().generation();

    p.next();
    p.handle_media_event(MediaUpdate {
        generation: first,
        event: MediaEvent::Ended,
    });
    assert_eq!(p.current_index(), 1);

    p.select_row(3);
    p.handle_media_event(MediaUpdate {
        generation: first + 1,
        event: MediaEvent::Ended,
    });
    assert_eq!(p.current_index(), 3);
    assert_eq!(active_rows(p.view()), vec![3]);
}

#[test]
fn metadata_from_a_replaced_track_leaves_the_new_one_alone() {
    let mut p = player(3);
    let first = p.media().generation();
    p.next();
    deliver(&mut p, MediaEvent::Error {
        source: "https://example.com/1.mp3".into(),
        message: "bad".into(),
    });
    assert!(p.view().rows[1].failed);

    p.media_mut().duration = None;
    p.handle_media_event(MediaUpdate {
        generation: first,
        event: MediaEvent::LoadedMetadata,
    });
    assert!(p.view().rows[1].failed);
    assert_eq!(p.view().total, "0:00");
}

#[test]
fn rows_sharing_a_source_are_told_apart_by_load() {
    let tracks = vec![t(0), Track { title: "Again".into(), ..t(0) }];
    let catalog = Catalog::new(tracks).unwrap();
    let mut p = Player::new(catalog, FakeMedia::default(), &Settings::default());
    p.initialize();
    p.play();
    let first = p.media().generation();
    p.next();

    p.handle_media_event(MediaUpdate {
        generation: first,
        event: MediaEvent::Error {
            source: "https://example.com/0.mp3".into(),
            message: "404".into(),
        },
    });
    assert!(p.is_playing());
    assert!(!p.view().rows[1].failed);
}

#[test]
fn skip_unplayable_advances_until_everything_failed() {
    let mut settings = Settings::default();
    settings.playback.skip_unplayable = true;
    let mut p = player_with(2, &settings);
    p.play();

    deliver(&mut p, MediaEvent::Error {
        source: "https://example.com/0.mp3".into(),
        message: "bad".into(),
    });
    assert_eq!(p.current_index(), 1);
    assert!(p.is_playing());
    assert!(p.view().status.is_some());

    deliver(&mut p, MediaEvent::Error {
        source: "https://example.com/1.mp3".into(),
        message: "bad".into(),
    });
    assert_eq!(p.current_index(), 1);
    assert!(!p.is_playing());
}
