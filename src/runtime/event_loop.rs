use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::config;
use crate::media::{MediaElement, MediaUpdate};
use crate::player::Player;
use crate::ui::{self, Areas};

/// Main terminal event loop: applies media events, draws, and dispatches
/// user input to the player. Returns `Ok(())` when the user quits.
pub fn run<M: MediaElement>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    player: &mut Player<M>,
    media_rx: &mpsc::Receiver<MediaUpdate>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut areas = ui::layout(terminal.get_frame().area());

    loop {
        while let Ok(update) = media_rx.try_recv() {
            player.handle_media_event(update);
        }

        terminal.draw(|f| {
            areas = ui::layout(f.area());
            ui::draw(f, player.view(), &settings.ui);
        })?;

        if event::poll(Duration::from_millis(settings.ui.poll_ms))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key_event(key, player) {
                        break;
                    }
                }
                Event::Mouse(mouse) => handle_mouse_event(mouse, &areas, player),
                _ => {}
            }
        }
    }

    Ok(())
}

/// Apply a key press. Returns `true` when the user asked to quit.
pub(super) fn handle_key_event<M: MediaElement>(key: KeyEvent, player: &mut Player<M>) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Char(' ') | KeyCode::Char('p') => player.toggle_playback(),
        KeyCode::Char('h') | KeyCode::Left => player.previous(),
        KeyCode::Char('l') | KeyCode::Right => player.next(),
        KeyCode::Char('j') | KeyCode::Down => player.cursor_down(),
        KeyCode::Char('k') | KeyCode::Up => player.cursor_up(),
        KeyCode::Enter => player.activate_cursor(),
        KeyCode::Char('+') | KeyCode::Char('=') => player.volume_up(),
        KeyCode::Char('-') => player.volume_down(),
        KeyCode::Char(c @ '0'..='9') => {
            let tenths = c.to_digit(10).unwrap_or(0);
            if let Err(e) = player.seek(f64::from(tenths) / 10.0) {
                tracing::debug!(error = %e, "seek refused");
            }
        }
        _ => {}
    }
    false
}

/// Left clicks seek on the progress bar or activate a playlist row; the
/// wheel moves the playlist cursor.
pub(super) fn handle_mouse_event<M: MediaElement>(
    mouse: MouseEvent,
    areas: &Areas,
    player: &mut Player<M>,
) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(fraction) = ui::progress_fraction(areas, mouse.column, mouse.row) {
                if let Err(e) = player.seek(fraction) {
                    tracing::debug!(error = %e, "seek refused");
                }
            } else if let Some(index) =
                ui::playlist_row_at(areas, player.view(), mouse.column, mouse.row)
            {
                player.select_row(index);
            }
        }
        MouseEventKind::ScrollDown => player.cursor_down(),
        MouseEventKind::ScrollUp => player.cursor_up(),
        _ => {}
    }
}
