use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::catalog::Catalog;
use crate::media::{AudioElement, MediaUpdate};
use crate::player::Player;

mod event_loop;
mod logging;
mod settings;


pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, settings_problem) = settings::load_settings();
    let _log_guard = logging::init_logging(&settings);
    if let Some(problem) = settings_problem {
        tracing::warn!("{problem}");
    }

    let catalog = Catalog::from_settings(&settings.catalog)?;

    let (events_tx, events_rx) = mpsc::channel::<MediaUpdate>();
    let media = AudioElement::new(&settings.audio, events_tx);
    let mut player = Player::new(catalog, media, &settings);
    player.initialize();

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut player, &events_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    player
        .media()
        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
    tracing::info!("shut down");

    run_result
}
