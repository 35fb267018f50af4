//! UI rendering helpers for the terminal user interface.
//!
//! This module renders the player's `View` with `ratatui` and maps mouse
//! positions back onto the progress bar and playlist rows.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::config::UiSettings;
use crate::player::{StatusKind, View};

const CONTROLS: [(&str, &str); 8] = [
    ("space/p", "play/pause"),
    ("h/l", "prev/next"),
    ("j/k", "up/down"),
    ("enter", "play selected"),
    ("-/+", "volume"),
    ("0-9", "seek"),
    ("click", "seek/select"),
    ("q", "quit"),
];

/// Screen regions, shared by drawing and mouse hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub header: Rect,
    pub now_playing: Rect,
    pub progress: Rect,
    pub volume: Rect,
    pub playlist: Rect,
    pub status: Rect,
    pub footer: Rect,
}

/// Split the terminal area into the player's regions.
pub fn layout(area: Rect) -> Areas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);

    let bars = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(18)])
        .split(chunks[2]);

    Areas {
        header: chunks[0],
        now_playing: chunks[1],
        progress: bars[0],
        volume: bars[1],
        playlist: chunks[3],
        status: chunks[4],
        footer: chunks[5],
    }
}

fn inner(r: Rect) -> Rect {
    r.inner(Margin::new(1, 1))
}

fn contains(r: Rect, column: u16, row: u16) -> bool {
    column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
}

/// Where along the progress bar a click landed, as a fraction of its width.
pub fn progress_fraction(areas: &Areas, column: u16, row: u16) -> Option<f64> {
    let bar = inner(areas.progress);
    if bar.width == 0 || !contains(bar, column, row) {
        return None;
    }
    Some(f64::from(column - bar.x) / f64::from(bar.width))
}

/// First row shown when `total` rows scroll inside `height` lines, keeping
/// `cursor` centered when possible.
pub fn playlist_window_start(total: usize, height: usize, cursor: usize) -> usize {
    if total <= height || height == 0 {
        return 0;
    }
    let half = height / 2;
    let start = cursor.saturating_sub(half);
    start.min(total - height)
}

/// The catalog index of the playlist row under the mouse, if any.
pub fn playlist_row_at(areas: &Areas, view: &View, column: u16, row: u16) -> Option<usize> {
    let list = inner(areas.playlist);
    if !contains(list, column, row) {
        return None;
    }
    let start = playlist_window_start(view.rows.len(), list.height as usize, view.cursor);
    let index = start + usize::from(row - list.y);
    (index < view.rows.len()).then_some(index)
}

/// Render the controls help text.
fn controls_text() -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| format!("[{}] {}", k, v))
        .collect::<Vec<String>>()
        .join(" | ")
}

fn left_padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Render the entire UI into the provided `frame` from the player's `view`.
pub fn draw(frame: &mut Frame, view: &View, ui_settings: &UiSettings) {
    let areas = layout(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" setlist ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, areas.header);

    // Now playing: the play marker doubles as the album-art "spinning" state.
    let marker = if view.playing { "▶ Playing" } else { "⏸ Paused" };
    let now_playing = Paragraph::new(vec![
        Line::from(vec![
            Span::raw(view.title.as_str()).bold(),
            Span::raw("  "),
            Span::raw(marker).italic(),
        ]),
        Line::from(view.artist.as_str()),
        Line::from(vec![
            Span::raw("Cover: ").dim(),
            Span::raw(view.cover.as_str()).dim(),
        ]),
    ])
    .block(left_padded(" now playing "))
    .wrap(Wrap { trim: true });
    frame.render_widget(now_playing, areas.now_playing);

    // Progress; the view may briefly run past 100% before the end is noticed.
    let ratio = if view.progress_percent.is_finite() {
        (view.progress_percent / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let progress = Gauge::default()
        .block(Block::bordered().title(" progress "))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(ratio)
        .label(format!("{} / {}", view.elapsed, view.total));
    frame.render_widget(progress, areas.progress);

    let volume = Gauge::default()
        .block(Block::bordered().title(" volume "))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(f64::from(view.volume.clamp(0.0, 1.0)))
        .label(format!("{:.0}%", view.volume * 100.0));
    frame.render_widget(volume, areas.volume);

    // Playlist
    {
        let list_height = inner(areas.playlist).height as usize;
        let start = playlist_window_start(view.rows.len(), list_height, view.cursor);
        let end = (start + list_height.max(1)).min(view.rows.len());

        let items: Vec<ListItem> = view.rows[start..end]
            .iter()
            .map(|row| {
                let mut style = Style::default();
                if row.active {
                    style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
                }
                if row.failed {
                    style = style.add_modifier(Modifier::DIM | Modifier::CROSSED_OUT);
                }
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{:>2}  ", row.number)).dim(),
                    Span::raw(row.title.as_str()),
                    Span::raw(" - ").dim(),
                    Span::raw(row.artist.as_str()),
                ]))
                .style(style)
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" playlist "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        if !view.rows.is_empty() {
            state.select(Some(view.cursor.saturating_sub(start)));
        }
        frame.render_stateful_widget(list, areas.playlist, &mut state);
    }

    // Status
    let status = match &view.status {
        Some(s) => {
            let style = match s.kind {
                StatusKind::Info => Style::default().fg(Color::Blue),
                StatusKind::Error => Style::default().fg(Color::Red),
            };
            Line::from(Span::styled(format!(" {}", s.text), style))
        }
        None => Line::from(""),
    };
    frame.render_widget(Paragraph::new(status), areas.status);

    let footer = Paragraph::new(controls_text())
        .block(left_padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, areas.footer);
}
