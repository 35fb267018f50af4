//! The presentation surface as plain data.

/// Label shown while the length of the current track is unknown.
pub const UNKNOWN_TIME: &str = "-:--";

#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistRow {
    /// 1-based position shown next to the title.
    pub number: usize,
    pub title: String,
    pub artist: String,
    /// Highlighted as the loaded track.
    pub active: bool,
    /// The track failed to load this session.
    pub failed: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub text: String,
}

/// Everything the UI shows, written only by the player.
#[derive(Debug, Clone)]
pub struct View {
    pub title: String,
    pub artist: String,
    pub cover: String,
    pub elapsed: String,
    pub total: String,
    /// Progress bar fill, `current_time / duration * 100`.
    pub progress_percent: f64,
    /// "Playing" marker on the play control and album art.
    pub playing: bool,
    /// Volume slider position.
    pub volume: f32,
    pub rows: Vec<PlaylistRow>,
    /// Keyboard cursor in the playlist.
    pub cursor: usize,
    pub status: Option<StatusLine>,
}

impl View {
    pub fn new(volume: f32) -> Self {
        Self {
            title: String::new(),
            artist: String::new(),
            cover: String::new(),
            elapsed: "0:00".to_string(),
            total: "0:00".to_string(),
            progress_percent: 0.0,
            playing: false,
            volume,
            rows: Vec::new(),
            cursor: 0,
            status: None,
        }
    }

    /// Mark exactly row `index` active.
    pub fn set_active_row(&mut self, index: usize) {
        for (i, row) in self.rows.iter_mut().enumerate() {
            row.active = i == index;
        }
    }

    pub fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(StatusLine {
            kind,
            text: text.into(),
        });
    }
}
