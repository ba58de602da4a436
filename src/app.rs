use crate::leaderboard::LeaderboardRecord;
use crate::session::{GameSession, RoundSummary, SessionEvent};

/// Which screen the UI is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Arena,
    Leaderboard,
    GameOver,
}

/// Top-level UI state: the session plus everything the renderer needs that
/// is not the session itself.
#[derive(Debug)]
pub struct App {
    pub session: GameSession,
    pub screen: Screen,
    pub leaderboard_rows: Vec<LeaderboardRecord>,
    pub last_summary: Option<RoundSummary>,
    pub status: Option<String>,
}

impl App {
    pub fn new(session: GameSession) -> Self {
        let mut app = Self {
            session,
            screen: Screen::Arena,
            leaderboard_rows: Vec::new(),
            last_summary: None,
            status: None,
        };
        app.refresh_leaderboard();
        app
    }

    pub fn refresh_leaderboard(&mut self) {
        self.leaderboard_rows = self
            .session
            .leaderboard()
            .and_then(|db| db.load().ok())
            .unwrap_or_default();
    }

    /// Fold session events into UI state. Returns true when anything that
    /// warrants a redraw happened.
    pub fn apply_events(&mut self, events: &[SessionEvent]) -> bool {
        let mut dirty = false;
        for event in events {
            dirty = true;
            if let SessionEvent::SessionEnded(summary) = event {
                self.last_summary = Some(summary.clone());
                self.screen = Screen::GameOver;
                self.refresh_leaderboard();
            }
        }
        dirty
    }
}

/// Keyboard mapping for strikes: `1`..`9` hit holes 0..8, `0` hits hole 9.
pub fn hole_for_key(c: char) -> Option<usize> {
    match c {
        '1'..='9' => Some(c as usize - '1' as usize),
        '0' => Some(9),
        _ => None,
    }
}

/// Inverse of `hole_for_key`, for grid labels.
pub fn key_for_hole(hole: usize) -> Option<char> {
    match hole {
        0..=8 => char::from_digit(hole as u32 + 1, 10),
        9 => Some('0'),
        _ => None,
    }
}
