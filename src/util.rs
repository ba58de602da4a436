use chrono::prelude::*;

/// Fallback name when sanitization leaves nothing usable.
pub const DEFAULT_PLAYER_NAME: &str = "Player";

const MAX_NAME_LEN: usize = 20;

/// Sanitize a player name for the leaderboard.
///
/// Collapses whitespace runs, keeps only ASCII alphanumerics, Latin-1
/// accented letters and spaces, and caps the result at 20 characters.
/// An empty or fully-stripped name falls back to `DEFAULT_PLAYER_NAME`.
pub fn sanitize_player_name(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let cleaned: String = collapsed
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || ('\u{C0}'..='\u{FF}').contains(c) || *c == ' ')
        .take(MAX_NAME_LEN)
        .collect();

    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        DEFAULT_PLAYER_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Leaderboard date stamp, DD/MM/YYYY.
pub fn today_stamp() -> String {
    Local::now().format("%d/%m/%Y").to_string()
}
