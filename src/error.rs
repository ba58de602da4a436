use thiserror::Error;

/// Recoverable game-level errors. Nothing here is fatal to the process;
/// callers re-prompt the user or keep the previous state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// `start` was attempted before a player name was registered.
    #[error("no player registered; set a player name before starting")]
    NoPlayerRegistered,

    /// An unknown difficulty tier name was requested (e.g. from a stale
    /// config file). The previous config is kept.
    #[error("unknown difficulty tier `{0}`")]
    InvalidDifficulty(String),

    /// Difficulty cannot change while a round is running or paused.
    #[error("difficulty is locked during an active round")]
    DifficultyLocked,
}
