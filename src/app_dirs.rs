use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("molehunt"),
            )
        } else {
            ProjectDirs::from("", "", "molehunt")
                .map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }

    /// Leaderboard database location.
    pub fn db_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("leaderboard.db"))
    }

    /// Round history CSV location.
    pub fn rounds_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("rounds.csv"))
    }
}
