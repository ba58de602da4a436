use crate::error::GameError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning parameters for one difficulty tier.
///
/// The numeric values are part of the scoring contract: leaderboard entries
/// are only comparable across versions if these stay bit-exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyConfig {
    /// Number of active holes in the grid.
    pub holes: usize,
    /// Delay between consecutive spawn attempts.
    pub spawn_interval: Duration,
    /// How long a mole stays up before it retreats unstruck.
    pub exposure_window: Duration,
    /// Grid columns used by the presentation layer.
    pub columns: u16,
    /// Points awarded per hit.
    pub hit_points: i64,
    /// Points deducted per mole that retreats unstruck.
    pub miss_penalty: i64,
    /// Points deducted per strike on an empty hole.
    pub error_penalty: i64,
}

const EASY: DifficultyConfig = DifficultyConfig {
    holes: 6,
    spawn_interval: Duration::from_millis(3000),
    exposure_window: Duration::from_millis(2000),
    columns: 3,
    hit_points: 5,
    miss_penalty: 2,
    error_penalty: 3,
};

const MEDIUM: DifficultyConfig = DifficultyConfig {
    holes: 8,
    spawn_interval: Duration::from_millis(2000),
    exposure_window: Duration::from_millis(1500),
    columns: 4,
    hit_points: 10,
    miss_penalty: 4,
    error_penalty: 6,
};

const HARD: DifficultyConfig = DifficultyConfig {
    holes: 10,
    spawn_interval: Duration::from_millis(1500),
    exposure_window: Duration::from_millis(1000),
    columns: 5,
    hit_points: 20,
    miss_penalty: 8,
    error_penalty: 12,
};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn config(self) -> &'static DifficultyConfig {
        match self {
            Difficulty::Easy => &EASY,
            Difficulty::Medium => &MEDIUM,
            Difficulty::Hard => &HARD,
        }
    }

    /// Parse a tier name as stored in config files and the leaderboard db.
    pub fn from_name(name: &str) -> Result<Self, GameError> {
        match name.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(GameError::InvalidDifficulty(other.to_string())),
        }
    }

    /// The next tier in selection order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Hard,
            Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Medium,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_table_values_are_exact() {
        let easy = Difficulty::Easy.config();
        assert_eq!(easy.holes, 6);
        assert_eq!(easy.spawn_interval, Duration::from_millis(3000));
        assert_eq!(easy.exposure_window, Duration::from_millis(2000));
        assert_eq!(easy.columns, 3);
        assert_eq!(
            (easy.hit_points, easy.miss_penalty, easy.error_penalty),
            (5, 2, 3)
        );

        let medium = Difficulty::Medium.config();
        assert_eq!(medium.holes, 8);
        assert_eq!(medium.spawn_interval, Duration::from_millis(2000));
        assert_eq!(medium.exposure_window, Duration::from_millis(1500));
        assert_eq!(medium.columns, 4);
        assert_eq!(
            (medium.hit_points, medium.miss_penalty, medium.error_penalty),
            (10, 4, 6)
        );

        let hard = Difficulty::Hard.config();
        assert_eq!(hard.holes, 10);
        assert_eq!(hard.spawn_interval, Duration::from_millis(1500));
        assert_eq!(hard.exposure_window, Duration::from_millis(1000));
        assert_eq!(hard.columns, 5);
        assert_eq!(
            (hard.hit_points, hard.miss_penalty, hard.error_penalty),
            (20, 8, 12)
        );
    }

    #[test]
    fn test_from_name_roundtrip() {
        for tier in Difficulty::ALL {
            assert_eq!(Difficulty::from_name(&tier.to_string()).unwrap(), tier);
        }
    }

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(Difficulty::from_name("EASY").unwrap(), Difficulty::Easy);
        assert_eq!(Difficulty::from_name(" Medium ").unwrap(), Difficulty::Medium);
    }

    #[test]
    fn test_from_name_rejects_unknown_tier() {
        assert_matches!(
            Difficulty::from_name("nightmare"),
            Err(GameError::InvalidDifficulty(s)) if s == "nightmare"
        );
    }

    #[test]
    fn test_next_prev_cycle() {
        for tier in Difficulty::ALL {
            assert_eq!(tier.next().prev(), tier);
        }
        assert_eq!(Difficulty::Hard.next(), Difficulty::Easy);
    }
}
