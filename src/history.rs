use crate::app_dirs::AppDirs;
use crate::session::RoundSummary;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Append-only CSV log of finished rounds, one row per round.
///
/// This is the session's persistent trace; it sits outside the leaderboard
/// so a pruned record is never lost entirely.
#[derive(Debug, Clone)]
pub struct RoundHistory {
    path: PathBuf,
}

impl RoundHistory {
    pub fn open_default() -> Option<Self> {
        AppDirs::rounds_path().map(|path| Self { path })
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn append(&self, summary: &RoundSummary) -> csv::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let needs_header = !self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer.write_record(["date", "player", "difficulty", "hits", "missed", "errors", "points"])?;
        }
        writer.write_record([
            summary.date.clone(),
            summary.player.clone(),
            summary.difficulty.to_string(),
            summary.hits.to_string(),
            summary.missed.to_string(),
            summary.errors.to_string(),
            summary.points.to_string(),
        ])?;
        writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::Difficulty;
    use tempfile::tempdir;

    fn summary(points: i64) -> RoundSummary {
        RoundSummary {
            player: "Tester".to_string(),
            difficulty: Difficulty::Easy,
            hits: 3,
            missed: 1,
            errors: 1,
            points,
            date: "29/08/2026".to_string(),
        }
    }

    #[test]
    fn test_first_append_writes_header() {
        let dir = tempdir().unwrap();
        let history = RoundHistory::with_path(dir.path().join("rounds.csv"));
        history.append(&summary(10)).unwrap();

        let contents = std::fs::read_to_string(dir.path().join("rounds.csv")).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "date,player,difficulty,hits,missed,errors,points"
        );
        assert_eq!(lines.next().unwrap(), "29/08/2026,Tester,easy,3,1,1,10");
    }

    #[test]
    fn test_later_appends_skip_header() {
        let dir = tempdir().unwrap();
        let history = RoundHistory::with_path(dir.path().join("rounds.csv"));
        history.append(&summary(10)).unwrap();
        history.append(&summary(25)).unwrap();

        let contents = std::fs::read_to_string(dir.path().join("rounds.csv")).unwrap();
        assert_eq!(contents.lines().count(), 3);
    }

    #[test]
    fn test_append_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let history = RoundHistory::with_path(dir.path().join("nested").join("rounds.csv"));
        history.append(&summary(0)).unwrap();
        assert!(dir.path().join("nested").join("rounds.csv").exists());
    }
}
