use crate::app_dirs::AppDirs;
use crate::difficulty::Difficulty;
use rusqlite::{params, Connection, Result};
use std::path::{Path, PathBuf};

/// How many records the board keeps.
pub const LEADERBOARD_CAP: usize = 50;

/// One ranked entry. `date` is a DD/MM/YYYY stamp taken at round end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRecord {
    pub name: String,
    pub points: i64,
    pub date: String,
    pub difficulty: Difficulty,
}

/// Append-only ranked record list backed by sqlite.
///
/// The table is kept equivalent to "sort descending by points (stable on
/// insertion order) and truncate to the top 50" after every append. There
/// are no update or delete operations on purpose.
#[derive(Debug)]
pub struct LeaderboardDb {
    conn: Connection,
}

impl LeaderboardDb {
    /// Open the on-disk board under the app state directory.
    pub fn open_default() -> Result<Self> {
        let db_path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("molehunt.db"));

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("Failed to create directory: {}", e)),
                )
            })?;
        }

        Self::open(&db_path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(&conn)?;
        Ok(LeaderboardDb { conn })
    }

    /// Ephemeral board for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(&conn)?;
        Ok(LeaderboardDb { conn })
    }

    fn init(conn: &Connection) -> Result<()> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                points INTEGER NOT NULL,
                date TEXT NOT NULL,
                difficulty TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_records_points ON records(points DESC)",
            [],
        )?;

        Ok(())
    }

    /// Insert a record, then prune everything below the top 50.
    /// Ties keep insertion order, so an equal score never evicts an older one.
    pub fn append(&self, record: &LeaderboardRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO records (name, points, date, difficulty) VALUES (?1, ?2, ?3, ?4)",
            params![
                record.name,
                record.points,
                record.date,
                record.difficulty.to_string(),
            ],
        )?;

        self.conn.execute(
            &format!(
                "DELETE FROM records WHERE id NOT IN \
                 (SELECT id FROM records ORDER BY points DESC, id ASC LIMIT {})",
                LEADERBOARD_CAP
            ),
            [],
        )?;

        Ok(())
    }

    /// Top records, descending by points. An empty board is seeded with the
    /// historical default entries first, so there is always something to show.
    pub fn load(&self) -> Result<Vec<LeaderboardRecord>> {
        if self.len()? == 0 {
            self.seed()?;
        }

        let mut stmt = self.conn.prepare(&format!(
            "SELECT name, points, date, difficulty FROM records \
             ORDER BY points DESC, id ASC LIMIT {}",
            LEADERBOARD_CAP
        ))?;

        let record_iter = stmt.query_map([], |row| {
            let tier: String = row.get(3)?;
            let difficulty = Difficulty::from_name(&tier).map_err(|_| {
                rusqlite::Error::InvalidColumnType(
                    3,
                    "difficulty".to_string(),
                    rusqlite::types::Type::Text,
                )
            })?;

            Ok(LeaderboardRecord {
                name: row.get(0)?,
                points: row.get(1)?,
                date: row.get(2)?,
                difficulty,
            })
        })?;

        let mut records = Vec::new();
        for record in record_iter {
            records.push(record?);
        }

        Ok(records)
    }

    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn seed(&self) -> Result<()> {
        let seeds = [
            ("Asterix", 512, "20/07/2019", Difficulty::Medium),
            ("Obelix", 256, "01/01/2002", Difficulty::Easy),
            ("Panoramix", 128, "25/06/2009", Difficulty::Easy),
        ];
        for (name, points, date, difficulty) in seeds {
            self.conn.execute(
                "INSERT INTO records (name, points, date, difficulty) VALUES (?1, ?2, ?3, ?4)",
                params![name, points, date, difficulty.to_string()],
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, points: i64) -> LeaderboardRecord {
        LeaderboardRecord {
            name: name.to_string(),
            points,
            date: "01/01/2026".to_string(),
            difficulty: Difficulty::Easy,
        }
    }

    #[test]
    fn test_empty_board_loads_seed_set() {
        let db = LeaderboardDb::open_in_memory().unwrap();
        let records = db.load().unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "Asterix");
        assert_eq!(records[0].points, 512);
        assert_eq!(records[0].difficulty, Difficulty::Medium);
        assert_eq!(records[2].name, "Panoramix");
    }

    #[test]
    fn test_append_keeps_descending_order() {
        let db = LeaderboardDb::open_in_memory().unwrap();
        db.append(&record("low", 10)).unwrap();
        db.append(&record("high", 300)).unwrap();
        db.append(&record("mid", 150)).unwrap();

        let records = db.load().unwrap();
        let points: Vec<i64> = records.iter().map(|r| r.points).collect();
        assert_eq!(points, vec![300, 150, 10]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let db = LeaderboardDb::open_in_memory().unwrap();
        db.append(&record("first", 100)).unwrap();
        db.append(&record("second", 100)).unwrap();

        let records = db.load().unwrap();
        assert_eq!(records[0].name, "first");
        assert_eq!(records[1].name, "second");
    }

    #[test]
    fn test_board_never_exceeds_cap() {
        let db = LeaderboardDb::open_in_memory().unwrap();
        for i in 0..60 {
            db.append(&record(&format!("p{}", i), i)).unwrap();
        }

        assert_eq!(db.len().unwrap(), LEADERBOARD_CAP);
        let records = db.load().unwrap();
        assert_eq!(records.len(), LEADERBOARD_CAP);
        // Lowest scores were evicted
        assert!(records.iter().all(|r| r.points >= 10));
        assert!(records.windows(2).all(|w| w[0].points >= w[1].points));
    }

    #[test]
    fn test_difficulty_roundtrips_through_storage() {
        let db = LeaderboardDb::open_in_memory().unwrap();
        db.append(&LeaderboardRecord {
            name: "Tester".to_string(),
            points: 42,
            date: "29/08/2026".to_string(),
            difficulty: Difficulty::Hard,
        })
        .unwrap();

        let records = db.load().unwrap();
        let tester = records.iter().find(|r| r.name == "Tester").unwrap();
        assert_eq!(tester.difficulty, Difficulty::Hard);
        assert_eq!(tester.date, "29/08/2026");
    }
}
