use itertools::Itertools;
use std::cmp::Reverse;
use std::fmt;
use tracing::warn;

use crate::ledger::ScoreLedger;
use crate::record::ScoreRecord;

pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;
/// Names longer than this are cut in the rank table
const NAME_COLUMN_WIDTH: usize = 15;

/// Best `n` records by score, highest first. Equal scores keep their input order.
pub fn top_n(records: &[ScoreRecord], n: usize) -> Vec<ScoreRecord> {
    records
        .iter()
        .sorted_by_key(|r| Reverse(r.score()))
        .take(n)
        .cloned()
        .collect()
}

/// Ranked view over whatever the ledger holds right now
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Leaderboard {
    entries: Vec<ScoreRecord>,
    warning: Option<String>,
}

impl Leaderboard {
    pub fn from_records(records: &[ScoreRecord], n: usize) -> Self {
        Self {
            entries: top_n(records, n),
            warning: None,
        }
    }

    /// Read the ledger. A failed read gives an empty board with a warning.
    pub fn load<L: ScoreLedger + ?Sized>(ledger: &L, n: usize) -> Self {
        match ledger.load_all() {
            Ok(records) => Self::from_records(&records, n),
            Err(e) => {
                warn!(error = %e, "failed to load scores");
                Self {
                    entries: Vec::new(),
                    warning: Some(format!("Failed to load scores: {e}")),
                }
            }
        }
    }

    pub fn entries(&self) -> &[ScoreRecord] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    /// Rank-table rows, 1-based rank first
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, record)| format_row(i + 1, record))
    }
}

pub const TABLE_HEADER: &str = "Rank  Name Score  WPM    Accuracy  Date";

pub fn format_row(rank: usize, record: &ScoreRecord) -> String {
    let name: String = record.name().chars().take(NAME_COLUMN_WIDTH).collect();
    format!(
        "{:<5} {:<15} {:<6} {:<6.1} {:<8.1} {}",
        rank,
        name,
        record.score(),
        record.wpm(),
        record.accuracy(),
        record.timestamp()
    )
}

impl fmt::Display for Leaderboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(warning) = &self.warning {
            writeln!(f, "{warning}")?;
        }

        if self.entries.is_empty() {
            return writeln!(f, "No high scores yet!");
        }

        writeln!(f, "{TABLE_HEADER}")?;
        writeln!(f, "{}", "-".repeat(60))?;
        for row in self.rows() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::ledger::MemoryLedger;

    fn record(name: &str, score: u32) -> ScoreRecord {
        ScoreRecord::new(name.into(), score, 50.0, 90.0, "2024-01-01 10:00".into())
    }

    #[test]
    fn test_top_n_orders_descending() {
        let records = vec![record("A", 5), record("B", 30), record("C", 12)];
        let names: Vec<_> = top_n(&records, 10)
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        assert_eq!(names, ["B", "C", "A"]);
    }

    #[test]
    fn test_top_n_is_stable() {
        let records = vec![record("A", 10), record("B", 10)];
        assert_eq!(top_n(&records, 2), records);

        let records = vec![record("X", 1), record("A", 10), record("B", 10)];
        let names: Vec<_> = top_n(&records, 3)
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        assert_eq!(names, ["A", "B", "X"]);
    }

    #[test]
    fn test_top_n_truncates() {
        let records: Vec<_> = (0..15).map(|i| record("P", i)).collect();
        let top = top_n(&records, 10);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].score(), 14);
        assert_eq!(top[9].score(), 5);
        assert!(top_n(&records, 0).is_empty());
    }

    #[test]
    fn test_load_from_ledger() {
        let ledger = MemoryLedger::with_records(vec![record("A", 1), record("B", 2)]);
        let board = Leaderboard::load(&ledger, 10);
        assert_eq!(board.entries()[0].name(), "B");
        assert!(board.warning().is_none());
    }

    struct BrokenLedger;

    impl ScoreLedger for BrokenLedger {
        fn append(&self, _record: &ScoreRecord) -> Result<(), LedgerError> {
            Err(std::io::Error::other("read only").into())
        }

        fn load_all(&self) -> Result<Vec<ScoreRecord>, LedgerError> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into())
        }
    }

    #[test]
    fn test_failed_load_is_empty_with_warning() {
        let board = Leaderboard::load(&BrokenLedger, 10);
        assert!(board.is_empty());
        assert!(board.warning().unwrap().contains("denied"));
        assert!(board.to_string().contains("No high scores yet!"));
    }

    #[test]
    fn test_format_row() {
        let r = ScoreRecord::new(
            "Bartholomew Jameson".into(),
            42,
            55.5,
            88.0,
            "2024-01-01 10:00".into(),
        );
        assert_eq!(
            format_row(1, &r),
            "1     Bartholomew Jam 42     55.5   88.0     2024-01-01 10:00"
        );
    }

    #[test]
    fn test_display_table() {
        let board = Leaderboard::from_records(&[record("Ann", 45)], 10);
        let text = board.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], TABLE_HEADER);
        assert_eq!(lines[1], "-".repeat(60));
        assert!(lines[2].starts_with("1     Ann"));
    }

    #[test]
    fn test_display_empty() {
        assert_eq!(Leaderboard::default().to_string(), "No high scores yet!\n");
    }
}
