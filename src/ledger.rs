use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use std::cell::RefCell;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::app_dirs::AppDirs;
use crate::error::LedgerError;
use crate::record::ScoreRecord;

/// Append-only store of finished sessions
pub trait ScoreLedger {
    fn append(&self, record: &ScoreRecord) -> Result<(), LedgerError>;
    /// Every well-formed record, oldest first. Malformed entries are skipped.
    fn load_all(&self) -> Result<Vec<ScoreRecord>, LedgerError>;
}

impl<T: ScoreLedger + ?Sized> ScoreLedger for Box<T> {
    fn append(&self, record: &ScoreRecord) -> Result<(), LedgerError> {
        (**self).append(record)
    }

    fn load_all(&self) -> Result<Vec<ScoreRecord>, LedgerError> {
        (**self).load_all()
    }
}

/// Headerless CSV file, one `name,score,wpm,accuracy,date` line per record
#[derive(Debug, Clone)]
pub struct CsvLedger {
    path: PathBuf,
}

impl CsvLedger {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::ledger_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for CsvLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreLedger for CsvLedger {
    fn append(&self, record: &ScoreRecord) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        // one plain line per record: names never contain commas or quotes
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Never)
            .from_writer(file);
        writer.write_record(record.to_fields())?;
        writer.flush()?;

        debug!(path = %self.path.display(), score = record.score(), "score appended");
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<ScoreRecord>, LedgerError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            // a stray quote must not swallow the lines after it
            .quoting(false)
            .from_path(&self.path)?;

        let mut records = Vec::new();
        for (line, row) in reader.records().enumerate() {
            let row = match row {
                Ok(row) => row,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    debug!(line = line + 1, error = %e, "skipping unreadable ledger line");
                    continue;
                }
            };

            match ScoreRecord::from_fields(&row) {
                Ok(record) => records.push(record),
                Err(e) => debug!(line = line + 1, error = %e, "skipping malformed ledger line"),
            }
        }

        Ok(records)
    }
}

/// Ledger kept in memory, for tests and throwaway runs
#[derive(Debug, Default)]
pub struct MemoryLedger {
    records: RefCell<Vec<ScoreRecord>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ScoreRecord>) -> Self {
        Self {
            records: RefCell::new(records),
        }
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl ScoreLedger for MemoryLedger {
    fn append(&self, record: &ScoreRecord) -> Result<(), LedgerError> {
        self.records.borrow_mut().push(record.clone());
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<ScoreRecord>, LedgerError> {
        Ok(self.records.borrow().clone())
    }
}

/// Append and report failures instead of propagating them: a finished
/// session must survive a broken ledger. Returns the error text on failure.
pub fn append_or_warn<L: ScoreLedger + ?Sized>(ledger: &L, record: &ScoreRecord) -> Option<String> {
    match ledger.append(record) {
        Ok(()) => None,
        Err(e) => {
            warn!(error = %e, "failed to save score");
            Some(format!("Failed to save score: {e}"))
        }
    }
}
