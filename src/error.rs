use thiserror::Error;

use crate::difficulty::Difficulty;
use crate::session::SessionState;

/// Why a player name was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("name is empty")]
    Empty,

    #[error("name is still the placeholder text")]
    Placeholder,

    #[error("name is {len} characters long, at most {max} are allowed")]
    TooLong { len: usize, max: usize },

    #[error("name contains {0:?}, only letters and spaces are allowed")]
    InvalidCharacter(char),
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid player name: {0}")]
    Validation(#[from] NameError),

    #[error("Cannot {operation} while the session is {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),
}

/// A single ledger line that could not be turned into a record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("expected 5 fields, found {0}")]
    FieldCount(usize),

    #[error("invalid {field}: {value:?}")]
    Field { field: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corpus file {0} not found")]
    Missing(String),

    #[error("No sentences for {0} difficulty")]
    EmptyPool(Difficulty),

    #[error("No sentences given")]
    NoSentences,
}

pub type EngineResult<T> = Result<T, EngineError>;
