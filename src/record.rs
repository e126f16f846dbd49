use chrono::{DateTime, Local};
use csv::StringRecord;

use crate::error::{NameError, RecordError};

/// Text shown in an empty name field; never accepted as a name
pub const NAME_PLACEHOLDER: &str = "Enter Your Name";
pub const MAX_NAME_LEN: usize = 20;
/// Minute resolution, e.g. `2024-01-01 10:00`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Validate and normalize a player name (surrounding whitespace is dropped)
pub fn validate_name(raw: &str) -> Result<String, NameError> {
    let name = raw.trim();

    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name == NAME_PLACEHOLDER {
        return Err(NameError::Placeholder);
    }

    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(NameError::TooLong {
            len,
            max: MAX_NAME_LEN,
        });
    }

    if let Some(c) = name.chars().find(|c| !is_name_char(*c)) {
        return Err(NameError::InvalidCharacter(c));
    }

    Ok(name.to_string())
}

/// Letters and spaces only
pub fn is_name_char(c: char) -> bool {
    c.is_alphabetic() || c == ' '
}

/// One finished session, as stored in the ledger
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    name: String,
    score: u32,
    wpm: f64,
    accuracy: f64,
    timestamp: String,
}

impl ScoreRecord {
    pub fn new(name: String, score: u32, wpm: f64, accuracy: f64, timestamp: String) -> Self {
        Self {
            name,
            score,
            wpm,
            accuracy,
            timestamp,
        }
    }

    pub fn stamped(name: String, score: u32, wpm: f64, accuracy: f64, at: DateTime<Local>) -> Self {
        Self::new(name, score, wpm, accuracy, at.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn wpm(&self) -> f64 {
        self.wpm
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// One-line summary shown as the "last score" in the menu
    pub fn summary(&self) -> String {
        format!(
            "{}: {} (WPM: {:.2}, Acc: {:.2}%)",
            self.name, self.score, self.wpm, self.accuracy
        )
    }

    /// Ledger columns: `name,score,wpm,accuracy,date`
    pub fn to_fields(&self) -> [String; 5] {
        [
            self.name.clone(),
            self.score.to_string(),
            format!("{:.2}", self.wpm),
            format!("{:.2}", self.accuracy),
            self.timestamp.clone(),
        ]
    }

    pub fn from_fields(fields: &StringRecord) -> Result<Self, RecordError> {
        if fields.len() != 5 {
            return Err(RecordError::FieldCount(fields.len()));
        }

        let name = validate_name(&fields[0]).map_err(|_| RecordError::Field {
            field: "name",
            value: fields[0].to_string(),
        })?;
        let score = parse_field(fields, 1, "score")?;
        let wpm = parse_field(fields, 2, "wpm")?;
        let accuracy = parse_field(fields, 3, "accuracy")?;

        Ok(Self::new(
            name,
            score,
            wpm,
            accuracy,
            fields[4].to_string(),
        ))
    }
}

fn parse_field<T: std::str::FromStr>(
    fields: &StringRecord,
    idx: usize,
    field: &'static str,
) -> Result<T, RecordError> {
    let value = &fields[idx];
    value.trim().parse().map_err(|_| RecordError::Field {
        field,
        value: value.to_string(),
    })
}
