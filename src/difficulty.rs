use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Difficulty tier: fixes both the session length and the sentence pool
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn duration_secs(&self) -> u64 {
        match self {
            Difficulty::Easy => 20,
            Difficulty::Medium => 50,
            Difficulty::Hard => 100,
        }
    }

    /// Capitalized name for menus
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}
