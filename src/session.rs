use chrono::{DateTime, Local};

use crate::difficulty::Difficulty;
use crate::record::ScoreRecord;

/// Lifecycle of a timed run. Moves only forward: Idle -> Running -> Expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SessionState {
    Idle,
    Running,
    Expired,
}

/// One timed typing run. Only the engine mutates it.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) player: String,
    pub(crate) difficulty: Difficulty,
    pub(crate) duration_secs: u64,
    pub(crate) started_at: DateTime<Local>,
    pub(crate) current_sentence: String,
    pub(crate) total_typed_characters: usize,
    pub(crate) total_correct_characters: usize,
    pub(crate) sentences_completed: usize,
    pub(crate) state: SessionState,
    pub(crate) elapsed_at_expiry: Option<f64>,
    // Computed once at expiry, handed out once by `finish`
    pub(crate) record: Option<ScoreRecord>,
    pub(crate) record_claimed: bool,
}

impl Session {
    pub(crate) fn new(
        player: String,
        difficulty: Difficulty,
        started_at: DateTime<Local>,
        first_sentence: String,
    ) -> Self {
        Self {
            player,
            difficulty,
            duration_secs: difficulty.duration_secs(),
            started_at,
            current_sentence: first_sentence,
            total_typed_characters: 0,
            total_correct_characters: 0,
            sentences_completed: 0,
            state: SessionState::Running,
            elapsed_at_expiry: None,
            record: None,
            record_claimed: false,
        }
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn current_sentence(&self) -> &str {
        &self.current_sentence
    }

    pub fn total_typed_characters(&self) -> usize {
        self.total_typed_characters
    }

    pub fn total_correct_characters(&self) -> usize {
        self.total_correct_characters
    }

    pub fn sentences_completed(&self) -> usize {
        self.sentences_completed
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    /// Seconds from start to expiry, once expired
    pub fn elapsed_at_expiry(&self) -> Option<f64> {
        self.elapsed_at_expiry
    }

    /// Credit a fully matched sentence and move on to the next one
    pub(crate) fn complete_sentence(&mut self, next: String) {
        let len = self.current_sentence.chars().count();
        self.total_typed_characters += len;
        self.total_correct_characters += len;
        self.sentences_completed += 1;
        self.current_sentence = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_running_and_zeroed() {
        let session = Session::new("Ann".into(), Difficulty::Medium, Local::now(), "abc".into());

        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.duration_secs(), 50);
        assert_eq!(session.total_typed_characters(), 0);
        assert_eq!(session.total_correct_characters(), 0);
        assert_eq!(session.current_sentence(), "abc");
        assert!(session.elapsed_at_expiry().is_none());
    }

    #[test]
    fn test_complete_sentence_credits_whole_sentence() {
        let mut session = Session::new("Ann".into(), Difficulty::Easy, Local::now(), "héllo".into());

        session.complete_sentence("next".into());

        assert_eq!(session.total_typed_characters(), 5);
        assert_eq!(session.total_correct_characters(), 5);
        assert_eq!(session.sentences_completed(), 1);
        assert_eq!(session.current_sentence(), "next");
    }

    #[test]
    fn test_state_display() {
        assert_eq!(SessionState::Idle.to_string(), "idle");
        assert_eq!(SessionState::Expired.to_string(), "expired");
    }
}
