use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::clock::{seconds_between, Clock, SystemClock};
use crate::difficulty::Difficulty;
use crate::differ::{self, CharClass};
use crate::error::{EngineError, EngineResult};
use crate::record::{validate_name, ScoreRecord};
use crate::scoring::{compute_accuracy, compute_score, compute_wpm};
use crate::sentences::{SentencePool, SentenceSource};
use crate::session::{Session, SessionState};

/// Result of one input-buffer snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct LiveFeedback {
    /// Sentence to render; the next one when `completed` is set
    pub sentence: String,
    pub chars: Vec<CharClass>,
    pub wpm: f64,
    pub accuracy: f64,
    /// The snapshot matched the sentence: clear the input buffer
    pub completed: bool,
}

impl LiveFeedback {
    /// Nothing typed yet against `sentence`
    pub fn pending(sentence: &str) -> Self {
        Self {
            sentence: sentence.to_string(),
            chars: differ::diff(sentence, ""),
            wpm: 0.0,
            accuracy: 0.0,
            completed: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickResult {
    pub remaining_secs: f64,
    /// This tick ended the session
    pub expired: bool,
}

impl TickResult {
    /// Remaining time as shown on the countdown
    pub fn whole_seconds(&self) -> u64 {
        self.remaining_secs.max(0.0) as u64
    }
}

/// Drives one timed session at a time. Passive: keystroke snapshots and
/// clock ticks are pushed in by the caller, which also owns the tick cadence.
#[derive(Debug)]
pub struct SessionEngine<S = SentencePool, C = SystemClock> {
    source: S,
    clock: C,
    session: Option<Session>,
    last_feedback: Option<LiveFeedback>,
}

impl SessionEngine {
    pub fn with_builtin_sentences() -> Self {
        Self::new(SentencePool::builtin(), SystemClock)
    }
}

impl<S: SentenceSource, C: Clock> SessionEngine<S, C> {
    pub fn new(source: S, clock: C) -> Self {
        Self {
            source,
            clock,
            session: None,
            last_feedback: None,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map_or(SessionState::Idle, |s| s.state)
    }

    /// Start a fresh run, discarding any previous session. An invalid name
    /// leaves the engine untouched.
    pub fn start(&mut self, difficulty: Difficulty, name: &str) -> EngineResult<&Session> {
        let player = validate_name(name)?;
        let sentence = self.source.next_sentence(difficulty);
        let now = self.clock.now();

        info!(%player, %difficulty, "session started");

        self.last_feedback = Some(LiveFeedback::pending(&sentence));
        let session = self
            .session
            .insert(Session::new(player, difficulty, now, sentence));
        Ok(&*session)
    }

    /// Drop the current session without producing a record
    pub fn abandon(&mut self) {
        if let Some(session) = self.session.take() {
            info!(player = %session.player, state = %session.state, "session abandoned");
        }
        self.last_feedback = None;
    }

    pub fn on_input_changed(&mut self, raw_input: &str) -> EngineResult<LiveFeedback> {
        let now = self.clock.now();
        let session = match self.session.as_mut() {
            None => {
                return Err(EngineError::InvalidState {
                    operation: "accept input",
                    state: SessionState::Idle,
                })
            }
            Some(session) if !session.is_running() => {
                return Ok(self
                    .last_feedback
                    .clone()
                    .unwrap_or_else(|| LiveFeedback::pending(&session.current_sentence)));
            }
            Some(session) => session,
        };

        let typed = raw_input.trim();
        let typed_len = typed.chars().count();
        let elapsed = seconds_between(session.started_at, now);

        let wpm = compute_wpm(typed_len, elapsed);
        let accuracy = if typed.is_empty() {
            0.0
        } else {
            compute_accuracy(differ::count_correct(&session.current_sentence, typed), typed_len)
        };

        let feedback = if differ::is_complete(&session.current_sentence, typed) {
            let next = self.source.next_sentence(session.difficulty);
            debug!(completed = %session.current_sentence, %next, "sentence completed");
            session.complete_sentence(next);

            LiveFeedback {
                completed: true,
                wpm,
                accuracy,
                ..LiveFeedback::pending(&session.current_sentence)
            }
        } else {
            LiveFeedback {
                sentence: session.current_sentence.clone(),
                chars: differ::diff(&session.current_sentence, typed),
                wpm,
                accuracy,
                completed: false,
            }
        };

        self.last_feedback = Some(feedback.clone());
        Ok(feedback)
    }

    /// Advance the countdown to `now`. Expiry finalizes the session.
    pub fn on_tick(&mut self, now: DateTime<Local>) -> EngineResult<TickResult> {
        let session = self.session.as_mut().ok_or(EngineError::InvalidState {
            operation: "tick",
            state: SessionState::Idle,
        })?;

        if !session.is_running() {
            return Ok(TickResult {
                remaining_secs: 0.0,
                expired: false,
            });
        }

        let elapsed = seconds_between(session.started_at, now);
        let remaining = (session.duration_secs as f64 - elapsed).max(0.0);

        if remaining <= 0.0 {
            expire(session, elapsed, now);
            return Ok(TickResult {
                remaining_secs: 0.0,
                expired: true,
            });
        }

        Ok(TickResult {
            remaining_secs: remaining,
            expired: false,
        })
    }

    /// Hand out the session's record. A running session is force-expired
    /// first. Each session yields its record exactly once.
    pub fn finish(&mut self) -> EngineResult<ScoreRecord> {
        let now = self.clock.now();
        let state = self.state();
        let session = self.session.as_mut().ok_or(EngineError::InvalidState {
            operation: "finish",
            state,
        })?;

        if session.is_running() {
            let elapsed = seconds_between(session.started_at, now);
            expire(session, elapsed, now);
        }

        if session.record_claimed {
            return Err(EngineError::InvalidState {
                operation: "finish",
                state,
            });
        }

        let record = session.record.clone().ok_or(EngineError::InvalidState {
            operation: "finish",
            state,
        })?;
        session.record_claimed = true;
        Ok(record)
    }
}

fn expire(session: &mut Session, elapsed: f64, now: DateTime<Local>) {
    session.state = SessionState::Expired;
    session.elapsed_at_expiry = Some(elapsed);

    let wpm = compute_wpm(session.total_typed_characters, elapsed);
    let accuracy = compute_accuracy(
        session.total_correct_characters,
        session.total_typed_characters,
    );
    let score = compute_score(wpm, accuracy);

    info!(
        player = %session.player,
        difficulty = %session.difficulty,
        score,
        wpm,
        accuracy,
        sentences = session.sentences_completed,
        "session finalized"
    );

    session.record = Some(ScoreRecord::stamped(
        session.player.clone(),
        score,
        wpm,
        accuracy,
        now,
    ));
}
