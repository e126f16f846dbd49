// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod differ;
pub mod difficulty;
pub mod engine;
pub mod error;
pub mod leaderboard;
pub mod ledger;
pub mod record;
pub mod runtime;
pub mod scoring;
pub mod sentences;
pub mod session;

pub use difficulty::Difficulty;
pub use engine::{LiveFeedback, SessionEngine, TickResult};
pub use error::{EngineError, LedgerError, NameError};
pub use ledger::{CsvLedger, MemoryLedger, ScoreLedger};
pub use record::ScoreRecord;
pub use session::{Session, SessionState};
