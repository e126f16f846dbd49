use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::info;

use crate::clock::Clock;
use crate::config::Config;
use crate::difficulty::Difficulty;
use crate::engine::{LiveFeedback, SessionEngine};
use crate::error::{EngineError, EngineResult};
use crate::leaderboard::Leaderboard;
use crate::ledger::{append_or_warn, ScoreLedger};
use crate::record::{is_name_char, ScoreRecord, MAX_NAME_LEN};
use crate::runtime::AppEvent;
use crate::sentences::SentenceSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Menu,
    Typing,
    Results,
    HighScores,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Play(Difficulty),
    HighScores,
    Exit,
}

impl MenuItem {
    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::Play(difficulty) => difficulty.label(),
            MenuItem::HighScores => "High Scores",
            MenuItem::Exit => "Exit",
        }
    }
}

pub const MENU_ITEMS: [MenuItem; 5] = [
    MenuItem::Play(Difficulty::Easy),
    MenuItem::Play(Difficulty::Medium),
    MenuItem::Play(Difficulty::Hard),
    MenuItem::HighScores,
    MenuItem::Exit,
];

pub const NAME_REQUIRED: &str = "Please enter your name before starting.";

/// Screen state around the engine: turns key events and ticks into engine
/// calls and keeps what the renderer needs
#[derive(Debug)]
pub struct App<S, C, L> {
    engine: SessionEngine<S, C>,
    ledger: L,
    leaderboard_size: usize,
    pub state: AppState,
    pub name_input: String,
    pub menu_index: usize,
    pub difficulty: Difficulty,
    /// Raw typing buffer for the current sentence
    pub input: String,
    pub feedback: Option<LiveFeedback>,
    pub remaining_secs: f64,
    pub last_record: Option<ScoreRecord>,
    pub leaderboard: Leaderboard,
    /// One-line message for the user (bad name, failed save, ...)
    pub status: Option<String>,
    pub should_quit: bool,
}

impl<S: SentenceSource, C: Clock, L: ScoreLedger> App<S, C, L> {
    pub fn new(engine: SessionEngine<S, C>, ledger: L, config: &Config) -> Self {
        let name_input = config
            .player_name
            .as_deref()
            .unwrap_or_default()
            .chars()
            .filter(|c| is_name_char(*c))
            .take(MAX_NAME_LEN)
            .collect();
        let menu_index = MENU_ITEMS
            .iter()
            .position(|item| *item == MenuItem::Play(config.difficulty))
            .unwrap_or(0);

        Self {
            engine,
            ledger,
            leaderboard_size: config.leaderboard_size,
            state: AppState::Menu,
            name_input,
            menu_index,
            difficulty: config.difficulty,
            input: String::new(),
            feedback: None,
            remaining_secs: 0.0,
            last_record: None,
            leaderboard: Leaderboard::default(),
            status: None,
            should_quit: false,
        }
    }

    pub fn engine(&self) -> &SessionEngine<S, C> {
        &self.engine
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn selected_item(&self) -> MenuItem {
        MENU_ITEMS[self.menu_index % MENU_ITEMS.len()]
    }

    pub fn last_score_info(&self) -> String {
        self.last_record
            .as_ref()
            .map_or_else(|| "N/A".to_string(), ScoreRecord::summary)
    }

    /// Seconds the finished session ran for
    pub fn elapsed_secs(&self) -> Option<f64> {
        self.engine.session().and_then(|s| s.elapsed_at_expiry())
    }

    /// Settings worth restoring next launch
    pub fn remembered(&self, base: &Config) -> Config {
        Config {
            player_name: Some(self.name_input.trim().to_string()).filter(|n| !n.is_empty()),
            difficulty: self.difficulty,
            ..base.clone()
        }
    }

    pub fn on_event(&mut self, event: AppEvent) -> EngineResult<()> {
        if let AppEvent::Key(key) = event {
            // A key that lands after the deadline belongs to no run
            let before = self.state;
            self.tick()?;
            if self.state != before {
                return Ok(());
            }
            self.on_key(key)?;
        }
        // Ticking after keys too keeps a fast typist from starving the countdown
        self.tick()
    }

    pub fn on_key(&mut self, key: KeyEvent) -> EngineResult<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }

        match self.state {
            AppState::Menu => self.on_menu_key(key),
            AppState::Typing => self.on_typing_key(key),
            AppState::Results => self.on_results_key(key),
            AppState::HighScores => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b')) {
                    self.state = AppState::Menu;
                }
                Ok(())
            }
        }
    }

    /// Drive the countdown while a session is on screen
    pub fn tick(&mut self) -> EngineResult<()> {
        if self.state != AppState::Typing {
            return Ok(());
        }

        let now = self.engine.clock().now();
        let result = self.engine.on_tick(now)?;
        self.remaining_secs = result.remaining_secs;

        if result.expired {
            self.finalize()?;
        }
        Ok(())
    }

    fn on_menu_key(&mut self, key: KeyEvent) -> EngineResult<()> {
        match key.code {
            KeyCode::Char(c) if is_name_char(c) => {
                if self.name_input.chars().count() < MAX_NAME_LEN {
                    self.name_input.push(c);
                }
            }
            KeyCode::Backspace => {
                self.name_input.pop();
            }
            KeyCode::Up => {
                self.menu_index = (self.menu_index + MENU_ITEMS.len() - 1) % MENU_ITEMS.len();
            }
            KeyCode::Down | KeyCode::Tab => {
                self.menu_index = (self.menu_index + 1) % MENU_ITEMS.len();
            }
            KeyCode::Enter => match self.selected_item() {
                MenuItem::Play(difficulty) => self.start_session(difficulty)?,
                MenuItem::HighScores => self.show_high_scores(),
                MenuItem::Exit => self.should_quit = true,
            },
            KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
        Ok(())
    }

    fn on_typing_key(&mut self, key: KeyEvent) -> EngineResult<()> {
        match key.code {
            KeyCode::Esc => {
                self.engine.abandon();
                self.feedback = None;
                self.state = AppState::Menu;
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.start_session(self.difficulty)?;
            }
            // copy, paste and friends are not typing
            KeyCode::Char(_)
                if key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {}
            KeyCode::Char(c) => {
                self.input.push(c);
                self.update_input()?;
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.update_input()?;
            }
            _ => {}
        }
        Ok(())
    }

    fn on_results_key(&mut self, key: KeyEvent) -> EngineResult<()> {
        match key.code {
            KeyCode::Char('r') => self.start_session(self.difficulty)?,
            KeyCode::Char('m') | KeyCode::Esc => {
                self.engine.abandon();
                self.state = AppState::Menu;
            }
            KeyCode::Char('h') => self.show_high_scores(),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
        Ok(())
    }

    fn start_session(&mut self, difficulty: Difficulty) -> EngineResult<()> {
        match self.engine.start(difficulty, &self.name_input) {
            Ok(session) => {
                self.feedback = Some(LiveFeedback::pending(session.current_sentence()));
                self.remaining_secs = session.duration_secs() as f64;
                self.difficulty = difficulty;
                self.input.clear();
                self.status = None;
                self.state = AppState::Typing;
                Ok(())
            }
            Err(EngineError::Validation(e)) => {
                info!(error = %e, "session not started");
                self.status = Some(NAME_REQUIRED.to_string());
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn update_input(&mut self) -> EngineResult<()> {
        let feedback = self.engine.on_input_changed(&self.input)?;
        if feedback.completed {
            self.input.clear();
        }
        self.feedback = Some(feedback);
        Ok(())
    }

    fn finalize(&mut self) -> EngineResult<()> {
        let record = self.engine.finish()?;
        self.status = append_or_warn(&self.ledger, &record);
        self.last_record = Some(record);
        self.input.clear();
        self.state = AppState::Results;
        Ok(())
    }

    fn show_high_scores(&mut self) {
        self.leaderboard = Leaderboard::load(&self.ledger, self.leaderboard_size);
        self.state = AppState::HighScores;
    }
}
