mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
};
use tracing::{error, info, warn, Level};
use typemaster::{
    app::App,
    app_dirs::AppDirs,
    clock::{Clock, SystemClock},
    config::{Config, ConfigStore, FileConfigStore},
    error::CorpusError,
    leaderboard::Leaderboard,
    ledger::{CsvLedger, ScoreLedger},
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    sentences::{FixedSentences, SentencePool, SentenceSource},
    Difficulty, SessionEngine,
};

/// timed typing test with live feedback and a ranked high score table
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A timed typing test: type the sentences shown before the clock runs out. Easy, medium and hard tiers last 20, 50 and 100 seconds. Every finished run is scored and saved to a local high score ledger."
)]
pub struct Cli {
    /// difficulty preselected in the menu
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// player name to prefill
    #[clap(short = 'n', long)]
    name: Option<String>,

    /// practice a single custom sentence instead of the built-in pools
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// directory of corpus json files (easy.json, medium.json, hard.json)
    #[clap(long)]
    corpus: Option<PathBuf>,

    /// score ledger file to read and append to
    #[clap(long)]
    ledger: Option<PathBuf>,

    /// print the high score table and exit
    #[clap(long)]
    scores: bool,

    /// number of entries in the high score table
    #[clap(long)]
    top: Option<usize>,

    /// log at debug level
    #[clap(long)]
    debug: bool,
}

impl Cli {
    /// Layer command line flags over the stored config
    fn apply(&self, config: &Config) -> Config {
        let mut config = config.clone();
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if let Some(name) = &self.name {
            config.player_name = Some(name.clone());
        }
        if let Some(corpus) = &self.corpus {
            config.corpus_dir = Some(corpus.clone());
        }
        if let Some(ledger) = &self.ledger {
            config.ledger_path = Some(ledger.clone());
        }
        if let Some(top) = self.top {
            config.leaderboard_size = top;
        }
        config
    }

    fn sentence_source(&self, config: &Config) -> Result<Box<dyn SentenceSource>, CorpusError> {
        if let Some(prompt) = &self.prompt {
            return Ok(Box::new(FixedSentences::new([prompt.as_str()])?));
        }

        match &config.corpus_dir {
            Some(dir) => Ok(Box::new(SentencePool::from_dir(dir)?)),
            None => Ok(Box::new(SentencePool::builtin())),
        }
    }
}

fn ledger_for(config: &Config) -> CsvLedger {
    config
        .ledger_path
        .as_ref()
        .map_or_else(CsvLedger::new, CsvLedger::with_path)
}

/// Log to a file: the terminal belongs to the TUI
fn init_logging(debug: bool) {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(if debug { Level::DEBUG } else { Level::INFO })
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.prompt.as_deref().is_some_and(|p| p.trim().is_empty()) {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::InvalidValue, "prompt must not be empty")
            .exit();
    }

    let store = FileConfigStore::new();
    let stored = store.load();
    let config = cli.apply(&stored);
    let ledger = ledger_for(&config);

    if cli.scores {
        print!("{}", Leaderboard::load(&ledger, config.leaderboard_size));
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging(cli.debug);
    info!(ledger = %ledger.path().display(), difficulty = %config.difficulty, "starting");

    let engine = SessionEngine::new(cli.sentence_source(&config)?, SystemClock);
    let mut app = App::new(engine, ledger, &config);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, config.tick_rate_ms);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    if let Err(e) = store.save(&app.remembered(&stored)) {
        warn!(error = %e, "failed to save config");
    }

    result
}

fn start_tui<B, S, C, L>(
    terminal: &mut Terminal<B>,
    app: &mut App<S, C, L>,
    tick_rate_ms: u64,
) -> Result<(), Box<dyn Error>>
where
    B: Backend,
    S: SentenceSource,
    C: Clock,
    L: ScoreLedger,
{
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::from_millis(tick_rate_ms),
    );

    loop {
        terminal.draw(|f| ui::draw(app, f))?;

        if app.should_quit {
            break;
        }

        if let Err(e) = app.on_event(runner.step()) {
            error!(error = %e, "engine rejected an operation");
            return Err(e.into());
        }
    }

    Ok(())
}
