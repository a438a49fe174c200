use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use connect_four::ai::RandomOpponent;
use connect_four::config::{AppConfig, LoggingConfig};
use connect_four::game::LoggingObserver;
use connect_four::session::{GameMode, Session};
use connect_four::ui::App;

/// Play Connect Four in the terminal.
#[derive(Parser)]
#[command(name = "connect-four", version, about = "Play Connect Four in the terminal")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "connect_four.toml")]
    config: PathBuf,

    /// Who plays Player 2
    #[arg(long, value_enum)]
    mode: Option<GameMode>,

    /// Override the pause before the computer replies, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Seed the random opponent for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Override the log file location
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", AppConfig::default_toml()?);
        return Ok(());
    }

    // Load configuration
    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(mode) = cli.mode {
        config.game.mode = mode;
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.game.opponent_delay_ms = delay_ms;
    }
    if let Some(seed) = cli.seed {
        config.game.seed = Some(seed);
    }
    if let Some(log_file) = cli.log_file {
        config.logging.file = log_file;
    }
    config.validate().context("invalid configuration")?;

    init_logging(&config.logging)?;

    let opponent = match config.game.seed {
        Some(seed) => RandomOpponent::from_seed(seed),
        None => RandomOpponent::new(),
    };
    let mut session = Session::new(
        config.game.mode,
        Box::new(opponent),
        config.game.opponent_delay(),
    );
    session.subscribe(Box::new(LoggingObserver));

    run(App::new(session)).context("terminal UI failed")
}

/// Log to a file so records never land on the game screen.
fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let log_file = std::fs::File::create(&logging.file)
        .with_context(|| format!("creating log file {}", logging.file.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level)),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .init();

    info!(log_file = %logging.file.display(), "logging initialized");
    Ok(())
}

fn run(mut app: App) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal — always runs, even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res
}
