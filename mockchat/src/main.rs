//! `MockChat` — terminal chat client backed by a simulated relay.
//!
//! Every remote participant is synthetic and every server effect is
//! simulated in-process, so no network is involved. Configuration via CLI
//! flags, environment variables, or config file
//! (`~/.config/mockchat/config.toml`).
//!
//! ```bash
//! # Prompt for an identity
//! cargo run --bin mockchat
//!
//! # Join straight away with two synthetic peers and reproducible replies
//! cargo run --bin mockchat -- --identity neo --peer trinity --peer morpheus --seed 7
//! ```

use std::io;
use std::path::Path;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_appender::non_blocking::WorkerGuard;

use mockchat::app::App;
use mockchat::chat::ChatClient;
use mockchat::config::{CliArgs, ClientConfig};
use mockchat::ui;
use mockchat_relay::clock::SystemClock;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > env > config file > defaults).
    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Initialize logging before terminal setup (logs go to file, not stdout).
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!(
        peers = config.simulation.peers.len(),
        seeded = config.simulation.seed.is_some(),
        "mockchat starting"
    );

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app.
    let result = run_app(&mut terminal, &config);

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("mockchat exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, since ratatui owns the terminal).
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("mockchat.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Main application loop.
///
/// Each pass lets the simulation catch up with the wall clock, draws a
/// frame, then waits for a key until the next simulated effect is due or
/// the poll timeout elapses, whichever comes first.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &ClientConfig,
) -> io::Result<()> {
    let random = config.simulation.random_source();
    let client = ChatClient::new(&config.simulation, SystemClock::new(), random);
    let mut app = App::new(client);

    if let Some(identity) = config.identity.as_deref() {
        app.join(identity);
    }

    loop {
        // Step 1: Deliver whatever the relay has produced by now.
        app.tick();

        // Step 2: Draw the UI frame.
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Step 3: Poll for terminal input, waking early for due effects.
        let timeout = app
            .client()
            .time_to_next_deadline()
            .map_or(config.poll_timeout, |due| due.min(config.poll_timeout));

        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key_event(key);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
