//! usermgr-tui binary entry point.
//!
//! Parses the command line, wires up file-based logging, initializes the
//! terminal in raw mode, runs the TUI event loop, and restores the
//! terminal state on exit.
//!
use crate::error::Result;
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

mod api;
mod app;
mod error;
mod ui;

/// TUI client for a user-management REST API.
#[derive(Parser)]
#[command(name = "usermgr-tui", version, about = "TUI client for a user-management REST API")]
struct Cli {
    /// Base URL of the user-management API
    #[arg(long, env = "USERMGR_API_URL", default_value = "http://localhost:4000")]
    api_url: Url,

    /// File the diagnostic log is appended to
    #[arg(long, default_value = "usermgr-tui.log")]
    log_file: PathBuf,
}

/// Send the diagnostic log to a file so it does not fight the TUI for
/// the terminal. `RUST_LOG` overrides the default `info` filter.
fn init_tracing(path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| format!("open log file {}: {}", path.display(), e))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_file)?;

    let client =
        api::ApiClient::new(cli.api_url).map_err(|e| format!("build api client: {}", e))?;
    info!("starting usermgr-tui, api base {}", client.base());

    let mut terminal = init_terminal().map_err(|e| format!("init terminal: {}", e))?;

    let res = app::run(&mut terminal, client);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        eprintln!("application error: {err}");
    }
    Ok(())
}
