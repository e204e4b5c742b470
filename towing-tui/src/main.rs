mod app;
mod config;
mod runtime;
mod scan;
mod ui;

use anyhow::{Context, Result};
use app::App;
use config::TowingConfig;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use towing_core::{JsonFilePersister, Store};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let config = TowingConfig::load()?;
    let data_dir = config.data_dir()?;
    let store = Store::load(JsonFilePersister::new(data_dir));
    let today = chrono::Local::now().date_naive();
    let mut app = App::new(store, config, today);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = runtime::run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// The terminal belongs to ratatui, so logs go to a file instead.
fn init_tracing() -> Result<()> {
    let path = TowingConfig::log_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::options()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file at {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "towing_tui=debug,towing_core=debug".into()),
        )
        .with_writer(file)
        .with_ansi(false)
        .init();
    Ok(())
}
