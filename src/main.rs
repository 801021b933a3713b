// relaytop - Terminal view of a relay's connections
// Classifies each connection and lays it out for the terminal width, with a
// detail page for the selected one

mod app;
mod line;
mod net;
mod procfs;
mod relay;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::{event::handle_key_event, AppState, DisplayConfig};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// File the tracing output is appended to; unset disables logging
const LOG_FILE_ENV: &str = "RELAYTOP_LOG";

fn main() -> Result<()> {
    init_logging()?;

    let display_config = DisplayConfig::from_env();
    tracing::info!(?display_config, "Starting relaytop");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let res = run_app(&mut terminal, display_config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "relaytop exited with an error");
        println!("Error: {:?}", err);
    }
    Ok(())
}

/// Log to the file named by RELAYTOP_LOG; the terminal belongs to the UI
fn init_logging() -> Result<()> {
    let Ok(path) = std::env::var(LOG_FILE_ENV) else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("cannot open log file {}", path))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    display_config: DisplayConfig,
) -> Result<()> {
    let mut app = AppState::with_display(display_config).with_system_tracker();
    loop {
        app.on_tick();
        terminal.draw(|f| ui::draw(f, &mut app))?;

        if !app.running {
            return Ok(());
        }

        if event::poll(app.refresh_config.ui_interval())? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key_event(&mut app, key.code);
                }
            }
        }
    }
}
