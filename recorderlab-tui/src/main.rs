//! RecorderLab: terminal view for choosing which contracts get tick and bar
//! recording.
//!
//! Panels:
//! 1. Recorder: symbol entry with completion, flush interval, command keys
//! 2. Bar / Tick: current recording sets as last reported by the engine
//! 3. Log: every message the engine emitted, oldest first

mod app;
mod feed;
mod input;
mod persistence;
mod theme;
mod ui;

use std::fs::OpenOptions;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use recorderlab_core::{EventBus, LocalRecorder, RecorderEngine, RecorderLabConfig};

use crate::app::AppState;

#[derive(Parser)]
#[command(
    name = "recorderlab",
    about = "RecorderLab: configure tick and bar recording from the terminal"
)]
struct Cli {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Do not start the demo contract feed.
    #[arg(long, default_value_t = false)]
    no_feed: bool,

    /// Write tracing output here instead of the configured log file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RecorderLabConfig::from_file(path)?,
        None => RecorderLabConfig::default(),
    };
    if cli.no_feed {
        config.feed.enabled = false;
    }
    let log_file = cli.log_file.unwrap_or_else(|| config.view.log_file.clone());
    init_tracing(&log_file, &config.view.log_filter)?;

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let state_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("recorderlab")
        .join("view.json");
    let persisted = persistence::load(&state_path);

    // Engine
    let bus = Arc::new(EventBus::new());
    let recorder = Arc::new(
        LocalRecorder::start(Arc::clone(&bus), &config.recorder)
            .context("starting local recorder")?,
    );

    // Gateway stand-in
    let announced = feed::announce_initial(&recorder, config.feed.initial_contracts);
    let cancel = Arc::new(AtomicBool::new(false));
    let feed_handle = if config.feed.enabled {
        Some(
            feed::spawn_feed(Arc::clone(&recorder), &config.feed, Arc::clone(&cancel))
                .context("spawning contract feed")?,
        )
    } else {
        None
    };
    tracing::info!(announced, feed = config.feed.enabled, "engine ready");

    // View
    let engine: Arc<dyn RecorderEngine> = recorder.clone();
    let mut app = AppState::new(Arc::clone(&bus), engine);
    persistence::apply(&mut app, persisted);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the main event loop
    let tick_rate = Duration::from_millis(config.view.tick_rate_ms);
    let result = run_app(&mut terminal, &mut app, tick_rate);

    // Detach from the bus before the engine goes away.
    app.close();

    // Save state before exit
    let persisted = persistence::extract(&app);
    if let Err(e) = persistence::save(&state_path, &persisted) {
        tracing::warn!(error = %e, path = %state_path.display(), "failed to save view state");
    }

    // Shutdown feed and engine
    cancel.store(true, Ordering::Relaxed);
    if let Some(handle) = feed_handle {
        let _ = handle.join();
    }
    recorder.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "exiting on error");
    }
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    tick_rate: Duration,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Deliver queued engine events; engine faults open the error history.
        app.pump_events().context("event delivery failed")?;

        // 3. Poll for input events
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}

/// The terminal is in raw mode, so tracing goes to a file.
fn init_tracing(path: &Path, fallback_filter: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
