//! critic: interactive code-review assistant for the terminal.
//!
//! Opens a source file (or an empty buffer) in an editor panel, asks the analysis
//! service for a suggested rewrite and a syntax check, and lets the user accept the
//! suggestion with or without its comments, or reject it.
//!
//! # Startup sequence
//!
//! 1. Parse the CLI and initialise logging (log file for the TUI, stderr for `--check`).
//! 2. Load the config file and merge it with flags and environment.
//! 3. Build the HTTP analysis client and read the input file, all before the
//!    terminal is touched so errors print normally.
//! 4. `install_panic_hook()`, `register_shutdown_signals()`, then `init_tui()`.
//! 5. Spawn the input task and run the event loop.
//!
//! `restore_tui()` runs after the event loop on every non-panic exit path, including
//! draw errors; the panic hook covers the rest.

mod analysis;
mod app;
mod config;
mod editor;
mod event;
mod headless;
mod highlight;
mod logging;
mod source;
mod theme;
mod tui;
mod ui;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use critic_core::{AnalysisClient, HttpAnalysisClient, Intent};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::app::AppState;
use crate::config::{Config, FileConfig, Overrides};
use crate::event::AppEvent;
use crate::theme::Theme;
use crate::ui::keybindings::{handle_key, handle_mouse, KeyAction};

#[derive(Debug, Parser)]
#[command(name = "critic", version, about = "Interactive code-review assistant")]
struct Cli {
    /// Source file to open.
    file: Option<PathBuf>,

    /// Analysis service base URL.
    #[arg(long, env = "CRITIC_SERVER_URL")]
    server: Option<String>,

    /// API key sent with every request.
    #[arg(long, env = "CRITIC_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Color theme: dark, light or catppuccin-mocha.
    #[arg(long)]
    theme: Option<String>,

    /// Review FILE without the UI and print a plain-text report.
    #[arg(long, requires = "file")]
    check: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();
    if cli.check {
        logging::init_stderr();
    } else {
        logging::init_file();
    }

    let config_path = config::config_path();
    let file_config = config::load_file(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "ignoring config file");
        FileConfig::default()
    });
    let config = Config::resolve(
        file_config,
        Overrides {
            server_url: cli.server,
            api_key: cli.api_key,
            theme: cli.theme,
        },
    );
    info!(server = %config.server_url, theme = %config.theme, "starting critic");

    let client =
        HttpAnalysisClient::new(config.client_options()).map_err(std::io::Error::other)?;

    let code = match &cli.file {
        Some(path) => Some(source::read_source(path).map_err(|e| {
            std::io::Error::new(e.kind(), format!("{}: {e}", path.display()))
        })?),
        None => None,
    };

    if cli.check {
        let session = headless::run(&client, code.unwrap_or_default()).await;
        headless::write_report(&session, &mut std::io::stdout().lock())?;
        return Ok(());
    }

    run_tui(Arc::new(client), Theme::from_name(&config.theme), code).await
}

async fn run_tui(
    client: Arc<dyn AnalysisClient>,
    theme: Theme,
    code: Option<String>,
) -> std::io::Result<()> {
    let mut state = AppState::new(theme);
    if let Some(code) = code {
        state.dispatch(Intent::FileLoaded(code));
    }

    tui::install_panic_hook();
    let term_flag = tui::register_shutdown_signals()?;
    let mut terminal = tui::init_tui()?;

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());

    let result = event_loop(
        &mut terminal,
        &mut state,
        client,
        handler.tx,
        handler.rx,
        &term_flag,
    )
    .await;

    tui::restore_tui()?;
    info!("critic exiting");
    result
}

/// Runs until quit, SIGTERM/SIGHUP, or the first draw error. The caller restores the
/// terminal in every case.
async fn event_loop(
    terminal: &mut tui::Tui,
    state: &mut AppState,
    client: Arc<dyn AnalysisClient>,
    tx: mpsc::UnboundedSender<AppEvent>,
    mut rx: mpsc::UnboundedReceiver<AppEvent>,
    term_flag: &AtomicBool,
) -> std::io::Result<()> {
    loop {
        // Calls queued before the first event (the startup file load) or by the last one.
        for call in state.take_outbox() {
            analysis::spawn_call(call, Arc::clone(&client), tx.clone());
        }

        tokio::select! {
            // Heartbeat: the shutdown flag is checked at least every 50 ms even when idle.
            _ = tokio::time::sleep(Duration::from_millis(50)) => {}
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(AppEvent::Render) => {
                        terminal.draw(|frame| ui::render(frame, state))?;
                    }
                    Some(AppEvent::Key(key)) => {
                        if handle_key(key, state) == KeyAction::Quit {
                            return Ok(());
                        }
                    }
                    Some(AppEvent::Mouse(mouse)) => {
                        handle_mouse(mouse, state);
                    }
                    Some(AppEvent::Analysis(completion)) => state.complete(completion),
                    Some(AppEvent::Tick) => state.on_tick(),
                    // ratatui picks up the new size from frame.area() on the next Render.
                    Some(AppEvent::Resize(_, _)) => {}
                    Some(AppEvent::Quit) | None => return Ok(()),
                }
            }
        }

        if term_flag.load(Ordering::Relaxed) {
            info!("termination signal received");
            return Ok(());
        }
    }
}
