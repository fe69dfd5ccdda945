//! Terminal lifecycle management for critic.
//!
//! The UI renders to stderr so that `critic` stays usable in shell pipelines and
//! stdout is left free for the plain-text report of `--check`.

use std::io::{stderr, BufWriter, Stderr, Write};
use std::panic;
use std::sync::{atomic::AtomicBool, Arc};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::queue;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, is_raw_mode_enabled, EnterAlternateScreen,
    LeaveAlternateScreen, SetTitle,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use signal_hook::consts::{SIGHUP, SIGTERM};
use signal_hook::flag::register;
use tracing::error;

pub type Tui = Terminal<CrosstermBackend<BufWriter<Stderr>>>;

const WINDOW_TITLE: &str = "critic";

/// Queues the screen setup: alternate screen, mouse capture, hidden cursor, title.
fn write_enter(out: &mut impl Write) -> std::io::Result<()> {
    queue!(
        out,
        EnterAlternateScreen,
        EnableMouseCapture,
        Hide,
        SetTitle(WINDOW_TITLE)
    )?;
    out.flush()
}

/// Queues the inverse of [`write_enter`], in reverse order.
fn write_leave(out: &mut impl Write) -> std::io::Result<()> {
    queue!(out, Show, DisableMouseCapture, LeaveAlternateScreen)?;
    out.flush()
}

/// Puts the terminal into raw mode and draws on the alternate screen.
///
/// Call [`restore_tui`] at every exit path.
pub fn init_tui() -> std::io::Result<Tui> {
    let mut out = BufWriter::new(stderr());
    enable_raw_mode()?;
    if let Err(e) = write_enter(&mut out) {
        let _ = disable_raw_mode();
        return Err(e);
    }
    Terminal::new(CrosstermBackend::new(out))
}

/// Restores the terminal to its pre-TUI state.
///
/// Does nothing unless raw mode is on, so a second call, or a panic before
/// [`init_tui`], leaves the shell untouched.
pub fn restore_tui() -> std::io::Result<()> {
    if !is_raw_mode_enabled()? {
        return Ok(());
    }
    disable_raw_mode()?;
    write_leave(&mut stderr())
}

/// Installs a panic hook that restores the terminal and records the panic in the
/// log file before the default printer runs.
///
/// Must be called before [`init_tui`].
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_tui();
        error!(%panic_info, "critic panicked");
        original_hook(panic_info);
    }));
}

/// Registers SIGTERM and SIGHUP handlers that both set the returned flag.
///
/// The main loop polls the flag on every event and on a 50 ms heartbeat, so a
/// closed terminal window shuts down the same way as `kill`.
pub fn register_shutdown_signals() -> std::io::Result<Arc<AtomicBool>> {
    let term = Arc::new(AtomicBool::new(false));
    for signal in [SIGTERM, SIGHUP] {
        register(signal, Arc::clone(&term))?;
    }
    Ok(term)
}
