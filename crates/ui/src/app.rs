//! Application Runner
//!
//! Runs the edit loop and the render loop over one shared editor state.
//! The edit loop blocks on terminal input; the render loop sleeps for the
//! refresh interval and repaints. Both take the state lock for the whole of
//! one edit or one paint.

use std::future::Future;
use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use tedit_core::AppConfig;
use tedit_editor::{ScreenSize, SharedState};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::keys::{self, Input};
use crate::painter::Painter;
use crate::theme::Theme;

/// How long the edit loop waits for input before checking for shutdown
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Raw mode and alternate screen, restored on drop
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)
            .context("failed to enter the alternate screen")?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Current terminal size
pub fn terminal_size() -> ScreenSize {
    match crossterm::terminal::size() {
        Ok((cols, rows)) => ScreenSize::new(rows, cols),
        Err(e) => {
            warn!("Cannot query terminal size: {}", e);
            ScreenSize::default()
        }
    }
}

/// Main application controller
pub struct App {
    state: SharedState,
    theme: Theme,
    refresh: Duration,
    stop: Arc<AtomicBool>,
}

impl App {
    pub fn new(state: SharedState, config: &AppConfig) -> Self {
        let theme = Theme::by_name(&config.editor.theme).unwrap_or_else(|| {
            warn!("Unknown theme {:?}, using the default", config.editor.theme);
            Theme::default()
        });
        Self {
            state,
            theme,
            refresh: Duration::from_millis(config.editor.refresh_interval_ms),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Run until the user quits or the process is told to terminate
    pub async fn run(self) -> Result<()> {
        let _guard = TerminalGuard::enter()?;
        info!("Editor started");

        let edit = {
            let state = self.state.clone();
            let stop = self.stop.clone();
            tokio::task::spawn_blocking(move || edit_loop(state, stop))
        };
        let render = {
            let painter = Painter::new(io::stdout(), self.theme.clone());
            tokio::spawn(render_loop(
                self.state.clone(),
                painter,
                self.refresh,
                self.stop.clone(),
            ))
        };

        let shutdown = async {
            tokio::select! {
                res = tokio::signal::ctrl_c() => {
                    info!("Interrupted");
                    res.context("failed to listen for interrupt")
                }
                _ = terminate() => {
                    info!("Terminated");
                    Ok(())
                }
            }
        };

        let outcome = supervise(edit, render, &self.stop, shutdown).await;
        if let Err(e) = &outcome {
            error!("Editor stopped on error: {:#}", e);
        }
        outcome
    }
}

/// Wait until either loop ends or `shutdown` resolves, then stop both.
///
/// Returns only once neither loop can touch the terminal again.
async fn supervise(
    mut edit: JoinHandle<Result<()>>,
    mut render: JoinHandle<Result<()>>,
    stop: &AtomicBool,
    shutdown: impl Future<Output = Result<()>>,
) -> Result<()> {
    let mut edit_done = false;
    let mut render_done = false;

    let outcome = tokio::select! {
        res = &mut edit => {
            edit_done = true;
            res.context("edit loop panicked").and_then(|r| r)
        }
        res = &mut render => {
            render_done = true;
            res.context("render loop panicked").and_then(|r| r)
        }
        res = shutdown => res,
    };

    stop.store(true, Ordering::SeqCst);
    if !render_done {
        render.abort();
        match render.await {
            Ok(Err(e)) => warn!("Render loop failed while stopping: {:#}", e),
            Err(e) if !e.is_cancelled() => warn!("Render loop panicked: {}", e),
            _ => {}
        }
    }
    if !edit_done {
        match edit.await {
            Ok(Err(e)) => warn!("Edit loop failed while stopping: {:#}", e),
            Err(e) => warn!("Edit loop panicked: {}", e),
            Ok(Ok(())) => {}
        }
    }
    debug!("Both loops stopped");
    outcome
}

/// Read keys and apply them to the state until a quit is accepted
fn edit_loop(state: SharedState, stop: Arc<AtomicBool>) -> Result<()> {
    while !stop.load(Ordering::SeqCst) {
        if !event::poll(INPUT_POLL).context("failed to poll terminal input")? {
            continue;
        }
        let event = event::read().context("failed to read terminal input")?;

        let mut guard = state.lock();
        match keys::decode(&event) {
            Input::Commands(commands) => {
                for command in commands {
                    debug!("Executing {:?}", command);
                    guard.execute(command);
                }
            }
            Input::Resize(rows, cols) => guard.resize(ScreenSize::new(rows, cols)),
            Input::Ignore => {}
        }
        if guard.quit_requested() {
            info!("Quit requested");
            return Ok(());
        }
    }
    Ok(())
}

/// Repaint every `refresh` until told to stop
async fn render_loop(
    state: SharedState,
    mut painter: Painter<Stdout>,
    refresh: Duration,
    stop: Arc<AtomicBool>,
) -> Result<()> {
    while !stop.load(Ordering::SeqCst) {
        {
            let guard = state.lock();
            painter.paint(&guard).context("failed to paint")?;
        }
        tokio::time::sleep(refresh).await;
    }
    Ok(())
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            warn!("Cannot listen for SIGTERM: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
