//! Musicshelf TUI
//!
//! Terminal user interface for browsing singers.
//!
//! ## Layout
//!
//! Two-pane layout:
//! - Left: Singer list
//! - Right: Detail preview (genres, counts, website, description)
//!
//! ## Keys
//!
//! - j/k or ↑/↓: Move selection up/down
//! - gg / G: Jump to first / last singer
//! - Enter: Open the singer's website in the browser
//! - r: Refresh from the server
//! - R: Retry after a failed refresh
//! - ?: Help
//! - q: Quit
//!
//! The view talks to the sync engine through a channel sink. A terminal
//! resize tears the view down and builds it again: the sink is detached and
//! a fresh one attached, which triggers a new refresh while the engine keeps
//! its single cache subscription.

mod app;
mod ui;

use std::io::stdout;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

use musicshelf_core::{ChannelSink, Config, HttpRemote, SyncEngine, ViewUpdate};

use app::App;

use crate::commands::open_cache;
use crate::logging::init_tui_logging;

/// Run the TUI application
pub async fn run(config_path: Option<&PathBuf>) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    // Initialize TUI logging (file-based, only if MUSICSHELF_LOG is set)
    init_tui_logging(&config);

    let cache = open_cache(&config)?;
    let remote = HttpRemote::from_config(&config).context("Failed to create HTTP client")?;
    let engine = SyncEngine::spawn(Arc::new(cache), Arc::new(remote));

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = App::new();
    let result = run_app(&mut terminal, &mut app, &engine).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    engine.shutdown().await;
    info!("TUI exited");

    result
}

/// Attach a fresh sink and return the receiver the view drains
fn attach_view(engine: &SyncEngine) -> UnboundedReceiver<ViewUpdate> {
    let (sink, updates) = ChannelSink::new();
    engine.attach(sink);
    updates
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    engine: &SyncEngine,
) -> Result<()> {
    let mut updates = attach_view(engine);
    let mut view_open = true;

    loop {
        app.check_status_timeout();

        terminal.draw(|frame| ui::draw(frame, app))?;

        tokio::select! {
            biased;

            update = updates.recv(), if view_open => {
                match update {
                    Some(update) => {
                        debug!("View update: {}", update_label(&update));
                        app.apply(update);
                    }
                    None => {
                        warn!("Sync engine stopped delivering updates");
                        app.set_status("Sync engine stopped");
                        view_open = false;
                    }
                }
            }

            // Poll for terminal events
            _ = tokio::time::sleep(Duration::from_millis(50)) => {
                if !event::poll(Duration::from_millis(0))? {
                    continue;
                }

                match event::read()? {
                    Event::Key(key) => {
                        // Only handle key press events (not release)
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }

                        // If help is showing, any key dismisses it
                        if app.show_help {
                            app.show_help = false;
                            continue;
                        }

                        handle_key(app, engine, key.code, key.modifiers);
                    }
                    Event::Resize(width, height) => {
                        debug!("Terminal resized to {}x{}, rebuilding view", width, height);
                        engine.detach();
                        updates = attach_view(engine);
                        view_open = true;
                        app.view_rebuilt();
                    }
                    _ => {}
                }
            }
        }

        if app.should_quit {
            engine.detach();
            break;
        }
    }

    Ok(())
}

/// Handle a key press in the main view
fn handle_key(app: &mut App, engine: &SyncEngine, code: KeyCode, modifiers: KeyModifiers) {
    // Clear pending 'g' if timeout expired (500ms)
    if let Some(time) = app.pending_g {
        if time.elapsed() > Duration::from_millis(500) {
            app.pending_g = None;
        }
    }

    match code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }

        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),

        // gg: jump to first
        KeyCode::Char('g') => {
            if app.pending_g.take().is_some() {
                app.move_to_first();
            } else {
                app.pending_g = Some(std::time::Instant::now());
            }
        }
        KeyCode::Char('G') => app.move_to_last(),

        KeyCode::Enter => app.open_current_link(),

        KeyCode::Char('r') => {
            engine.refresh();
        }
        KeyCode::Char('R') => {
            if !app.retry.retry(engine) {
                app.set_status("Nothing to retry");
            }
        }

        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

/// Short description of an update for the debug log
fn update_label(update: &ViewUpdate) -> String {
    match update {
        ViewUpdate::Snapshot { singers, source } => {
            format!("{:?} snapshot ({} singers)", source, singers.len())
        }
        ViewUpdate::RefreshStarted => "refresh started".to_string(),
        ViewUpdate::RefreshFinished => "refresh finished".to_string(),
        ViewUpdate::Failure {
            kind, after_retry, ..
        } => format!("{} failure (after retry: {})", kind, after_retry),
    }
}
