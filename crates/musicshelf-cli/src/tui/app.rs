//! Application state and logic

use chrono::{DateTime, Local};
use musicshelf_core::{RetryController, Singer, SnapshotSource, ViewUpdate};

/// How long a status message stays on screen
const STATUS_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(3);

/// Refresh indicator shown in the top-right corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshIndicator {
    /// Nothing has settled yet
    Idle,
    /// A network refresh is in flight
    Refreshing,
    /// The last refresh delivered fresh data
    Fresh,
    /// The last refresh failed
    Failed,
}

/// Application state
pub struct App {
    /// Whether the app should exit
    pub should_quit: bool,
    /// Singers currently displayed
    pub singers: Vec<Singer>,
    /// Currently selected singer index
    pub selected: usize,
    /// Network refresh indicator
    pub indicator: RefreshIndicator,
    /// Tracks whether a retry is on offer
    pub retry: RetryController,
    /// Status message to display temporarily
    pub status_message: Option<String>,
    /// When the status message was set (for auto-dismiss)
    pub status_message_time: Option<std::time::Instant>,
    /// When the network last delivered a list
    pub last_updated: Option<DateTime<Local>>,
    /// Whether help overlay is visible
    pub show_help: bool,
    /// Whether any snapshot or failure has arrived since the view was built
    settled: bool,
    /// Pending 'g' keypress for gg sequence (with timestamp)
    pub pending_g: Option<std::time::Instant>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            singers: Vec::new(),
            selected: 0,
            indicator: RefreshIndicator::Idle,
            retry: RetryController::new(),
            status_message: None,
            status_message_time: None,
            last_updated: None,
            show_help: false,
            settled: false,
            pending_g: None,
        }
    }

    /// Apply an update from the sync engine
    pub fn apply(&mut self, update: ViewUpdate) {
        self.retry.observe(&update);

        match update {
            ViewUpdate::Snapshot { singers, source } => {
                self.replace_singers(singers);
                self.settled = true;
                // Any snapshot withdraws the retry offer, so drop its hint too
                if self.indicator == RefreshIndicator::Failed {
                    self.status_message = None;
                    self.status_message_time = None;
                }
                if source == SnapshotSource::Network {
                    self.indicator = RefreshIndicator::Fresh;
                    self.last_updated = Some(Local::now());
                }
            }
            ViewUpdate::RefreshStarted => {
                self.indicator = RefreshIndicator::Refreshing;
            }
            ViewUpdate::RefreshFinished => {
                // The terminal snapshot or failure sets the final indicator
            }
            ViewUpdate::Failure {
                kind, after_retry, ..
            } => {
                self.settled = true;
                self.indicator = RefreshIndicator::Failed;
                let message = if after_retry {
                    format!("Still no connection ({}). Press R to try again.", kind)
                } else {
                    format!("Couldn't refresh singers ({}). Press R to retry.", kind)
                };
                self.set_status(message);
            }
        }
    }

    /// Reset per-view state after the sink is rebuilt
    ///
    /// The list stays on screen; the placeholder waits for the next settle.
    pub fn view_rebuilt(&mut self) {
        self.settled = false;
    }

    /// Whether the "no singers" placeholder should be shown
    ///
    /// Never before the first snapshot or failure, so an empty list does
    /// not flash while the cache is still loading.
    pub fn show_empty_placeholder(&self) -> bool {
        self.settled && self.singers.is_empty() && self.indicator != RefreshIndicator::Refreshing
    }

    pub fn is_refreshing(&self) -> bool {
        self.indicator == RefreshIndicator::Refreshing
    }

    fn replace_singers(&mut self, singers: Vec<Singer>) {
        // Keep the same singer selected when it is still present
        let previous = self.current_singer().map(|s| s.id);
        self.singers = singers;
        self.selected = previous
            .and_then(|id| self.singers.iter().position(|s| s.id == id))
            .unwrap_or(0);
        if self.selected >= self.singers.len() {
            self.selected = self.singers.len().saturating_sub(1);
        }
    }

    /// Set a status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_message_time = Some(std::time::Instant::now());
    }

    /// Check and clear expired status message
    ///
    /// Failure messages stay while a retry is on offer.
    pub fn check_status_timeout(&mut self) {
        if self.retry.is_offered() {
            return;
        }
        if let Some(time) = self.status_message_time {
            if time.elapsed() > STATUS_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Get the currently selected singer
    pub fn current_singer(&self) -> Option<&Singer> {
        self.singers.get(self.selected)
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.singers.len() {
            self.selected += 1;
        }
    }

    pub fn move_to_first(&mut self) {
        self.selected = 0;
    }

    pub fn move_to_last(&mut self) {
        self.selected = self.singers.len().saturating_sub(1);
    }

    /// Open the selected singer's website in the default browser
    pub fn open_current_link(&mut self) {
        let Some(singer) = self.current_singer() else {
            return;
        };
        let name = singer.name.clone();

        match singer.link.clone() {
            Some(link) => match open::that_detached(&link) {
                Ok(()) => self.set_status(format!("Opened {}", link)),
                Err(e) => self.set_status(format!("Failed to open: {}", e)),
            },
            None => self.set_status(format!("{} has no website", name)),
        }
    }
}
