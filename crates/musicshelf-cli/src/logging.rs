//! Tracing setup for the two front ends

use std::fs::File;
use std::sync::Mutex;

use musicshelf_core::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "MUSICSHELF_LOG";

fn filter_for(level: &str) -> EnvFilter {
    // The binary's own target is `musicshelf`, after the bin name
    EnvFilter::new(format!("musicshelf_core={},musicshelf={}", level, level))
}

/// Log to stderr at `MUSICSHELF_LOG` (default `warn`)
pub fn init_cli_logging() {
    let level = std::env::var(LOG_ENV).unwrap_or_else(|_| "warn".to_string());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_for(&level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log to a file, only when `MUSICSHELF_LOG` is set
pub fn init_tui_logging(config: &Config) {
    let Ok(level) = std::env::var(LOG_ENV) else {
        return;
    };

    let log_path = config.log_path();
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_for(&level))
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .try_init();

    info!("TUI logging initialized to {:?}", log_path);
}
