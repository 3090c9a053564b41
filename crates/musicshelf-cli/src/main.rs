//! Musicshelf CLI
//!
//! Command-line interface for Musicshelf - an offline-first singer catalogue.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod logging;
mod output;
mod tui;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "musicshelf")]
#[command(about = "Musicshelf - Browse singers, cached locally and refreshed from the network")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use a specific config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI interface
    Tui,
    /// Print the singer list
    #[command(alias = "ls")]
    List {
        /// Print the cached list without contacting the server
        #[arg(long)]
        offline: bool,
    },
    /// Show cache and server status
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Manage the local cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, api_url, request_timeout_secs, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[derive(Subcommand)]
enum CacheCommands {
    /// Remove every cached singer
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // The TUI owns the terminal, so it logs to a file instead of stderr
    let command = cli.command.unwrap_or(Commands::Tui);
    if matches!(command, Commands::Tui) {
        return tui::run(config_path).await;
    }

    logging::init_cli_logging();

    match command {
        Commands::Tui => unreachable!(), // Handled above
        Commands::List { offline } => commands::list::list(config_path, offline, &output).await,
        Commands::Status => commands::status::show(config_path, &output),
        Commands::Config { command } => match command {
            Some(ConfigCommands::Show) | None => commands::config::show(config_path, &output),
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(key, value, config_path, &output)
            }
        },
        Commands::Cache { command } => match command {
            CacheCommands::Clear => commands::cache::clear(config_path, &output),
        },
    }
}
