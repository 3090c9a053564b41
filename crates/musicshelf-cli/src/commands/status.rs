//! Status command handler

use std::path::PathBuf;

use anyhow::{Context, Result};

use musicshelf_core::Config;

use super::open_cache;
use crate::output::{Output, OutputFormat};

/// Show cache and server status
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    let cache = open_cache(&config)?;

    let count = cache.count()?;
    let cache_path = config.cache_path();
    let cache_size = std::fs::metadata(&cache_path).map(|m| m.len()).unwrap_or(0);

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "api_url": config.api_url,
                    "request_timeout_secs": config.request_timeout_secs,
                    "cache": {
                        "path": cache_path,
                        "size": cache_size,
                        "singers": count
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", count);
        }
        OutputFormat::Human => {
            println!("Musicshelf Status");
            println!("=================");
            println!();
            println!("Server:");
            println!("  URL:     {}", config.api_url);
            println!("  Timeout: {}s", config.request_timeout_secs);
            println!();
            println!("Cache:");
            println!("  Location: {}", cache_path.display());
            println!("  Size:     {}", human_size(cache_size));
            println!("  Singers:  {}", count);
        }
    }

    Ok(())
}

fn human_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KB");
        assert_eq!(human_size(3 * 1024 * 1024), "3.0 MB");
    }
}
