//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use musicshelf_core::Singer;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a list of singers
    pub fn print_singers(&self, singers: &[Singer]) {
        match self.format {
            OutputFormat::Human => {
                if singers.is_empty() {
                    println!("No singers found.");
                    return;
                }
                for singer in singers {
                    println!("{}", singer_line(singer));
                }
                println!("\n{} singer(s)", singers.len());
            }
            OutputFormat::Json => match serde_json::to_string_pretty(singers) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("Failed to encode singers: {}", e),
            },
            OutputFormat::Quiet => {
                for singer in singers {
                    println!("{}", singer.id);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning to stderr, keeping stdout parseable
    pub fn warning(&self, msg: &str) {
        if !self.is_quiet() {
            eprintln!("Warning: {}", msg);
        }
    }
}

/// One-line summary used by `musicshelf list`
fn singer_line(singer: &Singer) -> String {
    format!(
        "{:>8} | {} | {} | {}",
        singer.id,
        truncate(&singer.name, 30),
        truncate(&singer.genres_label(), 30),
        singer.counts_label()
    )
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("Земфира", 10), "Земфира");
        assert_eq!(truncate("Мумий Тролль", 8), "Мумий...");
    }

    #[test]
    fn test_singer_line() {
        let singer = Singer::new(42, "Tove Lo")
            .with_genres(["pop", "dance"])
            .with_counts(81, 22);
        let line = singer_line(&singer);

        assert!(line.contains("42"));
        assert!(line.contains("Tove Lo"));
        assert!(line.contains(&singer.genres_label()));
        assert!(line.contains(&singer.counts_label()));
    }
}
