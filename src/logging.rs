//! Logging setup.
//!
//! The CLI `--log` flag selects where log lines go: `0`/`off` disables
//! output, `1`/`stdout` and `2`/`stderr` pick a standard stream, and
//! anything else is treated as a file path (opened in append mode).
//! The filter comes from `CASKBOOK_LOG` when set, otherwise from the
//! configured default level; `--verbose` forces `debug`.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Destination for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Off,
    Stdout,
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    /// Parse the CLI `--log` value.
    pub fn parse(s: &str) -> Self {
        match s {
            "0" | "off" | "none" => LogTarget::Off,
            "1" | "stdout" => LogTarget::Stdout,
            "2" | "stderr" => LogTarget::Stderr,
            path => LogTarget::File(PathBuf::from(path)),
        }
    }
}

/// Install the global tracing subscriber.
pub fn init(target: &str, verbose: bool, default_level: &str) -> Result<()> {
    let directive = if verbose {
        "debug".to_string()
    } else {
        std::env::var("CASKBOOK_LOG").unwrap_or_else(|_| default_level.to_string())
    };
    let filter =
        EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    match LogTarget::parse(target) {
        LogTarget::Off => {
            // Keep a subscriber installed so spans are cheap no-ops.
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::sink)
                .try_init()
                .ok();
        }
        LogTarget::Stdout => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stdout)
                .try_init()
                .ok();
        }
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .ok();
        }
        LogTarget::File(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .ok();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_target_parse() {
        assert_eq!(LogTarget::parse("0"), LogTarget::Off);
        assert_eq!(LogTarget::parse("off"), LogTarget::Off);
        assert_eq!(LogTarget::parse("1"), LogTarget::Stdout);
        assert_eq!(LogTarget::parse("2"), LogTarget::Stderr);
        assert_eq!(
            LogTarget::parse("import.log"),
            LogTarget::File(PathBuf::from("import.log"))
        );
    }
}
