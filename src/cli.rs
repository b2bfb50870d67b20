//! Command-line interface for the button shutdown daemon.
use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use tracing::level_filters::LevelFilter;

// Index is the numeric shorthand accepted by `--log-level`. Names follow the
// syslog severities the daemon logs at.
const LEVELS: [(LevelFilter, &[&str]); 6] = [
    (LevelFilter::OFF, &["off", "none"]),
    (LevelFilter::ERROR, &["error", "err", "crit"]),
    (LevelFilter::WARN, &["warn", "warning"]),
    (LevelFilter::INFO, &["info", "notice"]),
    (LevelFilter::DEBUG, &["debug"]),
    (LevelFilter::TRACE, &["trace"]),
];

/// Verbosity requested with `--log-level`, by name or as a number 0-5.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogLevelArg(LevelFilter);

impl LogLevelArg {
    /// Directive understood by `EnvFilter`.
    pub fn as_str(&self) -> &'static str {
        LEVELS
            .iter()
            .find(|(filter, _)| *filter == self.0)
            .map_or("info", |(_, names)| names[0])
    }
}

impl FromStr for LogLevelArg {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        if wanted.is_empty() {
            return Err("log level cannot be empty".into());
        }

        let found = match wanted.parse::<usize>() {
            Ok(index) => LEVELS.get(index).ok_or_else(|| {
                format!("unsupported log level number '{index}' (expected 0-5)")
            })?,
            Err(_) => LEVELS
                .iter()
                .find(|(_, names)| names.contains(&wanted.as_str()))
                .ok_or_else(|| format!("invalid log level '{}'", value.trim()))?,
        };

        Ok(LogLevelArg(found.0))
    }
}

/// Command-line interface for the daemon.
#[derive(Parser, Debug)]
#[command(name = "buttonshutdown-daemon", version)]
#[command(
    about = "Powers off (short press) or restarts (hold 2s) the machine from a GPIO push-button",
    long_about = None
)]
pub struct Cli {
    /// Path to a YAML configuration file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the logging verbosity.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<LogLevelArg>,

    /// Stay attached to the terminal instead of detaching.
    #[arg(long)]
    pub foreground: bool,
}

/// Parses command-line arguments.
pub fn parse_args() -> Cli {
    Cli::parse()
}
