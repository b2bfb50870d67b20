//! buttonshutdown watches a push-button wired to a GPIO pin of a single-board
//! computer. A short press powers the machine off; holding the button for two
//! seconds or longer restarts it. The daemon runs as root, detaches from the
//! terminal, keeps a single instance through a locked PID file and logs to
//! syslog.

/// Power actions and their executor.
pub mod action;

/// Button press classification.
pub mod button;

/// CLI interface.
pub mod cli;

/// Configuration management.
pub mod config;

/// Fixed paths and timings.
pub mod constants;

/// Daemon lifecycle.
pub mod daemon;

/// Error handling.
pub mod error;

/// GPIO pin access.
pub mod gpio;

/// Logging setup.
pub mod logs;

/// PID file locking.
pub mod pidfile;

/// Startup privilege checks.
pub mod privilege;

/// Termination signal handling.
pub mod signals;

#[cfg(test)]
pub(crate) mod test_utils;
