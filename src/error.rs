//! Error handling for the button shutdown daemon.
use std::{io, path::PathBuf};

use thiserror::Error;

/// Fatal conditions raised while bringing the daemon up.
///
/// Every variant ends the process with a failure status after being logged;
/// none of them are retried.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The effective user is not root.
    #[error("This daemon can only be run by root user (euid {euid})")]
    NotRoot {
        /// Effective uid the process was started with.
        euid: u32,
    },

    /// The wiringPi `gpio` utility is not installed.
    #[error("The program '{}' is missing", path.display())]
    HelperMissing {
        /// Expected location of the helper.
        path: PathBuf,
    },

    /// The PID lock file could not be opened or created.
    #[error("Could not open PID lock file {}: {source}", path.display())]
    PidFileOpen {
        /// Lock file path.
        path: PathBuf,
        /// The underlying error that occurred.
        #[source]
        source: io::Error,
    },

    /// Another instance holds the PID lock.
    #[error("Could not lock PID lock file {}: {source}", path.display())]
    PidFileLocked {
        /// Lock file path.
        path: PathBuf,
        /// The underlying error that occurred.
        #[source]
        source: io::Error,
    },

    /// Writing our pid into the lock file failed.
    #[error("Could not write PID to {}: {source}", path.display())]
    PidFileWrite {
        /// Lock file path.
        path: PathBuf,
        /// The underlying error that occurred.
        #[source]
        source: io::Error,
    },

    /// Forking, session creation or stdio redirection failed.
    #[error("Failed to detach from the controlling terminal: {0}")]
    Detach(#[source] io::Error),

    /// The GPIO subsystem could not be initialised.
    #[error("GPIO subsystem couldn't be initialized: {0}")]
    GpioInit(#[source] io::Error),

    /// Edge detection could not be enabled for the pin.
    #[error("Unable to set interrupt handler for GPIO pin {pin}: {source}")]
    InterruptRegistration {
        /// BCM pin number.
        pin: u8,
        /// The underlying error that occurred.
        #[source]
        source: io::Error,
    },

    /// The termination signal could not be routed to the watcher thread.
    #[error("Failed to install termination handler: {0}")]
    SignalSetup(#[source] io::Error),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error reading the configuration file.
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        /// Config path.
        path: PathBuf,
        /// The underlying error that occurred.
        #[source]
        source: io::Error,
    },

    /// Error parsing YAML configuration.
    #[error("Invalid YAML format in {}: {source}", path.display())]
    Parse {
        /// Config path.
        path: PathBuf,
        /// The underlying error that occurred.
        #[source]
        source: serde_yaml::Error,
    },
}
