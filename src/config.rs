//! Configuration management for the button shutdown daemon.
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    constants::{
        DEFAULT_CONFIG_FILE, DEFAULT_GPIO_HELPER, DEFAULT_GPIO_PIN, DEFAULT_PID_FILE,
        DEFAULT_SYSFS_GPIO_ROOT,
    },
    error::ConfigError,
};

/// Runtime settings. Every key is optional in the YAML file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DaemonConfig {
    /// BCM number of the button pin.
    pub gpio_pin: u8,
    /// Path to the wiringPi `gpio` utility.
    pub gpio_helper: PathBuf,
    /// PID lock file path.
    pub pid_file: PathBuf,
    /// Root of the sysfs GPIO tree.
    pub sysfs_root: PathBuf,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            gpio_pin: DEFAULT_GPIO_PIN,
            gpio_helper: PathBuf::from(DEFAULT_GPIO_HELPER),
            pid_file: PathBuf::from(DEFAULT_PID_FILE),
            sysfs_root: PathBuf::from(DEFAULT_SYSFS_GPIO_ROOT),
        }
    }
}

/// Loads the configuration.
///
/// With an explicit path the file must exist. Without one the default location
/// is tried and built-in defaults are used when it is absent.
pub fn load_config(config_path: Option<&Path>) -> Result<DaemonConfig, ConfigError> {
    let path = match config_path {
        Some(path) => path,
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if !default.exists() {
                return Ok(DaemonConfig::default());
            }
            default
        }
    };

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_config(content: &str) -> Result<DaemonConfig, serde_yaml::Error> {
    // An empty document deserializes to unit, not to a map.
    if content.trim().is_empty() {
        return Ok(DaemonConfig::default());
    }
    serde_yaml::from_str(content)
}
