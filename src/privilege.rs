//! Startup preconditions: root privileges and the GPIO helper binary.
use std::path::Path;

use nix::unistd::{Uid, geteuid};

use crate::error::StartupError;

/// Fails unless the effective user is root.
pub fn require_root() -> Result<(), StartupError> {
    check_euid(geteuid())
}

/// Privilege gate on an explicit uid.
pub fn check_euid(euid: Uid) -> Result<(), StartupError> {
    if euid.is_root() {
        Ok(())
    } else {
        Err(StartupError::NotRoot {
            euid: euid.as_raw(),
        })
    }
}

/// Fails unless the helper used to disarm interrupts exists.
///
/// Only the path's presence is checked, matching a plain `stat`.
pub fn require_helper(path: &Path) -> Result<(), StartupError> {
    match path.symlink_metadata() {
        Ok(_) => Ok(()),
        Err(_) => Err(StartupError::HelperMissing {
            path: path.to_path_buf(),
        }),
    }
}
