//! Singleton enforcement through an advisory lock on the PID file.
use std::{
    fs::{File, OpenOptions},
    io::{Seek, SeekFrom, Write},
    os::unix::fs::OpenOptionsExt,
    path::{Path, PathBuf},
};

use fs2::FileExt;

use crate::{constants::PID_FILE_MODE, error::StartupError};

/// Exclusive `flock` on the PID file.
///
/// The lock belongs to the open file description, so it survives `fork` and
/// stays held by the detached child. It is released when the process exits;
/// there is no unlock method.
#[derive(Debug)]
pub struct PidLock {
    file: File,
    path: PathBuf,
}

impl PidLock {
    /// Opens (or creates, mode 0644) `path` and locks it without blocking.
    ///
    /// The file is not truncated here, so a losing instance leaves the
    /// running daemon's pid untouched.
    pub fn acquire(path: &Path) -> Result<Self, StartupError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .mode(PID_FILE_MODE)
            .open(path)
            .map_err(|source| StartupError::PidFileOpen {
                path: path.to_path_buf(),
                source,
            })?;

        file.try_lock_exclusive()
            .map_err(|source| StartupError::PidFileLocked {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Replaces the file content with `"<pid>\n"`.
    pub fn write_pid(&mut self, pid: u32) -> Result<(), StartupError> {
        let path = self.path.clone();
        let wrap = |source| StartupError::PidFileWrite {
            path: path.clone(),
            source,
        };

        self.file.set_len(0).map_err(wrap)?;
        self.file.seek(SeekFrom::Start(0)).map_err(wrap)?;
        self.file
            .write_all(format!("{pid}\n").as_bytes())
            .map_err(wrap)?;
        self.file.flush().map_err(wrap)
    }

    /// Path of the locked file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
