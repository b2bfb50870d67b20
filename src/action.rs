//! Power actions and the executor that performs them by replacing the process image.
use std::{
    io,
    os::unix::process::CommandExt,
    path::{Path, PathBuf},
    process::Command,
};

use strum_macros::IntoStaticStr;

use crate::constants::{POWEROFF_ARGS, POWEROFF_PROGRAM, RESTART_ARGS, SHUTDOWN_PROGRAM};

/// The two irreversible actions the daemon can take.
///
/// Each variant converts to the name of the program that performs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
pub enum PowerAction {
    /// Halt and power down.
    #[strum(serialize = "poweroff")]
    PowerOff,
    /// Reboot immediately.
    #[strum(serialize = "shutdown")]
    Restart,
}

impl PowerAction {
    /// Name of the program run for this action, also used as its `argv[0]`.
    pub fn program_name(self) -> &'static str {
        self.into()
    }
}

/// Performs a [`PowerAction`].
///
/// Implementations do not return on success. The returned error describes why
/// the action could not be started.
pub trait ActionExecutor {
    /// Runs `action`, returning only on failure.
    fn execute(&self, action: PowerAction) -> io::Error;
}

/// Executes the system power programs via `execv`.
#[derive(Debug, Clone)]
pub struct SystemExecutor {
    poweroff: PathBuf,
    shutdown: PathBuf,
}

impl Default for SystemExecutor {
    fn default() -> Self {
        Self::new(POWEROFF_PROGRAM, SHUTDOWN_PROGRAM)
    }
}

impl SystemExecutor {
    /// Builds an executor targeting explicit program paths.
    pub fn new(poweroff: impl Into<PathBuf>, shutdown: impl Into<PathBuf>) -> Self {
        Self {
            poweroff: poweroff.into(),
            shutdown: shutdown.into(),
        }
    }

    /// Program, `argv[0]` and arguments for `action`.
    pub fn invocation(
        &self,
        action: PowerAction,
    ) -> (&Path, &'static str, &'static [&'static str]) {
        let (program, args) = match action {
            PowerAction::PowerOff => (self.poweroff.as_path(), POWEROFF_ARGS),
            PowerAction::Restart => (self.shutdown.as_path(), RESTART_ARGS),
        };
        (program, action.program_name(), args)
    }
}

impl ActionExecutor for SystemExecutor {
    fn execute(&self, action: PowerAction) -> io::Error {
        let (program, argv0, args) = self.invocation(action);
        Command::new(program).arg0(argv0).args(args).exec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn power_off_runs_poweroff_without_arguments() {
        let executor = SystemExecutor::default();
        let (program, argv0, args) = executor.invocation(PowerAction::PowerOff);
        assert_eq!(program, Path::new("/sbin/poweroff"));
        assert_eq!(argv0, "poweroff");
        assert!(args.is_empty());
    }

    #[test]
    fn restart_runs_shutdown_reboot_now() {
        let executor = SystemExecutor::default();
        let (program, argv0, args) = executor.invocation(PowerAction::Restart);
        assert_eq!(program, Path::new("/sbin/shutdown"));
        assert_eq!(argv0, "shutdown");
        assert_eq!(args, &["-r", "now"]);
    }

    #[test]
    fn missing_program_returns_the_exec_error() {
        let dir = tempdir().unwrap();
        let executor =
            SystemExecutor::new(dir.path().join("poweroff"), dir.path().join("shutdown"));

        let err = executor.execute(PowerAction::PowerOff);
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(err.raw_os_error(), Some(libc::ENOENT));

        let err = executor.execute(PowerAction::Restart);
        assert_eq!(err.raw_os_error(), Some(libc::ENOENT));
    }

    #[test]
    fn actions_are_named_after_their_programs() {
        assert_eq!(PowerAction::PowerOff.program_name(), "poweroff");
        assert_eq!(PowerAction::Restart.program_name(), "shutdown");
        let name: &'static str = PowerAction::Restart.into();
        assert_eq!(name, "shutdown");
    }
}
