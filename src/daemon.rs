//! Daemon lifecycle: startup checks, singleton lock, detachment, signal
//! handling and the wiring between the GPIO pin and the classifier.
use std::{
    convert::Infallible,
    fs::File,
    io,
    os::unix::io::IntoRawFd,
    sync::mpsc,
    thread,
};

use nix::{
    sys::stat::{Mode, umask},
    unistd::{ForkResult, fork, setsid},
};
use tracing::info;

use crate::{
    action::SystemExecutor,
    button::{ButtonClassifier, spawn_worker},
    config::DaemonConfig,
    constants::HEARTBEAT_INTERVAL,
    error::StartupError,
    gpio::SysfsGpio,
    pidfile::PidLock,
    privilege, signals,
};

/// Process-wide state of the running daemon.
///
/// Holds the PID lock for the lifetime of the process.
pub struct Daemon {
    config: DaemonConfig,
    foreground: bool,
    pid_lock: Option<PidLock>,
}

impl Daemon {
    /// Creates a daemon context. Nothing is touched until [`Daemon::start`].
    pub fn new(config: DaemonConfig, foreground: bool) -> Self {
        Self {
            config,
            foreground,
            pid_lock: None,
        }
    }

    /// Runs the full startup sequence and then idles forever.
    ///
    /// Only returns on a startup failure.
    pub fn start(mut self) -> Result<Infallible, StartupError> {
        self.initialize()?;
        self.acquire_singleton()?;
        self.install_termination_handler()?;
        self.arm_button_monitor()?;
        self.run()
    }

    /// Checks root privileges and the presence of the GPIO helper. Has no
    /// side effects.
    pub fn initialize(&self) -> Result<(), StartupError> {
        privilege::require_root()?;
        privilege::require_helper(&self.config.gpio_helper)
    }

    /// Locks the PID file, detaches unless running in the foreground, then
    /// records our pid in the locked file.
    pub fn acquire_singleton(&mut self) -> Result<(), StartupError> {
        let mut lock = PidLock::acquire(&self.config.pid_file)?;

        if !self.foreground {
            detach().map_err(StartupError::Detach)?;
        }

        let pid = std::process::id();
        lock.write_pid(pid)?;
        info!("Daemon running with pid {pid}, lock held on {}", lock.path().display());

        self.pid_lock = Some(lock);
        Ok(())
    }

    /// Exits with success when SIGTERM arrives.
    pub fn install_termination_handler(&self) -> Result<(), StartupError> {
        signals::install_termination_handler().map(drop)
    }

    /// Configures the button pin and starts the edge watcher and classifier
    /// threads.
    pub fn arm_button_monitor(&self) -> Result<(), StartupError> {
        let gpio = SysfsGpio::setup(&self.config)?;
        let pin = gpio.pin();

        let (edges_tx, edges_rx) = mpsc::channel();
        gpio.arm_rising(edges_tx)?;

        let classifier = ButtonClassifier::new(gpio, SystemExecutor::default());
        spawn_worker(classifier, edges_rx)
            .map_err(|source| StartupError::InterruptRegistration { pin, source })?;

        info!("Watching GPIO pin {pin} for button presses");
        Ok(())
    }

    /// Keeps the process alive for the button and signal threads.
    pub fn run(&self) -> ! {
        loop {
            thread::sleep(HEARTBEAT_INTERVAL);
        }
    }

    #[cfg(test)]
    pub(crate) fn holds_lock(&self) -> bool {
        self.pid_lock.is_some()
    }
}

/// Forks into the background, starts a new session, moves to `/` and points
/// stdio at `/dev/null`. The parent exits with success.
pub fn detach() -> io::Result<()> {
    match unsafe { fork() }.map_err(io::Error::from)? {
        ForkResult::Parent { .. } => std::process::exit(0),
        ForkResult::Child => {}
    }

    umask(Mode::empty());
    setsid().map_err(io::Error::from)?;
    std::env::set_current_dir("/")?;

    let devnull = File::options().read(true).write(true).open("/dev/null")?;
    let fd = devnull.into_raw_fd();
    unsafe {
        let _ = libc::dup2(fd, libc::STDIN_FILENO);
        let _ = libc::dup2(fd, libc::STDOUT_FILENO);
        let _ = libc::dup2(fd, libc::STDERR_FILENO);
        libc::close(fd);
    }

    Ok(())
}
