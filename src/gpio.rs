//! GPIO access for the button pin.
//!
//! Pin configuration and edge (dis)arming go through the wiringPi `gpio`
//! utility; edge notifications are read from the kernel's sysfs `value` file,
//! which signals `POLLPRI` whenever the configured edge occurs.
use std::{
    fs::{self, File},
    io::{self, Read, Seek, SeekFrom},
    os::fd::AsFd,
    path::{Path, PathBuf},
    process::{Command, Stdio},
    sync::mpsc::Sender,
    thread::{self, JoinHandle},
    time::Instant,
};

use nix::{
    errno::Errno,
    poll::{PollFd, PollFlags, PollTimeout, poll},
};
use tracing::{debug, error};

use crate::{config::DaemonConfig, error::StartupError};

/// Digital level of the pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinLevel {
    /// Button released (pulled down).
    Low,
    /// Button pressed.
    High,
}

impl PinLevel {
    /// Parses the content of a sysfs `value` file. Anything but a leading `1`
    /// reads as low.
    pub fn from_sysfs(raw: &[u8]) -> Self {
        match raw.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'1') => PinLevel::High,
            _ => PinLevel::Low,
        }
    }
}

/// A low-to-high transition reported by the edge watcher.
#[derive(Debug, Clone, Copy)]
pub struct RisingEdge {
    /// When the watcher observed the edge.
    pub at: Instant,
}

/// What the classifier needs from the pin once an edge has fired.
pub trait InterruptSource {
    /// Stops further edge notifications for the pin.
    fn disarm(&self) -> io::Result<()>;

    /// Samples the current pin level.
    fn read_level(&self) -> io::Result<PinLevel>;
}

/// Button pin driven through sysfs and the wiringPi `gpio` helper.
#[derive(Debug, Clone)]
pub struct SysfsGpio {
    pin: u8,
    helper: PathBuf,
    sysfs_root: PathBuf,
}

impl SysfsGpio {
    /// Builds a handle without touching the hardware.
    pub fn new(pin: u8, helper: impl Into<PathBuf>, sysfs_root: impl Into<PathBuf>) -> Self {
        Self {
            pin,
            helper: helper.into(),
            sysfs_root: sysfs_root.into(),
        }
    }

    /// Checks the GPIO subsystem and puts the pin in input mode with a
    /// pull-down, so an idle button reads low.
    pub fn setup(config: &DaemonConfig) -> Result<Self, StartupError> {
        let gpio = Self::new(config.gpio_pin, &config.gpio_helper, &config.sysfs_root);

        if !gpio.sysfs_root.is_dir() {
            return Err(StartupError::GpioInit(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not available", gpio.sysfs_root.display()),
            )));
        }

        gpio.run_helper(&gpio.mode_args("in"))
            .and_then(|()| gpio.run_helper(&gpio.mode_args("down")))
            .map_err(StartupError::GpioInit)?;

        debug!("GPIO pin {} configured as input with pull-down", gpio.pin);
        Ok(gpio)
    }

    /// Enables rising-edge detection and starts the watcher thread that
    /// forwards each edge to `edges`.
    pub fn arm_rising(
        &self,
        edges: Sender<RisingEdge>,
    ) -> Result<JoinHandle<()>, StartupError> {
        let registration = |source| StartupError::InterruptRegistration {
            pin: self.pin,
            source,
        };

        self.run_helper(&self.edge_args("rising"))
            .map_err(registration)?;
        let value = File::open(self.value_path()).map_err(registration)?;

        let pin = self.pin;
        thread::Builder::new()
            .name("gpio-edge".into())
            .spawn(move || watch_edges(value, pin, edges))
            .map_err(registration)
    }

    /// BCM pin number.
    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// sysfs `value` file of the pin.
    pub fn value_path(&self) -> PathBuf {
        self.sysfs_root
            .join(format!("gpio{}", self.pin))
            .join("value")
    }

    fn mode_args(&self, mode: &str) -> Vec<String> {
        vec![
            "-g".to_string(),
            "mode".to_string(),
            self.pin.to_string(),
            mode.to_string(),
        ]
    }

    // `gpio edge` already takes BCM numbers.
    fn edge_args(&self, edge: &str) -> Vec<String> {
        vec!["edge".to_string(), self.pin.to_string(), edge.to_string()]
    }

    fn run_helper(&self, args: &[String]) -> io::Result<()> {
        run_quiet(&self.helper, args)
    }
}

impl InterruptSource for SysfsGpio {
    fn disarm(&self) -> io::Result<()> {
        self.run_helper(&self.edge_args("none"))
    }

    fn read_level(&self) -> io::Result<PinLevel> {
        let raw = fs::read(self.value_path())?;
        Ok(PinLevel::from_sysfs(&raw))
    }
}

fn run_quiet(program: &Path, args: &[String]) -> io::Result<()> {
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;

    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!(
            "'{} {}' exited with {status}",
            program.display(),
            args.join(" ")
        )))
    }
}

fn watch_edges(mut value: File, pin: u8, edges: Sender<RisingEdge>) {
    let mut buf = [0u8; 8];

    // Reading once clears the pending state left by the export.
    if let Err(err) = value.read(&mut buf) {
        error!("Failed to read GPIO pin {pin} value: {err}");
        return;
    }

    loop {
        let ready = {
            let mut fds = [PollFd::new(
                value.as_fd(),
                PollFlags::POLLPRI | PollFlags::POLLERR,
            )];
            poll(&mut fds, PollTimeout::NONE)
        };

        match ready {
            Ok(0) | Err(Errno::EINTR) => continue,
            Ok(_) => {}
            Err(err) => {
                error!("Waiting for GPIO pin {pin} interrupt failed: {err}");
                return;
            }
        }

        // The event stays pending until the value is read again.
        let _ = value
            .seek(SeekFrom::Start(0))
            .and_then(|_| value.read(&mut buf));

        debug!("Rising edge on GPIO pin {pin}");
        if edges.send(RisingEdge { at: Instant::now() }).is_err() {
            debug!("Button worker gone; edge watcher for pin {pin} exiting");
            return;
        }
    }
}
