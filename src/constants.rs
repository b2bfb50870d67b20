//! Constants and fixed values for the button shutdown daemon.
//!
//! Paths and timings the daemon relies on are gathered here. Only the values
//! exposed through [`crate::config::DaemonConfig`] can be overridden at runtime;
//! the hold window and the power programs are fixed.

use std::time::Duration;

// ============================================================================
// Identity
// ============================================================================

/// Name used for the syslog ident and in user-facing messages.
pub const DAEMON_NAME: &str = "buttonshutdown-daemon";

// ============================================================================
// File System Constants
// ============================================================================

/// Default location of the PID lock file.
pub const DEFAULT_PID_FILE: &str = "/var/run/buttonshutdown-daemon.pid";

/// Permission bits for the PID lock file: owner read/write, everyone else read,
/// so `service ... status` works without sudo.
pub const PID_FILE_MODE: u32 = 0o644;

/// Default configuration file consulted when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "/etc/buttonshutdown-daemon.yaml";

// ============================================================================
// GPIO Constants
// ============================================================================

/// wiringPi `gpio` utility used to configure the pin and to disarm edges.
pub const DEFAULT_GPIO_HELPER: &str = "/usr/local/bin/gpio";

/// BCM number of the monitored pin (wiringPi pin 0, physical header pin 11).
pub const DEFAULT_GPIO_PIN: u8 = 17;

/// Root of the kernel's sysfs GPIO interface.
pub const DEFAULT_SYSFS_GPIO_ROOT: &str = "/sys/class/gpio";

// ============================================================================
// Timing
// ============================================================================

/// How long the button must stay down to count as a long press.
pub const HOLD_WINDOW: Duration = Duration::from_secs(2);

/// Sleep between iterations of the idle loop.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(60);

// ============================================================================
// Power Programs
// ============================================================================

/// Program exec'd for a short press.
pub const POWEROFF_PROGRAM: &str = "/sbin/poweroff";

/// Arguments passed to [`POWEROFF_PROGRAM`].
pub const POWEROFF_ARGS: &[&str] = &[];

/// Program exec'd for a long press.
pub const SHUTDOWN_PROGRAM: &str = "/sbin/shutdown";

/// Arguments passed to [`SHUTDOWN_PROGRAM`] to reboot immediately.
pub const RESTART_ARGS: &[&str] = &["-r", "now"];
