//! SIGTERM handling.
//!
//! SIGTERM is blocked and then consumed with `sigwait` on a dedicated thread,
//! so the handler can log and exit from ordinary thread context. All other
//! signals keep their default disposition.
use std::{
    io,
    thread::{self, JoinHandle},
};

use nix::sys::signal::{SigSet, Signal};
use tracing::{error, info};

use crate::error::StartupError;

/// Logs and exits with success on SIGTERM.
///
/// Must run before any other thread is spawned: threads inherit the blocked
/// mask, which keeps the signal from being delivered anywhere but the watcher.
pub fn install_termination_handler() -> Result<JoinHandle<()>, StartupError> {
    watch_signal(Signal::SIGTERM, || {
        info!("Stopping daemon");
        std::process::exit(0);
    })
}

/// Blocks `signal` for the calling thread and runs `on_signal` on a watcher
/// thread once it arrives.
pub fn watch_signal<F>(signal: Signal, on_signal: F) -> Result<JoinHandle<()>, StartupError>
where
    F: FnOnce() + Send + 'static,
{
    let mut mask = SigSet::empty();
    mask.add(signal);
    mask.thread_block()
        .map_err(|errno| StartupError::SignalSetup(io::Error::from(errno)))?;

    thread::Builder::new()
        .name("signals".into())
        .spawn(move || match mask.wait() {
            Ok(_) => on_signal(),
            Err(errno) => error!("Waiting for {signal} failed: {errno}"),
        })
        .map_err(StartupError::SignalSetup)
}
