use std::{
    fs::File,
    panic::{AssertUnwindSafe, catch_unwind},
    path::Path,
    sync::{Arc, Mutex},
};

use nix::{
    sys::wait::{WaitStatus, waitpid},
    unistd::{ForkResult, fork},
};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{Layer, layer::Context, layer::SubscriberExt, registry::Registry};

use crate::logs::MessageVisitor;

/// Exit code reported when the closure returns instead of exiting.
pub const FELL_THROUGH: i32 = 97;

/// Collects `(level, message)` pairs for assertions.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<(Level, String)>>>);

impl LogCapture {
    pub fn lines(&self) -> Vec<(Level, String)> {
        self.0
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.lines()
            .iter()
            .any(|(lvl, line)| *lvl == level && line.contains(needle))
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.0
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((*event.metadata().level(), visitor.finish()));
    }
}

/// Runs `body` in a forked child and returns the child's exit code.
///
/// Used for paths that end the process. The child never returns into the
/// test harness: a return or panic maps to [`FELL_THROUGH`].
pub fn exit_code_of<F: FnOnce()>(body: F) -> i32 {
    match unsafe { fork() }.expect("fork") {
        ForkResult::Child => {
            let _ = catch_unwind(AssertUnwindSafe(body));
            unsafe { libc::_exit(FELL_THROUGH) }
        }
        ForkResult::Parent { child } => match waitpid(child, None).expect("waitpid") {
            WaitStatus::Exited(_, code) => code,
            other => panic!("child did not exit normally: {other:?}"),
        },
    }
}

/// Sends every event of this process to `path`, one plain-text line each.
///
/// Meant for forked children: the parent reads the file after the child has
/// exited. Each event is written straight to the file, so nothing is lost when
/// the child ends through `process::exit`.
pub fn log_to_file(path: &Path) {
    let file = File::create(path).expect("create log file");
    let subscriber = Registry::default().with(
        tracing_subscriber::fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(false),
    );
    tracing::subscriber::set_global_default(subscriber).expect("global subscriber");
}
