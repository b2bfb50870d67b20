//! Turns a rising edge on the button pin into exactly one power action.
//!
//! A press is classified by sampling the pin once, [`HOLD_WINDOW`] after the
//! edge: a released button means a short press (power off), a button still
//! held means a long press (restart).
use std::{
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::Receiver,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use tracing::{debug, error, info, warn};

use crate::{
    action::{ActionExecutor, PowerAction},
    constants::HOLD_WINDOW,
    gpio::{InterruptSource, PinLevel, RisingEdge},
};

/// How long the button was held, as seen at the sample point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressKind {
    /// Released before the window elapsed.
    Short,
    /// Still held when the window elapsed.
    Long,
}

impl PressKind {
    /// Classifies the level sampled at the end of the hold window.
    pub fn from_level(level: PinLevel) -> Self {
        match level {
            PinLevel::Low => PressKind::Short,
            PinLevel::High => PressKind::Long,
        }
    }

    /// Action requested by this kind of press.
    pub fn action(self) -> PowerAction {
        match self {
            PressKind::Short => PowerAction::PowerOff,
            PressKind::Long => PowerAction::Restart,
        }
    }
}

/// Result of handling one edge. A successful action never produces one.
#[derive(Debug)]
pub enum PressOutcome {
    /// A classification already started; the edge was dropped.
    Ignored,
    /// The action program could not be started.
    ActionFailed {
        /// Action that was attempted.
        action: PowerAction,
        /// Error returned by the executor.
        error: io::Error,
    },
}

/// Classifies button presses and hands the result to an [`ActionExecutor`].
///
/// The classifier starts armed and disarms itself on the first edge it
/// handles. It never re-arms: every classification ends with the process
/// being replaced or exiting.
pub struct ButtonClassifier<S, E> {
    source: S,
    executor: E,
    window: Duration,
    armed: AtomicBool,
}

impl<S: InterruptSource, E: ActionExecutor> ButtonClassifier<S, E> {
    /// Creates an armed classifier using the fixed hold window.
    pub fn new(source: S, executor: E) -> Self {
        Self {
            source,
            executor,
            window: HOLD_WINDOW,
            armed: AtomicBool::new(true),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Whether a new edge would start a classification.
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Handles one rising edge.
    ///
    /// Only the first call does anything. It disarms the pin, waits for the
    /// hold window, samples the pin and runs the matching action. It only
    /// returns if that action could not be started.
    pub fn handle_press(&self) -> PressOutcome {
        // Bounce can deliver several edges before the helper has disarmed the
        // pin; only the first one may classify.
        if self
            .armed
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Classification already in progress; ignoring edge");
            return PressOutcome::Ignored;
        }

        if let Err(err) = self.source.disarm() {
            error!("Failed to disable further button interrupts: {err}");
        }

        thread::sleep(self.window);

        let level = self.source.read_level().unwrap_or_else(|err| {
            warn!("Failed to read button pin, assuming released: {err}");
            PinLevel::Low
        });
        let kind = PressKind::from_level(level);
        let action = kind.action();

        match action {
            PowerAction::PowerOff => info!("Shutting down system"),
            PowerAction::Restart => info!("Restarting system"),
        }

        let error = self.executor.execute(action);
        error!(
            "'{}' program failed to run with error: {}",
            action.program_name(),
            error.raw_os_error().unwrap_or_default()
        );

        PressOutcome::ActionFailed { action, error }
    }

    /// Handles edges until one leads to an attempted action. Returns `None`
    /// once the edge sender is gone.
    pub fn next_attempt(
        &self,
        edges: &Receiver<RisingEdge>,
    ) -> Option<(PowerAction, io::Error)> {
        for edge in edges.iter() {
            debug!("Button pressed ({:?} ago)", edge.at.elapsed());
            if let PressOutcome::ActionFailed { action, error } = self.handle_press() {
                return Some((action, error));
            }
        }
        None
    }
}

/// Runs the classifier on its own thread.
///
/// Once an action has been attempted the process exits with success, whether
/// or not the action program could be started. If the edge watcher goes away
/// first, presses can no longer be seen and the process exits with failure.
pub fn spawn_worker<S, E>(
    classifier: ButtonClassifier<S, E>,
    edges: Receiver<RisingEdge>,
) -> io::Result<JoinHandle<()>>
where
    S: InterruptSource + Send + 'static,
    E: ActionExecutor + Send + 'static,
{
    thread::Builder::new()
        .name("button".into())
        .spawn(move || {
            if classifier.next_attempt(&edges).is_some() {
                std::process::exit(0);
            }
            error!("Edge watcher stopped; button presses can no longer be handled, exiting");
            std::process::exit(1);
        })
}
