//! Log routing: every `tracing` event goes to syslog and is mirrored on stderr.
//!
//! Once the daemon detaches, stderr points at `/dev/null` and only the syslog
//! copy remains.
use std::{
    ffi::CString,
    fmt::{self, Write as _},
    sync::OnceLock,
};

use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
};
use tracing_subscriber::{
    EnvFilter, Layer, layer::Context, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::{cli::LogLevelArg, constants::DAEMON_NAME};

// `openlog` keeps the ident pointer, so it has to outlive every syslog call.
static SYSLOG_IDENT: OnceLock<CString> = OnceLock::new();

/// `tracing` layer writing events through `libc::syslog` with facility `LOG_USER`.
pub struct SyslogLayer {
    _private: (),
}

impl SyslogLayer {
    /// Opens the syslog connection under `ident`.
    pub fn open(ident: &str) -> Self {
        let ident = SYSLOG_IDENT.get_or_init(|| {
            CString::new(ident).unwrap_or_else(|_| c"buttonshutdown".to_owned())
        });
        unsafe {
            libc::openlog(
                ident.as_ptr(),
                libc::LOG_CONS | libc::LOG_PID,
                libc::LOG_USER,
            );
        }
        Self { _private: () }
    }
}

impl<S: Subscriber> Layer<S> for SyslogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let Ok(message) = CString::new(visitor.finish()) else {
            return;
        };
        let priority = syslog_priority(event.metadata().level());
        unsafe {
            libc::syslog(priority, c"%s".as_ptr(), message.as_ptr());
        }
    }
}

/// Maps a `tracing` level to the matching syslog severity.
pub fn syslog_priority(level: &Level) -> libc::c_int {
    match *level {
        Level::ERROR => libc::LOG_ERR,
        Level::WARN => libc::LOG_WARNING,
        Level::INFO => libc::LOG_INFO,
        Level::DEBUG | Level::TRACE => libc::LOG_DEBUG,
    }
}

/// Flattens an event into `message key=value ...`.
#[derive(Default)]
pub(crate) struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    pub(crate) fn finish(self) -> String {
        let mut line = self.message;
        if !self.fields.is_empty() {
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(self.fields.trim_start());
        }
        // syslog strings are C strings.
        line.replace('\0', "")
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

/// Installs the global subscriber.
///
/// Verbosity comes from `--log-level`, then `RUST_LOG`, then `info`.
pub fn init_logging(level: Option<LogLevelArg>) {
    let filter = if let Some(level) = level {
        EnvFilter::new(level.as_str())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(SyslogLayer::open(DAEMON_NAME))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::LogCapture;
    use tracing_subscriber::registry::Registry;

    #[test]
    fn levels_map_to_syslog_severities() {
        assert_eq!(syslog_priority(&Level::ERROR), libc::LOG_ERR);
        assert_eq!(syslog_priority(&Level::WARN), libc::LOG_WARNING);
        assert_eq!(syslog_priority(&Level::INFO), libc::LOG_INFO);
        assert_eq!(syslog_priority(&Level::DEBUG), libc::LOG_DEBUG);
        assert_eq!(syslog_priority(&Level::TRACE), libc::LOG_DEBUG);
    }

    #[test]
    fn visitor_renders_message_then_fields() {
        let capture = LogCapture::default();
        let subscriber = Registry::default().with(capture.clone());

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(errno = 2, program = "poweroff", "action failed");
            tracing::info!("Daemon starting up");
        });

        let lines = capture.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].0, Level::ERROR);
        assert_eq!(lines[0].1, "action failed errno=2 program=poweroff");
        assert_eq!(lines[1], (Level::INFO, "Daemon starting up".to_string()));
    }

    #[test]
    fn visitor_strips_interior_nul_bytes() {
        let visitor = MessageVisitor {
            message: "bad\0line".into(),
            fields: String::new(),
        };
        assert_eq!(visitor.finish(), "badline");
    }
}
