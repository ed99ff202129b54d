//=========================================================================
// Console
//=========================================================================
//
// Platform-to-engine diagnostic channel.
//
// Architecture:
//   Platform ──report()──> Sender<ConsoleMessage> ──> engine console
//                 └──────> log facade
//
// Every message is mirrored to the `log` facade, so diagnostics are never
// lost when no engine console is attached. A full or disconnected channel
// is not an error: the platform keeps running and the drop is logged
// without repeating the message, so each report yields one line naming
// its subject.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use log::{debug, warn, Level};

//=== Severity ============================================================

/// Console message severity, mapped onto the engine's report prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Note,
    Warning,
    Error,
}

impl Severity {
    fn log_level(self) -> Level {
        match self {
            Self::Note => Level::Info,
            Self::Warning => Level::Warn,
            Self::Error => Level::Error,
        }
    }
}

//=== ConsoleMessage ======================================================

/// A single diagnostic line sent to the engine console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleMessage {
    pub severity: Severity,
    pub text: String,
}

//=== Console =============================================================

/// Handle the platform layer uses to report to the engine console.
#[derive(Debug, Clone, Default)]
pub struct Console {
    sender: Option<Sender<ConsoleMessage>>,
    dropped: Arc<AtomicUsize>,
}

impl Console {
    /// Creates a console attached to a bounded channel.
    ///
    /// The receiver is handed to the engine, which drains it from its
    /// own console loop.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn channel(capacity: usize) -> (Self, Receiver<ConsoleMessage>) {
        assert!(capacity > 0, "Console capacity must be positive");
        let (tx, rx) = bounded(capacity);
        (Self::attached(tx), rx)
    }

    /// Creates a console forwarding to an existing sender.
    pub fn attached(sender: Sender<ConsoleMessage>) -> Self {
        Self {
            sender: Some(sender),
            dropped: Arc::default(),
        }
    }

    /// Creates a console that only writes to the log facade.
    pub fn detached() -> Self {
        debug!(target: "platform::console", "No engine console attached");
        Self::default()
    }

    //--- Reporting --------------------------------------------------------

    /// Reports one diagnostic line.
    pub fn report(&self, severity: Severity, text: impl Into<String>) {
        let text = text.into();
        log::log!(target: "platform::console", severity.log_level(), "{}", text);

        let Some(sender) = &self.sender else {
            return;
        };

        match sender.try_send(ConsoleMessage { severity, text }) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                warn!(
                    target: "platform::console",
                    "Console backlog full, {} message(s) dropped so far",
                    dropped
                );
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!(target: "platform::console", "Console receiver gone, message not forwarded");
            }
        }
    }

    /// Messages dropped because the console backlog was full.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn warn(&self, text: impl Into<String>) {
        self.report(Severity::Warning, text);
    }

    pub fn note(&self, text: impl Into<String>) {
        self.report(Severity::Note, text);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::testing::capture_logs;
    use crossbeam_channel::unbounded;

    #[test]
    fn report_forwards_to_receiver() {
        let (tx, rx) = unbounded();
        let console = Console::attached(tx);

        console.warn("low battery");

        let msg = rx.try_recv().unwrap();
        assert_eq!(msg.severity, Severity::Warning);
        assert_eq!(msg.text, "low battery");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn report_survives_disconnected_receiver() {
        let (tx, rx) = unbounded();
        let console = Console::attached(tx);
        drop(rx);

        console.note("nobody is listening");
    }

    #[test]
    fn report_drops_when_backlog_full() {
        let (console, rx) = Console::channel(1);

        console.note("first");
        console.note("second");

        assert_eq!(rx.try_recv().unwrap().text, "first");
        assert!(rx.try_recv().is_err());
        assert_eq!(console.dropped(), 1);
    }

    #[test]
    fn full_backlog_does_not_repeat_message_text() {
        let (console, _rx) = Console::channel(1);
        console.note("filler");

        let lines = capture_logs(|| console.warn("ux0:secret_target"));

        let naming: Vec<_> = lines.iter().filter(|l| l.contains("ux0:secret_target")).collect();
        assert_eq!(naming.len(), 1, "{:?}", lines);
        assert!(lines.iter().any(|l| l.starts_with("WARN") && l.contains("backlog full")));
    }

    #[test]
    fn disconnected_receiver_is_logged_as_warning() {
        let (tx, rx) = unbounded();
        let console = Console::attached(tx);
        drop(rx);

        let lines = capture_logs(|| console.note("orphan"));

        assert!(lines.iter().any(|l| l.starts_with("WARN") && l.contains("receiver gone")));
    }

    #[test]
    fn detached_console_only_logs() {
        Console::detached().warn("not forwarded");
    }

    #[test]
    #[should_panic(expected = "Console capacity must be positive")]
    fn channel_panics_on_zero_capacity() {
        let _ = Console::channel(0);
    }
}
