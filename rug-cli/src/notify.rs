//! Terminal output shared by the dialogue and background exports.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use rug_core::notify::{Notification, NotificationKind, Notifier};
use tracing::warn;

/// Line-oriented writer that can be cloned into export tasks.
#[derive(Clone)]
pub struct Console {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Console {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Writes `text` followed by a newline and flushes.
    pub fn line(
        &self,
        text: &str,
    ) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(error) = writeln!(out, "{text}").and_then(|()| out.flush()) {
            warn!(%error, "console write failed");
        }
    }

    pub fn blank(&self) {
        self.line("");
    }
}

/// Prints notifications to the console with a status marker.
#[derive(Clone)]
pub struct TerminalNotifier {
    console: Console,
}

impl TerminalNotifier {
    pub fn new(console: Console) -> Self {
        Self { console }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(
        &self,
        notification: Notification,
    ) {
        let marker = match notification.kind {
            NotificationKind::Error => "✖",
            NotificationKind::Info => "✔",
        };
        self.console.line(&format!("{marker} {}", notification.message));
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    /// In-memory writer whose contents can be read back.
    #[derive(Clone, Default)]
    pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(
            &mut self,
            buf: &[u8],
        ) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::testing::SharedBuffer;
    use super::*;

    #[test]
    fn notifications_are_marked_by_kind() {
        let buffer = SharedBuffer::default();
        let notifier = TerminalNotifier::new(Console::new(buffer.clone()));

        notifier.notify(Notification::info("copied"));
        notifier.notify(Notification::error("failed"));

        assert_eq!(buffer.contents(), "✔ copied\n✖ failed\n");
    }
}
