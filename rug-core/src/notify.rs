//! The single channel for user-visible alerts.

use std::fmt;

/// Severity of a notification. There are only two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Shows a notification to the user.
///
/// Implementations must be callable from export tasks, hence `Send + Sync`.
pub trait Notifier: Send + Sync {
    fn notify(
        &self,
        notification: Notification,
    );
}
