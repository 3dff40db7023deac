//! User-facing notifications raised by cart transitions.

use std::sync::{Arc, Mutex};

/// A short toast-style message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: &'static str,
    pub description: String,
}

impl Notification {
    pub(crate) fn new(title: &'static str, description: impl Into<String>) -> Self {
        Self {
            title,
            description: description.into(),
        }
    }
}

/// Sink for cart notifications.
pub trait Notifier {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        tracing::info!(title = notification.title, "{}", notification.description);
    }
}

/// Keeps every notification so a UI layer (or a test) can drain them.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    /// Take all notifications recorded so far.
    #[must_use]
    pub fn drain(&self) -> Vec<Notification> {
        self.seen
            .lock()
            .map(|mut seen| std::mem::take(&mut *seen))
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(notification);
        }
    }
}
