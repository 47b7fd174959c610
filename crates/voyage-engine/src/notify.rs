//! User-facing notifications
//!
//! Engine operations never return errors to the presentation layer. They
//! report outcomes here and hand back a sentinel value instead.

use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            title: "Success".to_string(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Keeps every notification for later inspection
#[derive(Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    /// Drain what has been recorded so far
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.lock())
    }

    pub fn count(&self, level: Level) -> usize {
        self.lock().iter().filter(|n| n.level == level).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        self.notifications
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.lock().push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notification::success("Package created successfully"));
        notifier.notify(Notification::error("Error", "Failed to fetch packages"));

        assert_eq!(notifier.count(Level::Success), 1);
        assert_eq!(notifier.count(Level::Error), 1);

        let drained = notifier.take();
        assert_eq!(drained[0].title, "Success");
        assert_eq!(drained[1].message, "Failed to fetch packages");
        assert!(notifier.all().is_empty());
    }
}
