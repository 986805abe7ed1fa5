use serde::Serialize;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

/// A dismissable user-facing message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Notification {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Notification {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notification {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Fire-and-forget sink for user notifications. Nothing is returned, so core
/// logic never depends on delivery.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Default notifier: writes notifications to the log.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, n: Notification) {
        match n.level {
            NotificationLevel::Success => {
                info!(target: "notify", "{}", n.message)
            }
            NotificationLevel::Warning => warn!(target: "notify", "{}", n.message),
            NotificationLevel::Error => error!(target: "notify", "{}", n.message),
        }
    }
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Keeps every notification for later assertions.
    #[derive(Default)]
    pub struct RecordingNotifier {
        seen: Mutex<Vec<Notification>>,
    }

    impl RecordingNotifier {
        pub fn seen(&self) -> Vec<Notification> {
            self.seen.lock().map(|s| s.clone()).unwrap_or_default()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notification: Notification) {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(notification);
            }
        }
    }
}
