use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A transient operator-facing message. The UI renders these as dismissible
/// toasts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Buffers notifications emitted from any thread until the UI drains them on
/// its poll tick.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    queued: Mutex<VecDeque<Notification>>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Notification> {
        let mut queued = self
            .queued
            .lock()
            .expect("notification queue lock poisoned");
        queued.drain(..).collect()
    }
}

impl Notifier for NotificationQueue {
    fn notify(&self, notification: Notification) {
        self.queued
            .lock()
            .expect("notification queue lock poisoned")
            .push_back(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::{Notification, NotificationKind, NotificationQueue, Notifier};

    #[test]
    fn drain_returns_notifications_in_dispatch_order() {
        let queue = NotificationQueue::new();
        queue.notify(Notification::success("uploaded"));
        queue.notify(Notification::error("upload failed"));

        let drained = queue.drain();

        assert_eq!(
            drained,
            vec![
                Notification {
                    kind: NotificationKind::Success,
                    message: "uploaded".to_string(),
                },
                Notification {
                    kind: NotificationKind::Error,
                    message: "upload failed".to_string(),
                },
            ]
        );
    }

    #[test]
    fn drain_empties_the_queue() {
        let queue = NotificationQueue::new();
        queue.notify(Notification::success("once"));

        assert_eq!(queue.drain().len(), 1);
        assert!(queue.drain().is_empty());
    }
}
