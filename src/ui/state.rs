use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chimeboard::app::{Notification, NotificationKind};
use chimeboard::domain::{CustomSoundEntry, MethodCallError};

/// A drained notification with a window-local id so individual toasts can be
/// dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ToastMessage {
    pub(super) id: u64,
    pub(super) kind: NotificationKind,
    pub(super) message: String,
}

impl ToastMessage {
    pub(super) fn from_notification(id: u64, notification: Notification) -> Self {
        Self {
            id,
            kind: notification.kind,
            message: notification.message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(super) struct SoundsPanelSnapshot {
    pub(super) loading: bool,
    pub(super) sounds: Vec<CustomSoundEntry>,
    pub(super) error: Option<String>,
}

/// Shared between the window and the background refresh task. On a failed
/// refresh the previous listing is kept and the error shown alongside it.
#[derive(Debug, Default)]
pub(super) struct SoundsPanelState {
    inner: Mutex<SoundsPanelSnapshot>,
}

impl SoundsPanelState {
    pub(super) fn begin_loading(&self) {
        let mut inner = self.inner.lock().expect("sounds panel lock poisoned");
        inner.loading = true;
        inner.error = None;
    }

    pub(super) fn finish(&self, result: Result<Vec<CustomSoundEntry>, MethodCallError>) {
        let mut inner = self.inner.lock().expect("sounds panel lock poisoned");
        inner.loading = false;
        match result {
            Ok(sounds) => {
                inner.sounds = sounds;
                inner.error = None;
            }
            Err(error) => inner.error = Some(error.user_message()),
        }
    }

    pub(super) fn snapshot(&self) -> SoundsPanelSnapshot {
        self.inner
            .lock()
            .expect("sounds panel lock poisoned")
            .clone()
    }
}

/// Carries the form's parent-view callbacks across the background save task:
/// `record_created` is the navigate-to-new signal, `mark_changed` the
/// post-save refresh signal. The window applies both on its poll tick.
#[derive(Debug, Default)]
pub(super) struct ParentViewSignals {
    created: Mutex<Option<String>>,
    changed: AtomicBool,
}

impl ParentViewSignals {
    pub(super) fn record_created(&self, sound_id: Option<&str>) {
        if let Some(id) = sound_id.filter(|id| !id.trim().is_empty()) {
            *self.created.lock().expect("parent signals lock poisoned") = Some(id.to_string());
        }
    }

    pub(super) fn take_created(&self) -> Option<String> {
        self.created
            .lock()
            .expect("parent signals lock poisoned")
            .take()
    }

    pub(super) fn mark_changed(&self) {
        self.changed.store(true, Ordering::SeqCst);
    }

    pub(super) fn take_changed(&self) -> bool {
        self.changed.swap(false, Ordering::SeqCst)
    }
}
