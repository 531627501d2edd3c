use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use crate::domain::MethodCallError;

/// Counts background tasks that are still running so the UI knows whether to
/// keep polling for their notifications. Not a concurrency guard: nothing
/// prevents overlapping tasks.
#[derive(Debug, Default)]
pub struct ActivityTracker {
    in_flight: AtomicUsize,
}

impl ActivityTracker {
    pub fn begin(self: &Arc<Self>) -> ActivityGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        ActivityGuard {
            tracker: Arc::clone(self),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) == 0
    }
}

pub struct ActivityGuard {
    tracker: Arc<ActivityTracker>,
}

impl Drop for ActivityGuard {
    fn drop(&mut self) {
        self.tracker.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

pub trait TaskRunner: Send + Sync {
    fn run(&self, name: &str, task: Box<dyn FnOnce() + Send>) -> Result<(), MethodCallError>;
}

/// Runs each task on its own named, detached thread. Tasks are
/// fire-and-forget; completion is observable only through whatever the task
/// itself reports.
pub struct ThreadTaskRunner {
    tracker: Arc<ActivityTracker>,
}

impl ThreadTaskRunner {
    pub fn new() -> Self {
        Self {
            tracker: Arc::new(ActivityTracker::default()),
        }
    }

    pub fn tracker(&self) -> Arc<ActivityTracker> {
        Arc::clone(&self.tracker)
    }
}

impl Default for ThreadTaskRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskRunner for ThreadTaskRunner {
    fn run(&self, name: &str, task: Box<dyn FnOnce() + Send>) -> Result<(), MethodCallError> {
        let guard = self.tracker.begin();
        thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let _guard = guard;
                task();
            })
            .map(|_handle| ())
            .map_err(|error| {
                MethodCallError::internal(format!(
                    "failed to start background task '{name}': {error}"
                ))
            })
    }
}
