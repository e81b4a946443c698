//! Cancellable debounce timer
//!
//! Holds at most one pending task. Scheduling a new task aborts the previous
//! one (last write wins, nothing queues). Dropping the timer aborts whatever
//! is still pending.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

#[derive(Default)]
pub struct DebounceTimer {
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for DebounceTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebounceTimer")
            .field("pending", &self.is_pending())
            .finish()
    }
}

impl DebounceTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` after `delay`, replacing any task still waiting.
    ///
    /// Outside a tokio runtime there is nothing to wait on, so the task runs
    /// immediately.
    pub fn schedule<F>(&self, delay: Duration, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("No tokio runtime, running debounced task immediately");
            self.cancel();
            task();
            return;
        };

        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });

        if let Some(previous) = self.pending.lock().replace(handle) {
            if !previous.is_finished() {
                tracing::trace!("Debounced task superseded");
            }
            previous.abort();
        }
    }

    /// Abort the pending task. Returns true if one was still waiting.
    pub fn cancel(&self) -> bool {
        match self.pending.lock().take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.get_mut().take() {
            handle.abort();
        }
    }
}
