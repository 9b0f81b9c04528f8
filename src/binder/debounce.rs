//! Cancellable single-shot timer used to coalesce re-renders

use std::time::{Duration, Instant};

/// One shared pending deadline with cancel-and-restart semantics.
///
/// Time is passed in by the caller so the event loop (or a test) owns the clock.
#[derive(Debug, Clone)]
pub(crate) struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Cancel any pending deadline and start a new one at `now + window`
    pub(crate) fn start(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    pub(crate) fn cancel(&mut self) {
        self.deadline = None;
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once, when the pending deadline has been reached
    pub(crate) fn fire_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
