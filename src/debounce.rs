//! Trailing-edge debouncer
//!
//! Holds at most one pending value. Scheduling replaces whatever was pending
//! and restarts the quiet period; the value is released only once the quiet
//! period has fully elapsed. Time is passed in by the caller.

use std::time::{Duration, Instant};

#[derive(Debug)]
struct Pending<T> {
    due: Instant,
    value: T,
}

#[derive(Debug)]
pub struct Debouncer<T> {
    wait: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(wait: Duration) -> Self {
        Debouncer { wait, pending: None }
    }

    /// Arm `value` to fire at `now + wait`, returning the value it supersedes
    pub fn schedule(&mut self, now: Instant, value: T) -> Option<T> {
        let due = now + self.wait;
        self.pending
            .replace(Pending { due, value })
            .map(|superseded| superseded.value)
    }

    /// Take the pending value if its deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.pending.as_ref().is_some_and(|p| now >= p.due) {
            self.pending.take().map(|p| p.value)
        } else {
            None
        }
    }

    /// Drop the pending value, if any
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    /// When the pending value becomes due
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
