//! Quiet-period debouncer for search input.
//!
//! Each new input restarts the delay; a value is released only once input
//! has been quiet for the whole delay. Time is passed in explicitly so the
//! behavior is testable without sleeping.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Stage `value`, replacing anything pending and restarting the delay.
    pub fn input(&mut self, value: T) {
        self.input_at(value, Instant::now());
    }

    pub fn input_at(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// When the pending value becomes releasable.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at)
    }

    #[must_use]
    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|(v, _)| v)
    }

    /// Release the pending value if its quiet period has elapsed by `now`.
    pub fn poll_at(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, at)) if *at <= now => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }

    /// Release the pending value immediately (e.g. on Enter).
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(v, _)| v)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
#[path = "debounce_test.rs"]
mod tests;
