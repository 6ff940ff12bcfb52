//! Debounced autosave scheduling.
//!
//! Time never advances on its own here: callers pass the current `Instant`
//! into every call, so the scheduler works with any event loop and tests
//! can drive it deterministically.

use log::debug;
use std::time::{Duration, Instant};

// ─────────────────────────────────────────────────────────────────────────────
// Scheduled Task
// ─────────────────────────────────────────────────────────────────────────────

/// A cancellable fire-once deadline.
#[derive(Debug, Clone, Default)]
pub struct ScheduledTask {
    deadline: Option<Instant>,
}

impl ScheduledTask {
    /// (Re)arm the task to fire `delay` after `now`, replacing any pending deadline.
    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` exactly once when the deadline has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Time left until the deadline, if one is pending.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Autosave Scheduler
// ─────────────────────────────────────────────────────────────────────────────

/// Debounces content changes into saves and tracks the "Saved" indicator.
#[derive(Debug, Clone)]
pub struct AutosaveScheduler {
    task: ScheduledTask,
    delay: Duration,
    indicator_duration: Duration,
    indicator_expires_at: Option<Instant>,
}

impl AutosaveScheduler {
    pub fn new(delay: Duration, indicator_duration: Duration) -> Self {
        Self {
            task: ScheduledTask::default(),
            delay,
            indicator_duration,
            indicator_expires_at: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a content change: any pending save is pushed back by the full delay.
    pub fn content_changed(&mut self, now: Instant) {
        self.task.schedule(now, self.delay);
    }

    pub fn cancel(&mut self) {
        if self.task.is_pending() {
            debug!("Pending autosave cancelled");
        }
        self.task.cancel();
    }

    pub fn is_pending(&self) -> bool {
        self.task.is_pending()
    }

    /// Returns `true` once when the quiet interval has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.task.fire_if_due(now)
    }

    pub fn show_indicator(&mut self, now: Instant) {
        self.indicator_expires_at = Some(now + self.indicator_duration);
    }

    pub fn indicator_visible(&self, now: Instant) -> bool {
        self.indicator_expires_at
            .is_some_and(|expires_at| now < expires_at)
    }

    /// How long the event loop may sleep before something here changes.
    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        let indicator = self
            .indicator_expires_at
            .filter(|expires_at| now < *expires_at)
            .map(|expires_at| expires_at - now);
        match (self.task.remaining(now), indicator) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
