//! Deferred tasks on a virtual clock
//!
//! The calculator has exactly two delayed reactions: leaving the error display
//! and removing the result flash. Both are fire-and-forget, so the queue has
//! no cancellation; a task that fires after the state has moved on must be a
//! no-op for whoever handles it.
//!
//! Time only moves when [`TimerQueue::advance`] is called, which keeps tests
//! deterministic. Browser builds use `setTimeout` instead.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Work to run once a delay has elapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredTask {
    /// Leave the error display entered at `epoch`
    Recover {
        /// Error epoch the task was scheduled for
        epoch: u64,
    },
    /// Remove the result flash cue
    EndFlash,
}

/// Handle returned by [`TimerQueue::schedule`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerId(u64);

/// Single-threaded timer queue ordered by due time, then by scheduling order
#[derive(Debug, Default)]
pub struct TimerQueue {
    /// Time elapsed since the queue was created
    now: Duration,
    /// Pending tasks keyed by (due time, id)
    pending: BTreeMap<(Duration, TimerId), DeferredTask>,
    /// Next id to hand out
    next_id: u64,
}

impl TimerQueue {
    /// Creates an empty queue at time zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of tasks that have not fired yet
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Returns true if nothing is scheduled
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Schedules `task` to fire `delay` from now
    pub fn schedule(&mut self, delay: Duration, task: DeferredTask) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.insert((self.now + delay, id), task);
        tracing::trace!(?task, ?delay, "scheduled deferred task");
        id
    }

    /// Moves the clock forward and returns every task that became due,
    /// earliest first
    pub fn advance(&mut self, by: Duration) -> Vec<DeferredTask> {
        self.now += by;
        let still_pending = self.pending.split_off(&(self.now, TimerId(u64::MAX)));
        let due = std::mem::replace(&mut self.pending, still_pending);
        due.into_values().collect()
    }

    /// Convenience wrapper around [`advance`](Self::advance) in milliseconds
    pub fn advance_ms(&mut self, ms: u64) -> Vec<DeferredTask> {
        self.advance(Duration::from_millis(ms))
    }
}
