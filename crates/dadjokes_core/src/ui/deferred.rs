//! One-shot deferred actions polled by the UI frame loop.
//!
//! # Invariants
//! - Each scheduled action is returned by `take_due` at most once.
//! - A cancelled action is never returned.
//! - Time is supplied by the caller; the queue never reads the clock.

use std::time::{Duration, Instant};

/// Handle for one scheduled action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug)]
struct Pending<A> {
    id: TaskId,
    due_at: Instant,
    action: A,
}

/// Single-threaded queue of actions waiting for their due time.
#[derive(Debug)]
pub struct DeferredQueue<A> {
    pending: Vec<Pending<A>>,
    next_id: u64,
}

impl<A> Default for DeferredQueue<A> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next_id: 0,
        }
    }
}

impl<A> DeferredQueue<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `action` to become due `delay` after `now`.
    pub fn schedule(&mut self, now: Instant, delay: Duration, action: A) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due_at: now + delay,
            action,
        });
        id
    }

    /// Drops a pending action. Returns `false` when it already ran or was
    /// cancelled before.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|pending| pending.id != id);
        self.pending.len() != before
    }

    /// Removes and returns every action due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<A> {
        let (mut due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|pending| pending.due_at <= now);
        self.pending = waiting;
        due.sort_by_key(|pending| (pending.due_at, pending.id));
        due.into_iter().map(|pending| pending.action).collect()
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.pending.iter().any(|pending| pending.id == id)
    }

    /// Earliest due time, for frame loops that want to sleep until then.
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.iter().map(|pending| pending.due_at).min()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
