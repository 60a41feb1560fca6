//! Cancellable timers and debouncing

use std::collections::BTreeMap;
use std::time::Duration;

/// Handle of one scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Something that can run a callback after a delay.
///
/// The queue only hands out handles; whoever drives it reports fired handles
/// back to the owner of the timer.
pub trait TimerQueue {
    fn schedule(&mut self, delay: Duration) -> TimerId;

    /// Returns false when the timer already fired or was cancelled.
    fn cancel(&mut self, id: TimerId) -> bool;
}

/// Manually advanced clock
///
/// Timers fire in deadline order, ties in scheduling order.
#[derive(Debug, Default)]
pub struct VirtualClock {
    now: Duration,
    next_id: u64,
    pending: BTreeMap<TimerId, Duration>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Move time forward and return the timers that came due.
    pub fn advance(&mut self, by: Duration) -> Vec<TimerId> {
        self.now += by;
        let now = self.now;

        let mut due: Vec<(Duration, TimerId)> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(id, deadline)| (*deadline, *id))
            .collect();
        due.sort();

        for (_, id) in &due {
            self.pending.remove(id);
        }
        due.into_iter().map(|(_, id)| id).collect()
    }
}

impl TimerQueue for VirtualClock {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.insert(id, self.now + delay);
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        self.pending.remove(&id).is_some()
    }
}

/// At most one pending timer; triggering again replaces it.
#[derive(Debug, Clone)]
pub struct DebounceTimer {
    delay: Duration,
    pending: Option<TimerId>,
}

impl DebounceTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Cancel any pending timer and schedule a fresh one
    pub fn trigger<Q: TimerQueue + ?Sized>(&mut self, queue: &mut Q) -> TimerId {
        if let Some(previous) = self.pending.take() {
            queue.cancel(previous);
        }
        let id = queue.schedule(self.delay);
        self.pending = Some(id);
        id
    }

    /// Accept a fired timer. Returns false for stale handles.
    pub fn fire(&mut self, id: TimerId) -> bool {
        if self.pending == Some(id) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}
