//! Virtual-time timer queue.
//!
//! Every pending delay is an explicit value tagged with the run that scheduled it. Hosts drive
//! time forward with [`TimerQueue::pop_due`]; cancelling a run removes its timers outright so a
//! superseded run can never fire into a newer one.

use std::time::Duration;

/// Identity of one capture run or edit session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(pub u64);

/// Handle for one scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Clone, Debug)]
struct Pending<K> {
    id: TimerId,
    run: RunId,
    deadline: Duration,
    kind: K,
}

/// Single-threaded timer queue over a virtual clock.
#[derive(Clone, Debug)]
pub struct TimerQueue<K> {
    now: Duration,
    next_id: u64,
    pending: Vec<Pending<K>>,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<K> TimerQueue<K> {
    /// Create an empty queue at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// `true` when nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Schedule `kind` to fire `delay` after the current virtual time.
    pub fn schedule(&mut self, run: RunId, delay: Duration, kind: K) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            run,
            deadline: self.now + delay,
            kind,
        });
        id
    }

    /// Cancel one timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    /// Cancel every timer scheduled by `run`, returning how many were dropped.
    pub fn cancel_run(&mut self, run: RunId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|p| p.run != run);
        before - self.pending.len()
    }

    /// Cancel everything.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        n
    }

    /// Earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.iter().map(|p| p.deadline).min()
    }

    /// Time remaining until the earliest deadline.
    pub fn time_until_next(&self) -> Option<Duration> {
        self.next_deadline().map(|d| d.saturating_sub(self.now))
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to its deadline.
    ///
    /// Ties fire in scheduling order. Returns `None` (and leaves the clock alone) when nothing is
    /// due; callers finish a step with [`TimerQueue::settle_at`].
    pub fn pop_due(&mut self, until: Duration) -> Option<(RunId, K)> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.deadline <= until)
            .min_by_key(|(_, p)| (p.deadline, p.id))
            .map(|(i, _)| i)?;
        let p = self.pending.remove(idx);
        self.now = self.now.max(p.deadline);
        Some((p.run, p.kind))
    }

    /// Move the clock forward to `t` once all due timers have been popped.
    pub fn settle_at(&mut self, t: Duration) {
        self.now = self.now.max(t);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/timer.rs"]
mod tests;
