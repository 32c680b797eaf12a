//! One-shot timer abstraction for the playback scheduler
//!
//! ## Contract
//! - `schedule(delay)` returns a fresh handle; the host fires it once after `delay`
//! - `cancel(handle)` is synchronous: a cancelled handle never fires
//! - The host delivers a firing by calling
//!   [`PlaybackScheduler::on_timer`](super::scheduler::PlaybackScheduler::on_timer)
//!
//! [`ManualTimer`] is a virtual clock: nothing fires until the owner advances it.

use std::collections::BTreeMap;
use std::time::Duration;

/// Identifies one scheduled firing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(pub u64);

/// Host-provided deferred callback facility
pub trait TimerHost {
    fn schedule(&mut self, delay: Duration) -> TimerHandle;
    fn cancel(&mut self, handle: TimerHandle);
}

/// Deterministic virtual-time timer
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    now: Duration,
    next_id: u64,
    /// handle -> deadline
    pending: BTreeMap<TimerHandle, Duration>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.contains_key(&handle)
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.values().min().copied()
    }

    /// Remove the earliest firing due at or before `until` and move the clock to
    /// its deadline. Ties go to the handle scheduled first.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerHandle> {
        let (handle, deadline) = self
            .pending
            .iter()
            .map(|(h, d)| (*h, *d))
            .filter(|&(_, d)| d <= until)
            .min_by_key(|&(h, d)| (d, h))?;

        self.pending.remove(&handle);
        self.now = self.now.max(deadline);
        Some(handle)
    }

    /// Remove the earliest firing regardless of its deadline.
    pub fn pop_next(&mut self) -> Option<TimerHandle> {
        let deadline = self.next_deadline()?;
        self.pop_due(deadline)
    }

    /// Move the clock forward without firing anything.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

impl TimerHost for ManualTimer {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.pending.insert(handle, self.now.saturating_add(delay));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.remove(&handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_handles_are_unique() {
        let mut timer = ManualTimer::new();
        let a = timer.schedule(MS);
        let b = timer.schedule(MS);
        assert_ne!(a, b);
        assert_eq!(timer.pending_count(), 2);
    }

    #[test]
    fn test_pop_due_respects_deadline() {
        let mut timer = ManualTimer::new();
        let h = timer.schedule(40 * MS);

        assert_eq!(timer.pop_due(39 * MS), None);
        assert_eq!(timer.pop_due(40 * MS), Some(h));
        assert_eq!(timer.now(), 40 * MS);
        assert_eq!(timer.pending_count(), 0);
    }

    #[test]
    fn test_pop_due_earliest_first() {
        let mut timer = ManualTimer::new();
        let late = timer.schedule(80 * MS);
        let early = timer.schedule(20 * MS);

        assert_eq!(timer.pop_due(100 * MS), Some(early));
        assert_eq!(timer.pop_due(100 * MS), Some(late));
    }

    #[test]
    fn test_cancelled_never_fires() {
        let mut timer = ManualTimer::new();
        let h = timer.schedule(10 * MS);
        timer.cancel(h);

        assert!(!timer.is_pending(h));
        assert_eq!(timer.pop_next(), None);
    }

    #[test]
    fn test_schedule_relative_to_now() {
        let mut timer = ManualTimer::new();
        timer.set_now(100 * MS);
        timer.schedule(40 * MS);
        assert_eq!(timer.next_deadline(), Some(140 * MS));
    }
}
