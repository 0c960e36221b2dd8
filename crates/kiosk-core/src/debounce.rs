#![forbid(unsafe_code)]

//! Debounced clear: schedule-or-replace keyed by item identity.
//!
//! [`DebouncedClear`] keeps at most one outstanding timer. Scheduling a new
//! clear cancels the previous one first, and a fired timer is only honoured
//! if its handle matches the live one. Dropping the primitive cancels
//! whatever is still pending, so a destroyed owner never receives a
//! callback.

use crate::schedule::{Scheduler, TimerHandle};
use std::marker::PhantomData;
use std::time::Duration;

/// Message delivered when a deferred clear comes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ClearDue<K> {
    /// The item the clear was scheduled for.
    pub key: K,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending<K> {
    key: K,
    handle: TimerHandle,
}

/// A single-slot deferred clear.
///
/// `S` is the host scheduler and `M` the host message type; `M` only needs a
/// conversion from [`ClearDue`] so one scheduler can serve many groups.
pub struct DebouncedClear<K, S, M = ClearDue<K>>
where
    S: Scheduler<M>,
{
    scheduler: S,
    delay: Duration,
    pending: Option<Pending<K>>,
    _msg: PhantomData<fn() -> M>,
}

impl<K, S, M> std::fmt::Debug for DebouncedClear<K, S, M>
where
    K: std::fmt::Debug,
    S: Scheduler<M>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebouncedClear")
            .field("delay", &self.delay)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl<K, S, M> DebouncedClear<K, S, M>
where
    K: Copy + PartialEq,
    S: Scheduler<M>,
    M: From<ClearDue<K>>,
{
    /// Creates an idle debouncer that clears after `delay`.
    pub fn new(scheduler: S, delay: Duration) -> Self {
        Self {
            scheduler,
            delay,
            pending: None,
            _msg: PhantomData,
        }
    }

    /// The configured delay.
    #[inline]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules a clear for `key`, replacing any clear already pending.
    pub fn schedule(&mut self, key: K) -> TimerHandle {
        self.cancel();
        let handle = self
            .scheduler
            .schedule(self.delay, M::from(ClearDue { key }));
        self.pending = Some(Pending { key, handle });
        handle
    }

    /// Cancels the pending clear, if any. Returns `true` if one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                self.scheduler.cancel(pending.handle);
                true
            }
            None => false,
        }
    }

    /// Key of the pending clear, if any.
    pub fn pending_key(&self) -> Option<K> {
        self.pending.map(|p| p.key)
    }

    /// Handle of the pending clear, if any.
    pub fn pending_handle(&self) -> Option<TimerHandle> {
        self.pending.map(|p| p.handle)
    }

    /// Consumes a fired timer.
    ///
    /// Returns the key if `handle` is the live timer; stale or unknown
    /// handles return `None` and leave the pending slot untouched.
    pub fn fire(&mut self, handle: TimerHandle) -> Option<K> {
        match self.pending {
            Some(pending) if pending.handle == handle => {
                self.pending = None;
                Some(pending.key)
            }
            _ => {
                crate::trace!(timer_id = handle.id(), "stale clear timer ignored");
                None
            }
        }
    }
}

impl<K, S, M> Drop for DebouncedClear<K, S, M>
where
    S: Scheduler<M>,
{
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.scheduler.cancel(pending.handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ManualScheduler;

    const DELAY: Duration = Duration::from_millis(330);

    #[test]
    fn fires_once_for_live_handle() {
        let sched = ManualScheduler::<ClearDue<u32>>::new();
        let mut clear: DebouncedClear<u32, _> = DebouncedClear::new(sched.clone(), DELAY);
        let h = clear.schedule(4);
        assert_eq!(clear.pending_key(), Some(4));

        let fired = sched.advance(DELAY);
        assert_eq!(fired, vec![(h, ClearDue { key: 4 })]);
        assert_eq!(clear.fire(h), Some(4));
        assert_eq!(clear.fire(h), None);
        assert_eq!(clear.pending_key(), None);
    }

    #[test]
    fn reschedule_cancels_previous() {
        let sched = ManualScheduler::<ClearDue<u32>>::new();
        let mut clear: DebouncedClear<u32, _> = DebouncedClear::new(sched.clone(), DELAY);
        let first = clear.schedule(1);
        let second = clear.schedule(2);
        assert!(!sched.is_pending(first));
        assert!(sched.is_pending(second));
        assert_eq!(sched.pending_count(), 1);
    }

    #[test]
    fn stale_handle_is_ignored() {
        let sched = ManualScheduler::<ClearDue<u32>>::new();
        let mut clear: DebouncedClear<u32, _> = DebouncedClear::new(sched.clone(), DELAY);
        let first = clear.schedule(1);
        clear.schedule(2);
        assert_eq!(clear.fire(first), None);
        assert_eq!(clear.pending_key(), Some(2));
    }

    #[test]
    fn cancel_empties_slot() {
        let sched = ManualScheduler::<ClearDue<u32>>::new();
        let mut clear: DebouncedClear<u32, _> = DebouncedClear::new(sched.clone(), DELAY);
        assert!(!clear.cancel());
        clear.schedule(9);
        assert!(clear.cancel());
        assert_eq!(sched.pending_count(), 0);
    }

    #[test]
    fn drop_cancels_pending() {
        let sched = ManualScheduler::<ClearDue<u32>>::new();
        {
            let mut clear: DebouncedClear<u32, _> = DebouncedClear::new(sched.clone(), DELAY);
            clear.schedule(3);
            assert_eq!(sched.pending_count(), 1);
        }
        assert_eq!(sched.pending_count(), 0);
    }

    #[derive(Debug, PartialEq)]
    enum HostMsg {
        Clear(ClearDue<u8>),
    }

    impl From<ClearDue<u8>> for HostMsg {
        fn from(due: ClearDue<u8>) -> Self {
            Self::Clear(due)
        }
    }

    #[test]
    fn converts_into_host_message() {
        let sched = ManualScheduler::<HostMsg>::new();
        let mut clear: DebouncedClear<u8, _, HostMsg> = DebouncedClear::new(&sched, DELAY);
        let h = clear.schedule(5);
        assert_eq!(
            sched.advance(DELAY),
            vec![(h, HostMsg::Clear(ClearDue { key: 5 }))]
        );
    }
}
