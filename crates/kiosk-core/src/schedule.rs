#![forbid(unsafe_code)]

//! One-shot timer capability.
//!
//! Engines that need deferred work (the selector's highlight clear) do not
//! own a clock. They ask a [`Scheduler`] to deliver a message after a delay
//! and keep the returned [`TimerHandle`]. When the delay elapses the host
//! receives `(handle, message)` and routes it back to the engine, which
//! compares the handle against the one it is waiting for. A handle that was
//! cancelled or superseded is therefore harmless even if it still fires.
//!
//! [`ManualScheduler`] is a deterministic implementation whose clock only
//! moves when [`ManualScheduler::advance`] is called. Real-time hosts use the
//! thread-backed scheduler from `kiosk-runtime`.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

/// Opaque identity of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Wraps a raw id. Schedulers must never hand out the same id twice.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// The raw id.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Capability to run a message back to the host after a delay.
pub trait Scheduler<M> {
    /// Schedules `msg` for delivery after `delay`.
    fn schedule(&self, delay: Duration, msg: M) -> TimerHandle;

    /// Cancels a pending timer.
    ///
    /// Returns `true` if the timer was still pending. Cancelling an unknown
    /// or already-fired handle is a no-op.
    fn cancel(&self, handle: TimerHandle) -> bool;
}

impl<M, S: Scheduler<M> + ?Sized> Scheduler<M> for &S {
    fn schedule(&self, delay: Duration, msg: M) -> TimerHandle {
        (**self).schedule(delay, msg)
    }

    fn cancel(&self, handle: TimerHandle) -> bool {
        (**self).cancel(handle)
    }
}

impl<M, S: Scheduler<M> + ?Sized> Scheduler<M> for Rc<S> {
    fn schedule(&self, delay: Duration, msg: M) -> TimerHandle {
        (**self).schedule(delay, msg)
    }

    fn cancel(&self, handle: TimerHandle) -> bool {
        (**self).cancel(handle)
    }
}

impl<M, S: Scheduler<M> + ?Sized> Scheduler<M> for Arc<S> {
    fn schedule(&self, delay: Duration, msg: M) -> TimerHandle {
        (**self).schedule(delay, msg)
    }

    fn cancel(&self, handle: TimerHandle) -> bool {
        (**self).cancel(handle)
    }
}

// ---------------------------------------------------------------------------
// ManualScheduler
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct ManualInner<M> {
    now: Duration,
    next_id: u64,
    /// Pending timers ordered by (deadline, id) so equal deadlines fire in
    /// scheduling order.
    pending: BTreeMap<(Duration, u64), M>,
}

/// Deterministic scheduler driven by explicit time advancement.
///
/// Cloning yields another handle onto the same timer queue, so several
/// engines can share one clock.
///
/// ```rust
/// use kiosk_core::schedule::{ManualScheduler, Scheduler};
/// use std::time::Duration;
///
/// let sched = ManualScheduler::new();
/// let handle = sched.schedule(Duration::from_millis(300), "clear");
/// assert!(sched.advance(Duration::from_millis(299)).is_empty());
/// assert_eq!(sched.advance(Duration::from_millis(1)), vec![(handle, "clear")]);
/// ```
#[derive(Debug)]
pub struct ManualScheduler<M> {
    inner: Rc<RefCell<ManualInner<M>>>,
}

impl<M> Clone for ManualScheduler<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<M> Default for ManualScheduler<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> ManualScheduler<M> {
    /// Creates a scheduler with its clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ManualInner {
                now: Duration::ZERO,
                next_id: 1,
                pending: BTreeMap::new(),
            })),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Number of timers still pending.
    pub fn pending_count(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Whether `handle` is still pending.
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.inner
            .borrow()
            .pending
            .keys()
            .any(|&(_, id)| id == handle.id())
    }

    /// Moves the clock forward and returns every timer that came due, in
    /// deadline order.
    ///
    /// Fired timers are removed before they are returned, so routing them
    /// back into engines that schedule new timers is safe.
    pub fn advance(&self, by: Duration) -> Vec<(TimerHandle, M)> {
        let mut inner = self.inner.borrow_mut();
        inner.now = inner.now.saturating_add(by);
        let now = inner.now;

        let mut fired = Vec::new();
        while let Some(entry) = inner.pending.first_entry() {
            if entry.key().0 > now {
                break;
            }
            let ((_, id), msg) = entry.remove_entry();
            fired.push((TimerHandle(id), msg));
        }
        fired
    }
}

impl<M> Scheduler<M> for ManualScheduler<M> {
    fn schedule(&self, delay: Duration, msg: M) -> TimerHandle {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let deadline = inner.now.saturating_add(delay);
        inner.pending.insert((deadline, id), msg);
        crate::trace!(timer_id = id, delay_ms = delay.as_millis() as u64, "timer scheduled");
        TimerHandle(id)
    }

    fn cancel(&self, handle: TimerHandle) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.pending.len();
        inner.pending.retain(|&(_, id), _| id != handle.id());
        before != inner.pending.len()
    }
}
