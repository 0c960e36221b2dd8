#![forbid(unsafe_code)]

//! Real-time one-shot timers.
//!
//! [`ThreadScheduler`] implements the core `Scheduler` capability with one
//! worker thread per pending timer. Each worker waits on a condition-variable
//! stop signal; if the delay elapses first it delivers `(handle, message)` to
//! the paired [`TimerInbox`], which the UI loop drains.
//!
//! # Invariants
//!
//! - A timer delivers at most once.
//! - A timer whose `cancel` returned `true` never delivers: the worker and
//!   `cancel` race for the same registry entry and only the winner acts.
//! - Dropping the last scheduler handle stops every pending worker.

use kiosk_core::schedule::{Scheduler, TimerHandle};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, Weak, mpsc};
use std::thread;
use std::time::{Duration, Instant};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// Stop signal
// ---------------------------------------------------------------------------

/// Signal a timer worker waits on.
#[derive(Clone)]
struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    /// Create a new stop signal pair (signal, trigger).
    fn new() -> (Self, StopTrigger) {
        let inner = Arc::new((Mutex::new(false), Condvar::new()));
        let signal = Self {
            inner: inner.clone(),
        };
        let trigger = StopTrigger { inner };
        (signal, trigger)
    }

    /// Wait for either the stop signal or a timeout.
    ///
    /// Returns `true` if stopped, `false` if timed out. Loops over spurious
    /// wakeups until one of the two actually happened.
    fn wait_timeout(&self, duration: Duration) -> bool {
        let (mutex, cvar) = &*self.inner;
        let mut stopped = lock(mutex);
        if *stopped {
            return true;
        }

        let start = Instant::now();
        let mut remaining = duration;

        loop {
            let (guard, result) = cvar
                .wait_timeout(stopped, remaining)
                .unwrap_or_else(PoisonError::into_inner);
            stopped = guard;
            if *stopped {
                return true;
            }
            if result.timed_out() {
                return false;
            }
            let elapsed = start.elapsed();
            if elapsed >= duration {
                return false;
            }
            remaining = duration - elapsed;
        }
    }
}

/// Trigger to stop a timer worker from the scheduler side.
struct StopTrigger {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopTrigger {
    fn stop(&self) {
        let (mutex, cvar) = &*self.inner;
        *lock(mutex) = true;
        cvar.notify_all();
    }
}

// ---------------------------------------------------------------------------
// ThreadScheduler
// ---------------------------------------------------------------------------

struct Shared<M> {
    next_id: AtomicU64,
    pending: Mutex<HashMap<u64, StopTrigger>>,
    sender: Mutex<mpsc::Sender<(TimerHandle, M)>>,
}

impl<M> Drop for Shared<M> {
    fn drop(&mut self) {
        let pending = std::mem::take(&mut *lock(&self.pending));
        if !pending.is_empty() {
            tracing::debug!(count = pending.len(), "stopping pending timers");
        }
        for trigger in pending.into_values() {
            trigger.stop();
        }
    }
}

/// Scheduler backed by one worker thread per pending timer.
///
/// Cloning yields another handle onto the same timer registry.
pub struct ThreadScheduler<M: Send + 'static> {
    shared: Arc<Shared<M>>,
}

impl<M: Send + 'static> Clone for ThreadScheduler<M> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<M: Send + 'static> fmt::Debug for ThreadScheduler<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadScheduler")
            .field("pending", &self.pending_count())
            .finish()
    }
}

impl<M: Send + 'static> ThreadScheduler<M> {
    /// Creates a scheduler and the inbox its timers deliver to.
    pub fn new() -> (Self, TimerInbox<M>) {
        let (sender, receiver) = mpsc::channel();
        let shared = Arc::new(Shared {
            next_id: AtomicU64::new(1),
            pending: Mutex::new(HashMap::new()),
            sender: Mutex::new(sender),
        });
        (Self { shared }, TimerInbox { receiver })
    }

    /// Number of timers that have neither fired nor been cancelled.
    pub fn pending_count(&self) -> usize {
        lock(&self.shared.pending).len()
    }

    /// Whether `handle` is still pending.
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        lock(&self.shared.pending).contains_key(&handle.id())
    }

    /// Resolves a timer immediately, without waiting for its delay.
    fn deliver_now(&self, handle: TimerHandle, msg: M) {
        lock(&self.shared.pending).remove(&handle.id());
        if lock(&self.shared.sender).send((handle, msg)).is_err() {
            tracing::trace!(timer_id = handle.id(), "timer inbox closed");
        }
    }
}

impl<M: Send + 'static> Scheduler<M> for ThreadScheduler<M> {
    /// Schedules `msg` on a new worker thread.
    ///
    /// If the thread cannot be spawned the message is delivered to the inbox
    /// right away, so the returned handle always resolves.
    fn schedule(&self, delay: Duration, msg: M) -> TimerHandle {
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        let handle = TimerHandle::from_raw(id);
        let (signal, trigger) = StopSignal::new();
        let sender = lock(&self.shared.sender).clone();
        // The worker takes the message out; a failed spawn leaves it here.
        let slot = Arc::new(Mutex::new(Some(msg)));
        let worker_slot = Arc::clone(&slot);

        // Register before spawning so the worker always finds its entry.
        lock(&self.shared.pending).insert(id, trigger);

        let shared: Weak<Shared<M>> = Arc::downgrade(&self.shared);
        let spawned = thread::Builder::new()
            .name(format!("kiosk-timer-{id}"))
            .spawn(move || {
                if signal.wait_timeout(delay) {
                    return;
                }
                let Some(shared) = shared.upgrade() else {
                    return;
                };
                // Whoever removes the entry first wins the race with cancel.
                let won = lock(&shared.pending).remove(&id).is_some();
                drop(shared);
                let msg = lock(&worker_slot).take();
                if let (true, Some(msg)) = (won, msg)
                    && sender.send((handle, msg)).is_err()
                {
                    tracing::trace!(timer_id = id, "timer inbox closed");
                }
            });

        match spawned {
            Ok(_) => {
                tracing::trace!(
                    timer_id = id,
                    delay_ms = delay.as_millis() as u64,
                    "timer scheduled"
                );
            }
            Err(err) => {
                tracing::error!(timer_id = id, error = %err, "failed to spawn timer thread, delivering now");
                if let Some(msg) = lock(&slot).take() {
                    self.deliver_now(handle, msg);
                }
            }
        }
        handle
    }

    fn cancel(&self, handle: TimerHandle) -> bool {
        let removed = lock(&self.shared.pending).remove(&handle.id());
        match removed {
            Some(trigger) => {
                trigger.stop();
                tracing::trace!(timer_id = handle.id(), "timer cancelled");
                true
            }
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// TimerInbox
// ---------------------------------------------------------------------------

/// Errors from waiting on the inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecvError {
    /// Nothing fired within the wait.
    Timeout,
    /// Every scheduler handle and worker is gone; nothing can fire again.
    Disconnected,
}

impl fmt::Display for RecvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timed out waiting for a timer"),
            Self::Disconnected => write!(f, "timer scheduler disconnected"),
        }
    }
}

impl std::error::Error for RecvError {}

/// Receiving end for fired timers.
///
/// Owned by the UI loop; fired timers are handed back in firing order.
pub struct TimerInbox<M> {
    receiver: mpsc::Receiver<(TimerHandle, M)>,
}

impl<M> fmt::Debug for TimerInbox<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerInbox").finish_non_exhaustive()
    }
}

impl<M> TimerInbox<M> {
    /// Drain every timer that has fired so far, without blocking.
    pub fn drain(&self) -> Vec<(TimerHandle, M)> {
        self.receiver.try_iter().collect()
    }

    /// Block until a timer fires or `timeout` elapses.
    ///
    /// # Errors
    ///
    /// [`RecvError::Timeout`] if nothing fired in time,
    /// [`RecvError::Disconnected`] if nothing can fire anymore.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<(TimerHandle, M), RecvError> {
        self.receiver.recv_timeout(timeout).map_err(|err| match err {
            mpsc::RecvTimeoutError::Timeout => RecvError::Timeout,
            mpsc::RecvTimeoutError::Disconnected => RecvError::Disconnected,
        })
    }
}
