#![forbid(unsafe_code)]

//! Press–drag–release selection tracking for a group of items.
//!
//! Models "tap an item, see it highlight, and keep the highlight briefly after
//! release" for a touchscreen group of `N` items.
//!
//! # State machine
//!
//! ```text
//! Idle ──down(i)──▶ Pressing(i) ──move(i, outside)──▶ MovedOut(i)
//!                      ▲   │                              │
//!                      │   └──────── up(i, _) ──┐         │
//!                      └── move(i, inside) ─────┼─────────┘
//!                                               ▼
//!                                  Idle (+ deferred clear of i)
//! ```
//!
//! # Invariants
//!
//! 1. At most one item is active (highlighted) at a time.
//! 2. At most one deferred clear is outstanding; a new press cancels it.
//! 3. A selection is emitted iff the gesture's release happens over the item
//!    the gesture began on.
//! 4. A gesture is scoped to the item it began on: move/up events naming a
//!    different item, or arriving with no gesture in progress, are ignored.
//! 5. A deferred clear only clears the highlight if it still belongs to the
//!    item the clear was scheduled for.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Fallback |
//! |---------|-------|----------|
//! | Index out of range | Host hit-test bug | `InvalidIndex`, no state change |
//! | Stale timer delivered | Timer fired after cancel/replace | Ignored |
//! | Release never delivered | Contact lost | Next press starts a new gesture |

use crate::debounce::{ClearDue, DebouncedClear};
use crate::error::{KioskError, Result};
use crate::pointer::{PointerEvent, PointerEventKind};
use crate::schedule::{Scheduler, TimerHandle};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Default minimum time a released item stays highlighted.
pub const DEFAULT_MIN_HIGHLIGHT: Duration = Duration::from_millis(330);

/// Configuration for a selection group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Minimum highlight duration after release.
    /// Default: 330ms
    pub min_highlight: Duration,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            min_highlight: DEFAULT_MIN_HIGHLIGHT,
        }
    }
}

// ---------------------------------------------------------------------------
// Gesture state
// ---------------------------------------------------------------------------

/// Phase of the gesture currently tracked by the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum GesturePhase {
    /// No contact in progress.
    Idle,
    /// Contact held over the item it began on.
    Pressing(usize),
    /// Contact held but moved off the item it began on.
    MovedOut(usize),
}

impl GesturePhase {
    fn item(self) -> Option<usize> {
        match self {
            Self::Idle => None,
            Self::Pressing(i) | Self::MovedOut(i) => Some(i),
        }
    }
}

/// Notification that an item was picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Selected {
    /// The picked item.
    pub index: usize,
}

/// Render state read back by the host after each event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SelectorSnapshot {
    /// Highlighted item, if any.
    pub active_index: Option<usize>,
    /// Current gesture phase.
    pub phase: GesturePhase,
    /// Whether a deferred clear is outstanding.
    pub clear_pending: bool,
    /// Most recently selected item.
    pub last_selected: Option<usize>,
}

// ---------------------------------------------------------------------------
// PressTrackSelector
// ---------------------------------------------------------------------------

/// Selection tracker for a fixed-size group of items.
///
/// `S` schedules the deferred highlight clear; when it fires the host passes
/// the handle to [`on_timer`](Self::on_timer). `M` is the host's timer
/// message type.
///
/// ```rust
/// use kiosk_core::press_track::{PressTrackSelector, Selected};
/// use kiosk_core::schedule::ManualScheduler;
/// use std::time::Duration;
///
/// let sched = ManualScheduler::new();
/// let mut group: PressTrackSelector<_> = PressTrackSelector::new(3, sched.clone());
///
/// group.on_press_down(1).unwrap();
/// assert_eq!(group.active_index(), Some(1));
/// assert_eq!(group.on_press_up(1, true).unwrap(), Some(Selected { index: 1 }));
///
/// // Highlight survives the release until the minimum duration elapses.
/// assert_eq!(group.active_index(), Some(1));
/// for (handle, _) in sched.advance(Duration::from_millis(330)) {
///     group.on_timer(handle);
/// }
/// assert_eq!(group.active_index(), None);
/// ```
#[derive(Debug)]
pub struct PressTrackSelector<S, M = ClearDue<usize>>
where
    S: Scheduler<M>,
{
    len: usize,
    active: Option<usize>,
    phase: GesturePhase,
    last_selected: Option<usize>,
    clear: DebouncedClear<usize, S, M>,
}

impl<S, M> PressTrackSelector<S, M>
where
    S: Scheduler<M>,
    M: From<ClearDue<usize>>,
{
    /// Creates a group of `len` items with the default configuration.
    pub fn new(len: usize, scheduler: S) -> Self {
        Self::with_config(len, scheduler, SelectorConfig::default())
    }

    /// Creates a group of `len` items.
    pub fn with_config(len: usize, scheduler: S, config: SelectorConfig) -> Self {
        Self {
            len,
            active: None,
            phase: GesturePhase::Idle,
            last_selected: None,
            clear: DebouncedClear::new(scheduler, config.min_highlight),
        }
    }

    /// Number of items in the group.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the group has no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Highlighted item, if any.
    #[inline]
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Current gesture phase.
    #[inline]
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// Most recently selected item.
    #[inline]
    pub fn last_selected(&self) -> Option<usize> {
        self.last_selected
    }

    /// Handle of the outstanding deferred clear, if any.
    pub fn pending_clear(&self) -> Option<TimerHandle> {
        self.clear.pending_handle()
    }

    /// Contact started on item `index`.
    ///
    /// Cancels any outstanding deferred clear and highlights `index`. A press
    /// always starts a new gesture, abandoning one whose release was lost.
    ///
    /// # Errors
    ///
    /// Returns [`KioskError::InvalidIndex`] if `index >= len`.
    pub fn on_press_down(&mut self, index: usize) -> Result<()> {
        self.check(index)?;
        if self.clear.cancel() {
            crate::trace!(index, "pending clear cancelled by new press");
        }
        self.active = Some(index);
        self.phase = GesturePhase::Pressing(index);
        Ok(())
    }

    /// Contact moved during the gesture on item `index`.
    ///
    /// Moving off the item drops the highlight immediately without resolving
    /// the gesture; moving back on restores it.
    ///
    /// # Errors
    ///
    /// Returns [`KioskError::InvalidIndex`] if `index >= len`.
    pub fn on_press_move(&mut self, index: usize, inside: bool) -> Result<()> {
        self.check(index)?;
        if !self.owns_gesture(index) {
            return Ok(());
        }
        if inside {
            if self.active != Some(index) {
                self.active = Some(index);
            }
            self.phase = GesturePhase::Pressing(index);
        } else {
            if self.active == Some(index) {
                self.active = None;
            }
            self.phase = GesturePhase::MovedOut(index);
        }
        Ok(())
    }

    /// Contact ended for the gesture on item `index`.
    ///
    /// Returns the selection when the release happened inside the item. In
    /// every case a deferred clear of `index` is scheduled, replacing any
    /// clear already pending.
    ///
    /// # Errors
    ///
    /// Returns [`KioskError::InvalidIndex`] if `index >= len`.
    pub fn on_press_up(&mut self, index: usize, inside: bool) -> Result<Option<Selected>> {
        self.check(index)?;
        if !self.owns_gesture(index) {
            return Ok(None);
        }
        self.phase = GesturePhase::Idle;
        self.clear.schedule(index);

        if inside {
            self.last_selected = Some(index);
            crate::debug!(index, "item selected");
            Ok(Some(Selected { index }))
        } else {
            crate::trace!(index, "release outside item, no selection");
            Ok(None)
        }
    }

    /// Routes a hit-tested pointer event to the matching transition.
    ///
    /// # Errors
    ///
    /// Returns [`KioskError::InvalidIndex`] if `event.index >= len`.
    pub fn handle(&mut self, event: PointerEvent) -> Result<Option<Selected>> {
        let _span = crate::debug_span!("pointer_event", kind = ?event.kind, index = event.index)
            .entered();
        match event.kind {
            PointerEventKind::Down => self.on_press_down(event.index).map(|()| None),
            PointerEventKind::Move => self
                .on_press_move(event.index, event.inside)
                .map(|()| None),
            PointerEventKind::Up => self.on_press_up(event.index, event.inside),
        }
    }

    /// A scheduled timer fired.
    ///
    /// Returns `true` if this cleared the highlight. Handles that are stale,
    /// or whose item is no longer the active one, change nothing.
    pub fn on_timer(&mut self, handle: TimerHandle) -> bool {
        match self.clear.fire(handle) {
            Some(index) if self.active == Some(index) => {
                self.active = None;
                crate::trace!(index, "highlight cleared");
                true
            }
            _ => false,
        }
    }

    /// Captures the current render state.
    pub fn snapshot(&self) -> SelectorSnapshot {
        SelectorSnapshot {
            active_index: self.active,
            phase: self.phase,
            clear_pending: self.clear.pending_key().is_some(),
            last_selected: self.last_selected,
        }
    }

    fn check(&self, index: usize) -> Result<()> {
        if index < self.len {
            Ok(())
        } else {
            crate::warn!(index, len = self.len, "pointer event for unknown item");
            Err(KioskError::InvalidIndex {
                index,
                len: self.len,
            })
        }
    }

    fn owns_gesture(&self, index: usize) -> bool {
        self.phase.item() == Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ManualScheduler;

    type Group = PressTrackSelector<ManualScheduler<ClearDue<usize>>>;

    fn group(len: usize) -> (Group, ManualScheduler<ClearDue<usize>>) {
        let sched = ManualScheduler::new();
        (PressTrackSelector::new(len, sched.clone()), sched)
    }

    fn run_timers(group: &mut Group, sched: &ManualScheduler<ClearDue<usize>>, by: Duration) {
        for (handle, _) in sched.advance(by) {
            group.on_timer(handle);
        }
    }

    #[test]
    fn starts_idle() {
        let (group, _) = group(3);
        assert_eq!(group.active_index(), None);
        assert_eq!(group.phase(), GesturePhase::Idle);
        assert_eq!(group.pending_clear(), None);
    }

    #[test]
    fn tap_selects_and_clears_after_min_highlight() {
        let (mut group, sched) = group(3);
        group.on_press_down(1).unwrap();
        assert_eq!(group.on_press_up(1, true).unwrap(), Some(Selected { index: 1 }));
        assert_eq!(group.active_index(), Some(1));
        assert!(group.pending_clear().is_some());

        run_timers(&mut group, &sched, Duration::from_millis(329));
        assert_eq!(group.active_index(), Some(1));
        run_timers(&mut group, &sched, Duration::from_millis(1));
        assert_eq!(group.active_index(), None);
        assert_eq!(group.last_selected(), Some(1));
    }

    #[test]
    fn move_out_then_release_emits_nothing() {
        let (mut group, _) = group(2);
        group.on_press_down(0).unwrap();
        group.on_press_move(0, false).unwrap();
        assert_eq!(group.active_index(), None);
        assert_eq!(group.phase(), GesturePhase::MovedOut(0));
        assert_eq!(group.on_press_up(0, false).unwrap(), None);
        assert_eq!(group.active_index(), None);
        assert_eq!(group.last_selected(), None);
    }

    #[test]
    fn move_back_in_restores_highlight() {
        let (mut group, _) = group(2);
        group.on_press_down(1).unwrap();
        group.on_press_move(1, false).unwrap();
        group.on_press_move(1, true).unwrap();
        assert_eq!(group.active_index(), Some(1));
        assert_eq!(group.phase(), GesturePhase::Pressing(1));
        assert_eq!(group.on_press_up(1, true).unwrap(), Some(Selected { index: 1 }));
    }

    #[test]
    fn new_press_cancels_pending_clear() {
        let (mut group, sched) = group(3);
        group.on_press_down(1).unwrap();
        group.on_press_up(1, true).unwrap();
        let stale = group.pending_clear().unwrap();

        run_timers(&mut group, &sched, Duration::from_millis(100));
        group.on_press_down(2).unwrap();
        assert_eq!(group.active_index(), Some(2));
        assert!(!sched.is_pending(stale));

        run_timers(&mut group, &sched, Duration::from_secs(5));
        assert_eq!(group.active_index(), Some(2));
    }

    #[test]
    fn stale_timer_cannot_clear_new_highlight() {
        let (mut group, _) = group(3);
        group.on_press_down(1).unwrap();
        group.on_press_up(1, true).unwrap();
        let stale = group.pending_clear().unwrap();
        group.on_press_down(2).unwrap();

        // Delivered anyway, as a racing real-time timer might be.
        assert!(!group.on_timer(stale));
        assert_eq!(group.active_index(), Some(2));
    }

    #[test]
    fn clear_does_not_touch_other_item() {
        let (mut group, sched) = group(3);
        group.on_press_down(0).unwrap();
        group.on_press_move(0, false).unwrap();
        group.on_press_up(0, false).unwrap();
        assert_eq!(group.active_index(), None);
        run_timers(&mut group, &sched, DEFAULT_MIN_HIGHLIGHT);
        assert_eq!(group.active_index(), None);
        assert_eq!(group.pending_clear(), None);
    }

    #[test]
    fn events_for_other_items_are_ignored() {
        let (mut group, _) = group(3);
        group.on_press_down(0).unwrap();
        group.on_press_move(1, true).unwrap();
        assert_eq!(group.active_index(), Some(0));
        assert_eq!(group.on_press_up(1, true).unwrap(), None);
        assert_eq!(group.phase(), GesturePhase::Pressing(0));
    }

    #[test]
    fn events_without_gesture_are_ignored() {
        let (mut group, _) = group(3);
        group.on_press_move(2, true).unwrap();
        assert_eq!(group.active_index(), None);
        assert_eq!(group.on_press_up(2, true).unwrap(), None);
        assert_eq!(group.pending_clear(), None);
    }

    #[test]
    fn second_release_is_ignored() {
        let (mut group, _) = group(2);
        group.on_press_down(0).unwrap();
        assert!(group.on_press_up(0, true).unwrap().is_some());
        assert_eq!(group.on_press_up(0, true).unwrap(), None);
    }

    #[test]
    fn out_of_range_index_rejected() {
        let (mut group, _) = group(2);
        let err = KioskError::InvalidIndex { index: 2, len: 2 };
        assert_eq!(group.on_press_down(2), Err(err));
        assert_eq!(group.on_press_move(2, true), Err(err));
        assert_eq!(group.on_press_up(2, true), Err(err));
        assert_eq!(group.active_index(), None);
    }

    #[test]
    fn empty_group_rejects_everything() {
        let (mut group, _) = group(0);
        assert!(group.is_empty());
        assert!(group.on_press_down(0).is_err());
    }

    #[test]
    fn handle_dispatches_events() {
        let (mut group, _) = group(4);
        assert_eq!(group.handle(PointerEvent::down(3)).unwrap(), None);
        assert_eq!(group.handle(PointerEvent::moved(3, true)).unwrap(), None);
        assert_eq!(
            group.handle(PointerEvent::up(3, true)).unwrap(),
            Some(Selected { index: 3 })
        );
    }

    #[test]
    fn custom_min_highlight() {
        let sched = ManualScheduler::new();
        let config = SelectorConfig {
            min_highlight: Duration::from_millis(50),
        };
        let mut group: Group = PressTrackSelector::with_config(1, sched.clone(), config);
        group.on_press_down(0).unwrap();
        group.on_press_up(0, true).unwrap();
        run_timers(&mut group, &sched, Duration::from_millis(50));
        assert_eq!(group.active_index(), None);
    }

    #[test]
    fn drop_cancels_pending_clear() {
        let sched = ManualScheduler::new();
        {
            let mut group: Group = PressTrackSelector::new(2, sched.clone());
            group.on_press_down(1).unwrap();
            group.on_press_up(1, true).unwrap();
            assert_eq!(sched.pending_count(), 1);
        }
        assert_eq!(sched.pending_count(), 0);
    }

    #[test]
    fn snapshot_tracks_state() {
        let (mut group, _) = group(2);
        group.on_press_down(1).unwrap();
        group.on_press_up(1, true).unwrap();
        assert_eq!(
            group.snapshot(),
            SelectorSnapshot {
                active_index: Some(1),
                phase: GesturePhase::Idle,
                clear_pending: true,
                last_selected: Some(1),
            }
        );
    }
}
