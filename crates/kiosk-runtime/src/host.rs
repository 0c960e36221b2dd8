#![forbid(unsafe_code)]

//! Engine host: one countdown, one slide navigator and one selection group
//! wired to a shared scheduler.
//!
//! The host owns the 1-second tick cadence for the countdown. It arms a
//! one-shot tick timer on [`start`](EngineHost::start), re-arms it after
//! every tick, and stops re-arming once the countdown completes. Timer
//! messages come back through [`dispatch`](EngineHost::dispatch) like any
//! other input, so the engines only ever see events one at a time.

use kiosk_core::countdown::{Countdown, CountdownSnapshot};
use kiosk_core::debounce::ClearDue;
use kiosk_core::pointer::PointerEvent;
use kiosk_core::press_track::{PressTrackSelector, Selected, SelectorConfig, SelectorSnapshot};
use kiosk_core::schedule::{Scheduler, TimerHandle};
use kiosk_core::slide_nav::{SlideNav, SlideNavSnapshot};
use std::time::Duration;

/// Configuration for an [`EngineHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostConfig {
    /// Countdown tick cadence.
    /// Default: 1s
    pub tick_interval: Duration,
    /// Selection group settings.
    pub selector: SelectorConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            selector: SelectorConfig::default(),
        }
    }
}

/// Timer messages the host schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostTimer {
    /// Countdown tick due.
    Tick,
    /// Selection highlight clear due.
    Clear(ClearDue<usize>),
}

impl From<ClearDue<usize>> for HostTimer {
    fn from(due: ClearDue<usize>) -> Self {
        Self::Clear(due)
    }
}

/// Input routed through [`EngineHost::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostMsg {
    /// Slide "next" control pressed.
    NextPanel,
    /// Slide "previous" control pressed.
    PreviousPanel,
    /// Hit-tested pointer event for the selection group.
    Pointer(PointerEvent),
    /// A scheduled timer fired.
    Timer(TimerHandle, HostTimer),
}

/// Everything the host renders after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSnapshot {
    /// Countdown display state.
    pub countdown: CountdownSnapshot,
    /// Slide navigation controls.
    pub slides: SlideNavSnapshot,
    /// Selection group highlight.
    pub selector: SelectorSnapshot,
    /// Selection produced by this event, if any.
    pub selected: Option<Selected>,
}

/// Owner of one engine of each kind.
pub struct EngineHost<P, S>
where
    S: Scheduler<HostTimer> + Clone,
{
    scheduler: S,
    config: HostConfig,
    countdown: Countdown,
    slides: SlideNav<P>,
    selector: PressTrackSelector<S, HostTimer>,
    tick: Option<TimerHandle>,
}

impl<P, S> EngineHost<P, S>
where
    S: Scheduler<HostTimer> + Clone,
{
    /// Creates a host for a countdown of `total_seconds`, the given panels,
    /// and a selection group of `items` entries.
    ///
    /// # Errors
    ///
    /// Returns [`KioskError::InvalidDuration`](kiosk_core::KioskError) if
    /// `total_seconds <= 0`.
    pub fn new(
        scheduler: S,
        config: HostConfig,
        total_seconds: i64,
        panels: Vec<P>,
        items: usize,
    ) -> kiosk_core::Result<Self> {
        let countdown = Countdown::new(total_seconds)?;
        let selector = PressTrackSelector::with_config(items, scheduler.clone(), config.selector);
        Ok(Self {
            scheduler,
            config,
            countdown,
            slides: SlideNav::new(panels),
            selector,
            tick: None,
        })
    }

    /// Arms the countdown tick. Does nothing if already running or completed.
    pub fn start(&mut self) {
        if self.tick.is_none() && !self.countdown.is_completed() {
            tracing::info!(total = self.countdown.total(), "countdown started");
            self.arm_tick();
        }
    }

    /// Whether a countdown tick is armed.
    pub fn is_ticking(&self) -> bool {
        self.tick.is_some()
    }

    /// The countdown.
    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    /// The slide navigator.
    pub fn slides(&self) -> &SlideNav<P> {
        &self.slides
    }

    /// Replaces the slide panels (resets to the first panel).
    pub fn set_panels(&mut self, panels: Vec<P>) {
        self.slides.set_panels(panels);
    }

    /// The selection group.
    pub fn selector(&self) -> &PressTrackSelector<S, HostTimer> {
        &self.selector
    }

    /// Routes one message to its engine and returns the new render state.
    ///
    /// # Errors
    ///
    /// Returns [`KioskError::InvalidIndex`](kiosk_core::KioskError) for a
    /// pointer event outside the selection group; nothing changes then.
    pub fn dispatch(&mut self, msg: HostMsg) -> kiosk_core::Result<HostSnapshot> {
        let mut selected = None;
        match msg {
            HostMsg::NextPanel => {
                self.slides.next();
            }
            HostMsg::PreviousPanel => {
                self.slides.previous();
            }
            HostMsg::Pointer(event) => {
                selected = self.selector.handle(event)?;
            }
            HostMsg::Timer(handle, HostTimer::Tick) => self.on_tick(handle),
            HostMsg::Timer(handle, HostTimer::Clear(_)) => {
                self.selector.on_timer(handle);
            }
        }
        Ok(self.snapshot(selected))
    }

    /// Current render state.
    pub fn snapshot(&self, selected: Option<Selected>) -> HostSnapshot {
        HostSnapshot {
            countdown: self.countdown.snapshot(),
            slides: self.slides.snapshot(),
            selector: self.selector.snapshot(),
            selected,
        }
    }

    fn on_tick(&mut self, handle: TimerHandle) {
        if self.tick != Some(handle) {
            tracing::trace!(timer_id = handle.id(), "stale tick ignored");
            return;
        }
        self.tick = None;
        self.countdown.tick();
        if self.countdown.is_completed() {
            tracing::info!(total = self.countdown.total(), "countdown finished");
        } else {
            self.arm_tick();
        }
    }

    fn arm_tick(&mut self) {
        let handle = self
            .scheduler
            .schedule(self.config.tick_interval, HostTimer::Tick);
        self.tick = Some(handle);
    }
}

impl<P, S> Drop for EngineHost<P, S>
where
    S: Scheduler<HostTimer> + Clone,
{
    fn drop(&mut self) {
        if let Some(handle) = self.tick.take() {
            self.scheduler.cancel(handle);
        }
    }
}
