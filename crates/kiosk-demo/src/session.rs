#![forbid(unsafe_code)]

//! The scripted session: browse results, make a few selections, then let the
//! countdown run out.

use crate::cli::Opts;
use kiosk_core::KioskError;
use kiosk_core::countdown::CountdownSnapshot;
use kiosk_core::pointer::PointerEvent;
use kiosk_core::press_track::{Selected, SelectorSnapshot};
use kiosk_core::schedule::{ManualScheduler, Scheduler, TimerHandle};
use kiosk_core::slide_nav::SlideNavSnapshot;
use kiosk_runtime::{
    EngineHost, HostConfig, HostMsg, HostSnapshot, HostTimer, RecvError, ThreadScheduler,
    TimerInbox,
};
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Granularity of waits while the countdown runs.
const STEP: Duration = Duration::from_millis(100);

/// Errors that end a session.
#[derive(Debug)]
pub enum SessionError {
    /// An engine rejected a scripted input.
    Kiosk(KioskError),
    /// Writing output failed.
    Io(io::Error),
    /// Encoding a JSON record failed.
    Json(serde_json::Error),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kiosk(e) => write!(f, "engine error: {e}"),
            Self::Io(e) => write!(f, "output error: {e}"),
            Self::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Kiosk(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}

impl From<KioskError> for SessionError {
    fn from(e: KioskError) -> Self {
        Self::Kiosk(e)
    }
}

impl From<io::Error> for SessionError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// One scripted action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Dispatch a message to the host.
    Send(HostMsg),
    /// Let time pass, delivering any timers that fire.
    Wait(Duration),
    /// Wait until the countdown completes and no highlight clear is pending.
    Finish,
}

/// Source of fired timers for a session.
pub trait Driver {
    /// Blocks (or advances virtual time) for `by` and returns what fired.
    fn wait(&mut self, by: Duration) -> Vec<(TimerHandle, HostTimer)>;
}

impl Driver for ManualScheduler<HostTimer> {
    fn wait(&mut self, by: Duration) -> Vec<(TimerHandle, HostTimer)> {
        self.advance(by)
    }
}

/// Real-time driver reading from a [`ThreadScheduler`] inbox.
#[derive(Debug)]
pub struct Realtime(pub TimerInbox<HostTimer>);

impl Driver for Realtime {
    fn wait(&mut self, by: Duration) -> Vec<(TimerHandle, HostTimer)> {
        let deadline = Instant::now() + by;
        let mut fired = Vec::new();
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                break;
            }
            match self.0.recv_timeout(left) {
                Ok(item) => fired.push(item),
                Err(RecvError::Timeout) | Err(RecvError::Disconnected) => break,
            }
        }
        fired
    }
}

/// The fixed script for a group of `items` selectable entries.
pub fn script(items: usize) -> Vec<Step> {
    let last = items.saturating_sub(1);
    let a = 1.min(last);
    let b = 2.min(last);
    let pointer = |event| Step::Send(HostMsg::Pointer(event));
    vec![
        Step::Send(HostMsg::NextPanel),
        Step::Send(HostMsg::NextPanel),
        Step::Send(HostMsg::NextPanel),
        Step::Send(HostMsg::PreviousPanel),
        pointer(PointerEvent::down(a)),
        pointer(PointerEvent::up(a, true)),
        Step::Wait(Duration::from_millis(150)),
        pointer(PointerEvent::down(b)),
        pointer(PointerEvent::moved(b, false)),
        pointer(PointerEvent::up(b, false)),
        Step::Wait(Duration::from_millis(400)),
        pointer(PointerEvent::down(0)),
        pointer(PointerEvent::up(0, true)),
        Step::Finish,
    ]
}

/// One output record.
#[derive(Debug, Serialize)]
struct Record<'a> {
    event: &'a str,
    countdown: &'a CountdownSnapshot,
    slides: &'a SlideNavSnapshot,
    selector: &'a SelectorSnapshot,
    selected: Option<Selected>,
}

struct Printer<W> {
    out: W,
    json: bool,
}

impl<W: Write> Printer<W> {
    fn emit(&mut self, event: &str, snap: &HostSnapshot) -> Result<(), SessionError> {
        if self.json {
            let record = Record {
                event,
                countdown: &snap.countdown,
                slides: &snap.slides,
                selector: &snap.selector,
                selected: snap.selected,
            };
            serde_json::to_writer(&mut self.out, &record)?;
            writeln!(self.out)?;
        } else {
            writeln!(self.out, "{}", render_line(event, snap))?;
        }
        Ok(())
    }
}

/// Human-readable form of one event.
pub fn render_line(event: &str, snap: &HostSnapshot) -> String {
    let panel = match snap.slides.current_index {
        Some(i) => format!("{}/{}", i + 1, snap.slides.len),
        None => "-".to_string(),
    };
    let active = snap
        .selector
        .active_index
        .map_or_else(|| "-".to_string(), |i| i.to_string());
    let mut line = format!(
        "{event:<10} {} {:>3}% panel {panel} active {active}",
        snap.countdown.remaining_label, snap.countdown.percent
    );
    if let Some(sel) = snap.selected {
        line.push_str(&format!(" selected {}", sel.index));
    }
    line
}

fn label(msg: &HostMsg) -> &'static str {
    match msg {
        HostMsg::NextPanel => "next",
        HostMsg::PreviousPanel => "previous",
        HostMsg::Pointer(e) => match e.kind {
            kiosk_core::pointer::PointerEventKind::Down => "down",
            kiosk_core::pointer::PointerEventKind::Move => "move",
            kiosk_core::pointer::PointerEventKind::Up => "up",
        },
        HostMsg::Timer(_, HostTimer::Tick) => "tick",
        HostMsg::Timer(_, HostTimer::Clear(_)) => "clear",
    }
}

fn panels(count: usize) -> Vec<String> {
    (1..=count).map(|n| format!("Result panel {n}")).collect()
}

/// Runs `steps` against `host`, writing one line per dispatched message.
pub fn run_script<P, S, D, W>(
    host: &mut EngineHost<P, S>,
    driver: &mut D,
    steps: &[Step],
    out: W,
    json: bool,
) -> Result<HostSnapshot, SessionError>
where
    S: Scheduler<HostTimer> + Clone,
    D: Driver,
    W: Write,
{
    let mut printer = Printer { out, json };
    let mut last = host.snapshot(None);
    printer.emit("start", &last)?;
    host.start();

    let deliver = |host: &mut EngineHost<P, S>,
                       printer: &mut Printer<W>,
                       fired: Vec<(TimerHandle, HostTimer)>|
     -> Result<Option<HostSnapshot>, SessionError> {
        let mut snap = None;
        for (handle, timer) in fired {
            let msg = HostMsg::Timer(handle, timer);
            let next = host.dispatch(msg)?;
            printer.emit(label(&msg), &next)?;
            snap = Some(next);
        }
        Ok(snap)
    };

    for step in steps {
        match *step {
            Step::Send(msg) => {
                last = host.dispatch(msg)?;
                printer.emit(label(&msg), &last)?;
            }
            Step::Wait(by) => {
                if let Some(snap) = deliver(host, &mut printer, driver.wait(by))? {
                    last = snap;
                }
            }
            Step::Finish => {
                while !host.countdown().is_completed()
                    || host.selector().pending_clear().is_some()
                {
                    if let Some(snap) = deliver(host, &mut printer, driver.wait(STEP))? {
                        last = snap;
                    }
                }
            }
        }
    }
    printer.out.flush()?;
    Ok(last)
}

/// Runs the scripted session on virtual time.
pub fn run_simulated<W: Write>(opts: &Opts, out: W) -> Result<HostSnapshot, SessionError> {
    let mut sched = ManualScheduler::<HostTimer>::new();
    let mut host = EngineHost::new(
        sched.clone(),
        HostConfig::default(),
        opts.duration,
        panels(opts.panels),
        opts.items,
    )?;
    tracing::info!(duration = opts.duration, "simulated session starting");
    run_script(&mut host, &mut sched, &script(opts.items), out, opts.json)
}

/// Runs the scripted session on worker-thread timers.
pub fn run_realtime<W: Write>(opts: &Opts, out: W) -> Result<HostSnapshot, SessionError> {
    let (sched, inbox) = ThreadScheduler::<HostTimer>::new();
    let mut host = EngineHost::new(
        sched,
        HostConfig::default(),
        opts.duration,
        panels(opts.panels),
        opts.items,
    )?;
    tracing::info!(duration = opts.duration, "realtime session starting");
    run_script(&mut host, &mut Realtime(inbox), &script(opts.items), out, opts.json)
}
