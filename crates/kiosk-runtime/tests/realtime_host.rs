#![forbid(unsafe_code)]

//! End-to-end host runs on real worker-thread timers.

use kiosk_core::pointer::PointerEvent;
use kiosk_core::press_track::{Selected, SelectorConfig};
use kiosk_runtime::{EngineHost, HostConfig, HostMsg, HostTimer, RecvError, ThreadScheduler};
use std::time::{Duration, Instant};

fn fast_config() -> HostConfig {
    HostConfig {
        tick_interval: Duration::from_millis(20),
        selector: SelectorConfig {
            min_highlight: Duration::from_millis(40),
        },
    }
}

#[test]
fn countdown_runs_to_completion_on_worker_threads() {
    let (sched, inbox) = ThreadScheduler::<HostTimer>::new();
    let mut host = EngineHost::new(sched.clone(), fast_config(), 3, vec!["a"], 1).unwrap();
    host.start();

    let deadline = Instant::now() + Duration::from_secs(5);
    while !host.countdown().is_completed() {
        assert!(Instant::now() < deadline, "countdown did not finish");
        match inbox.recv_timeout(Duration::from_millis(500)) {
            Ok((handle, timer)) => {
                host.dispatch(HostMsg::Timer(handle, timer)).unwrap();
            }
            Err(RecvError::Timeout) => {}
            Err(RecvError::Disconnected) => panic!("scheduler disconnected"),
        }
    }

    assert_eq!(host.countdown().percent(), 100);
    assert!(!host.is_ticking());
    assert_eq!(sched.pending_count(), 0);
}

#[test]
fn highlight_clears_after_min_duration() {
    let (sched, inbox) = ThreadScheduler::<HostTimer>::new();
    let mut host: EngineHost<&str, _> =
        EngineHost::new(sched, fast_config(), 60, Vec::new(), 4).unwrap();

    host.dispatch(HostMsg::Pointer(PointerEvent::down(1))).unwrap();
    let started = Instant::now();
    let snap = host
        .dispatch(HostMsg::Pointer(PointerEvent::up(1, true)))
        .unwrap();
    assert_eq!(snap.selected, Some(Selected { index: 1 }));

    let (handle, timer) = inbox.recv_timeout(Duration::from_secs(2)).unwrap();
    assert!(started.elapsed() >= Duration::from_millis(40));
    let snap = host.dispatch(HostMsg::Timer(handle, timer)).unwrap();
    assert_eq!(snap.selector.active_index, None);
}

#[test]
fn rapid_reselect_keeps_one_pending_clear() {
    let (sched, inbox) = ThreadScheduler::<HostTimer>::new();
    let mut host: EngineHost<&str, _> =
        EngineHost::new(sched.clone(), fast_config(), 60, Vec::new(), 3).unwrap();

    for index in [0, 2] {
        host.dispatch(HostMsg::Pointer(PointerEvent::down(index))).unwrap();
        host.dispatch(HostMsg::Pointer(PointerEvent::up(index, true)))
            .unwrap();
    }
    assert_eq!(sched.pending_count(), 1);

    while host.selector().active_index().is_some() {
        let (handle, timer) = inbox.recv_timeout(Duration::from_secs(2)).unwrap();
        host.dispatch(HostMsg::Timer(handle, timer)).unwrap();
    }
    assert_eq!(host.selector().last_selected(), Some(2));
    assert_eq!(
        inbox.recv_timeout(Duration::from_millis(100)),
        Err(RecvError::Timeout)
    );
}
