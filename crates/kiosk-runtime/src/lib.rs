#![forbid(unsafe_code)]

//! Kiosk Runtime
//!
//! Host-side plumbing for the engines in `kiosk-core`.
//!
//! # Key Components
//!
//! - [`ThreadScheduler`] - Real-time one-shot timers on worker threads
//! - [`TimerInbox`] - Receiving end for fired timers, drained by the UI loop
//! - [`EngineHost`] - Owns one instance of each engine and routes messages
//! - [`logging`] - Tracing subscriber installation from the environment
//!
//! # How it fits in the system
//! The engines never own a clock. The host schedules timers through a
//! `Scheduler`, receives `(handle, message)` pairs when they fire, and feeds
//! them back in on the UI thread, one at a time.

pub mod host;
pub mod logging;
pub mod timer;

pub use host::{EngineHost, HostConfig, HostMsg, HostSnapshot, HostTimer};
pub use timer::{RecvError, ThreadScheduler, TimerInbox};
