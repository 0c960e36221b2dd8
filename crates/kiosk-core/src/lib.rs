#![forbid(unsafe_code)]

//! Core: interaction engines for the kiosk UI.
//!
//! Three small state machines live here, each independent of rendering:
//!
//! - [`countdown::Countdown`] tracks a timed operation (elapsed, percent,
//!   remaining-time text).
//! - [`slide_nav::SlideNav`] pages through an ordered list of panels.
//! - [`press_track::PressTrackSelector`] turns press/move/release pointer
//!   sequences into highlight state and "item selected" notifications.
//!
//! The selector needs a one-shot timer; hosts provide one through the
//! [`schedule::Scheduler`] trait. [`schedule::ManualScheduler`] is a
//! deterministic implementation driven by explicit time advancement.

pub mod carousel;
pub mod countdown;
pub mod debounce;
pub mod error;
pub mod logging;
pub mod pointer;
pub mod press_track;
pub mod schedule;
pub mod slide_nav;
pub mod stage_flow;

pub use error::{KioskError, Result};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, info, trace, warn};
