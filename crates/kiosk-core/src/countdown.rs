#![forbid(unsafe_code)]

//! Countdown / progress tracker.
//!
//! Provides a [`Countdown`] that counts whole-second ticks up to a fixed total
//! duration and derives the values a progress display needs: percent
//! complete and a `MM:SS` remaining-time label.
//!
//! The tracker owns no timer. The host ticks it at a 1-second cadence and
//! stops scheduling once [`Countdown::is_completed`] reports `true`; any tick
//! delivered after that is a no-op.
//!
//! # Example
//!
//! ```rust
//! use kiosk_core::countdown::Countdown;
//!
//! let mut countdown = Countdown::new(125).unwrap();
//! assert_eq!(countdown.remaining_label(), "02:05");
//!
//! assert!(countdown.tick());
//! assert_eq!(countdown.elapsed(), 1);
//! assert_eq!(countdown.percent(), 0);
//! ```

use crate::error::{KioskError, Result};
use std::time::Duration;

/// State for a countdown over a fixed number of seconds.
///
/// `0 <= elapsed <= total` always holds. Once `elapsed == total` the
/// countdown is completed and stays completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    total: u64,
    elapsed: u64,
}

/// Render state read back by the host after each tick.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CountdownSnapshot {
    /// Seconds elapsed so far.
    pub elapsed: u64,
    /// Total duration in seconds.
    pub total: u64,
    /// Percent complete, `0..=100`.
    pub percent: u8,
    /// Remaining time as `MM:SS`.
    pub remaining_label: String,
    /// Whether the countdown has reached its total.
    pub completed: bool,
}

impl Countdown {
    /// Creates a countdown of `total_seconds`, with nothing elapsed.
    ///
    /// # Errors
    ///
    /// Returns [`KioskError::InvalidDuration`] if `total_seconds <= 0`.
    pub fn new(total_seconds: i64) -> Result<Self> {
        if total_seconds <= 0 {
            return Err(KioskError::InvalidDuration {
                seconds: total_seconds,
            });
        }
        Ok(Self {
            total: total_seconds as u64,
            elapsed: 0,
        })
    }

    /// Creates a countdown from a [`Duration`], truncated to whole seconds.
    ///
    /// # Errors
    ///
    /// Returns [`KioskError::InvalidDuration`] if the duration is shorter
    /// than one second.
    pub fn from_duration(duration: Duration) -> Result<Self> {
        let seconds = i64::try_from(duration.as_secs()).unwrap_or(i64::MAX);
        Self::new(seconds)
    }

    /// Returns the total duration in seconds.
    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Returns the number of seconds elapsed.
    #[inline]
    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    /// Returns the number of seconds left.
    #[inline]
    pub fn remaining(&self) -> u64 {
        self.total.saturating_sub(self.elapsed)
    }

    /// Returns whether the countdown has reached its total.
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.elapsed >= self.total
    }

    /// Advances the countdown by one second.
    ///
    /// Returns `true` if the tick was applied, `false` if the countdown had
    /// already completed (in which case nothing changes).
    pub fn tick(&mut self) -> bool {
        if self.is_completed() {
            crate::trace!(total = self.total, "countdown tick ignored after completion");
            return false;
        }
        self.elapsed = (self.elapsed + 1).min(self.total);
        if self.is_completed() {
            crate::debug!(total = self.total, "countdown completed");
        }
        true
    }

    /// Returns `floor(100 * elapsed / total)`, clamped to 100.
    pub fn percent(&self) -> u8 {
        let ratio = u128::from(self.elapsed) * 100 / u128::from(self.total);
        ratio.min(100) as u8
    }

    /// Returns the remaining time as zero-padded `MM:SS`.
    ///
    /// Minutes are not wrapped at 60: 7500 seconds left reads `"125:00"`.
    pub fn remaining_label(&self) -> String {
        format_mm_ss(self.remaining())
    }

    /// Returns the caption shown above the progress bar.
    pub fn time_remaining_text(&self) -> String {
        format!("Time Remaining: {}", self.remaining_label())
    }

    /// Captures the current render state.
    pub fn snapshot(&self) -> CountdownSnapshot {
        CountdownSnapshot {
            elapsed: self.elapsed,
            total: self.total,
            percent: self.percent(),
            remaining_label: self.remaining_label(),
            completed: self.is_completed(),
        }
    }
}

/// Formats whole seconds as `MM:SS` with unbounded minutes.
pub fn format_mm_ss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
