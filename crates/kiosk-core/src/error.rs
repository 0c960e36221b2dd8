#![forbid(unsafe_code)]

//! Error types for engine construction and input validation.

use std::fmt;

/// Errors reported synchronously by the engines.
///
/// Only construction and input validation can fail. Redundant gestures,
/// navigation past either end, and ticks after completion are defined no-ops
/// and never surface here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KioskError {
    /// A countdown (or stage) was created with a non-positive duration.
    InvalidDuration {
        /// The rejected duration, in whole seconds.
        seconds: i64,
    },
    /// A selector received an item index outside `0..len`.
    InvalidIndex {
        /// The rejected index.
        index: usize,
        /// Number of items in the group.
        len: usize,
    },
}

impl fmt::Display for KioskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDuration { seconds } => {
                write!(f, "invalid duration: {seconds}s (must be at least 1s)")
            }
            Self::InvalidIndex { index, len } => {
                write!(f, "invalid item index {index} for group of {len}")
            }
        }
    }
}

impl std::error::Error for KioskError {}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, KioskError>;
