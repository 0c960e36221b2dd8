#![forbid(unsafe_code)]

//! Pointer events as delivered to item groups.
//!
//! The host performs hit-testing and reports, for each pointer event, which
//! item it concerns and whether the pointer is geometrically inside that
//! item. Engines never see coordinates.

/// Phase of a pointer contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PointerEventKind {
    /// Contact started (finger down / button pressed).
    Down,
    /// Contact moved while held.
    Move,
    /// Contact ended (finger lifted / button released).
    Up,
}

/// A hit-tested pointer event for one item of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PointerEvent {
    /// Event phase.
    pub kind: PointerEventKind,
    /// Item the event concerns.
    pub index: usize,
    /// Whether the pointer lies within the item's bounds.
    pub inside: bool,
}

impl PointerEvent {
    /// A press starting on `index`.
    #[must_use]
    pub const fn down(index: usize) -> Self {
        Self {
            kind: PointerEventKind::Down,
            index,
            inside: true,
        }
    }

    /// A move for the gesture on `index`.
    #[must_use]
    pub const fn moved(index: usize, inside: bool) -> Self {
        Self {
            kind: PointerEventKind::Move,
            index,
            inside,
        }
    }

    /// A release for the gesture on `index`.
    #[must_use]
    pub const fn up(index: usize, inside: bool) -> Self {
        Self {
            kind: PointerEventKind::Up,
            index,
            inside,
        }
    }
}
