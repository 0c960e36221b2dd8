#![forbid(unsafe_code)]

//! Bounded slide navigator.
//!
//! [`SlideNav`] holds an ordered list of panels and a current position.
//! Navigation is clamped at both ends: a stray extra "next" on the last panel
//! or "previous" on the first is absorbed as a no-op. Replacing the panel list
//! always resets to the first panel, so a shorter list can never leave a stale
//! out-of-range index behind.

/// Navigator over an ordered sequence of panels.
///
/// Panels are opaque to the navigator; the host supplies whatever content
/// type it renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideNav<T> {
    panels: Vec<T>,
    current: Option<usize>,
}

/// Render state for navigation controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SlideNavSnapshot {
    /// Current panel index, `None` when there are no panels.
    pub current_index: Option<usize>,
    /// Number of panels.
    pub len: usize,
    /// Whether the "previous" control should be disabled.
    pub is_first: bool,
    /// Whether the "next" control should be disabled.
    pub is_last: bool,
}

impl<T> Default for SlideNav<T> {
    fn default() -> Self {
        Self {
            panels: Vec::new(),
            current: None,
        }
    }
}

impl<T> SlideNav<T> {
    /// Creates a navigator positioned on the first panel (if any).
    pub fn new(panels: Vec<T>) -> Self {
        let current = first_index(&panels);
        Self { panels, current }
    }

    /// Replaces the panel list and resets to the first panel.
    pub fn set_panels(&mut self, panels: Vec<T>) {
        crate::debug!(
            old_len = self.panels.len(),
            new_len = panels.len(),
            "slide panels replaced"
        );
        self.current = first_index(&panels);
        self.panels = panels;
    }

    /// Moves to the next panel. Returns `true` if the index changed.
    pub fn next(&mut self) -> bool {
        match self.current {
            Some(idx) if idx + 1 < self.panels.len() => {
                self.current = Some(idx + 1);
                true
            }
            _ => false,
        }
    }

    /// Moves to the previous panel. Returns `true` if the index changed.
    pub fn previous(&mut self) -> bool {
        match self.current {
            Some(idx) if idx > 0 => {
                self.current = Some(idx - 1);
                true
            }
            _ => false,
        }
    }

    /// Current panel index, `None` when empty.
    #[inline]
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The panel currently shown.
    pub fn current(&self) -> Option<&T> {
        self.current.and_then(|idx| self.panels.get(idx))
    }

    /// All panels, in order.
    pub fn panels(&self) -> &[T] {
        &self.panels
    }

    /// Number of panels.
    #[inline]
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    /// Whether there are no panels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Whether the navigator sits on the first panel.
    ///
    /// Also `true` with zero panels, so the host disables "previous".
    pub fn is_first(&self) -> bool {
        self.current.is_none_or(|idx| idx == 0)
    }

    /// Whether the navigator sits on the last panel.
    ///
    /// Also `true` with zero panels, so the host disables "next".
    pub fn is_last(&self) -> bool {
        self.current
            .is_none_or(|idx| idx + 1 >= self.panels.len())
    }

    /// Captures the current render state.
    pub fn snapshot(&self) -> SlideNavSnapshot {
        SlideNavSnapshot {
            current_index: self.current,
            len: self.panels.len(),
            is_first: self.is_first(),
            is_last: self.is_last(),
        }
    }
}

fn first_index<T>(panels: &[T]) -> Option<usize> {
    (!panels.is_empty()).then_some(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_positions_on_first() {
        let nav = SlideNav::new(vec!["a", "b", "c"]);
        assert_eq!(nav.current_index(), Some(0));
        assert_eq!(nav.current(), Some(&"a"));
        assert!(nav.is_first());
        assert!(!nav.is_last());
    }

    #[test]
    fn empty_has_no_index() {
        let nav: SlideNav<&str> = SlideNav::new(Vec::new());
        assert_eq!(nav.current_index(), None);
        assert_eq!(nav.current(), None);
        assert!(nav.is_first());
        assert!(nav.is_last());
    }

    #[test]
    fn single_panel_is_first_and_last() {
        let nav = SlideNav::new(vec![1]);
        assert!(nav.is_first());
        assert!(nav.is_last());
    }

    #[test]
    fn extra_next_is_absorbed() {
        let mut nav = SlideNav::new(vec!["a", "b", "c"]);
        assert!(nav.next());
        assert!(nav.next());
        assert!(!nav.next());
        assert_eq!(nav.current_index(), Some(2));
        assert!(nav.is_last());
    }

    #[test]
    fn previous_at_start_is_noop() {
        let mut nav = SlideNav::new(vec!["a", "b"]);
        assert!(!nav.previous());
        assert_eq!(nav.current_index(), Some(0));
    }

    #[test]
    fn next_then_previous() {
        let mut nav = SlideNav::new(vec!["a", "b", "c"]);
        nav.next();
        nav.next();
        assert!(nav.previous());
        assert_eq!(nav.current(), Some(&"b"));
    }

    #[test]
    fn navigation_on_empty_is_noop() {
        let mut nav: SlideNav<u8> = SlideNav::default();
        assert!(!nav.next());
        assert!(!nav.previous());
        assert_eq!(nav.current_index(), None);
    }

    #[test]
    fn set_panels_resets_to_first() {
        let mut nav = SlideNav::new(vec![1, 2, 3, 4, 5]);
        nav.next();
        nav.next();
        nav.next();
        nav.set_panels(vec![10, 20]);
        assert_eq!(nav.current_index(), Some(0));
        assert_eq!(nav.current(), Some(&10));
    }

    #[test]
    fn set_panels_resets_even_when_index_still_valid() {
        let mut nav = SlideNav::new(vec![1, 2, 3]);
        nav.next();
        nav.set_panels(vec![4, 5, 6]);
        assert_eq!(nav.current_index(), Some(0));
    }

    #[test]
    fn set_panels_empty_clears_index() {
        let mut nav = SlideNav::new(vec![1, 2]);
        nav.next();
        nav.set_panels(Vec::new());
        assert_eq!(nav.current_index(), None);
        assert!(nav.is_first() && nav.is_last());
    }

    #[test]
    fn snapshot_reports_controls() {
        let mut nav = SlideNav::new(vec!['x', 'y']);
        nav.next();
        assert_eq!(
            nav.snapshot(),
            SlideNavSnapshot {
                current_index: Some(1),
                len: 2,
                is_first: false,
                is_last: true,
            }
        );
    }
}
