#![forbid(unsafe_code)]

//! Clamped horizontal scroll for a card carousel.
//!
//! Prev/next buttons scroll the carousel by a fixed pixel step. The position
//! is kept as a fraction in `[0, 1]` of the scrollable overflow, so it
//! survives resizes. When the content fits inside the viewport there is
//! nothing to scroll and the position pins to 0.

/// Scroll state for a carousel.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CarouselScroll {
    step_px: f32,
    content_px: f32,
    viewport_px: f32,
    position: f32,
}

impl CarouselScroll {
    /// Creates a carousel that scrolls `step_px` per button press.
    ///
    /// Negative steps are treated as their magnitude; non-finite steps as 0.
    pub fn new(step_px: f32) -> Self {
        Self {
            step_px: if step_px.is_finite() { step_px.abs() } else { 0.0 },
            content_px: 0.0,
            viewport_px: 0.0,
            position: 0.0,
        }
    }

    /// Updates content and viewport widths, re-clamping the position.
    pub fn set_extent(&mut self, content_px: f32, viewport_px: f32) {
        self.content_px = sanitize(content_px);
        self.viewport_px = sanitize(viewport_px);
        if self.max_scroll() <= 0.0 {
            self.position = 0.0;
        }
    }

    /// Scrollable overflow in pixels (may be zero or negative).
    pub fn max_scroll(&self) -> f32 {
        self.content_px - self.viewport_px
    }

    /// Fractional scroll position in `[0, 1]`.
    #[inline]
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Scrolls by `delta_px`, clamping to the ends.
    ///
    /// Ignored before the content has been measured or when `delta_px` is
    /// not finite.
    pub fn scroll_by(&mut self, delta_px: f32) {
        if self.content_px <= 0.0 || !delta_px.is_finite() {
            return;
        }
        let max_scroll = self.max_scroll();
        if max_scroll <= 0.0 {
            self.position = 0.0;
            return;
        }
        self.position = (self.position + delta_px / max_scroll).clamp(0.0, 1.0);
    }

    /// Scrolls one step towards the start.
    pub fn prev(&mut self) {
        self.scroll_by(-self.step_px);
    }

    /// Scrolls one step towards the end.
    pub fn next(&mut self) {
        self.scroll_by(self.step_px);
    }

    /// Whether the carousel shows its first card.
    pub fn at_start(&self) -> bool {
        self.position <= 0.0
    }

    /// Whether the carousel shows its last card (or everything fits).
    pub fn at_end(&self) -> bool {
        self.max_scroll() <= 0.0 || self.position >= 1.0
    }
}

fn sanitize(px: f32) -> f32 {
    if px.is_finite() { px.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carousel() -> CarouselScroll {
        let mut c = CarouselScroll::new(100.0);
        c.set_extent(600.0, 200.0);
        c
    }

    #[test]
    fn next_moves_by_step_fraction() {
        let mut c = carousel();
        c.next();
        assert!((c.position() - 0.25).abs() < f32::EPSILON);
        assert!(!c.at_start());
        assert!(!c.at_end());
    }

    #[test]
    fn clamps_at_end() {
        let mut c = carousel();
        for _ in 0..10 {
            c.next();
        }
        assert_eq!(c.position(), 1.0);
        assert!(c.at_end());
    }

    #[test]
    fn clamps_at_start() {
        let mut c = carousel();
        c.prev();
        assert_eq!(c.position(), 0.0);
        assert!(c.at_start());
    }

    #[test]
    fn content_that_fits_pins_to_zero() {
        let mut c = carousel();
        c.next();
        c.set_extent(150.0, 200.0);
        assert_eq!(c.position(), 0.0);
        c.next();
        assert_eq!(c.position(), 0.0);
        assert!(c.at_start() && c.at_end());
    }

    #[test]
    fn unmeasured_content_ignores_scroll() {
        let mut c = CarouselScroll::new(50.0);
        c.next();
        assert_eq!(c.position(), 0.0);
    }

    #[test]
    fn non_finite_input_ignored() {
        let mut c = carousel();
        c.scroll_by(f32::NAN);
        c.scroll_by(f32::INFINITY);
        assert_eq!(c.position(), 0.0);
        let weird = CarouselScroll::new(f32::NAN);
        assert_eq!(weird, CarouselScroll::new(0.0));
    }
}
