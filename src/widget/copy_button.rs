// Copy button state for the block header
//
// The button flips to a confirmation label after a successful copy and
// flips back once its window has fully elapsed. Time is passed in by the
// caller so the render loop and tests share one clock.

use std::time::{Duration, Instant};

/// How long the confirmation label stays up
const CONFIRMATION_WINDOW: Duration = Duration::from_millis(2000);

/// Idle label, icon plus text
const IDLE_LABEL: &str = "⧉ Copy";
/// Shown after a successful copy
const CONFIRMED_LABEL: &str = "✓ Copied";

/// Two-state copy button: idle, or showing a timed confirmation
///
/// A press during a pending confirmation neither cancels nor extends the
/// window; the first deadline stands. A press after the revert opens a
/// fresh window.
#[derive(Debug, Clone)]
pub struct CopyButton {
    reverts_at: Option<Instant>,
    window: Duration,
}

impl CopyButton {
    pub fn new() -> Self {
        Self::with_window(CONFIRMATION_WINDOW)
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            reverts_at: None,
            window,
        }
    }

    /// Record a successful copy at `now`, arming the revert deadline
    /// unless one is already pending.
    pub fn confirm(&mut self, now: Instant) {
        if self.reverts_at.is_none() {
            self.reverts_at = Some(now + self.window);
        }
    }

    /// Label to draw at `now`. Crossing the deadline reverts the state,
    /// never before the full window has elapsed.
    pub fn label(&mut self, now: Instant) -> &'static str {
        match self.reverts_at {
            Some(deadline) if now < deadline => CONFIRMED_LABEL,
            Some(_) => {
                self.reverts_at = None;
                IDLE_LABEL
            }
            None => IDLE_LABEL,
        }
    }

    /// Drop any pending confirmation, e.g. when the block is deactivated
    pub fn reset(&mut self) {
        self.reverts_at = None;
    }
}

impl Default for CopyButton {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revert_at_window_not_before() {
        let t0 = Instant::now();
        let mut button = CopyButton::new();

        button.confirm(t0);
        assert_eq!(button.label(t0), CONFIRMED_LABEL);
        assert_eq!(
            button.label(t0 + Duration::from_millis(1999)),
            CONFIRMED_LABEL
        );
        assert_eq!(button.label(t0 + Duration::from_millis(2000)), IDLE_LABEL);
    }

    #[test]
    fn test_second_press_does_not_extend_window() {
        let t0 = Instant::now();
        let mut button = CopyButton::new();

        button.confirm(t0);
        button.confirm(t0 + Duration::from_millis(1500));
        assert_eq!(
            button.label(t0 + Duration::from_millis(1999)),
            CONFIRMED_LABEL
        );
        assert_eq!(button.label(t0 + Duration::from_millis(2000)), IDLE_LABEL);
    }

    #[test]
    fn test_fresh_window_after_revert() {
        let t0 = Instant::now();
        let mut button = CopyButton::new();

        button.confirm(t0);
        assert_eq!(button.label(t0 + Duration::from_millis(2500)), IDLE_LABEL);

        button.confirm(t0 + Duration::from_millis(3000));
        assert_eq!(
            button.label(t0 + Duration::from_millis(4999)),
            CONFIRMED_LABEL
        );
        assert_eq!(button.label(t0 + Duration::from_millis(5000)), IDLE_LABEL);
    }

    #[test]
    fn test_reset_clears_confirmation() {
        let t0 = Instant::now();
        let mut button = CopyButton::new();

        button.confirm(t0);
        button.reset();
        assert_eq!(button.label(t0 + Duration::from_millis(100)), IDLE_LABEL);
    }

    #[test]
    fn test_custom_window() {
        let t0 = Instant::now();
        let mut button = CopyButton::with_window(Duration::from_millis(500));

        button.confirm(t0);
        assert_eq!(
            button.label(t0 + Duration::from_millis(499)),
            CONFIRMED_LABEL
        );
        assert_eq!(button.label(t0 + Duration::from_millis(500)), IDLE_LABEL);
    }
}
