//! Core component trait - identity plus rendering
//!
//! Every renderable widget implements `Component`. Identity is a minted
//! id rather than a closed enum, so hosts can hold any number of widget
//! instances without a central registry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use ratatui::{layout::Rect, Frame};

/// Process-unique identifier for a widget instance
///
/// Used for focus tracking and event routing. Each widget mints its own
/// id at construction; two instances never share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId(u64);

impl WidgetId {
    /// Mint the next unused id
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Shared state passed to widgets during rendering
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    /// Which widget currently has focus, if any
    pub focus: Option<WidgetId>,
    /// Clock sample for this frame. Time-based state (button reverts)
    /// reads this so every widget in a frame agrees on "now".
    pub now: Instant,
}

impl RenderContext {
    pub fn new(focus: Option<WidgetId>) -> Self {
        Self {
            focus,
            now: Instant::now(),
        }
    }

    /// Check whether a widget is the focused one
    pub fn is_focused(&self, id: WidgetId) -> bool {
        self.focus == Some(id)
    }
}

/// Base trait for all widgets
///
/// Rendering takes `&mut self`: widgets settle time-based state at draw
/// time (scroll clamping against the current area, copy button reverts)
/// rather than running their own timers.
pub trait Component {
    /// Identifier for this widget instance
    fn id(&self) -> WidgetId;

    /// Render the widget into the given area
    fn render(&mut self, f: &mut Frame, area: Rect, ctx: &RenderContext);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = WidgetId::next();
        let b = WidgetId::next();
        assert_ne!(a, b);
    }
}
