//! Interactive trait for widgets that consume input
//!
//! The host routes key events to the focused widget and mouse events by
//! position. Widgets report back whether they consumed the event so
//! unhandled input can bubble up to global bindings.

use super::Component;
use crossterm::event::{KeyEvent, MouseEvent};

/// Result of handling an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// Event was consumed by the widget
    Yes,
    /// Event was not handled, should bubble up
    No,
}

impl Handled {
    pub fn was_handled(self) -> bool {
        self == Self::Yes
    }
}

/// Trait for widgets that handle input events
pub trait Interactive: Component {
    /// Handle a key event routed to this widget
    fn handle_key(&mut self, key: KeyEvent) -> Handled;

    /// Handle a mouse event. The host passes every widget the event;
    /// implementations check the coordinates against their own areas.
    fn handle_mouse(&mut self, mouse: MouseEvent) -> Handled {
        let _ = mouse;
        Handled::No
    }

    /// Whether this widget can receive focus
    fn focusable(&self) -> bool {
        true
    }

    /// Keybind hints shown in the footer while this widget is focused
    fn focus_hint(&self) -> Option<&'static str> {
        None
    }
}
