//! Copyable trait for widgets that provide clipboard content

use super::Component;

/// Trait for widgets that can hand content to the clipboard
///
/// The copy keybind and the on-screen copy button both route through
/// this: whatever `copy_text` returns is what lands on the clipboard.
pub trait Copyable: Component {
    /// Text for the clipboard, or `None` when the widget has nothing to offer
    fn copy_text(&self) -> Option<String>;

    /// Short description of what gets copied, for log lines
    fn copy_description(&self) -> String {
        format!("{:?}", self.id())
    }
}
