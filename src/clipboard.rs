//! Clipboard plumbing for the copy button
//!
//! Backed by `arboard` for cross-platform coverage. A fresh handle is opened
//! per copy so nothing holds the clipboard between presses.

use anyhow::{Context, Result};
use arboard::Clipboard;

/// Place text onto the system clipboard.
///
/// Errors surface when no clipboard is reachable, e.g. headless Linux
/// without a display server. The copy button treats that as a non-event:
/// no confirmation is shown and the press is logged at debug level.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut handle = Clipboard::new().context("Failed to open system clipboard")?;
    handle
        .set_text(text)
        .context("Failed to write clipboard text")?;
    Ok(())
}
