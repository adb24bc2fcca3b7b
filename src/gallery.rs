// Gallery - terminal lifecycle and event loop
//
// Stacks code blocks vertically with captions, routes input to the
// focused block, and keeps the footer showing key hints plus the
// latest log line. Handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard input, mouse input, timer ticks)
// - Block activation on entry and deactivation on exit

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use codepane::assets;
use codepane::traits::{Component, Handled, Interactive, RenderContext};
use codepane::CodeBlock;

use crate::logging::LogBuffer;

/// A captioned code block in the gallery
pub struct GalleryItem {
    pub caption: String,
    pub source: String,
    pub block: CodeBlock,
}

impl GalleryItem {
    pub fn new(caption: impl Into<String>, source: impl Into<String>, block: CodeBlock) -> Self {
        Self {
            caption: caption.into(),
            source: source.into(),
            block,
        }
    }
}

/// Gallery state: the item list, focus, and quit flag
struct Gallery {
    items: Vec<GalleryItem>,
    focused: usize,
    first_visible: usize,
    should_quit: bool,
    log_buffer: LogBuffer,
}

impl Gallery {
    fn new(items: Vec<GalleryItem>, log_buffer: LogBuffer) -> Self {
        Self {
            items,
            focused: 0,
            first_visible: 0,
            should_quit: false,
            log_buffer,
        }
    }

    /// Hand every block its source. Highlighting runs in the background,
    /// so blocks render as skeletons until their content lands.
    fn activate_all(&mut self) {
        for item in &mut self.items {
            item.block.activate(&item.source);
        }
    }

    fn deactivate_all(&mut self) {
        for item in &mut self.items {
            item.block.deactivate();
        }
    }

    fn focus_next(&mut self) {
        if !self.items.is_empty() {
            self.focused = (self.focused + 1) % self.items.len();
        }
    }

    fn focus_prev(&mut self) {
        if !self.items.is_empty() {
            self.focused = self.focused.checked_sub(1).unwrap_or(self.items.len() - 1);
        }
    }

    /// Focus the block under the cursor, if any
    fn focus_at(&mut self, x: u16, y: u16) {
        if let Some(idx) = self
            .items
            .iter()
            .position(|item| item.block.focusable() && item.block.hit(x, y))
        {
            self.focused = idx;
        }
    }

    fn dispatch_key(&mut self, key_event: KeyEvent) -> Handled {
        match self.items.get_mut(self.focused) {
            Some(item) => item.block.handle_key(key_event),
            None => Handled::No,
        }
    }

    /// Every block sees the event and checks its own screen areas
    fn dispatch_mouse(&mut self, mouse_event: MouseEvent) {
        for item in &mut self.items {
            let _ = item.block.handle_mouse(mouse_event);
        }
    }

    fn draw(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(2)])
            .split(f.area());

        self.draw_items(f, chunks[0]);
        self.draw_footer(f, chunks[1]);
    }

    /// Stack items top-down from `first_visible`: one caption row, the
    /// block itself, one blank row between items.
    fn draw_items(&mut self, f: &mut Frame, area: Rect) {
        let ctx = RenderContext::new(self.items.get(self.focused).map(|item| item.block.id()));

        self.scroll_focused_into_view(area.height);

        let mut y = area.y;
        let bottom = area.y + area.height;

        for (idx, item) in self.items.iter_mut().enumerate().skip(self.first_visible) {
            if y >= bottom {
                break;
            }

            let caption_style = if idx == self.focused {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let caption = Paragraph::new(item.caption.as_str())
                .style(caption_style)
                .alignment(Alignment::Center);
            f.render_widget(caption, Rect::new(area.x, y, area.width, 1));
            y += 1;

            let remaining = bottom.saturating_sub(y);
            if remaining == 0 {
                break;
            }
            let height = item.block.desired_height(area.height).min(remaining);
            item.block.render(f, Rect::new(area.x, y, area.width, height), &ctx);
            y += height + 1;
        }
    }

    /// Walk `first_visible` forward until the focused item's bottom edge
    /// fits the viewport, or back when focus moved above it.
    fn scroll_focused_into_view(&mut self, viewport: u16) {
        if self.focused < self.first_visible {
            self.first_visible = self.focused;
            return;
        }

        while self.first_visible < self.focused {
            let used: u32 = self.items[self.first_visible..=self.focused]
                .iter()
                .map(|item| u32::from(item.block.desired_height(viewport)) + 2)
                .sum();
            if used <= u32::from(viewport) {
                break;
            }
            self.first_visible += 1;
        }
    }

    fn draw_footer(&self, f: &mut Frame, area: Rect) {
        let text = self.footer_text(assets::global().try_get().is_some());

        let footer = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::TOP));

        f.render_widget(footer, area);
    }

    /// Footer line: key hints, position, the focused block's bindings,
    /// a note while the highlight assets are still loading, and the
    /// latest captured log entry.
    fn footer_text(&self, assets_ready: bool) -> String {
        let hint = self
            .items
            .get(self.focused)
            .and_then(|item| item.block.focus_hint())
            .unwrap_or("");

        let loading = if assets_ready { "" } else { " │ loading syntaxes" };

        let log_line = match self.log_buffer.latest() {
            Some(entry) => format!(
                " │ {} {} {}",
                entry.timestamp.format("%H:%M:%S"),
                entry.level.as_str(),
                entry.message
            ),
            None => String::new(),
        };

        format!(
            " q:quit  Tab:next  [{}/{}]  {}{}{}",
            self.focused + 1,
            self.items.len(),
            hint,
            loading,
            log_line,
        )
    }
}

/// Run the gallery
///
/// Sets up the terminal, activates every block, runs the event loop,
/// and cleans up when done.
pub async fn run(items: Vec<GalleryItem>, log_buffer: LogBuffer) -> Result<()> {
    // Set up terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut gallery = Gallery::new(items, log_buffer);
    gallery.activate_all();

    // Run the event loop
    let result = run_event_loop(&mut terminal, &mut gallery).await;

    // Cancel pending highlight tasks and copy timers before teardown
    gallery.deactivate_all();

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Waits on keyboard/mouse input and a periodic tick. The tick keeps
/// redrawing while nothing happens, which is what lets freshly
/// highlighted content appear and the copy label revert on time.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    gallery: &mut Gallery,
) -> Result<()> {
    // Redraw at 10 FPS when idle
    let mut tick_interval = tokio::time::interval(Duration::from_millis(100));

    loop {
        // Draw the UI
        terminal
            .draw(|f| gallery.draw(f))
            .context("Failed to draw terminal")?;

        tokio::select! {
            // Keyboard or mouse input
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key_event)) => handle_key_event(gallery, key_event),
                        Ok(Event::Mouse(mouse_event)) => handle_mouse_event(gallery, mouse_event),
                        _ => {}
                    }
                }
            } => {}

            // Periodic tick for redrawing
            _ = tick_interval.tick() => {}
        }

        if gallery.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle keyboard input: the focused block gets first claim on the
/// key, whatever it leaves falls through to the gallery bindings
fn handle_key_event(gallery: &mut Gallery, key_event: KeyEvent) {
    if key_event.kind != KeyEventKind::Press {
        return;
    }

    if gallery.dispatch_key(key_event).was_handled() {
        return;
    }

    match key_event.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
            gallery.should_quit = true;
        }
        KeyCode::Tab => gallery.focus_next(),
        KeyCode::BackTab => gallery.focus_prev(),
        _ => {}
    }
}

/// Handle mouse input
fn handle_mouse_event(gallery: &mut Gallery, mouse_event: MouseEvent) {
    // A left click focuses the block under the cursor
    if let MouseEventKind::Down(MouseButton::Left) = mouse_event.kind {
        gallery.focus_at(mouse_event.column, mouse_event.row);
    }

    gallery.dispatch_mouse(mouse_event);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_items(n: usize) -> Vec<GalleryItem> {
        (0..n)
            .map(|i| GalleryItem::new(format!("sample {}", i), "fn main() {}", CodeBlock::new()))
            .collect()
    }

    #[test]
    fn test_focus_cycles_and_wraps() {
        let mut gallery = Gallery::new(test_items(3), LogBuffer::new());
        assert_eq!(gallery.focused, 0);

        gallery.focus_next();
        gallery.focus_next();
        gallery.focus_next();
        assert_eq!(gallery.focused, 0);

        gallery.focus_prev();
        assert_eq!(gallery.focused, 2);
    }

    #[test]
    fn test_scrolls_focused_into_view() {
        // Unactivated blocks are skeletons: 4 rows each, 6 with caption
        // and gap. A 10-row viewport fits one, not two.
        let mut gallery = Gallery::new(test_items(3), LogBuffer::new());

        gallery.focused = 1;
        gallery.scroll_focused_into_view(10);
        assert_eq!(gallery.first_visible, 1);

        gallery.focused = 0;
        gallery.scroll_focused_into_view(10);
        assert_eq!(gallery.first_visible, 0);
    }

    #[test]
    fn test_unclaimed_keys_fall_through_to_gallery() {
        use crossterm::event::KeyModifiers;

        let mut gallery = Gallery::new(test_items(2), LogBuffer::new());

        handle_key_event(&mut gallery, KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        assert_eq!(gallery.focused, 1);

        // Scroll keys stay with the block
        handle_key_event(&mut gallery, KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE));
        assert_eq!(gallery.focused, 1);
        assert!(!gallery.should_quit);

        handle_key_event(&mut gallery, KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(gallery.should_quit);
    }

    #[test]
    fn test_footer_shows_timestamped_log_entry() {
        use crate::logging::{LogEntry, LogLevel};
        use chrono::TimeZone;

        let buffer = LogBuffer::new();
        buffer.add(LogEntry {
            timestamp: chrono::Utc.with_ymd_and_hms(2026, 8, 22, 12, 34, 56).unwrap(),
            level: LogLevel::Warn,
            message: "copy failed".into(),
        });

        let gallery = Gallery::new(test_items(1), buffer);
        assert!(gallery
            .footer_text(true)
            .contains("12:34:56 WARN copy failed"));
    }

    #[test]
    fn test_footer_notes_pending_asset_load() {
        let gallery = Gallery::new(test_items(1), LogBuffer::new());
        assert!(gallery.footer_text(false).contains("loading syntaxes"));
        assert!(!gallery.footer_text(true).contains("loading syntaxes"));
    }
}
