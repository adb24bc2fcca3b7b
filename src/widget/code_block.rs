// The code block widget
//
// A presentational block: header bar with a language tag and a copy
// button, a numbered gutter, and a syntax highlighted body. Highlighting
// runs on a spawned task; until it publishes, the block renders its
// skeleton (chrome with an empty body and an empty gutter).

use std::sync::{Arc, Mutex};
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use ratatui::Frame;
use tokio::task::JoinHandle;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::assets;
use crate::clipboard::copy_to_clipboard;
use crate::dimension::Dimension;
use crate::highlight::{CodeContent, Highlighter};
use crate::theme::BlockTheme;
use crate::traits::{Component, Copyable, Handled, Interactive, RenderContext, WidgetId};
use crate::widget::copy_button::CopyButton;
use crate::widget::scroll::ScrollState;

/// Frame rows around the body: top border, header row, bottom border
const CHROME_ROWS: u16 = 3;

/// Content published by the highlight task, None until it lands
#[derive(Debug, Default)]
struct RenderState {
    content: Option<CodeContent>,
}

/// A self-contained code display block
///
/// Built with the builder methods, then [`activate`](Self::activate)d with
/// the source text. The block owns all of its state; hosts only route
/// input to it and give it an area to render into.
pub struct CodeBlock {
    id: WidgetId,
    /// Explicit language identifier; None means auto-detect
    language: Option<String>,
    width: Dimension,
    height: Dimension,
    theme: BlockTheme,
    /// Prepared source text, captured at activation
    source: String,
    state: Arc<Mutex<RenderState>>,
    button: CopyButton,
    scroll: ScrollState,
    /// In-flight highlight task, aborted on deactivation
    task: Option<JoinHandle<()>>,
    /// Hit boxes from the last render, for mouse handling
    button_area: Option<Rect>,
    block_area: Option<Rect>,
}

impl CodeBlock {
    pub fn new() -> Self {
        Self {
            id: WidgetId::next(),
            language: None,
            width: Dimension::Percent(90),
            height: Dimension::Auto,
            theme: BlockTheme::default(),
            source: String::new(),
            state: Arc::new(Mutex::new(RenderState::default())),
            button: CopyButton::new(),
            scroll: ScrollState::new(),
            task: None,
            button_area: None,
            block_area: None,
        }
    }

    /// Set the language tag. The literal "auto" (any case) means no
    /// explicit language, same as not calling this at all.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        let language = language.into();
        self.language = if language.eq_ignore_ascii_case("auto") {
            None
        } else {
            Some(language)
        };
        self
    }

    pub fn width(mut self, width: Dimension) -> Self {
        self.width = width;
        self
    }

    pub fn height(mut self, height: Dimension) -> Self {
        self.height = height;
        self
    }

    pub fn theme(mut self, theme: BlockTheme) -> Self {
        self.theme = theme;
        self
    }

    /// Capture the source text and start highlighting on a spawned task.
    ///
    /// The skeleton is renderable as soon as this returns; the body fills
    /// in when the task publishes. Activating all blocks together still
    /// deserializes the shared assets exactly once. Must be called from
    /// within a tokio runtime.
    pub fn activate(&mut self, raw_source: &str) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.source = Self::prepare_source(raw_source);
        // Back to the skeleton until the new task publishes
        self.state.lock().unwrap().content = None;
        self.scroll.scroll_to_top();

        let source = self.source.clone();
        let language = self.language.clone();
        let theme_name = self.theme.syntax_theme.clone();
        let state = Arc::clone(&self.state);

        self.task = Some(tokio::spawn(async move {
            let assets = assets::global().ensure_loaded().await;
            let highlighter = Highlighter::new(assets);

            let content = match language.as_deref() {
                Some(id) => {
                    // Stage the raw text, then restyle it in place. Both
                    // happen before publishing, so no plain frame shows.
                    let mut content = CodeContent::plain(&source, Some(id));
                    highlighter.highlight_element(&mut content, &theme_name);
                    content
                }
                None => highlighter.detect_and_highlight(&source, &theme_name),
            };

            tracing::debug!(
                "Highlighted {} lines ({})",
                content.line_count(),
                language.as_deref().unwrap_or("auto")
            );
            state.lock().unwrap().content = Some(content);
        }));
    }

    /// Detach the block: abort any in-flight highlight task and drop any
    /// pending copy confirmation.
    pub fn deactivate(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.button.reset();
    }

    /// Text for the header tag chip: explicit languages uppercase, auto
    /// shows as the literal "Auto".
    pub fn header_tag(&self) -> String {
        match &self.language {
            Some(id) => id.to_uppercase(),
            None => "Auto".to_string(),
        }
    }

    /// Rows this block wants, frame included. Auto sizes to content up to
    /// the theme's cap; fixed and percentage heights resolve against the
    /// rows given.
    pub fn desired_height(&self, available: u16) -> u16 {
        match self.height {
            Dimension::Auto => {
                let lines = self
                    .state
                    .lock()
                    .unwrap()
                    .content
                    .as_ref()
                    .map(|c| c.line_count())
                    .unwrap_or(0);
                let body = (lines.min(u16::MAX as usize) as u16)
                    .min(self.theme.max_body_rows)
                    .max(1);
                body + CHROME_ROWS
            }
            dim => dim.resolve(available),
        }
    }

    /// Whether the given screen position falls inside the block
    pub fn hit(&self, x: u16, y: u16) -> bool {
        self.block_area
            .is_some_and(|a| a.contains(Position::new(x, y)))
    }

    /// Surrounding whitespace dropped, then at most one leading newline
    /// removed, nothing else
    fn prepare_source(raw: &str) -> String {
        let trimmed = raw.trim();
        trimmed.strip_prefix('\n').unwrap_or(trimmed).to_string()
    }

    fn press_copy(&mut self) {
        let Some(text) = self.copy_text() else { return };
        match copy_to_clipboard(&text) {
            Ok(()) => self.button.confirm(Instant::now()),
            // A failed write leaves the button idle
            Err(err) => {
                tracing::debug!("Copy failed for {}: {:#}", self.copy_description(), err)
            }
        }
    }

    fn render_header(&mut self, f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let label = self.button.label(ctx.now);

        f.render_widget(
            Block::default().style(Style::default().bg(self.theme.header_bg)),
            area,
        );

        let tag = format!(" {} ", self.header_tag());
        let button = format!(" {} ", label);
        let tag_width = tag.width() as u16;
        let button_width = button.width() as u16;

        // Tag chip on the left, button on the right
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(tag_width),
                Constraint::Min(0),
                Constraint::Length(button_width),
                Constraint::Length(1),
            ])
            .split(area);

        f.render_widget(
            Paragraph::new(tag)
                .style(Style::default().bg(self.theme.tag_bg).fg(self.theme.tag_fg)),
            chunks[1],
        );
        f.render_widget(
            Paragraph::new(button).style(
                Style::default()
                    .bg(self.theme.button_bg)
                    .fg(self.theme.button_fg),
            ),
            chunks[3],
        );
        self.button_area = Some(chunks[3]);
    }

    fn render_body(&mut self, f: &mut Frame, area: Rect) {
        if area.height == 0 {
            return;
        }

        let state = self.state.lock().unwrap();
        let lines: &[Line] = state
            .content
            .as_ref()
            .map(|c| c.lines.as_slice())
            .unwrap_or(&[]);
        let total = lines.len();

        // Gutter width tracks the widest line number; zero lines, no gutter
        let digits = if total == 0 {
            0
        } else {
            total.to_string().len() as u16
        };
        let gutter_width = if digits == 0 { 0 } else { digits + 2 };

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(gutter_width),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(area);
        let gutter_area = chunks[0];
        let code_area = chunks[2];

        self.scroll.update_dimensions(total, area.height as usize);
        let widest = lines.iter().map(|l| l.width()).max().unwrap_or(0);
        self.scroll.update_columns(widest, code_area.width as usize);
        let (start, end) = self.scroll.visible_range();

        if gutter_width > 0 {
            let numbers: Vec<Line> = (start..end)
                .map(|i| {
                    Line::from(format!(
                        "{:>width$} ",
                        i + 1,
                        width = digits as usize + 1
                    ))
                })
                .collect();
            f.render_widget(
                Paragraph::new(numbers).style(
                    Style::default()
                        .fg(self.theme.gutter_fg)
                        .bg(self.theme.gutter_bg),
                ),
                gutter_area,
            );
        }

        let col = self.scroll.col_offset();
        let visible: Vec<Line> = lines[start..end]
            .iter()
            .map(|line| clip_line(line, col))
            .collect();
        f.render_widget(
            Paragraph::new(visible).style(
                Style::default()
                    .fg(self.theme.code_fg)
                    .bg(self.theme.body_bg),
            ),
            code_area,
        );
    }
}

impl Default for CodeBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CodeBlock {
    fn drop(&mut self) {
        self.deactivate();
    }
}

impl Component for CodeBlock {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn render(&mut self, f: &mut Frame, area: Rect, ctx: &RenderContext) {
        // Requested width, centered in the row
        let width = self.width.resolve(area.width);
        let x = area.x + (area.width - width) / 2;
        let block_area = Rect::new(x, area.y, width, area.height);
        if block_area.width < 4 || block_area.height < CHROME_ROWS {
            self.block_area = None;
            self.button_area = None;
            return;
        }
        self.block_area = Some(block_area);

        // Clear first so the block owns every cell it covers
        f.render_widget(Clear, block_area);

        let border = if ctx.is_focused(self.id) {
            self.theme.header_fg
        } else {
            self.theme.border
        };
        let frame_block = Block::default()
            .borders(Borders::ALL)
            .border_type(self.theme.border_type)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(self.theme.body_bg));
        let inner = frame_block.inner(block_area);
        f.render_widget(frame_block, block_area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);
        self.render_header(f, rows[0], ctx);
        self.render_body(f, rows[1]);

        if self.scroll.needs_scrollbar() {
            // Thumb rides the right border, beside the body rows
            let bar_area = Rect::new(block_area.x, rows[1].y, block_area.width, rows[1].height);
            let content_length = self.scroll.total().saturating_sub(self.scroll.viewport());
            let mut bar_state = ScrollbarState::new(content_length).position(self.scroll.offset());
            f.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(None)
                    .end_symbol(None),
                bar_area,
                &mut bar_state,
            );
        }
    }
}

impl Copyable for CodeBlock {
    /// The exact prepared source, even when empty
    fn copy_text(&self) -> Option<String> {
        Some(self.source.clone())
    }

    fn copy_description(&self) -> String {
        format!("{} code block", self.header_tag())
    }
}

impl Interactive for CodeBlock {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.press_copy();
                Handled::Yes
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll.scroll_up();
                Handled::Yes
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll.scroll_down();
                Handled::Yes
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.scroll.scroll_left();
                Handled::Yes
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.scroll.scroll_right();
                Handled::Yes
            }
            KeyCode::PageUp => {
                self.scroll.page_up();
                Handled::Yes
            }
            KeyCode::PageDown => {
                self.scroll.page_down();
                Handled::Yes
            }
            KeyCode::Home => {
                self.scroll.scroll_to_top();
                Handled::Yes
            }
            KeyCode::End => {
                self.scroll.scroll_to_bottom();
                Handled::Yes
            }
            _ => Handled::No,
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Handled {
        let hit = |area: Option<Rect>| {
            area.is_some_and(|a| a.contains(Position::new(mouse.column, mouse.row)))
        };

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if hit(self.button_area) => {
                self.press_copy();
                Handled::Yes
            }
            MouseEventKind::ScrollUp if hit(self.block_area) => {
                self.scroll.scroll_up();
                Handled::Yes
            }
            MouseEventKind::ScrollDown if hit(self.block_area) => {
                self.scroll.scroll_down();
                Handled::Yes
            }
            MouseEventKind::ScrollLeft if hit(self.block_area) => {
                self.scroll.scroll_left();
                Handled::Yes
            }
            MouseEventKind::ScrollRight if hit(self.block_area) => {
                self.scroll.scroll_right();
                Handled::Yes
            }
            _ => Handled::No,
        }
    }

    fn focus_hint(&self) -> Option<&'static str> {
        Some("↑↓←→:scroll  PgUp/PgDn:page  y:copy")
    }
}

/// Clip a styled line to start at display column `col`, keeping span
/// styles. A wide character straddling the cut becomes padding spaces so
/// later columns stay aligned.
fn clip_line(line: &Line<'static>, col: usize) -> Line<'static> {
    if col == 0 {
        return line.clone();
    }
    let mut remaining = col;
    let mut spans = Vec::new();
    for span in &line.spans {
        if remaining == 0 {
            spans.push(span.clone());
            continue;
        }
        let mut out = String::new();
        for ch in span.content.chars() {
            let w = ch.width().unwrap_or(0);
            if remaining == 0 {
                out.push(ch);
            } else if w <= remaining {
                remaining -= w;
            } else {
                for _ in 0..(w - remaining) {
                    out.push(' ');
                }
                remaining = 0;
            }
        }
        if !out.is_empty() {
            spans.push(Span::styled(out, span.style));
        }
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_prepare_source_trims() {
        assert_eq!(CodeBlock::prepare_source("\n  fn x() {}\n  "), "fn x() {}");
        assert_eq!(CodeBlock::prepare_source("plain"), "plain");
        assert_eq!(CodeBlock::prepare_source("   "), "");
        // Interior indentation survives
        assert_eq!(CodeBlock::prepare_source("a\n    b\n"), "a\n    b");
    }

    #[test]
    fn test_header_tag_casing() {
        assert_eq!(CodeBlock::new().header_tag(), "Auto");
        assert_eq!(CodeBlock::new().language("auto").header_tag(), "Auto");
        assert_eq!(CodeBlock::new().language("Auto").header_tag(), "Auto");
        assert_eq!(CodeBlock::new().language("rust").header_tag(), "RUST");
        assert_eq!(CodeBlock::new().language("python").header_tag(), "PYTHON");
    }

    #[tokio::test]
    async fn test_activation_publishes_highlighted_content() {
        let mut block = CodeBlock::new().language("rust");
        block.activate("\nfn main() {\n    println!(\"hi\");\n}\n");
        block.task.take().unwrap().await.unwrap();

        let state = block.state.lock().unwrap();
        let content = state.content.as_ref().expect("content published");
        assert_eq!(content.line_count(), 3);
        assert!(content
            .lines
            .iter()
            .flat_map(|l| l.spans.iter())
            .any(|s| s.style.fg.is_some()));
    }

    #[tokio::test]
    async fn test_auto_detection_from_first_line() {
        let mut block = CodeBlock::new();
        block.activate("#!/bin/sh\necho hi");
        block.task.take().unwrap().await.unwrap();

        let state = block.state.lock().unwrap();
        let content = state.content.as_ref().expect("content published");
        assert_eq!(content.line_count(), 2);
        assert!(content
            .lines
            .iter()
            .flat_map(|l| l.spans.iter())
            .any(|s| s.style.fg.is_some()));
    }

    #[tokio::test]
    async fn test_empty_source_renders_zero_lines() {
        let mut block = CodeBlock::new();
        block.activate("   \n  ");
        block.task.take().unwrap().await.unwrap();

        {
            let state = block.state.lock().unwrap();
            let content = state.content.as_ref().expect("content published");
            assert_eq!(content.line_count(), 0);
        }
        // The clipboard still gets the (empty) source on copy
        assert_eq!(block.copy_text().as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_two_blocks_share_one_asset_load() {
        let mut a = CodeBlock::new().language("rust");
        let mut b = CodeBlock::new().language("python");
        a.activate("fn main() {}");
        b.activate("print(1)");
        a.task.take().unwrap().await.unwrap();
        b.task.take().unwrap().await.unwrap();

        assert!(a.state.lock().unwrap().content.is_some());
        assert!(b.state.lock().unwrap().content.is_some());
        assert_eq!(a.header_tag(), "RUST");
        assert_eq!(b.header_tag(), "PYTHON");
        assert_eq!(crate::assets::global().load_count(), 1);
    }

    #[tokio::test]
    async fn test_deactivate_aborts_and_resets() {
        let mut block = CodeBlock::new();
        block.activate("text");
        block.button.confirm(Instant::now());
        block.deactivate();

        assert!(block.task.is_none());
        assert_eq!(block.button.label(Instant::now()), "⧉ Copy");
    }

    #[tokio::test]
    async fn test_desired_height_tracks_content() {
        let mut block = CodeBlock::new().language("rust");
        // Skeleton: chrome plus one empty body row
        assert_eq!(block.desired_height(50), 4);

        block.activate("fn a() {}\nfn b() {}\nfn c() {}");
        block.task.take().unwrap().await.unwrap();
        assert_eq!(block.desired_height(50), 6);

        let fixed = CodeBlock::new().height(Dimension::Cells(12));
        assert_eq!(fixed.desired_height(50), 12);
    }

    #[tokio::test]
    async fn test_desired_height_caps_long_content() {
        let mut block = CodeBlock::new();
        let source = (0..30)
            .map(|i| format!("line {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        block.activate(&source);
        block.task.take().unwrap().await.unwrap();
        assert_eq!(block.desired_height(50), 18 + CHROME_ROWS);
    }

    #[test]
    fn test_clip_line_ascii() {
        let line = Line::from(vec![Span::raw("abc"), Span::raw("def")]);
        assert_eq!(line_text(&clip_line(&line, 0)), "abcdef");
        assert_eq!(line_text(&clip_line(&line, 2)), "cdef");
        assert_eq!(line_text(&clip_line(&line, 4)), "ef");
        assert_eq!(line_text(&clip_line(&line, 10)), "");
    }

    #[test]
    fn test_clip_line_pads_split_wide_char() {
        let line = Line::from(Span::raw("你好x"));
        assert_eq!(line_text(&clip_line(&line, 1)), " 好x");
        assert_eq!(line_text(&clip_line(&line, 2)), "好x");
        assert_eq!(line_text(&clip_line(&line, 4)), "x");
    }

    #[test]
    fn test_clip_line_keeps_styles() {
        let style = Style::default().fg(ratatui::style::Color::Red);
        let line = Line::from(vec![Span::styled("abcd", style)]);
        let clipped = clip_line(&line, 2);
        assert_eq!(clipped.spans.len(), 1);
        assert_eq!(clipped.spans[0].style, style);
        assert_eq!(clipped.spans[0].content.as_ref(), "cd");
    }
}
