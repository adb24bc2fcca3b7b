// Scroll state for the code block body
//
// The body is a fixed document rather than a stream, so there is no
// auto-follow. Both axes scroll, mirroring a pre-formatted overflow box:
// vertical by line, horizontal by column.

/// Columns moved per horizontal scroll step
const HORIZONTAL_STEP: usize = 4;

/// Scroll position for a block body
///
/// Owns offsets, content size and viewport size. Dimensions are settled
/// each render frame via [`update_dimensions`](Self::update_dimensions)
/// and [`update_columns`](Self::update_columns), which clamp the offsets
/// to the current content.
#[derive(Debug, Clone)]
pub struct ScrollState {
    /// Line index at the top of the viewport
    offset: usize,
    /// Column index at the left edge of the viewport
    col_offset: usize,
    /// Total content lines
    total: usize,
    /// Lines visible in the viewport
    viewport: usize,
    /// Widest content line in display columns
    cols_total: usize,
    /// Columns visible in the viewport
    cols_viewport: usize,
}

impl ScrollState {
    pub fn new() -> Self {
        Self {
            offset: 0,
            col_offset: 0,
            total: 0,
            viewport: 0,
            cols_total: 0,
            cols_viewport: 0,
        }
    }

    /// Update vertical content and viewport sizes.
    /// Call this each render frame with current sizes.
    pub fn update_dimensions(&mut self, total: usize, viewport: usize) {
        self.total = total;
        self.viewport = viewport;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Update horizontal content and viewport sizes.
    /// Call this each render frame with current sizes.
    pub fn update_columns(&mut self, cols_total: usize, cols_viewport: usize) {
        self.cols_total = cols_total;
        self.cols_viewport = cols_viewport;
        self.col_offset = self.col_offset.min(self.max_col_offset());
    }

    /// Scroll up by one line
    pub fn scroll_up(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }

    /// Scroll down by one line
    pub fn scroll_down(&mut self) {
        // Dimensions settle at render time; until then scroll freely and
        // let the next update_dimensions clamp.
        if self.total == 0 || self.offset < self.max_offset() {
            self.offset += 1;
        }
    }

    /// Scroll left by one step
    pub fn scroll_left(&mut self) {
        self.col_offset = self.col_offset.saturating_sub(HORIZONTAL_STEP);
    }

    /// Scroll right by one step
    pub fn scroll_right(&mut self) {
        if self.cols_total == 0 {
            self.col_offset += HORIZONTAL_STEP;
        } else {
            self.col_offset = (self.col_offset + HORIZONTAL_STEP).min(self.max_col_offset());
        }
    }

    /// Scroll up by a page
    pub fn page_up(&mut self) {
        let page = self.viewport.max(1);
        self.offset = self.offset.saturating_sub(page);
    }

    /// Scroll down by a page
    pub fn page_down(&mut self) {
        let page = self.viewport.max(1);
        self.offset = (self.offset + page).min(self.max_offset());
    }

    /// Jump to the first line, left edge
    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
        self.col_offset = 0;
    }

    /// Jump to the last page
    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Current line offset
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Current column offset
    pub fn col_offset(&self) -> usize {
        self.col_offset
    }

    /// Visible line range (start_index, end_index)
    pub fn visible_range(&self) -> (usize, usize) {
        let start = self.offset;
        let end = (self.offset + self.viewport).min(self.total);
        (start, end)
    }

    /// Check if content overflows the viewport (scrollbar needed)
    pub fn needs_scrollbar(&self) -> bool {
        self.total > self.viewport
    }

    /// Total content lines
    pub fn total(&self) -> usize {
        self.total
    }

    /// Viewport height in lines
    pub fn viewport(&self) -> usize {
        self.viewport
    }

    fn max_offset(&self) -> usize {
        self.total.saturating_sub(self.viewport)
    }

    fn max_col_offset(&self) -> usize {
        self.cols_total.saturating_sub(self.cols_viewport)
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_growth_keeps_position() {
        let mut scroll = ScrollState::new();
        scroll.update_dimensions(10, 5);
        assert_eq!(scroll.offset(), 0);

        scroll.update_dimensions(15, 5);
        assert_eq!(scroll.offset(), 0);
    }

    #[test]
    fn test_offset_clamps_when_content_shrinks() {
        let mut scroll = ScrollState::new();
        scroll.update_dimensions(100, 10);
        scroll.scroll_to_bottom();
        assert_eq!(scroll.offset(), 90);

        scroll.update_dimensions(20, 10);
        assert_eq!(scroll.offset(), 10);
    }

    #[test]
    fn test_paging() {
        let mut scroll = ScrollState::new();
        scroll.update_dimensions(100, 10);

        scroll.page_down();
        assert_eq!(scroll.offset(), 10);
        scroll.page_down();
        assert_eq!(scroll.offset(), 20);
        scroll.page_up();
        assert_eq!(scroll.offset(), 10);
    }

    #[test]
    fn test_visible_range() {
        let mut scroll = ScrollState::new();
        scroll.update_dimensions(100, 10);

        let (start, end) = scroll.visible_range();
        assert_eq!(start, 0);
        assert_eq!(end, 10);

        scroll.scroll_to_bottom();
        let (start, end) = scroll.visible_range();
        assert_eq!(start, 90);
        assert_eq!(end, 100);
    }

    #[test]
    fn test_short_content_never_scrolls() {
        let mut scroll = ScrollState::new();
        scroll.update_dimensions(5, 10);
        assert!(!scroll.needs_scrollbar());

        scroll.scroll_down();
        assert_eq!(scroll.offset(), 0);
    }

    #[test]
    fn test_horizontal_clamps_to_widest_line() {
        let mut scroll = ScrollState::new();
        scroll.update_columns(100, 40);

        scroll.scroll_right();
        assert_eq!(scroll.col_offset(), 4);

        for _ in 0..50 {
            scroll.scroll_right();
        }
        assert_eq!(scroll.col_offset(), 60);

        scroll.scroll_to_top();
        assert_eq!(scroll.col_offset(), 0);
        assert_eq!(scroll.offset(), 0);
    }
}
