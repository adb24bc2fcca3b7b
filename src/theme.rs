// Theme support for rendered code blocks
//
// Provides the chrome palette (header, gutter, body, frame) plus the name of
// the syntect theme used for token colors. Selectable via config file.

use ratatui::style::Color;
use ratatui::widgets::BorderType;

/// Color palette for a code block and its chrome
#[derive(Debug, Clone)]
pub struct BlockTheme {
    pub name: String,

    // Header bar
    pub header_bg: Color,
    pub header_fg: Color,
    pub tag_bg: Color,
    pub tag_fg: Color,
    pub button_bg: Color,
    pub button_fg: Color,

    // Body
    pub body_bg: Color,
    pub code_fg: Color,
    pub gutter_bg: Color,
    pub gutter_fg: Color,

    // Frame
    pub border: Color,
    pub border_type: BorderType,

    /// Body rows shown before the block scrolls internally
    pub max_body_rows: u16,
    /// syntect theme that supplies token colors
    pub syntax_theme: String,
}

impl BlockTheme {
    /// Load theme by name
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark(), // "dark" or unknown
        }
    }

    /// Dark theme, the default
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            header_bg: Color::Rgb(0x1f, 0x1f, 0x1f), // near black
            header_fg: Color::Rgb(0xdd, 0xdd, 0xdd), // light gray
            tag_bg: Color::Rgb(0x33, 0x33, 0x33),    // chip gray
            tag_fg: Color::Rgb(0xdd, 0xdd, 0xdd),    // light gray
            button_bg: Color::Rgb(0x2e, 0x2e, 0x2e), // dark gray
            button_fg: Color::Rgb(0xcc, 0xcc, 0xcc), // light gray
            body_bg: Color::Rgb(0x28, 0x2c, 0x34),   // editor charcoal
            code_fg: Color::Rgb(0xff, 0xff, 0xff),   // white
            gutter_bg: Color::Rgb(0x1f, 0x1f, 0x1f), // matches header
            gutter_fg: Color::Rgb(0x77, 0x77, 0x77), // mid gray
            border: Color::Rgb(0x33, 0x33, 0x33),    // chip gray
            border_type: BorderType::Rounded,
            max_body_rows: 18,
            syntax_theme: "base16-ocean.dark".to_string(),
        }
    }

    /// Light theme for pale terminals
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            header_bg: Color::Rgb(0xe4, 0xe4, 0xe4), // pale gray
            header_fg: Color::Rgb(0x33, 0x33, 0x33), // near black
            tag_bg: Color::Rgb(0xd0, 0xd0, 0xd0),    // chip gray
            tag_fg: Color::Rgb(0x33, 0x33, 0x33),    // near black
            button_bg: Color::Rgb(0xd7, 0xd7, 0xd7), // gray
            button_fg: Color::Rgb(0x44, 0x44, 0x44), // dark gray
            body_bg: Color::Rgb(0xef, 0xf1, 0xf5),   // paper white
            code_fg: Color::Rgb(0x2b, 0x30, 0x3b),   // slate
            gutter_bg: Color::Rgb(0xe4, 0xe4, 0xe4), // matches header
            gutter_fg: Color::Rgb(0x99, 0x99, 0x99), // mid gray
            border: Color::Rgb(0xc0, 0xc0, 0xc0),    // gray
            border_type: BorderType::Rounded,
            max_body_rows: 18,
            syntax_theme: "base16-ocean.light".to_string(),
        }
    }
}

impl Default for BlockTheme {
    fn default() -> Self {
        Self::dark()
    }
}
