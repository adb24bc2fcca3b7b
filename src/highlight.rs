// Syntax highlighting for code block content
//
// Content starts as plain styled lines and is restyled in place once a
// syntax is resolved. The line structure is the single source of truth for
// the gutter: one Line per source line, always.

use std::sync::Arc;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Style as SyntectStyle, Theme};
use syntect::parsing::SyntaxReference;
use syntect::util::LinesWithEndings;

use crate::assets::HighlightAssets;

/// Theme used when a block names one the asset bundle doesn't have
const FALLBACK_THEME: &str = "base16-ocean.dark";

/// Styled lines of a code block body, plus the language class they carry
///
/// The class mirrors the `language-<id>` convention, present only when the
/// block was given an explicit language.
#[derive(Debug, Clone, Default)]
pub struct CodeContent {
    pub lines: Vec<Line<'static>>,
    pub class: Option<String>,
}

impl CodeContent {
    /// Unstyled content, one line per source line. Empty source produces
    /// zero lines so the gutter stays empty too.
    pub fn plain(source: &str, language_id: Option<&str>) -> Self {
        let lines = if source.is_empty() {
            Vec::new()
        } else {
            source.split('\n').map(raw_line).collect()
        };
        Self {
            lines,
            class: language_id.map(|id| format!("language-{}", id)),
        }
    }

    /// Reassemble the source text from the styled lines
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|s| s.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Applies syntect styling to [`CodeContent`]
pub struct Highlighter {
    assets: Arc<HighlightAssets>,
}

impl Highlighter {
    pub fn new(assets: Arc<HighlightAssets>) -> Self {
        Self { assets }
    }

    /// Highlight source whose language is unknown, guessing from the first
    /// line (shebangs, XML preambles). Unrecognized input stays plain with
    /// no language class.
    pub fn detect_and_highlight(&self, source: &str, theme_name: &str) -> CodeContent {
        let Some(syntax) = self.assets.syntaxes.find_syntax_by_first_line(source) else {
            return CodeContent::plain(source, None);
        };
        CodeContent {
            lines: self.run_highlight(source, syntax, theme_name),
            class: None,
        }
    }

    /// Restyle content in place using the language named by its class.
    ///
    /// The source is read back from the content itself, so callers can stage
    /// plain text and restyle it without an intermediate frame. Content with
    /// no class, or a language the syntax set doesn't know, is left as is.
    pub fn highlight_element(&self, content: &mut CodeContent, theme_name: &str) {
        let id = match content
            .class
            .as_deref()
            .and_then(|c| c.strip_prefix("language-"))
        {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => return,
        };
        let Some(syntax) = self.find_syntax_by_language(&id) else {
            return;
        };
        let source = content.text();
        content.lines = self.run_highlight(&source, syntax, theme_name);
    }

    /// Resolve a language name to a syntax definition.
    ///
    /// Tries the name and extension tables directly, then maps common
    /// aliases (rust -> rs, c++ -> cpp) and tries the tables again.
    fn find_syntax_by_language(&self, lang: &str) -> Option<&SyntaxReference> {
        let lower = lang.to_lowercase();

        if let Some(syntax) = self.assets.syntaxes.find_syntax_by_name(&lower) {
            return Some(syntax);
        }
        if let Some(syntax) = self.assets.syntaxes.find_syntax_by_extension(&lower) {
            return Some(syntax);
        }

        let mapped = match lower.as_str() {
            "rust" => "rs",
            "python" => "py",
            "javascript" => "js",
            "typescript" => "ts",
            "c++" => "cpp",
            "c#" | "csharp" => "cs",
            "shell" | "bash" => "sh",
            "powershell" => "ps1",
            "yaml" => "yml",
            "markdown" => "md",
            "ruby" => "rb",
            _ => &lower,
        };

        self.assets
            .syntaxes
            .find_syntax_by_extension(mapped)
            .or_else(|| self.assets.syntaxes.find_syntax_by_name(mapped))
    }

    fn run_highlight(
        &self,
        source: &str,
        syntax: &SyntaxReference,
        theme_name: &str,
    ) -> Vec<Line<'static>> {
        let mut highlighter = HighlightLines::new(syntax, self.theme(theme_name));
        let mut lines = Vec::new();

        for raw in LinesWithEndings::from(source) {
            match highlighter.highlight_line(raw, &self.assets.syntaxes) {
                Ok(ranges) => {
                    let mut spans = Vec::new();
                    for (style, text) in ranges {
                        // Newlines are line structure, not token text
                        let cleaned = text.replace(['\n', '\r'], "");
                        if cleaned.is_empty() {
                            continue;
                        }
                        spans.push(Span::styled(cleaned, convert_style(style)));
                    }
                    lines.push(Line::from(spans));
                }
                // A parse error loses the styling, never the text
                Err(_) => lines.push(raw_line(raw)),
            }
        }
        // A trailing newline implies one more (empty) line
        if source.ends_with('\n') {
            lines.push(Line::default());
        }
        lines
    }

    /// Theme lookup with a fixed fallback for unknown names
    fn theme(&self, name: &str) -> &Theme {
        self.assets
            .themes
            .themes
            .get(name)
            .unwrap_or_else(|| &self.assets.themes.themes[FALLBACK_THEME])
    }
}

/// One source line as a single unstyled span, line endings stripped
fn raw_line(text: &str) -> Line<'static> {
    Line::from(Span::raw(text.trim_end_matches(['\n', '\r']).to_string()))
}

/// Map a syntect token style onto a ratatui span style.
///
/// Only the foreground carries over. Backgrounds stay unset so the block
/// body paints one uniform color behind every token.
fn convert_style(style: SyntectStyle) -> Style {
    let fg = style.foreground;
    let mut out = Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b));
    if style.font_style.contains(FontStyle::BOLD) {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        out = out.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        out = out.add_modifier(Modifier::UNDERLINED);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets;

    async fn highlighter() -> Highlighter {
        Highlighter::new(assets::global().ensure_loaded().await)
    }

    fn any_colored(content: &CodeContent) -> bool {
        content
            .lines
            .iter()
            .flat_map(|l| l.spans.iter())
            .any(|s| s.style.fg.is_some())
    }

    #[test]
    fn test_plain_preserves_text_and_count() {
        let source = "fn main() {\n    body\n}";
        let content = CodeContent::plain(source, None);
        assert_eq!(content.line_count(), 3);
        assert_eq!(content.text(), source);
        assert_eq!(content.class, None);
    }

    #[test]
    fn test_plain_empty_is_zero_lines() {
        let content = CodeContent::plain("", Some("rust"));
        assert_eq!(content.line_count(), 0);
        assert_eq!(content.text(), "");
        assert_eq!(content.class.as_deref(), Some("language-rust"));
    }

    #[test]
    fn test_raw_line_keeps_text_drops_endings() {
        assert_eq!(raw_line("let x;\n").spans[0].content.as_ref(), "let x;");
        assert_eq!(raw_line("let x;\r\n").spans[0].content.as_ref(), "let x;");
        assert_eq!(raw_line("let x;").spans[0].content.as_ref(), "let x;");
    }

    #[tokio::test]
    async fn test_explicit_language_restyles_in_place() {
        let hl = highlighter().await;
        let source = "fn main() {\n    println!(\"hi\");\n}";
        let mut content = CodeContent::plain(source, Some("rust"));
        hl.highlight_element(&mut content, "base16-ocean.dark");

        assert_eq!(content.text(), source);
        assert_eq!(content.line_count(), 3);
        assert!(any_colored(&content), "expected colored spans after restyle");
    }

    #[tokio::test]
    async fn test_language_alias_resolves() {
        let hl = highlighter().await;
        let source = "def f():\n    return 1";
        let mut content = CodeContent::plain(source, Some("python"));
        hl.highlight_element(&mut content, "base16-ocean.dark");
        assert_eq!(content.text(), source);
        assert!(any_colored(&content));
    }

    #[tokio::test]
    async fn test_unknown_language_left_untouched() {
        let hl = highlighter().await;
        let source = "whatever text";
        let mut content = CodeContent::plain(source, Some("klingon"));
        hl.highlight_element(&mut content, "base16-ocean.dark");
        assert_eq!(content.text(), source);
        assert!(!any_colored(&content));
    }

    #[tokio::test]
    async fn test_first_line_detection() {
        let hl = highlighter().await;
        let content = hl.detect_and_highlight("#!/bin/bash\necho hi", "base16-ocean.dark");
        assert_eq!(content.line_count(), 2);
        assert_eq!(content.class, None);
        assert!(any_colored(&content));
    }

    #[tokio::test]
    async fn test_detection_miss_stays_plain() {
        let hl = highlighter().await;
        let content = hl.detect_and_highlight("just some prose", "base16-ocean.dark");
        assert_eq!(content.line_count(), 1);
        assert!(!any_colored(&content));
    }

    #[tokio::test]
    async fn test_blank_lines_survive_restyle() {
        let hl = highlighter().await;
        let source = "fn a() {}\n\nfn b() {}";
        let mut content = CodeContent::plain(source, Some("rust"));
        hl.highlight_element(&mut content, "base16-ocean.dark");
        assert_eq!(content.line_count(), 3);
        assert_eq!(content.text(), source);
        assert!(content.lines[1].spans.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_theme_falls_back() {
        let hl = highlighter().await;
        let mut content = CodeContent::plain("fn x() {}", Some("rust"));
        hl.highlight_element(&mut content, "no-such-theme");
        assert!(any_colored(&content));
    }
}
