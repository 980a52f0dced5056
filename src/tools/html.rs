//! HTML-to-text conversion shared by the search and page tools.

use html2text::render::TrivialDecorator;

/// Wide enough that lyrics lines are never re-wrapped.
const RENDER_WIDTH: usize = 1000;

/// Renders HTML as undecorated text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Visible text of an HTML document, one line per block, blank runs collapsed.
    pub fn page_text(&self, html: &str) -> String {
        let rendered = render(html);
        let mut lines: Vec<&str> = Vec::new();
        for line in rendered.lines().map(str::trim) {
            if line.is_empty() && lines.last().map_or(true, |l| l.is_empty()) {
                continue;
            }
            lines.push(line);
        }
        lines.join("\n").trim().to_string()
    }

    /// Text of an inline fragment on one line.
    pub fn inline_text(&self, fragment: &str) -> String {
        render(fragment).split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Entities decoded, non-breaking spaces folded to plain ones.
fn render(html: &str) -> String {
    let text = html2text::config::with_decorator(TrivialDecorator::new())
        .string_from_read(html.as_bytes(), RENDER_WIDTH)
        .unwrap_or_else(|_| html.to_string());
    text.replace('\u{a0}', " ")
}
