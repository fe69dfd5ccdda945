//! syntect highlighting for the editor panel.
//!
//! [`HighlightCache`] keeps the last result keyed by a hash of the code, the language
//! extension and the syntect theme name, so unchanged frames skip re-highlighting.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::LazyLock;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;

static PS: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static TS: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

#[derive(Debug, Default)]
pub struct HighlightCache {
    key: Option<u64>,
    lines: Vec<Line<'static>>,
}

impl HighlightCache {
    /// Returns highlighted lines for `code`, recomputing only when an input changed.
    pub fn lines(&mut self, code: &str, ext: &str, theme: &str) -> &[Line<'static>] {
        let mut hasher = DefaultHasher::new();
        (code, ext, theme).hash(&mut hasher);
        let key = hasher.finish();
        if self.key != Some(key) {
            self.lines = highlight(code, ext, theme);
            self.key = Some(key);
        }
        &self.lines
    }
}

/// Highlights `code` line by line. One output line per `\n`-separated input line.
pub fn highlight(code: &str, ext: &str, theme_name: &str) -> Vec<Line<'static>> {
    let syntax = PS
        .find_syntax_by_extension(ext)
        .unwrap_or_else(|| PS.find_syntax_plain_text());
    let Some(theme) = TS.themes.get(theme_name).or_else(|| TS.themes.values().next()) else {
        return code.split('\n').map(|l| Line::raw(l.to_owned())).collect();
    };

    let mut h = HighlightLines::new(syntax, theme);
    code.split('\n')
        .map(|line| {
            // syntect's newline grammars expect the terminator to be present.
            let with_newline = format!("{line}\n");
            let spans: Vec<Span<'static>> = h
                .highlight_line(&with_newline, &PS)
                .unwrap_or_default()
                .into_iter()
                .filter_map(|(style, text)| {
                    let text = text.trim_end_matches('\n');
                    (!text.is_empty()).then(|| syntect_to_span(style, text))
                })
                .collect();
            if spans.is_empty() && !line.is_empty() {
                Line::raw(line.to_owned())
            } else {
                Line::from(spans)
            }
        })
        .collect()
}

/// Converts a syntect (Style, &str) pair to an owned ratatui Span.
///
/// Only the foreground is carried over so the terminal background shows through.
fn syntect_to_span(style: syntect::highlighting::Style, content: &str) -> Span<'static> {
    let fg = style.foreground;
    let mut ratatui_style = Style::default();
    if fg.a > 0 {
        ratatui_style = ratatui_style.fg(Color::Rgb(fg.r, fg.g, fg.b));
    }
    let font = style.font_style;
    if font.contains(syntect::highlighting::FontStyle::BOLD) {
        ratatui_style = ratatui_style.add_modifier(Modifier::BOLD);
    }
    if font.contains(syntect::highlighting::FontStyle::ITALIC) {
        ratatui_style = ratatui_style.add_modifier(Modifier::ITALIC);
    }
    if font.contains(syntect::highlighting::FontStyle::UNDERLINE) {
        ratatui_style = ratatui_style.add_modifier(Modifier::UNDERLINED);
    }
    Span::styled(content.to_owned(), ratatui_style)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn one_output_line_per_input_line() {
        let lines = highlight("def f():\n    return 1\n", "py", "base16-ocean.dark");
        assert_eq!(lines.len(), 3);
        assert_eq!(plain(&lines[0]), "def f():");
        assert_eq!(plain(&lines[1]), "    return 1");
        assert_eq!(plain(&lines[2]), "");
    }

    #[test]
    fn unknown_extension_and_theme_still_render_text() {
        let lines = highlight("hello", "zzz", "no-such-theme");
        assert_eq!(plain(&lines[0]), "hello");
    }

    #[test]
    fn cache_recomputes_on_change() {
        let mut cache = HighlightCache::default();
        assert_eq!(cache.lines("a", "txt", "base16-ocean.dark").len(), 1);
        assert_eq!(cache.lines("a\nb", "txt", "base16-ocean.dark").len(), 2);
    }
}
