//! Review panel: the suggestion as a line diff against the current code, with its
//! similarity score and the user's decision.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};
use similar::{ChangeTag, TextDiff};

use critic_core::{Decision, PendingOp};

use crate::app::{AppState, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

pub fn render_review(frame: &mut Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let block = panel_block("Review", state.focus == PanelFocus::Review, theme);
    frame.render_widget(block, area);

    let session = state.session();
    let mut lines = Vec::new();

    match session.suggestion.as_deref() {
        None if state.is_pending(PendingOp::FetchingSuggestion) => {
            lines.push(Line::styled("Analyzing...", Style::default().fg(theme.spinner)));
        }
        None => {
            lines.push(Line::raw("No suggestion yet. Press s to request one."));
        }
        Some(suggestion) => {
            lines.push(score_line(session.similarity_score, theme));
            if let Some(label) = session.decision.label() {
                let color = match session.decision {
                    Decision::Accepted => theme.accepted,
                    _ => theme.rejected,
                };
                lines.push(Line::styled(
                    label,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ));
            } else {
                lines.push(Line::raw("a: accept clean   A: accept all   x: reject"));
            }
            lines.push(Line::raw(""));
            lines.extend(diff_lines(&session.code, suggestion, theme));
        }
    }

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((state.review_scroll, 0)),
        inner_rect(area),
    );
}

fn score_line(score: Option<f64>, theme: &Theme) -> Line<'static> {
    match score {
        Some(score) => Line::styled(
            format!("Similarity Score: {score:.2}%"),
            Style::default().fg(theme.score),
        ),
        None => Line::styled("Similarity Score: N/A", Style::default().fg(theme.gutter)),
    }
}

/// Unified line diff from `original` to `suggestion` with word-level emphasis.
pub fn diff_lines(original: &str, suggestion: &str, theme: &Theme) -> Vec<Line<'static>> {
    let diff = TextDiff::from_lines(original, suggestion);
    let mut out = Vec::new();

    for op in diff.ops() {
        for change in diff.iter_inline_changes(op) {
            let (sign, color) = match change.tag() {
                ChangeTag::Delete => ("-", theme.diff_removed),
                ChangeTag::Insert => ("+", theme.diff_added),
                ChangeTag::Equal => (" ", theme.diff_context),
            };
            let base = Style::default().fg(color);
            let mut spans = vec![Span::styled(sign, base)];
            for (emphasized, value) in change.iter_strings_lossy() {
                let text = value.trim_end_matches('\n').to_owned();
                if text.is_empty() {
                    continue;
                }
                let style = if emphasized {
                    base.add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                } else {
                    base
                };
                spans.push(Span::styled(text, style));
            }
            out.push(Line::from(spans));
        }
    }
    out
}
