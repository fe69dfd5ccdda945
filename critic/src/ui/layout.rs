//! Responsive panel layout and the status bar.
//!
//! Pure layout arithmetic, recomputed inside `terminal.draw()` every frame so it always
//! reflects the current terminal size.
//!
//! # Panel geometry
//!
//! At `>= 100` columns the editor takes the left 60% and the review and diagnostics
//! panels stack on the right. Narrower terminals stack all three vertically.
//!
//! `Spacing::Overlap(1)` combined with `Block::merge_borders(MergeStrategy::Fuzzy)`
//! makes adjacent panel borders share a single cell.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use critic_core::PendingOp;

use crate::app::{AppState, Mode};
use crate::theme::Theme;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Returns `[editor, review, diagnostics, status_bar]` for the current frame.
pub fn compute_layout(area: Rect) -> [Rect; 4] {
    let [main_area, status_bar] =
        area.layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]));

    if area.width >= 100 {
        let [editor, side] = main_area.layout(
            &Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                .spacing(Spacing::Overlap(1)),
        );
        let [review, diagnostics] = side.layout(
            &Layout::vertical([Constraint::Fill(2), Constraint::Fill(1)])
                .spacing(Spacing::Overlap(1)),
        );
        [editor, review, diagnostics, status_bar]
    } else {
        let [editor, review, diagnostics] = main_area.layout(
            &Layout::vertical([
                Constraint::Fill(3),
                Constraint::Fill(2),
                Constraint::Min(4),
            ])
            .spacing(Spacing::Overlap(1)),
        );
        [editor, review, diagnostics, status_bar]
    }
}

/// Inner `Rect` of a bordered panel.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin {
        vertical: 1,
        horizontal: 1,
    })
}

/// Bordered `Block` for a panel: thick and accented when focused, plain otherwise.
///
/// `MergeStrategy::Fuzzy` because `Exact` produces broken junctions when `Thick` and
/// `Plain` borders meet.
pub fn panel_block<'a>(title: &'a str, is_focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused {
        BorderType::Thick
    } else {
        BorderType::Plain
    };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Renders the 1-row status bar: mode, detected language, and a spinner per running
/// remote action.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    frame.render_widget(
        Paragraph::new(status_line(state)).style(
            Style::default()
                .bg(state.theme.status_bar_bg)
                .fg(state.theme.status_bar_fg),
        ),
        area,
    );
}

fn status_line(state: &AppState) -> Line<'static> {
    let theme = &state.theme;
    let (mode_text, mode_fg) = match state.mode {
        Mode::Insert => (" INSERT ", theme.status_mode_insert),
        Mode::OpenFile => (" OPEN ", theme.status_mode_insert),
        Mode::Normal | Mode::HelpOverlay => (" NORMAL ", theme.status_mode_normal),
    };

    let language = state
        .session()
        .detected_language
        .as_ref()
        .map_or_else(|| "N/A".to_owned(), |l| l.to_string());

    let mode_span = Span::styled(
        mode_text,
        Style::default().fg(mode_fg).add_modifier(Modifier::BOLD),
    );
    if state.mode == Mode::OpenFile {
        return Line::from(vec![
            mode_span,
            Span::raw(format!(" Open file: {}_", state.path_input)),
        ]);
    }

    let mut spans = vec![mode_span, Span::raw(format!(" Language: {language} "))];

    let frame = SPINNER[state.spinner_frame % SPINNER.len()];
    for (op, text) in [
        (PendingOp::DetectingLanguage, "Detecting..."),
        (PendingOp::FetchingSuggestion, "Analyzing..."),
        (PendingOp::CheckingSyntax, "Checking Syntax..."),
    ] {
        if state.is_pending(op) {
            spans.push(Span::styled(
                format!(" {frame} {text}"),
                Style::default().fg(theme.spinner),
            ));
        }
    }

    if let Some(notice) = &state.notice {
        spans.push(Span::raw(format!("  {notice}")));
    }
    spans.push(Span::raw("  ? help"));
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use critic_core::{Completion, Intent, LanguageTag};

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn status_shows_na_until_detected() {
        let mut state = AppState::new(Theme::dark());
        assert!(text(&status_line(&state)).contains("Language: N/A"));

        state.dispatch(Intent::CodeChanged("int main() {}".into()));
        assert!(text(&status_line(&state)).contains("Detecting..."));

        state.complete(Completion::LanguageDetected(Ok(LanguageTag::new("c"))));
        let line = text(&status_line(&state));
        assert!(line.contains("Language: cpp"));
        assert!(!line.contains("Detecting..."));
    }

    #[test]
    fn status_shows_primary_action_spinner() {
        let mut state = AppState::new(Theme::dark());
        state.dispatch(Intent::RequestSyntaxCheck);
        assert!(text(&status_line(&state)).contains("Checking Syntax..."));
    }

    #[test]
    fn status_becomes_path_prompt_in_open_mode() {
        let mut state = AppState::new(Theme::dark());
        state.mode = Mode::OpenFile;
        state.path_input = "src/a.c".into();
        assert_eq!(text(&status_line(&state)), " OPEN  Open file: src/a.c_");

        state.mode = Mode::Normal;
        state.notice = Some("Opened src/a.c".into());
        assert!(text(&status_line(&state)).contains("Opened src/a.c"));
    }

    #[test]
    fn wide_terminal_puts_editor_left() {
        let [editor, review, diagnostics, status] = compute_layout(Rect::new(0, 0, 120, 40));
        assert_eq!(editor.x, 0);
        assert!(review.x > 0);
        assert_eq!(review.x, diagnostics.x);
        assert!(diagnostics.y > review.y);
        assert_eq!(status.height, 1);
    }

    #[test]
    fn narrow_terminal_stacks_panels() {
        let [editor, review, diagnostics, _] = compute_layout(Rect::new(0, 0, 80, 40));
        assert_eq!(editor.width, 80);
        assert!(review.y > editor.y);
        assert!(diagnostics.y > review.y);
    }
}
