//! Editor panel: highlighted code with a line-number gutter and diagnostic markers.
//!
//! Only the visible window of lines is materialised per frame. The scroll offset
//! follows the cursor so the cursor line is always on screen.

use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem},
};

use crate::app::{AppState, Mode, PanelFocus};
use crate::ui::layout::{inner_rect, panel_block};

pub fn render_editor(frame: &mut Frame, area: Rect, state: &mut AppState) {
    let title = match &state.session().detected_language {
        Some(lang) => format!("Editor [{lang}]"),
        None => "Editor".to_owned(),
    };
    let ext = state
        .session()
        .detected_language
        .as_ref()
        .map_or("txt", |l| l.file_extension())
        .to_owned();
    let block = panel_block(&title, state.focus == PanelFocus::Editor, &state.theme);
    frame.render_widget(block, area);

    let inner = inner_rect(area);
    let height = inner.height as usize;
    let (cursor_line, cursor_col) = state.editor.cursor_position();
    state.editor_scroll = follow(state.editor_scroll, cursor_line, height);

    let total = state.editor.line_count();
    let number_width = total.to_string().len();
    let gutter_width = number_width + 3;

    let theme = &state.theme;
    let lines = state
        .highlight
        .lines(state.editor.text(), &ext, theme.syntax_theme);

    let start = state.editor_scroll.min(lines.len());
    let end = (start + height).min(lines.len());
    let items: Vec<ListItem> = lines[start..end]
        .iter()
        .enumerate()
        .map(|(offset, line)| {
            let number = start + offset + 1;
            let marked = u32::try_from(number)
                .ok()
                .is_some_and(|n| state.markers.contains_key(&n));
            let marker = if marked {
                Span::styled("●", Style::default().fg(theme.marker_error))
            } else {
                Span::raw(" ")
            };
            let mut spans = vec![
                marker,
                Span::styled(
                    format!("{number:>number_width$} "),
                    Style::default().fg(theme.gutter),
                ),
                Span::raw(" "),
            ];
            spans.extend(line.spans.iter().cloned());
            ListItem::new(Line::from(spans))
        })
        .collect();

    frame.render_widget(List::new(items), inner);

    if state.mode == Mode::Insert && inner.width > 0 && inner.height > 0 {
        let x = inner.x as usize + gutter_width + cursor_col;
        let y = inner.y as usize + cursor_line.saturating_sub(state.editor_scroll);
        let max_x = (inner.x + inner.width - 1) as usize;
        frame.set_cursor_position(Position {
            x: x.min(max_x) as u16,
            y: y as u16,
        });
    }
}

/// Scroll offset that keeps `line` inside a viewport of `height` rows.
fn follow(scroll: usize, line: usize, height: usize) -> usize {
    if height == 0 || line < scroll {
        line
    } else if line >= scroll + height {
        line + 1 - height
    } else {
        scroll
    }
}

#[cfg(test)]
mod tests {
    use super::follow;

    #[test]
    fn scroll_follows_cursor() {
        assert_eq!(follow(0, 5, 10), 0);
        assert_eq!(follow(0, 10, 10), 1);
        assert_eq!(follow(8, 3, 10), 3);
        assert_eq!(follow(4, 0, 0), 0);
    }
}
