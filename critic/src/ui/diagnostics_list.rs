//! Diagnostics panel: one `L<line>: <message>` row per syntax-check finding.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
};

use critic_core::{Diagnostic, PendingOp};

use crate::app::{AppState, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::panel_block;

pub fn render_diagnostics(frame: &mut Frame, area: Rect, state: &mut AppState) {
    let count = state.session().diagnostics.len();
    let title = if count > 0 {
        format!("Diagnostics ({count})")
    } else {
        "Diagnostics".to_owned()
    };
    let block = panel_block(&title, state.focus == PanelFocus::Diagnostics, &state.theme);

    let items: Vec<ListItem> = if count == 0 {
        let msg = if state.is_pending(PendingOp::CheckingSyntax) {
            "Checking Syntax..."
        } else {
            "No diagnostics. Press c to check syntax."
        };
        vec![ListItem::new(Line::raw(msg))]
    } else {
        state
            .session()
            .diagnostics
            .iter()
            .map(|d| diagnostic_item(d, &state.theme))
            .collect()
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    frame.render_stateful_widget(list, area, &mut state.diagnostics_state);
}

fn diagnostic_item(d: &Diagnostic, theme: &Theme) -> ListItem<'static> {
    ListItem::new(Line::from(vec![
        Span::styled(format!("L{}: ", d.line), Style::default().fg(theme.marker_error)),
        Span::raw(d.raw_message.clone()),
    ]))
}
