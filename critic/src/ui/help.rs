//! Help overlay: a centred modal listing every keybinding.
//!
//! `Clear` erases the area first, so the overlay is drawn in the same
//! `terminal.draw()` closure as the panels beneath it.

use ratatui::{
    Frame,
    layout::Constraint,
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Skipped on terminals narrower than 60 columns to avoid a degenerate `Rect`.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 60 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(70), Constraint::Percentage(80));

    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help: j/k scroll, ? or Esc to dismiss ")
        .border_style(Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn heading(text: &'static str) -> Line<'static> {
    Line::styled(text, Style::default().add_modifier(Modifier::BOLD))
}

fn build_help_text() -> Text<'static> {
    Text::from(vec![
        heading("Review"),
        Line::from("  s             Request a suggestion for the current code"),
        Line::from("  c             Check syntax"),
        Line::from("  a             Accept suggestion with comments stripped"),
        Line::from("  A             Accept suggestion as is"),
        Line::from("  x             Reject suggestion"),
        Line::from(""),
        heading("Editing"),
        Line::from("  i             Enter insert mode"),
        Line::from("  Esc           Back to normal mode"),
        Line::from("  Arrows        Move cursor"),
        Line::from("  Home / End    Start / end of line"),
        Line::from("  Ctrl-l        Clear the editor (normal mode)"),
        Line::from("  o             Open a file (Enter loads, Esc cancels)"),
        Line::from(""),
        heading("Navigation"),
        Line::from("  Tab / S-Tab   Cycle panel focus"),
        Line::from("  j / k         Move down / up in the focused panel"),
        Line::from("  Ctrl-d / u    Half page down / up"),
        Line::from("  Enter         Jump to the selected diagnostic"),
        Line::from(""),
        heading("General"),
        Line::from("  t             Toggle dark / light theme"),
        Line::from("  ?             Open / close this help"),
        Line::from("  q / Esc       Quit"),
    ])
}
