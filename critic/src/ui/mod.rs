//! Rendering for critic.
//!
//! [`render`] is the single entry point called from the event loop's `terminal.draw()`
//! closure. Layout arithmetic lives in `layout.rs`; each panel has its own module.

mod diagnostics_list;
mod editor_view;
pub mod help;
pub mod keybindings;
mod layout;
mod review;

use ratatui::Frame;

use crate::app::{AppState, Mode};
use layout::{compute_layout, inner_rect, render_status_bar};

/// Renders one complete frame.
///
/// Viewport heights and panel rects are written back into `state` so that the next
/// keypress can compute page distances and mouse focus against what is on screen.
pub fn render(frame: &mut Frame, state: &mut AppState) {
    let [editor, review, diagnostics, status_bar] = compute_layout(frame.area());

    state.editor_viewport_height = inner_rect(editor).height;
    state.review_viewport_height = inner_rect(review).height;
    state.diagnostics_viewport_height = inner_rect(diagnostics).height;
    state.panel_rects = [editor, review, diagnostics];

    editor_view::render_editor(frame, editor, state);
    review::render_review(frame, review, state);
    diagnostics_list::render_diagnostics(frame, diagnostics, state);
    render_status_bar(frame, status_bar, state);

    if state.mode == Mode::HelpOverlay {
        help::render_help_overlay(frame, &state.theme, state.help_scroll);
    }
}
