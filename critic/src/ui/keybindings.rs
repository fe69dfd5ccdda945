//! Keybinding dispatcher for critic.
//!
//! Translates crossterm key and mouse events into `AppState` mutations and workflow
//! intents, and returns a `KeyAction` telling the event loop whether to keep running.
//! The dispatcher branches on `state.mode` first so each mode has its own handler.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use critic_core::Intent;

use crate::app::{AppState, Mode, PanelFocus};

/// Control-flow signal returned from the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Quit,
}

pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyAction::Quit;
    }
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::Normal => handle_normal(key, state),
        Mode::Insert => handle_insert(key, state),
        Mode::OpenFile => handle_open_file(key, state),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    state.notice = None;
    if let Some(action) = handle_scroll_key(key, state) {
        return action;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('i') => {
            state.mode = Mode::Insert;
            state.focus = PanelFocus::Editor;
        }

        // Workflow
        KeyCode::Char('s') => state.dispatch(Intent::RequestSuggestion),
        KeyCode::Char('c') => state.dispatch(Intent::RequestSyntaxCheck),
        KeyCode::Char('a') => state.dispatch(Intent::AcceptClean),
        KeyCode::Char('A') => state.dispatch(Intent::AcceptAll),
        KeyCode::Char('x') => state.dispatch(Intent::Reject),
        KeyCode::Char('l') if ctrl => state.dispatch(Intent::ClearEditor),
        KeyCode::Char('o') => {
            state.path_input.clear();
            state.mode = Mode::OpenFile;
        }

        // Panel focus
        KeyCode::Tab => state.focus = state.focus.next(),
        KeyCode::BackTab => state.focus = state.focus.prev(),
        KeyCode::Enter if state.focus == PanelFocus::Diagnostics => {
            state.jump_to_selected_diagnostic();
        }

        KeyCode::Char('t') => state.toggle_theme(),
        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
        }
        KeyCode::Char('q') | KeyCode::Esc => return KeyAction::Quit,
        _ => {}
    }
    KeyAction::Continue
}

/// j / k / arrows and the Ctrl half-page combos. `None` when the key is not a scroll key.
fn handle_scroll_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => state.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => state.scroll_up(1),
        KeyCode::Char('d') if ctrl => state.half_page_down(),
        KeyCode::Char('u') if ctrl => state.half_page_up(),
        _ => return None,
    }
    Some(KeyAction::Continue)
}

// ---------------------------------------------------------------------------
// HelpOverlay mode
// ---------------------------------------------------------------------------

fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.help_scroll = state.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Insert mode
// ---------------------------------------------------------------------------

/// Every change to the buffer is reported to the controller as `CodeChanged`.
fn handle_insert(key: KeyEvent, state: &mut AppState) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => state.mode = Mode::Normal,
        KeyCode::Char(c) if !ctrl => state.edit(|b| b.insert_char(c)),
        KeyCode::Enter => state.edit(|b| b.insert_newline()),
        KeyCode::Tab => state.edit(|b| {
            (0..4).for_each(|_| {
                b.insert_char(' ');
            });
            true
        }),
        KeyCode::Backspace => state.edit(|b| b.backspace()),
        KeyCode::Delete => state.edit(|b| b.delete()),
        KeyCode::Left => state.editor.move_left(),
        KeyCode::Right => state.editor.move_right(),
        KeyCode::Up => state.editor.move_up(),
        KeyCode::Down => state.editor.move_down(),
        KeyCode::Home => state.editor.move_home(),
        KeyCode::End => state.editor.move_end(),
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// OpenFile mode
// ---------------------------------------------------------------------------

/// Line editing for the path prompt. Enter on a blank path cancels.
fn handle_open_file(key: KeyEvent, state: &mut AppState) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => state.mode = Mode::Normal,
        KeyCode::Enter => {
            state.mode = Mode::Normal;
            let input = std::mem::take(&mut state.path_input);
            let trimmed = input.trim();
            if !trimmed.is_empty() {
                state.open_file(&PathBuf::from(trimmed));
            }
        }
        KeyCode::Backspace => {
            state.path_input.pop();
        }
        KeyCode::Char('u') if ctrl => state.path_input.clear(),
        KeyCode::Char(c) if !ctrl => state.path_input.push(c),
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Left click focuses the panel under the pointer; the wheel scrolls by 3 lines.
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let pos = Position {
                x: mouse.column,
                y: mouse.row,
            };
            let [editor, review, diagnostics] = state.panel_rects;
            if editor.contains(pos) {
                state.focus = PanelFocus::Editor;
            } else if review.contains(pos) {
                state.focus = PanelFocus::Review;
            } else if diagnostics.contains(pos) {
                state.focus = PanelFocus::Diagnostics;
            }
        }
        MouseEventKind::ScrollUp if state.mode == Mode::HelpOverlay => {
            state.help_scroll = state.help_scroll.saturating_sub(3);
        }
        MouseEventKind::ScrollDown if state.mode == Mode::HelpOverlay => {
            state.help_scroll = state.help_scroll.saturating_add(3);
        }
        MouseEventKind::ScrollUp => state.scroll_up(3),
        MouseEventKind::ScrollDown => state.scroll_down(3),
        _ => {}
    }
    KeyAction::Continue
}
