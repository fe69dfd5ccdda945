//! Central application state for critic.
//!
//! `AppState` owns the workflow [`Controller`] and everything the terminal needs around
//! it: the editable buffer, the gutter markers, the mode, focus and scroll offsets.
//! Rendering reads it; the keybinding dispatcher and the event loop mutate it.
//!
//! Controller effects are applied here. Annotation events update [`AppState::markers`]
//! and remote calls are queued in an outbox that the event loop drains after every
//! event and hands to [`crate::analysis::spawn_call`].

use std::collections::BTreeMap;
use std::path::Path;

use critic_core::{
    AnnotationEvent, Completion, Controller, Effect, Intent, PendingOp, RemoteCall, Session,
    Severity,
};
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use tracing::{debug, warn};

use crate::editor::EditorBuffer;
use crate::highlight::HighlightCache;
use crate::source;
use crate::theme::Theme;

/// Which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Keystrokes edit the code buffer.
    Insert,
    /// Full-screen help overlay is shown above all panels.
    HelpOverlay,
    /// The status bar is a path prompt; Enter loads the file.
    OpenFile,
}

/// Which panel currently has keyboard focus.
///
/// Cycle order: `Editor` → `Review` → `Diagnostics` → `Editor`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    #[default]
    Editor,
    Review,
    Diagnostics,
}

impl PanelFocus {
    pub fn prev(self) -> Self {
        match self {
            PanelFocus::Editor => PanelFocus::Diagnostics,
            PanelFocus::Review => PanelFocus::Editor,
            PanelFocus::Diagnostics => PanelFocus::Review,
        }
    }

    pub fn next(self) -> Self {
        match self {
            PanelFocus::Editor => PanelFocus::Review,
            PanelFocus::Review => PanelFocus::Diagnostics,
            PanelFocus::Diagnostics => PanelFocus::Editor,
        }
    }
}

/// One gutter marker on a 1-based editor line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub message: String,
    pub severity: Severity,
}

pub struct AppState {
    pub mode: Mode,
    pub focus: PanelFocus,
    pub theme: Theme,

    controller: Controller,
    /// Local copy of `session.code` that the editor panel edits.
    pub editor: EditorBuffer,
    /// Markers keyed by 1-based line, in the order they were added.
    pub markers: BTreeMap<u32, Vec<Marker>>,
    outbox: Vec<RemoteCall>,

    pub highlight: HighlightCache,

    /// First visible editor line; adjusted by the renderer to follow the cursor.
    pub editor_scroll: usize,
    pub review_scroll: u16,
    pub diagnostics_state: ListState,
    pub help_scroll: u16,

    /// Text typed at the open-file prompt.
    pub path_input: String,
    /// One-shot status bar message, cleared by the next Normal-mode key.
    pub notice: Option<String>,

    /// Inner heights cached after each render for page-wise scrolling.
    pub editor_viewport_height: u16,
    pub review_viewport_height: u16,
    pub diagnostics_viewport_height: u16,

    /// Outer rects of [editor, review, diagnostics] from the last render, for mouse focus.
    pub panel_rects: [Rect; 3],

    pub spinner_frame: usize,
}

impl AppState {
    pub fn new(theme: Theme) -> Self {
        Self {
            mode: Mode::default(),
            focus: PanelFocus::default(),
            theme,
            controller: Controller::new(),
            editor: EditorBuffer::default(),
            markers: BTreeMap::new(),
            outbox: Vec::new(),
            highlight: HighlightCache::default(),
            editor_scroll: 0,
            review_scroll: 0,
            diagnostics_state: ListState::default(),
            help_scroll: 0,
            path_input: String::new(),
            notice: None,
            editor_viewport_height: 0,
            review_viewport_height: 0,
            diagnostics_viewport_height: 0,
            panel_rects: [Rect::default(); 3],
            spinner_frame: 0,
        }
    }

    pub fn session(&self) -> &Session {
        self.controller.session()
    }

    /// Forwards a user intent to the controller and applies the resulting effects.
    pub fn dispatch(&mut self, intent: Intent) {
        let effects = self.controller.handle(intent);
        self.apply(effects);
    }

    /// Applies a settled remote call.
    pub fn complete(&mut self, completion: Completion) {
        let effects = self.controller.complete(completion);
        self.apply(effects);
    }

    /// Remote calls queued since the last drain, oldest first.
    pub fn take_outbox(&mut self) -> Vec<RemoteCall> {
        std::mem::take(&mut self.outbox)
    }

    /// Runs an editing operation on the buffer and reports a change to the controller.
    pub fn edit(&mut self, op: impl FnOnce(&mut EditorBuffer) -> bool) {
        if op(&mut self.editor) {
            let code = self.editor.text().to_owned();
            self.dispatch(Intent::CodeChanged(code));
        }
    }

    /// Reads `path` and loads it as the new code. A read failure leaves the session
    /// untouched and is reported through [`AppState::notice`].
    pub fn open_file(&mut self, path: &Path) {
        match source::read_source(path) {
            Ok(code) => {
                self.dispatch(Intent::FileLoaded(code));
                self.editor_scroll = 0;
                self.notice = Some(format!("Opened {}", path.display()));
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot open file");
                self.notice = Some(format!("Cannot open {}: {e}", path.display()));
            }
        }
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Remote(call) => {
                    debug!(call = call.kind(), "queueing remote call");
                    self.outbox.push(call);
                }
                Effect::Annotate(AnnotationEvent::ClearAll) => self.markers.clear(),
                Effect::Annotate(AnnotationEvent::Add { line, message, severity }) => {
                    self.markers
                        .entry(line)
                        .or_default()
                        .push(Marker { message, severity });
                }
            }
        }
        // Accept and file loads replace the code wholesale.
        if self.editor.text() != self.session().code {
            let code = self.session().code.clone();
            self.editor.set_text(&code);
        }
        let count = self.session().diagnostics.len();
        match self.diagnostics_state.selected() {
            _ if count == 0 => self.diagnostics_state.select(None),
            Some(i) if i >= count => self.diagnostics_state.select(Some(count - 1)),
            None => self.diagnostics_state.select(Some(0)),
            Some(_) => {}
        }
    }

    /// Advances the spinner while any remote work is outstanding.
    pub fn on_tick(&mut self) {
        if !self.session().pending.is_empty() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    pub fn is_pending(&self, op: PendingOp) -> bool {
        self.session().pending.contains(op)
    }

    pub fn scroll_down(&mut self, lines: u16) {
        match self.focus {
            PanelFocus::Editor => (0..lines).for_each(|_| self.editor.move_down()),
            PanelFocus::Review => self.review_scroll = self.review_scroll.saturating_add(lines),
            PanelFocus::Diagnostics => self.diagnostics_state.scroll_down_by(lines),
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        match self.focus {
            PanelFocus::Editor => (0..lines).for_each(|_| self.editor.move_up()),
            PanelFocus::Review => self.review_scroll = self.review_scroll.saturating_sub(lines),
            PanelFocus::Diagnostics => self.diagnostics_state.scroll_up_by(lines),
        }
    }

    /// Scrolls the focused panel by half its visible height (at least one line).
    pub fn half_page_down(&mut self) {
        self.scroll_down((self.focused_viewport_height() / 2).max(1));
    }

    pub fn half_page_up(&mut self) {
        self.scroll_up((self.focused_viewport_height() / 2).max(1));
    }

    fn focused_viewport_height(&self) -> u16 {
        match self.focus {
            PanelFocus::Editor => self.editor_viewport_height,
            PanelFocus::Review => self.review_viewport_height,
            PanelFocus::Diagnostics => self.diagnostics_viewport_height,
        }
    }

    /// Moves the editor cursor to the selected diagnostic's line and focuses the editor.
    pub fn jump_to_selected_diagnostic(&mut self) {
        let Some(line) = self
            .diagnostics_state
            .selected()
            .and_then(|i| self.session().diagnostics.get(i))
            .map(|d| d.line)
        else {
            return;
        };
        self.editor.goto_line(line.saturating_sub(1) as usize);
        self.focus = PanelFocus::Editor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use critic_core::{AnalysisError, Decision, LanguageTag};

    fn state() -> AppState {
        AppState::new(Theme::dark())
    }

    #[test]
    fn typing_queues_detection_for_the_new_text() {
        let mut s = state();
        s.mode = Mode::Insert;
        s.edit(|b| b.insert_char('x'));
        assert_eq!(s.session().code, "x");
        assert_eq!(
            s.take_outbox(),
            vec![RemoteCall::DetectLanguage { code: "x".into() }]
        );
        assert!(s.take_outbox().is_empty());
    }

    #[test]
    fn noop_edit_sends_nothing() {
        let mut s = state();
        s.edit(|b| b.backspace());
        assert!(s.take_outbox().is_empty());
        assert!(s.session().pending.is_empty());
    }

    #[test]
    fn syntax_result_fills_markers_and_selects_first_diagnostic() {
        let mut s = state();
        s.dispatch(Intent::FileLoaded("a\nb\nc".into()));
        s.dispatch(Intent::RequestSyntaxCheck);
        s.take_outbox();
        s.complete(Completion::SyntaxChecked(Ok(vec![
            "general".into(),
            "error at line 3".into(),
            "line 3: also".into(),
        ])));

        assert_eq!(s.markers.len(), 2);
        assert_eq!(s.markers[&3].len(), 2);
        assert_eq!(s.markers[&3][1].message, "line 3: also");
        assert_eq!(s.markers[&3][0].severity, Severity::Error);
        assert_eq!(s.diagnostics_state.selected(), Some(0));

        s.diagnostics_state.select(Some(1));
        s.jump_to_selected_diagnostic();
        assert_eq!(s.editor.cursor_position(), (2, 0));
    }

    #[test]
    fn failed_check_still_shows_one_marker() {
        let mut s = state();
        s.dispatch(Intent::RequestSyntaxCheck);
        s.complete(Completion::SyntaxChecked(Err(AnalysisError::RemoteUnavailable(
            "down".into(),
        ))));
        assert_eq!(s.markers.keys().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn file_load_clears_markers() {
        let mut s = state();
        s.dispatch(Intent::RequestSyntaxCheck);
        s.complete(Completion::SyntaxChecked(Ok(vec!["line 1 x".into()])));
        s.dispatch(Intent::FileLoaded("new".into()));
        assert!(s.markers.is_empty());
        assert_eq!(s.diagnostics_state.selected(), None);
        assert_eq!(s.editor.text(), "new");
    }

    #[test]
    fn accepting_replaces_editor_text() {
        let mut s = state();
        s.dispatch(Intent::FileLoaded("x=1 # old".into()));
        s.complete(Completion::LanguageDetected(Ok(LanguageTag::new("python"))));
        s.dispatch(Intent::RequestSuggestion);
        s.complete(Completion::SuggestionFetched(Ok("x = 1 # new".into())));
        s.complete(Completion::SimilarityScored(Ok(70.0)));
        s.take_outbox();

        s.dispatch(Intent::AcceptClean);
        assert_eq!(s.editor.text(), "x = 1");
        assert_eq!(s.session().decision, Decision::Accepted);
        assert_eq!(
            s.take_outbox(),
            vec![RemoteCall::DetectLanguage {
                code: "x = 1".into(),
            }]
        );
    }

    #[test]
    fn open_file_loads_code_and_queues_detection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.c");
        std::fs::write(&path, "int main() {}").unwrap();

        let mut s = state();
        s.dispatch(Intent::RequestSyntaxCheck);
        s.complete(Completion::SyntaxChecked(Ok(vec!["line 1 x".into()])));
        s.take_outbox();

        s.open_file(&path);
        assert_eq!(s.editor.text(), "int main() {}");
        assert!(s.markers.is_empty());
        assert!(s.notice.as_deref().is_some_and(|n| n.starts_with("Opened ")));
        assert_eq!(
            s.take_outbox(),
            vec![RemoteCall::DetectLanguage {
                code: "int main() {}".into(),
            }]
        );
    }

    #[test]
    fn unreadable_file_keeps_current_code() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = state();
        s.dispatch(Intent::FileLoaded("keep me".into()));
        s.take_outbox();

        s.open_file(&dir.path().join("missing.py"));
        assert_eq!(s.session().code, "keep me");
        assert!(s.take_outbox().is_empty());
        assert!(s.notice.as_deref().is_some_and(|n| n.starts_with("Cannot open ")));
    }

    #[test]
    fn spinner_only_moves_while_pending() {
        let mut s = state();
        s.on_tick();
        assert_eq!(s.spinner_frame, 0);
        s.dispatch(Intent::RequestSuggestion);
        s.on_tick();
        assert_eq!(s.spinner_frame, 1);
    }

    #[test]
    fn focus_cycles_both_ways() {
        let f = PanelFocus::Editor;
        assert_eq!(f.next().next().next(), f);
        assert_eq!(f.prev(), PanelFocus::Diagnostics);
    }
}
