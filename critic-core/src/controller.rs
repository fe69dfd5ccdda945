//! Workflow controller: the state machine over the live [`Session`].
//!
//! The controller performs no I/O. Each transition mutates the session and returns the
//! [`Effect`]s the host must carry out: remote calls to execute (their outcome comes back
//! through [`Controller::complete`]) and annotation events for the editor's marker layer.
//!
//! A remote call that has been emitted but whose [`Completion`] has not been applied yet
//! is a suspension point. Within one suggestion request the fetch and the scoring call
//! are strictly sequential because the scoring call is only emitted once the fetch
//! settles. Detection requests are independent of everything else and are applied
//! last-response-wins.

use tracing::{debug, info, warn};

use crate::diagnostics;
use crate::error::AnalysisError;
use crate::strip::strip;
use crate::types::{Decision, LanguageTag, PendingOp, Session, Severity};

/// User intents forwarded by the presentation surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    CodeChanged(String),
    FileLoaded(String),
    ClearEditor,
    RequestSuggestion,
    RequestSyntaxCheck,
    AcceptClean,
    AcceptAll,
    Reject,
}

/// A request for the analysis service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    DetectLanguage { code: String },
    FetchSuggestion { code: String, language: LanguageTag },
    ScoreSimilarity { original: String, corrected: String },
    CheckSyntax { code: String, language: LanguageTag },
}

impl RemoteCall {
    pub fn kind(&self) -> &'static str {
        match self {
            RemoteCall::DetectLanguage { .. } => "detect_language",
            RemoteCall::FetchSuggestion { .. } => "fetch_suggestion",
            RemoteCall::ScoreSimilarity { .. } => "score_similarity",
            RemoteCall::CheckSyntax { .. } => "check_syntax",
        }
    }
}

/// Marker-layer events for the editing widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationEvent {
    ClearAll,
    Add {
        line: u32,
        message: String,
        severity: Severity,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Remote(RemoteCall),
    Annotate(AnnotationEvent),
}

/// The settled outcome of a [`RemoteCall`], fed back into the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    LanguageDetected(Result<LanguageTag, AnalysisError>),
    SuggestionFetched(Result<String, AnalysisError>),
    SimilarityScored(Result<f64, AnalysisError>),
    SyntaxChecked(Result<Vec<String>, AnalysisError>),
}

/// Where the current suggestion request is.
#[derive(Debug, Default, Clone, PartialEq)]
enum SuggestionPhase {
    #[default]
    Idle,
    /// Waiting for the suggestion text. `original` is the code snapshot the
    /// similarity score will be computed against.
    Fetching { original: String },
    Scoring,
}

/// Owns the single live session and applies every transition to it.
#[derive(Debug, Default)]
pub struct Controller {
    session: Session,
    suggestion_phase: SuggestionPhase,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Applies a user intent. Intents that are not allowed in the current state are
    /// ignored and yield no effects.
    pub fn handle(&mut self, intent: Intent) -> Vec<Effect> {
        match intent {
            Intent::CodeChanged(code) => self.edit(code),
            Intent::FileLoaded(code) => self.load(code),
            Intent::ClearEditor => self.load(String::new()),
            Intent::RequestSuggestion => self.request_suggestion(),
            Intent::RequestSyntaxCheck => self.request_syntax_check(),
            Intent::AcceptClean => self.accept(true),
            Intent::AcceptAll => self.accept(false),
            Intent::Reject => self.reject(),
        }
    }

    /// Applies the outcome of a remote call. Completions for work that is not pending
    /// are dropped.
    pub fn complete(&mut self, completion: Completion) -> Vec<Effect> {
        match completion {
            Completion::LanguageDetected(result) => self.language_detected(result),
            Completion::SuggestionFetched(result) => self.suggestion_fetched(result),
            Completion::SimilarityScored(result) => self.similarity_scored(result),
            Completion::SyntaxChecked(result) => self.syntax_checked(result),
        }
    }

    fn edit(&mut self, code: String) -> Vec<Effect> {
        self.session.code = code;
        self.schedule_detection()
    }

    fn schedule_detection(&mut self) -> Vec<Effect> {
        self.session.pending.insert(PendingOp::DetectingLanguage);
        vec![Effect::Remote(RemoteCall::DetectLanguage {
            code: self.session.code.clone(),
        })]
    }

    fn load(&mut self, code: String) -> Vec<Effect> {
        info!(bytes = code.len(), "loading new buffer");
        self.session.suggestion = None;
        self.session.similarity_score = None;
        self.session.decision = Decision::Undecided;
        self.session.diagnostics.clear();
        let mut effects = vec![Effect::Annotate(AnnotationEvent::ClearAll)];
        effects.extend(self.edit(code));
        effects
    }

    fn request_suggestion(&mut self) -> Vec<Effect> {
        if self.session.pending.is_busy() {
            debug!("suggestion request ignored: another action is running");
            return Vec::new();
        }
        self.session.suggestion = None;
        self.session.similarity_score = None;
        self.session.decision = Decision::Undecided;
        self.session.pending.insert(PendingOp::FetchingSuggestion);
        self.suggestion_phase = SuggestionPhase::Fetching {
            original: self.session.code.clone(),
        };
        vec![Effect::Remote(RemoteCall::FetchSuggestion {
            code: self.session.code.clone(),
            language: self.session.request_language(),
        })]
    }

    fn request_syntax_check(&mut self) -> Vec<Effect> {
        if self.session.pending.is_busy() {
            debug!("syntax check ignored: another action is running");
            return Vec::new();
        }
        self.session.diagnostics.clear();
        self.session.pending.insert(PendingOp::CheckingSyntax);
        vec![Effect::Remote(RemoteCall::CheckSyntax {
            code: self.session.code.clone(),
            language: self.session.request_language(),
        })]
    }

    fn accept(&mut self, clean: bool) -> Vec<Effect> {
        if self.session.decision != Decision::Undecided {
            debug!(decision = ?self.session.decision, "accept ignored: already decided");
            return Vec::new();
        }
        let Some(suggestion) = self.session.suggestion.as_deref() else {
            debug!("accept ignored: no suggestion");
            return Vec::new();
        };
        let code = if clean {
            strip(suggestion)
        } else {
            suggestion.to_owned()
        };
        self.session.decision = Decision::Accepted;
        self.edit(code)
    }

    fn reject(&mut self) -> Vec<Effect> {
        if self.session.decision != Decision::Undecided {
            debug!(decision = ?self.session.decision, "reject ignored: already decided");
            return Vec::new();
        }
        self.session.decision = Decision::Rejected;
        Vec::new()
    }

    fn language_detected(&mut self, result: Result<LanguageTag, AnalysisError>) -> Vec<Effect> {
        if !self.session.pending.remove(PendingOp::DetectingLanguage) {
            warn!("language detection result with no detection pending");
            return Vec::new();
        }
        match result {
            Ok(raw) => {
                let tag = LanguageTag::from_detected(raw.as_str());
                debug!(language = %tag, "language detected");
                self.session.detected_language = Some(tag);
            }
            Err(e) => debug!(error = %e, "keeping previous language"),
        }
        Vec::new()
    }

    fn suggestion_fetched(&mut self, result: Result<String, AnalysisError>) -> Vec<Effect> {
        let original = match std::mem::take(&mut self.suggestion_phase) {
            SuggestionPhase::Fetching { original } => original,
            other => {
                self.suggestion_phase = other;
                warn!("suggestion result with no fetch pending");
                return Vec::new();
            }
        };

        let text = match result {
            Ok(text) => text,
            Err(e) => format!("Error: {e}"),
        };

        self.session.suggestion = Some(text.clone());
        self.suggestion_phase = SuggestionPhase::Scoring;
        vec![Effect::Remote(RemoteCall::ScoreSimilarity {
            original,
            corrected: text,
        })]
    }

    fn similarity_scored(&mut self, result: Result<f64, AnalysisError>) -> Vec<Effect> {
        if self.suggestion_phase != SuggestionPhase::Scoring {
            warn!("similarity result with no scoring pending");
            return Vec::new();
        }
        match result {
            Ok(score) if self.session.suggestion.as_deref().is_some_and(|s| !s.is_empty()) => {
                self.session.similarity_score = Some(score.clamp(0.0, 100.0));
            }
            Ok(_) => {}
            Err(e) => debug!(error = %e, "leaving similarity score absent"),
        }
        self.finish_suggestion();
        Vec::new()
    }

    fn finish_suggestion(&mut self) {
        self.suggestion_phase = SuggestionPhase::Idle;
        self.session.pending.remove(PendingOp::FetchingSuggestion);
    }

    fn syntax_checked(&mut self, result: Result<Vec<String>, AnalysisError>) -> Vec<Effect> {
        if !self.session.pending.remove(PendingOp::CheckingSyntax) {
            warn!("syntax check result with no check pending");
            return Vec::new();
        }
        let messages = match result {
            Ok(messages) => messages,
            Err(e) => vec![format!("Failed to check syntax: {e}")],
        };
        self.session.diagnostics = diagnostics::map(&messages);
        info!(count = self.session.diagnostics.len(), "syntax check finished");

        let mut effects = Vec::with_capacity(self.session.diagnostics.len() + 1);
        effects.push(Effect::Annotate(AnnotationEvent::ClearAll));
        effects.extend(self.session.diagnostics.iter().map(|d| {
            Effect::Annotate(AnnotationEvent::Add {
                line: d.line,
                message: d.raw_message.clone(),
                severity: d.severity,
            })
        }));
        effects
    }
}
