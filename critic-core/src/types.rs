use std::fmt;

use serde::{Deserialize, Serialize};

/// Tag sent to the analysis service when nothing has been detected yet.
pub const PLAINTEXT: &str = "plaintext";

/// A language identifier as understood by the analysis service and the editor
/// highlighter, e.g. `"python"`, `"java"`, `"cpp"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageTag(String);

impl LanguageTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Maps a tag returned by the detection service to the tag shown in the editor.
    ///
    /// The service reports plain C as `"c"`; the editor highlights it with the C++
    /// grammar, so `"c"` becomes `"cpp"`. Every other tag passes through unchanged.
    pub fn from_detected(raw: &str) -> Self {
        match raw {
            "c" => Self::new("cpp"),
            other => Self::new(other),
        }
    }

    pub fn plaintext() -> Self {
        Self::new(PLAINTEXT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File extension used to pick a syntax definition for highlighting.
    pub fn file_extension(&self) -> &str {
        match self.0.as_str() {
            "python" => "py",
            "java" => "java",
            "c" => "c",
            "cpp" => "cpp",
            _ => "txt",
        }
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The user's verdict on the current suggestion.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    #[default]
    Undecided,
    Accepted,
    Rejected,
}

impl Decision {
    pub fn label(self) -> Option<&'static str> {
        match self {
            Decision::Undecided => None,
            Decision::Accepted => Some("Accepted"),
            Decision::Rejected => Some("Rejected"),
        }
    }
}

/// Kinds of asynchronous work that can be in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PendingOp {
    DetectingLanguage,
    FetchingSuggestion,
    CheckingSyntax,
}

/// The pending set.
///
/// Detection is counted rather than flagged: overlapping edits each start their own
/// request, and `DetectingLanguage` stays pending until the last one settles.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Pending {
    detections: usize,
    fetching_suggestion: bool,
    checking_syntax: bool,
}

impl Pending {
    pub fn contains(&self, op: PendingOp) -> bool {
        match op {
            PendingOp::DetectingLanguage => self.detections > 0,
            PendingOp::FetchingSuggestion => self.fetching_suggestion,
            PendingOp::CheckingSyntax => self.checking_syntax,
        }
    }

    /// True while either user-initiated action is running.
    pub fn is_busy(&self) -> bool {
        self.fetching_suggestion || self.checking_syntax
    }

    pub fn is_empty(&self) -> bool {
        self.detections == 0 && !self.is_busy()
    }

    pub fn insert(&mut self, op: PendingOp) {
        match op {
            PendingOp::DetectingLanguage => self.detections += 1,
            PendingOp::FetchingSuggestion => self.fetching_suggestion = true,
            PendingOp::CheckingSyntax => self.checking_syntax = true,
        }
    }

    /// Removes one occurrence of `op`. Returns `false` if it was not pending.
    pub fn remove(&mut self, op: PendingOp) -> bool {
        let was = self.contains(op);
        match op {
            PendingOp::DetectingLanguage => self.detections = self.detections.saturating_sub(1),
            PendingOp::FetchingSuggestion => self.fetching_suggestion = false,
            PendingOp::CheckingSyntax => self.checking_syntax = false,
        }
        was
    }

    pub fn iter(&self) -> impl Iterator<Item = PendingOp> + '_ {
        [
            PendingOp::DetectingLanguage,
            PendingOp::FetchingSuggestion,
            PendingOp::CheckingSyntax,
        ]
        .into_iter()
        .filter(|op| self.contains(*op))
    }
}

/// Severity of a diagnostic. The syntax-check contract only ever yields errors.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    #[default]
    Error,
}

/// One line-anchored syntax-check finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub raw_message: String,
    /// 1-based line number.
    pub line: u32,
    pub severity: Severity,
}

/// Transient outcome of a suggestion fetch plus its similarity score.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionResult {
    pub suggestion_text: String,
    pub similarity_score: Option<f64>,
}

/// The single live unit of workflow state.
///
/// Owned by the [`Controller`](crate::controller::Controller); read-only to everyone else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub code: String,
    pub detected_language: Option<LanguageTag>,
    pub suggestion: Option<String>,
    /// Similarity between the original code and the suggestion, in `[0, 100]`.
    pub similarity_score: Option<f64>,
    pub decision: Decision,
    pub diagnostics: Vec<Diagnostic>,
    pub pending: Pending,
}

impl Session {
    /// Language tag to send with requests that need one.
    pub fn request_language(&self) -> LanguageTag {
        self.detected_language
            .clone()
            .unwrap_or_else(LanguageTag::plaintext)
    }

    pub fn suggestion_result(&self) -> Option<SuggestionResult> {
        self.suggestion.as_ref().map(|text| SuggestionResult {
            suggestion_text: text.clone(),
            similarity_score: self.similarity_score,
        })
    }
}
