//! `critic --check FILE`: one full review without a terminal UI.
//!
//! The file is loaded, its language detected, its syntax checked and a suggestion
//! fetched and scored, each settled before the next starts. Remote failures show
//! up as degraded text in the report; they never make the run fail.

use std::io::Write;

use critic_core::{driver, AnalysisClient, Controller, Intent, Session};
use tracing::info;

pub async fn run(client: &dyn AnalysisClient, code: String) -> Session {
    let mut controller = Controller::new();
    for intent in [
        Intent::FileLoaded(code),
        Intent::RequestSyntaxCheck,
        Intent::RequestSuggestion,
    ] {
        driver::dispatch(&mut controller, client, intent).await;
    }
    info!(
        diagnostics = controller.session().diagnostics.len(),
        "headless review finished"
    );
    controller.session().clone()
}

pub fn write_report(session: &Session, out: &mut impl Write) -> std::io::Result<()> {
    let language = session
        .detected_language
        .as_ref()
        .map_or_else(|| "N/A".to_owned(), |l| l.to_string());
    writeln!(out, "Language: {language}")?;

    writeln!(out, "Diagnostics: {}", session.diagnostics.len())?;
    for d in &session.diagnostics {
        writeln!(out, "  L{}: {}", d.line, d.raw_message)?;
    }

    match &session.suggestion {
        Some(text) => {
            writeln!(out, "Suggestion:")?;
            for line in text.lines() {
                writeln!(out, "  {line}")?;
            }
        }
        None => writeln!(out, "Suggestion: none")?,
    }

    match session.similarity_score {
        Some(score) => writeln!(out, "Similarity Score: {score:.2}%"),
        None => writeln!(out, "Similarity Score: N/A"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use critic_core::{AnalysisError, Diagnostic, LanguageTag, Severity};

    /// Answers every call the same way, or fails them all.
    struct FixedClient {
        up: bool,
    }

    fn down() -> AnalysisError {
        AnalysisError::RemoteUnavailable("connection refused".into())
    }

    #[async_trait]
    impl AnalysisClient for FixedClient {
        async fn detect_language(&self, _code: &str) -> Result<LanguageTag, AnalysisError> {
            if self.up {
                Ok(LanguageTag::new("c"))
            } else {
                Err(down())
            }
        }

        async fn fetch_suggestion(
            &self,
            _code: &str,
            _language: &LanguageTag,
        ) -> Result<String, AnalysisError> {
            if self.up {
                Ok("int main() { return 0; }".into())
            } else {
                Err(down())
            }
        }

        async fn score_similarity(
            &self,
            _original: &str,
            _corrected: &str,
        ) -> Result<f64, AnalysisError> {
            if self.up {
                Ok(91.5)
            } else {
                Err(down())
            }
        }

        async fn check_syntax(
            &self,
            _code: &str,
            _language: &LanguageTag,
        ) -> Result<Vec<String>, AnalysisError> {
            if self.up {
                Ok(vec!["expected ';' at line 1".into()])
            } else {
                Err(down())
            }
        }
    }

    fn report(session: &Session) -> String {
        let mut out = Vec::new();
        write_report(session, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn full_review_against_healthy_service() {
        let session = run(&FixedClient { up: true }, "int main() { return 0 }".into()).await;
        assert_eq!(session.detected_language, Some(LanguageTag::new("cpp")));
        assert_eq!(session.diagnostics.len(), 1);
        assert_eq!(session.similarity_score, Some(91.5));
        assert!(session.pending.is_empty());
        assert_eq!(
            report(&session),
            "Language: cpp\n\
             Diagnostics: 1\n  L1: expected ';' at line 1\n\
             Suggestion:\n  int main() { return 0; }\n\
             Similarity Score: 91.50%\n"
        );
    }

    #[tokio::test]
    async fn failing_service_degrades_report() {
        let session = run(&FixedClient { up: false }, "x".into()).await;
        let text = report(&session);
        assert!(text.starts_with("Language: N/A\n"));
        assert!(text.contains("L1: Failed to check syntax: connection refused"));
        assert!(text.contains("  Error: connection refused"));
        assert!(text.ends_with("Similarity Score: N/A\n"));
    }

    #[test]
    fn report_without_suggestion() {
        let session = Session {
            diagnostics: vec![Diagnostic {
                raw_message: "bad".into(),
                line: 4,
                severity: Severity::Error,
            }],
            ..Session::default()
        };
        assert_eq!(
            report(&session),
            "Language: N/A\nDiagnostics: 1\n  L4: bad\nSuggestion: none\nSimilarity Score: N/A\n"
        );
    }
}
