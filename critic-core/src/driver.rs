//! Executes remote calls against an [`AnalysisClient`] and feeds the outcomes back.

use std::collections::VecDeque;

use tracing::debug;

use crate::client::AnalysisClient;
use crate::controller::{AnnotationEvent, Completion, Controller, Effect, Intent, RemoteCall};

/// Performs one remote call. Never fails: errors travel inside the [`Completion`].
pub async fn execute(call: RemoteCall, client: &dyn AnalysisClient) -> Completion {
    debug!(call = call.kind(), "executing remote call");
    match call {
        RemoteCall::DetectLanguage { code } => {
            Completion::LanguageDetected(client.detect_language(&code).await)
        }
        RemoteCall::FetchSuggestion { code, language } => {
            Completion::SuggestionFetched(client.fetch_suggestion(&code, &language).await)
        }
        RemoteCall::ScoreSimilarity { original, corrected } => {
            Completion::SimilarityScored(client.score_similarity(&original, &corrected).await)
        }
        RemoteCall::CheckSyntax { code, language } => {
            Completion::SyntaxChecked(client.check_syntax(&code, &language).await)
        }
    }
}

/// Runs `effects` to quiescence, one remote call at a time in emission order.
///
/// Returns the annotation events produced along the way, in order.
pub async fn settle(
    controller: &mut Controller,
    client: &dyn AnalysisClient,
    effects: Vec<Effect>,
) -> Vec<AnnotationEvent> {
    let mut queue: VecDeque<Effect> = effects.into();
    let mut annotations = Vec::new();
    while let Some(effect) = queue.pop_front() {
        match effect {
            Effect::Remote(call) => {
                let completion = execute(call, client).await;
                queue.extend(controller.complete(completion));
            }
            Effect::Annotate(event) => annotations.push(event),
        }
    }
    annotations
}

/// Applies `intent` and settles everything it triggers.
pub async fn dispatch(
    controller: &mut Controller,
    client: &dyn AnalysisClient,
    intent: Intent,
) -> Vec<AnnotationEvent> {
    let effects = controller.handle(intent);
    settle(controller, client, effects).await
}
