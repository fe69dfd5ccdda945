//! Typed request/response wrapper around the remote analysis service.
//!
//! Every operation is one `POST` with a JSON body and a JSON reply. There is no retry:
//! a failure is returned to the caller, which decides how to degrade.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AnalysisError;
use crate::types::LanguageTag;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest slice of an error body echoed back in an error message.
const MAX_ERROR_BODY_LEN: usize = 200;

/// The four remote collaborators the workflow depends on.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Returns the raw tag reported by the service (no display remapping).
    async fn detect_language(&self, code: &str) -> Result<LanguageTag, AnalysisError>;

    async fn fetch_suggestion(
        &self,
        code: &str,
        language: &LanguageTag,
    ) -> Result<String, AnalysisError>;

    /// Similarity of `corrected` to `original`, in `[0, 100]`.
    async fn score_similarity(&self, original: &str, corrected: &str)
        -> Result<f64, AnalysisError>;

    /// Raw checker messages in the order the service reported them.
    async fn check_syntax(
        &self,
        code: &str,
        language: &LanguageTag,
    ) -> Result<Vec<String>, AnalysisError>;
}

/// Connection settings for [`HttpAnalysisClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    /// Sent as the `api_key` body field when set.
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVER_URL.to_owned(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Serialize)]
struct DetectRequest<'a> {
    code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Serialize)]
struct CodeRequest<'a> {
    code: &'a str,
    language: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Serialize)]
struct ScoreRequest<'a> {
    original: &'a str,
    corrected: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Deserialize)]
struct DetectResponse {
    language: String,
}

#[derive(Deserialize)]
struct SuggestResponse {
    suggestion: String,
}

#[derive(Deserialize)]
struct ScoreResponse {
    similarity: f64,
}

#[derive(Deserialize)]
struct SyntaxResponse {
    #[serde(default)]
    errors: Option<Vec<String>>,
}

/// [`AnalysisClient`] speaking JSON over HTTP via `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpAnalysisClient {
    /// Builds a client with the per-request timeout from `options`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteUnavailable` if the TLS backend cannot be initialised.
    pub fn new(options: ClientOptions) -> Result<Self, AnalysisError> {
        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|e| {
                AnalysisError::RemoteUnavailable(format!("HTTP client setup failed: {e}"))
            })?;
        Ok(Self {
            http,
            base_url: options.base_url.trim_end_matches('/').to_owned(),
            api_key: options.api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, AnalysisError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "analysis request");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AnalysisError::RemoteUnavailable(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AnalysisError::RemoteUnavailable(format!(
                "{path} returned {status}: {}",
                truncate(text.trim(), MAX_ERROR_BODY_LEN)
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| {
                AnalysisError::RemoteUnavailable(format!("Failed to read response: {e}"))
            })?;
        serde_json::from_slice(&bytes)
            .map_err(|e| AnalysisError::MalformedResponse(format!("{path}: {e}")))
    }
}

#[async_trait]
impl AnalysisClient for HttpAnalysisClient {
    async fn detect_language(&self, code: &str) -> Result<LanguageTag, AnalysisError> {
        let body = DetectRequest {
            code,
            api_key: self.api_key.as_deref(),
        };
        let reply: DetectResponse = self
            .post("/detect_language", &body)
            .await
            .inspect_err(|e| warn!(error = %e, "language detection failed"))?;
        Ok(LanguageTag::new(reply.language))
    }

    async fn fetch_suggestion(
        &self,
        code: &str,
        language: &LanguageTag,
    ) -> Result<String, AnalysisError> {
        let body = CodeRequest {
            code,
            language: language.as_str(),
            api_key: self.api_key.as_deref(),
        };
        let reply: SuggestResponse = self
            .post("/ml_suggest", &body)
            .await
            .inspect_err(|e| warn!(error = %e, "suggestion fetch failed"))?;
        Ok(reply.suggestion)
    }

    async fn score_similarity(
        &self,
        original: &str,
        corrected: &str,
    ) -> Result<f64, AnalysisError> {
        let body = ScoreRequest {
            original,
            corrected,
            api_key: self.api_key.as_deref(),
        };
        let reply: ScoreResponse = self
            .post("/score", &body)
            .await
            .inspect_err(|e| warn!(error = %e, "similarity scoring failed"))?;
        Ok(reply.similarity.clamp(0.0, 100.0))
    }

    async fn check_syntax(
        &self,
        code: &str,
        language: &LanguageTag,
    ) -> Result<Vec<String>, AnalysisError> {
        let body = CodeRequest {
            code,
            language: language.as_str(),
            api_key: self.api_key.as_deref(),
        };
        let reply: SyntaxResponse = self
            .post("/syntax_check", &body)
            .await
            .inspect_err(|e| warn!(error = %e, "syntax check failed"))?;
        Ok(reply.errors.unwrap_or_default())
    }
}

/// Truncates to at most `max` bytes on a char boundary.
fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, api_key: Option<&str>) -> HttpAnalysisClient {
        HttpAnalysisClient::new(ClientOptions {
            base_url: server.uri(),
            api_key: api_key.map(str::to_owned),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn detect_language_returns_raw_tag() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/detect_language"))
            .and(body_json(json!({ "code": "#include <stdio.h>" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "language": "c" })))
            .mount(&server)
            .await;

        let tag = client_for(&server, None)
            .detect_language("#include <stdio.h>")
            .await
            .unwrap();
        assert_eq!(tag.as_str(), "c");
    }

    #[tokio::test]
    async fn api_key_is_forwarded_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ml_suggest"))
            .and(body_json(json!({ "code": "x=1", "language": "python", "api_key": "k" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "suggestion": "x = 1" })),
            )
            .mount(&server)
            .await;

        let suggestion = client_for(&server, Some("k"))
            .fetch_suggestion("x=1", &LanguageTag::new("python"))
            .await
            .unwrap();
        assert_eq!(suggestion, "x = 1");
    }

    #[tokio::test]
    async fn unauthorized_is_remote_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/score"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "error": "Unauthorized" })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server, Some("wrong"))
            .score_similarity("a", "b")
            .await
            .unwrap_err();
        match err {
            AnalysisError::RemoteUnavailable(msg) => {
                assert!(msg.contains("401"), "status in message: {msg}");
                assert!(msg.contains("Unauthorized"), "body in message: {msg}");
            }
            other => panic!("expected RemoteUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_field_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/detect_language"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "lang": "python" })))
            .mount(&server)
            .await;

        let err = client_for(&server, None).detect_language("x").await.unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ml_suggest"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server, None)
            .fetch_suggestion("x", &LanguageTag::plaintext())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn similarity_is_clamped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/score"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "similarity": 104.5 })))
            .mount(&server)
            .await;

        let score = client_for(&server, None).score_similarity("a", "a").await.unwrap();
        assert_eq!(score, 100.0);
    }

    #[tokio::test]
    async fn absent_or_null_errors_mean_no_diagnostics() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/syntax_check"))
            .and(body_json(json!({ "code": "ok", "language": "python" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/syntax_check"))
            .and(body_json(json!({ "code": "ok", "language": "java" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "errors": null })))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let python = client.check_syntax("ok", &LanguageTag::new("python")).await.unwrap();
        let java = client.check_syntax("ok", &LanguageTag::new("java")).await.unwrap();
        assert!(python.is_empty());
        assert!(java.is_empty());
    }

    #[tokio::test]
    async fn syntax_errors_keep_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/syntax_check"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errors": ["line 3: bad", "line 1: worse"]
            })))
            .mount(&server)
            .await;

        let errors = client_for(&server, None)
            .check_syntax("x", &LanguageTag::new("python"))
            .await
            .unwrap();
        assert_eq!(errors, vec!["line 3: bad", "line 1: worse"]);
    }

    #[tokio::test]
    async fn unreachable_server_is_remote_unavailable() {
        let client = HttpAnalysisClient::new(ClientOptions {
            base_url: "http://127.0.0.1:9".into(),
            api_key: None,
            timeout: Duration::from_secs(2),
        })
        .unwrap();
        let err = client.detect_language("x").await.unwrap_err();
        assert!(matches!(err, AnalysisError::RemoteUnavailable(_)));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "h");
        assert_eq!(truncate("short", 200), "short");
    }

    #[test]
    fn trailing_slash_is_dropped_from_base_url() {
        let client = HttpAnalysisClient::new(ClientOptions {
            base_url: "http://localhost:5000/".into(),
            ..ClientOptions::default()
        })
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }
}
