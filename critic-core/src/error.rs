use thiserror::Error;

/// Failure of a single exchange with the analysis service.
///
/// `Clone` so a failed call can travel inside a [`Completion`](crate::controller::Completion).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Transport failure, timeout, or a non-success HTTP status.
    #[error("{0}")]
    RemoteUnavailable(String),
    /// A success response without the expected fields.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}
