//! Error types for generation, storage, and the two service operations.

use thiserror::Error;

/// Failure of a chat completion call or of parsing its output.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("chat completion request failed: {0}")]
    Request(String),

    #[error("chat completion API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("chat completion returned no content")]
    EmptyCompletion,

    #[error("completion is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("completion JSON is not an array")]
    NotAnArray,

    #[error("completion element {index} does not match the expected schema: {source}")]
    Validation {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure of a store statement.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid session id: {0:?}")]
    InvalidSessionId(String),
}

/// Failure of the session analysis operation.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid analysis request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Failure of the dashboard operation.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Store(#[from] StoreError),
}
