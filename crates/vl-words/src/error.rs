//! Error types

use thiserror::Error;

/// Word store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("word is empty")]
    EmptyWord,

    /// Backup data rejected; the store was left unchanged
    #[error("invalid import data: {0}")]
    InvalidImport(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Translation provider errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("{provider} failed: {reason}")]
    Provider { provider: String, reason: String },

    #[error("malformed dictionary response: {0}")]
    MalformedResponse(String),
}
