//! Error types for faqbot.
//!
//! One enum covers every failure category in the workspace. Most of them are
//! recovered close to where they happen: a document that cannot be read turns
//! into an empty knowledge base, an extraction failure turns into an apology.

use thiserror::Error;

/// Unified error type for faqbot.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Knowledge document could not be loaded or decoded
    #[error("Document error: {0}")]
    Document(String),

    /// Embedding provider errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Answer extraction errors
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Errors talking to a local model runtime
    #[error("LLM error: {0}")]
    Llm(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
