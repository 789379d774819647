//! Error types for RAGQuery

use thiserror::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised anywhere in the query pipeline.
///
/// Every stage failure aborts the in-flight query and surfaces as exactly one
/// of these variants; nothing is retried inside the core.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Vector index error: {0}")]
    VectorIndex(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// How a boundary layer should present an [`Error`] to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The caller can fix the request (unknown collection, bad input).
    Client,
    /// A backend failed; the same request may succeed later.
    Transient,
    /// The process is misconfigured.
    Fatal,
}

impl Error {
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::CollectionNotFound(_) | Error::Validation(_) => ErrorClass::Client,
            Error::EmbeddingUnavailable(_)
            | Error::GenerationFailed(_)
            | Error::VectorIndex(_) => ErrorClass::Transient,
            Error::Configuration(_) => ErrorClass::Fatal,
        }
    }

    /// True for conditions the caller can correct by changing the request
    pub fn is_client_error(&self) -> bool {
        self.class() == ErrorClass::Client
    }

    /// True for backend failures worth retrying later
    pub fn is_retryable(&self) -> bool {
        self.class() == ErrorClass::Transient
    }
}
