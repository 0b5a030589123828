//! Error types for Aurora

use thiserror::Error;

/// Result type alias for Aurora operations
pub type Result<T> = std::result::Result<T, AuroraError>;

/// Main error type for Aurora
#[derive(Error, Debug)]
pub enum AuroraError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid intent: {0}")]
    InvalidIntent(String),

    #[error("Intent not found: {0}")]
    NotFound(String),

    #[error("Corpus has no indexable patterns")]
    EmptyCorpus,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Chat worker is no longer running")]
    WorkerClosed,
}

impl AuroraError {
    /// Whether the error means state on disk may not reflect memory
    pub fn is_persistence_failure(&self) -> bool {
        matches!(self, AuroraError::Io(_) | AuroraError::Serialization(_))
    }
}
