//! Error types for the agora service shell.

/// Top-level error type for the search service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Configuration file missing, unreadable, or invalid.
    #[error("config error: {0}")]
    Config(String),

    /// Aggregation engine error (validation, configuration).
    #[error("engine error: {0}")]
    Engine(#[from] agora_search::SearchError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ServiceError>;
