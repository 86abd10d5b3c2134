//! Error types for the agora-search crate.
//!
//! All errors use stable string messages suitable for display to callers
//! and programmatic handling. Source-level failures (HTTP, parse, timeout)
//! are recovered inside the orchestrator and never reach the caller; only
//! validation and configuration errors cross the crate boundary.

/// Errors that can occur during federated search operations.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The caller's request is malformed (empty query, zero limit).
    #[error("invalid request: {0}")]
    Validation(String),

    /// Invalid engine configuration.
    #[error("config error: {0}")]
    Config(String),

    /// An HTTP request to a product source failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A source response could not be parsed into items.
    #[error("parse error: {0}")]
    Parse(String),

    /// A source did not answer within the request deadline.
    #[error("source timed out: {0}")]
    Timeout(String),
}

/// Convenience type alias for agora-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
