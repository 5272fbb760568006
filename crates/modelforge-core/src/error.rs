use thiserror::Error;

/// Core error type shared across modelforge crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The document is not a project model.
    #[error("invalid project json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results returned by modelforge crates.
pub type Result<T> = std::result::Result<T, Error>;
