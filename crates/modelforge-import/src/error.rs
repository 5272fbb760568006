use thiserror::Error;

/// Reasons an import is rejected as a whole.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The DDL contains a statement other than `CREATE TABLE`.
    #[error("only CREATE TABLE statements are supported, found: {0}")]
    UnsupportedStatement(String),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    /// The JSON document has no recognizable entity list.
    #[error("unsupported schema shape: {0}")]
    UnsupportedShape(String),
    #[error("invalid parser pattern: {0}")]
    Pattern(String),
}

/// Result type for import operations.
pub type Result<T> = std::result::Result<T, ImportError>;
