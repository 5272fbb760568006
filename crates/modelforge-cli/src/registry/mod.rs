//! Run directories: one `<timestamp>__run_<uuid>` folder per import or
//! validation, holding its config, logs and output.

mod logging;
mod run;

pub use logging::init_run_logging;
pub use run::{RunContext, RunPaths, start_run, write_project, write_report};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to write run artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode run artifact: {0}")]
    Json(#[from] serde_json::Error),
    /// The configured log level is not a valid filter directive.
    #[error("invalid log filter '{0}'")]
    LogFilter(String),
    #[error("failed to install run logger: {0}")]
    Logging(String),
    #[error("invalid output path: {0}")]
    InvalidPath(String),
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
