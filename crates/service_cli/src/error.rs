//! CLI error types

use adapter_backend::BackendError;
use report_pipeline::PipelineError;
use thiserror::Error;

use crate::config::ConfigError;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Some reports did not make it through; details were already printed
    #[error("{failed} of {total} report(s) not {action}")]
    Incomplete {
        action: &'static str,
        failed: usize,
        total: usize,
    },
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
