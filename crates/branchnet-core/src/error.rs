//! Core error types.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Core-related errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Gateway error.
    #[error("gateway error: {0}")]
    Gateway(#[from] branchnet_github::GatewayError),

    /// Export error.
    #[error("export error: {0}")]
    Export(#[from] branchnet_export::ExportError),

    /// Checkpoint file could not be encoded or decoded.
    #[error("invalid checkpoint {path}: {source}")]
    Checkpoint {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Checkpoint belongs to another repository.
    #[error("checkpoint {path} belongs to {found}, not {expected}")]
    CheckpointMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    /// Repository has no commit on its default branch.
    #[error("repository {0} has no commits")]
    EmptyRepository(String),

    /// Overall deadline reached before the traversal completed.
    #[error("deadline of {limit:?} exceeded while mining {repository}")]
    DeadlineExceeded { repository: String, limit: Duration },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
