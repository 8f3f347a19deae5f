//! Gateway error types.

use thiserror::Error;

/// Errors raised while talking to the remote platform.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport-level failure (connection, timeout, body read).
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Unexpected HTTP status.
    #[error("{url} returned HTTP {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    /// API rate limit exhausted.
    #[error("rate limit exceeded for {url}")]
    RateLimited { url: String },

    /// Resource does not exist (or is not visible with the current credentials).
    #[error("not found: {url}")]
    NotFound { url: String },

    /// Response body could not be decoded.
    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Repository locator is neither `owner/name` nor a numeric id.
    #[error("invalid repository locator: {0}")]
    InvalidLocator(String),

    /// HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl GatewayError {
    /// Returns true if retrying the same request may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http { source, .. } => !source.is_builder(),
            Self::Status { status, .. } => *status >= 500,
            Self::RateLimited { .. } | Self::Decode { .. } => true,
            Self::NotFound { .. } | Self::InvalidLocator(_) | Self::ClientBuild(_) => false,
        }
    }

    /// Returns true if the failure only affects the single entry being fetched.
    ///
    /// Recoverable failures skip that entry; everything else aborts the run.
    /// HTTP 451 marks one repository blocked for legal reasons.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        self.is_transient()
            || matches!(
                self,
                Self::NotFound { .. } | Self::Status { status: 451, .. }
            )
    }

    /// Returns true if access to this one resource is refused (HTTP 403 or 451).
    ///
    /// Bad credentials (HTTP 401) are not included.
    #[must_use]
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::Status { status: 403 | 451, .. })
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
