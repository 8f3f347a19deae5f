//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    NotFound(PathBuf),

    /// Invalid TOML syntax or an unexpected field type.
    #[error("invalid TOML in {}: {source}", path.display())]
    InvalidToml {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = ConfigError::NotFound(PathBuf::from("/path/to/branchnet.toml"));
        assert_eq!(
            err.to_string(),
            "configuration file not found: /path/to/branchnet.toml"
        );
    }

    #[test]
    fn test_invalid_display() {
        let err = ConfigError::Invalid("github.per_page must be between 1 and 100".to_string());
        assert_eq!(
            err.to_string(),
            "invalid configuration: github.per_page must be between 1 and 100"
        );
    }

    #[test]
    fn test_invalid_toml_names_file() {
        let source = toml::from_str::<toml::Value>("[network").unwrap_err();
        let err = ConfigError::InvalidToml {
            path: PathBuf::from("branchnet.toml"),
            source,
        };
        assert!(err.to_string().starts_with("invalid TOML in branchnet.toml:"));
    }
}
