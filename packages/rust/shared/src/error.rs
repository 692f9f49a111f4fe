//! Error types for LeadScope.
//!
//! Library crates use [`LeadScopeError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics, and the API
//! crate maps it onto HTTP status codes.

use std::path::PathBuf;

/// Top-level error type for all LeadScope operations.
#[derive(Debug, thiserror::Error)]
pub enum LeadScopeError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Low-level HTTP/transport error talking to an external service.
    #[error("network error: {0}")]
    Network(String),

    /// URL discovery against the crawl provider failed.
    #[error("discovery failed: {0}")]
    Discovery(String),

    /// Fetching the content of a single page failed.
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// Background dispatch of a registration failed.
    #[error("dispatch error: {0}")]
    Dispatch(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Request validation error (missing fields, oversize values, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// JSON encoding/decoding error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LeadScopeError>;

impl LeadScopeError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a fetch error for one URL.
    pub fn fetch(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is a client-side input problem.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = LeadScopeError::config("missing API key");
        assert_eq!(err.to_string(), "config error: missing API key");

        let err = LeadScopeError::fetch("https://example.com/about", "no content returned");
        assert_eq!(
            err.to_string(),
            "failed to fetch https://example.com/about: no content returned"
        );

        let err = LeadScopeError::Discovery("HTTP 401 Unauthorized".into());
        assert!(err.to_string().starts_with("discovery failed"));
    }

    #[test]
    fn validation_is_classified() {
        assert!(LeadScopeError::validation("first_name is empty").is_validation());
        assert!(!LeadScopeError::Dispatch("runtime gone".into()).is_validation());
    }
}
