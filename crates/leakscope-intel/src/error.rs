//! Error types for code-search intelligence.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while querying a code-search provider.
#[derive(Error, Debug)]
pub enum IntelError {
    /// API error with status code
    #[error("API error ({provider}): status {status}, {message}")]
    Api {
        /// Provider name
        provider: String,
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Rate limit exceeded; retry after the given delay
    #[error("rate limited by {provider}, retry after {retry_after:?}")]
    RateLimited {
        /// Provider name
        provider: String,
        /// Wait suggested by the provider, or a fallback
        retry_after: Duration,
    },

    /// Invalid or missing credential
    #[error("authentication failed for {provider}: {message}")]
    AuthenticationFailed {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response parsing error
    #[error("failed to parse response from {provider}: {message}")]
    Parse {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },
}

/// Result type alias for intelligence operations.
pub type Result<T> = std::result::Result<T, IntelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IntelError::Api {
            provider: "github".to_string(),
            status: 422,
            message: "Validation Failed".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API error (github): status 422, Validation Failed"
        );
    }

    #[test]
    fn test_rate_limited_display() {
        let err = IntelError::RateLimited {
            provider: "github".to_string(),
            retry_after: Duration::from_secs(60),
        };
        assert_eq!(err.to_string(), "rate limited by github, retry after 60s");
    }
}
