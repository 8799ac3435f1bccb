//! Error types for the scan engine.

use leakscope_core::ConfigError;
use leakscope_rules::RuleError;
use std::time::Duration;
use thiserror::Error;

/// Errors that can abort or degrade a scan.
///
/// Startup problems (`Config`, `Rules`) are fatal and surface before any
/// network traffic. Everything else is raised per query or per URL and
/// handled by the orchestrator without tearing the session down.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Invalid configuration detected before the scan started.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A rule pack failed to load or validate.
    #[error("Rule error: {0}")]
    Rules(#[from] RuleError),

    /// The search provider failed for a query.
    #[error("Discovery failed: {0}")]
    Discovery(String),

    /// A provider told us to slow down.
    #[error("Rate limited by {provider}, retry after {retry_after:?}")]
    RateLimited {
        /// Provider name
        provider: String,
        /// Wait suggested by the provider, or a fallback
        retry_after: Duration,
    },

    /// A remote API rejected the request outright.
    #[error("{provider} API error (HTTP {status}): {message}")]
    Api {
        /// Provider name
        provider: String,
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Evidence capture failed for a finding.
    #[error("Evidence capture failed: {0}")]
    Evidence(String),

    /// Filesystem error while writing the report or evidence.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Report serialization failed.
    #[error("Report serialization failed: {0}")]
    Report(#[from] serde_json::Error),
}

/// Errors raised while fetching a single candidate URL.
///
/// These never abort the scan. The orchestrator logs the URL and moves on.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Page did not load within the configured deadline.
    #[error("Page load timed out after {0:?}")]
    Timeout(Duration),

    /// Navigation or transport failure.
    #[error("Network error: {0}")]
    Network(String),

    /// Content exceeded the classification ceiling.
    #[error("Content too large: {chars} chars (limit {limit})")]
    TooLarge {
        /// Characters in the fetched body
        chars: usize,
        /// Configured ceiling
        limit: usize,
    },

    /// Content type is not classifiable text.
    #[error("Unsupported content type: {0}")]
    UnsupportedType(String),
}

/// Result type for scan operations.
pub type Result<T> = std::result::Result<T, ScanError>;
