//! Error types for the detection-rule subsystem.

use thiserror::Error;

/// Errors that can occur while building the rule set.
///
/// Every variant here is a startup failure: a scan never begins with a
/// rule set that failed to load, parse, or compile.
#[derive(Error, Debug)]
pub enum RuleError {
    /// Failed to read a rule pack from disk
    #[error("failed to load rule pack from {path}: {source}")]
    LoadError {
        /// Path to the rule pack file
        path: String,
        /// Underlying error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse rule pack TOML
    #[error("failed to parse rule pack TOML in {path}: {source}")]
    ParseError {
        /// Path to the rule pack file
        path: String,
        /// TOML parse error
        #[source]
        source: toml::de::Error,
    },

    /// Invalid rule definition (validation failed)
    #[error("invalid detection rule '{rule}': {reason}")]
    ValidationError {
        /// Rule name being validated
        rule: String,
        /// Reason for validation failure
        reason: String,
    },

    /// Rule pattern failed to compile
    #[error("malformed pattern in detection rule '{rule}': {source}")]
    InvalidPattern {
        /// Rule name whose pattern failed
        rule: String,
        /// Regex compile error
        #[source]
        source: regex::Error,
    },

    /// Rule pack directory not found
    #[error("rule pack directory not found at {path}")]
    DirectoryNotFound {
        /// Expected directory path
        path: String,
    },

    /// I/O error while accessing rule packs
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for rule operations.
pub type Result<T> = std::result::Result<T, RuleError>;
