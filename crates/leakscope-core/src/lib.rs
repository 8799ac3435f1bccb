//! LeakScope Core - Foundation crate for the LeakScope exposure scanner.
//!
//! This crate provides the shared types, error handling, and configuration
//! management that all other LeakScope crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared types (`RiskLevel`, `Finding`, `TargetDomain`, provider value objects)
//!
//! # Example
//!
//! ```rust
//! use leakscope_core::{ScanConfig, TargetDomain};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ScanConfig::default();
//! config.validate()?;
//!
//! let target = TargetDomain::new("example.com")?;
//! assert_eq!(target.as_str(), "example.com");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{
    BrowserConfig, ClassifyConfig, EvidenceConfig, FetchConfig, IntelConfig, PacingConfig,
    ReportConfig, ScanConfig,
};
pub use error::{ConfigError, ConfigResult, LeakscopeError, Result};
pub use types::{
    CodeHit, Finding, FindingSource, PageContent, RiskLevel, SearchHit, TargetDomain,
};
