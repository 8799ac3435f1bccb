//! Browser automation for search discovery and page inspection.
//!
//! Drives a Chromium instance with randomized fingerprints and
//! human-paced input for dork searches, text extraction, and
//! evidence screenshots.

pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod humanize;

pub use engine::SearchBrowser;
pub use error::{BrowserError, Result};
pub use fingerprint::FingerprintConfig;
