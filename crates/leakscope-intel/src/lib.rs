//! Secondary intelligence via public code search.
//!
//! Complements browser-based dork discovery with hits from public
//! repositories: leak-prone keywords are queried against the GitHub
//! code-search API, scoped to the target domain, and mapped to
//! risk-ranked hits for the scan engine to record.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod github;

pub use error::{IntelError, Result};
pub use github::GithubCodeSearch;
