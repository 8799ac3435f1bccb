//! Collaborator traits the orchestrator drives.
//!
//! The engine owns these seams; concrete providers (the automated browser,
//! the code-search client) live in their own crates and are wired in by the
//! binary. All implementations must be thread-safe (`Send + Sync`) for use
//! behind `Arc<dyn _>` in async contexts.

use crate::error::{FetchError, ScanError};
use crate::progress::ProgressSnapshot;
use async_trait::async_trait;
use leakscope_core::{CodeHit, Finding, PageContent, RiskLevel, SearchHit, TargetDomain};
use std::path::PathBuf;

/// Search-engine discovery: turns one query into candidate result rows.
#[async_trait]
pub trait Discoverer: Send + Sync {
    /// Run one search query and return its result rows.
    ///
    /// # Errors
    /// Returns `ScanError::Discovery` when the provider fails, or
    /// `ScanError::RateLimited` when the engine is being throttled.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ScanError>;
}

/// Retrieves the rendered text of one candidate URL.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch a URL and return its declared type and rendered text.
    ///
    /// # Errors
    /// All failures are per-URL (`Timeout`, `Network`, `TooLarge`,
    /// `UnsupportedType`); the orchestrator logs and skips, never aborts.
    async fn fetch(&self, url: &str) -> Result<PageContent, FetchError>;
}

/// Captures visual evidence of a confirmed exposure.
#[async_trait]
pub trait EvidenceCapture: Send + Sync {
    /// Capture evidence for the page currently associated with `url`.
    ///
    /// Invoked only for findings at `High` severity or above. Returns the
    /// path the evidence was saved to.
    ///
    /// # Errors
    /// Returns `ScanError::Evidence` on capture failure; the finding is then
    /// recorded without an evidence path.
    async fn capture(&self, url: &str, risk: RiskLevel) -> Result<PathBuf, ScanError>;
}

/// Secondary intelligence source searching public code for target mentions.
#[async_trait]
pub trait CodeIntelSource: Send + Sync {
    /// Keywords this source will query, in query order.
    ///
    /// Used for step planning before the scan starts.
    fn keywords(&self) -> Vec<String>;

    /// Search code for one keyword scoped to the target domain.
    ///
    /// Hits come back pre-classified; the keyword determines the risk.
    ///
    /// # Errors
    /// Returns `ScanError::RateLimited` with the provider's retry hint when
    /// throttled, `ScanError::Api` on other rejections.
    async fn search_code(
        &self,
        keyword: &str,
        target: &TargetDomain,
    ) -> Result<Vec<CodeHit>, ScanError>;
}

/// Presentation hook for live scan output.
///
/// The engine never prints; the CLI renders queries, findings, and the
/// progress bar through this trait. All methods default to no-ops.
pub trait ScanObserver: Send + Sync {
    /// A query is about to run (`step` is 1-based within `total`).
    fn on_query(&self, category: &str, query: &str, step: usize, total: usize) {
        let _ = (category, query, step, total);
    }

    /// A finding was just recorded.
    fn on_finding(&self, finding: &Finding) {
        let _ = finding;
    }

    /// A planned step finished.
    fn on_progress(&self, snapshot: &ProgressSnapshot) {
        let _ = snapshot;
    }
}

/// Observer that renders nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ScanObserver for NoopObserver {}
