//! Bridges between concrete providers and the engine's collaborator traits.
//!
//! The engine only knows its trait seams; these adapters wrap the
//! browser and code-search clients and translate their error types
//! into the engine's taxonomy.

use async_trait::async_trait;
use leakscope_browser::{BrowserError, SearchBrowser};
use leakscope_core::{CodeHit, PageContent, RiskLevel, SearchHit, TargetDomain};
use leakscope_engine::{
    CodeIntelSource, ContentFetcher, Discoverer, EvidenceCapture, FetchError, ScanError,
};
use leakscope_intel::{GithubCodeSearch, IntelError};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Wait imposed on the whole scan when the search engine serves an
/// interstitial instead of results.
const BLOCK_BACKOFF: Duration = Duration::from_secs(60);

/// Search-engine discovery through the automated browser.
pub struct BrowserDiscoverer {
    browser: Arc<SearchBrowser>,
}

impl BrowserDiscoverer {
    pub fn new(browser: Arc<SearchBrowser>) -> Self {
        Self { browser }
    }
}

#[async_trait]
impl Discoverer for BrowserDiscoverer {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ScanError> {
        self.browser
            .search(query)
            .await
            .map_err(map_discovery_error)
    }
}

/// Page text retrieval through the automated browser.
pub struct BrowserFetcher {
    browser: Arc<SearchBrowser>,
    timeout: Duration,
}

impl BrowserFetcher {
    pub fn new(browser: Arc<SearchBrowser>, timeout: Duration) -> Self {
        Self { browser, timeout }
    }
}

#[async_trait]
impl ContentFetcher for BrowserFetcher {
    async fn fetch(&self, url: &str) -> Result<PageContent, FetchError> {
        self.browser
            .fetch_text(url)
            .await
            .map_err(|err| map_fetch_error(err, self.timeout))
    }
}

/// Evidence screenshots through the automated browser.
pub struct BrowserEvidence {
    browser: Arc<SearchBrowser>,
}

impl BrowserEvidence {
    pub fn new(browser: Arc<SearchBrowser>) -> Self {
        Self { browser }
    }
}

#[async_trait]
impl EvidenceCapture for BrowserEvidence {
    async fn capture(&self, url: &str, risk: RiskLevel) -> Result<PathBuf, ScanError> {
        self.browser
            .capture_evidence(url, risk)
            .await
            .map_err(|err| ScanError::Evidence(err.to_string()))
    }
}

/// GitHub code search as the engine's secondary intelligence source.
pub struct GithubIntel {
    client: GithubCodeSearch,
}

impl GithubIntel {
    pub fn new(client: GithubCodeSearch) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CodeIntelSource for GithubIntel {
    fn keywords(&self) -> Vec<String> {
        self.client.keywords()
    }

    async fn search_code(
        &self,
        keyword: &str,
        target: &TargetDomain,
    ) -> Result<Vec<CodeHit>, ScanError> {
        self.client
            .search_code(keyword, target)
            .await
            .map_err(map_intel_error)
    }
}

/// A blocked search surfaces as rate limiting so the orchestrator backs
/// off instead of burning the remaining queries against an interstitial.
fn map_discovery_error(err: BrowserError) -> ScanError {
    match err {
        BrowserError::Blocked(_) => ScanError::RateLimited {
            provider: "google".to_string(),
            retry_after: BLOCK_BACKOFF,
        },
        other => ScanError::Discovery(other.to_string()),
    }
}

fn map_fetch_error(err: BrowserError, timeout: Duration) -> FetchError {
    match err {
        BrowserError::Timeout(_) => FetchError::Timeout(timeout),
        other => FetchError::Network(other.to_string()),
    }
}

fn map_intel_error(err: IntelError) -> ScanError {
    match err {
        IntelError::RateLimited {
            provider,
            retry_after,
        } => ScanError::RateLimited {
            provider,
            retry_after,
        },
        IntelError::Api {
            provider,
            status,
            message,
        } => ScanError::Api {
            provider,
            status,
            message,
        },
        IntelError::AuthenticationFailed { provider, message } => ScanError::Api {
            provider,
            status: 401,
            message,
        },
        other => ScanError::Api {
            provider: "github".to_string(),
            status: 0,
            message: other.to_string(),
        },
    }
}
