//! GitHub code-search API client.

use crate::error::{IntelError, Result};
use leakscope_core::{CodeHit, RiskLevel, TargetDomain};
use reqwest::header::{HeaderMap, ACCEPT, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const API_URL: &str = "https://api.github.com/search/code";
const PROVIDER: &str = "github";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Fallback wait when GitHub rate-limits without a Retry-After header.
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Keywords probed against a target and the risk a match carries.
const KEYWORD_RISKS: [(&str, RiskLevel); 4] = [
    ("password", RiskLevel::High),
    ("secret", RiskLevel::High),
    ("apikey", RiskLevel::Medium),
    ("api_key", RiskLevel::Medium),
];

/// Client for the GitHub code-search API.
///
/// Searches public repositories for leak-prone keywords scoped to a
/// target domain. Works unauthenticated, but GitHub rations anonymous
/// code search heavily; a personal access token raises the quota.
pub struct GithubCodeSearch {
    client: Client,
    token: Option<String>,
}

impl GithubCodeSearch {
    /// Create a client, optionally authenticated with a token.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("leakscope/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, token })
    }

    /// Keywords this source probes, in query order.
    pub fn keywords(&self) -> Vec<String> {
        KEYWORD_RISKS.iter().map(|(k, _)| (*k).to_string()).collect()
    }

    /// Search public code for `keyword` mentioned alongside the target domain.
    pub async fn search_code(&self, keyword: &str, target: &TargetDomain) -> Result<Vec<CodeHit>> {
        let risk = keyword_risk(keyword);
        let query = format!("{keyword} \"{}\"", target.as_str());
        debug!(keyword, query, "querying code search");

        let mut request = self
            .client
            .get(API_URL)
            .query(&[("q", query.as_str())])
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS
            || (status == StatusCode::FORBIDDEN && quota_exhausted(response.headers()))
        {
            let retry_after = parse_retry_after(response.headers()).unwrap_or(DEFAULT_RETRY_AFTER);
            return Err(IntelError::RateLimited {
                provider: PROVIDER.to_string(),
                retry_after,
            });
        }

        if status == StatusCode::UNAUTHORIZED {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(IntelError::AuthenticationFailed {
                provider: PROVIDER.to_string(),
                message,
            });
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(IntelError::Api {
                provider: PROVIDER.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let body: SearchResponse = response.json().await.map_err(|e| IntelError::Parse {
            provider: PROVIDER.to_string(),
            message: format!("Failed to parse response: {e}"),
        })?;

        let hits: Vec<CodeHit> = body
            .items
            .into_iter()
            .map(|item| CodeHit {
                url: item.html_url,
                risk,
            })
            .collect();
        debug!(keyword, count = hits.len(), "code search returned");
        Ok(hits)
    }
}

/// Risk carried by each probe keyword; unknown keywords rank LOW.
fn keyword_risk(keyword: &str) -> RiskLevel {
    KEYWORD_RISKS
        .iter()
        .find(|(k, _)| *k == keyword)
        .map_or(RiskLevel::Low, |(_, r)| *r)
}

/// GitHub signals primary-quota exhaustion with 403 plus these headers.
fn quota_exhausted(headers: &HeaderMap) -> bool {
    headers.contains_key(RETRY_AFTER)
        || headers
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim() == "0")
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

// GitHub API types

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    html_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_keyword_risks() {
        assert_eq!(keyword_risk("password"), RiskLevel::High);
        assert_eq!(keyword_risk("secret"), RiskLevel::High);
        assert_eq!(keyword_risk("apikey"), RiskLevel::Medium);
        assert_eq!(keyword_risk("api_key"), RiskLevel::Medium);
        assert_eq!(keyword_risk("certificate"), RiskLevel::Low);
    }

    #[test]
    fn test_keyword_order() {
        let source = GithubCodeSearch::new(None).unwrap();
        assert_eq!(source.keywords(), ["password", "secret", "apikey", "api_key"]);
    }

    #[test]
    fn test_parse_retry_after() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("120"));
        assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(120)));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("soon"));
        assert_eq!(parse_retry_after(&headers), None);

        assert_eq!(parse_retry_after(&HeaderMap::new()), None);
    }

    #[test]
    fn test_quota_exhausted() {
        let mut headers = HeaderMap::new();
        assert!(!quota_exhausted(&headers));

        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("42"));
        assert!(!quota_exhausted(&headers));

        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
        assert!(quota_exhausted(&headers));

        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("30"));
        assert!(quota_exhausted(&headers));
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{
            "total_count": 2,
            "incomplete_results": false,
            "items": [
                {"name": "config.py", "html_url": "https://github.com/acme/app/blob/main/config.py"},
                {"name": ".env.sample", "html_url": "https://github.com/acme/app/blob/main/.env.sample"}
            ]
        }"#;

        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(
            parsed.items[0].html_url,
            "https://github.com/acme/app/blob/main/config.py"
        );
    }

    #[test]
    fn test_response_parsing_without_items() {
        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.items.is_empty());
    }
}
