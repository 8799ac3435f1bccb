//! Shared types used across LeakScope.
//!
//! This module defines the vocabulary the discovery, classification, and
//! reporting layers exchange: risk levels, findings, the validated target
//! domain, and the small value objects crossing the provider boundaries.

use crate::error::LeakscopeError;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Ordinal severity classification for findings.
///
/// Variants are declared in ascending severity so the derived `Ord` ranks
/// `Critical` highest; display and reporting iterate in descending order
/// via [`RiskLevel::in_severity_order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    /// Informational observation, no direct exposure
    Info,
    /// Low-severity exposure (weakly sensitive material)
    Low,
    /// Medium-severity exposure (secrets of limited blast radius)
    Medium,
    /// High-severity exposure (keys or credentials usable directly)
    High,
    /// Critical exposure (infrastructure credentials, database access)
    Critical,
}

impl RiskLevel {
    /// All levels in fixed severity order, CRITICAL first.
    #[must_use]
    pub const fn in_severity_order() -> [RiskLevel; 5] {
        [
            Self::Critical,
            Self::High,
            Self::Medium,
            Self::Low,
            Self::Info,
        ]
    }

    /// Uppercase label matching the serialized form.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::Info => "INFO",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Origin engine that surfaced a finding's URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingSource {
    /// Search-engine dork discovery
    Google,
    /// Public code-search intelligence
    Github,
}

impl FindingSource {
    /// Lowercase name matching the serialized form.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Github => "github",
        }
    }
}

impl fmt::Display for FindingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One confirmed, risk-classified exposure tied to a specific URL.
///
/// Immutable once constructed; the session only ever appends findings.
/// Serialized field names match the report format consumed downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// URL where the exposure was observed
    pub url: String,
    /// Name of the detection rule (or intelligence kind) that fired
    #[serde(rename = "type")]
    pub kind: String,
    /// Severity classification
    pub risk: RiskLevel,
    /// Engine that discovered the URL
    pub source: FindingSource,
    /// Moment the finding was recorded
    #[serde(rename = "timestamp")]
    pub discovered_at: DateTime<Utc>,
    /// Path to captured evidence, when any was taken
    #[serde(rename = "evidence")]
    pub evidence_path: Option<PathBuf>,
}

impl Finding {
    /// Create a finding stamped with the current time and no evidence.
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        kind: impl Into<String>,
        risk: RiskLevel,
        source: FindingSource,
    ) -> Self {
        Self {
            url: url.into(),
            kind: kind.into(),
            risk,
            source,
            discovered_at: Utc::now(),
            evidence_path: None,
        }
    }

    /// Attach an evidence path.
    #[must_use]
    pub fn with_evidence(mut self, path: impl Into<PathBuf>) -> Self {
        self.evidence_path = Some(path.into());
        self
    }
}

/// Newtype for the scan target with validation.
///
/// Targets must be bare registrable domains (`example.com`, `sub.example.org`);
/// input is trimmed and lowercased before validation, and schemes or paths
/// are rejected rather than silently stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetDomain(String);

impl TargetDomain {
    /// Create a new `TargetDomain` from user input.
    ///
    /// # Errors
    /// Returns error if the input does not look like a bare domain name.
    pub fn new(domain: impl Into<String>) -> Result<Self, LeakscopeError> {
        let domain = domain
            .into()
            .trim()
            .trim_end_matches('.')
            .to_ascii_lowercase();
        Self::validate(&domain)?;
        Ok(Self(domain))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate domain format: dot-separated alphanumeric labels, no scheme.
    fn validate(domain: &str) -> Result<(), LeakscopeError> {
        static DOMAIN_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = DOMAIN_REGEX.get_or_init(|| {
            Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?(\.[a-z0-9]([a-z0-9-]*[a-z0-9])?)+$")
                .expect("valid regex")
        });

        if domain.is_empty() || domain.len() > 253 {
            return Err(LeakscopeError::Validation(format!(
                "invalid target domain: must be 1-253 characters, got {} characters",
                domain.len()
            )));
        }

        if regex.is_match(domain) {
            Ok(())
        } else {
            Err(LeakscopeError::Validation(format!(
                "invalid target domain: expected a bare domain like 'example.com', got '{domain}'"
            )))
        }
    }
}

impl fmt::Display for TargetDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One search-engine result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Result title as rendered on the results page
    pub title: String,
    /// Absolute URL the result points at
    pub link: String,
}

/// Fetched page content with its declared media type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContent {
    /// Declared media type (`document.contentType`), possibly with parameters
    pub content_type: String,
    /// Rendered text body
    pub body: String,
}

impl PageContent {
    /// Whether the declared media type indicates inspectable text.
    ///
    /// An empty declaration is treated as textual; only types that
    /// positively indicate binary content cause a skip.
    #[must_use]
    pub fn is_textual(&self) -> bool {
        let media = self
            .content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();

        if media.is_empty() || media.starts_with("text/") {
            return true;
        }

        matches!(
            media.as_str(),
            "application/json"
                | "application/javascript"
                | "application/xml"
                | "application/xhtml+xml"
                | "application/x-yaml"
                | "application/yaml"
                | "application/sql"
                | "application/x-sh"
                | "application/x-httpd-php"
        )
    }
}

/// One pre-classified hit from the secondary code-search source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeHit {
    /// URL of the matched file
    pub url: String,
    /// Risk carried by the keyword that matched it
    pub risk: RiskLevel,
}
