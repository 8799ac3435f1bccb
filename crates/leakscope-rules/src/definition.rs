//! Detection rule types and structures.
//!
//! This module defines the serialized form of a detection rule as it
//! appears in TOML rule packs, and the compiled form the classifier runs.

use crate::error::{Result, RuleError};
use leakscope_core::{ClassifyConfig, RiskLevel};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// One detection rule as written in a rule pack.
///
/// `min_match_length` and `entropy_threshold` are optional; rules that
/// omit them inherit the configured defaults at compile time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDefinition {
    /// Human-readable rule name, used as the finding type
    pub name: String,

    /// Regular expression source; compiled case-insensitively
    pub pattern: String,

    /// Severity a match carries
    pub risk: RiskLevel,

    /// Minimum matched-value length for this rule (defaults from config)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_match_length: Option<usize>,

    /// Entropy gate in bits/char for this rule (defaults from config)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entropy_threshold: Option<f64>,
}

impl RuleDefinition {
    /// Validate the definition for completeness and sane values.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(RuleError::ValidationError {
                rule: "<unnamed>".to_string(),
                reason: "rule name cannot be empty".to_string(),
            });
        }

        if self.pattern.is_empty() {
            return Err(RuleError::ValidationError {
                rule: self.name.clone(),
                reason: "pattern cannot be empty".to_string(),
            });
        }

        if self.min_match_length == Some(0) {
            return Err(RuleError::ValidationError {
                rule: self.name.clone(),
                reason: "min_match_length must be at least 1".to_string(),
            });
        }

        if let Some(threshold) = self.entropy_threshold {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(RuleError::ValidationError {
                    rule: self.name.clone(),
                    reason: format!(
                        "entropy_threshold must be a non-negative finite number, got {threshold}"
                    ),
                });
            }
        }

        Ok(())
    }

    /// Validate and compile into a runnable [`DetectionRule`].
    ///
    /// # Errors
    /// Returns error if validation fails or the pattern does not compile.
    pub fn compile(&self, defaults: &ClassifyConfig) -> Result<DetectionRule> {
        self.validate()?;

        let pattern = RegexBuilder::new(&self.pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| RuleError::InvalidPattern {
                rule: self.name.clone(),
                source: e,
            })?;

        Ok(DetectionRule {
            name: self.name.clone(),
            pattern,
            risk: self.risk,
            min_match_length: self.min_match_length.unwrap_or(defaults.min_match_length),
            entropy_threshold: self
                .entropy_threshold
                .unwrap_or(defaults.entropy_threshold),
        })
    }
}

/// One compiled, immutable detection rule.
#[derive(Debug, Clone)]
pub struct DetectionRule {
    /// Rule name, used as the finding type
    pub name: String,
    /// Compiled case-insensitive pattern
    pub pattern: Regex,
    /// Severity a match carries
    pub risk: RiskLevel,
    /// Minimum matched-value length in characters
    pub min_match_length: usize,
    /// Entropy gate in bits per character
    pub entropy_threshold: f64,
}
