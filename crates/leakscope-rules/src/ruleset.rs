//! Ordered, immutable rule set assembled at startup.

use crate::definition::{DetectionRule, RuleDefinition};
use crate::error::{Result, RuleError};
use leakscope_core::{ClassifyConfig, RiskLevel};
use std::collections::HashSet;

/// Ordered collection of compiled detection rules.
///
/// Rule order is evaluation order. Names are unique: the finding type is
/// the rule name, so two rules sharing one would produce indistinguishable
/// findings.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<DetectionRule>,
}

impl RuleSet {
    /// The built-in detection rules, compiled against the configured defaults.
    ///
    /// Per-rule overrides reflect what each pattern matches: the private key
    /// marker is fixed low-entropy text so its entropy gate is open, and AWS
    /// access keys are too short to clear the global 4.0 bits/char default.
    #[must_use]
    pub fn built_in(defaults: &ClassifyConfig) -> Self {
        let definitions = [
            RuleDefinition {
                name: "Private Key".to_string(),
                pattern: r"BEGIN (?:RSA|OPENSSH|EC|PGP) PRIVATE KEY".to_string(),
                risk: RiskLevel::High,
                min_match_length: Some(1),
                entropy_threshold: Some(0.0),
            },
            RuleDefinition {
                name: "AWS Access Key".to_string(),
                pattern: r"\bAKIA[0-9A-Z]{16}\b".to_string(),
                risk: RiskLevel::High,
                min_match_length: None,
                entropy_threshold: Some(3.0),
            },
            RuleDefinition {
                name: "Database Credentials".to_string(),
                pattern: r#"(?:DB_PASSWORD|DATABASE_URL)\s*=\s*['"]?[^\s'"]+"#.to_string(),
                risk: RiskLevel::Critical,
                min_match_length: None,
                entropy_threshold: None,
            },
            RuleDefinition {
                name: "Generic Password".to_string(),
                pattern: r#"password\s*[:=]\s*['"]?([^\s'"]+)"#.to_string(),
                risk: RiskLevel::Medium,
                min_match_length: Some(6),
                entropy_threshold: None,
            },
            RuleDefinition {
                name: "Generic API Key".to_string(),
                pattern: r#"(?:api[_-]?key|apikey)\s*[:=]\s*['"]?([A-Za-z0-9_\-]{16,})"#
                    .to_string(),
                risk: RiskLevel::Low,
                min_match_length: Some(16),
                entropy_threshold: Some(3.5),
            },
        ];

        let rules = definitions
            .iter()
            .map(|def| def.compile(defaults))
            .collect::<Result<Vec<_>>>()
            .expect("built-in rules are hardcoded and valid");

        Self { rules }
    }

    /// Build a rule set from definitions, validating and compiling each.
    ///
    /// # Errors
    /// Returns error on the first invalid definition, malformed pattern,
    /// or duplicate rule name.
    pub fn from_definitions(
        definitions: &[RuleDefinition],
        defaults: &ClassifyConfig,
    ) -> Result<Self> {
        let mut set = Self { rules: Vec::new() };
        set.extend_from(definitions, defaults)?;
        Ok(set)
    }

    /// Compile and append definitions onto this set.
    ///
    /// # Errors
    /// Returns error on the first invalid definition, malformed pattern,
    /// or name colliding with an already-present rule.
    pub fn extend_from(
        &mut self,
        definitions: &[RuleDefinition],
        defaults: &ClassifyConfig,
    ) -> Result<()> {
        let mut names: HashSet<&str> = self.rules.iter().map(|r| r.name.as_str()).collect();

        let mut compiled = Vec::with_capacity(definitions.len());
        for def in definitions {
            if names.contains(def.name.as_str()) {
                return Err(RuleError::ValidationError {
                    rule: def.name.clone(),
                    reason: "duplicate rule name".to_string(),
                });
            }
            compiled.push(def.compile(defaults)?);
            names.insert(def.name.as_str());
        }

        self.rules.extend(compiled);
        Ok(())
    }

    /// Number of rules in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate rules in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &DetectionRule> {
        self.rules.iter()
    }

    /// Look up a rule by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DetectionRule> {
        self.rules.iter().find(|r| r.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_in_order_and_count() {
        let set = RuleSet::built_in(&ClassifyConfig::default());
        assert_eq!(set.len(), 5);

        let names: Vec<_> = set.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Private Key",
                "AWS Access Key",
                "Database Credentials",
                "Generic Password",
                "Generic API Key"
            ]
        );
    }

    #[test]
    fn test_built_in_severities() {
        let set = RuleSet::built_in(&ClassifyConfig::default());
        assert_eq!(
            set.get("Database Credentials").expect("rule present").risk,
            RiskLevel::Critical
        );
        assert_eq!(
            set.get("Private Key").expect("rule present").risk,
            RiskLevel::High
        );
        assert_eq!(
            set.get("Generic Password").expect("rule present").risk,
            RiskLevel::Medium
        );
    }

    #[test]
    fn test_built_in_per_rule_overrides() {
        let set = RuleSet::built_in(&ClassifyConfig::default());

        let private_key = set.get("Private Key").expect("rule present");
        assert_eq!(private_key.min_match_length, 1);
        assert!(private_key.entropy_threshold.abs() < f64::EPSILON);

        let aws = set.get("AWS Access Key").expect("rule present");
        assert!((aws.entropy_threshold - 3.0).abs() < f64::EPSILON);
        assert_eq!(aws.min_match_length, 8);

        let generic_password = set.get("Generic Password").expect("rule present");
        assert_eq!(generic_password.min_match_length, 6);
        assert!((generic_password.entropy_threshold - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_built_in_follows_configured_defaults() {
        let mut defaults = ClassifyConfig::default();
        defaults.min_match_length = 10;
        defaults.entropy_threshold = 3.2;

        let set = RuleSet::built_in(&defaults);
        let db = set.get("Database Credentials").expect("rule present");
        assert_eq!(db.min_match_length, 10);
        assert!((db.entropy_threshold - 3.2).abs() < f64::EPSILON);

        // Explicit overrides stay put
        let private_key = set.get("Private Key").expect("rule present");
        assert_eq!(private_key.min_match_length, 1);
    }

    #[test]
    fn test_extend_rejects_duplicate_name() {
        let defaults = ClassifyConfig::default();
        let mut set = RuleSet::built_in(&defaults);

        let duplicate = RuleDefinition {
            name: "Private Key".to_string(),
            pattern: "x".to_string(),
            risk: RiskLevel::Low,
            min_match_length: None,
            entropy_threshold: None,
        };
        let result = set.extend_from(&[duplicate], &defaults);
        assert!(matches!(result, Err(RuleError::ValidationError { .. })));
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn test_from_definitions_compiles_in_order() {
        let defaults = ClassifyConfig::default();
        let defs = vec![
            RuleDefinition {
                name: "First".to_string(),
                pattern: "aaa".to_string(),
                risk: RiskLevel::Low,
                min_match_length: None,
                entropy_threshold: None,
            },
            RuleDefinition {
                name: "Second".to_string(),
                pattern: "bbb".to_string(),
                risk: RiskLevel::High,
                min_match_length: None,
                entropy_threshold: None,
            },
        ];

        let set = RuleSet::from_definitions(&defs, &defaults).expect("compile definitions");
        let names: Vec<_> = set.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }
}
