//! Configuration management for LeakScope.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides. Every section tolerates partial files;
//! `validate` is the startup gate that turns bad values into fatal errors.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main scan configuration.
///
/// Loaded from `~/.config/leakscope/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Classification thresholds and filters
    pub classify: ClassifyConfig,
    /// Inter-batch pacing between discovery queries
    pub pacing: PacingConfig,
    /// Page fetch behavior
    pub fetch: FetchConfig,
    /// Browser automation settings
    pub browser: BrowserConfig,
    /// Evidence capture settings
    pub evidence: EvidenceConfig,
    /// Report output settings
    pub report: ReportConfig,
    /// Secondary intelligence source settings
    pub intel: IntelConfig,
}

impl ScanConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `LEAKSCOPE_HEADLESS`: Override browser headless mode (true/false)
    /// - `LEAKSCOPE_FETCH_TIMEOUT_SECS`: Override fetch timeout
    /// - `LEAKSCOPE_GITHUB_TOKEN`: Supply the code-search credential
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;

        if let Ok(val) = std::env::var("LEAKSCOPE_HEADLESS") {
            if let Ok(headless) = val.parse() {
                config.browser.headless = headless;
                tracing::debug!("Override browser.headless from env: {}", headless);
            }
        }

        if let Ok(val) = std::env::var("LEAKSCOPE_FETCH_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                config.fetch.timeout_secs = secs;
                tracing::debug!("Override fetch.timeout_secs from env: {}", secs);
            }
        }

        if let Ok(val) = std::env::var("LEAKSCOPE_GITHUB_TOKEN") {
            if !val.is_empty() {
                config.intel.github_token = Some(val);
                tracing::debug!("Code-search credential supplied from env");
            }
        }

        Ok(config)
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/leakscope/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "leakscope", "leakscope").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Check every value against its allowed range.
    ///
    /// # Errors
    /// Returns the first `ConfigError::InvalidValue` encountered. Callers
    /// treat any error here as fatal before a scan starts.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.classify.entropy_threshold.is_finite() || self.classify.entropy_threshold < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "classify.entropy_threshold".to_string(),
                reason: "must be a non-negative finite number".to_string(),
            });
        }

        if self.classify.min_match_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "classify.min_match_length".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.classify.max_content_chars == 0 {
            return Err(ConfigError::InvalidValue {
                field: "classify.max_content_chars".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let min = self.pacing.batch_delay_min_secs;
        let max = self.pacing.batch_delay_max_secs;
        if !min.is_finite() || !max.is_finite() || min < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "pacing.batch_delay_min_secs".to_string(),
                reason: "delays must be non-negative finite numbers".to_string(),
            });
        }
        if max < min {
            return Err(ConfigError::InvalidValue {
                field: "pacing.batch_delay_max_secs".to_string(),
                reason: format!("must be >= batch_delay_min_secs ({min})"),
            });
        }

        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fetch.timeout_secs".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

/// Classification thresholds and filters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    /// Entropy gate in bits per character for rules without an override
    pub entropy_threshold: f64,
    /// Minimum matched-value length for rules without an override
    pub min_match_length: usize,
    /// Skip bodies longer than this many characters
    pub max_content_chars: usize,
    /// Keep only discovered links containing the target domain
    pub restrict_to_target: bool,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            entropy_threshold: 4.0,
            min_match_length: 8,
            max_content_chars: 2_000_000,
            restrict_to_target: true,
        }
    }
}

/// Inter-batch pacing between discovery queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Lower bound of the randomized delay in seconds
    pub batch_delay_min_secs: f64,
    /// Upper bound of the randomized delay in seconds
    pub batch_delay_max_secs: f64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            batch_delay_min_secs: 6.0,
            batch_delay_max_secs: 10.0,
        }
    }
}

/// Page fetch behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Navigation timeout in seconds
    pub timeout_secs: u64,
    /// Settle delay after load before text extraction, in milliseconds
    pub settle_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            settle_ms: 2000,
        }
    }
}

/// Browser automation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    pub headless: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self { headless: true }
    }
}

/// Evidence capture settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvidenceConfig {
    /// Whether screenshots are taken for high-severity findings
    pub enabled: bool,
    /// Directory evidence files are written into
    pub dir: PathBuf,
}

impl Default for EvidenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from("leaks_evidence"),
        }
    }
}

/// Report output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory the final report is written into
    pub dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

/// Secondary intelligence source settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IntelConfig {
    /// Code-search API credential; absence disables the capability
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ScanConfig::default();
        assert!((config.classify.entropy_threshold - 4.0).abs() < f64::EPSILON);
        assert_eq!(config.classify.min_match_length, 8);
        assert_eq!(config.classify.max_content_chars, 2_000_000);
        assert!(config.classify.restrict_to_target);
        assert!((config.pacing.batch_delay_min_secs - 6.0).abs() < f64::EPSILON);
        assert!((config.pacing.batch_delay_max_secs - 10.0).abs() < f64::EPSILON);
        assert_eq!(config.fetch.timeout_secs, 30);
        assert!(config.browser.headless);
        assert!(config.evidence.enabled);
        assert!(config.intel.github_token.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = ScanConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("[classify]"));
        assert!(toml_str.contains("[pacing]"));
        assert!(toml_str.contains("[fetch]"));
        // Absent credential must not be written out
        assert!(!toml_str.contains("github_token"));

        let parsed: ScanConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(parsed.fetch.timeout_secs, config.fetch.timeout_secs);
    }

    #[test]
    fn test_config_save_load() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");

        let mut config = ScanConfig::default();
        config.classify.entropy_threshold = 3.5;
        config.fetch.timeout_secs = 45;

        let contents = toml::to_string_pretty(&config).expect("serialize config");
        fs::write(&config_path, contents).expect("write config file");

        let loaded_contents = fs::read_to_string(&config_path).expect("read config file");
        let loaded: ScanConfig = toml::from_str(&loaded_contents).expect("parse loaded config");

        assert!((loaded.classify.entropy_threshold - 3.5).abs() < f64::EPSILON);
        assert_eq!(loaded.fetch.timeout_secs, 45);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[classify]
entropy_threshold = 3.5

[pacing]
batch_delay_min_secs = 0.0
batch_delay_max_secs = 0.5
"#;

        let config: ScanConfig = toml::from_str(toml_str).expect("parse partial config");
        assert!((config.classify.entropy_threshold - 3.5).abs() < f64::EPSILON);
        assert!((config.pacing.batch_delay_max_secs - 0.5).abs() < f64::EPSILON);
        // These should be defaults
        assert_eq!(config.classify.min_match_length, 8);
        assert_eq!(config.fetch.timeout_secs, 30);
        assert!(config.browser.headless);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ScanConfig::default();
        config.classify.entropy_threshold = -1.0;
        assert!(config.validate().is_err());

        let mut config = ScanConfig::default();
        config.classify.min_match_length = 0;
        assert!(config.validate().is_err());

        let mut config = ScanConfig::default();
        config.classify.max_content_chars = 0;
        assert!(config.validate().is_err());

        let mut config = ScanConfig::default();
        config.pacing.batch_delay_min_secs = 10.0;
        config.pacing.batch_delay_max_secs = 6.0;
        assert!(config.validate().is_err());

        let mut config = ScanConfig::default();
        config.fetch.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("LEAKSCOPE_FETCH_TIMEOUT_SECS", "45");

        // Exercise the override logic without touching the real config file
        let mut config = ScanConfig::default();
        if let Ok(val) = std::env::var("LEAKSCOPE_FETCH_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                config.fetch.timeout_secs = secs;
            }
        }
        assert_eq!(config.fetch.timeout_secs, 45);

        std::env::remove_var("LEAKSCOPE_FETCH_TIMEOUT_SECS");
    }

    #[test]
    fn test_token_round_trip() {
        let toml_str = r#"
[intel]
github_token = "ghp_example"
"#;
        let config: ScanConfig = toml::from_str(toml_str).expect("parse intel config");
        assert_eq!(config.intel.github_token.as_deref(), Some("ghp_example"));

        let written = toml::to_string_pretty(&config).expect("serialize intel config");
        assert!(written.contains("github_token"));
    }
}
