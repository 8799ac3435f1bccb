//! Rule pack loading from TOML files.
//!
//! Rule packs extend the built-in set with site- or engagement-specific
//! detections. Loading is strict: a pack that fails to parse or validate
//! aborts startup instead of being skipped, since a silently dropped rule
//! means silently missed findings.

use crate::{
    definition::RuleDefinition,
    error::{Result, RuleError},
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Top-level shape of a rule pack file.
#[derive(Debug, Deserialize)]
struct RulePackFile {
    #[serde(default)]
    rules: Vec<RuleDefinition>,
}

/// Loader for rule packs from a directory of TOML files.
pub struct RuleLoader {
    /// Base directory containing rule packs
    packs_dir: PathBuf,
}

impl RuleLoader {
    /// Create a new loader with the given rule pack directory.
    ///
    /// # Errors
    /// Returns error if the directory doesn't exist.
    pub fn new(packs_dir: impl Into<PathBuf>) -> Result<Self> {
        let packs_dir = packs_dir.into();

        if !packs_dir.is_dir() {
            return Err(RuleError::DirectoryNotFound {
                path: packs_dir.display().to_string(),
            });
        }

        Ok(Self { packs_dir })
    }

    /// Load every rule definition from the pack directory, in path order.
    ///
    /// # Errors
    /// Returns the first load, parse, or validation error encountered.
    pub fn load_all(&self) -> Result<Vec<RuleDefinition>> {
        let mut definitions = Vec::new();

        Self::walk_and_load_recursive(&self.packs_dir, &mut definitions)?;

        info!(
            count = definitions.len(),
            dir = %self.packs_dir.display(),
            "loaded rule pack definitions"
        );

        Ok(definitions)
    }

    /// Recursively walk directory and load all TOML files.
    fn walk_and_load_recursive(dir: &Path, definitions: &mut Vec<RuleDefinition>) -> Result<()> {
        let mut entries: Vec<_> =
            std::fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
        entries.sort_by_key(std::fs::DirEntry::path);

        for entry in entries {
            let path = entry.path();

            if path.is_dir() {
                Self::walk_and_load_recursive(&path, definitions)?;
            } else if path.extension().and_then(|s| s.to_str()) == Some("toml") {
                if path.file_name().and_then(|s| s.to_str()) == Some("README.toml") {
                    continue;
                }

                let pack = Self::load_from_path(&path)?;
                for def in &pack.rules {
                    def.validate()?;
                }

                debug!(
                    path = %path.display(),
                    count = pack.rules.len(),
                    "loaded rule pack"
                );
                definitions.extend(pack.rules);
            }
        }

        Ok(())
    }

    /// Load a rule pack from a specific file path.
    fn load_from_path(path: &Path) -> Result<RulePackFile> {
        let contents = std::fs::read_to_string(path).map_err(|e| RuleError::LoadError {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;

        toml::from_str(&contents).map_err(|e| RuleError::ParseError {
            path: path.display().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_pack(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).expect("write pack file");
        path
    }

    const VALID_PACK: &str = r#"
[[rules]]
name = "Stripe Secret Key"
pattern = 'sk_live_[0-9a-zA-Z]{24,}'
risk = "HIGH"
min_match_length = 12

[[rules]]
name = "Slack Token"
pattern = 'xox[baprs]-[0-9A-Za-z\-]{10,}'
risk = "MEDIUM"
"#;

    #[test]
    fn test_loader_new_with_nonexistent_dir() {
        let loader = RuleLoader::new("/nonexistent/path/to/packs");
        assert!(matches!(
            loader,
            Err(RuleError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn test_load_all_from_nested_dirs() {
        let temp_dir = TempDir::new().expect("create temp dir");
        write_pack(temp_dir.path(), "payments.toml", VALID_PACK);

        let nested = temp_dir.path().join("community");
        std::fs::create_dir_all(&nested).expect("create nested dir");
        write_pack(
            &nested,
            "chat.toml",
            r#"
[[rules]]
name = "Discord Webhook"
pattern = 'discord\.com/api/webhooks/\d+/[\w-]+'
risk = "LOW"
"#,
        );

        let loader = RuleLoader::new(temp_dir.path()).expect("create loader");
        let definitions = loader.load_all().expect("load all packs");

        assert_eq!(definitions.len(), 3);
    }

    #[test]
    fn test_load_all_fails_on_malformed_toml() {
        let temp_dir = TempDir::new().expect("create temp dir");
        write_pack(temp_dir.path(), "broken.toml", "not toml [[[");

        let loader = RuleLoader::new(temp_dir.path()).expect("create loader");
        let result = loader.load_all();
        assert!(matches!(result, Err(RuleError::ParseError { .. })));
    }

    #[test]
    fn test_load_all_fails_on_invalid_rule() {
        let temp_dir = TempDir::new().expect("create temp dir");
        write_pack(
            temp_dir.path(),
            "empty-pattern.toml",
            r#"
[[rules]]
name = "Broken"
pattern = ""
risk = "LOW"
"#,
        );

        let loader = RuleLoader::new(temp_dir.path()).expect("create loader");
        let result = loader.load_all();
        assert!(matches!(result, Err(RuleError::ValidationError { .. })));
    }

    #[test]
    fn test_load_all_skips_readme() {
        let temp_dir = TempDir::new().expect("create temp dir");
        write_pack(temp_dir.path(), "README.toml", "not a pack [[[");
        write_pack(temp_dir.path(), "real.toml", VALID_PACK);

        let loader = RuleLoader::new(temp_dir.path()).expect("create loader");
        let definitions = loader.load_all().expect("load all packs");
        assert_eq!(definitions.len(), 2);
    }

    #[test]
    fn test_empty_pack_is_allowed() {
        let temp_dir = TempDir::new().expect("create temp dir");
        write_pack(temp_dir.path(), "empty.toml", "");

        let loader = RuleLoader::new(temp_dir.path()).expect("create loader");
        let definitions = loader.load_all().expect("load all packs");
        assert!(definitions.is_empty());
    }
}
