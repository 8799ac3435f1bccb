//! Built-in discovery query collection.
//!
//! Dorks are grouped by the kind of exposure they surface and carry a
//! `{d}` placeholder substituted with the target domain at render time.
//! The rendered count sizes the discovery phase of the scan plan.

use leakscope_core::TargetDomain;
use serde::{Deserialize, Serialize};

/// A named group of dork templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DorkGroup {
    /// Human-readable exposure category
    pub category: String,
    /// Query templates containing the `{d}` placeholder
    pub templates: Vec<String>,
}

/// One rendered, ready-to-issue discovery query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DorkQuery {
    /// Category of the group the query came from
    pub category: String,
    /// Fully substituted query string
    pub query: String,
}

/// Ordered collection of dork groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DorkCollection {
    groups: Vec<DorkGroup>,
}

impl DorkCollection {
    /// Build a collection from explicit groups, preserving their order.
    #[must_use]
    pub fn from_groups(groups: Vec<DorkGroup>) -> Self {
        Self { groups }
    }

    /// The built-in dork set.
    #[must_use]
    pub fn built_in() -> Self {
        let groups = [
            (
                "Config & Environment",
                &[
                    r#"site:{d} filetype:env "DB_PASSWORD=""#,
                    r#"site:{d} filetype:json "AWS_SECRET_ACCESS_KEY=""#,
                    r#"site:{d} filetype:config "connectionString=""#,
                    r#"site:{d} filetype:ini "db_pass""#,
                    r#"site:{d} "BEGIN RSA PRIVATE KEY""#,
                    r#"site:{d} "BEGIN OPENSSH PRIVATE KEY""#,
                ][..],
            ),
            (
                "Advanced",
                &[
                    r"site:{d} inurl:.git/config",
                    r#"site:{d} intitle:"index of" ".ssh""#,
                    r#"site:{d} "docker-compose.yml" "password""#,
                    r#"site:s3.amazonaws.com "{d}""#,
                    r#"site:blob.core.windows.net "{d}""#,
                ][..],
            ),
            (
                "Credentials",
                &[
                    r#"site:{d} intext:"password" "login""#,
                    r#"site:pastebin.com "{d}" "password""#,
                    r#"site:github.com "{d}" "apikey""#,
                ][..],
            ),
            (
                "Backups & Dumps",
                &[
                    r#"site:{d} intitle:"index of" "backup""#,
                    r#"site:{d} filetype:sql "dump""#,
                    r"site:{d} filetype:bak OR filetype:old",
                ][..],
            ),
        ];

        Self {
            groups: groups
                .into_iter()
                .map(|(category, templates)| DorkGroup {
                    category: category.to_string(),
                    templates: templates.iter().map(ToString::to_string).collect(),
                })
                .collect(),
        }
    }

    /// Total number of queries across all groups.
    #[must_use]
    pub fn count(&self) -> usize {
        self.groups.iter().map(|g| g.templates.len()).sum()
    }

    /// Whether the collection holds no queries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// The groups in declaration order.
    #[must_use]
    pub fn groups(&self) -> &[DorkGroup] {
        &self.groups
    }

    /// Substitute the target into every template, preserving order.
    #[must_use]
    pub fn render(&self, target: &TargetDomain) -> Vec<DorkQuery> {
        self.groups
            .iter()
            .flat_map(|group| {
                group.templates.iter().map(|template| DorkQuery {
                    category: group.category.clone(),
                    query: template.replace("{d}", target.as_str()),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_in_collection_shape() {
        let dorks = DorkCollection::built_in();
        assert_eq!(dorks.groups().len(), 4);
        assert_eq!(dorks.count(), 17);
        assert!(!dorks.is_empty());

        let categories: Vec<_> = dorks.groups().iter().map(|g| g.category.as_str()).collect();
        assert_eq!(
            categories,
            vec![
                "Config & Environment",
                "Advanced",
                "Credentials",
                "Backups & Dumps"
            ]
        );
    }

    #[test]
    fn test_render_substitutes_target_everywhere() {
        let target = TargetDomain::new("example.com").expect("valid domain");
        let queries = DorkCollection::built_in().render(&target);

        assert_eq!(queries.len(), 17);
        for q in &queries {
            assert!(!q.query.contains("{d}"), "unsubstituted query: {}", q.query);
            assert!(
                q.query.contains("example.com"),
                "target missing from query: {}",
                q.query
            );
        }
    }

    #[test]
    fn test_render_keeps_quoting_for_third_party_sites() {
        let target = TargetDomain::new("example.com").expect("valid domain");
        let queries = DorkCollection::built_in().render(&target);

        assert!(queries
            .iter()
            .any(|q| q.query == r#"site:pastebin.com "example.com" "password""#));
    }
}
