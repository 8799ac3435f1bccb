//! Final report persistence.

use crate::error::Result;
use crate::session::ScanSession;
use leakscope_core::{ReportConfig, TargetDomain};
use std::fs;
use std::path::PathBuf;

/// Writes the final findings report as a pretty-printed JSON array.
///
/// The report is written exactly once per run, on both completion and
/// interruption, so partial results survive a cancelled scan.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    /// Create a writer targeting the given output directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Build from the report section of the scan configuration.
    #[must_use]
    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(&config.dir)
    }

    /// Path the report for `target` will be written to.
    #[must_use]
    pub fn report_path(&self, target: &TargetDomain) -> PathBuf {
        self.dir.join(format!("final_intel_{target}.json"))
    }

    /// Persist the session's findings, returning the report path.
    ///
    /// An empty session still produces a report (an empty array); consumers
    /// rely on the file existing after every run.
    pub fn write(&self, session: &ScanSession) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let path = self.report_path(session.target());
        let json = serde_json::to_vec_pretty(session.findings())?;
        fs::write(&path, json)?;

        tracing::info!(
            path = %path.display(),
            findings = session.findings().len(),
            "final report written"
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leakscope_core::{Finding, FindingSource, RiskLevel};

    fn session_with_finding() -> ScanSession {
        let mut session =
            ScanSession::new(TargetDomain::new("example.com").expect("valid domain"));
        session.record(Finding::new(
            "https://example.com/.env",
            "Database Credentials",
            RiskLevel::Critical,
            FindingSource::Google,
        ));
        session
    }

    #[test]
    fn test_report_filename_embeds_target() {
        let writer = ReportWriter::new("/tmp/reports");
        let target = TargetDomain::new("example.com").expect("valid domain");
        assert_eq!(
            writer.report_path(&target),
            PathBuf::from("/tmp/reports/final_intel_example.com.json")
        );
    }

    #[test]
    fn test_write_produces_json_array_with_report_fields() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let writer = ReportWriter::new(dir.path());

        let path = writer.write(&session_with_finding()).expect("write report");
        let raw = fs::read_to_string(&path).expect("read report back");
        let parsed: serde_json::Value = serde_json::from_str(&raw).expect("valid JSON");

        let entries = parsed.as_array().expect("top-level array");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["url"], "https://example.com/.env");
        assert_eq!(entries[0]["type"], "Database Credentials");
        assert_eq!(entries[0]["risk"], "CRITICAL");
        assert_eq!(entries[0]["source"], "google");
        assert!(entries[0]["timestamp"].is_string());
    }

    #[test]
    fn test_empty_session_still_writes_report() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let writer = ReportWriter::new(dir.path());
        let session = ScanSession::new(TargetDomain::new("example.com").expect("valid domain"));

        let path = writer.write(&session).expect("write report");
        let raw = fs::read_to_string(&path).expect("read report back");
        let parsed: serde_json::Value = serde_json::from_str(&raw).expect("valid JSON");
        assert_eq!(parsed.as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn test_write_creates_missing_output_dir() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let nested = dir.path().join("out").join("reports");
        let writer = ReportWriter::new(&nested);

        let path = writer.write(&session_with_finding()).expect("write report");
        assert!(path.exists());
        assert!(path.starts_with(&nested));
    }
}
