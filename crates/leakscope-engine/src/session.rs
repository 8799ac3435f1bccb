//! Scan session state: lifecycle, deduplication, and severity aggregation.
//!
//! All mutable run state lives here. The orchestrator drives the session
//! through `Idle -> Running -> (Completed | Interrupted)` and everything
//! downstream (report, summary, CLI output) reads from it.

use leakscope_core::{Finding, RiskLevel, TargetDomain};
use std::collections::HashSet;

/// Lifecycle of a single scan run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed, not yet started
    Idle,
    /// Actively scanning
    Running,
    /// Ran to the end of the plan
    Completed,
    /// Stopped early by cancellation
    Interrupted,
}

impl SessionState {
    /// Whether the session has reached a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Interrupted)
    }
}

/// Finding counts per severity level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityCounts([usize; 5]);

impl SeverityCounts {
    /// Record one finding at the given level.
    pub fn record(&mut self, level: RiskLevel) {
        self.0[level as usize] += 1;
    }

    /// Count for one level.
    #[must_use]
    pub fn count(&self, level: RiskLevel) -> usize {
        self.0[level as usize]
    }

    /// Total findings across all levels.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }
}

/// One scan run: target, lifecycle state, visited URLs, and findings.
#[derive(Debug)]
pub struct ScanSession {
    target: TargetDomain,
    state: SessionState,
    visited: HashSet<String>,
    findings: Vec<Finding>,
    counts: SeverityCounts,
}

impl ScanSession {
    /// Create an idle session for the given target.
    #[must_use]
    pub fn new(target: TargetDomain) -> Self {
        Self {
            target,
            state: SessionState::Idle,
            visited: HashSet::new(),
            findings: Vec::new(),
            counts: SeverityCounts::default(),
        }
    }

    /// The domain this session is scanning.
    #[must_use]
    pub fn target(&self) -> &TargetDomain {
        &self.target
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Transition `Idle -> Running`. No effect once started.
    pub fn start(&mut self) {
        if self.state == SessionState::Idle {
            self.state = SessionState::Running;
            tracing::info!(target_domain = %self.target, "scan session started");
        }
    }

    /// Transition `Running -> Completed`. Terminal states are absorbing.
    pub fn complete(&mut self) {
        if self.state == SessionState::Running {
            self.state = SessionState::Completed;
            tracing::info!(
                findings = self.findings.len(),
                urls_visited = self.visited.len(),
                "scan session completed"
            );
        }
    }

    /// Transition `Running -> Interrupted`. Terminal states are absorbing.
    pub fn interrupt(&mut self) {
        if self.state == SessionState::Running {
            self.state = SessionState::Interrupted;
            tracing::warn!(
                findings = self.findings.len(),
                "scan session interrupted before finishing"
            );
        }
    }

    /// Check-then-mark a URL for processing.
    ///
    /// Returns true exactly once per distinct URL within this run; repeat
    /// calls return false and leave the visited set untouched.
    pub fn should_process(&mut self, url: &str) -> bool {
        if self.visited.contains(url) {
            tracing::debug!(url, "already inspected this run, skipping");
            return false;
        }
        self.visited.insert(url.to_string());
        true
    }

    /// Record a finding and bump its severity counter.
    pub fn record(&mut self, finding: Finding) {
        self.counts.record(finding.risk);
        self.findings.push(finding);
    }

    /// Findings recorded so far, in discovery order.
    #[must_use]
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Severity counters.
    #[must_use]
    pub fn counts(&self) -> &SeverityCounts {
        &self.counts
    }

    /// Number of distinct URLs inspected.
    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Severity breakdown in fixed CRITICAL-first order.
    ///
    /// With `include_empty` false, levels with zero findings are omitted;
    /// with it true all five levels appear.
    #[must_use]
    pub fn summary(&self, include_empty: bool) -> Vec<(RiskLevel, usize)> {
        RiskLevel::in_severity_order()
            .into_iter()
            .map(|level| (level, self.counts.count(level)))
            .filter(|&(_, count)| include_empty || count > 0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leakscope_core::FindingSource;

    fn session() -> ScanSession {
        ScanSession::new(TargetDomain::new("example.com").expect("valid domain"))
    }

    fn finding(risk: RiskLevel) -> Finding {
        Finding::new(
            "https://example.com/.env",
            "Database Credentials",
            risk,
            FindingSource::Google,
        )
    }

    #[test]
    fn test_new_session_is_idle_and_empty() {
        let s = session();
        assert_eq!(s.state(), SessionState::Idle);
        assert!(s.findings().is_empty());
        assert_eq!(s.visited_count(), 0);
        assert_eq!(s.counts().total(), 0);
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut s = session();
        s.start();
        assert_eq!(s.state(), SessionState::Running);
        s.complete();
        assert_eq!(s.state(), SessionState::Completed);
        assert!(s.state().is_terminal());
    }

    #[test]
    fn test_interrupt_from_running() {
        let mut s = session();
        s.start();
        s.interrupt();
        assert_eq!(s.state(), SessionState::Interrupted);
    }

    #[test]
    fn test_terminal_states_are_absorbing() {
        let mut s = session();
        s.start();
        s.interrupt();
        s.complete();
        assert_eq!(s.state(), SessionState::Interrupted);
    }

    #[test]
    fn test_repeated_url_is_processed_once() {
        let mut s = session();
        assert!(s.should_process("https://example.com/.env"));
        assert!(!s.should_process("https://example.com/.env"));
        assert_eq!(s.visited_count(), 1);
    }

    #[test]
    fn test_distinct_urls_each_processed() {
        let mut s = session();
        assert!(s.should_process("https://example.com/.env"));
        assert!(s.should_process("https://example.com/config.php"));
        assert_eq!(s.visited_count(), 2);
    }

    #[test]
    fn test_severity_aggregation() {
        let mut s = session();
        for risk in [
            RiskLevel::Critical,
            RiskLevel::High,
            RiskLevel::High,
            RiskLevel::Low,
        ] {
            s.record(finding(risk));
        }

        assert_eq!(s.counts().count(RiskLevel::Critical), 1);
        assert_eq!(s.counts().count(RiskLevel::High), 2);
        assert_eq!(s.counts().count(RiskLevel::Medium), 0);
        assert_eq!(s.counts().count(RiskLevel::Low), 1);
        assert_eq!(s.counts().count(RiskLevel::Info), 0);
        assert_eq!(s.counts().total(), 4);
    }

    #[test]
    fn test_summary_orders_critical_first() {
        let mut s = session();
        s.record(finding(RiskLevel::Low));
        s.record(finding(RiskLevel::Critical));

        let summary = s.summary(false);
        assert_eq!(
            summary,
            vec![(RiskLevel::Critical, 1), (RiskLevel::Low, 1)]
        );
    }

    #[test]
    fn test_summary_full_enumeration_keeps_zero_levels() {
        let mut s = session();
        s.record(finding(RiskLevel::High));

        let summary = s.summary(true);
        assert_eq!(summary.len(), 5);
        assert_eq!(summary[0], (RiskLevel::Critical, 0));
        assert_eq!(summary[1], (RiskLevel::High, 1));
    }
}
