//! Terminal output: banner, live scan lines, and the executive summary.
//!
//! Queries and findings print to stdout; the rewritable progress line
//! goes to stderr so piped output carries only real results.

use chrono::Local;
use console::Style;
use leakscope_core::{Finding, RiskLevel};
use leakscope_engine::{ProgressSnapshot, ScanObserver, ScanSession, SessionState};
use std::io::{self, Write};
use std::path::Path;

/// Width of the horizontal rules framing the banner and summary.
const RULE_WIDTH: usize = 55;
/// Progress bar slots, one block per 10% completed.
const BAR_SLOTS: usize = 10;

/// Severity palette for finding lines and the summary.
pub fn severity_style(risk: RiskLevel) -> Style {
    match risk {
        RiskLevel::Critical => Style::new().red().bold(),
        RiskLevel::High => Style::new().red(),
        RiskLevel::Medium => Style::new().yellow(),
        RiskLevel::Low => Style::new().cyan(),
        RiskLevel::Info => Style::new().dim(),
    }
}

/// Startup banner, printed before any scan output.
pub fn print_banner() {
    let rule = "=".repeat(RULE_WIDTH);
    println!("{rule}");
    println!(
        " {} v{}",
        Style::new()
            .red()
            .apply_to("LeakScope - Public Exposure Intelligence Tool"),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Passive OSINT-based security assessment");
    println!("{rule}");
}

/// Renders queries, findings, and progress as the scan runs.
#[derive(Debug, Default)]
pub struct ConsoleObserver;

impl ConsoleObserver {
    pub fn new() -> Self {
        Self
    }
}

impl ScanObserver for ConsoleObserver {
    fn on_query(&self, category: &str, query: &str, step: usize, total: usize) {
        println!(
            "{} {} {}",
            Style::new().dim().apply_to(format!("[{step}/{total}]")),
            Style::new().cyan().apply_to(category),
            query
        );
    }

    fn on_finding(&self, finding: &Finding) {
        let style = severity_style(finding.risk);
        let mut line = format!(
            "  {} {}  {}",
            style.apply_to(format!("[{}]", finding.risk.label())),
            finding.kind,
            finding.url
        );
        if let Some(path) = &finding.evidence_path {
            line.push_str(&format!("  (evidence: {})", path.display()));
        }
        println!("{line}");
    }

    fn on_progress(&self, snapshot: &ProgressSnapshot) {
        eprint!(
            "\r{} {:>3}% ETA {:>3}s ",
            progress_bar(snapshot.percent),
            snapshot.percent,
            snapshot.eta.as_secs()
        );
        let _ = io::stderr().flush();
        if snapshot.completed >= snapshot.total {
            eprintln!();
        }
    }
}

/// Executive summary printed after the report is written.
pub fn print_summary(session: &ScanSession, report_path: &Path) {
    let rule = "=".repeat(RULE_WIDTH);

    println!("\n{rule}");
    println!(" EXECUTIVE SUMMARY FOR: {}", session.target());
    println!(
        " Scan finished: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    if session.state() == SessionState::Interrupted {
        println!(
            " {}",
            Style::new()
                .yellow()
                .apply_to("Scan interrupted; results are partial")
        );
    }
    println!("{rule}");

    let rows = session.summary(false);
    if rows.is_empty() {
        println!(" No exposures detected");
    } else {
        for (risk, count) in rows {
            let style = severity_style(risk);
            println!(" {}", style.apply_to(format!("{:<8} : {count}", risk.label())));
        }
    }

    println!("{}", "-".repeat(RULE_WIDTH));
    println!(
        " {} findings across {} URLs inspected",
        session.counts().total(),
        session.visited_count()
    );
    println!(" Report: {}", report_path.display());
    println!("{rule}\n");
}

/// Fixed-width bar with one block per completed tenth.
fn progress_bar(percent: usize) -> String {
    let filled = (percent / 10).min(BAR_SLOTS);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_SLOTS - filled))
}
