//! LeakScope command-line interface.
//!
//! Wires the browser and code-search providers into the scan engine,
//! renders live output, and writes the final report.

mod adapters;
mod ui;

use adapters::{BrowserDiscoverer, BrowserEvidence, BrowserFetcher, GithubIntel};
use anyhow::{Context, Result};
use clap::Parser;
use dialoguer::{theme::ColorfulTheme, Input};
use leakscope_browser::SearchBrowser;
use leakscope_core::{ScanConfig, TargetDomain};
use leakscope_engine::{Classifier, ScanOrchestrator};
use leakscope_intel::GithubCodeSearch;
use leakscope_rules::{RuleLoader, RuleSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "leakscope",
    version,
    about = "Passive secret-exposure discovery for a target domain"
)]
struct Cli {
    /// Target domain to scan (prompted for when omitted)
    target: Option<String>,

    /// Directory of additional TOML rule packs
    #[arg(long)]
    rules_dir: Option<PathBuf>,

    /// Directory the report is written into
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Directory evidence screenshots are written into
    #[arg(long)]
    evidence_dir: Option<PathBuf>,

    /// Keep results hosted off the target domain
    #[arg(long)]
    include_third_party: bool,

    /// Skip evidence screenshots entirely
    #[arg(long)]
    no_evidence: bool,

    /// Run the browser with a visible window
    #[arg(long)]
    headful: bool,

    /// GitHub token enabling the code-search intelligence source
    #[arg(long)]
    github_token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    ui::print_banner();

    let mut config = ScanConfig::load_with_env().context("load configuration")?;
    apply_overrides(&mut config, &cli);
    config.validate().context("invalid configuration")?;

    let target = resolve_target(cli.target)?;

    let mut rules = RuleSet::built_in(&config.classify);
    if let Some(dir) = &cli.rules_dir {
        let loader = RuleLoader::new(dir).context("open rule pack directory")?;
        let packs = loader.load_all().context("load rule packs")?;
        rules
            .extend_from(&packs, &config.classify)
            .context("compile rule packs")?;
        info!(rules = rules.len(), "rule packs loaded");
    }
    let classifier = Classifier::new(rules);

    info!("launching browser");
    let browser = Arc::new(
        SearchBrowser::launch(&config)
            .await
            .context("launch browser")?,
    );

    let discoverer = Arc::new(BrowserDiscoverer::new(Arc::clone(&browser)));
    let fetcher = Arc::new(BrowserFetcher::new(
        Arc::clone(&browser),
        Duration::from_secs(config.fetch.timeout_secs),
    ));

    let mut orchestrator =
        ScanOrchestrator::new(config.clone(), classifier, discoverer, fetcher)
            .with_observer(Arc::new(ui::ConsoleObserver::new()));

    if config.evidence.enabled {
        orchestrator =
            orchestrator.with_evidence(Arc::new(BrowserEvidence::new(Arc::clone(&browser))));
    }

    if let Some(token) = config.intel.github_token.clone() {
        let client =
            GithubCodeSearch::new(Some(token)).context("create code-search client")?;
        orchestrator = orchestrator.with_intel(Arc::new(GithubIntel::new(client)));
        info!("code-search intelligence enabled");
    }

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, finishing current step");
            interrupt.cancel();
        }
    });

    let outcome = orchestrator.run(target, cancel).await.context("scan failed")?;
    ui::print_summary(&outcome.session, &outcome.report_path);

    Ok(())
}

/// Take the target from the arguments, or ask for it.
fn resolve_target(arg: Option<String>) -> Result<TargetDomain> {
    let raw = match arg {
        Some(value) => value,
        None => Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Target domain (example.com)")
            .allow_empty(false)
            .interact_text()
            .context("read target domain")?,
    };
    TargetDomain::new(raw.trim()).context("invalid target domain")
}

/// Fold command-line flags over the loaded configuration.
fn apply_overrides(config: &mut ScanConfig, cli: &Cli) {
    if let Some(dir) = &cli.output_dir {
        config.report.dir = dir.clone();
    }
    if let Some(dir) = &cli.evidence_dir {
        config.evidence.dir = dir.clone();
    }
    if cli.include_third_party {
        config.classify.restrict_to_target = false;
    }
    if cli.no_evidence {
        config.evidence.enabled = false;
    }
    if cli.headful {
        config.browser.headless = false;
    }
    if let Some(token) = &cli.github_token {
        config.intel.github_token = Some(token.clone());
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
