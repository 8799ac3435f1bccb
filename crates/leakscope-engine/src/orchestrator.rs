//! Scan orchestrator driving the full discovery/classify/report cycle.
//!
//! One logical thread of control: queries run one at a time, every
//! fetch/classify cycle completes before the next begins, and all failure
//! handling happens at the query or URL boundary so a single bad page never
//! takes the run down.

use crate::classifier::Classifier;
use crate::error::{Result, ScanError};
use crate::pacing::{Pacer, RandomizedPacer};
use crate::progress::ProgressTracker;
use crate::report::ReportWriter;
use crate::session::ScanSession;
use crate::sources::{
    CodeIntelSource, ContentFetcher, Discoverer, EvidenceCapture, NoopObserver, ScanObserver,
};
use leakscope_core::{Finding, FindingSource, RiskLevel, ScanConfig, SearchHit, TargetDomain};
use leakscope_rules::DorkCollection;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Cap applied to provider retry hints before backing off.
const RATE_LIMIT_BACKOFF_CAP: Duration = Duration::from_secs(120);

/// Label shown for code-search steps in query callbacks.
const CODE_SEARCH_CATEGORY: &str = "Code Search";

/// Result of a finished (or interrupted) scan run.
#[derive(Debug)]
pub struct ScanOutcome {
    /// The session in its terminal state, findings included.
    pub session: ScanSession,
    /// Where the final report was written.
    pub report_path: PathBuf,
}

/// Coordinates discovery, classification, evidence, and reporting.
pub struct ScanOrchestrator {
    config: ScanConfig,
    classifier: Classifier,
    dorks: DorkCollection,
    discoverer: Arc<dyn Discoverer>,
    fetcher: Arc<dyn ContentFetcher>,
    evidence: Option<Arc<dyn EvidenceCapture>>,
    intel: Option<Arc<dyn CodeIntelSource>>,
    observer: Arc<dyn ScanObserver>,
    pacer: Arc<dyn Pacer>,
    report: ReportWriter,
}

impl ScanOrchestrator {
    /// Create an orchestrator with the mandatory collaborators.
    ///
    /// Evidence capture and code-search intelligence are optional and
    /// attached through the `with_*` builders. The default pacer applies the
    /// configured randomized delay; the default observer renders nothing.
    #[must_use]
    pub fn new(
        config: ScanConfig,
        classifier: Classifier,
        discoverer: Arc<dyn Discoverer>,
        fetcher: Arc<dyn ContentFetcher>,
    ) -> Self {
        let pacer: Arc<dyn Pacer> = Arc::new(RandomizedPacer::from_config(&config.pacing));
        let report = ReportWriter::from_config(&config.report);

        Self {
            classifier,
            dorks: DorkCollection::built_in(),
            discoverer,
            fetcher,
            evidence: None,
            intel: None,
            observer: Arc::new(NoopObserver),
            pacer,
            report,
            config,
        }
    }

    /// Attach an evidence capture provider.
    #[must_use]
    pub fn with_evidence(mut self, evidence: Arc<dyn EvidenceCapture>) -> Self {
        self.evidence = Some(evidence);
        self
    }

    /// Attach a code-search intelligence source.
    #[must_use]
    pub fn with_intel(mut self, intel: Arc<dyn CodeIntelSource>) -> Self {
        self.intel = Some(intel);
        self
    }

    /// Attach a presentation observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ScanObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Replace the pacing strategy.
    #[must_use]
    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    /// Replace the dork collection.
    #[must_use]
    pub fn with_dorks(mut self, dorks: DorkCollection) -> Self {
        self.dorks = dorks;
        self
    }

    /// Run one full scan against `target`.
    ///
    /// Progress advances once per query (dork or code-search keyword).
    /// Cancellation is observed between cycles; the in-flight fetch always
    /// settles first. The report is written on both exit paths.
    ///
    /// # Errors
    /// Fails before any network traffic when the plan is empty
    /// (`ScanError::Config`), and at the end when the report cannot be
    /// written. Per-query and per-URL failures are logged and skipped.
    pub async fn run(
        &self,
        target: TargetDomain,
        cancel: CancellationToken,
    ) -> Result<ScanOutcome> {
        let queries = self.dorks.render(&target);
        let keywords = self
            .intel
            .as_ref()
            .map(|intel| intel.keywords())
            .unwrap_or_default();
        let total = queries.len() + keywords.len();

        let mut progress = ProgressTracker::start(total)?;
        let mut session = ScanSession::new(target);
        session.start();

        tracing::info!(
            target_domain = %session.target(),
            dorks = queries.len(),
            code_keywords = keywords.len(),
            "scan plan ready"
        );

        let mut step = 0;
        for query in &queries {
            if cancel.is_cancelled() {
                break;
            }

            step += 1;
            self.observer.on_query(&query.category, &query.query, step, total);

            match self.discoverer.search(&query.query).await {
                Ok(hits) => self.process_hits(&mut session, hits, &cancel).await,
                Err(ScanError::RateLimited {
                    provider,
                    retry_after,
                }) => {
                    let delay = retry_after.min(RATE_LIMIT_BACKOFF_CAP);
                    tracing::warn!(
                        provider = %provider,
                        query = %query.query,
                        ?delay,
                        "rate limited, backing off before next query"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::warn!(query = %query.query, error = %e, "query failed, skipping");
                }
            }

            progress.advance();
            self.observer.on_progress(&progress.snapshot());

            if !progress.is_done() && !cancel.is_cancelled() {
                self.pacer.pause().await;
            }
        }

        if let Some(intel) = &self.intel {
            for keyword in &keywords {
                if cancel.is_cancelled() {
                    break;
                }

                step += 1;
                self.observer
                    .on_query(CODE_SEARCH_CATEGORY, keyword, step, total);

                match intel.search_code(keyword, session.target()).await {
                    Ok(hits) => {
                        for hit in hits {
                            if !session.should_process(&hit.url) {
                                continue;
                            }
                            let finding = Finding::new(
                                hit.url,
                                "Exposed Code Match",
                                hit.risk,
                                FindingSource::Github,
                            );
                            self.observer.on_finding(&finding);
                            session.record(finding);
                        }
                    }
                    Err(ScanError::RateLimited {
                        provider,
                        retry_after,
                    }) => {
                        let delay = retry_after.min(RATE_LIMIT_BACKOFF_CAP);
                        tracing::warn!(
                            provider = %provider,
                            keyword = %keyword,
                            ?delay,
                            "rate limited, backing off before next keyword"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    Err(e) => {
                        tracing::warn!(keyword = %keyword, error = %e, "code search failed, skipping");
                    }
                }

                progress.advance();
                self.observer.on_progress(&progress.snapshot());

                if !progress.is_done() && !cancel.is_cancelled() {
                    self.pacer.pause().await;
                }
            }
        }

        if cancel.is_cancelled() && !progress.is_done() {
            session.interrupt();
        } else {
            session.complete();
        }

        let report_path = self.report.write(&session)?;

        Ok(ScanOutcome {
            session,
            report_path,
        })
    }

    /// Walk one query's result rows through filter, dedup, and inspection.
    async fn process_hits(
        &self,
        session: &mut ScanSession,
        hits: Vec<SearchHit>,
        cancel: &CancellationToken,
    ) {
        tracing::debug!(count = hits.len(), "search returned candidate URLs");

        for hit in hits {
            if cancel.is_cancelled() {
                break;
            }

            if self.config.classify.restrict_to_target
                && !hit.link.contains(session.target().as_str())
            {
                tracing::debug!(link = %hit.link, "third-party result filtered out");
                continue;
            }

            if !session.should_process(&hit.link) {
                continue;
            }

            self.inspect_url(session, &hit.link).await;
        }
    }

    /// Fetch, pre-filter, classify, and record findings for one URL.
    ///
    /// Every failure in here is a logged skip. Evidence is only attempted
    /// for high-severity findings and its failure downgrades to a finding
    /// without an evidence path.
    async fn inspect_url(&self, session: &mut ScanSession, url: &str) {
        let page = match self.fetcher.fetch(url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(url, error = %e, "fetch failed, skipping URL");
                return;
            }
        };

        if !page.is_textual() {
            tracing::debug!(
                url,
                content_type = %page.content_type,
                "non-text content, skipping"
            );
            return;
        }

        let chars = page.body.chars().count();
        let limit = self.config.classify.max_content_chars;
        if chars > limit {
            tracing::debug!(url, chars, limit, "content exceeds ceiling, skipping");
            return;
        }

        for m in self.classifier.classify(&page.body) {
            let mut finding = Finding::new(url, m.rule_name, m.risk, FindingSource::Google);

            if m.risk >= RiskLevel::High {
                if let Some(evidence) = &self.evidence {
                    match evidence.capture(url, m.risk).await {
                        Ok(path) => finding = finding.with_evidence(path),
                        Err(e) => {
                            tracing::warn!(
                                url,
                                error = %e,
                                "evidence capture failed, recording finding without it"
                            );
                        }
                    }
                }
            }

            self.observer.on_finding(&finding);
            session.record(finding);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_cap_bounds_provider_hints() {
        let hint = Duration::from_secs(3600);
        assert_eq!(hint.min(RATE_LIMIT_BACKOFF_CAP), RATE_LIMIT_BACKOFF_CAP);

        let short = Duration::from_secs(30);
        assert_eq!(short.min(RATE_LIMIT_BACKOFF_CAP), short);
    }
}
