//! LeakScope Engine - Scan orchestration and classification.
//!
//! This crate is the core of LeakScope: it plans a scan from the dork
//! collection and code-search keywords, drives discovery and page fetching
//! through injected providers, classifies content with entropy-gated rules,
//! deduplicates URLs per run, and persists the final report.
//!
//! # Features
//!
//! - Entropy-gated regex classification that suppresses placeholder secrets
//! - Per-run URL deduplication and severity aggregation in one session object
//! - Deterministic per-query progress with ETA snapshots
//! - Randomized inter-query pacing, injectable for tests
//! - Cooperative cancellation observed between cycles, never mid-fetch
//! - Report written on both completion and interruption
//!
//! # Example
//!
//! ```rust,ignore
//! use leakscope_engine::{Classifier, ScanOrchestrator};
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! let orchestrator = ScanOrchestrator::new(
//!     config,
//!     Classifier::new(rules),
//!     Arc::new(search_browser.clone()),
//!     Arc::new(search_browser),
//! );
//!
//! let outcome = orchestrator.run(target, CancellationToken::new()).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod classifier;
pub mod entropy;
pub mod error;
pub mod orchestrator;
pub mod pacing;
pub mod progress;
pub mod report;
pub mod session;
pub mod sources;

// Re-export commonly used types
pub use classifier::{Classifier, RuleMatch};
pub use entropy::shannon_entropy;
pub use error::{FetchError, Result, ScanError};
pub use orchestrator::{ScanOrchestrator, ScanOutcome};
pub use pacing::{NoopPacer, Pacer, RandomizedPacer};
pub use progress::{ProgressSnapshot, ProgressTracker};
pub use report::ReportWriter;
pub use session::{ScanSession, SessionState, SeverityCounts};
pub use sources::{
    CodeIntelSource, ContentFetcher, Discoverer, EvidenceCapture, NoopObserver, ScanObserver,
};
