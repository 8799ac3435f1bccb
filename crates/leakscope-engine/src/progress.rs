//! Deterministic progress accounting for the scan plan.
//!
//! One step per query issued (dork or code-search keyword), never per URL,
//! so the bar advances at a predictable rate regardless of how many results
//! each query returns. Rendering lives in the CLI; the engine only produces
//! snapshots.

use leakscope_core::{ConfigError, ConfigResult};
use std::time::{Duration, Instant};

/// Point-in-time view of scan progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Steps finished so far
    pub completed: usize,
    /// Total planned steps
    pub total: usize,
    /// Whole-percent completion, floored
    pub percent: usize,
    /// Estimated time remaining, from average pace so far
    pub eta: Duration,
}

/// Tracks completion of a fixed-size scan plan.
#[derive(Debug)]
pub struct ProgressTracker {
    total: usize,
    current: usize,
    started: Instant,
}

impl ProgressTracker {
    /// Begin tracking a plan of `total_steps` steps.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` when `total_steps` is zero; an
    /// empty plan means the scan was misconfigured and must not start.
    pub fn start(total_steps: usize) -> ConfigResult<Self> {
        if total_steps == 0 {
            return Err(ConfigError::InvalidValue {
                field: "total_steps".to_string(),
                reason: "scan plan must contain at least one step".to_string(),
            });
        }

        Ok(Self {
            total: total_steps,
            current: 0,
            started: Instant::now(),
        })
    }

    /// Mark one step finished. Saturates at the plan size.
    pub fn advance(&mut self) {
        if self.current < self.total {
            self.current += 1;
        }
    }

    /// Steps finished so far.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.current
    }

    /// Total planned steps.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Whether every planned step has finished.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.current == self.total
    }

    /// Snapshot progress as of now.
    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.snapshot_at(Instant::now())
    }

    /// Snapshot progress as of an explicit instant.
    ///
    /// ETA extrapolates the average pace over completed steps across the
    /// remaining ones. Before the first step completes the elapsed time
    /// itself is the per-step estimate.
    #[allow(clippy::cast_precision_loss)]
    fn snapshot_at(&self, now: Instant) -> ProgressSnapshot {
        let elapsed = now.duration_since(self.started);
        let remaining = self.total - self.current;
        let per_step = elapsed.as_secs_f64() / self.current.max(1) as f64;

        ProgressSnapshot {
            completed: self.current,
            total: self.total,
            percent: self.current * 100 / self.total,
            eta: Duration::from_secs_f64(per_step * remaining as f64),
        }
    }
}
