//! Inter-query pacing strategies.
//!
//! The orchestrator pauses between queries through a [`Pacer`] so production
//! runs spread traffic out while tests run at full speed.

use async_trait::async_trait;
use leakscope_core::PacingConfig;
use rand::Rng;
use std::time::Duration;

/// Strategy for pausing between consecutive queries.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Pause for one inter-query interval.
    async fn pause(&self);
}

/// Sleeps a uniformly random duration between the configured bounds.
#[derive(Debug, Clone)]
pub struct RandomizedPacer {
    min: Duration,
    max: Duration,
}

impl RandomizedPacer {
    /// Create a pacer sleeping between `min_secs` and `max_secs`.
    #[must_use]
    pub fn new(min_secs: f64, max_secs: f64) -> Self {
        let min = Duration::from_secs_f64(min_secs);
        let max = Duration::from_secs_f64(max_secs).max(min);
        Self { min, max }
    }

    /// Build from the pacing section of the scan configuration.
    #[must_use]
    pub fn from_config(config: &PacingConfig) -> Self {
        Self::new(config.batch_delay_min_secs, config.batch_delay_max_secs)
    }
}

#[async_trait]
impl Pacer for RandomizedPacer {
    async fn pause(&self) {
        let delay = rand::thread_rng().gen_range(self.min..=self.max);
        tracing::debug!(?delay, "pausing before next query");
        tokio::time::sleep(delay).await;
    }
}

/// Pacer that never waits. Used in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPacer;

#[async_trait]
impl Pacer for NoopPacer {
    async fn pause(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_randomized_pacer_sleeps_within_bounds() {
        let pacer = RandomizedPacer::new(6.0, 10.0);
        let before = tokio::time::Instant::now();
        pacer.pause().await;
        let elapsed = before.elapsed();

        assert!(elapsed >= Duration::from_secs(6), "slept {elapsed:?}");
        assert!(
            elapsed <= Duration::from_secs(10) + Duration::from_millis(5),
            "slept {elapsed:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_degenerate_range_sleeps_exactly_min() {
        let pacer = RandomizedPacer::new(3.0, 3.0);
        let before = tokio::time::Instant::now();
        pacer.pause().await;
        assert!(before.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_noop_pacer_returns_immediately() {
        let before = std::time::Instant::now();
        NoopPacer.pause().await;
        assert!(before.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_from_config_uses_configured_bounds() {
        let config = PacingConfig::default();
        let pacer = RandomizedPacer::from_config(&config);
        assert_eq!(pacer.min, Duration::from_secs_f64(6.0));
        assert_eq!(pacer.max, Duration::from_secs_f64(10.0));
    }
}
