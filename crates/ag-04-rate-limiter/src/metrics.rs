//! Metrics hooks for rate limit decisions.

use shared_types::MaturityTier;

/// Instrumentation points for the limiter.
pub trait RateLimitMetrics: Send + Sync {
    fn allowed(&self, _tier: MaturityTier) {}

    /// `reason` is one of the [`crate::Denial`] labels.
    fn denied(&self, _reason: &'static str) {}

    fn failed_open(&self) {}
}

/// Recorder that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpRateLimitMetrics;

impl RateLimitMetrics for NoOpRateLimitMetrics {}
