//! Error types for the rate limiter's dependencies.

use thiserror::Error;

/// A collaborator the limiter depends on failed.
///
/// Never returned from `check`: the configured failure policy decides the
/// outcome instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RateLimitError {
    #[error("Post count unavailable: {0}")]
    CountUnavailable(String),

    #[error("Tier lookup failed: {0}")]
    TierUnavailable(String),
}
