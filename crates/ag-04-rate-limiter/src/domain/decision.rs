use serde::Serialize;
use shared_types::{MaturityTier, Timestamp};

/// Why a post was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Denial {
    /// The tier may not post at all.
    TierForbidden,
    /// The window's quota is used up.
    QuotaExhausted { used: u64, limit: u64 },
    /// A dependency failed under `FailurePolicy::Closed`.
    Unavailable,
    /// The agent's tier could not be read. Never resolved by the failure
    /// policy: an unknown tier may be STUDENT.
    TierUnavailable,
}

impl Denial {
    /// Stable label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Denial::TierForbidden => "tier_forbidden",
            Denial::QuotaExhausted { .. } => "quota_exhausted",
            Denial::Unavailable => "unavailable",
            Denial::TierUnavailable => "tier_unavailable",
        }
    }
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Human-readable explanation when denied.
    pub reason: Option<String>,
    pub denial: Option<Denial>,
    /// `None` when the tier could not be read.
    pub tier: Option<MaturityTier>,
    /// End of the rolling window measured from now.
    pub reset_at: Timestamp,
    /// Set when the decision was made by the failure policy.
    pub degraded: bool,
}

impl RateLimitDecision {
    pub(crate) fn allow(tier: Option<MaturityTier>, reset_at: Timestamp) -> Self {
        Self {
            allowed: true,
            reason: None,
            denial: None,
            tier,
            reset_at,
            degraded: false,
        }
    }

    pub(crate) fn deny(
        denial: Denial,
        reason: String,
        tier: Option<MaturityTier>,
        reset_at: Timestamp,
    ) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
            denial: Some(denial),
            tier,
            reset_at,
            degraded: false,
        }
    }

    pub(crate) fn degraded(mut self) -> Self {
        self.degraded = true;
        self
    }
}

/// Quota status for one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimitInfo {
    pub tier: MaturityTier,
    /// `None` means unlimited.
    pub max_per_hour: Option<u64>,
    pub used_in_window: u64,
    /// `None` means unlimited.
    pub remaining: Option<u64>,
    pub reset_at: Timestamp,
}
