//! # Tier Policy
//!
//! | Tier | Posts per window |
//! |------|------------------|
//! | STUDENT | 0 (always denied) |
//! | INTERN | 1 |
//! | SUPERVISED | 12 |
//! | AUTONOMOUS | unlimited |
//!
//! The window is rolling: a post counts while `created_at >= now - window`.

use serde::{Deserialize, Serialize};
use shared_types::{MaturityTier, HOUR_MS};
use std::env;
use std::fmt;
use std::str::FromStr;

/// What the limiter does when it cannot count posts or read the tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Allow the post and log a warning.
    #[default]
    Open,
    /// Deny the post as temporarily unavailable.
    Closed,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(FailurePolicy::Open),
            "closed" => Ok(FailurePolicy::Closed),
            other => Err(format!("unknown failure policy: {other}")),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Open => f.write_str("open"),
            FailurePolicy::Closed => f.write_str("closed"),
        }
    }
}

/// Quota for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierLimit {
    Forbidden,
    PerWindow(u64),
    Unlimited,
}

impl TierLimit {
    /// Maximum posts per window; `None` means unlimited.
    pub fn max(&self) -> Option<u64> {
        match self {
            TierLimit::Forbidden => Some(0),
            TierLimit::PerWindow(n) => Some(*n),
            TierLimit::Unlimited => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Rolling window length in milliseconds.
    pub window_ms: u64,
    pub intern_limit: u64,
    pub supervised_limit: u64,
    pub failure_policy: FailurePolicy,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: HOUR_MS,
            intern_limit: 1,
            supervised_limit: 12,
            failure_policy: FailurePolicy::Open,
        }
    }
}

impl RateLimitConfig {
    /// # Environment Variables
    ///
    /// - `AGORA_RATE_WINDOW_SECS`: window length (default: 3600)
    /// - `AGORA_RATE_INTERN_LIMIT`: INTERN posts per window (default: 1)
    /// - `AGORA_RATE_SUPERVISED_LIMIT`: SUPERVISED posts per window (default: 12)
    /// - `AGORA_RATE_FAILURE_POLICY`: `open` or `closed` (default: open)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let number = |key: &str, fallback: u64| {
            env::var(key)
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(fallback)
        };
        Self {
            window_ms: env::var("AGORA_RATE_WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| secs.saturating_mul(1_000))
                .unwrap_or(defaults.window_ms),
            intern_limit: number("AGORA_RATE_INTERN_LIMIT", defaults.intern_limit),
            supervised_limit: number("AGORA_RATE_SUPERVISED_LIMIT", defaults.supervised_limit),
            failure_policy: env::var("AGORA_RATE_FAILURE_POLICY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.failure_policy),
        }
    }

    pub fn limit_for(&self, tier: MaturityTier) -> TierLimit {
        match tier {
            MaturityTier::Student => TierLimit::Forbidden,
            MaturityTier::Intern => TierLimit::PerWindow(self.intern_limit),
            MaturityTier::Supervised => TierLimit::PerWindow(self.supervised_limit),
            MaturityTier::Autonomous => TierLimit::Unlimited,
        }
    }
}
