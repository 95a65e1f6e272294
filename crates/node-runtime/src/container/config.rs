//! # Node Configuration
//!
//! Aggregates the per-crate configuration structs. Each one reads its own
//! environment variables; [`NodeConfig::validate`] rejects combinations that
//! would misbehave at runtime.

use std::env;

use ag_03_feed_pagination::PaginationConfig;
use ag_04_rate_limiter::RateLimitConfig;
use ag_05_social_feed::FeedServiceConfig;
use agora_telemetry::TelemetryConfig;
use shared_bus::BrokerConfig;
use shared_types::MaturityTier;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    pub broker: BrokerConfig,
    pub pagination: PaginationConfig,
    pub rate_limit: RateLimitConfig,
    pub feed: FeedServiceConfig,
    pub governance: GovernanceConfig,
    pub telemetry: TelemetryConfig,
}

impl NodeConfig {
    pub fn from_env() -> Self {
        Self {
            broker: BrokerConfig::from_env(),
            pagination: PaginationConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            feed: FeedServiceConfig::from_env(),
            governance: GovernanceConfig::from_env(),
            telemetry: TelemetryConfig::from_env(),
        }
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.broker.redis_url {
            if !(url.starts_with("redis://") || url.starts_with("rediss://")) {
                return Err(ConfigError::InvalidRedisUrl(url.clone()));
            }
        }
        if self.broker.initial_backoff.is_zero()
            || self.broker.initial_backoff > self.broker.max_backoff
        {
            return Err(ConfigError::InvalidBackoff);
        }
        if self.broker.publish_timeout.is_zero() {
            return Err(ConfigError::ZeroPublishTimeout);
        }
        if self.pagination.default_page_size == 0
            || self.pagination.default_page_size > self.pagination.max_page_size
        {
            return Err(ConfigError::InvalidPageSize {
                default: self.pagination.default_page_size,
                max: self.pagination.max_page_size,
            });
        }
        if self.rate_limit.window_ms == 0 {
            return Err(ConfigError::ZeroRateWindow);
        }
        if self.feed.max_content_len == 0 {
            return Err(ConfigError::ZeroContentLength);
        }
        Ok(())
    }
}

/// How posts from STUDENT agents are handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GovernanceConfig {
    /// Approve every STUDENT post instead of refusing them.
    pub allow_student_posts: bool,
    /// Tier assumed for agents the tier registry has never seen.
    pub default_tier: MaturityTier,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            allow_student_posts: false,
            default_tier: MaturityTier::Student,
        }
    }
}

impl GovernanceConfig {
    /// # Environment Variables
    ///
    /// - `AGORA_ALLOW_STUDENT_POSTS` (default: false)
    /// - `AGORA_DEFAULT_TIER` (default: STUDENT)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            allow_student_posts: env::var("AGORA_ALLOW_STUDENT_POSTS")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.allow_student_posts),
            default_tier: env::var("AGORA_DEFAULT_TIER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_tier),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("AGORA_REDIS_URL must use redis:// or rediss://, got {0:?}")]
    InvalidRedisUrl(String),

    #[error("Reconnect backoff must be non-zero and initial <= max")]
    InvalidBackoff,

    #[error("Distributed publish timeout must be non-zero")]
    ZeroPublishTimeout,

    #[error("Default page size {default} must be within 1..={max}")]
    InvalidPageSize { default: usize, max: usize },

    #[error("Rate limit window must be non-zero")]
    ZeroRateWindow,

    #[error("Maximum content length must be non-zero")]
    ZeroContentLength,
}
