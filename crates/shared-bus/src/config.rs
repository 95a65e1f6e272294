//! Broker configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::DEFAULT_MAX_PAYLOAD_BYTES;

/// Configuration for the hybrid broker.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// Redis URL; `None` runs local-only without a reconnect loop.
    pub redis_url: Option<String>,

    /// Prefix prepended to every topic on the distributed broker.
    pub channel_prefix: String,

    /// Upper bound for a single connection attempt.
    pub connect_timeout: Duration,

    /// Upper bound for forwarding one frame. Elapsing drops the link.
    pub publish_timeout: Duration,

    /// First reconnect delay.
    pub initial_backoff: Duration,

    /// Reconnect delay ceiling.
    pub max_backoff: Duration,

    /// Largest encoded frame accepted by `publish`.
    pub max_payload_bytes: usize,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            channel_prefix: "agora:bus:".to_string(),
            connect_timeout: Duration::from_secs(2),
            publish_timeout: Duration::from_millis(500),
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(30),
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }
}

impl BrokerConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `AGORA_REDIS_URL`: Redis URL (default: unset, local-only)
    /// - `AGORA_BUS_PREFIX`: Channel prefix (default: agora:bus:)
    /// - `AGORA_BUS_CONNECT_TIMEOUT_MS`: Connect timeout (default: 2000)
    /// - `AGORA_BUS_PUBLISH_TIMEOUT_MS`: Remote publish timeout (default: 500)
    /// - `AGORA_BUS_BACKOFF_INITIAL_MS`: First reconnect delay (default: 250)
    /// - `AGORA_BUS_BACKOFF_MAX_MS`: Reconnect delay ceiling (default: 30000)
    /// - `AGORA_BUS_MAX_PAYLOAD_BYTES`: Frame size cap (default: 262144)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let millis = |key: &str, fallback: Duration| {
            env::var(key)
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(fallback)
        };

        Self {
            redis_url: env::var("AGORA_REDIS_URL").ok().filter(|v| !v.is_empty()),
            channel_prefix: env::var("AGORA_BUS_PREFIX").unwrap_or(defaults.channel_prefix),
            connect_timeout: millis("AGORA_BUS_CONNECT_TIMEOUT_MS", defaults.connect_timeout),
            publish_timeout: millis("AGORA_BUS_PUBLISH_TIMEOUT_MS", defaults.publish_timeout),
            initial_backoff: millis("AGORA_BUS_BACKOFF_INITIAL_MS", defaults.initial_backoff),
            max_backoff: millis("AGORA_BUS_BACKOFF_MAX_MS", defaults.max_backoff),
            max_payload_bytes: env::var("AGORA_BUS_MAX_PAYLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_payload_bytes),
        }
    }
}

/// Exponential reconnect delay, doubling up to a ceiling.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        let initial = initial.max(Duration::from_millis(1));
        Self {
            initial,
            max: max.max(initial),
            current: initial,
        }
    }

    /// Delay before the next attempt.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(self.max);
        delay
    }

    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}
