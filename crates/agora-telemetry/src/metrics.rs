//! Prometheus metrics for Agora.
//!
//! All metrics follow the naming convention: `agora_<component>_<metric>`

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // BUS METRICS
    // =========================================================================

    /// Messages published, by topic family (global, channel, agent, alerts, system)
    pub static ref BUS_MESSAGES_PUBLISHED: IntCounterVec = IntCounterVec::new(
        Opts::new("agora_bus_messages_published_total", "Messages published on the bus"),
        &["scope"]
    ).expect("metric creation failed");

    /// Local subscriber deliveries
    pub static ref BUS_LOCAL_DELIVERIES: IntCounter = IntCounter::new(
        "agora_bus_local_deliveries_total",
        "Messages handed to local subscribers"
    ).expect("metric creation failed");

    /// 1 while the distributed broker is connected
    pub static ref BUS_BROKER_CONNECTED: IntGauge = IntGauge::new(
        "agora_bus_broker_connected",
        "Whether the distributed broker link is up"
    ).expect("metric creation failed");

    pub static ref BUS_RECONNECT_ATTEMPTS: IntCounter = IntCounter::new(
        "agora_bus_reconnect_attempts_total",
        "Reconnection attempts to the distributed broker"
    ).expect("metric creation failed");

    pub static ref BUS_REMOTE_PUBLISH_FAILURES: IntCounter = IntCounter::new(
        "agora_bus_remote_publish_failures_total",
        "Forwards to the distributed broker that failed"
    ).expect("metric creation failed");

    pub static ref BUS_REMOTE_FRAMES_RECEIVED: IntCounter = IntCounter::new(
        "agora_bus_remote_frames_received_total",
        "Frames received from other instances"
    ).expect("metric creation failed");

    // =========================================================================
    // RATE LIMITER METRICS
    // =========================================================================

    pub static ref RATELIMIT_ALLOWED: IntCounterVec = IntCounterVec::new(
        Opts::new("agora_ratelimit_allowed_total", "Posts allowed by the rate limiter"),
        &["tier"]
    ).expect("metric creation failed");

    pub static ref RATELIMIT_DENIALS: IntCounterVec = IntCounterVec::new(
        Opts::new("agora_ratelimit_denials_total", "Posts denied by the rate limiter"),
        &["reason"]  // tier_forbidden/quota_exhausted/unavailable/tier_unavailable
    ).expect("metric creation failed");

    /// Checks allowed because a dependency failed
    pub static ref RATELIMIT_FAIL_OPEN: IntCounter = IntCounter::new(
        "agora_ratelimit_fail_open_total",
        "Rate limit checks resolved open after a dependency failure"
    ).expect("metric creation failed");

    // =========================================================================
    // FEED METRICS
    // =========================================================================

    pub static ref FEED_POSTS_CREATED: IntCounterVec = IntCounterVec::new(
        Opts::new("agora_feed_posts_created_total", "Posts created"),
        &["post_type", "kind"]  // kind: post/reply
    ).expect("metric creation failed");

    pub static ref FEED_REACTIONS: IntCounter = IntCounter::new(
        "agora_feed_reactions_total",
        "Reactions added to posts"
    ).expect("metric creation failed");

    pub static ref FEED_GOVERNANCE_DENIALS: IntCounter = IntCounter::new(
        "agora_feed_governance_denials_total",
        "Posts refused by governance"
    ).expect("metric creation failed");

    pub static ref FEED_RATE_LIMITED: IntCounter = IntCounter::new(
        "agora_feed_rate_limited_total",
        "Posts rejected for exceeding the rate limit"
    ).expect("metric creation failed");

    pub static ref FEED_NOTIFICATION_FAILURES: IntCounter = IntCounter::new(
        "agora_feed_notification_failures_total",
        "Reputation notifications that failed or timed out"
    ).expect("metric creation failed");
}

/// Keeps the registry alive for the life of the process.
#[derive(Debug, Clone)]
pub struct MetricsHandle {
    registry: Registry,
}

impl MetricsHandle {
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; already registered collectors are skipped.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Bus
        Box::new(BUS_MESSAGES_PUBLISHED.clone()),
        Box::new(BUS_LOCAL_DELIVERIES.clone()),
        Box::new(BUS_BROKER_CONNECTED.clone()),
        Box::new(BUS_RECONNECT_ATTEMPTS.clone()),
        Box::new(BUS_REMOTE_PUBLISH_FAILURES.clone()),
        Box::new(BUS_REMOTE_FRAMES_RECEIVED.clone()),
        // Rate limiter
        Box::new(RATELIMIT_ALLOWED.clone()),
        Box::new(RATELIMIT_DENIALS.clone()),
        Box::new(RATELIMIT_FAIL_OPEN.clone()),
        // Feed
        Box::new(FEED_POSTS_CREATED.clone()),
        Box::new(FEED_REACTIONS.clone()),
        Box::new(FEED_GOVERNANCE_DENIALS.clone()),
        Box::new(FEED_RATE_LIMITED.clone()),
        Box::new(FEED_NOTIFICATION_FAILURES.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::Metrics(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        registry: REGISTRY.clone(),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&REGISTRY.gather(), &mut buffer)
        .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::Metrics(e.to_string()))
}
