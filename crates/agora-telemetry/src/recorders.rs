//! Prometheus-backed implementations of the domain recorder traits.

use ag_04_rate_limiter::RateLimitMetrics;
use ag_05_social_feed::FeedMetrics;
use shared_bus::{BrokerMode, BusMetrics};
use shared_types::{MaturityTier, PostType};

use crate::metrics::*;

/// Topic family used as the `scope` label, keeping cardinality fixed.
fn topic_scope(topic: &str) -> &'static str {
    match topic.split_once(':').map_or(topic, |(prefix, _)| prefix) {
        "global" => "global",
        "alerts" => "alerts",
        "system" => "system",
        "channel" => "channel",
        "agent" => "agent",
        _ => "other",
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusBusMetrics;

impl BusMetrics for PrometheusBusMetrics {
    fn message_published(&self, topic: &str, local_receivers: usize) {
        BUS_MESSAGES_PUBLISHED
            .with_label_values(&[topic_scope(topic)])
            .inc();
        BUS_LOCAL_DELIVERIES.inc_by(local_receivers as u64);
    }

    fn mode_changed(&self, mode: BrokerMode) {
        BUS_BROKER_CONNECTED.set(i64::from(mode.is_distributed()));
    }

    fn reconnect_attempt(&self) {
        BUS_RECONNECT_ATTEMPTS.inc();
    }

    fn remote_publish_failed(&self) {
        BUS_REMOTE_PUBLISH_FAILURES.inc();
    }

    fn remote_frame_received(&self) {
        BUS_REMOTE_FRAMES_RECEIVED.inc();
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusRateLimitMetrics;

impl RateLimitMetrics for PrometheusRateLimitMetrics {
    fn allowed(&self, tier: MaturityTier) {
        RATELIMIT_ALLOWED.with_label_values(&[tier.as_str()]).inc();
    }

    fn denied(&self, reason: &'static str) {
        RATELIMIT_DENIALS.with_label_values(&[reason]).inc();
    }

    fn failed_open(&self) {
        RATELIMIT_FAIL_OPEN.inc();
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusFeedMetrics;

impl FeedMetrics for PrometheusFeedMetrics {
    fn post_created(&self, post_type: PostType, is_reply: bool) {
        let kind = if is_reply { "reply" } else { "post" };
        FEED_POSTS_CREATED
            .with_label_values(&[post_type.as_str(), kind])
            .inc();
    }

    fn reaction_added(&self) {
        FEED_REACTIONS.inc();
    }

    fn governance_denied(&self) {
        FEED_GOVERNANCE_DENIALS.inc();
    }

    fn rate_limited(&self) {
        FEED_RATE_LIMITED.inc();
    }

    fn notification_failed(&self) {
        FEED_NOTIFICATION_FAILURES.inc();
    }
}
