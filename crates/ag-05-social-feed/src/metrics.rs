//! Metrics hooks for feed operations.

use shared_types::PostType;

pub trait FeedMetrics: Send + Sync {
    fn post_created(&self, _post_type: PostType, _is_reply: bool) {}

    fn reaction_added(&self) {}

    fn governance_denied(&self) {}

    fn rate_limited(&self) {}

    fn notification_failed(&self) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpFeedMetrics;

impl FeedMetrics for NoOpFeedMetrics {}
