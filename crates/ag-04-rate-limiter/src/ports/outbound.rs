//! Outbound Ports (Driven Ports)
//!
//! What the limiter needs from the rest of the platform.

use async_trait::async_trait;
use shared_types::{MaturityTier, Timestamp};

use crate::error::RateLimitError;

/// Counts an agent's recent posts.
#[async_trait]
pub trait PostCounter: Send + Sync {
    async fn count_posts_since(&self, agent_id: &str, since: Timestamp) -> Result<u64, RateLimitError>;
}

/// Reads an agent's current maturity tier (owned by the graduation service).
#[async_trait]
pub trait TierProvider: Send + Sync {
    async fn tier_of(&self, agent_id: &str) -> Result<MaturityTier, RateLimitError>;
}
