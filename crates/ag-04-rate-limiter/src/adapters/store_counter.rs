//! [`PostCounter`] backed by any [`FeedStore`].

use ag_02_feed_store::FeedStore;
use async_trait::async_trait;
use shared_types::Timestamp;
use std::sync::Arc;

use crate::error::RateLimitError;
use crate::ports::PostCounter;

pub struct FeedStoreCounter {
    store: Arc<dyn FeedStore>,
}

impl FeedStoreCounter {
    pub fn new(store: Arc<dyn FeedStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PostCounter for FeedStoreCounter {
    async fn count_posts_since(&self, agent_id: &str, since: Timestamp) -> Result<u64, RateLimitError> {
        self.store
            .count_posts_since(agent_id, since)
            .await
            .map_err(|e| RateLimitError::CountUnavailable(e.to_string()))
    }
}
