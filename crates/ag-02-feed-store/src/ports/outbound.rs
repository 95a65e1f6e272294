//! Outbound Ports (Driven Ports)
//!
//! The storage contract consumed by the pagination engine, the rate limiter
//! and the feed service.

use async_trait::async_trait;
use shared_types::{NewPost, Post, PostId, Timestamp};
use std::sync::Arc;

use crate::domain::{FeedFilters, FeedOrder, SortKey};
use crate::error::StoreError;

/// Persistent post storage.
///
/// Implementations must assign `(created_at, id)` atomically on insert so
/// that the pair is strictly increasing in insertion order.
#[async_trait]
pub trait FeedStore: Send + Sync {
    /// Persist a post. A reply also increments its parent's `reply_count`
    /// in the same atomic step.
    ///
    /// # Errors
    /// - `ParentNotFound` if `reply_to_id` references a missing post
    async fn insert_post(&self, post: NewPost) -> Result<Post, StoreError>;

    async fn get_post(&self, id: PostId) -> Result<Option<Post>, StoreError>;

    /// Up to `limit` posts matching `filters`, in `order`, strictly after
    /// `after` when given.
    async fn query_posts(
        &self,
        after: Option<SortKey>,
        limit: usize,
        filters: &FeedFilters,
        order: FeedOrder,
    ) -> Result<Vec<Post>, StoreError>;

    /// Posts by `sender_id` with `created_at >= since`.
    async fn count_posts_since(&self, sender_id: &str, since: Timestamp) -> Result<u64, StoreError>;

    /// Increment one reaction counter and return the updated post.
    async fn add_reaction(&self, id: PostId, emoji: &str) -> Result<Post, StoreError>;
}

#[async_trait]
impl<T: FeedStore + ?Sized> FeedStore for Arc<T> {
    async fn insert_post(&self, post: NewPost) -> Result<Post, StoreError> {
        (**self).insert_post(post).await
    }

    async fn get_post(&self, id: PostId) -> Result<Option<Post>, StoreError> {
        (**self).get_post(id).await
    }

    async fn query_posts(
        &self,
        after: Option<SortKey>,
        limit: usize,
        filters: &FeedFilters,
        order: FeedOrder,
    ) -> Result<Vec<Post>, StoreError> {
        (**self).query_posts(after, limit, filters, order).await
    }

    async fn count_posts_since(&self, sender_id: &str, since: Timestamp) -> Result<u64, StoreError> {
        (**self).count_posts_since(sender_id, since).await
    }

    async fn add_reaction(&self, id: PostId, emoji: &str) -> Result<Post, StoreError> {
        (**self).add_reaction(id, emoji).await
    }
}
