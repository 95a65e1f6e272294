//! # In-Memory Feed Store
//!
//! Reference [`FeedStore`] adapter. A single `RwLock` guards the post map and
//! the id/timestamp counters, so sort keys are assigned atomically with the
//! insert and a reply's parent counter moves in the same critical section.

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{NewPost, Post, PostId, SystemTimeSource, TimeSource, Timestamp};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::domain::{FeedFilters, FeedOrder, SortKey, MAX_REACTION_LEN};
use crate::error::StoreError;
use crate::ports::FeedStore;

#[derive(Default)]
struct StoreState {
    posts: BTreeMap<PostId, Post>,
    last_id: PostId,
    last_created_at: Timestamp,
}

pub struct InMemoryFeedStore {
    state: RwLock<StoreState>,
    time: Arc<dyn TimeSource>,
    available: AtomicBool,
}

impl InMemoryFeedStore {
    pub fn new() -> Self {
        Self::with_time_source(Arc::new(SystemTimeSource))
    }

    pub fn with_time_source(time: Arc<dyn TimeSource>) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            time,
            available: AtomicBool::new(true),
        }
    }

    /// Simulate an outage: every operation fails with `Unavailable`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.state.read().posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("in-memory store offline".into()))
        }
    }
}

impl Default for InMemoryFeedStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedStore for InMemoryFeedStore {
    async fn insert_post(&self, post: NewPost) -> Result<Post, StoreError> {
        self.ensure_available()?;
        let now = self.time.now();
        let mut state = self.state.write();

        if let Some(parent_id) = post.reply_to_id {
            let parent = state
                .posts
                .get_mut(&parent_id)
                .ok_or(StoreError::ParentNotFound(parent_id))?;
            parent.reply_count += 1;
        }

        // Clock skew must not reorder the feed.
        let created_at = now.max(state.last_created_at);
        let id = state.last_id + 1;
        state.last_id = id;
        state.last_created_at = created_at;

        let post = post.into_post(id, created_at);
        state.posts.insert(id, post.clone());

        debug!(post_id = id, created_at, reply_to = ?post.reply_to_id, "Post stored");
        Ok(post)
    }

    async fn get_post(&self, id: PostId) -> Result<Option<Post>, StoreError> {
        self.ensure_available()?;
        Ok(self.state.read().posts.get(&id).cloned())
    }

    async fn query_posts(
        &self,
        after: Option<SortKey>,
        limit: usize,
        filters: &FeedFilters,
        order: FeedOrder,
    ) -> Result<Vec<Post>, StoreError> {
        self.ensure_available()?;
        let state = self.state.read();
        let eligible = |post: &&Post| {
            filters.matches(post) && after.as_ref().map_or(true, |key| order.is_after(post, key))
        };

        let posts = match order {
            // Id order coincides with (created_at, id) order.
            FeedOrder::Chronological => state
                .posts
                .values()
                .rev()
                .filter(eligible)
                .take(limit)
                .cloned()
                .collect(),
            FeedOrder::Engagement => {
                let mut matching: Vec<&Post> = state.posts.values().filter(eligible).collect();
                matching.sort_by(|a, b| order.compare(a, b));
                matching.into_iter().take(limit).cloned().collect()
            }
        };
        Ok(posts)
    }

    async fn count_posts_since(&self, sender_id: &str, since: Timestamp) -> Result<u64, StoreError> {
        self.ensure_available()?;
        let state = self.state.read();
        let count = state
            .posts
            .values()
            .rev()
            .take_while(|p| p.created_at >= since)
            .filter(|p| p.sender_id == sender_id)
            .count();
        Ok(count as u64)
    }

    async fn add_reaction(&self, id: PostId, emoji: &str) -> Result<Post, StoreError> {
        self.ensure_available()?;
        let emoji = emoji.trim();
        if emoji.is_empty() || emoji.chars().count() > MAX_REACTION_LEN {
            return Err(StoreError::InvalidReaction(emoji.to_string()));
        }

        let mut state = self.state.write();
        let post = state.posts.get_mut(&id).ok_or(StoreError::PostNotFound(id))?;
        *post.reaction_counts.entry(emoji.to_string()).or_insert(0) += 1;
        Ok(post.clone())
    }
}
