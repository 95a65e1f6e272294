//! Feed filter set.
//!
//! Serialized field order is fixed by declaration order, so the JSON form is
//! stable and safe to fingerprint.

use serde::{Deserialize, Serialize};
use shared_types::{ActorId, Post, PostId, PostType, Timestamp};

/// Conjunction of optional predicates over posts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedFilters {
    pub sender_id: Option<ActorId>,
    pub post_type: Option<PostType>,
    pub channel_id: Option<String>,
    pub is_public: Option<bool>,
    /// Inclusive lower bound.
    pub created_after: Option<Timestamp>,
    /// Exclusive upper bound.
    pub created_before: Option<Timestamp>,
    /// Thread view: only direct replies to this post.
    pub reply_to_id: Option<PostId>,
    /// Exclude replies.
    #[serde(default)]
    pub top_level_only: bool,
}

impl FeedFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sender(mut self, sender_id: impl Into<ActorId>) -> Self {
        self.sender_id = Some(sender_id.into());
        self
    }

    pub fn post_type(mut self, post_type: PostType) -> Self {
        self.post_type = Some(post_type);
        self
    }

    pub fn channel(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }

    pub fn public_only(mut self) -> Self {
        self.is_public = Some(true);
        self
    }

    pub fn created_between(mut self, after: Option<Timestamp>, before: Option<Timestamp>) -> Self {
        self.created_after = after;
        self.created_before = before;
        self
    }

    pub fn replies_to(mut self, parent: PostId) -> Self {
        self.reply_to_id = Some(parent);
        self
    }

    pub fn top_level(mut self) -> Self {
        self.top_level_only = true;
        self
    }

    pub fn matches(&self, post: &Post) -> bool {
        if let Some(sender) = &self.sender_id {
            if &post.sender_id != sender {
                return false;
            }
        }
        if let Some(post_type) = self.post_type {
            if post.post_type != post_type {
                return false;
            }
        }
        if let Some(channel) = &self.channel_id {
            if post.channel_id.as_ref() != Some(channel) {
                return false;
            }
        }
        if let Some(is_public) = self.is_public {
            if post.is_public != is_public {
                return false;
            }
        }
        if self.created_after.is_some_and(|after| post.created_at < after) {
            return false;
        }
        if self.created_before.is_some_and(|before| post.created_at >= before) {
            return false;
        }
        if let Some(parent) = self.reply_to_id {
            if post.reply_to_id != Some(parent) {
                return false;
            }
        }
        !(self.top_level_only && post.is_reply())
    }
}
