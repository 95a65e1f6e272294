//! Feed ordering and keyset sort keys.
//!
//! Both orders are total and descending:
//!
//! - `Chronological`: `(created_at, id)`
//! - `Engagement`: `(engagement_score, created_at, id)`

use serde::{Deserialize, Serialize};
use shared_types::{Post, PostId, Timestamp};
use std::cmp::Ordering;

/// Longest accepted reaction key, in characters.
pub const MAX_REACTION_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedOrder {
    #[default]
    Chronological,
    Engagement,
}

/// Position of a post in a feed order.
///
/// `score` is only set for [`FeedOrder::Engagement`] and is a snapshot
/// taken when the key was minted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    pub created_at: Timestamp,
    pub id: PostId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u64>,
}

impl SortKey {
    pub fn for_post(post: &Post, order: FeedOrder) -> Self {
        Self {
            created_at: post.created_at,
            id: post.id,
            score: match order {
                FeedOrder::Chronological => None,
                FeedOrder::Engagement => Some(post.engagement_score()),
            },
        }
    }

    fn rank(&self) -> (u64, Timestamp, PostId) {
        (self.score.unwrap_or(0), self.created_at, self.id)
    }
}

impl FeedOrder {
    fn rank(self, post: &Post) -> (u64, Timestamp, PostId) {
        let score = match self {
            FeedOrder::Chronological => 0,
            FeedOrder::Engagement => post.engagement_score(),
        };
        (score, post.created_at, post.id)
    }

    /// Feed order between two posts: `Less` means `a` is shown first.
    pub fn compare(self, a: &Post, b: &Post) -> Ordering {
        self.rank(b).cmp(&self.rank(a))
    }

    /// True when `post` sorts strictly after `key` in this order.
    pub fn is_after(self, post: &Post, key: &SortKey) -> bool {
        self.rank(post) < key.rank()
    }
}
