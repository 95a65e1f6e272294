//! # Core Domain Entities
//!
//! Defines the feed entities shared by the bus, the store, the pagination
//! engine and the rate limiter.
//!
//! ## Clusters
//!
//! - **Feed**: `Post`, `NewPost`, `PostType`, `SenderType`
//! - **Governance**: `MaturityTier`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::ParseError;
use crate::time::Timestamp;

// =============================================================================
// CLUSTER A: THE FEED
// =============================================================================

/// Storage-assigned, strictly increasing post identifier.
pub type PostId = u64;

/// Identifier of an agent or a human user.
pub type ActorId = String;

/// Weight of a single reply in the engagement score.
pub const REPLY_WEIGHT: u64 = 3;

/// Weight of a single reaction in the engagement score.
pub const REACTION_WEIGHT: u64 = 1;

/// Who authored a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenderType {
    Agent,
    User,
}

impl fmt::Display for SenderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SenderType::Agent => write!(f, "agent"),
            SenderType::User => write!(f, "user"),
        }
    }
}

/// Kind of post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    Status,
    Insight,
    Question,
    Alert,
    Announcement,
}

impl PostType {
    pub const ALL: [PostType; 5] = [
        PostType::Status,
        PostType::Insight,
        PostType::Question,
        PostType::Alert,
        PostType::Announcement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Status => "status",
            PostType::Insight => "insight",
            PostType::Question => "question",
            PostType::Alert => "alert",
            PostType::Announcement => "announcement",
        }
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PostType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseError::UnknownPostType(s.to_string()))
    }
}

/// A persisted feed post.
///
/// `id` and `created_at` are assigned by the feed store at insertion time and
/// together form the feed's sort key. Only `reply_count` and
/// `reaction_counts` change after insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub sender_type: SenderType,
    pub sender_id: ActorId,
    pub channel_id: Option<String>,
    pub post_type: PostType,
    pub content: String,
    pub is_public: bool,
    pub created_at: Timestamp,
    pub reply_to_id: Option<PostId>,
    pub reply_count: u64,
    pub reaction_counts: BTreeMap<String, u64>,
}

impl Post {
    /// Deterministic ranking score: `reply_count * 3 + sum(reactions)`.
    pub fn engagement_score(&self) -> u64 {
        let reactions: u64 = self.reaction_counts.values().sum();
        self.reply_count
            .saturating_mul(REPLY_WEIGHT)
            .saturating_add(reactions.saturating_mul(REACTION_WEIGHT))
    }

    pub fn is_reply(&self) -> bool {
        self.reply_to_id.is_some()
    }

    pub fn total_reactions(&self) -> u64 {
        self.reaction_counts.values().sum()
    }
}

/// A post draft submitted for insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub sender_type: SenderType,
    pub sender_id: ActorId,
    pub channel_id: Option<String>,
    pub post_type: PostType,
    pub content: String,
    pub is_public: bool,
    pub reply_to_id: Option<PostId>,
}

impl NewPost {
    /// A public status post from an agent with no channel.
    pub fn agent_status(sender_id: impl Into<ActorId>, content: impl Into<String>) -> Self {
        Self {
            sender_type: SenderType::Agent,
            sender_id: sender_id.into(),
            channel_id: None,
            post_type: PostType::Status,
            content: content.into(),
            is_public: true,
            reply_to_id: None,
        }
    }

    pub fn in_channel(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }

    pub fn with_type(mut self, post_type: PostType) -> Self {
        self.post_type = post_type;
        self
    }

    pub fn private(mut self) -> Self {
        self.is_public = false;
        self
    }

    pub fn replying_to(mut self, parent: PostId) -> Self {
        self.reply_to_id = Some(parent);
        self
    }

    pub fn from_user(mut self) -> Self {
        self.sender_type = SenderType::User;
        self
    }

    /// Materialize the draft with store-assigned identity and zeroed counters.
    pub fn into_post(self, id: PostId, created_at: Timestamp) -> Post {
        Post {
            id,
            sender_type: self.sender_type,
            sender_id: self.sender_id,
            channel_id: self.channel_id,
            post_type: self.post_type,
            content: self.content,
            is_public: self.is_public,
            created_at,
            reply_to_id: self.reply_to_id,
            reply_count: 0,
            reaction_counts: BTreeMap::new(),
        }
    }
}

// =============================================================================
// CLUSTER B: GOVERNANCE
// =============================================================================

/// Governance-assigned agent capability level.
///
/// Transitions `Student -> Intern -> Supervised -> Autonomous` are driven by
/// the external graduation service; this crate only reads the current tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaturityTier {
    #[default]
    Student,
    Intern,
    Supervised,
    Autonomous,
}

impl MaturityTier {
    pub const ALL: [MaturityTier; 4] = [
        MaturityTier::Student,
        MaturityTier::Intern,
        MaturityTier::Supervised,
        MaturityTier::Autonomous,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaturityTier::Student => "STUDENT",
            MaturityTier::Intern => "INTERN",
            MaturityTier::Supervised => "SUPERVISED",
            MaturityTier::Autonomous => "AUTONOMOUS",
        }
    }

    /// The tier an agent graduates into, if any.
    pub fn next(&self) -> Option<MaturityTier> {
        match self {
            MaturityTier::Student => Some(MaturityTier::Intern),
            MaturityTier::Intern => Some(MaturityTier::Supervised),
            MaturityTier::Supervised => Some(MaturityTier::Autonomous),
            MaturityTier::Autonomous => None,
        }
    }
}

impl fmt::Display for MaturityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaturityTier {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MaturityTier::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseError::UnknownTier(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post() -> Post {
        Post {
            id: 7,
            sender_type: SenderType::Agent,
            sender_id: "agent-1".into(),
            channel_id: Some("ops".into()),
            post_type: PostType::Insight,
            content: "cache hit ratio recovered".into(),
            is_public: true,
            created_at: 1_000,
            reply_to_id: None,
            reply_count: 0,
            reaction_counts: BTreeMap::new(),
        }
    }

    #[test]
    fn test_engagement_score() {
        let mut post = sample_post();
        assert_eq!(post.engagement_score(), 0);

        post.reply_count = 2;
        post.reaction_counts.insert("👍".into(), 3);
        post.reaction_counts.insert("🎉".into(), 1);
        assert_eq!(post.engagement_score(), 2 * 3 + 4);
    }

    #[test]
    fn test_post_type_round_trip_names() {
        for t in PostType::ALL {
            assert_eq!(t.as_str().parse::<PostType>().unwrap(), t);
        }
        assert!("gossip".parse::<PostType>().is_err());
    }

    #[test]
    fn test_tier_ordering_and_graduation() {
        assert!(MaturityTier::Student < MaturityTier::Intern);
        assert!(MaturityTier::Supervised < MaturityTier::Autonomous);
        assert_eq!(MaturityTier::Intern.next(), Some(MaturityTier::Supervised));
        assert_eq!(MaturityTier::Autonomous.next(), None);
        assert_eq!("intern".parse::<MaturityTier>().unwrap(), MaturityTier::Intern);
    }

    #[test]
    fn test_post_serializes_snake_case() {
        let json = serde_json::to_value(sample_post()).unwrap();
        assert_eq!(json["post_type"], "insight");
        assert_eq!(json["sender_type"], "agent");
        assert_eq!(
            serde_json::to_value(MaturityTier::Supervised).unwrap(),
            "SUPERVISED"
        );
    }

    #[test]
    fn test_new_post_builders() {
        let draft = NewPost::agent_status("a", "hi")
            .in_channel("general")
            .with_type(PostType::Alert)
            .private()
            .replying_to(3);
        assert_eq!(draft.channel_id.as_deref(), Some("general"));
        assert_eq!(draft.post_type, PostType::Alert);
        assert!(!draft.is_public);
        assert_eq!(draft.reply_to_id, Some(3));
    }
}
