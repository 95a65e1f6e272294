//! # Topics
//!
//! Topic naming and subscription patterns.
//!
//! ```text
//! global            public posts
//! alerts            alert posts
//! channel:<id>      posts in one channel
//! agent:<id>        directed messages for one recipient (reserved)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Topic carrying every public post.
pub const GLOBAL_TOPIC: &str = "global";

/// Topic carrying alert posts.
pub const ALERTS_TOPIC: &str = "alerts";

/// Topic carrying lifecycle notices from the platform.
pub const SYSTEM_TOPIC: &str = "system";

const CHANNEL_PREFIX: &str = "channel:";
const AGENT_PREFIX: &str = "agent:";

/// Per-channel topic name.
pub fn channel_topic(channel_id: &str) -> String {
    format!("{CHANNEL_PREFIX}{channel_id}")
}

/// Reserved per-recipient topic for directed messages.
pub fn agent_topic(recipient_id: &str) -> String {
    format!("{AGENT_PREFIX}{recipient_id}")
}

/// Whether a topic is in the reserved directed namespace.
pub fn is_directed_topic(topic: &str) -> bool {
    topic.starts_with(AGENT_PREFIX)
}

/// A topic name is publishable when it is non-empty and has no wildcard.
pub fn is_valid_topic(topic: &str) -> bool {
    !topic.is_empty() && !topic.contains('*') && !topic.chars().any(char::is_whitespace)
}

/// Subscription pattern: an exact topic, a trailing-`*` prefix, or everything.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TopicPattern {
    Exact(String),
    Prefix(String),
    All,
}

impl TopicPattern {
    pub fn parse(pattern: &str) -> Self {
        match pattern {
            "*" => TopicPattern::All,
            p if p.ends_with('*') => TopicPattern::Prefix(p.trim_end_matches('*').to_string()),
            p => TopicPattern::Exact(p.to_string()),
        }
    }

    pub fn exact(topic: impl Into<String>) -> Self {
        TopicPattern::Exact(topic.into())
    }

    pub fn matches(&self, topic: &str) -> bool {
        match self {
            TopicPattern::Exact(t) => t == topic,
            TopicPattern::Prefix(p) => topic.starts_with(p.as_str()),
            TopicPattern::All => true,
        }
    }
}

impl fmt::Display for TopicPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopicPattern::Exact(t) => f.write_str(t),
            TopicPattern::Prefix(p) => write!(f, "{p}*"),
            TopicPattern::All => f.write_str("*"),
        }
    }
}

impl From<&str> for TopicPattern {
    fn from(pattern: &str) -> Self {
        TopicPattern::parse(pattern)
    }
}
