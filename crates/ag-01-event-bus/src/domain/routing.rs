//! Which topics a post event is published on.

use shared_bus::{channel_topic, ALERTS_TOPIC, GLOBAL_TOPIC};
use shared_types::{Post, PostType};

/// Topics a post event fans out to.
///
/// - Public posts go to `global`.
/// - Posts in a channel go to that channel's topic, public or not.
/// - Alerts additionally go to `alerts`, following the visibility rules above.
///
/// A private post outside any channel reaches no topic.
pub fn post_topics(post: &Post) -> Vec<String> {
    let mut topics = Vec::with_capacity(3);
    let mut visible = false;

    if post.is_public {
        topics.push(GLOBAL_TOPIC.to_string());
        visible = true;
    }
    if let Some(channel) = &post.channel_id {
        topics.push(channel_topic(channel));
        visible = true;
    }
    if visible && post.post_type == PostType::Alert {
        topics.push(ALERTS_TOPIC.to_string());
    }
    topics
}
