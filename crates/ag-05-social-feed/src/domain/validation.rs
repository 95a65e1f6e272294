//! Input checks applied before anything touches storage.

use ag_02_feed_store::MAX_REACTION_LEN;
use shared_types::NewPost;

use crate::domain::FeedServiceConfig;
use crate::error::FeedError;

pub fn validate_draft(draft: &NewPost, config: &FeedServiceConfig) -> Result<(), FeedError> {
    if draft.sender_id.trim().is_empty() {
        return Err(FeedError::Validation("sender_id is empty".into()));
    }
    if draft.content.trim().is_empty() {
        return Err(FeedError::Validation("content is empty".into()));
    }
    let len = draft.content.chars().count();
    if len > config.max_content_len {
        return Err(FeedError::Validation(format!(
            "content is {len} characters (max {})",
            config.max_content_len
        )));
    }
    if let Some(channel) = &draft.channel_id {
        if channel.is_empty() || channel.chars().any(|c| c.is_whitespace() || c == '*') {
            return Err(FeedError::Validation(format!("invalid channel id {channel:?}")));
        }
    }
    Ok(())
}

pub fn validate_reaction(emoji: &str) -> Result<(), FeedError> {
    let emoji = emoji.trim();
    if emoji.is_empty() || emoji.chars().count() > MAX_REACTION_LEN {
        return Err(FeedError::Validation(format!("invalid reaction {emoji:?}")));
    }
    Ok(())
}
