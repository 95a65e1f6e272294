//! Error types for feed storage.

use shared_types::PostId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("Feed store unavailable: {0}")]
    Unavailable(String),

    #[error("Post not found: {0}")]
    PostNotFound(PostId),

    /// A reply referenced a parent that does not exist.
    #[error("Parent post not found: {0}")]
    ParentNotFound(PostId),

    #[error("Invalid reaction: {0:?}")]
    InvalidReaction(String),
}
