//! Error types for the feed service.

use ag_01_event_bus::EventBusError;
use ag_02_feed_store::StoreError;
use ag_03_feed_pagination::{InvalidCursor, PaginationError};
use ag_04_rate_limiter::RateLimitError;
use shared_types::{PostId, Timestamp};
use thiserror::Error;

/// Errors returned to feed callers.
///
/// Quota exhaustion and governance refusal are separate variants so callers
/// can tell "try again later" from "not allowed at your level".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("Rate limit exceeded, retry after {reset_at}: {reason}")]
    RateLimitExceeded { reason: String, reset_at: Timestamp },

    #[error("Not permitted at your maturity level: {reason}")]
    GovernanceDenied { reason: String },

    /// The governance collaborator itself failed.
    #[error("Governance check failed: {0}")]
    GovernanceUnavailable(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Post not found: {0}")]
    NotFound(PostId),

    #[error(transparent)]
    InvalidCursor(#[from] InvalidCursor),

    #[error("Feed storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Bus(#[from] EventBusError),

    #[error("Rate limit status unavailable: {0}")]
    RateLimitStatus(#[from] RateLimitError),
}

impl From<StoreError> for FeedError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::PostNotFound(id) | StoreError::ParentNotFound(id) => FeedError::NotFound(id),
            StoreError::InvalidReaction(emoji) => {
                FeedError::Validation(format!("invalid reaction {emoji:?}"))
            }
            StoreError::Unavailable(msg) => FeedError::Storage(msg),
        }
    }
}

impl From<PaginationError> for FeedError {
    fn from(e: PaginationError) -> Self {
        match e {
            PaginationError::InvalidCursor(c) => FeedError::InvalidCursor(c),
            PaginationError::Store(s) => s.into(),
        }
    }
}
