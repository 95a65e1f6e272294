//! Error types for pagination.

use ag_02_feed_store::StoreError;
use thiserror::Error;

/// A cursor the engine refuses to resume from.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidCursor {
    /// Not base64, not JSON, or an unsupported version.
    #[error("Malformed cursor: {0}")]
    Malformed(String),

    /// Minted for a different filter set or sort order.
    #[error("Cursor does not match the requested filters")]
    FingerprintMismatch,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaginationError {
    #[error(transparent)]
    InvalidCursor(#[from] InvalidCursor),

    #[error(transparent)]
    Store(#[from] StoreError),
}
