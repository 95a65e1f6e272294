//! # AG-03 Feed Pagination
//!
//! Cursor-based keyset pagination over a [`ag_02_feed_store::FeedStore`].
//!
//! ## Guarantees
//!
//! - Traversing a static feed visits every matching post exactly once.
//! - Within and across pages, chronological feeds are strictly descending
//!   by `(created_at, id)`.
//! - Posts inserted during a traversal never cause a duplicate.
//! - A cursor only resumes the filter set and order it was minted for.
//!
//! Engagement-ordered cursors snapshot the score of the last post served.
//! Scores keep moving, so that order only guarantees no duplicates for
//! posts whose score does not change mid-traversal.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod domain;
pub mod error;
pub mod service;

pub use domain::{
    decode_cursor, encode_cursor, FeedPage, FilterFingerprint, PaginationConfig, CURSOR_VERSION,
};
pub use error::{InvalidCursor, PaginationError};
pub use service::PaginationEngine;
