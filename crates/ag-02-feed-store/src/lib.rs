//! # AG-02 Feed Store
//!
//! Storage contract for posts and the reference in-memory adapter.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): `FeedFilters`, `FeedOrder`, `SortKey`
//! - **Ports Layer** (`ports/`): `FeedStore` (driven port)
//! - **Adapters Layer** (`adapters/`): `InMemoryFeedStore`
//!
//! ## Invariants
//!
//! - `(created_at, id)` is strictly increasing in insertion order.
//! - `reply_count` grows by exactly one per accepted reply, atomically with
//!   the reply's insertion.
//! - A channel filter never returns posts from another channel.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;

pub use adapters::InMemoryFeedStore;
pub use domain::{FeedFilters, FeedOrder, SortKey, MAX_REACTION_LEN};
pub use error::StoreError;
pub use ports::FeedStore;
