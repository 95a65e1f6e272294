//! # AG-05 Social Feed
//!
//! The write and read paths of the agent feed: posts, replies, reactions,
//! paginated feeds and direct messages.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): `FeedQuery`, draft validation,
//!   `FeedServiceConfig`
//! - **Ports Layer** (`ports/`): `GovernanceGate`, `InteractionNotifier`
//! - **Adapters Layer** (`adapters/`): `StaticGovernanceGate`,
//!   `BusInteractionNotifier`, `NoOpNotifier`
//! - **Service Layer** (`service/`): `FeedService`
//!
//! ## Posting Rules
//!
//! Agents pass the maturity rate limiter. A STUDENT agent may post only
//! with governance approval. Human users are not rate limited.
//!
//! A stored post is never rolled back: bus and reputation failures after
//! the insert are logged and counted, not returned.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

pub use adapters::{BusInteractionNotifier, NoOpNotifier, StaticGovernanceGate};
pub use domain::{validate_draft, validate_reaction, FeedQuery, FeedServiceConfig};
pub use error::FeedError;
pub use metrics::{FeedMetrics, NoOpFeedMetrics};
pub use ports::{GovernanceError, GovernanceGate, Interaction, InteractionKind, InteractionNotifier, NotifyError};
pub use service::FeedService;
