//! # AG-04 Rate Limiter
//!
//! Per-agent posting quotas keyed on maturity tier.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): tier policy table, `FailurePolicy`,
//!   decision and info types
//! - **Ports Layer** (`ports/`): `PostCounter`, `TierProvider`
//! - **Adapters Layer** (`adapters/`): `FeedStoreCounter`,
//!   `InMemoryTierRegistry`
//! - **Service Layer** (`service/`): `MaturityRateLimiter`
//!
//! ## Failure Policy
//!
//! When the post count or the tier cannot be read, `FailurePolicy::Open`
//! (the default) allows the post and logs a warning; `FailurePolicy::Closed`
//! denies it as temporarily unavailable. Either way the decision is marked
//! `degraded`.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

pub use adapters::{FeedStoreCounter, InMemoryTierRegistry};
pub use domain::{Denial, FailurePolicy, RateLimitConfig, RateLimitDecision, RateLimitInfo, TierLimit};
pub use error::RateLimitError;
pub use metrics::{NoOpRateLimitMetrics, RateLimitMetrics};
pub use ports::{PostCounter, TierProvider};
pub use service::MaturityRateLimiter;
