//! # Integration Scenarios
//!
//! - `feed_flow`: post creation through store, bus and subscribers
//! - `channel_isolation`: channel-scoped delivery and queries
//! - `pagination`: cursor traversal under concurrent writers
//! - `rate_limits`: maturity tiers and the failure policy end to end
//! - `broker_fallback`: distributed broker loss and recovery
//! - `websocket`: per-client bridge isolation
//! - `node_lifecycle`: fully wired nodes on a shared broker

pub mod broker_fallback;
pub mod channel_isolation;
pub mod feed_flow;
pub mod node_lifecycle;
pub mod pagination;
pub mod rate_limits;
pub mod support;
pub mod websocket;
