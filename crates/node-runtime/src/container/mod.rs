//! # Service Container
//!
//! Builds every service once, in dependency order, and hands out shared
//! references:
//!
//! ```text
//! HybridBroker ─► EventBus ─┬─► FeedService
//! InMemoryFeedStore ────────┤
//! MaturityRateLimiter ──────┘
//! ```

pub mod config;
pub mod services;

pub use config::{ConfigError, GovernanceConfig, NodeConfig};
pub use services::ServiceContainer;
