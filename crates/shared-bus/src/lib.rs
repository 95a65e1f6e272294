//! # Shared Bus - Broker Abstraction
//!
//! Publish/subscribe plumbing shared by every Agora component.
//!
//! ## Delivery Model
//!
//! - Every message is delivered to local subscribers first, in publish order.
//! - When a distributed broker (Redis) is reachable, messages are also
//!   forwarded to it and frames from other instances are delivered locally.
//! - When it is not, the broker degrades to local-only delivery and keeps
//!   retrying in the background. Publishers never see the outage.
//!
//! ```text
//! ┌──────────────┐  publish()   ┌──────────────┐   PUBLISH    ┌───────┐
//! │  Publisher   │ ───────────► │ HybridBroker │ ───────────► │ Redis │
//! └──────────────┘              │              │ ◄─────────── │       │
//!                               └──────┬───────┘  PSUBSCRIBE  └───────┘
//!                                      │ LocalBroker
//!                         ┌────────────┼────────────┐
//!                         ▼            ▼            ▼
//!                   MessageStream MessageStream MessageStream
//! ```
//!
//! Delivery is at-most-once. Nothing is persisted or replayed.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod events;
pub mod hybrid;
pub mod metrics;
pub mod mode;
pub mod publisher;
pub mod redis_link;
pub mod remote;
pub mod subscriber;
pub mod testing;
pub mod topic;

// Re-export main types
pub use config::{Backoff, BrokerConfig};
pub use events::{BusMessage, BusPayload, PostEventKind, WireEnvelope};
pub use hybrid::HybridBroker;
pub use metrics::{BusMetrics, NoOpBusMetrics};
pub use mode::{BrokerMode, BrokerSignal};
pub use publisher::{BrokerHealth, LocalBroker, MessageBroker, PublishError};
pub use redis_link::RedisConnector;
pub use remote::{BrokerUnavailable, RemoteConnector, RemoteLink};
pub use subscriber::{MessageStream, SubscriptionError};
pub use topic::{
    agent_topic, channel_topic, is_directed_topic, is_valid_topic, TopicPattern, ALERTS_TOPIC,
    GLOBAL_TOPIC, SYSTEM_TOPIC,
};

/// Current wire protocol version for cross-instance frames.
pub const PROTOCOL_VERSION: u16 = 1;

/// Largest encoded frame accepted by default.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 256 * 1024;
