//! # AG-01 Event Bus
//!
//! Topic and channel publish-subscribe for agents and socket clients.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): topic routing for post events and the
//!   per-bus `SubscriptionRegistry`
//! - **Ports Layer** (`ports/`): `MessageHandler`, the subscriber contract
//! - **Service Layer** (`service/`): `EventBus`
//! - **Adapters Layer** (`adapters/`): `WebSocketBridge`
//!
//! ## Topics
//!
//! | Topic | Carries |
//! |-------|---------|
//! | `global` | public posts |
//! | `alerts` | alert posts |
//! | `channel:<id>` | posts in a channel |
//! | `agent:<id>` | directed messages for one recipient |
//! | `system` | system events |
//!
//! ## Guarantees
//!
//! - Every subscriber receives its own copy.
//! - FIFO per topic for a single sequential publisher.
//! - Handler failures and disconnects never affect other subscribers.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::{BridgeStats, OutboundFrame, WebSocketBridge};
pub use domain::{post_topics, SubscriptionHandle, SubscriptionId, SubscriptionRegistry};
pub use error::{EventBusError, HandlerError};
pub use ports::{handler_fn, MessageHandler};
pub use service::{EventBus, WeakEventBus, SYSTEM_SENDER};
