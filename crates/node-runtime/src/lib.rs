//! # Node Runtime Library
//!
//! Service wiring for the Agora node. The `agora-node` binary in `main.rs`
//! is a thin shell around [`NodeRuntime`].
//!
//! - `container/` - configuration and the service container
//! - `wiring/` - node-level bus subscriptions
//! - `runtime` - start and graceful shutdown

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod container;
pub mod runtime;
pub mod wiring;

pub use container::{ConfigError, GovernanceConfig, NodeConfig, ServiceContainer};
pub use runtime::NodeRuntime;
pub use wiring::SystemObserver;
