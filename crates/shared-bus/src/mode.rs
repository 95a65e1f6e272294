//! # Broker Mode
//!
//! Explicit degradation state for the hybrid broker.
//!
//! ```text
//!                 Connected
//!      ┌──────────────────────────────┐
//!      │                              ▼
//! ┌───────────┐                ┌─────────────┐
//! │ LocalOnly │ ◄───────────── │ Distributed │
//! └───────────┘  PublishFailed └─────────────┘
//!                StreamClosed
//!                Shutdown
//! ```
//!
//! `LocalOnly` is degraded but functional: local subscribers still receive
//! every message, cross-instance fan-out waits for reconnection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Current delivery reach of the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrokerMode {
    /// Local fan-out plus the distributed broker.
    Distributed,
    /// In-process fan-out only.
    LocalOnly,
}

/// Events that drive [`BrokerMode`] transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerSignal {
    /// A link to the distributed broker was established.
    Connected,
    /// A connection attempt failed or timed out.
    ConnectFailed,
    /// Forwarding a message to the distributed broker failed.
    PublishFailed,
    /// The inbound subscription stream ended.
    StreamClosed,
    /// The process is shutting down.
    Shutdown,
}

impl BrokerMode {
    /// Transition function.
    pub fn apply(self, signal: BrokerSignal) -> BrokerMode {
        match signal {
            BrokerSignal::Connected => BrokerMode::Distributed,
            BrokerSignal::ConnectFailed
            | BrokerSignal::PublishFailed
            | BrokerSignal::StreamClosed
            | BrokerSignal::Shutdown => BrokerMode::LocalOnly,
        }
    }

    pub fn is_distributed(&self) -> bool {
        matches!(self, BrokerMode::Distributed)
    }
}

impl fmt::Display for BrokerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrokerMode::Distributed => write!(f, "distributed"),
            BrokerMode::LocalOnly => write!(f, "local-only"),
        }
    }
}
