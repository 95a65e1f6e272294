//! # Distributed Broker Ports
//!
//! The hybrid broker depends only on `publish(topic, frame)` and a stream of
//! inbound frames, with at-most-once, no-ack semantics.

use async_trait::async_trait;
use futures::stream::BoxStream;
use std::sync::Arc;
use thiserror::Error;

/// The distributed broker could not be reached.
///
/// Never surfaced to publishers: it only drives the switch to local-only mode.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BrokerUnavailable {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Connection attempt timed out")]
    Timeout,

    #[error("Publish failed: {0}")]
    Publish(String),

    #[error("Publish timed out")]
    PublishTimeout,

    #[error("Subscribe failed: {0}")]
    Subscribe(String),
}

/// Establishes links to the distributed broker (Driven Port).
#[async_trait]
pub trait RemoteConnector: Send + Sync + 'static {
    /// Open a fresh link.
    async fn connect(&self) -> Result<Arc<dyn RemoteLink>, BrokerUnavailable>;

    /// Human-readable target for logs (never includes credentials).
    fn describe(&self) -> String;
}

/// An open link to the distributed broker.
#[async_trait]
pub trait RemoteLink: Send + Sync {
    /// Forward one encoded frame on `topic`.
    async fn publish(&self, topic: &str, frame: Vec<u8>) -> Result<(), BrokerUnavailable>;

    /// Inbound frames for every topic. The stream ends when the link drops.
    async fn inbound(&self) -> Result<BoxStream<'static, Vec<u8>>, BrokerUnavailable>;
}
