//! # Broker Contract and Local Fan-out
//!
//! Defines the publishing side of the bus and the in-process broker that
//! every other implementation delivers through.

use crate::events::{BusMessage, WireEnvelope};
use crate::mode::BrokerMode;
use crate::subscriber::MessageStream;
use crate::topic::{is_valid_topic, TopicPattern};
use crate::DEFAULT_MAX_PAYLOAD_BYTES;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

/// Errors returned to a publisher.
///
/// Only problems with the message itself surface here; transport trouble with
/// the distributed broker is absorbed by degrading to local-only delivery.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PublishError {
    #[error("Payload serialization failed: {0}")]
    Serialization(String),

    #[error("Payload too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Invalid topic: {0:?}")]
    InvalidTopic(String),
}

/// Point-in-time broker status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokerHealth {
    /// True while cross-instance fan-out is available.
    pub connected: bool,
    pub mode: BrokerMode,
    pub reconnect_attempts: u64,
    pub messages_published: u64,
    pub local_subscribers: usize,
}

/// Publish/subscribe contract shared by every broker.
#[async_trait]
pub trait MessageBroker: Send + Sync {
    /// Publish a message.
    ///
    /// Returns once the message is handed to local subscriber queues (and to
    /// the distributed broker when connected), not after subscribers have
    /// processed it.
    ///
    /// # Returns
    ///
    /// The number of local subscribers the message was queued for.
    async fn publish(&self, message: BusMessage) -> Result<usize, PublishError>;

    /// Subscribe to every topic matching `pattern`.
    fn subscribe(&self, pattern: TopicPattern) -> MessageStream;

    /// Current connectivity.
    fn health(&self) -> BrokerHealth;
}

struct LocalSubscriber {
    id: u64,
    pattern: TopicPattern,
    sender: mpsc::UnboundedSender<Arc<BusMessage>>,
}

/// In-process broker.
///
/// Each subscriber owns an unbounded queue; delivery pushes into every
/// matching queue under a read lock, so a single publisher's messages arrive
/// in publish order at every subscriber. Suitable on its own for single-node
/// operation and used by [`crate::HybridBroker`] for local delivery.
pub struct LocalBroker {
    subscribers: RwLock<Vec<LocalSubscriber>>,
    next_id: AtomicU64,
    messages_published: AtomicU64,
    max_payload_bytes: usize,
    /// Stamped on encoded frames; the hybrid broker shares its instance id.
    origin: Uuid,
}

impl LocalBroker {
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_payload(DEFAULT_MAX_PAYLOAD_BYTES)
    }

    #[must_use]
    pub fn with_max_payload(max_payload_bytes: usize) -> Self {
        Self::with_origin(max_payload_bytes, Uuid::new_v4())
    }

    pub(crate) fn with_origin(max_payload_bytes: usize, origin: Uuid) -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            messages_published: AtomicU64::new(0),
            max_payload_bytes,
            origin,
        }
    }

    /// Check the topic and encode the wire frame.
    pub(crate) fn validate(&self, message: &BusMessage) -> Result<Vec<u8>, PublishError> {
        if !is_valid_topic(&message.topic) {
            return Err(PublishError::InvalidTopic(message.topic.clone()));
        }
        WireEnvelope::encode(self.origin, message, self.max_payload_bytes)
    }

    /// Push a message into every matching subscriber queue.
    ///
    /// Queues whose stream was dropped are pruned afterwards.
    pub(crate) fn deliver(&self, message: Arc<BusMessage>) -> usize {
        let mut delivered = 0;
        let mut saw_closed = false;
        {
            let subscribers = self.subscribers.read();
            for sub in subscribers.iter() {
                if !sub.pattern.matches(&message.topic) {
                    continue;
                }
                if sub.sender.send(Arc::clone(&message)).is_ok() {
                    delivered += 1;
                } else {
                    saw_closed = true;
                }
            }
        }

        if saw_closed {
            self.prune_closed();
        }

        debug!(
            topic = %message.topic,
            receivers = delivered,
            "Message delivered locally"
        );
        delivered
    }

    fn prune_closed(&self) {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|s| !s.sender.is_closed());
        debug!(pruned = before - subscribers.len(), "Pruned closed subscriptions");
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .iter()
            .filter(|s| !s.sender.is_closed())
            .count()
    }

    #[must_use]
    pub fn messages_published(&self) -> u64 {
        self.messages_published.load(Ordering::Relaxed)
    }

    pub(crate) fn record_published(&self) {
        self.messages_published.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for LocalBroker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageBroker for LocalBroker {
    async fn publish(&self, message: BusMessage) -> Result<usize, PublishError> {
        self.validate(&message)?;
        self.record_published();
        Ok(self.deliver(Arc::new(message)))
    }

    fn subscribe(&self, pattern: TopicPattern) -> MessageStream {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        self.subscribers.write().push(LocalSubscriber {
            id,
            pattern: pattern.clone(),
            sender,
        });

        debug!(subscriber_id = id, pattern = %pattern, "New local subscription");
        MessageStream::new(receiver, pattern, id)
    }

    fn health(&self) -> BrokerHealth {
        BrokerHealth {
            connected: false,
            mode: BrokerMode::LocalOnly,
            reconnect_attempts: 0,
            messages_published: self.messages_published(),
            local_subscribers: self.subscriber_count(),
        }
    }
}

impl LocalBroker {
    /// Drop a subscription eagerly instead of waiting for lazy pruning.
    pub fn remove_subscriber(&self, subscriber_id: u64) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != subscriber_id);
        subscribers.len() != before
    }
}
